//! Query-time scoring: tokenize, weight, score every candidate document by
//! cosine similarity against the stored postings, rank, resolve urls.

use crate::error::QueryError;
use crate::index::{DirectoryEntry, RankedDoc};
use crate::persist::{self, StorePaths};
use crate::tokenizer::{tokenize_query, Stopwords};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// How the raw query-term frequency enters the query weight. The choice is
/// explicit because the two formulas disagree for repeated query terms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QueryWeighting {
    /// `w = (0.5 + 0.5 * freq) * idf`. Matches the scorer the stored
    /// postings were built against.
    #[default]
    RawFrequency,
    /// `w = (0.5 + 0.5 * freq / maxFreq) * idf`, conventional augmented tf.
    AugmentedNormalized,
}

impl QueryWeighting {
    fn tf(self, freq: u32, max_freq: u32) -> f64 {
        match self {
            QueryWeighting::RawFrequency => 0.5 + 0.5 * freq as f64,
            QueryWeighting::AugmentedNormalized => 0.5 + 0.5 * (freq as f64 / max_freq as f64),
        }
    }
}

/// Stateless scorer over one store generation. Every call to
/// [`QueryEngine::rank`] loads its own read-only snapshot of the tables;
/// nothing is cached or mutated across calls.
pub struct QueryEngine {
    store: StorePaths,
    stopwords_path: PathBuf,
    urls_path: PathBuf,
    weighting: QueryWeighting,
}

impl QueryEngine {
    pub fn new(
        store: StorePaths,
        stopwords_path: impl Into<PathBuf>,
        urls_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            store,
            stopwords_path: stopwords_path.into(),
            urls_path: urls_path.into(),
            weighting: QueryWeighting::default(),
        }
    }

    pub fn with_weighting(mut self, weighting: QueryWeighting) -> Self {
        self.weighting = weighting;
        self
    }

    /// Rank the corpus against a free-text query, best match first.
    ///
    /// Only documents with strictly positive cosine similarity are returned;
    /// ties break by ascending document id. A query with no admissible terms,
    /// or none present in the vocabulary, yields an empty ranking. A document
    /// missing from the url mapping keeps its slot with `url: None`.
    pub fn rank(&self, query: &str) -> Result<Vec<RankedDoc>, QueryError> {
        let stopwords = Stopwords::load(&self.stopwords_path)
            .map_err(|source| QueryError::access(&self.stopwords_path, source))?;
        let terms = tokenize_query(query, &stopwords);
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let mut frequencies: BTreeMap<String, u32> = BTreeMap::new();
        for term in terms {
            *frequencies.entry(term).or_insert(0) += 1;
        }
        let max_freq = frequencies.values().copied().max().unwrap_or(1);

        // Terms absent from the vocabulary carry zero weight and can never
        // match a posting, so they drop out here.
        let idf = persist::load_idf(&self.store)?;
        let mut query_weights: BTreeMap<&str, f64> = BTreeMap::new();
        for (term, &freq) in &frequencies {
            if let Some(&term_idf) = idf.get(term) {
                query_weights.insert(term, self.weighting.tf(freq, max_freq) * term_idf);
            }
        }
        let query_norm_sq: f64 = query_weights.values().map(|w| w * w).sum();
        if query_norm_sq <= 0.0 {
            return Ok(Vec::new());
        }
        let query_norm = query_norm_sq.sqrt();

        // Seek only the posting runs of the query terms. Documents outside
        // those runs have a zero dot product and would be excluded anyway.
        let directory = persist::load_directory(&self.store)?;
        let mut blocks: Vec<DirectoryEntry> = query_weights
            .keys()
            .filter_map(|term| directory.get(*term).copied())
            .collect();
        blocks.sort_by_key(|block| block.start);
        let rows = persist::read_posting_blocks(&self.store, &blocks)?;

        let mut dots: BTreeMap<String, f64> = BTreeMap::new();
        for (term, posting) in rows {
            if let Some(weight) = query_weights.get(term.as_str()) {
                *dots.entry(posting.doc).or_insert(0.0) += posting.weight * weight;
            }
        }

        let mut scored: Vec<(String, f64)> = Vec::new();
        for (doc, dot) in dots {
            if dot <= 0.0 {
                continue;
            }
            let doc_norm_sq = persist::document_norm_sq(&self.store, &doc)?;
            if doc_norm_sq <= 0.0 {
                continue;
            }
            let similarity = dot / (doc_norm_sq.sqrt() * query_norm);
            if similarity > 0.0 {
                scored.push((doc, similarity));
            }
        }
        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });

        let urls = persist::load_urls(&self.urls_path)?;
        Ok(scored
            .into_iter()
            .map(|(doc, score)| {
                let url = urls.get(&doc).cloned();
                RankedDoc { doc, score, url }
            })
            .collect())
    }
}
