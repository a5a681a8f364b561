//! Offline index construction: term frequencies per document, corpus-wide
//! vocabulary, tf-idf weights, and the persisted postings tables.

use crate::error::BuildError;
use crate::index::{IndexStats, Posting, TermFrequencies, Vocabulary};
use crate::persist::{self, StorePaths};
use crate::record;
use crate::tokenizer::{tokenize, Stopwords};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Count term occurrences in one document's extracted text.
pub fn term_frequencies(text: &str, stopwords: &Stopwords) -> TermFrequencies {
    let mut frequencies = TermFrequencies::new();
    for term in tokenize(text, stopwords) {
        *frequencies.entry(term).or_insert(0) += 1;
    }
    frequencies
}

/// Accumulates one indexing run. Feed every document of the corpus through
/// [`IndexBuilder::add_document`], then persist the whole store at once with
/// [`IndexBuilder::write_store`]. Documents are kept in id order so two runs
/// over the same corpus emit byte-identical tables.
pub struct IndexBuilder {
    stopwords: Stopwords,
    documents: BTreeMap<String, TermFrequencies>,
    vocabulary: Vocabulary,
    total_docs: u32,
}

impl IndexBuilder {
    pub fn new(stopwords: Stopwords) -> Self {
        Self {
            stopwords,
            documents: BTreeMap::new(),
            vocabulary: Vocabulary::new(),
            total_docs: 0,
        }
    }

    /// Tokenize one document and fold it into the corpus statistics. Each
    /// document raises a term's document frequency by at most one, however
    /// often the term repeats. A document with no admissible terms still
    /// counts toward the collection size.
    ///
    /// Ids longer than the postings document column are clipped here, once,
    /// so every table and filename carries the same id. A repeated id keeps
    /// the first document; counting the same id twice would skew N and df.
    pub fn add_document(&mut self, id: impl Into<String>, text: &str) {
        let id = id.into();
        let clipped = record::clip_doc_id(&id);
        if clipped.len() != id.len() {
            tracing::warn!(doc = %id, "document id exceeds the stored column width, clipping");
        }
        if self.documents.contains_key(clipped) {
            tracing::warn!(doc = %clipped, "duplicate document id, keeping the first occurrence");
            return;
        }
        let id = clipped.to_string();
        let frequencies = term_frequencies(text, &self.stopwords);
        for term in frequencies.keys() {
            self.vocabulary.record(term);
        }
        self.total_docs += 1;
        self.documents.insert(id, frequencies);
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn document_count(&self) -> u32 {
        self.total_docs
    }

    /// tf-idf weight of every term of one document:
    /// `idf(term) * rawFreq / maxFreq(doc)`.
    fn document_weights(&self, frequencies: &TermFrequencies) -> BTreeMap<String, f64> {
        let max = frequencies.values().copied().max().unwrap_or(1) as f64;
        frequencies
            .iter()
            .map(|(term, &freq)| {
                let idf = self.vocabulary.idf(term, self.total_docs).unwrap_or(0.0);
                (term.clone(), idf * (freq as f64 / max))
            })
            .collect()
    }

    /// Write every store table and consume the builder. Terms and documents
    /// are emitted in lexicographic order throughout.
    pub fn write_store(self, paths: &StorePaths) -> Result<IndexStats, BuildError> {
        for dir in [&paths.root, &paths.tok_dir(), &paths.wtd_dir()] {
            fs::create_dir_all(dir).map_err(|source| BuildError::access(dir, source))?;
        }

        persist::write_vocabulary(paths, &self.vocabulary, self.total_docs)?;

        let mut postings: BTreeMap<String, Vec<Posting>> = BTreeMap::new();
        for (doc, frequencies) in &self.documents {
            persist::write_raw_frequencies(paths, doc, frequencies)?;
            if frequencies.is_empty() {
                // no weights and no postings, but the document stays in N
                continue;
            }
            let weights = self.document_weights(frequencies);
            persist::write_weights(paths, doc, &weights)?;
            for (term, &weight) in &weights {
                postings
                    .entry(term.clone())
                    .or_default()
                    .push(Posting { doc: doc.clone(), weight });
            }
        }
        persist::write_postings(paths, &postings)?;

        Ok(IndexStats { documents: self.total_docs, terms: self.vocabulary.len() })
    }
}

/// Rebuild the store from a directory of plain-text documents, one `.txt`
/// file per document, the file stem as document id. An unreadable document
/// is logged and excluded from the run; it does not abort the rebuild.
pub fn rebuild_index(
    corpus_dir: &Path,
    stopwords: Stopwords,
    store: &StorePaths,
) -> Result<IndexStats, BuildError> {
    let entries =
        fs::read_dir(corpus_dir).map_err(|source| BuildError::access(corpus_dir, source))?;
    let mut files: Vec<_> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file() && path.extension().and_then(|ext| ext.to_str()) == Some("txt")
        })
        .collect();
    files.sort();

    let mut builder = IndexBuilder::new(stopwords);
    for path in files {
        let Some(id) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        match fs::read_to_string(&path) {
            Ok(text) => builder.add_document(id, &text),
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "skipping unreadable document");
            }
        }
    }
    let stats = builder.write_store(store)?;
    tracing::info!(
        documents = stats.documents,
        terms = stats.terms,
        store = %store.root.display(),
        "index rebuild complete"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_ids_keep_the_first_document() {
        let mut builder = IndexBuilder::new(Stopwords::none());
        builder.add_document("docA", "cat cat");
        builder.add_document("docA", "bird");
        assert_eq!(builder.document_count(), 1);
        assert_eq!(builder.vocabulary().document_frequency("cat"), Some(1));
        assert!(!builder.vocabulary().contains("bird"));
    }

    #[test]
    fn clipped_ids_collide_as_duplicates() {
        let mut builder = IndexBuilder::new(Stopwords::none());
        builder.add_document(format!("{}one", "x".repeat(31)), "cat");
        builder.add_document(format!("{}two", "x".repeat(31)), "dog");
        assert_eq!(builder.document_count(), 1);
        assert!(!builder.vocabulary().contains("dog"));
    }
}
