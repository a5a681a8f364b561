use serde::Serialize;
use std::collections::BTreeMap;

/// Term to raw occurrence count for one document.
pub type TermFrequencies = BTreeMap<String, u32>;

/// One row of the postings table: a document containing the term, and the
/// term's tf-idf weight in that document.
#[derive(Debug, Clone, PartialEq)]
pub struct Posting {
    pub doc: String,
    pub weight: f64,
}

/// Where a term's posting run lives in the postings table: 1-based first
/// line and run length. Runs partition the table exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub start: u64,
    pub count: u64,
}

/// Corpus-wide term statistics: for each distinct term, the number of
/// documents containing it at least once. Iteration is lexicographic, which
/// fixes the emission order of the vocabulary and postings tables.
#[derive(Debug, Default, Clone)]
pub struct Vocabulary {
    terms: BTreeMap<String, u32>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more document containing `term`.
    pub fn record(&mut self, term: &str) {
        if let Some(df) = self.terms.get_mut(term) {
            *df += 1;
        } else {
            self.terms.insert(term.to_string(), 1);
        }
    }

    pub fn document_frequency(&self, term: &str) -> Option<u32> {
        self.terms.get(term).copied()
    }

    /// idf of a vocabulary term given the collection size. Returns `None`
    /// for unknown terms; a known term always has df >= 1, so the quotient
    /// is defined.
    pub fn idf(&self, term: &str, total_docs: u32) -> Option<f64> {
        self.document_frequency(term).map(|df| idf(total_docs, df))
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains_key(term)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.terms.iter().map(|(term, &df)| (term.as_str(), df))
    }
}

/// idf = log10(N / df).
pub fn idf(total_docs: u32, document_frequency: u32) -> f64 {
    (total_docs as f64 / document_frequency as f64).log10()
}

/// Outcome of a full rebuild, reported back to the caller.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct IndexStats {
    pub documents: u32,
    pub terms: usize,
}

/// One ranked answer: document id, its cosine similarity against the query,
/// and its resolved url, if the url mapping knows the document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedDoc {
    pub doc: String,
    pub score: f64,
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn df_counts_documents_not_occurrences() {
        let mut vocab = Vocabulary::new();
        vocab.record("cat");
        vocab.record("cat");
        assert_eq!(vocab.document_frequency("cat"), Some(2));
        assert_eq!(vocab.document_frequency("dog"), None);
    }

    #[test]
    fn idf_is_monotonic_in_df() {
        assert!(idf(10, 1) > idf(10, 2));
        assert!(idf(10, 2) > idf(10, 9));
        assert_eq!(idf(2, 2), 0.0);
    }
}
