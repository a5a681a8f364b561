//! TF-IDF inverted-index engine: an offline builder that turns a document
//! collection into fixed-width postings tables, and a stateless query
//! scorer that ranks documents by cosine similarity against them.

pub mod builder;
pub mod error;
pub mod index;
pub mod persist;
pub mod query;
pub mod record;
pub mod tokenizer;

pub use builder::{rebuild_index, term_frequencies, IndexBuilder};
pub use error::{BuildError, QueryError};
pub use index::{DirectoryEntry, IndexStats, Posting, RankedDoc, TermFrequencies, Vocabulary};
pub use query::{QueryEngine, QueryWeighting};
pub use tokenizer::{tokenize, tokenize_query, Stopwords};
