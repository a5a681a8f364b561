use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of a full index rebuild. Individual unreadable documents are
/// logged and skipped, never raised; only store-level I/O aborts the run.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("cannot access {path:?}: {source}")]
    SourceAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failure of a single query. A missing or malformed store table fails the
/// query it was loaded for, nothing else; an empty query is not an error.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("cannot access {path:?}: {source}")]
    SourceAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed {table} record at line {line}: {reason}")]
    Format {
        table: &'static str,
        line: u64,
        reason: String,
    },
}

impl BuildError {
    pub(crate) fn access(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::SourceAccess { path: path.into(), source }
    }
}

impl QueryError {
    pub(crate) fn access(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::SourceAccess { path: path.into(), source }
    }
}
