use std::io;

use thiserror::Error;

/// Error surfaced by one ingestion call.
///
/// A call fails with at most one of these; the first fatal error any
/// worker encounters wins.
#[derive(Debug, Error)]
pub enum Error {
    /// The env-file could not be opened or read.
    #[error("cannot read env-file: {0}")]
    Io(#[from] io::Error),

    /// A declaration line failed to parse. `line` is 1-based.
    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: ParseError,
    },

    /// The store rejected a write during the apply phase. Entries applied
    /// earlier in the same call stay applied.
    #[error("cannot store `{key}`: {source}")]
    Store {
        key: String,
        #[source]
        source: StoreError,
    },
}

/// A malformed declaration line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// No `KEY=` prefix: the variable name is missing or invalid.
    #[error("missing variable name in: {0}")]
    MissingKeyName(String),

    /// The value is empty, starts with whitespace, or has an unbalanced
    /// quote.
    #[error("incorrect value in: {0}")]
    IncorrectValue(String),
}

/// A key or value a store refuses to hold.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Keys must be non-empty and free of `=` and NUL.
    #[error("invalid key `{0}`")]
    InvalidKey(String),

    /// Values must be free of NUL.
    #[error("invalid value for key `{0}`")]
    InvalidValue(String),
}
