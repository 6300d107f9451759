use std::path::PathBuf;

/// Errors that can abort a double-digest run.
#[derive(Debug, thiserror::Error)]
pub enum DigestError {
    #[error("No such enzyme available: '{0}'")]
    UnknownEnzyme(String),

    #[error("invalid size window {lower}-{upper}: bounds must be non-negative and lower <= upper")]
    InvalidRange { lower: i64, upper: i64 },

    #[error("no sequences found in input")]
    NoSequences,

    #[error("total sequence length is zero, coverage fraction is undefined")]
    DivisionUndefined,

    #[error("cut position {position} lies outside sequence '{sequence}' of length {length}")]
    CutOutOfBounds {
        sequence: String,
        position: u64,
        length: u64,
    },

    #[error("I/O error: {source} ({path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("FASTA parsing error: {0}")]
    Fasta(String),

    #[error("enzyme catalog error: {0}")]
    Catalog(String),

    #[error("worker error: {0}")]
    Worker(String),
}

impl DigestError {
    /// Wraps an `io::Error` with the path it happened on.
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            source,
            path: path.into(),
        }
    }
}
