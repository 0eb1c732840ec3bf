use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransposeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid delimiter {0:?}: must be a single byte or \\t")]
    InvalidDelimiter(String),

    #[error("Invalid field width: must be at least 1")]
    InvalidWidth,

    #[error("failed to grow element store (last request {requested_bytes} bytes)")]
    AllocationExhausted { requested_bytes: usize },
}

pub type Result<T> = std::result::Result<T, TransposeError>;
