use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while processing one file.
#[derive(Error, Debug)]
pub enum TextmendError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unknown encoding label {0:?}")]
    UnknownEncoding(String),
    #[error("{path} vanished or changed underneath us: {detail}")]
    Concurrent { path: PathBuf, detail: String },
}

impl TextmendError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        TextmendError::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, TextmendError>;
