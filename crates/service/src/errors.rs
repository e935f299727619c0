use std::path::PathBuf;

use models::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid name: {0:?}")]
    InvalidName(String),
    #[error("character already exists: {0}")]
    DuplicateName(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid denomination: {0}")]
    InvalidDenomination(String),
    #[error("out of range: {0}")]
    Overflow(String),
    #[error("corrupt data in {}: {reason}", path.display())]
    CorruptData { path: PathBuf, reason: String },
    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub(crate) fn corrupt(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::CorruptData { path: path.into(), reason: reason.to_string() }
    }
}

impl From<ModelError> for ServiceError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::InvalidName(name) => Self::InvalidName(name),
            ModelError::InvalidDenomination(key) => Self::InvalidDenomination(key),
            overflow @ ModelError::Overflow { .. } => Self::Overflow(overflow.to_string()),
        }
    }
}
