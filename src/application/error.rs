use thiserror::Error;

use crate::application::archive::ArchiveError;
use crate::config::LoadError;
use crate::infra::error::InfraError;
use crate::store::StoreError;

/// Top-level application failure, reported once at process exit.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error")]
    Config(#[from] LoadError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Archive(#[from] ArchiveError),
    #[error("failed to encode JSON output")]
    Json(#[from] serde_json::Error),
    #[error("{message}")]
    Usage { message: String },
    #[error("{files} file(s) failed validation")]
    ChecksFailed { files: usize },
}

impl AppError {
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }
}
