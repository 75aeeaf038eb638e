// src/error.rs
// Domain error taxonomy shared by the batch processors and the HTTP surface.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AyuniError {
    /// Query/connection failure. Aborts the current batch call.
    #[error("persistence failure: {0}")]
    Persistence(#[from] sqlx::Error),

    /// Referenced entity missing. Skipped per item, never fatal to a batch.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Text-generation collaborator failure. Counted and skipped per item.
    #[error("external service failure: {0}")]
    ExternalService(String),

    /// Stored data failed validation at the persistence boundary.
    #[error("invalid stored data: {0}")]
    InvalidData(String),
}

impl AyuniError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound { kind, id: id.into() }
    }

    pub fn external(message: impl Into<String>) -> Self {
        Self::ExternalService(message.into())
    }
}

pub type Result<T> = std::result::Result<T, AyuniError>;
