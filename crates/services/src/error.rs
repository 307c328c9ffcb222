//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{BankError, QuizError, QuizSettingsError};
use storage::repository::StorageError;

/// Errors emitted by `QuizSession` and `QuizCatalog`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionServiceError {
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Bank(#[from] BankError),
    #[error(transparent)]
    Settings(#[from] QuizSettingsError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by the model invocation helper.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InvokeError {
    #[error("model invocation is not configured")]
    Disabled,
    #[error("unsupported model provider: {0}")]
    UnsupportedProvider(String),
    #[error("invalid inference parameters: {0}")]
    InvalidParams(String),
    #[error("invalid prompt template: {0}")]
    InvalidTemplate(String),
    #[error("prompt variable {0:?} has no value")]
    MissingVariable(String),
    #[error("model returned an empty response")]
    EmptyResponse,
    #[error("unexpected model response: {0}")]
    MalformedResponse(String),
    #[error("model request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
