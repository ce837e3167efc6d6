use crate::common::validation::ValidationErrors;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{model} validation failed: {errors}")]
    Validation {
        model: &'static str,
        errors: ValidationErrors,
    },

    #[error("Cast to ObjectId failed for value \"{value}\" (type string) at path \"{path}\"")]
    Cast { value: String, path: String },

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Invalid request: {0}")]
    Request(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(model: &'static str, errors: ValidationErrors) -> Self {
        Self::Validation { model, errors }
    }

    /// The error name reported in the `error.name` field of a failure envelope.
    pub fn name(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "ValidationError",
            AppError::Cast { .. } => "CastError",
            AppError::Database(_) => "MongoError",
            AppError::Request(_) => "RequestError",
            AppError::Config(_) => "ConfigError",
            AppError::Internal(_) => "Error",
        }
    }

    /// Field-level errors, present only for validation failures.
    pub fn field_errors(&self) -> Option<&ValidationErrors> {
        match self {
            AppError::Validation { errors, .. } => Some(errors),
            _ => None,
        }
    }
}

impl From<crate::pipe::PipeError> for AppError {
    fn from(err: crate::pipe::PipeError) -> Self {
        let crate::pipe::PipeError::Cast { value, path } = err;
        AppError::Cast { value, path }
    }
}
