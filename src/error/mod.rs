use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Failures raised by the recommendation engine itself.
///
/// These never escape as panics: every engine operation returns them as values and
/// the HTTP or CLI layer decides how to present them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// The catalog source could not be read, parsed or turned into an index.
    #[error("Failed to load catalog from {source_name}: {reason}")]
    LoadFailure { source_name: String, reason: String },

    /// Neither an exact nor a confident fuzzy title match exists.
    #[error("Sorry, couldn't find '{query}' in our database.")]
    NotFound { query: String },

    /// Catalog and similarity matrix disagree about a row index.
    #[error("Similarity row {index} is out of range for a catalog of {size} books")]
    InternalInconsistency { index: usize, size: usize },
}

impl EngineError {
    pub fn load(source_name: impl Into<String>, reason: impl ToString) -> Self {
        EngineError::LoadFailure {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Catalog load error: {0}")]
    LoadError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        let error = ErrorResponse {
            error: self.to_string(),
        };

        match self {
            ApiError::InvalidInput(_) => HttpResponse::BadRequest().json(error),
            ApiError::NotFound(_) => HttpResponse::NotFound().json(error),
            _ => HttpResponse::InternalServerError().json(error),
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            EngineError::LoadFailure { .. } => ApiError::LoadError(err.to_string()),
            EngineError::InternalInconsistency { .. } => ApiError::InternalError(err.to_string()),
        }
    }
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(format!("{:#}", err))
    }
}
