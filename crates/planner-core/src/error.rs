//! Error types for the planner.

use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Entity already exists: {entity}")]
    AlreadyExists { entity: String },

    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    #[error("Authorization denied: {reason}")]
    AuthorizationDenied { reason: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cryptography error: {0}")]
    Crypto(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ValidationErrors> for PlannerError {
    fn from(errors: ValidationErrors) -> Self {
        PlannerError::Validation {
            message: errors.to_string(),
        }
    }
}

pub type PlannerResult<T> = Result<T, PlannerError>;
