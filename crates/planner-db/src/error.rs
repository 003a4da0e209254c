//! Database-specific error types and conversions.

use planner_core::error::PlannerError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Query rejected: {0}")]
    Query(String),

    #[error("Corrupt record: {0}")]
    Decode(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Record already exists: {entity}")]
    AlreadyExists { entity: String },
}

impl From<DbError> for PlannerError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => PlannerError::NotFound { entity, id },
            DbError::AlreadyExists { entity } => PlannerError::AlreadyExists { entity },
            other => PlannerError::Database(other.to_string()),
        }
    }
}
