//! Database-specific error types and conversions.

use netgrid_core::error::NetgridError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Row decode failed: {0}")]
    Decode(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },
}

impl From<DbError> for NetgridError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => NetgridError::NotFound { entity, id },
            other => NetgridError::Database(other.to_string()),
        }
    }
}

/// UUIDs are stored as strings; a malformed one is a decode error.
pub(crate) fn parse_uuid(value: &str) -> Result<uuid::Uuid, DbError> {
    uuid::Uuid::parse_str(value).map_err(|e| DbError::Decode(format!("invalid UUID '{value}': {e}")))
}
