//! Error types for the NetGrid system.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NetgridError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Database error: {0}")]
    Database(String),
}

pub type NetgridResult<T> = Result<T, NetgridError>;
