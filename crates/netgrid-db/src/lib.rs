//! NetGrid Database — SurrealDB connection management, migrations, and
//! the scoped repository implementations.
//!
//! This crate provides:
//! - Connection management ([`DbManager`], [`DbConfig`])
//! - Schema initialization and migrations ([`run_migrations`])
//! - Access-scope resolution against stored access lists
//!   ([`ScopeResolver`])
//! - Repositories composing scoping and natural ordering
//!   ([`repository`])
//! - Tenant detail statistics ([`tenant_stats`])
//! - Error types ([`DbError`])

mod connection;
mod error;
mod schema;
mod scope;
mod stats;

pub mod repository;

pub use connection::{DbConfig, DbManager};
pub use error::DbError;
pub use schema::{run_migrations, schema_v1};
pub use scope::{ScopeResolver, ScopeTarget};
pub use stats::{TenantStats, tenant_stats};
