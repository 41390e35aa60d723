//! NetGrid Core — domain models and the access-control query layer
//! shared across all crates.
//!
//! This crate provides:
//! - Domain models ([`models`]): principals, tenants, tenant groups,
//!   and tenant-scoped inventory entities
//! - Request-scoped principal binding ([`context::RequestContext`])
//! - Access-scope predicates ([`access`])
//! - Natural (numeric-aware) ordering keys ([`natural`])
//! - Repository trait definitions ([`repository`])
//! - Error types ([`error::NetgridError`])
//!
//! Storage-engine integration lives in `netgrid-db`.

pub mod access;
pub mod context;
pub mod error;
pub mod models;
pub mod natural;
pub mod repository;
