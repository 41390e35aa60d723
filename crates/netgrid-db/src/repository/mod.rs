//! SurrealDB repository implementations.

mod inventory;
mod scoped;
mod tenant;
mod tenant_group;

pub use scoped::{ScopedRecord, ScopedRepository};
pub use tenant::SurrealTenantRepository;
pub use tenant_group::SurrealTenantGroupRepository;
