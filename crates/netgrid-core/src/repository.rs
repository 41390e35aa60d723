//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async and read-only unless named
//! otherwise. Listing is controlled by [`ListOptions`]: scoping applies
//! the access predicate for the current request principal, and natural
//! ordering applies numeric-aware sorting to a designated text field.

use uuid::Uuid;

use crate::error::NetgridResult;
use crate::models::tenant::{
    CreateTenant, CreateTenantGroup, Tenant, TenantGroup, UpdateTenant, UpdateTenantGroup,
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

/// Options controlling a list query.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Restrict results to what the current request principal may see.
    /// Scoping that cannot be evaluated degrades to an empty result.
    pub scoped: bool,
    /// Fields to order by; the last is ordered naturally
    /// (numeric-aware), preceding ones lexicographically. Unknown field
    /// names are a configuration error, reported before any query runs.
    pub natural_order_by: Vec<String>,
    pub pagination: Pagination,
}

impl ListOptions {
    /// Listing scoped to the current request principal.
    pub fn scoped() -> Self {
        Self {
            scoped: true,
            ..Self::default()
        }
    }
}

pub trait TenantGroupRepository: Send + Sync {
    fn create(
        &self,
        input: CreateTenantGroup,
    ) -> impl Future<Output = NetgridResult<TenantGroup>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = NetgridResult<TenantGroup>> + Send;
    /// Access-checked detail lookup: records outside the current request
    /// principal's scope are reported as not found.
    fn get_by_slug(&self, slug: &str) -> impl Future<Output = NetgridResult<TenantGroup>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateTenantGroup,
    ) -> impl Future<Output = NetgridResult<TenantGroup>> + Send;
    /// Detaches owned tenants (their `group_id` becomes `None`) before
    /// deleting; never cascades.
    fn delete(&self, id: Uuid) -> impl Future<Output = NetgridResult<()>> + Send;
    fn list(
        &self,
        opts: ListOptions,
    ) -> impl Future<Output = NetgridResult<PaginatedResult<TenantGroup>>> + Send;
}

pub trait TenantRepository: Send + Sync {
    fn create(&self, input: CreateTenant) -> impl Future<Output = NetgridResult<Tenant>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = NetgridResult<Tenant>> + Send;
    /// Access-checked detail lookup: records outside the current request
    /// principal's scope are reported as not found.
    fn get_by_slug(&self, slug: &str) -> impl Future<Output = NetgridResult<Tenant>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateTenant,
    ) -> impl Future<Output = NetgridResult<Tenant>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = NetgridResult<()>> + Send;
    fn list(
        &self,
        opts: ListOptions,
    ) -> impl Future<Output = NetgridResult<PaginatedResult<Tenant>>> + Send;
}
