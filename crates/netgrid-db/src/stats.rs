//! Tenant detail statistics.
//!
//! Ad-hoc composition of per-entity counts for a tenant detail view;
//! each count is an independent query against the tenant reference.

use netgrid_core::error::NetgridResult;
use netgrid_core::models::inventory::{Device, Rack, Site};
use surrealdb::{Connection, Surreal};
use uuid::Uuid;

use crate::repository::ScopedRepository;

/// Object counts for a tenant detail view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TenantStats {
    pub site_count: u64,
    pub rack_count: u64,
    pub device_count: u64,
}

/// Counts inventory objects referencing `tenant_id`, per entity type.
pub async fn tenant_stats<C: Connection>(
    db: &Surreal<C>,
    tenant_id: Uuid,
) -> NetgridResult<TenantStats> {
    let sites: ScopedRepository<C, Site> = ScopedRepository::new(db.clone());
    let racks: ScopedRepository<C, Rack> = ScopedRepository::new(db.clone());
    let devices: ScopedRepository<C, Device> = ScopedRepository::new(db.clone());

    Ok(TenantStats {
        site_count: sites.count_for_tenant(tenant_id).await?,
        rack_count: racks.count_for_tenant(tenant_id).await?,
        device_count: devices.count_for_tenant(tenant_id).await?,
    })
}
