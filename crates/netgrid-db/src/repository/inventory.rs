//! Storage descriptions for tenant-scoped inventory entities.
//!
//! These entities are read through `ScopedRepository` only; their
//! write paths belong to the CRUD layer above this crate.

use chrono::{DateTime, Utc};
use netgrid_core::models::inventory::{Device, Rack, Site};
use surrealdb_types::SurrealValue;

use crate::error::{DbError, parse_uuid};
use crate::repository::scoped::ScopedRecord;
use crate::scope::ScopeTarget;

#[derive(Debug, SurrealValue)]
pub struct SiteRow {
    record_id: String,
    name: String,
    slug: String,
    tenant_id: Option<String>,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ScopedRecord for Site {
    const TABLE: &'static str = "site";
    const SCOPE_TARGET: ScopeTarget = ScopeTarget::TenantRefs;
    const SCOPE_COLUMN: &'static str = "tenant_id";
    const ORDER_FIELDS: &'static [&'static str] = &["name", "slug"];
    type Row = SiteRow;

    fn from_row(row: Self::Row) -> Result<Self, DbError> {
        Ok(Site {
            id: parse_uuid(&row.record_id)?,
            name: row.name,
            slug: row.slug,
            tenant_id: row.tenant_id.as_deref().map(parse_uuid).transpose()?,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    fn order_key(&self, field: &str) -> &str {
        match field {
            "slug" => &self.slug,
            _ => &self.name,
        }
    }
}

#[derive(Debug, SurrealValue)]
pub struct RackRow {
    record_id: String,
    site_id: String,
    name: String,
    tenant_id: Option<String>,
    u_height: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ScopedRecord for Rack {
    const TABLE: &'static str = "rack";
    const SCOPE_TARGET: ScopeTarget = ScopeTarget::TenantRefs;
    const SCOPE_COLUMN: &'static str = "tenant_id";
    const ORDER_FIELDS: &'static [&'static str] = &["name"];
    type Row = RackRow;

    fn from_row(row: Self::Row) -> Result<Self, DbError> {
        Ok(Rack {
            id: parse_uuid(&row.record_id)?,
            site_id: parse_uuid(&row.site_id)?,
            name: row.name,
            tenant_id: row.tenant_id.as_deref().map(parse_uuid).transpose()?,
            u_height: row.u_height,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    fn order_key(&self, _field: &str) -> &str {
        &self.name
    }
}

#[derive(Debug, SurrealValue)]
pub struct DeviceRow {
    record_id: String,
    name: String,
    site_id: String,
    rack_id: Option<String>,
    tenant_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ScopedRecord for Device {
    const TABLE: &'static str = "device";
    const SCOPE_TARGET: ScopeTarget = ScopeTarget::TenantRefs;
    const SCOPE_COLUMN: &'static str = "tenant_id";
    const ORDER_FIELDS: &'static [&'static str] = &["name"];
    type Row = DeviceRow;

    fn from_row(row: Self::Row) -> Result<Self, DbError> {
        Ok(Device {
            id: parse_uuid(&row.record_id)?,
            name: row.name,
            site_id: parse_uuid(&row.site_id)?,
            rack_id: row.rack_id.as_deref().map(parse_uuid).transpose()?,
            tenant_id: row.tenant_id.as_deref().map(parse_uuid).transpose()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    fn order_key(&self, _field: &str) -> &str {
        &self.name
    }
}
