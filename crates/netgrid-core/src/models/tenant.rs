//! Tenant and tenant-group domain models.
//!
//! Tenants partition inventory data for multi-customer deployments.
//! Tenant groups collect tenants and carry the access lists the scoping
//! predicates evaluate.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An arbitrary collection of tenants.
///
/// The access lists grant principals visibility into the group and all
/// tenants it owns: membership in any of `access_groups`, or a direct
/// entry in `access_users`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantGroup {
    pub id: Uuid,
    /// Human-readable name, unique across groups.
    pub name: String,
    /// URL-safe unique identifier (e.g. `hosting-customers`).
    pub slug: String,
    /// Auth groups whose members may see this group's tenants.
    pub access_groups: BTreeSet<Uuid>,
    /// Individual principals who may see this group's tenants.
    pub access_users: BTreeSet<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a new tenant group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTenantGroup {
    pub name: String,
    pub slug: String,
    pub access_groups: BTreeSet<Uuid>,
    pub access_users: BTreeSet<Uuid>,
}

/// Fields that can be updated on an existing tenant group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTenantGroup {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub access_groups: Option<BTreeSet<Uuid>>,
    pub access_users: Option<BTreeSet<Uuid>>,
}

/// A tenant represents an organization served by the inventory owner,
/// typically a customer or an internal department.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    /// Owning group. Deleting a group detaches its tenants (sets this to
    /// `None`), never cascades.
    pub group_id: Option<Uuid>,
    /// Long-form name (optional).
    pub description: String,
    /// Free-form comments.
    pub comments: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a new tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTenant {
    pub name: String,
    pub slug: String,
    pub group_id: Option<Uuid>,
    pub description: String,
    pub comments: String,
}

/// Fields that can be updated on an existing tenant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTenant {
    pub name: Option<String>,
    pub slug: Option<String>,
    /// `Some(Some(id))` = set, `Some(None)` = clear, `None` = no change.
    pub group_id: Option<Option<Uuid>>,
    pub description: Option<String>,
    pub comments: Option<String>,
}
