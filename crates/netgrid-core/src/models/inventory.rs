//! Tenant-scoped inventory domain models.
//!
//! Any inventory object carrying an optional tenant reference can be
//! access-scoped; these are the entity types the generic scoped
//! repository serves.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Capability of any inventory object referencing an owning tenant.
///
/// Scoping is transitive through this reference: an entity is visible
/// when its tenant is. Entities with no tenant are visible only to
/// superusers.
pub trait TenantScoped {
    fn tenant_id(&self) -> Option<Uuid>;
}

/// A physical location holding racks and devices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub tenant_id: Option<Uuid>,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TenantScoped for Site {
    fn tenant_id(&self) -> Option<Uuid> {
        self.tenant_id
    }
}

/// An equipment rack within a site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rack {
    pub id: Uuid,
    pub site_id: Uuid,
    pub name: String,
    pub tenant_id: Option<Uuid>,
    /// Height in rack units.
    pub u_height: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TenantScoped for Rack {
    fn tenant_id(&self) -> Option<Uuid> {
        self.tenant_id
    }
}

/// A piece of equipment installed in a site, optionally racked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub id: Uuid,
    pub name: String,
    pub site_id: Uuid,
    pub rack_id: Option<Uuid>,
    pub tenant_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TenantScoped for Device {
    fn tenant_id(&self) -> Option<Uuid> {
        self.tenant_id
    }
}
