//! Principal domain model.
//!
//! A principal is the identity — authenticated or anonymous — evaluated
//! for authorization. Principals are owned by the request lifecycle: the
//! identity layer builds one per request and it is never persisted here.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The identity making a request.
///
/// An unauthenticated request is represented by a fully-formed
/// [`Principal::anonymous`] value with empty membership sets — never by
/// an absent principal — so call sites need no null checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// `None` for the anonymous principal.
    pub id: Option<Uuid>,
    pub username: String,
    pub is_superuser: bool,
    /// Tenants this principal belongs to. Identity-layer data used for
    /// default-tenant selection; does not by itself grant query access.
    pub tenant_memberships: BTreeSet<Uuid>,
    /// Auth groups this principal belongs to, matched against tenant
    /// group access lists.
    pub group_memberships: BTreeSet<Uuid>,
    /// Named permission bits granted by the identity layer.
    pub permissions: BTreeSet<String>,
}

impl Principal {
    /// The well-formed anonymous principal: no id, empty memberships,
    /// never a superuser.
    pub fn anonymous() -> Self {
        Self {
            id: None,
            username: String::new(),
            is_superuser: false,
            tenant_memberships: BTreeSet::new(),
            group_memberships: BTreeSet::new(),
            permissions: BTreeSet::new(),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.id.is_none()
    }

    /// Permission check primitive. Superusers hold every permission.
    pub fn has_permission(&self, name: &str) -> bool {
        self.is_superuser || self.permissions.contains(name)
    }
}

impl Default for Principal {
    fn default() -> Self {
        Self::anonymous()
    }
}
