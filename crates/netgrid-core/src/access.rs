//! Access-scope predicates.
//!
//! Builds the filter restricting a query's result set to the records a
//! principal is authorized to see. Superuser status short-circuits all
//! scoping, checked first and unconditionally. A principal whose shape
//! cannot be evaluated — the anonymous principal has no id — degrades to
//! "match nothing" rather than raising, so callers always get a valid,
//! possibly empty, result set.

use std::collections::BTreeSet;

use uuid::Uuid;

use crate::models::principal::Principal;
use crate::models::tenant::TenantGroup;

/// A compiled access filter, applied to a query by the storage layer or
/// evaluated in-language against loaded records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessScope {
    /// No filtering (superusers).
    Unrestricted,
    /// Match nothing.
    Denied,
    /// Match records whose scope id is in this set.
    Ids(BTreeSet<Uuid>),
}

impl AccessScope {
    pub fn is_unrestricted(&self) -> bool {
        matches!(self, AccessScope::Unrestricted)
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, AccessScope::Denied)
    }

    /// Whether a record with this scope id passes the filter.
    pub fn permits(&self, id: Uuid) -> bool {
        match self {
            AccessScope::Unrestricted => true,
            AccessScope::Denied => false,
            AccessScope::Ids(ids) => ids.contains(&id),
        }
    }

    /// Records with no scope id (ungrouped tenants, untenanted
    /// inventory) pass only an unrestricted filter.
    pub fn permits_opt(&self, id: Option<Uuid>) -> bool {
        match id {
            Some(id) => self.permits(id),
            None => self.is_unrestricted(),
        }
    }
}

/// The slice of a tenant group the access predicate consults.
#[derive(Debug, Clone)]
pub struct GroupAccess {
    pub id: Uuid,
    pub access_groups: BTreeSet<Uuid>,
    pub access_users: BTreeSet<Uuid>,
}

impl GroupAccess {
    /// Whether `principal` may see this group and the tenants it owns:
    /// a direct access-user entry, or membership in any access group.
    pub fn permits(&self, principal: &Principal) -> bool {
        let Some(user_id) = principal.id else {
            return false;
        };
        self.access_users.contains(&user_id)
            || !self.access_groups.is_disjoint(&principal.group_memberships)
    }
}

impl From<&TenantGroup> for GroupAccess {
    fn from(group: &TenantGroup) -> Self {
        Self {
            id: group.id,
            access_groups: group.access_groups.clone(),
            access_users: group.access_users.clone(),
        }
    }
}

/// Scope over tenant groups for `principal`.
pub fn group_scope<'a, I>(principal: &Principal, groups: I) -> AccessScope
where
    I: IntoIterator<Item = &'a GroupAccess>,
{
    if principal.is_superuser {
        return AccessScope::Unrestricted;
    }
    if principal.is_anonymous() {
        return AccessScope::Denied;
    }
    AccessScope::Ids(
        groups
            .into_iter()
            .filter(|g| g.permits(principal))
            .map(|g| g.id)
            .collect(),
    )
}

/// Lifts a group scope to the tenants owned by permitted groups, given
/// `(tenant_id, group_id)` pairs. Ungrouped tenants are excluded for
/// non-superusers.
pub fn tenant_scope_from_groups<I>(groups: &AccessScope, tenants: I) -> AccessScope
where
    I: IntoIterator<Item = (Uuid, Option<Uuid>)>,
{
    match groups {
        AccessScope::Unrestricted => AccessScope::Unrestricted,
        AccessScope::Denied => AccessScope::Denied,
        AccessScope::Ids(ids) => AccessScope::Ids(
            tenants
                .into_iter()
                .filter(|(_, group_id)| group_id.is_some_and(|g| ids.contains(&g)))
                .map(|(tenant_id, _)| tenant_id)
                .collect(),
        ),
    }
}
