//! Access-scope resolution against stored access lists.
//!
//! Turns the current principal into a compiled [`AccessScope`] for a
//! target collection by loading tenant-group access lists and applying
//! the pure predicates from `netgrid-core`. Resolution never fails:
//! anything that prevents establishing access — an anonymous principal,
//! a storage error mid-resolution — denies rather than leaks.

use netgrid_core::access::{self, AccessScope, GroupAccess};
use netgrid_core::models::principal::Principal;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::warn;
use uuid::Uuid;

use crate::error::{DbError, parse_uuid};

/// Which collection a scope filter targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeTarget {
    /// Tenant groups, filtered by their own id.
    TenantGroups,
    /// Tenants, filtered by their own id.
    Tenants,
    /// Any tenant-scoped entity, filtered by its `tenant_id` reference.
    /// Scoping is transitive through the tenant relationship, so this
    /// resolves to the same id set as [`ScopeTarget::Tenants`].
    TenantRefs,
}

#[derive(Debug, SurrealValue)]
struct GroupAccessRow {
    record_id: String,
    access_groups: Vec<String>,
    access_users: Vec<String>,
}

impl GroupAccessRow {
    fn try_into_access(self) -> Result<GroupAccess, DbError> {
        Ok(GroupAccess {
            id: parse_uuid(&self.record_id)?,
            access_groups: self
                .access_groups
                .iter()
                .map(|v| parse_uuid(v))
                .collect::<Result<_, _>>()?,
            access_users: self
                .access_users
                .iter()
                .map(|v| parse_uuid(v))
                .collect::<Result<_, _>>()?,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct TenantRefRow {
    record_id: String,
    group_id: Option<String>,
}

/// Resolves principals into compiled access filters.
#[derive(Clone)]
pub struct ScopeResolver<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> ScopeResolver<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    /// The access filter for `principal` over `target`.
    ///
    /// Superuser status short-circuits to [`AccessScope::Unrestricted`]
    /// before anything else. Anonymous principals and resolution-time
    /// storage failures degrade to [`AccessScope::Denied`].
    pub async fn scope_for(&self, principal: &Principal, target: ScopeTarget) -> AccessScope {
        if principal.is_superuser {
            return AccessScope::Unrestricted;
        }
        if principal.is_anonymous() {
            return AccessScope::Denied;
        }
        match self.resolve(principal, target).await {
            Ok(scope) => scope,
            Err(err) => {
                warn!(error = %err, ?target, "Access scope resolution failed; denying");
                AccessScope::Denied
            }
        }
    }

    async fn resolve(
        &self,
        principal: &Principal,
        target: ScopeTarget,
    ) -> Result<AccessScope, DbError> {
        let groups = self.group_access_lists().await?;
        let group_scope = access::group_scope(principal, &groups);
        match target {
            ScopeTarget::TenantGroups => Ok(group_scope),
            ScopeTarget::Tenants | ScopeTarget::TenantRefs => {
                let tenants = self.tenant_group_refs().await?;
                Ok(access::tenant_scope_from_groups(&group_scope, tenants))
            }
        }
    }

    async fn group_access_lists(&self) -> Result<Vec<GroupAccess>, DbError> {
        let mut result = self
            .db
            .query(
                "SELECT record::id(id) AS record_id, access_groups, access_users \
                 FROM tenant_group",
            )
            .await?;
        let rows: Vec<GroupAccessRow> = result.take(0)?;
        rows.into_iter()
            .map(GroupAccessRow::try_into_access)
            .collect()
    }

    async fn tenant_group_refs(&self) -> Result<Vec<(Uuid, Option<Uuid>)>, DbError> {
        let mut result = self
            .db
            .query("SELECT record::id(id) AS record_id, group_id FROM tenant")
            .await?;
        let rows: Vec<TenantRefRow> = result.take(0)?;
        rows.into_iter()
            .map(|row| {
                let tenant_id = parse_uuid(&row.record_id)?;
                let group_id = row.group_id.as_deref().map(parse_uuid).transpose()?;
                Ok((tenant_id, group_id))
            })
            .collect()
    }
}
