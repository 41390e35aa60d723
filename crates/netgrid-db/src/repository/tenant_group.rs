//! SurrealDB implementation of [`TenantGroupRepository`].

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use netgrid_core::context::RequestContext;
use netgrid_core::error::{NetgridError, NetgridResult};
use netgrid_core::models::tenant::{CreateTenantGroup, TenantGroup, UpdateTenantGroup};
use netgrid_core::repository::{ListOptions, PaginatedResult, TenantGroupRepository};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::{DbError, parse_uuid};
use crate::repository::scoped::{ScopedRecord, ScopedRepository};
use crate::scope::{ScopeResolver, ScopeTarget};

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
pub struct TenantGroupRow {
    name: String,
    slug: String,
    access_groups: Vec<String>,
    access_users: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TenantGroupRow {
    fn into_tenant_group(self, id: Uuid) -> Result<TenantGroup, DbError> {
        Ok(TenantGroup {
            id,
            name: self.name,
            slug: self.slug,
            access_groups: parse_uuid_set(&self.access_groups)?,
            access_users: parse_uuid_set(&self.access_users)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// DB-side row struct that includes the record ID via `record::id(id)`.
#[derive(Debug, SurrealValue)]
pub struct TenantGroupRowWithId {
    record_id: String,
    name: String,
    slug: String,
    access_groups: Vec<String>,
    access_users: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TenantGroupRowWithId {
    fn try_into_tenant_group(self) -> Result<TenantGroup, DbError> {
        Ok(TenantGroup {
            id: parse_uuid(&self.record_id)?,
            name: self.name,
            slug: self.slug,
            access_groups: parse_uuid_set(&self.access_groups)?,
            access_users: parse_uuid_set(&self.access_users)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn parse_uuid_set(values: &[String]) -> Result<BTreeSet<Uuid>, DbError> {
    values.iter().map(|v| parse_uuid(v)).collect()
}

fn uuid_strings(ids: &BTreeSet<Uuid>) -> Vec<String> {
    ids.iter().map(Uuid::to_string).collect()
}

impl ScopedRecord for TenantGroup {
    const TABLE: &'static str = "tenant_group";
    const SCOPE_TARGET: ScopeTarget = ScopeTarget::TenantGroups;
    const SCOPE_COLUMN: &'static str = "record::id(id)";
    const ORDER_FIELDS: &'static [&'static str] = &["name", "slug"];
    type Row = TenantGroupRowWithId;

    fn from_row(row: Self::Row) -> Result<Self, DbError> {
        row.try_into_tenant_group()
    }

    fn order_key(&self, field: &str) -> &str {
        match field {
            "slug" => &self.slug,
            _ => &self.name,
        }
    }
}

/// SurrealDB implementation of the tenant-group repository.
#[derive(Clone)]
pub struct SurrealTenantGroupRepository<C: Connection> {
    db: Surreal<C>,
    resolver: ScopeResolver<C>,
    scoped: ScopedRepository<C, TenantGroup>,
}

impl<C: Connection> SurrealTenantGroupRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self {
            resolver: ScopeResolver::new(db.clone()),
            scoped: ScopedRepository::new(db.clone()),
            db,
        }
    }
}

impl<C: Connection> TenantGroupRepository for SurrealTenantGroupRepository<C> {
    async fn create(&self, input: CreateTenantGroup) -> NetgridResult<TenantGroup> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('tenant_group', $id) SET \
                 name = $name, slug = $slug, \
                 access_groups = $access_groups, \
                 access_users = $access_users",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("slug", input.slug))
            .bind(("access_groups", uuid_strings(&input.access_groups)))
            .bind(("access_users", uuid_strings(&input.access_users)))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<TenantGroupRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "tenant_group".into(),
            id: id_str,
        })?;

        Ok(row.into_tenant_group(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> NetgridResult<TenantGroup> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('tenant_group', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TenantGroupRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "tenant_group".into(),
            id: id_str,
        })?;

        Ok(row.into_tenant_group(id)?)
    }

    async fn get_by_slug(&self, slug: &str) -> NetgridResult<TenantGroup> {
        let not_found = || NetgridError::NotFound {
            entity: "tenant_group".into(),
            id: slug.into(),
        };

        let mut result = self
            .db
            .query(
                "SELECT record::id(id) AS record_id, * \
                 FROM tenant_group WHERE slug = $slug",
            )
            .bind(("slug", slug.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TenantGroupRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(not_found)?;
        let group = row.try_into_tenant_group()?;

        // Out-of-scope records are indistinguishable from missing ones.
        let scope = self
            .resolver
            .scope_for(&RequestContext::current(), ScopeTarget::TenantGroups)
            .await;
        if !scope.permits(group.id) {
            return Err(not_found());
        }

        Ok(group)
    }

    async fn update(&self, id: Uuid, input: UpdateTenantGroup) -> NetgridResult<TenantGroup> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.slug.is_some() {
            sets.push("slug = $slug");
        }
        if input.access_groups.is_some() {
            sets.push("access_groups = $access_groups");
        }
        if input.access_users.is_some() {
            sets.push("access_users = $access_users");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('tenant_group', $id) SET {}",
            sets.join(", "),
        );

        let mut builder = self.db.query(query).bind(("id", id_str.clone()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(slug) = input.slug {
            builder = builder.bind(("slug", slug));
        }
        if let Some(access_groups) = input.access_groups {
            builder = builder.bind(("access_groups", uuid_strings(&access_groups)));
        }
        if let Some(access_users) = input.access_users {
            builder = builder.bind(("access_users", uuid_strings(&access_users)));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<TenantGroupRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "tenant_group".into(),
            id: id_str,
        })?;

        Ok(row.into_tenant_group(id)?)
    }

    async fn delete(&self, id: Uuid) -> NetgridResult<()> {
        // Owned tenants are detached, never deleted.
        self.db
            .query(
                "UPDATE tenant SET group_id = NONE, updated_at = time::now() \
                 WHERE group_id = $id; \
                 DELETE type::record('tenant_group', $id);",
            )
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(&self, opts: ListOptions) -> NetgridResult<PaginatedResult<TenantGroup>> {
        self.scoped.list(&opts).await
    }
}
