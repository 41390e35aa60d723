//! SurrealDB implementation of [`TenantRepository`].

use chrono::{DateTime, Utc};
use netgrid_core::context::RequestContext;
use netgrid_core::error::{NetgridError, NetgridResult};
use netgrid_core::models::tenant::{CreateTenant, Tenant, UpdateTenant};
use netgrid_core::repository::{ListOptions, PaginatedResult, TenantRepository};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::{DbError, parse_uuid};
use crate::repository::scoped::{ScopedRecord, ScopedRepository};
use crate::scope::{ScopeResolver, ScopeTarget};

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
pub struct TenantRow {
    name: String,
    slug: String,
    group_id: Option<String>,
    description: String,
    comments: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TenantRow {
    fn into_tenant(self, id: Uuid) -> Result<Tenant, DbError> {
        Ok(Tenant {
            id,
            name: self.name,
            slug: self.slug,
            group_id: self.group_id.as_deref().map(parse_uuid).transpose()?,
            description: self.description,
            comments: self.comments,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// DB-side row struct that includes the record ID via `record::id(id)`.
#[derive(Debug, SurrealValue)]
pub struct TenantRowWithId {
    record_id: String,
    name: String,
    slug: String,
    group_id: Option<String>,
    description: String,
    comments: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TenantRowWithId {
    fn try_into_tenant(self) -> Result<Tenant, DbError> {
        Ok(Tenant {
            id: parse_uuid(&self.record_id)?,
            name: self.name,
            slug: self.slug,
            group_id: self.group_id.as_deref().map(parse_uuid).transpose()?,
            description: self.description,
            comments: self.comments,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl ScopedRecord for Tenant {
    const TABLE: &'static str = "tenant";
    const SCOPE_TARGET: ScopeTarget = ScopeTarget::Tenants;
    const SCOPE_COLUMN: &'static str = "record::id(id)";
    const ORDER_FIELDS: &'static [&'static str] = &["name", "slug"];
    type Row = TenantRowWithId;

    fn from_row(row: Self::Row) -> Result<Self, DbError> {
        row.try_into_tenant()
    }

    fn order_key(&self, field: &str) -> &str {
        match field {
            "slug" => &self.slug,
            _ => &self.name,
        }
    }
}

/// SurrealDB implementation of the tenant repository.
#[derive(Clone)]
pub struct SurrealTenantRepository<C: Connection> {
    db: Surreal<C>,
    resolver: ScopeResolver<C>,
    scoped: ScopedRepository<C, Tenant>,
}

impl<C: Connection> SurrealTenantRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self {
            resolver: ScopeResolver::new(db.clone()),
            scoped: ScopedRepository::new(db.clone()),
            db,
        }
    }
}

impl<C: Connection> TenantRepository for SurrealTenantRepository<C> {
    async fn create(&self, input: CreateTenant) -> NetgridResult<Tenant> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('tenant', $id) SET \
                 name = $name, slug = $slug, group_id = $group_id, \
                 description = $description, comments = $comments",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("slug", input.slug))
            .bind(("group_id", input.group_id.map(|g| g.to_string())))
            .bind(("description", input.description))
            .bind(("comments", input.comments))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<TenantRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "tenant".into(),
            id: id_str,
        })?;

        Ok(row.into_tenant(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> NetgridResult<Tenant> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('tenant', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TenantRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "tenant".into(),
            id: id_str,
        })?;

        Ok(row.into_tenant(id)?)
    }

    async fn get_by_slug(&self, slug: &str) -> NetgridResult<Tenant> {
        let not_found = || NetgridError::NotFound {
            entity: "tenant".into(),
            id: slug.into(),
        };

        let mut result = self
            .db
            .query(
                "SELECT record::id(id) AS record_id, * \
                 FROM tenant WHERE slug = $slug",
            )
            .bind(("slug", slug.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TenantRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(not_found)?;
        let tenant = row.try_into_tenant()?;

        // Out-of-scope records are indistinguishable from missing ones.
        let scope = self
            .resolver
            .scope_for(&RequestContext::current(), ScopeTarget::Tenants)
            .await;
        if !scope.permits(tenant.id) {
            return Err(not_found());
        }

        Ok(tenant)
    }

    async fn update(&self, id: Uuid, input: UpdateTenant) -> NetgridResult<Tenant> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.slug.is_some() {
            sets.push("slug = $slug");
        }
        if input.group_id.is_some() {
            sets.push("group_id = $group_id");
        }
        if input.description.is_some() {
            sets.push("description = $description");
        }
        if input.comments.is_some() {
            sets.push("comments = $comments");
        }
        sets.push("updated_at = time::now()");

        let query = format!("UPDATE type::record('tenant', $id) SET {}", sets.join(", "));

        let mut builder = self.db.query(query).bind(("id", id_str.clone()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(slug) = input.slug {
            builder = builder.bind(("slug", slug));
        }
        if let Some(group_id) = input.group_id {
            // `Some(None)` clears the group reference.
            builder = builder.bind(("group_id", group_id.map(|g| g.to_string())));
        }
        if let Some(description) = input.description {
            builder = builder.bind(("description", description));
        }
        if let Some(comments) = input.comments {
            builder = builder.bind(("comments", comments));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<TenantRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "tenant".into(),
            id: id_str,
        })?;

        Ok(row.into_tenant(id)?)
    }

    async fn delete(&self, id: Uuid) -> NetgridResult<()> {
        self.db
            .query("DELETE type::record('tenant', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(&self, opts: ListOptions) -> NetgridResult<PaginatedResult<Tenant>> {
        self.scoped.list(&opts).await
    }
}
