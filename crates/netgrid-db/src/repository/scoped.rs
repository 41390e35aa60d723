//! Generic access-scoped, naturally-ordered listing.
//!
//! The single place callers obtain filtered/ordered collections: any
//! entity describing its storage via [`ScopedRecord`] gets scoping (per
//! the current request principal) and natural ordering as composable
//! list options. Listing never mutates; scoping that cannot be
//! established yields an empty result, while misconfiguration (an
//! unknown ordering field) fails fast before any query runs.

use std::marker::PhantomData;

use netgrid_core::access::AccessScope;
use netgrid_core::context::RequestContext;
use netgrid_core::error::{NetgridError, NetgridResult};
use netgrid_core::natural::natural_cmp;
use netgrid_core::repository::{ListOptions, PaginatedResult, Pagination};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;
use crate::scope::{ScopeResolver, ScopeTarget};

/// Storage description of an entity servable by [`ScopedRepository`].
pub trait ScopedRecord: Sized + Send + Sync {
    /// Table the entity lives in.
    const TABLE: &'static str;
    /// How the access filter applies to this entity.
    const SCOPE_TARGET: ScopeTarget;
    /// Column the access filter's id set matches against.
    const SCOPE_COLUMN: &'static str;
    /// Fields ordering may target. The first is the default engine-side
    /// ordering.
    const ORDER_FIELDS: &'static [&'static str];
    /// Row shape fetched from storage.
    type Row: SurrealValue + Send;

    fn from_row(row: Self::Row) -> Result<Self, DbError>;

    /// Value of an orderable field; `field` is always one of
    /// [`ScopedRecord::ORDER_FIELDS`].
    fn order_key(&self, field: &str) -> &str;
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// Read-only listing over any [`ScopedRecord`], composing the access
/// predicate and natural ordering.
#[derive(Clone)]
pub struct ScopedRepository<C: Connection, T> {
    db: Surreal<C>,
    resolver: ScopeResolver<C>,
    _entity: PhantomData<fn() -> T>,
}

impl<C: Connection, T: ScopedRecord> ScopedRepository<C, T> {
    pub fn new(db: Surreal<C>) -> Self {
        let resolver = ScopeResolver::new(db.clone());
        Self {
            db,
            resolver,
            _entity: PhantomData,
        }
    }

    /// Lists entities per `opts`.
    pub async fn list(&self, opts: &ListOptions) -> NetgridResult<PaginatedResult<T>> {
        validate_order_fields::<T>(&opts.natural_order_by)?;

        let scope = if opts.scoped {
            self.resolver
                .scope_for(&RequestContext::current(), T::SCOPE_TARGET)
                .await
        } else {
            AccessScope::Unrestricted
        };

        if scope.is_denied() {
            return Ok(empty_page(&opts.pagination));
        }

        match opts.natural_order_by.split_last() {
            None => self.list_engine_ordered(opts, &scope).await,
            Some((natural_field, leading_fields)) => {
                self.list_naturally_ordered(opts, &scope, natural_field, leading_fields)
                    .await
            }
        }
    }

    /// Count of records referencing `tenant_id`, for ad-hoc composition
    /// (e.g. tenant detail statistics).
    pub async fn count_for_tenant(&self, tenant_id: Uuid) -> NetgridResult<u64> {
        let query = format!(
            "SELECT count() AS total FROM {} \
             WHERE tenant_id = $tenant_id GROUP ALL",
            T::TABLE,
        );
        let mut result = self
            .db
            .query(query)
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;
        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }

    /// Engine-side ordering and pagination (no natural-order fields).
    async fn list_engine_ordered(
        &self,
        opts: &ListOptions,
        scope: &AccessScope,
    ) -> NetgridResult<PaginatedResult<T>> {
        let filter = scope_filter::<T>(scope);
        let scope_ids = scope_id_strings(scope);
        let order_field = T::ORDER_FIELDS.first().copied().unwrap_or("name");

        let count_query = format!("SELECT count() AS total FROM {} {} GROUP ALL", T::TABLE, filter);
        let mut count_q = self.db.query(count_query);
        if let Some(ids) = &scope_ids {
            count_q = count_q.bind(("scope_ids", ids.clone()));
        }
        let mut count_result = count_q.await.map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let page_query = format!(
            "SELECT record::id(id) AS record_id, * FROM {} {} \
             ORDER BY {} ASC LIMIT $limit START $offset",
            T::TABLE,
            filter,
            order_field,
        );
        let mut page_q = self
            .db
            .query(page_query)
            .bind(("limit", opts.pagination.limit))
            .bind(("offset", opts.pagination.offset));
        if let Some(ids) = scope_ids {
            page_q = page_q.bind(("scope_ids", ids));
        }
        let mut result = page_q.await.map_err(DbError::from)?;
        let rows: Vec<T::Row> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(T::from_row)
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: opts.pagination.offset,
            limit: opts.pagination.limit,
        })
    }

    /// In-language natural ordering: fetches the filtered set, sorts by
    /// the derived three-part keys, then paginates. The portable path —
    /// every engine produces the same ordering.
    async fn list_naturally_ordered(
        &self,
        opts: &ListOptions,
        scope: &AccessScope,
        natural_field: &str,
        leading_fields: &[String],
    ) -> NetgridResult<PaginatedResult<T>> {
        let filter = scope_filter::<T>(scope);
        let scope_ids = scope_id_strings(scope);

        let query = format!(
            "SELECT record::id(id) AS record_id, * FROM {} {}",
            T::TABLE, filter,
        );
        let mut q = self.db.query(query);
        if let Some(ids) = scope_ids {
            q = q.bind(("scope_ids", ids));
        }
        let mut result = q.await.map_err(DbError::from)?;
        let rows: Vec<T::Row> = result.take(0).map_err(DbError::from)?;
        let mut items = rows
            .into_iter()
            .map(T::from_row)
            .collect::<Result<Vec<_>, DbError>>()?;

        items.sort_by(|a, b| {
            leading_fields
                .iter()
                .map(|field| a.order_key(field).cmp(b.order_key(field)))
                .find(|ordering| ordering.is_ne())
                .unwrap_or_else(|| natural_cmp(a.order_key(natural_field), b.order_key(natural_field)))
        });

        let total = items.len() as u64;
        let items = items
            .into_iter()
            .skip(opts.pagination.offset as usize)
            .take(opts.pagination.limit as usize)
            .collect();

        Ok(PaginatedResult {
            items,
            total,
            offset: opts.pagination.offset,
            limit: opts.pagination.limit,
        })
    }
}

fn empty_page<T>(pagination: &Pagination) -> PaginatedResult<T> {
    PaginatedResult {
        items: Vec::new(),
        total: 0,
        offset: pagination.offset,
        limit: pagination.limit,
    }
}

/// Unknown ordering fields are a configuration error, caught before any
/// query runs.
fn validate_order_fields<T: ScopedRecord>(fields: &[String]) -> NetgridResult<()> {
    for field in fields {
        if !T::ORDER_FIELDS.contains(&field.as_str()) {
            return Err(NetgridError::Config {
                message: format!(
                    "unknown natural-order field '{}' on {}",
                    field,
                    T::TABLE,
                ),
            });
        }
    }
    Ok(())
}

fn scope_filter<T: ScopedRecord>(scope: &AccessScope) -> String {
    match scope {
        AccessScope::Ids(_) => format!("WHERE {} INSIDE $scope_ids", T::SCOPE_COLUMN),
        _ => String::new(),
    }
}

fn scope_id_strings(scope: &AccessScope) -> Option<Vec<String>> {
    match scope {
        AccessScope::Ids(ids) => Some(ids.iter().map(Uuid::to_string).collect()),
        _ => None,
    }
}
