//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings; access lists are arrays of UUID
//! strings.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Tenant groups (global scope, carry access lists)
-- =======================================================================
DEFINE TABLE tenant_group SCHEMAFULL;
DEFINE FIELD name ON TABLE tenant_group TYPE string;
DEFINE FIELD slug ON TABLE tenant_group TYPE string;
DEFINE FIELD access_groups ON TABLE tenant_group TYPE array<string> \
    DEFAULT [];
DEFINE FIELD access_users ON TABLE tenant_group TYPE array<string> \
    DEFAULT [];
DEFINE FIELD created_at ON TABLE tenant_group TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE tenant_group TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_tenant_group_name ON TABLE tenant_group \
    COLUMNS name UNIQUE;
DEFINE INDEX idx_tenant_group_slug ON TABLE tenant_group \
    COLUMNS slug UNIQUE;

-- =======================================================================
-- Tenants (global scope, optionally owned by a group)
-- =======================================================================
DEFINE TABLE tenant SCHEMAFULL;
DEFINE FIELD name ON TABLE tenant TYPE string;
DEFINE FIELD slug ON TABLE tenant TYPE string;
DEFINE FIELD group_id ON TABLE tenant TYPE option<string>;
DEFINE FIELD description ON TABLE tenant TYPE string DEFAULT '';
DEFINE FIELD comments ON TABLE tenant TYPE string DEFAULT '';
DEFINE FIELD created_at ON TABLE tenant TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE tenant TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_tenant_name ON TABLE tenant COLUMNS name UNIQUE;
DEFINE INDEX idx_tenant_slug ON TABLE tenant COLUMNS slug UNIQUE;
DEFINE INDEX idx_tenant_group ON TABLE tenant COLUMNS group_id;

-- =======================================================================
-- Sites (tenant-scoped)
-- =======================================================================
DEFINE TABLE site SCHEMAFULL;
DEFINE FIELD name ON TABLE site TYPE string;
DEFINE FIELD slug ON TABLE site TYPE string;
DEFINE FIELD tenant_id ON TABLE site TYPE option<string>;
DEFINE FIELD description ON TABLE site TYPE string DEFAULT '';
DEFINE FIELD created_at ON TABLE site TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE site TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_site_slug ON TABLE site COLUMNS slug UNIQUE;
DEFINE INDEX idx_site_tenant ON TABLE site COLUMNS tenant_id;

-- =======================================================================
-- Racks (tenant-scoped, within a site)
-- =======================================================================
DEFINE TABLE rack SCHEMAFULL;
DEFINE FIELD site_id ON TABLE rack TYPE string;
DEFINE FIELD name ON TABLE rack TYPE string;
DEFINE FIELD tenant_id ON TABLE rack TYPE option<string>;
DEFINE FIELD u_height ON TABLE rack TYPE int DEFAULT 42;
DEFINE FIELD created_at ON TABLE rack TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE rack TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_rack_site ON TABLE rack COLUMNS site_id;
DEFINE INDEX idx_rack_tenant ON TABLE rack COLUMNS tenant_id;

-- =======================================================================
-- Devices (tenant-scoped, within a site, optionally racked)
-- =======================================================================
DEFINE TABLE device SCHEMAFULL;
DEFINE FIELD name ON TABLE device TYPE string;
DEFINE FIELD site_id ON TABLE device TYPE string;
DEFINE FIELD rack_id ON TABLE device TYPE option<string>;
DEFINE FIELD tenant_id ON TABLE device TYPE option<string>;
DEFINE FIELD created_at ON TABLE device TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE device TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_device_site ON TABLE device COLUMNS site_id;
DEFINE INDEX idx_device_tenant ON TABLE device COLUMNS tenant_id;
";

// -----------------------------------------------------------------------
// Migration runner
// -----------------------------------------------------------------------

/// Applies all pending migrations.
///
/// Ensures the `_migration` tracking table exists, then applies each
/// migration whose version exceeds the current maximum.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

/// Returns the raw schema DDL for version 1.
///
/// Exposed for testing with in-memory SurrealDB instances that
/// bypass the migration runner.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_v1_is_nonempty() {
        assert!(!SCHEMA_V1.is_empty());
    }

    #[test]
    fn migrations_are_ordered() {
        for window in MIGRATIONS.windows(2) {
            assert!(
                window[0].version < window[1].version,
                "Migrations must be in ascending version order"
            );
        }
    }
}
