//! Database migration management for the PostgreSQL storage backend.
//!
//! Migrations are embedded in the binary at compile time for single-binary
//! deployment: no CLI or filesystem access required. Applied migrations are
//! tracked in the `_sqlx_migrations` table and executed in version order.
//!
//! To add a migration, create the SQL file under `migrations/` and add an
//! entry to the `embedded_migrations!` macro below.

use std::borrow::Cow;

use sqlx_core::migrate::{Migration, MigrationType, Migrator};
use sqlx_postgres::PgPool;
use tracing::{info, instrument};

use crate::error::{PostgresError, Result};

/// Embedded migrations, in chronological order.
///
/// Each entry is (version, description, sql).
macro_rules! embedded_migrations {
    () => {
        &[(
            20250610000001i64,
            "initial_schema",
            include_str!("../migrations/20250610000001_initial_schema.sql"),
        )]
    };
}

/// Builds a vector of Migration structs from the embedded migration data.
fn build_migrations() -> Vec<Migration> {
    embedded_migrations!()
        .iter()
        .map(|(version, description, sql)| Migration {
            version: *version,
            description: Cow::Borrowed(description),
            migration_type: MigrationType::Simple,
            sql: Cow::Borrowed(sql),
            checksum: Cow::Borrowed(&[]), // Empty checksum for embedded migrations
            no_tx: false,                 // Run in transaction
        })
        .collect()
}

/// Runs all pending database migrations.
///
/// # Errors
///
/// Returns an error if a migration fails to execute.
#[instrument(skip(pool))]
pub async fn run(pool: &PgPool) -> Result<()> {
    let migrations = build_migrations();
    info!(count = migrations.len(), "Running database migrations (embedded)");

    let migrator = Migrator {
        migrations: Cow::Owned(migrations),
        ignore_missing: false,
        locking: true,
        no_tx: false,
    };

    migrator
        .run(pool)
        .await
        .map_err(|e| PostgresError::Migration(format!("Migration failed: {e}")))?;

    info!("Database migrations completed successfully");

    Ok(())
}
