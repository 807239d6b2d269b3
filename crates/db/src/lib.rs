//! SQLite-backed relational store plumbing: pool construction from settings,
//! the module migration runner, and classification of constraint errors so
//! stores can map them onto the domain taxonomy.

use std::str::FromStr;

use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use bookshelf_kernel::settings::DatabaseSettings;
use bookshelf_kernel::Migration;

/// Open a pool against the configured database URL.
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&settings.url)
        .with_context(|| format!("invalid database url '{}'", settings.url))?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .connect_with(options)
        .await
        .with_context(|| "failed to connect to database")?;

    tracing::info!(url = %settings.url, "database pool ready");

    Ok(pool)
}

/// Open an in-memory pool for tests. A single connection is mandatory:
/// every `:memory:` connection is its own database.
pub async fn connect_memory() -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .with_context(|| "invalid in-memory database url")?
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .with_context(|| "failed to open in-memory database")?;

    Ok(pool)
}

/// Apply module migrations in order, recording applied ids in a ledger
/// table so a second run is a no-op.
pub async fn run_migrations(
    pool: &SqlitePool,
    migrations: &[(String, Migration)],
) -> anyhow::Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS _migrations (
            module TEXT NOT NULL,
            id TEXT NOT NULL,
            PRIMARY KEY (module, id)
        )",
    )
    .execute(pool)
    .await
    .with_context(|| "failed to create migration ledger")?;

    for (module, migration) in migrations {
        let applied: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM _migrations WHERE module = ? AND id = ?")
                .bind(module)
                .bind(migration.id)
                .fetch_optional(pool)
                .await
                .with_context(|| "failed to read migration ledger")?;

        if applied.is_some() {
            continue;
        }

        sqlx::raw_sql(migration.up)
            .execute(pool)
            .await
            .with_context(|| format!("failed to apply migration {}/{}", module, migration.id))?;

        sqlx::query("INSERT INTO _migrations (module, id) VALUES (?, ?)")
            .bind(module)
            .bind(migration.id)
            .execute(pool)
            .await
            .with_context(|| "failed to record migration")?;

        tracing::info!(module = %module, id = migration.id, "applied migration");
    }

    Ok(())
}

/// Returns true if the error is a unique constraint violation
/// (Postgres 23505, SQLite 2067, MySQL 1062).
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    database_error_code(err)
        .map(|code| matches!(code.as_str(), "23505" | "2067" | "1062"))
        .unwrap_or(false)
}

/// Returns true if the error is a foreign key constraint violation
/// (Postgres 23503, SQLite 787, MySQL 1452).
pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    database_error_code(err)
        .map(|code| matches!(code.as_str(), "23503" | "787" | "1452"))
        .unwrap_or(false)
}

fn database_error_code(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db) => db.code().map(|code| code.into_owned()),
        _ => None,
    }
}
