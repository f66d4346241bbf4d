//! Database connection setup
//!
//! The whole application lives in one SQLite file. Foreign keys are enforced
//! on every pooled connection and the schema ships as embedded migrations.

use std::{path::PathBuf, str::FromStr, time::Duration};

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::config::DatabaseConfig;
use crate::error::AppResult;

/// Open the connection pool described by `config`, creating the database
/// file (and its directory) when missing, then apply migrations if enabled.
pub async fn connect(config: &DatabaseConfig) -> AppResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    let in_memory = config.url.contains(":memory:");
    let options = if in_memory {
        options
    } else {
        let filename: PathBuf = options.clone().get_filename().to_path_buf();
        if let Some(parent) = filename.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(anyhow::Error::from)?;
            }
        }
        options.journal_mode(SqliteJournalMode::Wal)
    };

    // An in-memory database only lives as long as its connection
    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
    };

    let pool = pool_options
        .acquire_timeout(Duration::from_secs(30))
        .connect_with(options)
        .await?;

    if config.run_migrations {
        migrate(&pool).await?;
    }

    Ok(pool)
}

/// Apply the embedded schema migrations
pub async fn migrate(pool: &SqlitePool) -> AppResult<()> {
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Migrations completed");
    Ok(())
}
