use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use chrono::Utc;
use sqlx::Error as SqlxError;
use sqlx::migrate::MigrateError as SqlxMigrateError;
use thiserror::Error;

use crate::core::DbContext;

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Failed to run embedded migrations")]
    EmbeddedMigrationFailed { #[source] source: SqlxMigrateError },

    #[error("Failed to create migrator")]
    MigratorCreationFailed { #[source] source: SqlxMigrateError },

    #[error("Failed to run migrations")]
    MigrationRunFailed { #[source] source: SqlxMigrateError },

    #[error("Failed to fetch applied migrations")]
    FetchAppliedMigrationsFailed { #[source] source: SqlxError },

    #[error("No migrations applied yet")]
    NoMigrationsApplied,

    #[error("File system error")]
    FileSystemError(#[from] std::io::Error),
}

/// Runs the migrations that are compiled into the binary.
pub async fn run_embedded(db: &DbContext) -> Result<(), MigrationError> {
    sqlx::migrate!()
        .run(db)
        .await
        .map_err(|e| MigrationError::EmbeddedMigrationFailed { source: e })?;
    Ok(())
}

/// Runs all migrations from the filesystem migration path, falling back to
/// the embedded set when the directory is absent (e.g. in a deployed binary).
pub async fn run(db: &DbContext, migrations_path: &Path) -> Result<(), MigrationError> {
    if migrations_path.exists() {
        sqlx::migrate::Migrator::new(migrations_path)
            .await
            .map_err(|e| MigrationError::MigratorCreationFailed { source: e })?
            .run(db)
            .await
            .map_err(|e| MigrationError::MigrationRunFailed { source: e })?;
    } else {
        tracing::warn!(
            "Migrations directory not found at {:?}, falling back to embedded migrations",
            migrations_path
        );
        run_embedded(db).await?;
    }

    tracing::info!("Database migrations completed successfully");
    Ok(())
}

/// Create a new migration file with the current timestamp
pub fn create(name: &str) -> Result<String, MigrationError> {
    let migrations_dir = migrations_dir();

    // Create migrations directory if it doesn't exist
    if !migrations_dir.exists() {
        fs::create_dir_all(migrations_dir)?;
    }

    // Generate a timestamp in the format YYYYMMDDHHMMSS
    let timestamp = Utc::now().format("%Y%m%d%H%M%S").to_string();
    let filename = format!("{}_{}.sql", timestamp, name.replace(' ', "_").to_lowercase());
    let filepath = migrations_dir.join(&filename);

    // Create the migration file with template content
    let mut file = File::create(&filepath)?;
    writeln!(file, "-- Migration: {name}")?;
    writeln!(file, "--")?;
    writeln!(file, "-- Add migration script here")?;

    tracing::info!("Created new migration file: {}", filepath.display());
    Ok(filename)
}

/// List all available migrations
pub fn list() -> Result<Vec<String>, MigrationError> {
    let migrations_dir = migrations_dir();

    if !migrations_dir.exists() {
        return Ok(Vec::new());
    }

    let mut migrations = Vec::new();
    for entry in fs::read_dir(migrations_dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "sql") {
            if let Some(filename) = path.file_name().and_then(|f| f.to_str()) {
                migrations.push(filename.to_string());
            }
        }
    }

    migrations.sort();
    Ok(migrations)
}

/// Check if migrations need to be applied
pub async fn check_pending(db: &DbContext) -> Result<bool, MigrationError> {
    let applied_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(db)
        .await
        .map_err(|err| match &err {
            sqlx::Error::Database(db_err) if db_err.message().contains("no such table") => {
                MigrationError::NoMigrationsApplied
            }
            _ => MigrationError::FetchAppliedMigrationsFailed { source: err },
        })?;

    let available = list()?;
    Ok(available.len() as i64 > applied_count)
}

/// The on-disk migrations directory, whether running from the workspace root
/// or from inside the backend crate.
pub fn migrations_dir() -> &'static Path {
    if Path::new("backend").exists() {
        Path::new("backend/migrations")
    } else {
        Path::new("migrations")
    }
}
