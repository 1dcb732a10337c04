//! Migrate command - schema management against a live database.

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::Database;

/// Apply the requested schema action.
pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    // The migrate command controls the schema itself, so connect without
    // the automatic migration run the server performs
    let db = Database::connect_without_migrations(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;

    let outcome = match args.action {
        MigrateAction::Up => db.run_migrations().await.map(|_| "migrations applied"),
        MigrateAction::Down => db
            .rollback_migration()
            .await
            .map(|_| "last migration rolled back"),
        MigrateAction::Fresh => {
            tracing::warn!("Dropping all tables before re-running migrations");
            db.fresh_migrations().await.map(|_| "schema rebuilt")
        }
        MigrateAction::Status => {
            for (name, applied) in db
                .migration_status()
                .await
                .map_err(|e| AppError::internal(e.to_string()))?
            {
                println!("[{}] {}", if applied { "x" } else { " " }, name);
            }
            return Ok(());
        }
    };

    let message = outcome.map_err(|e| AppError::internal(e.to_string()))?;
    tracing::info!("{}", message);
    Ok(())
}
