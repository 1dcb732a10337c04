//! Serve command - runs the HTTP API.

use std::sync::Arc;

use crate::api::{create_router, AppState};
use crate::cli::args::ServeArgs;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::Database;

/// Run the API server until the process is stopped.
pub async fn execute(args: ServeArgs, config: Config) -> AppResult<()> {
    let database = Arc::new(Database::connect(&config).await);

    // Explicit dependency chain: config -> database -> services -> router
    let state = AppState::from_config(database, config);
    let app = create_router(state);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))
}
