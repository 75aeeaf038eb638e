//! Database pool configuration, migrations, and the HTTP serve loop.

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::http::http_router;
use crate::config::CONFIG;
use crate::state::AppState;

/// Create an optimized SQLite connection pool
pub async fn create_optimized_pool(database_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    SqlitePoolOptions::new()
        // SQLite is single-writer, but can have multiple readers
        .max_connections(CONFIG.sqlite_max_connections)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .max_lifetime(Duration::from_secs(1800))
        .idle_timeout(Duration::from_secs(600))
        .connect_with(options)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to database: {}", e))
}

/// Apply any pending migrations, tracked in SQLite's `_sqlx_migrations`.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;

    info!("Migrations complete");
    Ok(())
}

/// Bind and serve the admin API until the process exits.
pub async fn serve(app_state: Arc<AppState>) -> Result<()> {
    let app = http_router(app_state).layer(TraceLayer::new_for_http());

    let bind_address = CONFIG.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Admin API listening on http://{}", bind_address);

    axum::serve(listener, app).await?;
    Ok(())
}
