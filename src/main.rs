//! BookerX - Book Marketplace Backend
//!
//! ```text
//! ┌──────────┐    ┌──────────┐    ┌──────────────┐    ┌────────────┐
//! │  Config  │───▶│ Gateway  │───▶│ Auth / Books │───▶│ PostgreSQL │
//! │  (YAML)  │    │  (axum)  │    │  services    │    │ or memory  │
//! └──────────┘    └──────────┘    └──────────────┘    └────────────┘
//! ```

use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;

use bookerx::books::repository::PgBookRepository;
use bookerx::books::store::{BookStore, MemoryBookStore};
use bookerx::db::{Database, schema};
use bookerx::gateway::{self, state::AppState};
use bookerx::user_auth::repository::PgUserRepository;
use bookerx::user_auth::store::{MemoryUserStore, UserStore};

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

/// Get port override from command line (--port argument)
fn get_port_override() -> Option<u16> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--port" && i + 1 < args.len() {
            return args[i + 1].parse().ok();
        }
    }
    None
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let mut app_config = bookerx::AppConfig::load(&env)?;
    let _log_guard = bookerx::logging::init_logging(&app_config);

    tracing::info!(
        "Starting BookerX {} in {} mode",
        gateway::handlers::GIT_HASH,
        env
    );

    if let Some(port) = get_port_override() {
        app_config.gateway.port = port;
    }
    let gateway_config = app_config.gateway.clone();
    let timeout = Duration::from_millis(gateway_config.request_timeout_ms);

    let (users, books): (Arc<dyn UserStore>, Arc<dyn BookStore>) = match &app_config.postgres_url
    {
        Some(url) => {
            let db = Database::connect(url, timeout)
                .await
                .context("Failed to connect to PostgreSQL")?;
            schema::init_schema(db.pool())
                .await
                .context("Failed to initialize schema")?;
            (
                Arc::new(PgUserRepository::new(&db)),
                Arc::new(PgBookRepository::new(&db)),
            )
        }
        None => {
            tracing::warn!("postgres_url not set; using in-memory stores (data is lost on exit)");
            (
                Arc::new(MemoryUserStore::new()),
                Arc::new(MemoryBookStore::new()),
            )
        }
    };

    let state = Arc::new(AppState::with_stores(users, books, &app_config.jwt));
    gateway::run_server(state, &gateway_config).await
}
