//! BookerX - Book Marketplace Backend
//!
//! # Modules
//!
//! - [`config`] - YAML configuration with env overrides
//! - [`logging`] - tracing subscriber setup
//! - [`error`] - Store and application error taxonomy
//! - [`db`] - PostgreSQL pool and schema bootstrap
//! - [`user_auth`] - Password hashing, credential store, JWT issue/verify, authorization policy
//! - [`books`] - Book catalog
//! - [`gateway`] - HTTP router, shared state, OpenAPI

pub mod config;
pub mod db;
pub mod error;
pub mod logging;

pub mod books;
pub mod gateway;
pub mod user_auth;

// Convenient re-exports at crate root
pub use config::AppConfig;
pub use error::{AppError, AppResult, StoreError};
pub use gateway::state::AppState;
pub use user_auth::{Identity, Role};
