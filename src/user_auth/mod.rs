//! Accounts, credentials and bearer-token authentication

pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod policy;
pub mod repository;
pub mod service;
pub mod store;
pub mod token;

pub use models::{Role, User};
pub use service::UserAuthService;
pub use token::{Identity, TokenIssuer, TokenVerifier};
