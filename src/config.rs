use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;

/// Environment variable that overrides `jwt.secret` from the YAML file.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    pub gateway: GatewayConfig,
    pub jwt: JwtConfig,
    /// PostgreSQL connection URL. Without it the in-memory stores are used.
    #[serde(default)]
    pub postgres_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed by CORS (the React dev server by default)
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
    /// When false, listing and fetching books also require a bearer token
    #[serde(default = "default_public_book_listing")]
    pub public_book_listing: bool,
    /// Upper bound for every store call, in milliseconds
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_origins: default_cors_origins(),
            public_book_listing: default_public_book_listing(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:5173".to_string()]
}

fn default_public_book_listing() -> bool {
    true
}

fn default_request_timeout_ms() -> u64 {
    5_000
}

/// Bearer token signing parameters
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct JwtConfig {
    #[serde(default)]
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    #[serde(default = "default_lifetime_hours")]
    pub lifetime_hours: i64,
}

/// Upper bound on `jwt.lifetime_hours`
pub const MAX_TOKEN_LIFETIME_HOURS: i64 = 24;

fn default_lifetime_hours() -> i64 {
    6
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            issuer: "bookerx".to_string(),
            audience: "bookerx-frontend".to_string(),
            lifetime_hours: default_lifetime_hours(),
        }
    }
}

impl AppConfig {
    pub fn load(env: &str) -> Result<Self> {
        let config_path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path))?;
        let mut config: AppConfig =
            serde_yaml::from_str(&content).context("Failed to parse config yaml")?;

        if let Ok(secret) = std::env::var(JWT_SECRET_ENV) {
            config.jwt.secret = secret;
        }
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.jwt.secret.is_empty() {
            bail!(
                "jwt.secret is empty; set it in the config file or via {}",
                JWT_SECRET_ENV
            );
        }
        if !(1..=MAX_TOKEN_LIFETIME_HOURS).contains(&self.jwt.lifetime_hours) {
            bail!(
                "jwt.lifetime_hours must be between 1 and {}",
                MAX_TOKEN_LIFETIME_HOURS
            );
        }
        Ok(())
    }
}
