//! # Server Configuration
//!
//! Layered configuration: an optional `atlas.toml` next to the binary,
//! overridden by `ATLAS_`-prefixed environment variables.
//!
//! ```text
//! atlas.toml            ATLAS_LISTEN_ADDR=0.0.0.0:8080
//!     │                        │
//!     └────────┬───────────────┘
//!              ▼
//!        ServerConfig
//! ```

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Development fallback secret. `main` warns loudly when it is in use.
pub const DEFAULT_JWT_SECRET: &str = "atlas-dev-secret-change-me";

/// Runtime configuration for the API server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind, e.g. "127.0.0.1:8080".
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// HS256 signing secret for session tokens.
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,

    /// Token lifetime in hours.
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
}

fn default_listen_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_database_path() -> String {
    "atlas.db".to_string()
}

fn default_jwt_secret() -> String {
    DEFAULT_JWT_SECRET.to_string()
}

fn default_token_ttl_hours() -> i64 {
    12
}

impl ServerConfig {
    /// Loads configuration from `atlas.toml` (optional) and environment
    /// variables prefixed with `ATLAS_`.
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("atlas").required(false))
            .add_source(Environment::with_prefix("ATLAS"))
            .build()?
            .try_deserialize()
    }

    /// Whether the config still carries the development JWT secret.
    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            listen_addr: default_listen_addr(),
            database_path: default_database_path(),
            jwt_secret: default_jwt_secret(),
            token_ttl_hours: default_token_ttl_hours(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.listen_addr, "127.0.0.1:8080");
        assert_eq!(config.token_ttl_hours, 12);
        assert!(config.uses_default_secret());
    }
}
