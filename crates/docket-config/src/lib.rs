//! # docket-config
//!
//! Layered configuration loading for Docket using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`DOCKET_*` prefix, `__` as separator)
//! 2. Project-level `.docket/config.toml`
//! 3. User-level `~/.config/docket/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `DOCKET_SERVER__PORT` -> `server.port`,
//! `DOCKET_BLOB__ACCESS_KEY_ID` -> `blob.access_key_id`, etc. The `__`
//! (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use docket_config::DocketConfig;
//!
//! // Load from all sources (dotenvy + TOML + env):
//! let config = DocketConfig::load_with_dotenv().expect("config");
//!
//! if config.blob.is_configured() {
//!     println!("Blob endpoint: {}", config.blob.endpoint);
//! }
//! ```
//!
//! The config is constructed once at process start and passed to each
//! component; nothing reads it from ambient global state.

mod blob;
mod database;
mod enrichment;
mod error;
mod server;

pub use blob::BlobConfig;
pub use database::DatabaseConfig;
pub use enrichment::EnrichmentConfig;
pub use error::ConfigError;
pub use server::ServerConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DocketConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub blob: BlobConfig,
    #[serde(default)]
    pub enrichment: EnrichmentConfig,
}

impl DocketConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// Precedence (highest to lowest):
    /// 1. Environment variables (`DOCKET_*` prefix)
    /// 2. `.docket/config.toml` (project-local)
    /// 3. `~/.config/docket/config.toml` (user-global)
    /// 4. Default values
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] when extraction fails.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration with `.env` file support.
    ///
    /// Calls `dotenvy` to load the `.env` file from the workspace root before
    /// building the figment. This is the typical entry point for the server
    /// binary and tests.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] when extraction fails.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".docket/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment = figment.merge(Env::prefixed("DOCKET_").split("__"));

        figment
    }

    /// Startup validation for the server: blob storage is required; the
    /// enrichment section is optional (the caller decides whether to warn).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] when the blob section is missing
    /// required fields.
    pub fn ensure_ready(&self) -> Result<(), ConfigError> {
        if !self.blob.is_configured() {
            return Err(ConfigError::NotConfigured {
                section: "blob".to_string(),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("docket").join("config.toml"))
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if available) or current dir looking
    /// for a `.env` file. Silently does nothing if no `.env` is found.
    fn load_dotenv_from_workspace() {
        // In tests/build: CARGO_MANIFEST_DIR points to the crate dir.
        // Walk up to find workspace root's .env.
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // Walk up at most 3 levels (crate -> crates/ -> workspace root)
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        // Fallback: try current directory
        let _ = dotenvy::dotenv();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_loads() {
        let config = DocketConfig::default();
        assert!(!config.database.is_remote());
        assert!(!config.blob.is_configured());
        assert!(!config.enrichment.is_configured());
        assert_eq!(config.server.port, 8001);
    }

    #[test]
    fn figment_builds_without_files() {
        figment::Jail::expect_with(|_jail| {
            let config: DocketConfig = DocketConfig::figment().extract()?;
            assert!(!config.blob.is_configured());
            assert_eq!(config.server.host, "0.0.0.0");
            Ok(())
        });
    }

    #[test]
    fn env_vars_override_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("DOCKET_SERVER__PORT", "9100");
            jail.set_env("DOCKET_BLOB__ENDPOINT", "https://storage.example.com");
            let config: DocketConfig = DocketConfig::figment().extract()?;
            assert_eq!(config.server.port, 9100);
            assert_eq!(config.blob.endpoint, "https://storage.example.com");
            Ok(())
        });
    }

    #[test]
    fn project_toml_layers_under_env() {
        figment::Jail::expect_with(|jail| {
            jail.create_dir(".docket")?;
            jail.create_file(
                ".docket/config.toml",
                r#"
                [server]
                port = 9200

                [enrichment]
                api_url = "https://api.example.com/v1/chat/completions"
                api_key = "from-toml"
                "#,
            )?;
            jail.set_env("DOCKET_ENRICHMENT__API_KEY", "from-env");
            let config: DocketConfig = DocketConfig::figment().extract()?;
            assert_eq!(config.server.port, 9200);
            assert_eq!(config.enrichment.api_key, "from-env");
            assert!(config.enrichment.is_configured());
            Ok(())
        });
    }

    #[test]
    fn ensure_ready_requires_blob() {
        let config = DocketConfig::default();
        assert!(matches!(
            config.ensure_ready(),
            Err(ConfigError::NotConfigured { ref section }) if section == "blob"
        ));

        let mut ready = DocketConfig::default();
        ready.blob.endpoint = "https://storage.example.com".into();
        ready.blob.access_key_id = "key".into();
        ready.blob.secret_access_key = "secret".into();
        assert!(ready.ensure_ready().is_ok());
    }
}
