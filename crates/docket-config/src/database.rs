//! Document store (libSQL) configuration.

use serde::{Deserialize, Serialize};

fn default_path() -> String {
    String::from("docket.db")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Local database file path. Used when no remote URL is configured.
    #[serde(default = "default_path")]
    pub path: String,

    /// Remote database URL (e.g., `libsql://docket.example.turso.io`).
    #[serde(default)]
    pub url: String,

    /// Auth token for the remote database.
    #[serde(default)]
    pub auth_token: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            url: String::new(),
            auth_token: String::new(),
        }
    }
}

impl DatabaseConfig {
    /// Check if remote mode has the minimum required fields.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        !self.url.is_empty() && !self.auth_token.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_local() {
        let config = DatabaseConfig::default();
        assert!(!config.is_remote());
        assert_eq!(config.path, "docket.db");
    }

    #[test]
    fn remote_requires_url_and_token() {
        let config = DatabaseConfig {
            url: "libsql://docket.example.turso.io".into(),
            auth_token: "token123".into(),
            ..Default::default()
        };
        assert!(config.is_remote());
    }
}
