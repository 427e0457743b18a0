//! HTTP server configuration.

use serde::{Deserialize, Serialize};

fn default_host() -> String {
    String::from("0.0.0.0")
}

const fn default_port() -> u16 {
    8001
}

/// Default maximum upload size in megabytes.
const fn default_max_upload_mb() -> usize {
    10
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum accepted request body size in megabytes.
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_mb: default_max_upload_mb(),
        }
    }
}

impl ServerConfig {
    /// The address to bind the listener to.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Maximum accepted request body size in bytes.
    #[must_use]
    pub const fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb * 1024 * 1024
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_address(), "0.0.0.0:8001");
        assert_eq!(config.max_upload_bytes(), 10 * 1024 * 1024);
    }
}
