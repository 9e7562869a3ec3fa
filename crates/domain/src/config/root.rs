use rand::RngCore;
use serde::{Deserialize, Serialize};

use super::errors::ConfigError;
use super::eviction::EvictionConfig;
use super::observability::ObservabilityConfig;
use super::server::ServerConfig;

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    pub server: ServerConfig,

    #[serde(default)]
    pub eviction: EvictionConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new("hookd.toml").exists() {
            Self::from_file("hookd.toml")?
        } else if std::path::Path::new("/etc/hookd/config.toml").exists() {
            Self::from_file("/etc/hookd/config.toml")?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        config.apply_cli_overrides(cli_overrides);
        config.synthesize_auth_token_if_missing();
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// `HOOKD_*` environment overrides, applied between file and CLI flags —
    /// the same precedence order as the CLI-override pass below.
    fn apply_env_overrides(&mut self) {
        if let Ok(domain) = std::env::var("HOOKD_DOMAIN") {
            self.server.domain = domain;
        }
        if let Ok(token) = std::env::var("HOOKD_API_AUTH_TOKEN") {
            self.server.api.auth_token = token;
        }
        if let Ok(port) = std::env::var("HOOKD_DNS_PORT").ok().and_then(|v| v.parse().ok()) {
            self.server.dns.port = port;
        }
        if let Ok(port) = std::env::var("HOOKD_HTTP_PORT").ok().and_then(|v| v.parse().ok()) {
            self.server.http.port = port;
        }
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(domain) = overrides.domain {
            self.server.domain = domain;
        }
        if let Some(port) = overrides.dns_port {
            self.server.dns.port = port;
        }
        if let Some(port) = overrides.http_port {
            self.server.http.port = port;
        }
        if let Some(enabled) = overrides.https_enabled {
            self.server.https.enabled = enabled;
        }
        if let Some(level) = overrides.log_level {
            if let Ok(parsed) = toml::from_str::<super::observability::LogLevel>(&format!(
                "\"{}\"",
                level.to_lowercase()
            )) {
                self.observability.log_level = parsed;
            }
        }
    }

    /// `server.api.auth_token` is empty ⇒ mint a random 32-hex token (spec §6).
    /// Logged once, at `warn!` so it survives default log-level filtering.
    fn synthesize_auth_token_if_missing(&mut self) {
        if self.server.api.auth_token.is_empty() {
            let mut bytes = [0u8; 16];
            rand::thread_rng().fill_bytes(&mut bytes);
            let token = hex::encode(bytes);
            tracing::warn!(auth_token = %token, "no server.api.auth_token configured; generated one for this run");
            self.server.api.auth_token = token;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.domain.trim().is_empty() {
            return Err(ConfigError::Validation(
                "server.domain is required".to_string(),
            ));
        }
        if self.server.dns.enabled && self.server.dns.port == 0 {
            return Err(ConfigError::Validation("DNS port cannot be 0".to_string()));
        }
        if self.eviction.max_per_hook == 0 {
            return Err(ConfigError::Validation(
                "eviction.max_per_hook must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub domain: Option<String>,
    pub dns_port: Option<u16>,
    pub http_port: Option<u16>,
    pub https_enabled: Option<bool>,
    pub log_level: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_auth_token_is_synthesized() {
        let mut config = Config {
            server: ServerConfig {
                domain: "hookd.test.local".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.server.api.auth_token.is_empty());
        config.synthesize_auth_token_if_missing();
        assert_eq!(config.server.api.auth_token.len(), 32);
    }

    #[test]
    fn validate_rejects_empty_domain() {
        let config = Config::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn cli_overrides_take_precedence_over_file_defaults() {
        let mut config = Config::default();
        config.apply_cli_overrides(CliOverrides {
            domain: Some("override.test".to_string()),
            dns_port: Some(5300),
            http_port: None,
            https_enabled: None,
            log_level: None,
        });
        assert_eq!(config.server.domain, "override.test");
        assert_eq!(config.server.dns.port, 5300);
    }
}
