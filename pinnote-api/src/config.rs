//! Server Configuration Module
//!
//! Loaded from environment variables with development defaults.

use std::net::SocketAddr;

use crate::error::{ApiError, ApiResult};

pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5555;

/// Settings for the note store service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind (`PINNOTE_API_BIND`).
    pub bind: String,

    /// Listening port (`PORT`, then `PINNOTE_API_PORT`).
    pub port: u16,

    /// Allowed CORS origins (comma-separated in `PINNOTE_CORS_ORIGINS`).
    /// Empty means allow all origins.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> ApiResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> ApiResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind = lookup("PINNOTE_API_BIND")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BIND.to_string());

        let port = match lookup("PORT").or_else(|| lookup("PINNOTE_API_PORT")) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                ApiError::invalid_input(format!("Invalid port value: {}", raw))
            })?,
            None => DEFAULT_PORT,
        };

        let cors_origins = lookup("PINNOTE_CORS_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            bind,
            port,
            cors_origins,
        })
    }

    /// Socket address the server listens on.
    pub fn bind_addr(&self) -> ApiResult<SocketAddr> {
        let addr = format!("{}:{}", self.bind, self.port);
        addr.parse::<SocketAddr>().map_err(|e| {
            ApiError::invalid_input(format!("Invalid bind address {}: {}", addr, e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() -> ApiResult<()> {
        let config = ServerConfig::from_lookup(lookup_from(&[]))?;
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.bind_addr()?.port(), 5555);
        Ok(())
    }

    #[test]
    fn test_port_prefers_port_over_pinnote_port() -> ApiResult<()> {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("PORT", "8080"),
            ("PINNOTE_API_PORT", "9090"),
        ]))?;
        assert_eq!(config.port, 8080);

        let config = ServerConfig::from_lookup(lookup_from(&[("PINNOTE_API_PORT", "9090")]))?;
        assert_eq!(config.port, 9090);
        Ok(())
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let result = ServerConfig::from_lookup(lookup_from(&[("PORT", "not-a-port")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_cors_origins_are_split_and_trimmed() -> ApiResult<()> {
        let config = ServerConfig::from_lookup(lookup_from(&[(
            "PINNOTE_CORS_ORIGINS",
            "https://notes.example, http://localhost:3000,,",
        )]))?;
        assert_eq!(
            config.cors_origins,
            vec!["https://notes.example", "http://localhost:3000"]
        );
        Ok(())
    }

    #[test]
    fn test_bad_bind_address() {
        let config = ServerConfig {
            bind: "not an address".to_string(),
            ..ServerConfig::default()
        };
        assert!(config.bind_addr().is_err());
    }
}
