use std::time::Duration;

/// Reasons the environment cannot be turned into a [`ServerConfig`]
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Variable present but unparsable
    #[error("Invalid value {value:?} for {name}: {reason}")]
    InvalidValue {
        /// Variable name
        name: &'static str,
        /// Value found
        value: String,
        /// What was expected
        reason: &'static str,
    },
}

/// Runtime settings read from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind (`HOST`)
    pub host: String,
    /// Port to bind (`PORT`)
    pub port: u16,
    /// Per-request timeout for upstream reservation sites (`UPSTREAM_TIMEOUT_SECS`)
    pub upstream_timeout: Duration,
    /// User agent sent upstream (`UPSTREAM_USER_AGENT`)
    pub user_agent: String,
    /// Recreation.gov API base (`REC_GOV_BASE_URL`)
    pub rec_gov_base_url: String,
    /// RIDB facility directory base (`RIDB_BASE_URL`)
    pub ridb_base_url: String,
    /// RIDB API key (`RIDB_API_KEY`); lookups are sent unauthenticated without it
    pub ridb_api_key: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            upstream_timeout: Duration::from_secs(30),
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36".to_string(),
            rec_gov_base_url: rec_gov::DEFAULT_BASE_URL.to_string(),
            ridb_base_url: rec_gov::RIDB_BASE_URL.to_string(),
            ridb_api_key: None,
        }
    }
}

impl ServerConfig {
    /// Reads the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from any variable source; unset or blank variables keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(host) = get("HOST") {
            config.host = host;
        }
        if let Some(port) = get("PORT") {
            config.port = port.trim().parse().map_err(|_| ConfigError::InvalidValue {
                name: "PORT",
                value: port.clone(),
                reason: "expected a port number",
            })?;
        }
        if let Some(secs) = get("UPSTREAM_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| ConfigError::InvalidValue {
                name: "UPSTREAM_TIMEOUT_SECS",
                value: secs.clone(),
                reason: "expected a whole number of seconds",
            })?;
            config.upstream_timeout = Duration::from_secs(secs);
        }
        if let Some(user_agent) = get("UPSTREAM_USER_AGENT") {
            config.user_agent = user_agent;
        }
        if let Some(base_url) = get("REC_GOV_BASE_URL") {
            config.rec_gov_base_url = base_url;
        }
        if let Some(base_url) = get("RIDB_BASE_URL") {
            config.ridb_base_url = base_url;
        }
        config.ridb_api_key = get("RIDB_API_KEY").map(|key| key.trim().to_string());

        Ok(config)
    }

    /// `host:port` pair for binding
    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.bind_address(), ("0.0.0.0".to_string(), 8000));
        assert_eq!(config.rec_gov_base_url, "https://www.recreation.gov/api");
        assert_eq!(config.ridb_base_url, "https://ridb.recreation.gov/api/v1");
        assert_eq!(config.ridb_api_key, None);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "9090"),
            ("UPSTREAM_TIMEOUT_SECS", "5"),
            ("REC_GOV_BASE_URL", "http://localhost:4000/api"),
            ("UPSTREAM_USER_AGENT", "  "),
            ("RIDB_API_KEY", " abc-123 "),
        ])
        .unwrap();

        assert_eq!(config.bind_address(), ("127.0.0.1".to_string(), 9090));
        assert_eq!(config.upstream_timeout, Duration::from_secs(5));
        assert_eq!(config.rec_gov_base_url, "http://localhost:4000/api");
        assert_eq!(config.user_agent, ServerConfig::default().user_agent);
        assert_eq!(config.ridb_api_key.as_deref(), Some("abc-123"));
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            config_from(&[("PORT", "eighty")]).unwrap_err(),
            ConfigError::InvalidValue {
                name: "PORT",
                value: "eighty".into(),
                reason: "expected a port number",
            }
        );
        assert!(config_from(&[("UPSTREAM_TIMEOUT_SECS", "-1")]).is_err());
    }
}
