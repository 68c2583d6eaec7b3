//! Proxy configuration, read from the environment.

use crate::error::ProxyError;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
    pub max_redirects: usize,
    pub timeout: Duration,
    pub cache_size: usize,
    pub user_agent: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            max_redirects: 10,
            timeout: Duration::from_secs(15),
            cache_size: 512,
            user_agent: concat!("atlasmap-proxy/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ProxyConfig {
    pub fn from_env() -> Result<Self, ProxyError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from a key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ProxyError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("ATLAS_PROXY_HOST") {
            config.host = host;
        }
        if let Some(port) = parse_var(&lookup, "PORT")? {
            config.port = port;
        }
        if let Some(max_redirects) = parse_var(&lookup, "ATLAS_PROXY_MAX_REDIRECTS")? {
            config.max_redirects = max_redirects;
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, "ATLAS_PROXY_TIMEOUT_SECS")? {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(cache_size) = parse_var(&lookup, "ATLAS_PROXY_CACHE_SIZE")? {
            config.cache_size = cache_size;
        }
        if let Some(user_agent) = lookup("ATLAS_PROXY_USER_AGENT") {
            config.user_agent = user_agent;
        }
        Ok(config)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ProxyError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| ProxyError::Config(format!("{}='{}': {}", key, raw, e))),
        None => Ok(None),
    }
}
