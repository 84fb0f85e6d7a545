//! Console configuration read from the environment.

use crate::error::ConfigError;

pub const CATALOGUE_URL: &str = "CATALOGUE_URL";
pub const CATALOGUE_TIMEOUT_SECS: &str = "CATALOGUE_TIMEOUT_SECS";
pub const CONSOLE_CHANNEL_BUFFER: &str = "CONSOLE_CHANNEL_BUFFER";

/// Which catalogue backend the console talks to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Backend {
    /// Seeded in-memory catalogue, for demos and local work
    #[default]
    Memory,
    /// REST catalogue service at the given base URL
    Http { base_url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub backend: Backend,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Mailbox size for every actor in the console
    pub channel_buffer: usize,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Memory,
            timeout_secs: 30,
            channel_buffer: 32,
        }
    }
}

impl ConsoleConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, so tests need not touch
    /// the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = lookup(CATALOGUE_URL).filter(|u| !u.trim().is_empty()) {
            config = config.with_http(url.trim());
        }
        if let Some(raw) = lookup(CATALOGUE_TIMEOUT_SECS) {
            config = config.with_timeout(parse_positive(CATALOGUE_TIMEOUT_SECS, &raw)?);
        }
        if let Some(raw) = lookup(CONSOLE_CHANNEL_BUFFER) {
            config = config.with_channel_buffer(parse_positive(CONSOLE_CHANNEL_BUFFER, &raw)?);
        }

        Ok(config)
    }

    pub fn with_http(mut self, base_url: impl Into<String>) -> Self {
        self.backend = Backend::Http {
            base_url: base_url.into(),
        };
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_channel_buffer(mut self, channel_buffer: usize) -> Self {
        self.channel_buffer = channel_buffer;
        self
    }
}

fn parse_positive<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr + Default + PartialEq,
{
    match raw.trim().parse::<T>() {
        Ok(v) if v != T::default() => Ok(v),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_use_memory_backend() {
        let config = ConsoleConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ConsoleConfig::default());
        assert_eq!(config.backend, Backend::Memory);
    }

    #[test]
    fn test_url_selects_http_backend() {
        let config = ConsoleConfig::from_lookup(lookup(&[
            (CATALOGUE_URL, " http://localhost:8080/api "),
            (CATALOGUE_TIMEOUT_SECS, "5"),
        ]))
        .unwrap();
        assert_eq!(
            config.backend,
            Backend::Http {
                base_url: "http://localhost:8080/api".into()
            }
        );
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_zero_or_garbage_rejected() {
        let err = ConsoleConfig::from_lookup(lookup(&[(CONSOLE_CHANNEL_BUFFER, "0")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: CONSOLE_CHANNEL_BUFFER,
                value: "0".into()
            }
        );
        assert!(ConsoleConfig::from_lookup(lookup(&[(CATALOGUE_TIMEOUT_SECS, "soon")])).is_err());
    }
}
