//! Client configuration loaded from the environment.

use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_API_BASE: &str = "http://localhost:8000";
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be an http(s) URL, got '{value}'")]
    InvalidUrl { key: &'static str, value: String },

    #[error("{key} must be a positive number of seconds, got '{value}'")]
    InvalidTimeout { key: &'static str, value: String },
}

/// Settings for talking to the directory service.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL without trailing slash.
    pub api_base: String,
    /// Pre-issued identity token (used by the CLI in place of an interactive sign-in).
    pub id_token: Option<String>,
    pub http_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            id_token: None,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }
}

impl core::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_base", &self.api_base)
            .field("id_token", &self.id_token.as_ref().map(|_| "***"))
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}

impl ClientConfig {
    /// Build a config pointing at `api_base`, other settings default.
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: normalize_base(&api_base.into()),
            ..Self::default()
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.id_token = Some(token.into());
        self
    }

    /// Read `SHDS_API_BASE`, `SHDS_ID_TOKEN` and `SHDS_HTTP_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_base = match non_blank("SHDS_API_BASE") {
            Some(raw) => {
                let trimmed = raw.trim();
                if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
                    return Err(ConfigError::InvalidUrl {
                        key: "SHDS_API_BASE",
                        value: raw,
                    });
                }
                normalize_base(trimmed)
            }
            None => DEFAULT_API_BASE.to_string(),
        };

        let http_timeout = match non_blank("SHDS_HTTP_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::InvalidTimeout {
                        key: "SHDS_HTTP_TIMEOUT_SECS",
                        value: raw,
                    });
                }
            },
            None => DEFAULT_HTTP_TIMEOUT,
        };

        Ok(Self {
            api_base,
            id_token: non_blank("SHDS_ID_TOKEN").map(|t| t.trim().to_string()),
            http_timeout,
        })
    }
}

fn normalize_base(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.api_base, "http://localhost:8000");
    }

    #[test]
    fn values_are_read_and_normalized() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("SHDS_API_BASE", "https://api.example.org/ "),
            ("SHDS_ID_TOKEN", " tok "),
            ("SHDS_HTTP_TIMEOUT_SECS", "3"),
        ]))
        .unwrap();
        assert_eq!(config.api_base, "https://api.example.org");
        assert_eq!(config.id_token.as_deref(), Some("tok"));
        assert_eq!(config.http_timeout, Duration::from_secs(3));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err =
            ClientConfig::from_lookup(lookup(&[("SHDS_API_BASE", "localhost:8000")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));

        let err =
            ClientConfig::from_lookup(lookup(&[("SHDS_HTTP_TIMEOUT_SECS", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimeout { .. }));
    }

    #[test]
    fn debug_hides_token() {
        let config = ClientConfig::new("http://x").with_token("very-secret");
        assert!(!format!("{config:?}").contains("very-secret"));
    }
}
