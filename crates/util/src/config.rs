//! Runtime configuration for Docent.
//!
//! Configuration is resolved exactly once at startup. Precedence is
//! command-line overrides, then environment variables, then compiled-in
//! defaults. The resolved [`DocentConfig`] is passed down by value; nothing
//! below the binary reads the environment afterwards.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::expand_tilde;

/// Path of a content document to load instead of the embedded one.
pub const CONTENT_PATH_ENV: &str = "DOCENT_CONTENT_PATH";
/// Chat webhook endpoint.
pub const WEBHOOK_URL_ENV: &str = "DOCENT_WEBHOOK_URL";
/// Optional request timeout for chat requests, in whole seconds.
pub const CHAT_TIMEOUT_ENV: &str = "DOCENT_CHAT_TIMEOUT_SECS";
/// Palette name (`dracula` or `nord`).
pub const THEME_ENV: &str = "TUI_THEME";
/// File receiving log output while the TUI owns the terminal.
pub const LOG_PATH_ENV: &str = "DOCENT_LOG_PATH";

/// Webhook used when neither the command line nor the environment names one.
/// Can be baked in at build time by exporting `DOCENT_WEBHOOK_URL`.
pub const DEFAULT_WEBHOOK_URL: &str = match option_env!("DOCENT_WEBHOOK_URL") {
    Some(url) => url,
    None => "http://localhost:5678/webhook/docs-chat",
};

/// Errors raised while resolving configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The webhook URL did not parse or is not an http(s) URL with a host.
    #[error("invalid webhook url '{value}': {reason}")]
    InvalidWebhookUrl { value: String, reason: String },
    /// The chat timeout was not a positive whole number of seconds.
    #[error("invalid chat timeout '{0}': expected a positive number of seconds")]
    InvalidTimeout(String),
    /// The palette name is not one we ship.
    #[error("unknown theme '{0}' (expected 'dracula' or 'nord')")]
    UnknownTheme(String),
}

/// Palettes available to the TUI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThemeName {
    #[default]
    Dracula,
    Nord,
}

impl ThemeName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dracula => "dracula",
            Self::Nord => "nord",
        }
    }
}

impl fmt::Display for ThemeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeName {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dracula" => Ok(Self::Dracula),
            "nord" => Ok(Self::Nord),
            other => Err(ConfigError::UnknownTheme(other.to_string())),
        }
    }
}

/// Values supplied on the command line. `None` defers to the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub content_path: Option<String>,
    pub webhook_url: Option<String>,
    pub theme: Option<String>,
    pub initial_topic: Option<String>,
}

/// Fully resolved runtime configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct DocentConfig {
    /// Content document to load; `None` means the embedded document.
    pub content_path: Option<PathBuf>,
    pub webhook_url: Url,
    /// `None` leaves the transport default in place.
    pub chat_timeout: Option<Duration>,
    pub theme: ThemeName,
    /// Topic shown at startup; falls back to the document's overview id.
    pub initial_topic: Option<String>,
}

impl DocentConfig {
    /// Resolve configuration from overrides and the process environment.
    pub fn resolve(overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let content_path = overrides
            .content_path
            .or_else(|| non_empty_env(CONTENT_PATH_ENV))
            .map(|raw| expand_tilde(&raw));

        let raw_url = overrides
            .webhook_url
            .or_else(|| non_empty_env(WEBHOOK_URL_ENV))
            .unwrap_or_else(|| DEFAULT_WEBHOOK_URL.to_string());
        let webhook_url = validate_webhook_url(&raw_url)?;

        let chat_timeout = match non_empty_env(CHAT_TIMEOUT_ENV) {
            Some(raw) => Some(parse_timeout(&raw)?),
            None => None,
        };

        let theme = match overrides.theme.or_else(|| non_empty_env(THEME_ENV)) {
            Some(raw) => raw.parse()?,
            None => ThemeName::default(),
        };

        let config = Self {
            content_path,
            webhook_url,
            chat_timeout,
            theme,
            initial_topic: overrides.initial_topic.filter(|id| !id.trim().is_empty()),
        };
        debug!(?config, "resolved configuration");
        Ok(config)
    }
}

/// Parse `value` and require an http(s) scheme and a host.
pub fn validate_webhook_url(value: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidWebhookUrl {
        value: value.to_string(),
        reason: reason.to_string(),
    };
    let url = Url::parse(value.trim()).map_err(|err| invalid(&err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid("missing host"));
    }
    Ok(url)
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout(raw.to_string())),
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_VARS: [&str; 4] = [CONTENT_PATH_ENV, WEBHOOK_URL_ENV, CHAT_TIMEOUT_ENV, THEME_ENV];

    fn with_clean_env<F: FnOnce()>(vars: &[(&str, &str)], f: F) {
        let mut pairs: Vec<(&str, Option<&str>)> = ALL_VARS.iter().map(|k| (*k, None)).collect();
        for &(key, value) in vars {
            pairs.retain(|(k, _)| *k != key);
            pairs.push((key, Some(value)));
        }
        temp_env::with_vars(pairs, f);
    }

    #[test]
    fn defaults_apply_without_env_or_overrides() {
        with_clean_env(&[], || {
            let config = DocentConfig::resolve(ConfigOverrides::default()).unwrap();
            assert_eq!(config.content_path, None);
            assert_eq!(config.webhook_url.as_str(), Url::parse(DEFAULT_WEBHOOK_URL).unwrap().as_str());
            assert_eq!(config.chat_timeout, None);
            assert_eq!(config.theme, ThemeName::Dracula);
            assert_eq!(config.initial_topic, None);
        });
    }

    #[test]
    fn environment_is_read_once() {
        with_clean_env(
            &[
                (WEBHOOK_URL_ENV, "https://hooks.example.com/chat"),
                (CHAT_TIMEOUT_ENV, "15"),
                (THEME_ENV, "Nord"),
                (CONTENT_PATH_ENV, "/tmp/docs.yaml"),
            ],
            || {
                let config = DocentConfig::resolve(ConfigOverrides::default()).unwrap();
                assert_eq!(config.webhook_url.host_str(), Some("hooks.example.com"));
                assert_eq!(config.chat_timeout, Some(Duration::from_secs(15)));
                assert_eq!(config.theme, ThemeName::Nord);
                assert_eq!(config.content_path, Some(PathBuf::from("/tmp/docs.yaml")));
            },
        );
    }

    #[test]
    fn overrides_beat_environment() {
        with_clean_env(&[(WEBHOOK_URL_ENV, "https://env.example.com/chat"), (THEME_ENV, "nord")], || {
            let overrides = ConfigOverrides {
                webhook_url: Some("http://cli.example.com/hook".into()),
                theme: Some("dracula".into()),
                initial_topic: Some("faq".into()),
                ..Default::default()
            };
            let config = DocentConfig::resolve(overrides).unwrap();
            assert_eq!(config.webhook_url.host_str(), Some("cli.example.com"));
            assert_eq!(config.theme, ThemeName::Dracula);
            assert_eq!(config.initial_topic.as_deref(), Some("faq"));
        });
    }

    #[test]
    fn rejects_non_http_webhook() {
        let err = validate_webhook_url("ftp://example.com/hook").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidWebhookUrl { .. }));
        assert!(validate_webhook_url("not a url").is_err());
        assert!(validate_webhook_url("https://example.com/webhook/abc").is_ok());
    }

    #[test]
    fn rejects_zero_or_garbage_timeout() {
        with_clean_env(&[(CHAT_TIMEOUT_ENV, "0")], || {
            let err = DocentConfig::resolve(ConfigOverrides::default()).unwrap_err();
            assert_eq!(err, ConfigError::InvalidTimeout("0".into()));
        });
        with_clean_env(&[(CHAT_TIMEOUT_ENV, "soon")], || {
            assert!(DocentConfig::resolve(ConfigOverrides::default()).is_err());
        });
    }

    #[test]
    fn unknown_theme_is_an_error() {
        assert_eq!("solarized".parse::<ThemeName>(), Err(ConfigError::UnknownTheme("solarized".into())));
    }
}
