//! Client configuration.
//!
//! Use the builder methods to customize behavior, or [`ClientConfig::from_env`]
//! to read the `CHATDESK_*` environment variables.
//!
//! ```ignore
//! use chatdesk::config::ClientConfig;
//!
//! let config = ClientConfig::default()
//!     .with_base_url("http://localhost:9000")
//!     .with_mock_mode(true);
//! ```

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use ::config::{Config as ConfigLoader, Environment};
use serde::Deserialize;

use crate::error::ConfigError;

/// Default API address when `CHATDESK_API_BASE_URL` is unset.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Delay before an assistant reply is appended after a user message.
pub const DEFAULT_REPLY_DELAY: Duration = Duration::from_millis(1000);

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Prefix shared by every environment variable read by [`ClientConfig::from_env`].
pub const ENV_PREFIX: &str = "CHATDESK";

pub const ENV_BASE_URL: &str = "CHATDESK_API_BASE_URL";
pub const ENV_MOCK_MODE: &str = "CHATDESK_MOCK_MODE";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "CHATDESK_REQUEST_TIMEOUT_SECS";
pub const ENV_REPLY_DELAY_MS: &str = "CHATDESK_REPLY_DELAY_MS";
pub const ENV_REPLY_SOURCE: &str = "CHATDESK_REPLY_SOURCE";
pub const ENV_PROXY: &str = "CHATDESK_PROXY";

/// Where the assistant reply that follows a user message comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplySource {
    /// Synthesize the reply locally after the delay.
    #[default]
    Simulated,
    /// Ask the server to record an assistant message after the delay.
    Server,
}

impl FromStr for ReplySource {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simulated" | "local" => Ok(ReplySource::Simulated),
            "server" | "remote" => Ok(ReplySource::Server),
            _ => Err(ConfigError::invalid(
                ENV_REPLY_SOURCE,
                s,
                "expected \"simulated\" or \"server\"",
            )),
        }
    }
}

/// Development proxy rule: requests whose path starts with `prefix`
/// go to `target` instead of the base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyRule {
    pub prefix: String,
    pub target: String,
}

impl ProxyRule {
    pub fn new(prefix: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            target: trim_base(target.into()),
        }
    }

    /// Whether `path` falls under this rule's prefix, on a segment boundary.
    pub fn matches(&self, path: &str) -> bool {
        match path.strip_prefix(&self.prefix) {
            Some(rest) => rest.is_empty() || rest.starts_with('/') || self.prefix.ends_with('/'),
            None => false,
        }
    }
}

/// Configuration shared by the API client and the store.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the chat API (no trailing slash)
    pub base_url: String,
    /// Synthesize `send_message`/`create_thread` responses locally
    pub mock_mode: bool,
    /// Per-request timeout for the production transport
    pub request_timeout: Duration,
    /// Delay before the assistant reply is appended
    pub reply_delay: Duration,
    /// Where assistant replies come from
    pub reply_source: ReplySource,
    /// Development proxy rules, first match wins
    pub proxy_rules: Vec<ProxyRule>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            mock_mode: false,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            reply_delay: DEFAULT_REPLY_DELAY,
            reply_source: ReplySource::default(),
            proxy_rules: Vec::new(),
        }
    }
}

impl ClientConfig {
    /// Create a new ClientConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API base URL. A trailing `/` is removed.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = trim_base(url.into());
        self
    }

    /// Enable or disable mock mode.
    pub fn with_mock_mode(mut self, mock_mode: bool) -> Self {
        self.mock_mode = mock_mode;
        self
    }

    /// Set the per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the assistant reply delay.
    pub fn with_reply_delay(mut self, delay: Duration) -> Self {
        self.reply_delay = delay;
        self
    }

    /// Set where assistant replies come from.
    pub fn with_reply_source(mut self, source: ReplySource) -> Self {
        self.reply_source = source;
        self
    }

    /// Add a development proxy rule.
    pub fn with_proxy_rule(mut self, prefix: impl Into<String>, target: impl Into<String>) -> Self {
        self.proxy_rules.push(ProxyRule::new(prefix, target));
        self
    }

    /// Create config from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(Environment::with_prefix(ENV_PREFIX))
    }

    /// Create config from explicit `CHATDESK_*` variables instead of the
    /// process environment.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self::load(Environment::with_prefix(ENV_PREFIX).source(Some(vars)))
    }

    fn load(environment: Environment) -> Result<Self, ConfigError> {
        let settings: EnvSettings = ConfigLoader::builder()
            .add_source(environment.try_parsing(true).ignore_empty(true))
            .build()?
            .try_deserialize()?;
        settings.into_config()
    }

    /// Resolve the full URL for an API path, honoring proxy rules.
    pub fn url_for(&self, path: &str) -> String {
        let base = self
            .proxy_rules
            .iter()
            .find(|rule| rule.matches(path))
            .map(|rule| rule.target.as_str())
            .unwrap_or(&self.base_url);
        format!("{}{}", base, path)
    }
}

/// `CHATDESK_*` variables as loaded by the `config` crate. Keys are the
/// variable names without the prefix, lowercased.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EnvSettings {
    api_base_url: Option<String>,
    mock_mode: Option<bool>,
    request_timeout_secs: Option<u64>,
    reply_delay_ms: Option<u64>,
    reply_source: Option<String>,
    proxy: Option<String>,
}

impl EnvSettings {
    fn into_config(self) -> Result<ClientConfig, ConfigError> {
        let mut config = ClientConfig::default();

        if let Some(url) = self.api_base_url.filter(|url| !url.trim().is_empty()) {
            config = config.with_base_url(url.trim());
        }
        if let Some(mock_mode) = self.mock_mode {
            config.mock_mode = mock_mode;
        }
        if let Some(secs) = self.request_timeout_secs {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(millis) = self.reply_delay_ms {
            config.reply_delay = Duration::from_millis(millis);
        }
        if let Some(source) = self.reply_source {
            config.reply_source = source.parse()?;
        }
        if let Some(proxy) = self.proxy {
            config.proxy_rules = parse_proxy_rules(&proxy)?;
        }
        Ok(config)
    }
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

/// Parse `prefix=url,prefix=url` into proxy rules.
fn parse_proxy_rules(value: &str) -> Result<Vec<ProxyRule>, ConfigError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (prefix, target) = entry
                .split_once('=')
                .ok_or_else(|| ConfigError::invalid(ENV_PROXY, entry, "expected prefix=url"))?;
            let (prefix, target) = (prefix.trim(), target.trim());
            if !prefix.starts_with('/') || target.is_empty() {
                return Err(ConfigError::invalid(ENV_PROXY, entry, "expected /prefix=url"));
            }
            Ok(ProxyRule::new(prefix, target))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<ClientConfig, ConfigError> {
        ClientConfig::from_vars(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())))
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(!config.mock_mode);
        assert_eq!(config.reply_delay, Duration::from_millis(1000));
        assert_eq!(config.reply_source, ReplySource::Simulated);
        assert!(config.proxy_rules.is_empty());
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::new()
            .with_base_url("http://api.local/")
            .with_mock_mode(true)
            .with_reply_delay(Duration::from_millis(5))
            .with_reply_source(ReplySource::Server);

        assert_eq!(config.base_url, "http://api.local");
        assert!(config.mock_mode);
        assert_eq!(config.reply_delay, Duration::from_millis(5));
        assert_eq!(config.reply_source, ReplySource::Server);
    }

    #[test]
    fn test_from_vars_reads_all_keys() {
        let config = from_pairs(&[
            (ENV_BASE_URL, "http://example.test:9000/"),
            (ENV_MOCK_MODE, "TRUE"),
            (ENV_REQUEST_TIMEOUT_SECS, "5"),
            (ENV_REPLY_DELAY_MS, "250"),
            (ENV_REPLY_SOURCE, "server"),
            (ENV_PROXY, "/users=http://host.docker.internal:8001"),
        ])
        .unwrap();

        assert_eq!(config.base_url, "http://example.test:9000");
        assert!(config.mock_mode);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.reply_delay, Duration::from_millis(250));
        assert_eq!(config.reply_source, ReplySource::Server);
        assert_eq!(
            config.proxy_rules,
            vec![ProxyRule::new("/users", "http://host.docker.internal:8001")]
        );
    }

    #[test]
    fn test_from_vars_blank_values_keep_defaults() {
        let config = from_pairs(&[(ENV_BASE_URL, "  "), (ENV_MOCK_MODE, "")]).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(!config.mock_mode);
    }

    #[test]
    fn test_from_vars_accepts_numeric_booleans() {
        assert!(from_pairs(&[(ENV_MOCK_MODE, "1")]).unwrap().mock_mode);
        assert!(!from_pairs(&[(ENV_MOCK_MODE, "0")]).unwrap().mock_mode);
    }

    #[test]
    fn test_from_vars_ignores_unrelated_variables() {
        let config = from_pairs(&[("OTHER_MOCK_MODE", "true"), ("CHATDESK_UNKNOWN", "x")]).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_from_vars_rejects_bad_values() {
        let err = from_pairs(&[(ENV_MOCK_MODE, "maybe")]).unwrap_err();
        assert!(matches!(err, ConfigError::Load { .. }), "got {:?}", err);

        let err = from_pairs(&[(ENV_REPLY_DELAY_MS, "soon")]).unwrap_err();
        assert!(matches!(err, ConfigError::Load { .. }), "got {:?}", err);

        let err = from_pairs(&[(ENV_REPLY_SOURCE, "psychic")]).unwrap_err();
        assert!(err.to_string().contains(ENV_REPLY_SOURCE));
        assert!(from_pairs(&[(ENV_PROXY, "users")]).is_err());
        assert!(from_pairs(&[(ENV_PROXY, "users=http://x")]).is_err());
    }

    #[test]
    fn test_url_for_uses_base_url() {
        let config = ClientConfig::default().with_base_url("http://api");
        assert_eq!(config.url_for("/threads"), "http://api/threads");
    }

    #[test]
    fn test_url_for_applies_first_matching_proxy_rule() {
        let config = ClientConfig::default()
            .with_base_url("http://api")
            .with_proxy_rule("/users", "http://auth:8001/")
            .with_proxy_rule("/users/me", "http://never");

        assert_eq!(config.url_for("/users/me"), "http://auth:8001/users/me");
        assert_eq!(config.url_for("/users"), "http://auth:8001/users");
        assert_eq!(config.url_for("/usersettings"), "http://api/usersettings");
        assert_eq!(config.url_for("/threads"), "http://api/threads");
    }

    #[test]
    #[serial]
    fn test_from_env_reads_process_environment() {
        std::env::set_var(ENV_BASE_URL, "http://from-env:1234");
        std::env::set_var(ENV_MOCK_MODE, "1");
        let config = ClientConfig::from_env();
        std::env::remove_var(ENV_BASE_URL);
        std::env::remove_var(ENV_MOCK_MODE);

        let config = config.unwrap();
        assert_eq!(config.base_url, "http://from-env:1234");
        assert!(config.mock_mode);
    }

    #[test]
    #[serial]
    fn test_from_env_without_variables_is_default() {
        for key in [
            ENV_BASE_URL,
            ENV_MOCK_MODE,
            ENV_REQUEST_TIMEOUT_SECS,
            ENV_REPLY_DELAY_MS,
            ENV_REPLY_SOURCE,
            ENV_PROXY,
        ] {
            std::env::remove_var(key);
        }
        assert_eq!(ClientConfig::from_env().unwrap(), ClientConfig::default());
    }
}
