use std::collections::HashSet;
use std::time::Duration;

use serde::Deserialize;

use crate::types::NotificationType;

/// Minimum gap between two successful webhook deliveries (default: 5 seconds).
pub const DEFAULT_SEND_INTERVAL_SECS: u64 = 5;

/// Timeout applied by the HTTP client to each webhook call (default: 30 seconds).
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Webhook delivery settings, read once when the notifier is activated.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WebhookConfig {
    /// Master switch for webhook delivery
    pub enabled: bool,

    /// URL template; `{title}` and `{text}` are replaced with the encoded
    /// message fields before each call
    pub webhook_url: String,

    /// Notification type names to deliver. Empty means every type.
    pub allowed_types: HashSet<String>,

    /// Minimum interval between successful deliveries
    pub send_interval: Duration,
}

impl WebhookConfig {
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            enabled: true,
            webhook_url: webhook_url.into(),
            allowed_types: HashSet::new(),
            send_interval: Duration::from_secs(DEFAULT_SEND_INTERVAL_SECS),
        }
    }

    pub fn with_allowed_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_send_interval(mut self, interval: Duration) -> Self {
        self.send_interval = interval;
        self
    }

    /// A worker is only started when delivery is enabled and a URL is set.
    pub fn is_deliverable(&self) -> bool {
        self.enabled && !self.webhook_url.trim().is_empty()
    }

    /// Whether a notification type name passes the configured filter.
    pub fn allows(&self, type_name: &str) -> bool {
        self.allowed_types.is_empty() || self.allowed_types.contains(type_name)
    }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            webhook_url: String::new(),
            allowed_types: HashSet::new(),
            send_interval: Duration::from_secs(DEFAULT_SEND_INTERVAL_SECS),
        }
    }
}

/// Global application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Address the host HTTP server binds to (default: 0.0.0.0:3000)
    pub listen_addr: String,

    /// Webhook delivery settings
    pub webhook: WebhookConfig,

    /// Per-request timeout for outbound webhook calls, in seconds
    pub request_timeout_secs: u64,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let enabled = match lookup("WEBHOOK_ENABLED") {
            Some(raw) => parse_bool(&raw)
                .ok_or_else(|| anyhow::anyhow!("WEBHOOK_ENABLED must be true or false"))?,
            None => false,
        };

        let allowed_types = match lookup("WEBHOOK_MSG_TYPES") {
            Some(raw) => parse_type_names(&raw)?,
            None => HashSet::new(),
        };

        let send_interval_secs: u64 = lookup("WEBHOOK_SEND_INTERVAL_SECS")
            .unwrap_or_else(|| DEFAULT_SEND_INTERVAL_SECS.to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("WEBHOOK_SEND_INTERVAL_SECS must be a valid u64"))?;

        Ok(Self {
            listen_addr: lookup("LISTEN_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            webhook: WebhookConfig {
                enabled,
                webhook_url: lookup("WEBHOOK_URL").unwrap_or_default(),
                allowed_types,
                send_interval: Duration::from_secs(send_interval_secs),
            },
            request_timeout_secs: lookup("WEBHOOK_REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|| DEFAULT_REQUEST_TIMEOUT_SECS.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("WEBHOOK_REQUEST_TIMEOUT_SECS must be a valid u64"))?,
        })
    }
}

/// Comma-separated notification type names; blanks are ignored.
fn parse_type_names(raw: &str) -> anyhow::Result<HashSet<String>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|name| match NotificationType::from_name(name) {
            Some(kind) => Ok(kind.name().to_string()),
            None => Err(anyhow::anyhow!(
                "WEBHOOK_MSG_TYPES contains unknown type '{name}'"
            )),
        })
        .collect()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
