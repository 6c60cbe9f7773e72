use crate::error::PgError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Host used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.predictionguard.com";

/// How the API key is attached to each request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthScheme {
    /// `Authorization: Bearer <key>`
    #[default]
    Bearer,
    /// `x-api-key: <key>`
    ApiKeyHeader,
}

impl AuthScheme {
    /// Header name and value carrying `api_key`
    pub fn header(&self, api_key: &str) -> (&'static str, String) {
        match self {
            AuthScheme::Bearer => ("Authorization", format!("Bearer {api_key}")),
            AuthScheme::ApiKeyHeader => ("x-api-key", api_key.to_string()),
        }
    }
}

/// Connection settings for the underlying HTTP transport
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    pub connect_timeout_seconds: u64,
    pub tcp_keepalive_seconds: u64,
    pub pool_idle_timeout_seconds: u64,
    /// reqwest has no separate handshake knob; this is added to the connect timeout.
    pub tls_handshake_timeout_seconds: u64,
    pub pool_max_idle_per_host: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout_seconds: 10,
            tcp_keepalive_seconds: 15,
            pool_idle_timeout_seconds: 90,
            tls_handshake_timeout_seconds: 10,
            pool_max_idle_per_host: 100,
        }
    }
}

impl TransportConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds + self.tls_handshake_timeout_seconds)
    }

    pub fn tcp_keepalive(&self) -> Duration {
        Duration::from_secs(self.tcp_keepalive_seconds)
    }

    pub fn pool_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.pool_idle_timeout_seconds)
    }
}

/// Configuration for [`Client`](crate::Client)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: Option<String>,
    pub auth: AuthScheme,
    pub user_agent: String,
    pub transport: TransportConfig,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
            auth: AuthScheme::default(),
            user_agent: default_user_agent(),
            transport: TransportConfig::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_auth(mut self, auth: AuthScheme) -> Self {
        self.auth = auth;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_transport(mut self, transport: TransportConfig) -> Self {
        self.transport = transport;
        self
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }

    /// Validate the configuration.
    ///
    /// An empty API key is accepted: the server answers it with 401/403, which
    /// surfaces as [`PgError::Unauthorized`].
    pub fn validate(&self) -> Result<(), PgError> {
        let base_url = self.base_url();
        if base_url.is_empty() {
            return Err(PgError::configuration("Base URL is required"));
        }

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(PgError::configuration(
                "Base URL must be a valid HTTP/HTTPS URL",
            ));
        }

        if self.user_agent.is_empty() {
            return Err(PgError::configuration("User agent is required"));
        }

        Ok(())
    }
}

fn default_user_agent() -> String {
    format!("pg-client/{}", env!("CARGO_PKG_VERSION"))
}

/// Configuration builder for creating client configs from environment variables
pub struct ConfigBuilder;

impl ConfigBuilder {
    /// Create a config from `PREDICTIONGUARD_API_KEY` and `PREDICTIONGUARD_URL`
    pub fn from_env() -> Result<ClientConfig, PgError> {
        let api_key = std::env::var("PREDICTIONGUARD_API_KEY").map_err(|_| {
            PgError::configuration("PREDICTIONGUARD_API_KEY environment variable not set")
        })?;

        let mut config = ClientConfig::new(api_key);

        if let Ok(base_url) = std::env::var("PREDICTIONGUARD_URL") {
            config = config.with_base_url(base_url);
        }

        config.validate()?;
        Ok(config)
    }
}
