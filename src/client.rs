//! mail.gw client configuration.

use crate::{Result, Session};
use std::time::Duration;

const BASE_URL: &str = "https://api.mail.gw";
const USER_AGENT_VALUE: &str = concat!("mailgw-client/", env!("CARGO_PKG_VERSION"));

const RATE_LIMIT_RETRY_INTERVAL: Duration = Duration::from_secs(1);
const RATE_LIMIT_CEILING: Duration = Duration::from_secs(30);
const POLL_INTERVAL: Duration = Duration::from_millis(200);
const POLL_TIMEOUT: Duration = Duration::from_secs(60);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Async client for the mail.gw temporary email service.
///
/// Holds the HTTP client, the service base URL and the retry and polling timings.
/// Cloning is cheap; clones share the underlying connection pool.
///
/// Use [`Client::new`] for defaults or [`Client::builder`] for custom settings
/// like proxies, a different base URL, or shorter timings in tests.
#[derive(Debug, Clone)]
pub struct Client {
    pub(crate) http: reqwest::Client,
    pub(crate) base_url: String,
    proxy: Option<String>,
    pub(crate) request_timeout: Duration,
    pub(crate) rate_limit_retry_interval: Duration,
    pub(crate) rate_limit_ceiling: Duration,
    pub(crate) poll_interval: Duration,
    pub(crate) poll_timeout: Duration,
}

impl Client {
    /// Create a builder for configuring the client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a client with default settings.
    ///
    /// # Examples
    /// ```no_run
    /// # use mailgw_client::Client;
    /// # fn main() -> Result<(), mailgw_client::Error> {
    /// let client = Client::new()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new() -> Result<Self> {
        ClientBuilder::new().build()
    }

    /// Base URL every request path is appended to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the proxy URL if one was configured.
    ///
    /// Returns `None` when no proxy was set on the builder.
    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref()
    }

    /// Upper bound applied to every single HTTP request.
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Start an uninitialized [`Session`] bound to this client.
    pub fn session(&self) -> Session {
        Session::new(self.clone())
    }
}

/// Builder for configuring a mail.gw client.
///
/// Start with [`Client::builder`] to override defaults.
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    base_url: String,
    proxy: Option<String>,
    danger_accept_invalid_certs: bool,
    user_agent: String,
    request_timeout: Duration,
    rate_limit_retry_interval: Duration,
    rate_limit_ceiling: Duration,
    poll_interval: Duration,
    poll_timeout: Duration,
}

impl ClientBuilder {
    /// Create a new builder with default settings.
    ///
    /// Defaults:
    /// - Base URL `https://api.mail.gw`
    /// - No proxy
    /// - `danger_accept_invalid_certs = false`
    /// - Each HTTP request times out after 30s
    /// - Rate limit retries every 1s, giving up after 30s
    /// - New-message polling every 200ms, giving up after 60s
    pub fn new() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            proxy: None,
            danger_accept_invalid_certs: false,
            user_agent: USER_AGENT_VALUE.to_string(),
            request_timeout: REQUEST_TIMEOUT,
            rate_limit_retry_interval: RATE_LIMIT_RETRY_INTERVAL,
            rate_limit_ceiling: RATE_LIMIT_CEILING,
            poll_interval: POLL_INTERVAL,
            poll_timeout: POLL_TIMEOUT,
        }
    }

    /// Override the API base URL.
    ///
    /// Useful for testing against a local server. A trailing `/` is ignored.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Set a proxy URL (e.g., "socks5://127.0.0.1:9050").
    ///
    /// This uses reqwest's proxy support for all requests.
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Control whether to accept invalid TLS certificates (default: false).
    pub fn danger_accept_invalid_certs(mut self, value: bool) -> Self {
        self.danger_accept_invalid_certs = value;
        self
    }

    /// Override the default user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Upper bound for a single HTTP request, connect to last body byte.
    ///
    /// A request that runs over fails like any other transport error.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Delay between retries of a rate-limited request.
    pub fn rate_limit_retry_interval(mut self, interval: Duration) -> Self {
        self.rate_limit_retry_interval = interval;
        self
    }

    /// How long a request may stay rate limited before failing.
    pub fn rate_limit_ceiling(mut self, ceiling: Duration) -> Self {
        self.rate_limit_ceiling = ceiling;
        self
    }

    /// Delay between inbox polls while waiting for a new message.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// How long to wait for a new message before giving up.
    pub fn poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    /// Build the client.
    ///
    /// No request is sent; this only fails if the HTTP client cannot be set up,
    /// e.g. because the proxy URL is invalid.
    ///
    /// # Examples
    /// ```no_run
    /// # use mailgw_client::Client;
    /// # fn main() -> Result<(), mailgw_client::Error> {
    /// let client = Client::builder()
    ///     .user_agent("my-app/1.0")
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn build(self) -> Result<Client> {
        let mut builder = reqwest::Client::builder()
            .danger_accept_invalid_certs(self.danger_accept_invalid_certs)
            .user_agent(self.user_agent)
            .timeout(self.request_timeout);

        if let Some(proxy_url) = &self.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        }

        let http = builder.build()?;

        Ok(Client {
            http,
            base_url: self.base_url,
            proxy: self.proxy,
            request_timeout: self.request_timeout,
            rate_limit_retry_interval: self.rate_limit_retry_interval,
            rate_limit_ceiling: self.rate_limit_ceiling,
            poll_interval: self.poll_interval,
            poll_timeout: self.poll_timeout,
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
