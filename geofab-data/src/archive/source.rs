use std::{fmt, io, pin::Pin, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::USER_AGENT;
use tokio::io::AsyncRead;

use super::util::to_async_reader;
use super::{ArchiveUrl, TransportError};

/// Default user agent for archive requests.
pub const DEFAULT_USER_AGENT: &str = "geofab/0.1";

const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Streaming response body.
pub type ArchiveBody = Pin<Box<dyn AsyncRead + Send>>;

/// Status line and body of an archive request.
pub struct ArchiveResponse {
    /// HTTP status code.
    pub status: u16,
    /// Advertised body length, when the server reports one.
    pub content_length: Option<u64>,
    /// Body stream, read only after a successful status.
    pub body: ArchiveBody,
}

impl fmt::Debug for ArchiveResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArchiveResponse")
            .field("status", &self.status)
            .field("content_length", &self.content_length)
            .field("body", &"<stream>")
            .finish()
    }
}

/// Anything that can answer a GET for an archive URL.
#[async_trait(?Send)]
pub trait ArchiveSource {
    /// Issue the request and hand back the status with an unread body.
    ///
    /// Non-success statuses are returned as responses, not errors.
    async fn request(&self, url: &ArchiveUrl) -> Result<ArchiveResponse, TransportError>;
}

/// Configuration for [`HttpArchiveSource`].
#[derive(Debug, Clone)]
pub struct HttpArchiveSourceConfig {
    /// Total request timeout, including the body. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Timeout for establishing the connection.
    pub connect_timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// Skip TLS certificate verification.
    pub accept_invalid_certs: bool,
}

impl Default for HttpArchiveSourceConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            accept_invalid_certs: false,
        }
    }
}

impl HttpArchiveSourceConfig {
    /// Set the total request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Toggle TLS certificate verification off or on.
    #[must_use]
    pub const fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }
}

/// HTTP implementation of [`ArchiveSource`].
#[derive(Debug, Clone)]
pub struct HttpArchiveSource {
    client: Client,
    config: HttpArchiveSourceConfig,
}

impl HttpArchiveSource {
    /// Create a source with default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::ClientBuild`] if the HTTP client fails to build.
    pub fn new() -> Result<Self, TransportError> {
        Self::with_config(HttpArchiveSourceConfig::default())
    }

    /// Create a source with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::ClientBuild`] if the HTTP client fails to build.
    pub fn with_config(config: HttpArchiveSourceConfig) -> Result<Self, TransportError> {
        let mut builder = Client::builder()
            .connect_timeout(config.connect_timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|source| TransportError::ClientBuild { source })?;
        Ok(Self { client, config })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &HttpArchiveSourceConfig {
        &self.config
    }
}

#[async_trait(?Send)]
impl ArchiveSource for HttpArchiveSource {
    async fn request(&self, url: &ArchiveUrl) -> Result<ArchiveResponse, TransportError> {
        let response = self
            .client
            .get(url.as_ref())
            .header(USER_AGENT, self.config.user_agent.as_str())
            .send()
            .await
            .map_err(|err| convert_reqwest_error(err, url))?;
        let status = response.status().as_u16();
        let content_length = response.content_length();
        Ok(ArchiveResponse {
            status,
            content_length,
            body: to_async_reader(response),
        })
    }
}

fn convert_reqwest_error(error: reqwest::Error, url: &ArchiveUrl) -> TransportError {
    let kind = if error.is_timeout() {
        io::ErrorKind::TimedOut
    } else {
        io::ErrorKind::Other
    };
    TransportError::Network {
        url: url.to_string(),
        source: io::Error::new(kind, error),
    }
}
