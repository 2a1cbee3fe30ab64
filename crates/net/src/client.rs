//! HTTP transport capability and its reqwest-backed client

use async_trait::async_trait;
use futures::TryStreamExt;
use reqwest::Client;
use sigdown_config::NetworkConfig;
use sigdown_errors::{Error, NetworkError};
use std::io;
use std::pin::Pin;
use std::time::Duration;
use tokio::io::AsyncRead;
use tokio_util::io::StreamReader;

/// Response body handed from the transport to the download pipeline
pub type BodyReader = Pin<Box<dyn AsyncRead + Send>>;

/// Status line and streaming body of a GET request
pub struct HttpResponse {
    pub status: u16,
    pub body: BodyReader,
}

impl std::fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// Minimal HTTP capability used by the downloader
///
/// Dropping the future returned by [`HttpTransport::get`] aborts the request,
/// and dropping the body closes the underlying connection stream.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Issue a single GET for `url`
    async fn get(&self, url: &str) -> Result<HttpResponse, NetworkError>;
}

/// Network client configuration
#[derive(Debug, Clone)]
pub struct NetConfig {
    pub connect_timeout: Duration,
    pub pool_idle_timeout: Duration,
    pub pool_max_idle_per_host: usize,
    pub user_agent: String,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self::from(&NetworkConfig::default())
    }
}

impl From<&NetworkConfig> for NetConfig {
    fn from(config: &NetworkConfig) -> Self {
        Self {
            connect_timeout: Duration::from_secs(config.connect_timeout_secs),
            pool_idle_timeout: Duration::from_secs(config.pool_idle_timeout_secs),
            pool_max_idle_per_host: config.pool_max_idle_per_host,
            user_agent: config.user_agent.clone(),
        }
    }
}

/// HTTP client wrapper with connection pooling
///
/// One attempt per request. The overall deadline is owned by the caller, so no
/// request timeout is configured here, only a connect timeout.
#[derive(Clone, Debug)]
pub struct NetClient {
    client: Client,
}

impl NetClient {
    /// Create a new network client
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reqwest client fails to initialize.
    pub fn new(config: NetConfig) -> Result<Self, Error> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| NetworkError::ClientSetup(e.to_string()))?;

        Ok(Self { client })
    }

    fn classify(error: &reqwest::Error) -> NetworkError {
        if error.is_timeout() {
            NetworkError::Timeout {
                url: error
                    .url()
                    .map(std::string::ToString::to_string)
                    .unwrap_or_default(),
            }
        } else if error.is_connect() {
            NetworkError::ConnectionRefused(error.to_string())
        } else {
            NetworkError::DownloadFailed(error.to_string())
        }
    }
}

#[async_trait]
impl HttpTransport for NetClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, NetworkError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Self::classify(&e))?;

        let status = response.status().as_u16();
        let stream = response.bytes_stream().map_err(io::Error::other);

        Ok(HttpResponse {
            status,
            body: Box::pin(StreamReader::new(stream)),
        })
    }
}
