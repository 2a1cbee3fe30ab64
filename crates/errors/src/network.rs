//! Network-related error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum NetworkError {
    /// One of the two resources could not be fetched. `status` is set when the
    /// server answered with a non-success code.
    #[error("could not download {resource} from {url}: {message}")]
    FetchFailed {
        resource: String,
        url: String,
        status: Option<u16>,
        message: String,
    },

    #[error("connection timeout to {url}")]
    Timeout { url: String },

    #[error("download failed: {0}")]
    DownloadFailed(String),

    #[error("connection refused: {0}")]
    ConnectionRefused(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("unsupported protocol: {protocol}")]
    UnsupportedProtocol { protocol: String },

    #[error("failed to build HTTP client: {0}")]
    ClientSetup(String),
}

impl NetworkError {
    /// HTTP status attached to a fetch failure, if the server answered at all
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::FetchFailed { status, .. } => *status,
            _ => None,
        }
    }

    /// Resource kind ("content" or "signature") a fetch failure refers to
    #[must_use]
    pub fn resource(&self) -> Option<&str> {
        match self {
            Self::FetchFailed { resource, .. } => Some(resource),
            _ => None,
        }
    }
}

impl UserFacingError for NetworkError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::FetchFailed {
                status: Some(404), ..
            } => Some("Check that both the content URL and its signature URL exist."),
            Self::FetchFailed { .. } | Self::Timeout { .. } | Self::ConnectionRefused(_) => {
                Some("Check your network connection and retry.")
            }
            Self::InvalidUrl(_) | Self::UnsupportedProtocol { .. } => {
                Some("Use an http:// or https:// URL.")
            }
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        match self {
            Self::FetchFailed { status, .. } => status.is_none_or(|code| code >= 500),
            Self::Timeout { .. } | Self::DownloadFailed(_) | Self::ConnectionRefused(_) => true,
            _ => false,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::FetchFailed { .. } => "network.fetch_failed",
            Self::Timeout { .. } => "network.timeout",
            Self::DownloadFailed(_) => "network.download_failed",
            Self::ConnectionRefused(_) => "network.connection_refused",
            Self::InvalidUrl(_) => "network.invalid_url",
            Self::UnsupportedProtocol { .. } => "network.unsupported_protocol",
            Self::ClientSetup(_) => "network.client_setup",
        };
        Some(code)
    }
}
