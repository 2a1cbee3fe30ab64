//! Request and result types for signed downloads

use bytes::Bytes;
use sigdown_config::constants::SIGNATURE_SUFFIX;
use std::fmt;
use std::time::Duration;

/// Which of the two resources of a download a fetch refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Content,
    Signature,
}

impl ResourceKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Content => "content",
            Self::Signature => "signature",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request for downloading a content blob and its detached signature
///
/// A zero `max_bytes` or `timeout` means "use the downloader's default".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub content_url: String,
    pub signature_url: String,
    pub max_bytes: u64,
    pub timeout: Duration,
}

impl DownloadRequest {
    #[must_use]
    pub fn new(content_url: impl Into<String>, signature_url: impl Into<String>) -> Self {
        Self {
            content_url: content_url.into(),
            signature_url: signature_url.into(),
            max_bytes: 0,
            timeout: Duration::ZERO,
        }
    }

    /// Request `url` with its signature published next to it as `<url>.asc`
    #[must_use]
    pub fn detached(url: impl Into<String>) -> Self {
        let content_url = url.into();
        let signature_url = format!("{content_url}{SIGNATURE_SUFFIX}");
        Self::new(content_url, signature_url)
    }

    #[must_use]
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub(super) fn max_bytes_or(&self, default: u64) -> u64 {
        if self.max_bytes == 0 {
            default
        } else {
            self.max_bytes
        }
    }

    pub(super) fn timeout_or(&self, default: Duration) -> Duration {
        if self.timeout.is_zero() {
            default
        } else {
            self.timeout
        }
    }
}

/// Content whose detached signature was verified against the keyring
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedContent {
    pub content: Bytes,
    /// Identity names of the signing key, in keyring order
    pub signers: Vec<String>,
}

impl SignedContent {
    /// Content as UTF-8 text, if it is valid UTF-8
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.content).ok()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.content.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
