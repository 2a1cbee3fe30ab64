//! Signing error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum SigningError {
    #[error("signature verification failed: {reason}")]
    VerificationFailed { reason: String },

    #[error("no trusted key found for signature with key id: {key_id}")]
    NoTrustedKeyFound { key_id: String },

    #[error("invalid signature format: {0}")]
    InvalidSignatureFormat(String),

    #[error("reached max bytes allowed to download: {limit}")]
    SizeExceeded { limit: u64 },

    #[error("file and signature mismatch: {reason}")]
    Mismatch { reason: String },

    #[error("unable to read signed content: {message}")]
    ContentUnreadable { message: String },
}

impl UserFacingError for SigningError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::SizeExceeded { .. } => {
                Some("Raise the byte limit if the content is expected to be this large.")
            }
            Self::Mismatch { .. } | Self::NoTrustedKeyFound { .. } => {
                Some("Make sure the signature was produced by a key in the trusted keyring.")
            }
            _ => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::VerificationFailed { .. } => "signing.verification_failed",
            Self::NoTrustedKeyFound { .. } => "signing.no_trusted_key",
            Self::InvalidSignatureFormat(_) => "signing.invalid_signature",
            Self::SizeExceeded { .. } => "signing.size_exceeded",
            Self::Mismatch { .. } => "signing.mismatch",
            Self::ContentUnreadable { .. } => "signing.content_unreadable",
        };
        Some(code)
    }
}
