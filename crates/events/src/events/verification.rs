use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::FailureContext;

/// Signature verification events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VerificationEvent {
    /// Both streams are available and verification began
    Started { content_url: String, max_bytes: u64 },

    /// Signature matched a trusted key
    Verified {
        content_url: String,
        signers: Vec<String>,
        bytes: u64,
        elapsed: Duration,
    },

    /// Download ended without verified content
    Rejected {
        content_url: String,
        failure: FailureContext,
    },
}
