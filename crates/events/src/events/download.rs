use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::FailureContext;

/// Events for the two resource fetches of a download
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DownloadEvent {
    /// Request for a resource was issued
    Started { url: String, resource: String },

    /// Server answered with a success status; body is handed to verification
    Completed {
        url: String,
        resource: String,
        status: u16,
        elapsed: Duration,
    },

    /// Outcome arrived after the download was already cancelled and was dropped
    Discarded { url: String, resource: String },

    /// Resource could not be fetched
    Failed {
        url: String,
        resource: String,
        failure: FailureContext,
    },
}
