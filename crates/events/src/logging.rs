//! Structured logging integration for events
//!
//! Converts domain events into `tracing` records with structured fields so
//! that any subscriber (fmt, json, OpenTelemetry) can consume them.

use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::{AppEvent, DownloadEvent, EventMessage, EventReceiver, VerificationEvent};

/// Log an event using the tracing infrastructure with structured fields
pub fn log_event_with_tracing(message: &EventMessage) {
    let meta = &message.meta;
    match &message.event {
        AppEvent::Download(download) => match download {
            DownloadEvent::Started { url, resource } => {
                debug!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    url = %url,
                    resource = %resource,
                    "Fetch started"
                );
            }
            DownloadEvent::Completed {
                url,
                resource,
                status,
                elapsed,
            } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    url = %url,
                    resource = %resource,
                    status = status,
                    elapsed_ms = elapsed.as_millis(),
                    "Fetch completed"
                );
            }
            DownloadEvent::Discarded { url, resource } => {
                debug!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    url = %url,
                    resource = %resource,
                    "Fetch outcome discarded after cancellation"
                );
            }
            DownloadEvent::Failed {
                url,
                resource,
                failure,
            } => {
                error!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    url = %url,
                    resource = %resource,
                    retryable = failure.retryable,
                    code = ?failure.code,
                    message = %failure.message,
                    hint = ?failure.hint,
                    "Fetch failed"
                );
            }
        },

        AppEvent::Verification(verification) => match verification {
            VerificationEvent::Started {
                content_url,
                max_bytes,
            } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    url = %content_url,
                    max_bytes = max_bytes,
                    "Signature verification started"
                );
            }
            VerificationEvent::Verified {
                content_url,
                signers,
                bytes,
                elapsed,
            } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    url = %content_url,
                    signers = ?signers,
                    bytes = bytes,
                    elapsed_ms = elapsed.as_millis(),
                    "Signature verified"
                );
            }
            VerificationEvent::Rejected {
                content_url,
                failure,
            } => {
                error!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    url = %content_url,
                    retryable = failure.retryable,
                    code = ?failure.code,
                    message = %failure.message,
                    hint = ?failure.hint,
                    "Signed download rejected"
                );
            }
        },
    }
}

/// Drain a receiver into `tracing` until every sender is dropped
///
/// Must be called from within a tokio runtime.
#[must_use]
pub fn forward_to_tracing(mut rx: EventReceiver) -> JoinHandle<usize> {
    tokio::spawn(async move {
        let mut forwarded = 0;
        while let Some(message) = rx.recv().await {
            log_event_with_tracing(&message);
            forwarded += 1;
        }
        forwarded
    })
}
