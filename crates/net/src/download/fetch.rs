//! Single-resource fetch bound to the shared cancellation token

use super::config::ResourceKind;
use super::emitter::InvocationEvents;
use super::validation::validate_url;
use crate::client::{BodyReader, HttpResponse, HttpTransport};
use sigdown_errors::NetworkError;
use sigdown_events::{AppEvent, DownloadEvent, EventEmitter, FailureContext};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// A ready body stream for one resource, or the reason it could not be fetched
pub(super) type FetchOutcome = Result<(ResourceKind, BodyReader), NetworkError>;

/// Fetch `url` on its own task and report the outcome on `results`
///
/// Nothing is reported once `token` is cancelled.
pub(super) fn spawn_fetch(
    transport: Arc<dyn HttpTransport>,
    kind: ResourceKind,
    url: String,
    token: CancellationToken,
    results: mpsc::Sender<FetchOutcome>,
    events: InvocationEvents,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Some(outcome) = fetch(transport.as_ref(), kind, &url, &token, &events).await {
            // Receiver gone means the download already reached a terminal state
            let _ = results.send(outcome.map(|body| (kind, body))).await;
        }
    })
}

/// Issue one GET for `url`, returning `None` if the outcome went stale
pub(super) async fn fetch(
    transport: &dyn HttpTransport,
    kind: ResourceKind,
    url: &str,
    token: &CancellationToken,
    events: &InvocationEvents,
) -> Option<Result<BodyReader, NetworkError>> {
    events.emit(AppEvent::Download(DownloadEvent::Started {
        url: url.to_string(),
        resource: kind.to_string(),
    }));
    let start = Instant::now();

    let outcome = tokio::select! {
        biased;
        () = token.cancelled() => None,
        response = request(transport, kind, url) => Some(response),
    };

    let outcome = match outcome {
        Some(outcome) if !token.is_cancelled() => outcome,
        _ => {
            events.emit(AppEvent::Download(DownloadEvent::Discarded {
                url: url.to_string(),
                resource: kind.to_string(),
            }));
            return None;
        }
    };

    match outcome {
        Ok(response) => {
            events.emit(AppEvent::Download(DownloadEvent::Completed {
                url: url.to_string(),
                resource: kind.to_string(),
                status: response.status,
                elapsed: start.elapsed(),
            }));
            Some(Ok(response.body))
        }
        Err(err) => {
            events.emit(AppEvent::Download(DownloadEvent::Failed {
                url: url.to_string(),
                resource: kind.to_string(),
                failure: FailureContext::from_error(&err),
            }));
            Some(Err(err))
        }
    }
}

async fn request(
    transport: &dyn HttpTransport,
    kind: ResourceKind,
    url: &str,
) -> Result<HttpResponse, NetworkError> {
    let parsed = validate_url(url).map_err(|e| fetch_failed(kind, url, None, e.to_string()))?;

    let response = transport
        .get(parsed.as_str())
        .await
        .map_err(|e| fetch_failed(kind, url, None, e.to_string()))?;

    if !(200..300).contains(&response.status) {
        return Err(fetch_failed(
            kind,
            url,
            Some(response.status),
            format!("unexpected HTTP response code {}", response.status),
        ));
    }

    Ok(response)
}

fn fetch_failed(
    kind: ResourceKind,
    url: &str,
    status: Option<u16>,
    message: String,
) -> NetworkError {
    NetworkError::FetchFailed {
        resource: kind.to_string(),
        url: url.to_string(),
        status,
        message,
    }
}
