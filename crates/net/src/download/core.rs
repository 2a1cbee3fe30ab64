//! Main downloader orchestration and `Downloader` implementation

use super::config::{DownloadRequest, ResourceKind, SignedContent};
use super::emitter::InvocationEvents;
use super::fetch::{spawn_fetch, FetchOutcome};
use super::verify::verify;
use crate::client::{BodyReader, HttpTransport, NetClient, NetConfig};
use sigdown_config::DownloadConfig;
use sigdown_errors::Error;
use sigdown_events::{AppEvent, EventEmitter, EventSender, FailureContext, VerificationEvent};
use sigdown_signing::{Keyring, SignatureVerifier};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Downloads content together with its detached signature and returns the
/// content only once the signature verified against the trusted keyring
///
/// The keyring and transport are shared read-only, so one `Downloader` can
/// serve any number of concurrent downloads.
#[derive(Clone)]
pub struct Downloader {
    verifier: Arc<dyn SignatureVerifier>,
    transport: Arc<dyn HttpTransport>,
    config: DownloadConfig,
    event_sender: Option<EventSender>,
}

impl std::fmt::Debug for Downloader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Downloader")
            .field("config", &self.config)
            .field("events", &self.event_sender.is_some())
            .finish_non_exhaustive()
    }
}

impl Downloader {
    /// Create a downloader trusting the keys of an armored public key block
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidKeyMaterial` if the key block cannot be
    /// parsed, or an error if the HTTP client cannot be initialized.
    pub fn new(armored_keys: &str) -> Result<Self, Error> {
        Self::with_config(armored_keys, DownloadConfig::default(), NetConfig::default())
    }

    /// Create a downloader with explicit budgets and client settings
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidKeyMaterial` if the key block cannot be
    /// parsed, or an error if the HTTP client cannot be initialized.
    pub fn with_config(
        armored_keys: &str,
        config: DownloadConfig,
        net_config: NetConfig,
    ) -> Result<Self, Error> {
        let keyring = Keyring::from_armored(armored_keys)?;
        let client = NetClient::new(net_config)?;
        Ok(Self::with_parts(Arc::new(keyring), Arc::new(client), config))
    }

    /// Assemble a downloader from its capabilities
    #[must_use]
    pub fn with_parts(
        verifier: Arc<dyn SignatureVerifier>,
        transport: Arc<dyn HttpTransport>,
        config: DownloadConfig,
    ) -> Self {
        Self {
            verifier,
            transport,
            config,
            event_sender: None,
        }
    }

    /// Emit download and verification events through `sender`
    #[must_use]
    pub fn with_event_sender(mut self, sender: EventSender) -> Self {
        self.event_sender = Some(sender);
        self
    }

    #[must_use]
    pub fn config(&self) -> &DownloadConfig {
        &self.config
    }

    /// Download and verify `request`
    ///
    /// # Errors
    ///
    /// Returns an error if either resource cannot be fetched, a body exceeds
    /// the byte cap, the signature does not verify, or the deadline expires.
    pub async fn download(&self, request: &DownloadRequest) -> Result<SignedContent, Error> {
        self.download_with_cancel(request, &CancellationToken::new())
            .await
    }

    /// Download and verify `request`, giving up with `Error::Cancelled` once
    /// `cancel` fires
    ///
    /// # Errors
    ///
    /// Returns an error if either resource cannot be fetched, a body exceeds
    /// the byte cap, the signature does not verify, the deadline expires, or
    /// the caller cancels.
    pub async fn download_with_cancel(
        &self,
        request: &DownloadRequest,
        cancel: &CancellationToken,
    ) -> Result<SignedContent, Error> {
        let max_bytes = request.max_bytes_or(self.config.max_bytes());
        let timeout = request.timeout_or(self.config.timeout());
        let events = InvocationEvents::new(self.event_sender.clone());
        let start = Instant::now();

        // Cancelled on every exit, which unwinds fetch tasks and body reads
        let token = cancel.child_token();
        let _guard = token.clone().drop_guard();

        let result = tokio::select! {
            biased;
            () = cancel.cancelled() => Err(Error::Cancelled),
            () = tokio::time::sleep(timeout) => Err(Error::TimedOut { timeout }),
            result = self.run(request, max_bytes, &token, &events) => result,
        };

        match &result {
            Ok(signed) => events.emit(AppEvent::Verification(VerificationEvent::Verified {
                content_url: request.content_url.clone(),
                signers: signed.signers.clone(),
                bytes: signed.content.len() as u64,
                elapsed: start.elapsed(),
            })),
            Err(err) => events.emit(AppEvent::Verification(VerificationEvent::Rejected {
                content_url: request.content_url.clone(),
                failure: FailureContext::from_error(err),
            })),
        }

        result
    }

    async fn run(
        &self,
        request: &DownloadRequest,
        max_bytes: u64,
        token: &CancellationToken,
        events: &InvocationEvents,
    ) -> Result<SignedContent, Error> {
        let (content, signature) = self.fetch_both(request, token, events).await?;

        events.emit(AppEvent::Verification(VerificationEvent::Started {
            content_url: request.content_url.clone(),
            max_bytes,
        }));

        verify(
            Arc::clone(&self.verifier),
            content,
            signature,
            max_bytes,
            token,
        )
        .await
    }

    /// Fetch both resources in parallel, failing on the first fetch failure
    async fn fetch_both(
        &self,
        request: &DownloadRequest,
        token: &CancellationToken,
        events: &InvocationEvents,
    ) -> Result<(BodyReader, BodyReader), Error> {
        let (results, mut outcomes) = mpsc::channel::<FetchOutcome>(2);
        for (kind, url) in [
            (ResourceKind::Content, &request.content_url),
            (ResourceKind::Signature, &request.signature_url),
        ] {
            spawn_fetch(
                Arc::clone(&self.transport),
                kind,
                url.clone(),
                token.clone(),
                results.clone(),
                events.clone(),
            );
        }
        drop(results);

        let mut content = None;
        let mut signature = None;
        while content.is_none() || signature.is_none() {
            match outcomes.recv().await {
                Some(Ok((ResourceKind::Content, body))) => content = Some(body),
                Some(Ok((ResourceKind::Signature, body))) => signature = Some(body),
                Some(Err(err)) => {
                    token.cancel();
                    return Err(err.into());
                }
                // Both fetchers went quiet, which only happens once cancelled
                None => return Err(Error::Cancelled),
            }
        }

        content
            .zip(signature)
            .ok_or_else(|| Error::internal("fetch loop ended without both bodies"))
    }
}
