//! In-memory transport and verifiers for unit tests

use crate::client::{HttpResponse, HttpTransport};
use async_trait::async_trait;
use sigdown_errors::{NetworkError, SigningError};
use sigdown_signing::{SignatureVerifier, Signer};
use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::time::Duration;

#[derive(Debug, Clone)]
pub(crate) enum Route {
    Respond {
        status: u16,
        body: Vec<u8>,
        delay: Duration,
    },
    Fail(NetworkError),
    Hang,
}

impl Route {
    pub(crate) fn ok(body: &[u8]) -> Self {
        Self::Respond {
            status: 200,
            body: body.to_vec(),
            delay: Duration::ZERO,
        }
    }

    pub(crate) fn status(status: u16) -> Self {
        Self::Respond {
            status,
            body: Vec::new(),
            delay: Duration::ZERO,
        }
    }

    pub(crate) fn delayed(self, by: Duration) -> Self {
        match self {
            Self::Respond { status, body, .. } => Self::Respond {
                status,
                body,
                delay: by,
            },
            other => other,
        }
    }
}

/// Transport answering from a fixed routing table; unknown URLs get a 404
#[derive(Debug, Default)]
pub(crate) struct StaticTransport {
    routes: HashMap<String, Route>,
}

impl StaticTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn route(mut self, url: &str, route: Route) -> Self {
        self.routes.insert(url.to_string(), route);
        self
    }
}

#[async_trait]
impl HttpTransport for StaticTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, NetworkError> {
        match self.routes.get(url).cloned().unwrap_or(Route::status(404)) {
            Route::Respond {
                status,
                body,
                delay,
            } => {
                tokio::time::sleep(delay).await;
                Ok(HttpResponse {
                    status,
                    body: Box::pin(Cursor::new(body)),
                })
            }
            Route::Fail(err) => Err(err),
            Route::Hang => std::future::pending().await,
        }
    }
}

/// Verifier that drains both streams and then accepts or rejects
#[derive(Debug, Clone)]
pub(crate) struct DrainingVerifier {
    identities: Option<Vec<String>>,
}

impl DrainingVerifier {
    pub(crate) fn accepting(identities: &[&str]) -> Self {
        Self {
            identities: Some(identities.iter().map(ToString::to_string).collect()),
        }
    }

    pub(crate) fn rejecting() -> Self {
        Self { identities: None }
    }
}

impl SignatureVerifier for DrainingVerifier {
    fn check_detached_signature(
        &self,
        content: &mut dyn Read,
        signature: &mut dyn Read,
    ) -> Result<Signer, SigningError> {
        let unreadable = |e: std::io::Error| SigningError::ContentUnreadable {
            message: e.to_string(),
        };
        std::io::copy(signature, &mut std::io::sink()).map_err(unreadable)?;
        std::io::copy(content, &mut std::io::sink()).map_err(unreadable)?;

        match &self.identities {
            Some(identities) => Ok(Signer {
                identities: identities.clone(),
            }),
            None => Err(SigningError::VerificationFailed {
                reason: "hash mismatch".to_string(),
            }),
        }
    }
}

/// Verifier that reads only the signature and rejects its issuer, leaving
/// the content untouched
#[derive(Debug, Clone, Copy)]
pub(crate) struct UntrustedVerifier;

impl SignatureVerifier for UntrustedVerifier {
    fn check_detached_signature(
        &self,
        _content: &mut dyn Read,
        signature: &mut dyn Read,
    ) -> Result<Signer, SigningError> {
        std::io::copy(signature, &mut std::io::sink()).map_err(|e| {
            SigningError::ContentUnreadable {
                message: e.to_string(),
            }
        })?;
        Err(SigningError::NoTrustedKeyFound {
            key_id: "KeyId(0000000000000000)".to_string(),
        })
    }
}
