//! Verification stage: signature check with concurrent content buffering

use super::config::SignedContent;
use super::stream::LimitedReader;
use crate::client::BodyReader;
use bytes::{Bytes, BytesMut};
use sigdown_errors::{Error, SigningError};
use sigdown_signing::SignatureVerifier;
use std::io::{self, Read};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio_util::io::SyncIoBridge;
use tokio_util::sync::CancellationToken;

/// Chunks in flight between the verifier and the content buffer
const TEE_CAPACITY: usize = 16;

/// Copies every chunk the verifier reads into the content buffer
struct TeeReader<R> {
    inner: R,
    chunks: mpsc::Sender<Bytes>,
}

impl<R: Read> Read for TeeReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let read = self.inner.read(buf)?;
        if read > 0 {
            self.chunks
                .blocking_send(Bytes::copy_from_slice(&buf[..read]))
                .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "content buffer closed"))?;
        }
        Ok(read)
    }
}

/// Check `signature` over `content`, returning the buffered content and the
/// signer identities only if the check passes
///
/// Both bodies are capped at `max_bytes` and stop early once `token` is
/// cancelled. When the check fails, whatever the verifier left unread is
/// drained first; if either body then reached the cap, the failure is
/// reported as size-exceeded rather than a mismatch.
pub(super) async fn verify(
    verifier: Arc<dyn SignatureVerifier>,
    content: BodyReader,
    signature: BodyReader,
    max_bytes: u64,
    token: &CancellationToken,
) -> Result<SignedContent, Error> {
    let content = LimitedReader::new(content, max_bytes, token.clone());
    let signature = LimitedReader::new(signature, max_bytes, token.clone());
    let content_read = content.counter();
    let signature_read = signature.counter();

    let (chunks, mut buffered) = mpsc::channel::<Bytes>(TEE_CAPACITY);
    let collector = tokio::spawn(async move {
        let mut buffer = BytesMut::new();
        while let Some(chunk) = buffered.recv().await {
            buffer.extend_from_slice(&chunk);
        }
        buffer.freeze()
    });

    let handle = Handle::current();
    let check = tokio::task::spawn_blocking(move || {
        let mut content = TeeReader {
            inner: SyncIoBridge::new_with_handle(content, handle.clone()),
            chunks,
        };
        let mut signature = SyncIoBridge::new_with_handle(signature, handle);
        let outcome = verifier.check_detached_signature(&mut content, &mut signature);
        if outcome.is_err() {
            // The check may stop before reading everything; the counters must
            // see the real body sizes. Both readers are capped and cancelable.
            let _ = io::copy(&mut content.inner, &mut io::sink());
            let _ = io::copy(&mut signature, &mut io::sink());
        }
        outcome
    });

    let outcome = match check.await {
        Ok(outcome) => outcome,
        Err(e) => {
            collector.abort();
            return Err(Error::internal(format!("verification task failed: {e}")));
        }
    };

    match outcome {
        Ok(signer) => {
            let content = collector
                .await
                .map_err(|e| SigningError::ContentUnreadable {
                    message: e.to_string(),
                })?;
            Ok(SignedContent {
                content,
                signers: signer.identities,
            })
        }
        Err(err) => {
            collector.abort();
            if content_read.get() >= max_bytes || signature_read.get() >= max_bytes {
                Err(SigningError::SizeExceeded { limit: max_bytes }.into())
            } else {
                Err(SigningError::Mismatch {
                    reason: err.to_string(),
                }
                .into())
            }
        }
    }
}
