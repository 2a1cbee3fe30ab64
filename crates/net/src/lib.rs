#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Network operations for sigdown
//!
//! This crate fetches a content blob and its detached `OpenPGP` signature
//! concurrently, enforces byte and time budgets on both, and returns the
//! content only after the signature verified against a trusted keyring.

mod client;
mod download;

pub use client::{BodyReader, HttpResponse, HttpTransport, NetClient, NetConfig};
pub use download::{DownloadRequest, Downloader, ResourceKind, SignedContent};
pub use tokio_util::sync::CancellationToken;

use sigdown_errors::Error;

/// Download `content_url` and verify it against the signature at
/// `signature_url` using the keys of `armored_keys`
///
/// Uses the default byte cap and timeout. Build a [`Downloader`] once and
/// reuse it when downloading more than one file.
///
/// # Errors
///
/// Returns an error if the key block cannot be parsed, either resource cannot
/// be fetched, or the signature does not verify within the budgets.
pub async fn download_signed(
    armored_keys: &str,
    content_url: &str,
    signature_url: &str,
) -> Result<SignedContent, Error> {
    let downloader = Downloader::new(armored_keys)?;
    downloader
        .download(&DownloadRequest::new(content_url, signature_url))
        .await
}
