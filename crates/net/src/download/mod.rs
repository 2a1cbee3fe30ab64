//! Signed download pipeline
//!
//! Both resources are fetched in parallel under one cancellation token. Once
//! both bodies are available they are streamed through the signature check
//! while the content is buffered alongside; the buffer is only handed out if
//! the check passes.

mod config;
mod core;
mod emitter;
mod fetch;
mod stream;
mod validation;
mod verify;

#[cfg(test)]
pub(crate) mod testing;

// Re-export public types and structs
pub use config::{DownloadRequest, ResourceKind, SignedContent};
pub use core::Downloader;
