#![deny(clippy::pedantic, unsafe_code)]

//! `OpenPGP` detached-signature verification for sigdown
//!
//! The [`Keyring`] is parsed once from an armored public key block and is
//! never mutated afterwards, so it can be shared behind an `Arc` by any
//! number of concurrent downloads.

mod keyring;

pub use keyring::{Keyring, TrustedKey};

use serde::{Deserialize, Serialize};
use sigdown_errors::SigningError;
use std::io::Read;

/// Identity information of the key that produced a valid signature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signer {
    /// Names bound to the key's user ids, in keyring order
    pub identities: Vec<String>,
}

/// Streaming detached-signature check against a set of trusted keys
///
/// Implementations read `signature` to completion first, then consume
/// `content` in a single pass. Both readers may report end-of-stream early
/// (byte cap reached, operation cancelled); that surfaces as a failed check.
pub trait SignatureVerifier: Send + Sync {
    /// Check `signature` over the bytes of `content`
    ///
    /// # Errors
    ///
    /// Returns an error if the signature cannot be parsed, was made by an
    /// untrusted key, or does not match the content.
    fn check_detached_signature(
        &self,
        content: &mut dyn Read,
        signature: &mut dyn Read,
    ) -> Result<Signer, SigningError>;
}
