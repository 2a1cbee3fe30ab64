//! Armored keyring parsing and detached-signature checks backed by the `pgp` crate

#[allow(clippy::wildcard_imports)]
use pgp::types::*;
use pgp::{Deserializable, SignedPublicKey, StandaloneSignature};
use sigdown_errors::{ConfigError, Error, SigningError};
use std::io::Read;

use crate::{SignatureVerifier, Signer};

const ARMOR_HEADER: &str = "-----BEGIN PGP PUBLIC KEY BLOCK-----";
const ARMOR_FOOTER: &str = "-----END PGP PUBLIC KEY BLOCK-----";

/// A public key accepted as a signer, with its identity names resolved
#[derive(Debug, Clone)]
pub struct TrustedKey {
    key: SignedPublicKey,
    identities: Vec<String>,
}

impl TrustedKey {
    fn new(key: SignedPublicKey) -> Self {
        let identities = identity_names(key.details.users.iter().map(|user| user.id.id()));
        Self { key, identities }
    }

    /// Identity names bound to this key, in packet order without duplicates
    #[must_use]
    pub fn identities(&self) -> &[String] {
        &self.identities
    }

    fn signer(&self) -> Signer {
        Signer {
            identities: self.identities.clone(),
        }
    }
}

/// Immutable set of trusted public keys
#[derive(Debug, Clone)]
pub struct Keyring {
    keys: Vec<TrustedKey>,
}

impl Keyring {
    /// Parse every key contained in an ASCII-armored public key block
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidKeyMaterial` if the block is empty, truncated,
    /// or contains no keys. The same error is returned when any key fails its
    /// self-signature check or has no user id with a name part.
    pub fn from_armored(armored: &str) -> Result<Self, Error> {
        match (armored.find(ARMOR_HEADER), armored.rfind(ARMOR_FOOTER)) {
            (Some(start), Some(end)) if start < end => {}
            _ => return Err(invalid_key("no complete armored public key block found")),
        }

        let (parsed, _headers) =
            SignedPublicKey::from_armor_many(armored.as_bytes()).map_err(invalid_key)?;

        let mut keys = Vec::new();
        for key in parsed {
            let key = key.map_err(invalid_key)?;
            key.verify().map_err(invalid_key)?;
            let trusted = TrustedKey::new(key);
            if trusted.identities.is_empty() {
                return Err(invalid_key("public key carries no named user id"));
            }
            keys.push(trusted);
        }

        if keys.is_empty() {
            return Err(invalid_key("no public keys found"));
        }

        Ok(Self { keys })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Identity names of every key, in keyring order
    pub fn identities(&self) -> impl Iterator<Item = &[String]> + '_ {
        self.keys.iter().map(TrustedKey::identities)
    }

    #[must_use]
    pub fn keys(&self) -> &[TrustedKey] {
        &self.keys
    }
}

impl SignatureVerifier for Keyring {
    fn check_detached_signature(
        &self,
        content: &mut dyn Read,
        signature: &mut dyn Read,
    ) -> Result<Signer, SigningError> {
        let (standalone, _headers) = StandaloneSignature::from_armor_single(signature)
            .map_err(|e| SigningError::InvalidSignatureFormat(e.to_string()))?;
        let signature = standalone.signature;
        let issuers: Vec<KeyId> = signature.issuer().into_iter().cloned().collect();

        for trusted in &self.keys {
            let primary = &trusted.key;
            let outcome = if issuers.contains(&primary.key_id()) {
                signature.verify(primary, &mut *content)
            } else if let Some(subkey) = primary
                .public_subkeys
                .iter()
                .find(|subkey| issuers.contains(&subkey.key_id()))
            {
                signature.verify(subkey, &mut *content)
            } else {
                continue;
            };

            return outcome
                .map(|()| trusted.signer())
                .map_err(|e| SigningError::VerificationFailed {
                    reason: e.to_string(),
                });
        }

        Err(SigningError::NoTrustedKeyFound {
            key_id: describe_issuers(&issuers),
        })
    }
}

#[allow(clippy::needless_pass_by_value)]
fn invalid_key(err: impl std::fmt::Display) -> Error {
    ConfigError::InvalidKeyMaterial {
        message: err.to_string(),
    }
    .into()
}

fn describe_issuers(issuers: &[KeyId]) -> String {
    if issuers.is_empty() {
        return "unknown".to_string();
    }
    issuers
        .iter()
        .map(|id| format!("{id:?}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Resolve user ids into distinct, non-empty names
fn identity_names<'a, S>(user_ids: impl IntoIterator<Item = &'a S>) -> Vec<String>
where
    S: AsRef<[u8]> + ?Sized + 'a,
{
    let mut names: Vec<String> = Vec::new();
    for raw in user_ids {
        let user_id = String::from_utf8_lossy(raw.as_ref());
        if let Some(name) = identity_name(&user_id) {
            if !names.iter().any(|known| known == name) {
                names.push(name.to_string());
            }
        }
    }
    names
}

/// Name part of an RFC 4880 user id: `Name (comment) <email>`
fn identity_name(user_id: &str) -> Option<&str> {
    let end = user_id
        .find(|c| c == '(' || c == '<')
        .unwrap_or(user_id.len());
    let name = user_id[..end].trim();
    (!name.is_empty()).then_some(name)
}
