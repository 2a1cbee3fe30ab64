//! Integration tests for signing

#[cfg(test)]
mod tests {
    use sigdown_errors::{ConfigError, Error, SigningError};
    use sigdown_signing::{Keyring, SignatureVerifier, Signer};
    use std::io::Cursor;

    const ALICE_KEY: &str = include_str!("fixtures/alice.pub.asc");
    const MALLORY_KEY: &str = include_str!("fixtures/mallory.pub.asc");
    const BOTH_KEYS: &str = include_str!("fixtures/keyring.asc");
    const NAMELESS_KEY: &str = include_str!("fixtures/nameless.pub.asc");
    const CONTENT: &[u8] = include_bytes!("fixtures/content.txt");
    const ALICE_SIG: &[u8] = include_bytes!("fixtures/content.txt.asc");
    const MALLORY_SIG: &[u8] = include_bytes!("fixtures/content.txt.mallory.asc");

    fn check(keyring: &Keyring, content: &[u8], signature: &[u8]) -> Result<Signer, SigningError> {
        keyring.check_detached_signature(&mut Cursor::new(content), &mut Cursor::new(signature))
    }

    #[test]
    fn test_valid_signature_returns_identities() {
        let keyring = Keyring::from_armored(ALICE_KEY).unwrap();
        assert_eq!(keyring.len(), 1);

        let signer = check(&keyring, CONTENT, ALICE_SIG).unwrap();
        assert_eq!(signer.identities, vec!["Alice", "Alice Liddell"]);
    }

    #[test]
    fn test_identities_are_stable_across_checks() {
        let keyring = Keyring::from_armored(ALICE_KEY).unwrap();
        let first = check(&keyring, CONTENT, ALICE_SIG).unwrap();
        for _ in 0..3 {
            assert_eq!(check(&keyring, CONTENT, ALICE_SIG).unwrap(), first);
        }
    }

    #[test]
    fn test_multi_key_block() {
        let keyring = Keyring::from_armored(BOTH_KEYS).unwrap();
        assert_eq!(keyring.len(), 2);
        assert!(!keyring.is_empty());
        assert_eq!(
            keyring.identities().collect::<Vec<_>>(),
            vec![&["Alice".to_string(), "Alice Liddell".to_string()][..], &["Mallory".to_string()][..]]
        );

        let alice = check(&keyring, CONTENT, ALICE_SIG).unwrap();
        assert_eq!(alice.identities, vec!["Alice", "Alice Liddell"]);
        let mallory = check(&keyring, CONTENT, MALLORY_SIG).unwrap();
        assert_eq!(mallory.identities, vec!["Mallory"]);
    }

    #[test]
    fn test_untrusted_signer() {
        let keyring = Keyring::from_armored(ALICE_KEY).unwrap();
        let err = check(&keyring, CONTENT, MALLORY_SIG).unwrap_err();
        assert!(matches!(err, SigningError::NoTrustedKeyFound { .. }), "{err}");
    }

    #[test]
    fn test_tampered_content() {
        let keyring = Keyring::from_armored(ALICE_KEY).unwrap();
        let mut tampered = CONTENT.to_vec();
        tampered[0] ^= 0x20;

        let err = check(&keyring, &tampered, ALICE_SIG).unwrap_err();
        assert!(matches!(err, SigningError::VerificationFailed { .. }), "{err}");
    }

    #[test]
    fn test_truncated_content() {
        let keyring = Keyring::from_armored(ALICE_KEY).unwrap();
        let err = check(&keyring, &CONTENT[..10], ALICE_SIG).unwrap_err();
        assert!(matches!(err, SigningError::VerificationFailed { .. }), "{err}");
    }

    #[test]
    fn test_garbage_signature() {
        let keyring = Keyring::from_armored(ALICE_KEY).unwrap();
        let err = check(&keyring, CONTENT, b"definitely not a signature").unwrap_err();
        assert!(matches!(err, SigningError::InvalidSignatureFormat(_)), "{err}");

        let err = check(&keyring, CONTENT, &ALICE_SIG[..ALICE_SIG.len() / 2]).unwrap_err();
        assert!(matches!(err, SigningError::InvalidSignatureFormat(_)), "{err}");
    }

    #[test]
    fn test_invalid_key_material() {
        let truncated = &ALICE_KEY[..ALICE_KEY.len() / 2];
        for input in ["", truncated] {
            let err = Keyring::from_armored(input).unwrap_err();
            assert!(
                matches!(err, Error::Config(ConfigError::InvalidKeyMaterial { .. })),
                "{err}"
            );
        }
    }

    #[test]
    fn test_key_without_named_user_id_is_rejected() {
        let err = Keyring::from_armored(NAMELESS_KEY).unwrap_err();
        match err {
            Error::Config(ConfigError::InvalidKeyMaterial { message }) => {
                assert!(message.contains("no named user id"), "{message}");
            }
            other => panic!("expected invalid key material, got {other:?}"),
        }
    }

    #[test]
    fn test_separately_parsed_keys() {
        let alice = Keyring::from_armored(ALICE_KEY).unwrap();
        let mallory = Keyring::from_armored(MALLORY_KEY).unwrap();
        assert_eq!(alice.keys()[0].identities(), ["Alice", "Alice Liddell"]);
        assert_eq!(mallory.keys()[0].identities(), ["Mallory"]);
    }

    #[test]
    fn test_signer_serialization() {
        let signer = Signer {
            identities: vec!["Alice".to_string()],
        };
        let json = serde_json::to_string(&signer).unwrap();
        assert_eq!(json, r#"{"identities":["Alice"]}"#);
    }
}
