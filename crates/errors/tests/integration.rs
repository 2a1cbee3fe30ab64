//! Integration tests for error types

#[cfg(test)]
mod tests {
    use sigdown_errors::*;
    use std::time::Duration;

    #[test]
    fn test_error_conversion() {
        let net_err = NetworkError::FetchFailed {
            resource: "signature".into(),
            url: "https://example.com/file.asc".into(),
            status: Some(404),
            message: "unexpected HTTP response code 404".into(),
        };
        let err: Error = net_err.into();
        assert!(matches!(err, Error::Network(_)));
    }

    #[test]
    fn test_fetch_failure_display() {
        let err = NetworkError::FetchFailed {
            resource: "signature".into(),
            url: "https://example.com/file.asc".into(),
            status: Some(404),
            message: "unexpected HTTP response code 404".into(),
        };
        assert_eq!(
            err.to_string(),
            "could not download signature from https://example.com/file.asc: unexpected HTTP response code 404"
        );
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.resource(), Some("signature"));
    }

    #[test]
    fn test_key_material_prefix() {
        let err: Error = ConfigError::InvalidKeyMaterial {
            message: "unexpected end of input".into(),
        }
        .into();
        assert!(err.to_string().starts_with("bad PGP key:"));
        assert_eq!(err.user_code(), Some("config.invalid_key"));
    }

    #[test]
    fn test_timeout_and_cancel_are_distinct() {
        let timeout = Error::TimedOut {
            timeout: Duration::from_millis(10),
        };
        let cancelled = Error::Cancelled;

        assert!(timeout.is_timeout() && !timeout.is_cancelled());
        assert!(cancelled.is_cancelled() && !cancelled.is_timeout());
        assert_eq!(cancelled.to_string(), "operation was canceled");
        assert!(timeout.is_retryable());
        assert!(!cancelled.is_retryable());
    }

    #[test]
    fn test_retryable_fetch_failures() {
        let not_found: Error = NetworkError::FetchFailed {
            resource: "content".into(),
            url: "https://example.com".into(),
            status: Some(404),
            message: "unexpected HTTP response code 404".into(),
        }
        .into();
        let unavailable: Error = NetworkError::FetchFailed {
            resource: "content".into(),
            url: "https://example.com".into(),
            status: Some(503),
            message: "unexpected HTTP response code 503".into(),
        }
        .into();

        assert!(!not_found.is_retryable());
        assert!(unavailable.is_retryable());
    }

    #[test]
    fn test_signing_error_messages() {
        let size = SigningError::SizeExceeded { limit: 100 };
        assert!(size
            .to_string()
            .contains("reached max bytes allowed to download"));

        let mismatch = SigningError::Mismatch {
            reason: "bad hash".into(),
        };
        assert!(mismatch.to_string().contains("file and signature mismatch"));
    }

    #[test]
    fn test_error_clone() {
        let err: Error = SigningError::ContentUnreadable {
            message: "channel closed".into(),
        }
        .into();
        let cloned = err.clone();
        assert_eq!(err.to_string(), cloned.to_string());
    }
}
