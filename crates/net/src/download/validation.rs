//! URL validation for downloads

use sigdown_errors::NetworkError;
use url::Url;

/// Validate URL and check for supported protocols
pub(super) fn validate_url(url: &str) -> Result<Url, NetworkError> {
    let parsed = Url::parse(url).map_err(|e| NetworkError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(NetworkError::UnsupportedProtocol {
            protocol: scheme.to_string(),
        }),
    }
}
