use std::sync::Arc;

use axum::http::HeaderMap;
use sha2::{Digest, Sha256};
use tracing::{error, warn};

use crate::secrets::{SecretProvider, API_KEY_SECRET};

/// Request header carrying the shared API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Checks the `x-api-key` header against the shared secret.
///
/// The secret is fetched from the provider on every call, so a rotated key
/// takes effect on the next request.
#[derive(Clone)]
pub struct Authorizer {
    secrets: Arc<dyn SecretProvider>,
}

impl Authorizer {
    pub fn new(secrets: Arc<dyn SecretProvider>) -> Self {
        Self { secrets }
    }

    /// Returns false when the secret cannot be fetched or is empty, when the
    /// header is missing, repeated or not valid text, or when it does not
    /// match exactly.
    pub async fn is_authorized(&self, headers: &HeaderMap) -> bool {
        let expected = match self.secrets.get(API_KEY_SECRET).await {
            Ok(value) => value,
            Err(e) => {
                error!(error = %e, "Failed to fetch API key secret");
                return false;
            }
        };
        if expected.is_empty() {
            warn!("API key secret is empty; rejecting all requests");
            return false;
        }

        // Exactly one header value; repeated headers are rejected outright
        let mut values = headers.get_all(API_KEY_HEADER).iter();
        let (Some(value), None) = (values.next(), values.next()) else {
            return false;
        };
        let Ok(provided) = value.to_str() else {
            return false;
        };

        keys_match(provided, &expected)
    }
}

/// Exact, case-sensitive comparison that does not short-circuit on the
/// first differing byte.
fn keys_match(provided: &str, expected: &str) -> bool {
    let a: [u8; 32] = Sha256::digest(provided.as_bytes()).into();
    let b: [u8; 32] = Sha256::digest(expected.as_bytes()).into();
    constant_time_eq_32(&a, &b)
}

fn constant_time_eq_32(a: &[u8; 32], b: &[u8; 32]) -> bool {
    let mut diff: u8 = 0;
    for idx in 0..32 {
        diff |= a[idx] ^ b[idx];
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::StaticSecretProvider;
    use axum::http::HeaderValue;

    fn authorizer(secret: Option<&str>) -> Authorizer {
        let mut provider = StaticSecretProvider::new();
        if let Some(secret) = secret {
            provider = provider.with_secret(API_KEY_SECRET, secret);
        }
        Authorizer::new(Arc::new(provider))
    }

    fn headers_with(key: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, HeaderValue::from_static(key));
        headers
    }

    #[test]
    fn key_comparison_is_exact() {
        assert!(keys_match("abc", "abc"));
        assert!(!keys_match("ABC", "abc"));
        assert!(!keys_match("abc ", "abc"));
        assert!(!keys_match("", "abc"));
    }

    #[tokio::test]
    async fn accepts_matching_header() {
        assert!(authorizer(Some("s3cret")).is_authorized(&headers_with("s3cret")).await);
    }

    #[tokio::test]
    async fn rejects_missing_or_wrong_header() {
        let auth = authorizer(Some("s3cret"));
        assert!(!auth.is_authorized(&HeaderMap::new()).await);
        assert!(!auth.is_authorized(&headers_with("S3CRET")).await);
        assert!(!auth.is_authorized(&headers_with("")).await);
    }

    #[tokio::test]
    async fn rejects_repeated_header() {
        let auth = authorizer(Some("s3cret"));
        let mut headers = headers_with("s3cret");
        headers.append(API_KEY_HEADER, HeaderValue::from_static("s3cret"));
        assert!(!auth.is_authorized(&headers).await);

        let mut headers = headers_with("s3cret");
        headers.append(API_KEY_HEADER, HeaderValue::from_static("other"));
        assert!(!auth.is_authorized(&headers).await);
    }

    #[tokio::test]
    async fn empty_secret_rejects_everything() {
        assert!(!authorizer(Some("")).is_authorized(&headers_with("")).await);
    }

    #[tokio::test]
    async fn unavailable_secret_rejects() {
        assert!(!authorizer(None).is_authorized(&headers_with("anything")).await);
    }
}
