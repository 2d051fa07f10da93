//! `Authorization` header parsing.
//!
//! The scheme prefix is stripped when present. A header without it is passed
//! through unchanged, so `Authorization: abc123` yields `abc123`.

use axum::http::{HeaderMap, header};

use super::errors::AuthError;

const BEARER_PREFIX: &str = "Bearer ";
const API_KEY_PREFIX: &str = "ApiKey ";

/// Extract a bearer token from the `Authorization` header.
pub fn get_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    authorization_credential(headers, BEARER_PREFIX)
}

/// Extract the webhook API key from the `Authorization` header.
pub fn get_api_key(headers: &HeaderMap) -> Result<&str, AuthError> {
    authorization_credential(headers, API_KEY_PREFIX)
}

fn authorization_credential<'a>(headers: &'a HeaderMap, scheme: &str) -> Result<&'a str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .ok_or(AuthError::MissingCredential)?;

    Ok(value.strip_prefix(scheme).unwrap_or(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_bearer_token() {
        let headers = headers_with("Bearer abc123");
        assert_eq!(get_bearer_token(&headers).unwrap(), "abc123");
    }

    #[test]
    fn test_bearer_without_scheme_passes_through() {
        let headers = headers_with("abc123");
        assert_eq!(get_bearer_token(&headers).unwrap(), "abc123");
    }

    #[test]
    fn test_missing_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));

        assert!(matches!(
            get_bearer_token(&headers),
            Err(AuthError::MissingCredential)
        ));
        assert!(matches!(
            get_api_key(&headers),
            Err(AuthError::MissingCredential)
        ));
    }

    #[test]
    fn test_empty_header_is_missing() {
        let headers = headers_with("");
        assert!(matches!(
            get_bearer_token(&headers),
            Err(AuthError::MissingCredential)
        ));
    }

    #[test]
    fn test_only_leading_prefix_is_stripped() {
        let headers = headers_with("Bearer Bearer xyz");
        assert_eq!(get_bearer_token(&headers).unwrap(), "Bearer xyz");
    }

    #[test]
    fn test_api_key() {
        let headers = headers_with("ApiKey f271c81ff7084ee5b99a5091b42d486e");
        assert_eq!(
            get_api_key(&headers).unwrap(),
            "f271c81ff7084ee5b99a5091b42d486e"
        );
    }

    #[test]
    fn test_api_key_does_not_strip_bearer() {
        let headers = headers_with("Bearer secret");
        assert_eq!(get_api_key(&headers).unwrap(), "Bearer secret");
    }
}
