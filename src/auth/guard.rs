//! Authentication and ownership rules shared by every protected endpoint.

use axum::http::HeaderMap;
use uuid::Uuid;

use super::credentials::{get_api_key, get_bearer_token};
use super::errors::AuthError;
use crate::jwt::validate_access_token;

/// Resolve the account behind a request's bearer access token.
pub fn authenticate_request(headers: &HeaderMap, secret: &[u8]) -> Result<Uuid, AuthError> {
    let token = get_bearer_token(headers)?;
    Ok(validate_access_token(token, secret)?)
}

/// Only the owner of a resource may mutate it. No roles, no overrides.
pub fn authorize_ownership(actor: Uuid, owner: Uuid) -> Result<(), AuthError> {
    if actor == owner {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}

/// Check that a service caller presented the configured API key.
pub fn authenticate_service(headers: &HeaderMap, expected_key: &str) -> Result<(), AuthError> {
    let key = get_api_key(headers)?;
    if constant_time_eq(key.as_bytes(), expected_key.as_bytes()) {
        Ok(())
    } else {
        Err(AuthError::InvalidApiKey)
    }
}

/// Byte equality whose running time does not depend on where the inputs differ.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::make_access_token;
    use axum::http::{HeaderValue, header};
    use std::time::Duration;

    const SECRET: &[u8] = b"guard-test-secret";

    fn auth_header(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_authenticate_request() {
        let id = Uuid::new_v4();
        let token = make_access_token(id, SECRET, Duration::from_secs(60)).unwrap();

        let headers = auth_header(&format!("Bearer {}", token));
        assert_eq!(authenticate_request(&headers, SECRET).unwrap(), id);
    }

    #[test]
    fn test_authenticate_request_failures() {
        assert!(matches!(
            authenticate_request(&HeaderMap::new(), SECRET),
            Err(AuthError::MissingCredential)
        ));

        let token = make_access_token(Uuid::new_v4(), b"other", Duration::from_secs(60)).unwrap();
        let headers = auth_header(&format!("Bearer {}", token));
        assert!(matches!(
            authenticate_request(&headers, SECRET),
            Err(AuthError::InvalidToken)
        ));

        let token = make_access_token(Uuid::new_v4(), SECRET, Duration::ZERO).unwrap();
        let headers = auth_header(&format!("Bearer {}", token));
        assert!(matches!(
            authenticate_request(&headers, SECRET),
            Err(AuthError::Expired)
        ));
    }

    #[test]
    fn test_authorize_ownership() {
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        assert!(authorize_ownership(alice, alice).is_ok());
        assert!(matches!(
            authorize_ownership(alice, bob),
            Err(AuthError::Forbidden)
        ));
    }

    #[test]
    fn test_authenticate_service() {
        let expected = "f271c81ff7084ee5b99a5091b42d486e";

        let headers = auth_header(&format!("ApiKey {}", expected));
        assert!(authenticate_service(&headers, expected).is_ok());

        let headers = auth_header("ApiKey wrong");
        assert!(matches!(
            authenticate_service(&headers, expected),
            Err(AuthError::InvalidApiKey)
        ));

        let headers = auth_header(&format!("ApiKey {}0", expected));
        assert!(authenticate_service(&headers, expected).is_err());

        assert!(matches!(
            authenticate_service(&HeaderMap::new(), expected),
            Err(AuthError::MissingCredential)
        ));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"ab"));
        assert!(constant_time_eq(b"", b""));
    }
}
