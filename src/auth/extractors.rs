//! Axum extractors for authentication.

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use super::credentials::get_bearer_token;
use super::errors::AuthError;
use super::guard::{authenticate_request, authenticate_service};
use super::state::{HasAuthState, HasServiceKey};

/// Authenticated account resolved from a bearer access token.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

/// Extractor for endpoints that require a valid access token.
pub struct ApiAuth(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for ApiAuth
where
    S: HasAuthState + Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user_id = authenticate_request(&parts.headers, state.jwt().secret())?;
        Ok(ApiAuth(AuthenticatedUser { user_id }))
    }
}

/// Raw bearer credential, unvalidated. The refresh and revoke endpoints
/// carry a refresh token in this slot rather than an access token.
pub struct BearerToken(pub String);

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        get_bearer_token(&parts.headers).map(|token| BearerToken(token.to_string()))
    }
}

/// Extractor for service-to-service endpoints guarded by the shared API key.
pub struct ServiceAuth;

impl<S> FromRequestParts<S> for ServiceAuth
where
    S: HasServiceKey + Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        authenticate_service(&parts.headers, state.api_key())?;
        Ok(ServiceAuth)
    }
}
