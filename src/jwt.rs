//! JWT access token generation and validation.
//!
//! Access tokens are stateless: validity is decided by the HS256 signature,
//! the issuer and the expiry, never by a database lookup.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Issuer written into and required from every access token.
pub const TOKEN_ISSUER: &str = "chirpy";

/// Access token duration: 1 hour
pub const ACCESS_TOKEN_DURATION: Duration = Duration::from_secs(60 * 60);

/// JWT claims for access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (account UUID)
    pub sub: String,
    /// Issuer
    pub iss: String,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

/// Create a signed access token for `user_id` that expires after `ttl`.
pub fn make_access_token(user_id: Uuid, secret: &[u8], ttl: Duration) -> Result<String, JwtError> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|_| JwtError::TimeError)?;

    let claims = AccessClaims {
        sub: user_id.to_string(),
        iss: TOKEN_ISSUER.to_string(),
        iat: now.as_secs(),
        exp: (now + ttl).as_secs(),
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(JwtError::Encoding)
}

/// Validate an access token and return its subject.
///
/// Expiry is compared against the sub-second wall clock, so a token is
/// rejected as soon as `exp` has been reached.
pub fn validate_access_token(token: &str, secret: &[u8]) -> Result<Uuid, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.validate_exp = false;
    validation.set_issuer(&[TOKEN_ISSUER]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);

    let token_data =
        jsonwebtoken::decode::<AccessClaims>(token, &DecodingKey::from_secret(secret), &validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "Access token rejected");
                JwtError::InvalidToken
            })?;

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|_| JwtError::TimeError)?;

    if now >= Duration::from_secs(token_data.claims.exp) {
        return Err(JwtError::Expired);
    }

    Uuid::parse_str(&token_data.claims.sub).map_err(|_| JwtError::InvalidToken)
}

/// Access token settings, built once at startup from configuration.
#[derive(Clone)]
pub struct JwtConfig {
    secret: Vec<u8>,
    access_ttl: Duration,
}

impl JwtConfig {
    /// Create a new JWT configuration with the given secret.
    pub fn new(secret: &[u8]) -> Self {
        Self {
            secret: secret.to_vec(),
            access_ttl: ACCESS_TOKEN_DURATION,
        }
    }

    pub(crate) fn secret(&self) -> &[u8] {
        &self.secret
    }

    /// Generate an access token for a user.
    pub fn generate_access_token(&self, user_id: Uuid) -> Result<String, JwtError> {
        make_access_token(user_id, &self.secret, self.access_ttl)
    }

    /// Validate an access token and return the user it was issued to.
    pub fn validate_access_token(&self, token: &str) -> Result<Uuid, JwtError> {
        validate_access_token(token, &self.secret)
    }
}

/// Errors that can occur during JWT operations.
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Error encoding the token
    #[error("failed to encode token: {0}")]
    Encoding(jsonwebtoken::errors::Error),
    /// Bad signature, malformed token, wrong issuer or unparseable subject
    #[error("invalid token")]
    InvalidToken,
    /// Signature is valid but the token has expired
    #[error("token expired")]
    Expired,
    /// System time error
    #[error("system time error")]
    TimeError,
}
