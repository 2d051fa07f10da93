//! Session lifecycle: login, refresh exchange, revoke, and owner-only deletes.
//!
//! An account starts anonymous. A successful login issues an access token
//! (1 hour) and a persisted refresh token (60 days). The refresh token can be
//! exchanged for new access tokens until it expires or is revoked. It is never
//! rotated. Revocation is terminal for that token only.

use std::sync::LazyLock;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::auth::{AuthError, authorize_ownership};
use crate::db::{Database, RefreshToken, User};
use crate::jwt::{JwtConfig, JwtError};
use crate::password::{hash_password, verify_password};

/// Verified against when the email is unknown, so that path costs a full
/// Argon2 verification like a wrong password does.
static DUMMY_PASSWORD_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("chirpy-no-such-account").ok());

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Unknown email or wrong password. Deliberately indistinguishable.
    #[error("incorrect email or password")]
    InvalidCredentials,
    #[error("refresh token not found")]
    UnknownRefreshToken,
    #[error("refresh token revoked")]
    RefreshTokenRevoked,
    #[error("refresh token expired")]
    RefreshTokenExpired,
    #[error("chirp not found")]
    ChirpNotFound,
    #[error("not the owner of this resource")]
    Forbidden,
    #[error("token error: {0}")]
    Token(#[from] JwtError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Everything a client receives after logging in.
#[derive(Debug)]
pub struct LoginOutcome {
    pub user: User,
    pub access_token: String,
    pub refresh_token: RefreshToken,
}

/// Verify credentials and start a new session.
pub async fn login(
    db: &Database,
    jwt: &JwtConfig,
    email: &str,
    password: &str,
) -> Result<LoginOutcome, SessionError> {
    let Some(user) = db.users().get_by_email(email).await? else {
        if let Some(dummy) = DUMMY_PASSWORD_HASH.as_deref() {
            let _ = verify_password(dummy, password);
        }
        debug!("Login for unknown email");
        return Err(SessionError::InvalidCredentials);
    };

    if verify_password(&user.hashed_password, password).is_err() {
        debug!(user_id = %user.id, "Login with wrong password");
        return Err(SessionError::InvalidCredentials);
    }

    let access_token = jwt.generate_access_token(user.id)?;
    let refresh_token = db.refresh_tokens().issue(user.id).await?;

    info!(user_id = %user.id, "User logged in");

    Ok(LoginOutcome {
        user,
        access_token,
        refresh_token,
    })
}

/// Exchange a refresh token for a new access token.
pub async fn refresh(
    db: &Database,
    jwt: &JwtConfig,
    refresh_token: &str,
) -> Result<String, SessionError> {
    let token = db
        .refresh_tokens()
        .get(refresh_token)
        .await?
        .ok_or(SessionError::UnknownRefreshToken)?;

    if !token.is_usable(Utc::now()) {
        return Err(if token.is_revoked() {
            SessionError::RefreshTokenRevoked
        } else {
            SessionError::RefreshTokenExpired
        });
    }

    Ok(jwt.generate_access_token(token.user_id)?)
}

/// Revoke a refresh token. Unknown and already-revoked tokens succeed too.
pub async fn revoke(db: &Database, refresh_token: &str) -> Result<(), SessionError> {
    let revoked = db.refresh_tokens().revoke(refresh_token).await?;
    debug!(revoked, "Refresh token revoke requested");
    Ok(())
}

/// Delete a chirp on behalf of `actor`, who must own it.
pub async fn delete_chirp(
    db: &Database,
    actor: Uuid,
    chirp_id: Uuid,
) -> Result<(), SessionError> {
    let chirp = db
        .chirps()
        .get(chirp_id)
        .await?
        .ok_or(SessionError::ChirpNotFound)?;

    authorize_ownership(actor, chirp.user_id).map_err(|_: AuthError| SessionError::Forbidden)?;

    // Lost a race with another delete of the same chirp.
    if !db.chirps().delete(chirp_id, actor).await? {
        return Err(SessionError::ChirpNotFound);
    }

    info!(user_id = %actor, chirp_id = %chirp_id, "Chirp deleted");
    Ok(())
}
