//! Request authentication and authorization.
//!
//! Protected endpoints take a short-lived JWT access token in
//! `Authorization: Bearer`. The refresh and revoke endpoints take a
//! database-tracked refresh token in the same slot. The webhook endpoint
//! takes a shared API key via `Authorization: ApiKey`.

mod credentials;
mod errors;
mod extractors;
mod guard;
mod state;

pub use credentials::{get_api_key, get_bearer_token};
pub use errors::AuthError;
pub use extractors::{ApiAuth, AuthenticatedUser, BearerToken, ServiceAuth};
pub use guard::{authenticate_request, authenticate_service, authorize_ownership};
pub use state::{HasAuthState, HasServiceKey};
