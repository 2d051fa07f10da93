//! Authentication state traits and macro.

use crate::jwt::JwtConfig;

/// Trait for state types that can validate access tokens.
pub trait HasAuthState {
    fn jwt(&self) -> &JwtConfig;
}

/// Trait for state types that accept calls from the webhook service.
pub trait HasServiceKey {
    fn api_key(&self) -> &str;
}

/// Macro to implement `HasAuthState` for state structs with a
/// `jwt: Arc<JwtConfig>` field.
///
/// # Example
/// ```ignore
/// #[derive(Clone)]
/// pub struct MyState {
///     pub db: Database,
///     pub jwt: Arc<JwtConfig>,
/// }
///
/// impl_has_auth_state!(MyState);
/// ```
#[macro_export]
macro_rules! impl_has_auth_state {
    ($state_type:ty) => {
        impl $crate::auth::HasAuthState for $state_type {
            fn jwt(&self) -> &$crate::jwt::JwtConfig {
                &self.jwt
            }
        }
    };
}
