//! Signed session tokens.
//!
//! Session cookies carry an HS256 JWT built from [`SessionClaims`]. Signature
//! and expiry are checked here; whether the named session is still live is the
//! authenticator's job.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use rollcall_config::SessionConfig;
use rollcall_core::{AppError, AuthError, Role};

use crate::claims::SessionClaims;

/// Encodes session claims into a signed token.
///
/// # Errors
///
/// Returns an internal error if token encoding fails.
pub fn create_session_token(
    claims: &SessionClaims,
    config: &SessionConfig,
) -> Result<String, AppError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal_error(format!("Failed to create session token: {}", e)))
}

/// Verifies a session token's signature and expiry and returns its claims.
///
/// # Errors
///
/// Returns an unauthorized error if the token is malformed, expired, or signed
/// with a different secret.
pub fn verify_session_token(token: &str, config: &SessionConfig) -> Result<SessionClaims, AppError> {
    decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized("Invalid or expired session token".to_string()))
}

/// Verifies a token presented under `expected`'s cookie.
///
/// A valid token issued for another role is a [`AuthError::RoleMismatch`]; an
/// invalid token is [`AuthError::Unauthenticated`].
pub fn verify_session_token_for(
    token: &str,
    expected: Role,
    config: &SessionConfig,
) -> Result<SessionClaims, AuthError> {
    let claims = verify_session_token(token, config)
        .map_err(|_| AuthError::Unauthenticated { role: expected })?;

    if claims.role != expected {
        return Err(AuthError::RoleMismatch {
            expected,
            found: claims.role,
        });
    }

    Ok(claims)
}
