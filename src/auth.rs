use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use chrono::{TimeDelta, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ApiError;

/// The one privileged identity. There is no user table; every valid token names this subject.
pub const ADMIN_SUBJECT: &str = "admin";

/// Lifetime of an issued token.
pub const TOKEN_LIFETIME_HOURS: i64 = 24;

/// AuthError
///
/// Failures of the credential verifier and the token issuer/validator. `InvalidToken` is
/// opaque: bad signature, wrong algorithm, malformed, premature and expired
/// tokens all collapse into it.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid token")]
    InvalidToken,

    #[error("failed to sign token")]
    Signing,

    #[error("password hashing failed: {0}")]
    Hashing(String),
}

/// Claims
///
/// Payload of an admin bearer token. Time claims are Unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): always [`ADMIN_SUBJECT`].
    pub sub: String,
    /// Issued At (iat).
    pub iat: i64,
    /// Not Before (nbf): equal to `iat` for issued tokens.
    pub nbf: i64,
    /// Expiration Time (exp): `iat` + 24 hours.
    pub exp: i64,
}

/// TokenService
///
/// Issues and validates HS256-signed admin tokens with the process-wide secret. Keys and the
/// validation policy are built once at construction.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Accept the HMAC family only. A header naming RS*/ES*/PS*/EdDSA is rejected before
        // the signature is even considered.
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.set_required_spec_claims(&["exp", "nbf", "sub"]);
        validation.sub = Some(ADMIN_SUBJECT.to_string());

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// issue
    ///
    /// Signs a fresh token for the admin subject, valid from now for [`TOKEN_LIFETIME_HOURS`].
    pub fn issue(&self) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: ADMIN_SUBJECT.to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + TimeDelta::hours(TOKEN_LIFETIME_HOURS)).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!(kind = ?e.kind(), "token signing failed");
            AuthError::Signing
        })
    }

    /// validate
    ///
    /// Returns the claims of a token signed with this secret by an HMAC algorithm, inside its
    /// validity window, for the admin subject. Every other outcome is `AuthError::InvalidToken`.
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(kind = ?e.kind(), "bearer token rejected");
                AuthError::InvalidToken
            })
    }

    pub fn lifetime_seconds(&self) -> i64 {
        TOKEN_LIFETIME_HOURS * 3600
    }
}

/// TokenState
///
/// Shared handle to the token service, pulled out of the application state via `FromRef`.
pub type TokenState = Arc<TokenService>;

/// AdminSession
///
/// Resolved identity of an authenticated request: the validated claims. Taking this as a
/// handler argument (or through the route-layer middleware) makes the route admin-only.
#[derive(Debug, Clone)]
pub struct AdminSession(pub Claims);

/// Extracts `Authorization: Bearer <token>` and validates it.
///
/// Rejection: `ApiError::Unauthorized` (401) for a missing header, a non-Bearer scheme or any
/// invalid token. The body is identical in every case.
impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
    TokenState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let tokens = TokenState::from_ref(state);

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(ApiError::Unauthorized)?;

        let claims = tokens.validate(token)?;
        Ok(AdminSession(claims))
    }
}
