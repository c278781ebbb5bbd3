//! Bearer-token authentication.
//!
//! `POST /login` exchanges the configured credentials for an HS256 JWT. Every
//! entity route sits behind [`require_bearer`], which rejects requests without
//! a valid, unexpired token.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;
use crate::constants::API_NAME;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authorization header is missing")]
    MissingHeader,

    #[error("Authorization header must use the Bearer scheme")]
    InvalidScheme,

    #[error("Bearer token is empty")]
    EmptyToken,

    #[error("Token expired")]
    Expired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Identity of the caller, inserted into request extensions by [`require_bearer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(pub String);

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: i64,
}

#[derive(Clone)]
pub struct TokenIssuer {
    keys: Arc<Keys>,
}

impl TokenIssuer {
    pub fn new(secret: &[u8], ttl_hours: i64) -> Self {
        Self {
            keys: Arc::new(Keys {
                encoding: EncodingKey::from_secret(secret),
                decoding: DecodingKey::from_secret(secret),
                ttl_secs: ttl_hours.saturating_mul(3600),
            }),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.jwt_secret.as_bytes(), config.token_ttl_hours)
    }

    pub fn issue(&self, username: &str) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        self.issue_at(username, now)
    }

    pub(crate) fn issue_at(&self, username: &str, issued_at: i64) -> Result<String, AuthError> {
        let claims = Claims {
            sub: username.to_string(),
            iat: issued_at,
            exp: issued_at.saturating_add(self.keys.ttl_secs),
        };
        encode(&Header::default(), &claims, &self.keys.encoding).map_err(AuthError::Signing)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        decode::<Claims>(token, &self.keys.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::InvalidToken,
            })
    }
}

/// Username and password accepted by `POST /login`.
#[derive(Debug, Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.auth_username.clone(), config.auth_password.clone())
    }

    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(AuthError::MissingHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidScheme)?;

    let token = header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .ok_or(AuthError::InvalidScheme)?
        .trim();

    if token.is_empty() {
        return Err(AuthError::EmptyToken);
    }
    Ok(token)
}

pub async fn require_bearer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = extract_bearer_token(request.headers())
        .and_then(|token| state.tokens.verify(token))
        .map_err(|e| {
            tracing::warn!("{} Rejected request to {}: {}", API_NAME, request.uri().path(), e);
            AppError::Unauthorized(e.to_string())
        })?;

    request.extensions_mut().insert(AuthenticatedUser(claims.sub));
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn issued_token_verifies() {
        let issuer = TokenIssuer::new(b"test-secret", 24);
        let token = issuer.issue("admin").unwrap();
        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.sub, "admin");
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let token = TokenIssuer::new(b"one", 1).issue("admin").unwrap();
        let err = TokenIssuer::new(b"two", 1).verify(&token).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[test]
    fn expired_token_is_rejected() {
        let issuer = TokenIssuer::new(b"test-secret", 1);
        let two_hours_ago = Utc::now().timestamp() - 2 * 3600;
        let token = issuer.issue_at("admin", two_hours_ago).unwrap();
        assert!(matches!(issuer.verify(&token), Err(AuthError::Expired)));
    }

    #[test]
    fn garbage_is_rejected() {
        let issuer = TokenIssuer::new(b"test-secret", 1);
        assert!(matches!(issuer.verify("not.a.jwt"), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn bearer_extraction() {
        assert_eq!(extract_bearer_token(&headers("Bearer abc")).unwrap(), "abc");
        assert_eq!(extract_bearer_token(&headers("bearer abc ")).unwrap(), "abc");
        assert!(matches!(
            extract_bearer_token(&HeaderMap::new()),
            Err(AuthError::MissingHeader)
        ));
        assert!(matches!(
            extract_bearer_token(&headers("Basic YWRtaW46YWRtaW4=")),
            Err(AuthError::InvalidScheme)
        ));
        assert!(matches!(
            extract_bearer_token(&headers("Bearer   ")),
            Err(AuthError::EmptyToken)
        ));
    }

    #[test]
    fn credentials_must_match_exactly() {
        let creds = Credentials::new("admin", "admin");
        assert!(creds.matches("admin", "admin"));
        assert!(!creds.matches("admin", "Admin"));
        assert!(!creds.matches("root", "admin"));
    }
}
