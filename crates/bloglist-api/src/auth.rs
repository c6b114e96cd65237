//! Token issuance, bearer extraction and password hashing.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

const TOKEN_DURATION_SECS: i64 = 3600;

/// bcrypt work factor. Tests use the minimum to stay fast.
const HASH_COST: u32 = if cfg!(test) { 4 /* bcrypt minimum cost */ } else { 10 };

// ── Tokens ────────────────────────────────────────────────────────────────────

/// JWT claims stored in the token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub username: String,
    pub exp: i64,
    pub iat: i64,
}

/// JWT service for creating and verifying tokens.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Create a token for `user_id`, valid for one hour.
    pub fn create_token(&self, user_id: &str, username: &str) -> anyhow::Result<String> {
        let now = chrono::Utc::now();
        let exp = now + chrono::Duration::seconds(TOKEN_DURATION_SECS);

        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(Into::into)
    }

    /// Verify and decode a token. Returns claims if valid and not expired.
    pub fn verify_token(&self, token: &str) -> anyhow::Result<Claims> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(Into::into)
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` header.
///
/// The scheme is matched case-insensitively.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

// ── AuthUser extractor ────────────────────────────────────────────────────────

/// The user behind a valid bearer token. Extract this in handlers that
/// require authentication.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub username: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(&parts.headers) else {
            tracing::debug!("missing or malformed authorization header");
            return Err(ApiError::Unauthorized("token missing or invalid".to_string()));
        };

        let claims = state.jwt.verify_token(token).map_err(|e| {
            tracing::debug!(error = %e, "invalid token");
            ApiError::Unauthorized("token missing or invalid".to_string())
        })?;

        // The user may have been removed since the token was issued.
        let store = state.store.read().await;
        let Some(user) = store.get_user(&claims.sub) else {
            return Err(ApiError::Unauthorized("token missing or invalid".to_string()));
        };

        Ok(AuthUser {
            id: user.id.clone(),
            username: user.username.clone(),
        })
    }
}

// ── Passwords ─────────────────────────────────────────────────────────────────

/// Hash a password with bcrypt. The salt and cost are part of the hash.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    Ok(bcrypt::hash(password, HASH_COST)?)
}

/// Check `password` against a hash produced by [`hash_password`].
///
/// A stored value that is not a bcrypt hash never verifies.
pub fn verify_password(password: &str, stored: &str) -> bool {
    bcrypt::verify(password, stored).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn test_service() -> JwtService {
        JwtService::new("test-secret-key")
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_roundtrip_token() {
        let svc = test_service();
        let token = svc.create_token("abc123", "root").unwrap();
        let claims = svc.verify_token(&token).unwrap();
        assert_eq!(claims.sub, "abc123");
        assert_eq!(claims.username, "root");
    }

    #[test]
    fn test_token_expiry_is_one_hour() {
        let svc = test_service();
        let claims = svc
            .verify_token(&svc.create_token("id", "root").unwrap())
            .unwrap();
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_rejects_invalid_token() {
        assert!(test_service().verify_token("garbage").is_err());
    }

    #[test]
    fn test_rejects_wrong_secret() {
        let token = JwtService::new("secret-a").create_token("id", "root").unwrap();
        assert!(JwtService::new("secret-b").verify_token(&token).is_err());
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token(&headers_with("Bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&headers_with("bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&headers_with("BEARER abc")), Some("abc"));
        assert_eq!(bearer_token(&headers_with("Basic abc")), None);
        assert_eq!(bearer_token(&headers_with("Bearer ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_password_hash_verifies() {
        let hash = hash_password("sekret").unwrap();
        assert!(hash.starts_with("$2b$"));
        assert!(!hash.contains("sekret"));
        assert!(verify_password("sekret", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn test_password_hash_is_salted() {
        assert_ne!(hash_password("same").unwrap(), hash_password("same").unwrap());
    }

    #[test]
    fn test_verify_accepts_full_cost_hash() {
        let hash = bcrypt::hash("sekret", 10).unwrap();
        assert!(verify_password("sekret", &hash));
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(!verify_password("x", "plain"));
        assert!(!verify_password("x", "sha256$aa$bb"));
    }
}
