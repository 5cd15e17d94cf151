use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
    Extension,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use homebook_core::users::User;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::main_lib::AppState;

#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: Vec<u8>,
    pub access_token_ttl: Duration,
}

pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_ttl: Duration,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    /// Username at the time the token was issued
    pub name: String,
    pub iat: usize,
    pub exp: usize,
}

/// The authenticated user, reloaded from the database on every request.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    pub fn id(&self) -> &str {
        &self.0.id
    }
}

impl AuthManager {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        Self {
            encoding_key: EncodingKey::from_secret(&config.jwt_secret),
            decoding_key: DecodingKey::from_secret(&config.jwt_secret),
            validation,
            token_ttl: config.access_token_ttl,
        }
    }

    pub fn issue_token(&self, user: &User) -> ApiResult<String> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| ApiError::Internal("System clock is before UNIX_EPOCH".into()))?;
        let exp = now + self.token_ttl;
        let claims = Claims {
            sub: user.id.clone(),
            name: user.username.clone(),
            iat: now.as_secs() as usize,
            exp: exp.as_secs() as usize,
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ApiError::Internal(format!("Failed to sign token: {e}")))
    }

    pub fn validate_token(&self, token: &str) -> ApiResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature
                | jsonwebtoken::errors::ErrorKind::InvalidToken
                | jsonwebtoken::errors::ErrorKind::InvalidSignature
                | jsonwebtoken::errors::ErrorKind::Base64(_)
                | jsonwebtoken::errors::ErrorKind::Json(_)
                | jsonwebtoken::errors::ErrorKind::Utf8(_)
                | jsonwebtoken::errors::ErrorKind::MissingRequiredClaim(_) => {
                    ApiError::Unauthorized("Invalid or expired token".to_string())
                }
                other => ApiError::Internal(format!("Failed to validate token: {other:?}")),
            })
    }

    pub fn expires_in(&self) -> Duration {
        self.token_ttl
    }
}

pub fn decode_secret_key(raw: &str) -> anyhow::Result<Vec<u8>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        anyhow::bail!("JWT secret cannot be empty");
    }
    let decoded = match BASE64.decode(trimmed) {
        Ok(bytes) => bytes,
        Err(_) if trimmed.len() == 32 => trimmed.as_bytes().to_vec(),
        Err(_) => {
            anyhow::bail!("JWT secret must be base64 encoded or a 32-byte ASCII string")
        }
    };

    if decoded.len() != 32 {
        anyhow::bail!("JWT secret must decode to exactly 32 bytes");
    }

    Ok(decoded)
}

pub fn generate_secret_key() -> Vec<u8> {
    let mut secret = vec![0u8; 32];
    OsRng.fill_bytes(&mut secret);
    secret
}

fn bearer_token(request: &Request<Body>) -> ApiResult<&str> {
    let unauthorized = || ApiError::Unauthorized("Missing bearer token".to_string());
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(unauthorized)?;

    let mut parts = header.splitn(2, ' ');
    let (Some(scheme), Some(token)) = (parts.next(), parts.next()) else {
        return Err(unauthorized());
    };
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return Err(unauthorized());
    }
    let token = token.trim();
    if token.is_empty() {
        return Err(unauthorized());
    }
    Ok(token)
}

pub async fn require_jwt(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> ApiResult<Response> {
    let claims = state.auth.validate_token(bearer_token(&request)?)?;

    let user = match state.user_service.get_user(&claims.sub) {
        Ok(user) => user,
        Err(e) if e.is_not_found() => {
            return Err(ApiError::Unauthorized("Unknown user".to_string()));
        }
        Err(e) => return Err(e.into()),
    };
    if user.is_disabled() {
        return Err(ApiError::Unauthorized("User is disabled".to_string()));
    }

    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}

/// Must run after [`require_jwt`].
pub async fn require_admin(
    Extension(current): Extension<CurrentUser>,
    request: Request<Body>,
    next: Next,
) -> ApiResult<Response> {
    if !current.0.is_admin {
        return Err(ApiError::Forbidden(
            "Administrator privileges required".to_string(),
        ));
    }
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: "u1".to_string(),
            username: "alice".to_string(),
            password_hash: String::new(),
            password_hash_type: "argon2id".to_string(),
            is_admin: false,
            disabled: None,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    fn manager(secret: Vec<u8>) -> AuthManager {
        AuthManager::new(&AuthConfig {
            jwt_secret: secret,
            access_token_ttl: Duration::from_secs(3600),
        })
    }

    #[test]
    fn test_token_round_trip_carries_user() {
        let auth = manager(generate_secret_key());
        let token = auth.issue_token(&user()).unwrap();
        let claims = auth.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.name, "alice");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_from_other_key_is_rejected() {
        let token = manager(generate_secret_key()).issue_token(&user()).unwrap();
        let result = manager(generate_secret_key()).validate_token(&token);
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
        assert!(matches!(
            manager(generate_secret_key()).validate_token("garbage"),
            Err(ApiError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_decode_secret_key() {
        let encoded = BASE64.encode([7u8; 32]);
        assert_eq!(decode_secret_key(&encoded).unwrap(), vec![7u8; 32]);
        assert_eq!(
            decode_secret_key("abcdefghijklmnopqrstuvwxyz01234!").unwrap().len(),
            32
        );
        assert!(decode_secret_key("").is_err());
        assert!(decode_secret_key(&BASE64.encode([1u8; 16])).is_err());
    }
}
