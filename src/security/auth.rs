//! Bearer token authentication middleware.
//!
//! The gate only establishes identity; it performs no role checks.
//! Backends receive the verified identity as `x-user-*` headers and do
//! their own authorization, so the raw token never travels past the
//! gateway.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::http::error::GatewayError;
use crate::http::server::AppState;

/// Claims carried by gateway tokens, as minted by the user service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub email: String,
    pub role: String,
    pub exp: u64,
}

/// Identity derived from a verified token, forwarded to backends as
/// trusted headers. Lives only for the duration of one request.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub subject_id: String,
    pub email: String,
    pub role: String,
}

impl From<Claims> for AuthContext {
    fn from(claims: Claims) -> Self {
        Self {
            subject_id: claims.user_id,
            email: claims.email,
            role: claims.role,
        }
    }
}

impl AuthContext {
    /// Inject the identity headers the backends trust.
    fn apply(&self, headers: &mut HeaderMap) -> Result<(), axum::http::header::InvalidHeaderValue> {
        headers.insert("x-user-id", HeaderValue::from_str(&self.subject_id)?);
        headers.insert("x-user-email", HeaderValue::from_str(&self.email)?);
        headers.insert("x-user-role", HeaderValue::from_str(&self.role)?);
        Ok(())
    }
}

/// Paths reachable without a credential: the health check and the
/// authentication endpoints themselves.
pub fn is_public_path(path: &str) -> bool {
    path == "/health"
        || path == "/api/auth"
        || path.starts_with("/api/auth/")
}

/// Verify an HS256 token against the shared secret.
///
/// Expiry is enforced with zero leeway so an expired token is rejected
/// the moment it expires.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.validate_exp = true;
    validation.leeway = 0;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims)
}

/// Middleware rejecting unauthenticated access to protected paths.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if is_public_path(request.uri().path()) {
        return next.run(request).await;
    }

    let bearer = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let Some(token) = bearer else {
        return GatewayError::Unauthorized("Missing or invalid Authorization header")
            .into_response();
    };

    let claims = match verify_token(token, &state.config.jwt_secret) {
        Ok(claims) => claims,
        Err(err) => {
            // Never tell the caller which check failed.
            tracing::debug!(error = %err, "Token verification failed");
            return GatewayError::Unauthorized("Invalid or expired token").into_response();
        }
    };

    let context = AuthContext::from(claims);
    if context.apply(request.headers_mut()).is_err() {
        return GatewayError::Unauthorized("Invalid or expired token").into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    const SECRET: &str = "test-secret";

    fn unix_now() -> u64 {
        SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs()
    }

    fn make_token(secret: &str, exp: u64) -> String {
        let claims = Claims {
            user_id: "user-1".into(),
            email: "alice@example.com".into(),
            role: "member".into(),
            exp,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
            .unwrap()
    }

    #[test]
    fn valid_token_yields_claims() {
        let token = make_token(SECRET, unix_now() + 3600);
        let claims = verify_token(&token, SECRET).unwrap();
        assert_eq!(claims.user_id, "user-1");
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.role, "member");
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = make_token(SECRET, unix_now() - 60);
        assert!(verify_token(&token, SECRET).is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = make_token("other-secret", unix_now() + 3600);
        assert!(verify_token(&token, SECRET).is_err());
    }

    #[test]
    fn malformed_token_is_rejected() {
        assert!(verify_token("not-a-jwt", SECRET).is_err());
    }

    #[test]
    fn public_paths_skip_the_gate() {
        assert!(is_public_path("/health"));
        assert!(is_public_path("/api/auth"));
        assert!(is_public_path("/api/auth/login"));
        assert!(!is_public_path("/api/users"));
        assert!(!is_public_path("/api/authx"));
    }

    #[test]
    fn context_injects_identity_headers() {
        let context = AuthContext {
            subject_id: "user-1".into(),
            email: "alice@example.com".into(),
            role: "admin".into(),
        };
        let mut headers = HeaderMap::new();
        context.apply(&mut headers).unwrap();
        assert_eq!(headers.get("x-user-id").unwrap(), "user-1");
        assert_eq!(headers.get("x-user-email").unwrap(), "alice@example.com");
        assert_eq!(headers.get("x-user-role").unwrap(), "admin");
    }
}
