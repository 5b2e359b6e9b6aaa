//! Authentication middleware.
//!
//! Validates `Authorization: Bearer` tokens on protected routes and injects
//! the validated claims into request extensions. Health and banner
//! endpoints stay public.

use std::sync::Arc;

use axum::{
    Json,
    body::Body,
    extract::State,
    http::{Request, StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::AuthError;
use crate::token::{Claims, TokenVerifier};

/// Shared state for the authentication middleware.
#[derive(Clone)]
pub struct AuthState {
    verifier: Arc<TokenVerifier>,
}

impl AuthState {
    pub fn new(verifier: TokenVerifier) -> Self {
        Self {
            verifier: Arc::new(verifier),
        }
    }
}

/// Authenticated request context, stored in request extensions.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Validated access token claims.
    pub claims: Arc<Claims>,
}

impl AuthContext {
    /// The token subject - the authenticated caller.
    pub fn subject(&self) -> &str {
        &self.claims.sub
    }
}

/// Validates the bearer token and stores an [`AuthContext`] for handlers.
///
/// Public endpoints (banner, health) pass through untouched. All failures
/// produce 401 with the standard error body; the core never sees an
/// unauthenticated request.
pub async fn authentication_middleware(
    State(state): State<AuthState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if is_public_path(req.uri().path()) {
        return next.run(req).await;
    }

    let auth_header = match req.headers().get(AUTHORIZATION).and_then(|h| h.to_str().ok()) {
        Some(header) => header,
        None => {
            tracing::debug!(path = %req.uri().path(), "No Authorization header");
            return unauthorized_response("Authentication required");
        }
    };

    let token = match auth_header.strip_prefix("Bearer ") {
        Some(t) if !t.is_empty() => t,
        _ => return unauthorized_response("Invalid Authorization header format"),
    };

    match state.verifier.verify(token) {
        Ok(claims) => {
            tracing::debug!(subject = %claims.sub, "Token validated");
            req.extensions_mut().insert(AuthContext {
                claims: Arc::new(claims),
            });
            next.run(req).await
        }
        Err(err) => {
            tracing::debug!(error = %err, "Token validation failed");
            match err {
                AuthError::TokenExpired => unauthorized_response("Token expired"),
                _ => unauthorized_response("Invalid token"),
            }
        }
    }
}

/// Endpoints that never require a token.
fn is_public_path(path: &str) -> bool {
    matches!(path, "/" | "/healthz" | "/readyz" | "/favicon.ico")
}

/// 401 with the standard error body and a `WWW-Authenticate` challenge.
fn unauthorized_response(message: &str) -> Response {
    let body = json!({
        "error": {
            "code": "unauthorized",
            "message": message,
        }
    });

    (
        StatusCode::UNAUTHORIZED,
        [("WWW-Authenticate", "Bearer")],
        Json(body),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;
    use axum::{Router, middleware::from_fn_with_state, routing::get};
    use jsonwebtoken::{EncodingKey, Header, encode};
    use time::OffsetDateTime;
    use tower::ServiceExt;

    const SECRET: &str = "middleware-test-secret";

    fn app() -> Router {
        let config = AuthConfig {
            enabled: true,
            hmac_secret: Some(SECRET.into()),
            ..Default::default()
        };
        let state = AuthState::new(TokenVerifier::from_config(&config).unwrap());
        Router::new()
            .route("/healthz", get(|| async { "ok" }))
            .route("/api/patients", get(|| async { "patients" }))
            .layer(from_fn_with_state(state, authentication_middleware))
    }

    fn token() -> String {
        let claims = Claims {
            sub: "user-1".into(),
            exp: OffsetDateTime::now_utc().unix_timestamp() + 600,
            iss: None,
            aud: None,
            scope: None,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    async fn send(app: Router, path: &str, auth: Option<&str>) -> StatusCode {
        let mut builder = Request::builder().uri(path);
        if let Some(value) = auth {
            builder = builder.header(AUTHORIZATION, value);
        }
        let response = app
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        response.status()
    }

    #[tokio::test]
    async fn test_public_paths_skip_authentication() {
        assert_eq!(send(app(), "/healthz", None).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_protected_path_requires_token() {
        assert_eq!(
            send(app(), "/api/patients", None).await,
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn test_malformed_header_is_unauthorized() {
        assert_eq!(
            send(app(), "/api/patients", Some("Basic abc")).await,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            send(app(), "/api/patients", Some("Bearer ")).await,
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn test_valid_token_passes() {
        let value = format!("Bearer {}", token());
        assert_eq!(
            send(app(), "/api/patients", Some(&value)).await,
            StatusCode::OK
        );
    }
}
