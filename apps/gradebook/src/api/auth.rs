//! # Authentication Module
//!
//! Bearer-token authentication for the Gradebook HTTP API.
//!
//! Mutating requests must carry a session token obtained from
//! `POST /auth/login`:
//!
//! ```text
//! Authorization: Bearer <token>
//! ```
//!
//! Read-only requests (every GET) and the login endpoint itself pass
//! through without a token — authentication gates mutations, not reads.

use super::AppState;
use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Method, Request, StatusCode, header},
    middleware::Next,
    response::Response,
};

/// Extract the bearer token from the Authorization header.
///
/// Supports both `Bearer <token>` and a raw `<token>` value.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    Some(value.strip_prefix("Bearer ").unwrap_or(value))
}

/// Session-token authentication middleware.
///
/// - GET requests and `POST /auth/login` are always allowed
/// - Every other request must present a token the token store validates
///   (present and unexpired)
pub async fn require_token_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, &'static str)> {
    if request.method() == Method::GET || request.uri().path() == "/auth/login" {
        return Ok(next.run(request).await);
    }

    let Some(token) = bearer_token(request.headers()) else {
        tracing::warn!(
            event = "auth_failure",
            reason = "missing_authorization_header",
            "Missing Authorization header"
        );
        return Err((StatusCode::UNAUTHORIZED, "Unauthorized"));
    };

    match state.tokens.validate(token) {
        Ok(true) => Ok(next.run(request).await),
        Ok(false) => {
            tracing::warn!(
                event = "auth_failure",
                reason = "invalid_or_expired_token",
                "Authentication failed: invalid or expired token"
            );
            Err((StatusCode::UNAUTHORIZED, "Unauthorized"))
        }
        Err(e) => {
            tracing::error!(error = %e, "Token store unavailable");
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"))
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_prefix_is_stripped() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc123"),
        );
        assert_eq!(bearer_token(&headers), Some("abc123"));
    }

    #[test]
    fn raw_token_is_accepted() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("abc123"));
        assert_eq!(bearer_token(&headers), Some("abc123"));
    }

    #[test]
    fn missing_header_yields_none() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
