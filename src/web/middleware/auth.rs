//! API key authentication middleware.
//!
//! The access gate for the mutating endpoints. When no key is configured the
//! gate runs in OPEN MODE and every request passes; this is a deliberate,
//! documented default for trusted networks, not an omission. With a key
//! configured, requests must carry a matching `X-API-Key` header.

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use std::sync::Arc;

use crate::web::error::ApiError;

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Shared state for the API key gate.
#[derive(Debug, Clone)]
pub struct ApiKeyState {
    /// Configured shared secret. `None` means open mode.
    key: Option<String>,
}

impl ApiKeyState {
    /// Create gate state from the configured key. An empty string means
    /// open mode.
    pub fn new(key: &str) -> Self {
        let key = if key.is_empty() {
            None
        } else {
            Some(key.to_string())
        };
        Self { key }
    }

    /// Whether the gate allows a request carrying `provided`.
    pub fn authorize(&self, provided: Option<&str>) -> bool {
        match &self.key {
            None => true,
            Some(expected) => match provided {
                Some(given) => constant_time_eq(expected.as_bytes(), given.as_bytes()),
                None => false,
            },
        }
    }
}

/// Compare two byte strings without short-circuiting on the first mismatch.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Middleware enforcing the API key on the routes it wraps.
pub async fn require_api_key(
    state: Arc<ApiKeyState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let provided = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    if !state.authorize(provided) {
        tracing::warn!(path = %req.uri().path(), "rejected request with missing or invalid API key");
        return Err(ApiError::unauthorized("Invalid or missing API key"));
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_mode_allows_everything() {
        let state = ApiKeyState::new("");
        assert!(state.authorize(None));
        assert!(state.authorize(Some("anything")));
    }

    #[test]
    fn test_configured_key_exact_match() {
        let state = ApiKeyState::new("secret");
        assert!(state.authorize(Some("secret")));
    }

    #[test]
    fn test_configured_key_rejects_mismatch() {
        let state = ApiKeyState::new("secret");
        assert!(!state.authorize(Some("wrong")));
        assert!(!state.authorize(Some("secre")));
        assert!(!state.authorize(Some("secrets")));
        assert!(!state.authorize(None));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"ab"));
        assert!(constant_time_eq(b"", b""));
    }
}
