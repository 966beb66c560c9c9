/// Bearer token verification for Axum
///
/// Extracts the token from `Authorization: Bearer <token>`, validates it and
/// yields the [`User`] principal it carries. The API server runs this in a
/// route layer and inserts the principal into request extensions, where
/// handlers pick it up with `Extension<User>`.
///
/// # Failure modes
///
/// - No header, a non-Bearer scheme or an empty token: `MissingToken` (401)
/// - Bad signature, garbage, foreign issuer or expired: `InvalidToken` (403)
///
/// # Example
///
/// ```
/// use axum::http::HeaderMap;
/// use dashboard_shared::auth::middleware::{authenticate_request, AuthError};
///
/// let headers = HeaderMap::new();
/// let result = authenticate_request(&headers, "secret");
/// assert!(matches!(result, Err(AuthError::MissingToken)));
/// ```

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use super::jwt::{validate_token, JwtError};
use crate::models::{ApiResponse, User};

/// Error type for token verification
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No bearer token on the request
    #[error("Access token required")]
    MissingToken,

    /// Token present but unusable
    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

impl AuthError {
    /// HTTP status for the failure
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingToken => StatusCode::UNAUTHORIZED,
            AuthError::InvalidToken(_) => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match &self {
            AuthError::MissingToken => "Access token required".to_string(),
            AuthError::InvalidToken(_) => "Invalid token".to_string(),
        };

        (self.status(), Json(ApiResponse::<()>::failure(message))).into_response()
    }
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
            JwtError::InvalidIssuer { .. } => AuthError::InvalidToken("Invalid issuer".to_string()),
            other => AuthError::InvalidToken(other.to_string()),
        }
    }
}

/// Extracts the bearer token from request headers
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    let (scheme, token) = value.trim().split_once(' ').ok_or(AuthError::MissingToken)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::MissingToken);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }

    Ok(token)
}

/// Verifies the request's bearer token and returns its principal
pub fn authenticate_request(headers: &HeaderMap, secret: &str) -> Result<User, AuthError> {
    let token = bearer_token(headers)?;
    let claims = validate_token(token, secret)?;

    Ok(claims.user())
}
