/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers return `Result<T, ApiError>`; every error renders as the
/// standard envelope `{"success": false, "error": "...", "details"?: [...]}`.
///
/// # Example
///
/// ```
/// use dashboard_api::error::{ApiError, ApiResult};
/// use axum::Json;
/// use dashboard_shared::models::ApiResponse;
///
/// async fn handler(id: String) -> ApiResult<Json<ApiResponse<String>>> {
///     if id.is_empty() {
///         return Err(ApiError::NotFound("Client not found".to_string()));
///     }
///     Ok(Json(ApiResponse::ok(id)))
/// }
/// ```

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dashboard_shared::auth::credentials::CredentialError;
use dashboard_shared::auth::jwt::JwtError;
use dashboard_shared::auth::middleware::AuthError;
use dashboard_shared::auth::password::PasswordError;
use dashboard_shared::models::{ApiResponse, FieldError};
use dashboard_shared::repository::RepositoryError;
use std::fmt;
use validator::ValidationErrors;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Bad request (400) with per-field details
    ValidationError {
        message: String,
        details: Vec<FieldError>,
    },

    /// Unauthorized (401)
    Unauthorized(String),

    /// Forbidden (403)
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Known path, unsupported method (405)
    MethodNotAllowed(String),

    /// Internal server error (500); the message is logged, never sent
    InternalError(String),

    /// Service unavailable (503)
    ServiceUnavailable(String),
}

impl ApiError {
    /// HTTP status for the error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::ValidationError { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Builds a validation error from `validator` output
    pub fn validation(message: impl Into<String>, errors: &ValidationErrors) -> Self {
        let mut details: Vec<FieldError> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| FieldError {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();
        details.sort_by(|a, b| a.field.cmp(&b.field));

        ApiError::ValidationError {
            message: message.into(),
            details,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::ValidationError { message, details } => {
                write!(f, "{}: {} errors", message, details.len())
            }
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::MethodNotAllowed(msg) => write!(f, "Method not allowed: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            ApiError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            ApiError::ValidationError { message, details } => ApiResponse::<()>::invalid(message, details),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!(error = %msg, "Internal error");
                ApiResponse::failure("Internal server error")
            }
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::MethodNotAllowed(msg)
            | ApiError::ServiceUnavailable(msg) => ApiResponse::failure(msg),
        };

        (status, Json(body)).into_response()
    }
}

/// Malformed or missing JSON bodies
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Query strings that do not deserialize
impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Convert bearer token errors to API errors
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken => ApiError::Unauthorized("Access token required".to_string()),
            AuthError::InvalidToken(_) => ApiError::Forbidden("Invalid token".to_string()),
        }
    }
}

/// Convert login errors to API errors
impl From<CredentialError> for ApiError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::MissingFields => ApiError::BadRequest(err.to_string()),
            CredentialError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            CredentialError::Password(e) => e.into(),
        }
    }
}

/// Convert password errors to API errors
impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

/// Convert JWT errors to API errors (token issuance only)
impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        ApiError::InternalError(format!("Token operation failed: {}", err))
    }
}

/// Convert repository errors to API errors
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotConnected => ApiError::ServiceUnavailable(err.to_string()),
            other => ApiError::InternalError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use validator::Validate;

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::NotFound("Client not found".to_string());
        assert_eq!(err.to_string(), "Not found: Client not found");

        let err = ApiError::MethodNotAllowed("Method not allowed".to_string());
        assert_eq!(err.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_envelope_shape() {
        let (status, body) = body_json(ApiError::NotFound("Client not found".to_string())).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, serde_json::json!({"success": false, "error": "Client not found"}));
    }

    #[tokio::test]
    async fn test_internal_error_hides_message() {
        let (status, body) = body_json(ApiError::InternalError("pool exploded".to_string())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
        assert!(body.get("data").is_none());
    }

    #[derive(Validate)]
    struct Login {
        #[validate(length(min = 1, message = "Username is required"))]
        username: String,
        #[validate(length(min = 1, message = "Password is required"))]
        password: String,
    }

    #[tokio::test]
    async fn test_validation_details() {
        let errors = Login {
            username: String::new(),
            password: String::new(),
        }
        .validate()
        .unwrap_err();

        let (status, body) = body_json(ApiError::validation("Username and password are required", &errors)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Username and password are required");
        assert_eq!(
            body["details"],
            serde_json::json!([
                {"field": "password", "message": "Password is required"},
                {"field": "username", "message": "Username is required"}
            ])
        );
    }

    #[test]
    fn test_conversions() {
        assert_eq!(ApiError::from(AuthError::MissingToken).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::from(AuthError::InvalidToken("expired".to_string())).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::from(CredentialError::InvalidCredentials).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::from(CredentialError::MissingFields).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::from(RepositoryError::NotConnected).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
