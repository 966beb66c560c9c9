/// Authentication endpoint
///
/// # Endpoints
///
/// - `POST /api/auth/login` - Check the dashboard account and issue a token

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use dashboard_shared::{
    auth::{credentials::CredentialError, jwt},
    models::{ApiResponse, AuthResponse},
};
use serde::Deserialize;
use tracing::{info, warn};
use validator::Validate;

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Account name
    #[serde(default)]
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    /// Password
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login endpoint
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/login
/// Content-Type: application/json
///
/// {
///   "username": "admin",
///   "password": "..."
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "success": true,
///   "data": {
///     "token": "eyJ...",
///     "user": { "id": "1", "username": "admin", "email": "admin@dashboard.local" }
///   }
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Malformed body, or username/password empty
/// - `401 Unauthorized`: Invalid credentials
/// - `500 Internal Server Error`: Server error
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<AuthResponse>>> {
    let Json(req) = body?;

    // Validate request
    req.validate()
        .map_err(|e| ApiError::validation(CredentialError::MissingFields.to_string(), &e))?;

    let user = state
        .credentials
        .authenticate(&req.username, &req.password)
        .map_err(|e| {
            warn!(username = %req.username, error = %e, "Login rejected");
            ApiError::from(e)
        })?;

    let claims = jwt::Claims::with_expiration(&user, state.config.jwt.expiration());
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    info!(username = %user.username, "Login succeeded");

    Ok(Json(ApiResponse::ok(AuthResponse { token, user })))
}
