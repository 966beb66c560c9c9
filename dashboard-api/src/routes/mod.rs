/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint (public)
/// - `auth`: Login (public)
/// - `clients`: Client listing and detail (bearer token)
/// - `dashboard`: Dashboard counters (bearer token)

pub mod auth;
pub mod clients;
pub mod dashboard;
pub mod health;

use axum::http::{Method, Uri};

use crate::error::ApiError;

/// Fallback for unmatched routes
pub async fn not_found(uri: Uri) -> ApiError {
    tracing::debug!(path = %uri.path(), "No route matched");
    ApiError::NotFound("Route not found".to_string())
}

/// Fallback for a known path called with an unsupported method
pub async fn method_not_allowed(method: Method, uri: Uri) -> ApiError {
    tracing::debug!(%method, path = %uri.path(), "Method not allowed");
    ApiError::MethodNotAllowed("Method not allowed".to_string())
}
