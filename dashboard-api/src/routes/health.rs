/// Health check endpoint
///
/// Reports that the server is up and what the repository last observed
/// about its pools. No query is issued: a dashboard running on fallback
/// data is still healthy.
///
/// # Endpoint
///
/// ```text
/// GET /api/health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "success": true,
///   "message": "Server is running",
///   "timestamp": "2024-05-14T09:30:00Z",
///   "version": "0.1.0",
///   "database": { "store1Connected": true, "store2Connected": true }
/// }
/// ```

use crate::app::AppState;
use axum::{extract::State, Json};
use chrono::Utc;
use dashboard_shared::models::HealthResponse;

/// Health check handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        message: "Server is running".to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: state.store.connection_status().await,
    })
}
