/// Health check payload
///
/// The one body that is not wrapped in the `ApiResponse` envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::repository::ConnectionStatus;

/// `GET /api/health` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `true` when the server answers
    pub success: bool,

    /// Human-readable status
    pub message: String,

    /// Server time
    pub timestamp: DateTime<Utc>,

    /// Server version
    pub version: String,

    /// Pool liveness as last observed
    pub database: ConnectionStatus,
}
