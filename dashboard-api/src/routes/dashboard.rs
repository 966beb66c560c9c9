/// Dashboard statistics endpoint
///
/// # Endpoint
///
/// ```text
/// GET /api/dashboard/stats
/// Authorization: Bearer <token>
/// ```
///
/// # Response
///
/// ```json
/// {
///   "success": true,
///   "data": {
///     "totalClients": "20",
///     "totalFactures": "2847",
///     "totalContacts": "98",
///     "totalEntreprises": "98",
///     "totalFacturesFournisseurs": "623"
///   },
///   "degraded": true
/// }
/// ```
///
/// Counters are strings. `degraded` appears when the store could not answer
/// and the fixed fallback numbers were served instead.

use crate::{app::AppState, services::stats};
use axum::{extract::State, Json};
use dashboard_shared::models::{ApiResponse, DashboardStatsView};

/// Stats handler; never fails once authenticated
pub async fn get_stats(State(state): State<AppState>) -> Json<ApiResponse<DashboardStatsView>> {
    Json(stats::dashboard_stats(state.store.as_ref()).await.into_envelope())
}
