/// Client endpoints
///
/// # Endpoints
///
/// - `GET /api/clients` - Filtered, sorted, paginated listing
/// - `GET /api/clients/:id` - Single client
///
/// Both require a bearer token.
///
/// # Query parameters
///
/// | Name | Default | Notes |
/// |---|---|---|
/// | `page` | 1 | at least 1 |
/// | `limit` | 10 | 1 to 100 |
/// | `sortBy` | `societe_name` | unknown fields sort by name |
/// | `sortOrder` | `asc` | anything but `desc` is ascending |
/// | `search` | empty | name or street (store), name, e-mail or phone (fallback) |
/// | `dateFrom`, `dateTo` | none | `YYYY-MM-DD` or RFC 3339 |

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    services::listing,
};
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Extension, Json,
};
use dashboard_shared::models::{
    pagination::{parse_date_param, DEFAULT_LIMIT, MAX_LIMIT},
    ApiResponse, Client, ClientQuery, FieldError, PaginatedResponse, SortField, SortOrder, User,
};
use serde::Deserialize;
use tracing::debug;
use validator::Validate;

const INVALID_PARAMS: &str = "Invalid query parameters";

/// Raw listing parameters as they arrive on the query string
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ClientListParams {
    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: Option<u32>,

    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<u32>,

    pub sort_by: Option<String>,

    pub sort_order: Option<String>,

    pub search: Option<String>,

    pub date_from: Option<String>,

    pub date_to: Option<String>,
}

impl ClientListParams {
    /// Validates the parameters and applies defaults
    pub fn into_query(self) -> ApiResult<ClientQuery> {
        self.validate()
            .map_err(|e| ApiError::validation(INVALID_PARAMS, &e))?;

        let mut details = Vec::new();
        let mut date = |field: &str, value: Option<&str>| {
            parse_date_param(value.unwrap_or_default()).unwrap_or_else(|message| {
                details.push(FieldError {
                    field: field.to_string(),
                    message,
                });
                None
            })
        };
        let date_from = date("dateFrom", self.date_from.as_deref());
        let date_to = date("dateTo", self.date_to.as_deref());

        if !details.is_empty() {
            return Err(ApiError::ValidationError {
                message: INVALID_PARAMS.to_string(),
                details,
            });
        }

        Ok(ClientQuery {
            page: self.page.unwrap_or(1),
            limit: self.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT),
            sort_by: self.sort_by.as_deref().map(SortField::parse).unwrap_or_default(),
            sort_order: self.sort_order.as_deref().map(SortOrder::parse).unwrap_or_default(),
            search: self.search.unwrap_or_default().trim().to_string(),
            date_from,
            date_to,
        })
    }
}

/// Listing handler
///
/// # Response
///
/// ```json
/// {
///   "success": true,
///   "data": {
///     "data": [ { "id": "11", "societe_name": "...", ... } ],
///     "pagination": { "page": 2, "limit": 10, "total": 20, "totalPages": 2 }
///   },
///   "degraded": true
/// }
/// ```
pub async fn list_clients(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    params: Result<Query<ClientListParams>, QueryRejection>,
) -> ApiResult<Json<ApiResponse<PaginatedResponse<Client>>>> {
    let Query(params) = params?;
    let query = params.into_query()?;

    debug!(
        user = %user.username,
        page = query.page,
        limit = query.limit,
        sort_by = query.sort_by.as_str(),
        sort_order = query.sort_order.as_str(),
        "Listing clients"
    );

    let envelope = listing::list_clients(state.store.as_ref(), &query)
        .await
        .map(|page| PaginatedResponse::new(page.clients, query.page, query.limit, page.total))
        .into_envelope();

    Ok(Json(envelope))
}

/// Detail handler
///
/// # Errors
///
/// - `404 Not Found`: No such client (in the store, or in the fallback set
///   when the store is not connected)
/// - `500 Internal Server Error`: The store failed
pub async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Client>>> {
    let client = listing::find_client(state.store.as_ref(), &id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Client not found".to_string()))?;

    Ok(Json(client.into_envelope()))
}
