/// Data model for the dashboard
///
/// Every type here is derived per request from the stores (or from the
/// fallback set); nothing is mutated in place.
///
/// # Models
///
/// - `client`: Company ("société") records as exposed by the API
/// - `pagination`: Listing parameters and the paginated envelope
/// - `stats`: Dashboard aggregate counters
/// - `user`: The public projection of the authenticated account
/// - `response`: The uniform `{success, data?, error?}` envelope
/// - `health`: The health check body

pub mod client;
pub mod health;
pub mod pagination;
pub mod response;
pub mod stats;
pub mod user;

pub use client::{Client, ClientPage};
pub use health::HealthResponse;
pub use pagination::{ClientQuery, PaginatedResponse, PaginationMeta, SortField, SortOrder};
pub use response::{ApiResponse, FieldError};
pub use stats::{DashboardStats, DashboardStatsView};
pub use user::{AuthResponse, User};
