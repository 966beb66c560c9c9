/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use dashboard_api::{app::AppState, config::Config};
/// use dashboard_shared::repository::{ClientRepository, ClientStore};
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let credentials = config.admin.credentials()?;
/// let store: Arc<dyn ClientStore> = Arc::new(ClientRepository::new(
///     config.database.primary.clone(),
///     config.database.secondary.clone(),
/// ));
/// let state = AppState::new(store, credentials, config);
/// let app = dashboard_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError, middleware::security::SecurityHeadersLayer};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::{from_fn_with_state, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use dashboard_shared::auth::{credentials::Credentials, middleware::authenticate_request};
use dashboard_shared::repository::ClientStore;
use std::any::Any;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Record repository (or a stand-in in tests)
    pub store: Arc<dyn ClientStore>,

    /// The dashboard account
    pub credentials: Arc<Credentials>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(store: Arc<dyn ClientStore>, credentials: Credentials, config: Config) -> Self {
        Self {
            store,
            credentials: Arc::new(credentials),
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /api
/// ├── GET  /health               # Health check (public)
/// ├── POST /auth/login           # Login (public)
/// ├── GET  /clients              # Listing (bearer token)
/// ├── GET  /clients/:id          # Detail (bearer token)
/// └── GET  /dashboard/stats      # Counters (bearer token)
/// ```
///
/// Anything else gets a 404 envelope; a known path with the wrong method
/// gets a 405 envelope (after the token check on protected paths).
///
/// # Middleware Stack
///
/// Applied in order (innermost first):
/// 1. Panic recovery (500 envelope)
/// 2. Logging (tower-http TraceLayer)
/// 3. CORS (tower-http CorsLayer)
/// 4. Security headers
/// 5. Authentication (protected routes only)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Wrong methods get the envelope too
    let method_fallback = routes::method_not_allowed;

    // Protected routes; route_layer keeps unmatched paths out of the auth check
    let protected_routes = Router::new()
        .route("/clients", get(routes::clients::list_clients).fallback(method_fallback))
        .route("/clients/:id", get(routes::clients::get_client).fallback(method_fallback))
        .route("/dashboard/stats", get(routes::dashboard::get_stats).fallback(method_fallback))
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_layer));

    let api_routes = Router::new()
        .route("/health", get(routes::health::health_check).fallback(method_fallback))
        .route("/auth/login", post(routes::auth::login).fallback(method_fallback))
        .merge(protected_routes);

    Router::new()
        .nest("/api", api_routes)
        .fallback(routes::not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config.server.cors_origins))
        .layer(SecurityHeadersLayer::new(state.config.server.production))
        .with_state(state)
}

/// CORS from the configured frontend origins
///
/// `*` anywhere in the list means permissive CORS (no credentials).
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

/// JWT authentication middleware layer
///
/// Validates the bearer token and injects the `User` principal into request
/// extensions.
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = authenticate_request(req.headers(), state.jwt_secret()).map_err(|e| {
        tracing::debug!(error = %e, path = %req.uri().path(), "Request rejected by token check");
        ApiError::from(e)
    })?;

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

/// Turns a handler panic into the standard 500 envelope
fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    ApiError::InternalError(format!("Handler panicked: {}", detail)).into_response()
}
