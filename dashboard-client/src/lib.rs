//! # Société Dashboard API Client
//!
//! Typed HTTP client for the dashboard API: the data layer a dashboard UI
//! sits on. It keeps the session token after login, attaches it to every
//! protected call and drops it as soon as the server refuses it.
//!
//! ## Usage
//!
//! ```no_run
//! use dashboard_client::{ApiClient, ClientListRequest};
//! use dashboard_shared::models::SortOrder;
//!
//! # async fn example() -> Result<(), dashboard_client::ClientError> {
//! let api = ApiClient::new("http://localhost:3001")?;
//! api.login("admin", "secret").await?;
//!
//! let page = api
//!     .clients(&ClientListRequest {
//!         search: Some("dupont".to_string()),
//!         sort_order: Some(SortOrder::Desc),
//!         ..Default::default()
//!     })
//!     .await?;
//! println!("{} matching clients", page.pagination.total);
//! # Ok(())
//! # }
//! ```

pub mod error;

pub use error::{ClientError, ClientResult};

use chrono::NaiveDate;
use dashboard_shared::models::{
    ApiResponse, AuthResponse, Client, DashboardStatsView, HealthResponse, PaginatedResponse,
    SortField, SortOrder, User,
};
use reqwest::{RequestBuilder, StatusCode, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default timeout for API requests
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Listing parameters, sent as a camelCase query string
///
/// Unset fields are left to the server defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientListRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortField>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<NaiveDate>,
}

/// Logged-in state; serializable so a UI can persist it across restarts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl From<AuthResponse> for Session {
    fn from(auth: AuthResponse) -> Self {
        Self {
            token: auth.token,
            user: auth.user,
        }
    }
}

/// Dashboard API client
///
/// Cheap to share behind an `Arc`; the session lives behind a mutex.
pub struct ApiClient {
    base_url: Url,
    http: reqwest::Client,
    session: Mutex<Option<Session>>,
}

impl ApiClient {
    /// Creates a client for the server at `base_url` (without the `/api` suffix)
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let parsed = Url::parse(base_url)
            .map_err(|e| ClientError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;
        if parsed.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(base_url.to_string()));
        }

        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        info!(base_url = %parsed, "Dashboard API client initialized");

        Ok(Self {
            base_url: parsed,
            http,
            session: Mutex::new(None),
        })
    }

    /// The current session, if logged in
    pub fn session(&self) -> Option<Session> {
        self.lock_session().clone()
    }

    /// The logged-in user, if any
    pub fn user(&self) -> Option<User> {
        self.lock_session().as_ref().map(|s| s.user.clone())
    }

    /// Reinstates a previously persisted session
    pub fn restore(&self, session: Session) {
        *self.lock_session() = Some(session);
    }

    /// Drops the session
    pub fn logout(&self) {
        if self.lock_session().take().is_some() {
            info!("Logged out");
        }
    }

    /// Logs in and keeps the issued token
    ///
    /// A failed login leaves the client logged out.
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<AuthResponse> {
        self.logout();

        let request = self
            .http
            .post(self.endpoint(&["auth", "login"])?)
            .json(&serde_json::json!({ "username": username, "password": password }));

        let response = request.send().await?;
        let auth: AuthResponse = Self::unwrap_envelope(response, "auth/login").await?;

        self.restore(Session::from(auth.clone()));
        info!(username = %auth.user.username, "Logged in");

        Ok(auth)
    }

    /// `GET /api/health` (public)
    pub async fn health(&self) -> ClientResult<HealthResponse> {
        let response = self.http.get(self.endpoint(&["health"])?).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }

    /// `GET /api/clients`
    pub async fn clients(
        &self,
        params: &ClientListRequest,
    ) -> ClientResult<PaginatedResponse<Client>> {
        let request = self.http.get(self.endpoint(&["clients"])?).query(params);
        self.send_authorized(request, "clients").await
    }

    /// `GET /api/clients/:id`
    pub async fn client(&self, id: &str) -> ClientResult<Client> {
        let request = self.http.get(self.endpoint(&["clients", id])?);
        self.send_authorized(request, "clients/:id").await
    }

    /// `GET /api/dashboard/stats`
    pub async fn stats(&self) -> ClientResult<DashboardStatsView> {
        let request = self.http.get(self.endpoint(&["dashboard", "stats"])?);
        self.send_authorized(request, "dashboard/stats").await
    }

    fn lock_session(&self) -> std::sync::MutexGuard<'_, Option<Session>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// `<base>/api/<segments>`, each segment percent-encoded
    fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    /// Sends a protected request with the session token
    ///
    /// 401 means the token is gone and 403 means it was refused; either way
    /// the session is dropped.
    async fn send_authorized<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        endpoint: &'static str,
    ) -> ClientResult<T> {
        let token = self
            .lock_session()
            .as_ref()
            .map(|s| s.token.clone())
            .ok_or(ClientError::NotAuthenticated)?;

        let response = request.bearer_auth(token).send().await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!(endpoint, status = status.as_u16(), "Session refused by server");
            self.lock_session().take();
            return Err(ClientError::SessionExpired);
        }

        Self::unwrap_envelope(response, endpoint).await
    }

    /// Decodes an `ApiResponse<T>` body into its payload
    async fn unwrap_envelope<T: DeserializeOwned>(
        response: reqwest::Response,
        endpoint: &'static str,
    ) -> ClientResult<T> {
        let status = response.status();
        let envelope: ApiResponse<T> = response.json().await?;

        if envelope.degraded {
            warn!(endpoint, "Server answered with fallback data");
        } else {
            debug!(endpoint, status = status.as_u16(), "API call completed");
        }

        envelope.into_result().map_err(|message| ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
