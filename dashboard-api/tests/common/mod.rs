//! Common test utilities for integration tests
//!
//! This module provides shared infrastructure for integration tests:
//! - A router wired to a never-connected `ClientRepository`, so every read
//!   takes the fallback path without a database
//! - A scripted in-memory `ClientStore` for the live path and for store failures
//! - Token generation and request helpers

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use chrono::{Duration, TimeZone, Utc};
use dashboard_api::app::{build_router, AppState};
use dashboard_api::config::{
    AdminConfig, AdminPassword, Config, DatabaseSettings, JwtConfig, ServerConfig,
};
use dashboard_shared::auth::jwt::{create_token, Claims};
use dashboard_shared::db::pool::DatabaseConfig;
use dashboard_shared::fallback;
use dashboard_shared::models::{Client, ClientPage, ClientQuery, DashboardStats, User};
use dashboard_shared::repository::{ClientRepository, ClientStore, ConnectionStatus, RepositoryError};
use std::sync::Arc;
use tower::Service as _;

pub const SECRET: &str = "test-secret-key-at-least-32-bytes-long";
pub const PASSWORD: &str = "admin123";

/// How the scripted store answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreMode {
    /// Serves its own records
    Live,

    /// Every read fails with a query error
    Failing,
}

/// In-memory `ClientStore` with fixed records
pub struct ScriptedStore {
    mode: StoreMode,
    clients: Vec<Client>,
    stats: DashboardStats,
}

impl ScriptedStore {
    pub fn live() -> Self {
        Self {
            mode: StoreMode::Live,
            clients: vec![
                live_client("101", "Brasserie Live", 3),
                live_client("102", "Atelier Live", 1),
                live_client("103", "Cordonnerie Live", 2),
            ],
            stats: DashboardStats {
                total_clients: 3,
                total_factures: 42,
                total_contacts: 7,
                total_entreprises: 4,
                total_factures_fournisseurs: 11,
            },
        }
    }

    pub fn failing() -> Self {
        Self {
            mode: StoreMode::Failing,
            ..Self::live()
        }
    }

    fn check(&self) -> Result<(), RepositoryError> {
        match self.mode {
            StoreMode::Live => Ok(()),
            StoreMode::Failing => Err(RepositoryError::Query(sqlx::Error::PoolTimedOut)),
        }
    }
}

#[async_trait]
impl ClientStore for ScriptedStore {
    async fn connect(&self) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn disconnect(&self) {}

    async fn connection_status(&self) -> ConnectionStatus {
        ConnectionStatus {
            store1_connected: true,
            store2_connected: true,
        }
    }

    async fn list_clients(&self, query: &ClientQuery) -> Result<ClientPage, RepositoryError> {
        self.check()?;
        Ok(fallback::query_clients(&self.clients, query))
    }

    async fn find_client(&self, id: &str) -> Result<Option<Client>, RepositoryError> {
        self.check()?;
        Ok(self.clients.iter().find(|c| c.id == id).cloned())
    }

    async fn dashboard_stats(&self) -> Result<DashboardStats, RepositoryError> {
        self.check()?;
        Ok(self.stats)
    }
}

fn live_client(id: &str, name: &str, day: u32) -> Client {
    let created_at = Utc
        .with_ymd_and_hms(2024, 9, day, 12, 0, 0)
        .single()
        .unwrap();

    Client {
        id: id.to_string(),
        societe_name: name.to_string(),
        email: Some(format!("contact@{}.be", id)),
        phone: None,
        address: Some("Rue Neuve 1 1000 Belgique".to_string()),
        created_at,
        updated_at: created_at,
        factures_count: 1,
        contacts_count: 1,
        entreprises_count: 1,
        factures_fournisseurs_count: 0,
        has_legal_unit: true,
    }
}

pub fn admin() -> User {
    User {
        id: "1".to_string(),
        username: "admin".to_string(),
        email: "admin@dashboard.local".to_string(),
    }
}

pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["http://localhost:5173".to_string()],
            production: false,
        },
        jwt: JwtConfig {
            secret: SECRET.to_string(),
            expiration_hours: 24,
        },
        admin: AdminConfig {
            user: admin(),
            password: AdminPassword::Plaintext(PASSWORD.to_string()),
        },
        database: DatabaseSettings {
            primary: DatabaseConfig::default(),
            secondary: DatabaseConfig {
                database: "legal_unit_db".to_string(),
                max_connections: 5,
                ..Default::default()
            },
            reconnect_interval_seconds: 0,
        },
    }
}

/// Test context containing all necessary resources
pub struct TestContext {
    pub app: axum::Router,
    pub config: Config,
    pub jwt_token: String,
}

impl TestContext {
    /// Router over a repository that was never connected
    pub fn disconnected() -> Self {
        let config = test_config();
        let store = ClientRepository::new(
            config.database.primary.clone(),
            config.database.secondary.clone(),
        );
        Self::with_store(Arc::new(store))
    }

    /// Router over an arbitrary store
    pub fn with_store(store: Arc<dyn ClientStore>) -> Self {
        let config = test_config();
        let credentials = config.admin.credentials().unwrap();
        let jwt_token = create_token(&Claims::new(&admin()), SECRET).unwrap();

        let app = build_router(AppState::new(store, credentials, config.clone()));

        TestContext {
            app,
            config,
            jwt_token,
        }
    }

    /// Returns authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.jwt_token)
    }

    /// Sends a request and returns status, headers and the JSON body
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, HeaderMap, serde_json::Value) {
        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                panic!("non-JSON body: {}", String::from_utf8_lossy(&bytes))
            })
        };
        (status, headers, body)
    }

    /// Authenticated GET
    pub async fn get(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        self.get_with(uri, Some(&self.auth_header())).await
    }

    /// GET with an arbitrary (or no) Authorization header
    pub async fn get_with(&self, uri: &str, authorization: Option<&str>) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().uri(uri);
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let (status, _, body) = self.send(builder.body(Body::empty()).unwrap()).await;
        (status, body)
    }

    /// POST /api/auth/login with a raw body
    pub async fn login_raw(&self, body: String) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/api/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap();
        let (status, _, body) = self.send(request).await;
        (status, body)
    }

    /// POST /api/auth/login
    pub async fn login(&self, username: &str, password: &str) -> (StatusCode, serde_json::Value) {
        self.login_raw(serde_json::json!({"username": username, "password": password}).to_string())
            .await
    }
}

/// A token that expired a minute ago
pub fn expired_token() -> String {
    create_token(&Claims::with_expiration(&admin(), Duration::seconds(-60)), SECRET).unwrap()
}
