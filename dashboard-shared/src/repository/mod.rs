/// Record Repository
///
/// `ClientStore` is the seam between the HTTP-facing services and storage.
/// [`ClientRepository`] implements it over the two MySQL stores; tests
/// substitute in-memory stores.
///
/// The repository owns both connection pools. It is built once at process
/// start, shared behind an `Arc`, connected explicitly and disconnected
/// during shutdown.
///
/// # Example
///
/// ```no_run
/// use dashboard_shared::db::pool::DatabaseConfig;
/// use dashboard_shared::models::ClientQuery;
/// use dashboard_shared::repository::{ClientRepository, ClientStore};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let repository = ClientRepository::new(
///     DatabaseConfig::default(),
///     DatabaseConfig { database: "legal_unit_db".to_string(), ..Default::default() },
/// );
///
/// repository.connect().await?;
/// let page = repository.list_clients(&ClientQuery::default()).await?;
/// println!("{} clients", page.total);
/// repository.disconnect().await;
/// # Ok(())
/// # }
/// ```

mod mysql;
pub mod sql;

pub use mysql::ClientRepository;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::{Client, ClientPage, ClientQuery, DashboardStats};

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// `connect` has not succeeded (or `disconnect` was called)
    #[error("Database not connected")]
    NotConnected,

    /// A store could not be reached during `connect`
    #[error("Failed to connect to the {store} store: {source}")]
    Connect {
        store: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// A query failed
    #[error("Database query failed: {0}")]
    Query(#[from] sqlx::Error),
}

/// Liveness of the two pools, as last observed (no I/O)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStatus {
    /// Primary (`societe`) store
    pub store1_connected: bool,

    /// Secondary (legal unit) store
    pub store2_connected: bool,
}

impl ConnectionStatus {
    /// Both pools are up
    pub fn all_connected(&self) -> bool {
        self.store1_connected && self.store2_connected
    }
}

/// Access to client records and dashboard counters
#[async_trait]
pub trait ClientStore: Send + Sync {
    /// Establishes both pools, verifying liveness before publishing them
    async fn connect(&self) -> Result<(), RepositoryError>;

    /// Closes both pools
    async fn disconnect(&self);

    /// Current pool liveness
    async fn connection_status(&self) -> ConnectionStatus;

    /// One filtered, sorted page of clients plus the total match count
    async fn list_clients(&self, query: &ClientQuery) -> Result<ClientPage, RepositoryError>;

    /// A single client of the visible tenant class, by id
    async fn find_client(&self, id: &str) -> Result<Option<Client>, RepositoryError>;

    /// The five dashboard counters
    async fn dashboard_stats(&self) -> Result<DashboardStats, RepositoryError>;
}
