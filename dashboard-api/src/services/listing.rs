/// Client listing and lookup
///
/// The store path and the fallback path share the same `ClientQuery`, so
/// paging and sorting agree. They differ on `date_to`: only the fallback
/// path applies it.

use dashboard_shared::fallback;
use dashboard_shared::models::{Client, ClientPage, ClientQuery};
use dashboard_shared::repository::{ClientStore, RepositoryError};
use tracing::{debug, warn};

use super::Sourced;

/// One page of clients, from the store or from the fallback set
pub async fn list_clients(store: &dyn ClientStore, query: &ClientQuery) -> Sourced<ClientPage> {
    match store.list_clients(query).await {
        Ok(page) => {
            debug!(total = page.total, source = "database", "Clients fetched");
            Sourced::live(page)
        }
        Err(e) => {
            warn!(
                error = %e,
                source = "fallback",
                page = query.page,
                limit = query.limit,
                "Client listing unavailable from store, serving fallback data"
            );
            Sourced::fallback(fallback::query_clients(fallback::sample_clients(), query))
        }
    }
}

/// A single client by id
///
/// A connected store is authoritative: a miss is a miss. Only when the
/// store is not connected at all is the fallback set consulted. Other
/// store errors propagate.
pub async fn find_client(
    store: &dyn ClientStore,
    id: &str,
) -> Result<Option<Sourced<Client>>, RepositoryError> {
    match store.find_client(id).await {
        Ok(client) => Ok(client.map(Sourced::live)),
        Err(RepositoryError::NotConnected) => {
            warn!(id, source = "fallback", "Store not connected, looking up fallback client");
            Ok(fallback::find_client(id).map(Sourced::fallback))
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_shared::db::pool::DatabaseConfig;
    use dashboard_shared::repository::ClientRepository;

    fn disconnected() -> ClientRepository {
        ClientRepository::new(DatabaseConfig::default(), DatabaseConfig::default())
    }

    #[tokio::test]
    async fn test_listing_falls_back_when_disconnected() {
        let query = ClientQuery {
            page: 2,
            ..Default::default()
        };

        let result = list_clients(&disconnected(), &query).await;

        assert!(result.degraded);
        assert_eq!(result.data.total, 20);
        assert_eq!(result.data.clients.len(), 10);
        assert_eq!(result.data.clients[0].id, "11");
    }

    #[tokio::test]
    async fn test_find_client_falls_back_when_disconnected() {
        let store = disconnected();

        let found = find_client(&store, "3").await.unwrap().unwrap();
        assert!(found.degraded);
        assert_eq!(found.data.societe_name, "Cabinet Peeters");

        assert!(find_client(&store, "999").await.unwrap().is_none());
    }

    #[test]
    fn test_sourced_envelope() {
        let envelope = Sourced::fallback(5).map(|n| n * 2).into_envelope();

        assert_eq!(envelope.data, Some(10));
        assert!(envelope.degraded);
        assert!(!Sourced::live(()).into_envelope().degraded);
    }
}
