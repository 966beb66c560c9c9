/// MySQL-backed `ClientStore`
///
/// Reads companies from the primary store and legal-unit existence from the
/// secondary store. Each listed company is enriched with its primary contact
/// and four related counts; rows are enriched concurrently and every row's
/// six lookups run concurrently too.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use futures::future::try_join_all;
use sqlx::{mysql::MySqlPool, MySql, QueryBuilder};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::sql::{self, Related};
use super::{ClientStore, ConnectionStatus, RepositoryError};
use crate::db::pool::{close_pool, create_pool, DatabaseConfig};
use crate::models::client::non_blank;
use crate::models::{Client, ClientPage, ClientQuery, DashboardStats};

/// Company row as selected by [`sql::SELECT_SOCIETE`]
#[derive(Debug, sqlx::FromRow)]
struct SocieteRow {
    societe_id: i64,
    societe_name: Option<String>,
    adresse_rue: Option<String>,
    adresse_numero: Option<String>,
    adresse_cp: Option<String>,
    adresse_pays: Option<String>,
    societe_datecrea: Option<NaiveDateTime>,
}

type ContactRow = (Option<String>, Option<String>, Option<String>);

#[derive(Clone)]
struct StorePools {
    primary: MySqlPool,
    secondary: MySqlPool,
}

/// Repository over the primary (`societe`) and secondary (legal unit) stores
pub struct ClientRepository {
    primary_config: DatabaseConfig,
    secondary_config: DatabaseConfig,
    pools: RwLock<Option<StorePools>>,
}

impl ClientRepository {
    /// Creates a disconnected repository
    pub fn new(primary_config: DatabaseConfig, secondary_config: DatabaseConfig) -> Self {
        Self {
            primary_config,
            secondary_config,
            pools: RwLock::new(None),
        }
    }

    /// Snapshot of the pools; the lock is not held across queries
    async fn pools(&self) -> Result<StorePools, RepositoryError> {
        self.pools
            .read()
            .await
            .clone()
            .ok_or(RepositoryError::NotConnected)
    }

    async fn enrich(pools: &StorePools, row: SocieteRow) -> Result<Client, RepositoryError> {
        let id = row.societe_id;

        let (contact, factures, contacts, entreprises, fournisseurs, has_legal_unit) = tokio::try_join!(
            primary_contact(&pools.primary, id),
            related_count(&pools.primary, Related::Factures, id),
            related_count(&pools.primary, Related::Contacts, id),
            related_count(&pools.primary, Related::Entreprises, id),
            related_count(&pools.primary, Related::FacturesFournisseurs, id),
            async { Ok::<_, sqlx::Error>(legal_unit_exists(&pools.secondary, id).await) },
        )?;

        let (pname, name, phone) = contact.unwrap_or_default();
        let created_at = row
            .societe_datecrea
            .map(|dt| dt.and_utc())
            .unwrap_or_default();

        Ok(Client {
            id: id.to_string(),
            societe_name: row.societe_name.unwrap_or_default(),
            email: non_blank(pname).or_else(|| non_blank(name)),
            phone: non_blank(phone),
            address: sql::build_address(
                row.adresse_rue.as_deref(),
                row.adresse_numero.as_deref(),
                row.adresse_cp.as_deref(),
                row.adresse_pays.as_deref(),
            ),
            created_at,
            updated_at: created_at,
            factures_count: factures,
            contacts_count: contacts,
            entreprises_count: entreprises,
            factures_fournisseurs_count: fournisseurs,
            has_legal_unit,
        })
    }
}

async fn primary_contact(pool: &MySqlPool, societe_id: i64) -> Result<Option<ContactRow>, sqlx::Error> {
    sqlx::query_as(sql::SELECT_PRIMARY_CONTACT)
        .bind(societe_id)
        .fetch_optional(pool)
        .await
}

async fn related_count(pool: &MySqlPool, related: Related, societe_id: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(related.count_sql())
        .bind(societe_id)
        .fetch_one(pool)
        .await
}

/// Legal unit lookups never fail a listing; errors read as "no legal unit"
async fn legal_unit_exists(pool: &MySqlPool, societe_id: i64) -> bool {
    let result: Result<i64, sqlx::Error> = sqlx::query_scalar(sql::COUNT_LEGAL_UNIT)
        .bind(societe_id.to_string())
        .fetch_one(pool)
        .await;

    match result {
        Ok(count) => count > 0,
        Err(e) => {
            warn!(societe_id, error = %e, "Legal unit check failed");
            false
        }
    }
}

async fn total_count(pool: &MySqlPool, query: &'static str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(query).fetch_one(pool).await
}

#[async_trait]
impl ClientStore for ClientRepository {
    async fn connect(&self) -> Result<(), RepositoryError> {
        let primary = create_pool(&self.primary_config)
            .await
            .map_err(|source| RepositoryError::Connect {
                store: "primary",
                source,
            })?;

        let secondary = match create_pool(&self.secondary_config).await {
            Ok(pool) => pool,
            Err(source) => {
                close_pool(primary, "primary").await;
                return Err(RepositoryError::Connect {
                    store: "secondary",
                    source,
                });
            }
        };

        let previous = self
            .pools
            .write()
            .await
            .replace(StorePools { primary, secondary });

        if let Some(old) = previous {
            close_pool(old.primary, "primary (replaced)").await;
            close_pool(old.secondary, "secondary (replaced)").await;
        }

        info!(
            primary = %self.primary_config.describe(),
            secondary = %self.secondary_config.describe(),
            "Connected to both stores"
        );
        Ok(())
    }

    async fn disconnect(&self) {
        let taken = self.pools.write().await.take();

        if let Some(pools) = taken {
            close_pool(pools.primary, "primary").await;
            close_pool(pools.secondary, "secondary").await;
        }
    }

    async fn connection_status(&self) -> ConnectionStatus {
        match self.pools.read().await.as_ref() {
            Some(pools) => ConnectionStatus {
                store1_connected: !pools.primary.is_closed(),
                store2_connected: !pools.secondary.is_closed(),
            },
            None => ConnectionStatus::default(),
        }
    }

    async fn list_clients(&self, query: &ClientQuery) -> Result<ClientPage, RepositoryError> {
        let pools = self.pools().await?;

        let mut count = QueryBuilder::<MySql>::new(sql::COUNT_SOCIETE);
        sql::push_filters(&mut count, query);
        let total: i64 = count.build_query_scalar().fetch_one(&pools.primary).await?;

        let mut select = QueryBuilder::<MySql>::new(sql::SELECT_SOCIETE);
        sql::push_filters(&mut select, query);
        sql::push_ordering(&mut select, query);
        let rows: Vec<SocieteRow> = select.build_query_as().fetch_all(&pools.primary).await?;

        let clients = try_join_all(rows.into_iter().map(|row| Self::enrich(&pools, row))).await?;

        debug!(
            page = query.page,
            limit = query.limit,
            total,
            returned = clients.len(),
            "Listed clients"
        );

        Ok(ClientPage {
            clients,
            total: u64::try_from(total).unwrap_or_default(),
        })
    }

    async fn find_client(&self, id: &str) -> Result<Option<Client>, RepositoryError> {
        let pools = self.pools().await?;

        let Ok(societe_id) = id.trim().parse::<i64>() else {
            return Ok(None);
        };

        let mut select = QueryBuilder::<MySql>::new(sql::SELECT_SOCIETE);
        sql::push_filters(&mut select, &ClientQuery::default());
        select.push(" AND s.societe_id = ").push_bind(societe_id);

        let row: Option<SocieteRow> = select.build_query_as().fetch_optional(&pools.primary).await?;

        match row {
            Some(row) => Ok(Some(Self::enrich(&pools, row).await?)),
            None => Ok(None),
        }
    }

    async fn dashboard_stats(&self) -> Result<DashboardStats, RepositoryError> {
        let pools = self.pools().await?;
        let pool = &pools.primary;

        let (total_clients, total_factures, total_contacts, total_entreprises, total_factures_fournisseurs) = tokio::try_join!(
            total_count(pool, sql::TOTAL_SOCIETES),
            total_count(pool, Related::Factures.total_sql()),
            total_count(pool, Related::Contacts.total_sql()),
            total_count(pool, Related::Entreprises.total_sql()),
            total_count(pool, Related::FacturesFournisseurs.total_sql()),
        )?;

        Ok(DashboardStats {
            total_clients,
            total_factures,
            total_contacts,
            total_entreprises,
            total_factures_fournisseurs,
        })
    }
}
