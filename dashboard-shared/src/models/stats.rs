/// Dashboard aggregate counters

use serde::{Deserialize, Serialize};

/// Raw counts computed by the repository
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_clients: i64,
    pub total_factures: i64,
    pub total_contacts: i64,
    pub total_entreprises: i64,
    pub total_factures_fournisseurs: i64,
}

impl DashboardStats {
    /// Numbers shown while the primary store is unreachable
    pub const FALLBACK: DashboardStats = DashboardStats {
        total_clients: 20,
        total_factures: 2847,
        total_contacts: 98,
        total_entreprises: 98,
        total_factures_fournisseurs: 623,
    };
}

/// Wire form of the counters: camelCase keys, values as strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStatsView {
    pub total_clients: String,
    pub total_factures: String,
    pub total_contacts: String,
    pub total_entreprises: String,
    pub total_factures_fournisseurs: String,
}

impl From<DashboardStats> for DashboardStatsView {
    fn from(stats: DashboardStats) -> Self {
        Self {
            total_clients: stats.total_clients.to_string(),
            total_factures: stats.total_factures.to_string(),
            total_contacts: stats.total_contacts.to_string(),
            total_entreprises: stats.total_entreprises.to_string(),
            total_factures_fournisseurs: stats.total_factures_fournisseurs.to_string(),
        }
    }
}
