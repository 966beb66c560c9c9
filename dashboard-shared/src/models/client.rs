/// Client (société) record
///
/// A client is assembled on every read from a `societe` row, its address,
/// its primary contact user, four count queries and one existence check in
/// the secondary store. Records are never cached.
///
/// # JSON
///
/// Field names stay snake_case on the wire, matching what the dashboard
/// table binds to:
///
/// ```json
/// {
///   "id": "42",
///   "societe_name": "Boulangerie Dupont",
///   "email": "contact@dupont.be",
///   "address": "Rue Haute 12 1000 Belgique",
///   "created_at": "2023-03-14T00:00:00Z",
///   "factures_count": 12,
///   "has_legal_unit": true
/// }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Company record exposed by the listing and detail endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    /// Primary key of the underlying `societe` row, as a string
    pub id: String,

    /// Company name
    pub societe_name: String,

    /// Primary contact e-mail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Primary contact phone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Street, number, postal code and country joined by spaces
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Company creation date
    pub created_at: DateTime<Utc>,

    /// Same as `created_at`; the store keeps no modification date
    pub updated_at: DateTime<Utc>,

    /// Number of invoices
    pub factures_count: i64,

    /// Number of contacts
    pub contacts_count: i64,

    /// Number of sub-companies
    pub entreprises_count: i64,

    /// Number of supplier invoices
    pub factures_fournisseurs_count: i64,

    /// Whether the secondary store holds a legal unit for this company
    pub has_legal_unit: bool,
}

/// One page of clients plus the total matching row count
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientPage {
    /// Rows of the requested page
    pub clients: Vec<Client>,

    /// Number of rows matching the filters, across all pages
    pub total: u64,
}

/// Normalizes an optional text column: blank values become `None`
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
