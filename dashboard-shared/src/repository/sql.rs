/// SQL text and row mapping for the primary store
///
/// The store schema is an external contract. Everything that turns request
/// input into SQL goes through here: column names only ever come from
/// [`sort_column`]'s allow-list and search text is always bound, never
/// interpolated.

use sqlx::{MySql, QueryBuilder};

use crate::models::{ClientQuery, SortField};

/// Only companies of this pack are visible through the dashboard
pub const PACK_ID: i64 = 11;

/// Company columns, address joined in
pub const SELECT_SOCIETE: &str = "SELECT \
     CAST(s.societe_id AS SIGNED) AS societe_id, \
     CAST(s.societe_name AS CHAR) AS societe_name, \
     CAST(a.adresse_rue AS CHAR) AS adresse_rue, \
     CAST(a.adresse_numero AS CHAR) AS adresse_numero, \
     CAST(a.adresse_cp AS CHAR) AS adresse_cp, \
     CAST(a.adresse_pays AS CHAR) AS adresse_pays, \
     CAST(s.societe_datecrea AS DATETIME) AS societe_datecrea \
     FROM societe s \
     INNER JOIN adresse a ON a.adresse_id = s.societe_adresse_id";

/// Row count for the same join
pub const COUNT_SOCIETE: &str = "SELECT COUNT(*) \
     FROM societe s \
     INNER JOIN adresse a ON a.adresse_id = s.societe_adresse_id";

/// First active admin-type user of a company
pub const SELECT_PRIMARY_CONTACT: &str = "SELECT \
     CAST(u.user_pname AS CHAR), CAST(u.user_name AS CHAR), CAST(u.user_phone AS CHAR) \
     FROM user u \
     WHERE u.user_societe_id = ? AND u.user_compte = 1 AND u.user_type = 1 AND u.user_valid = 1 \
     LIMIT 1";

/// Legal unit existence, secondary store, keyed by company id as tenant id
pub const COUNT_LEGAL_UNIT: &str = "SELECT COUNT(*) FROM legal_unit WHERE tenant_id = ?";

/// Per-company related record counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Related {
    Factures,
    Contacts,
    Entreprises,
    FacturesFournisseurs,
}

impl Related {
    /// Count query for one company, bound on `societe_id`
    pub fn count_sql(&self) -> &'static str {
        match self {
            Related::Factures => "SELECT COUNT(*) FROM facturation WHERE societe_id = ?",
            Related::Contacts => "SELECT COUNT(*) FROM contacts WHERE societe_id = ?",
            Related::Entreprises => "SELECT COUNT(*) FROM entreprise WHERE societe_id = ?",
            Related::FacturesFournisseurs => {
                "SELECT COUNT(*) FROM facture_fournisseur WHERE societe_id = ?"
            }
        }
    }

    /// Dashboard-wide count, scoped to the visible pack and valid rows
    pub fn total_sql(&self) -> &'static str {
        match self {
            Related::Factures => {
                "SELECT COUNT(*) FROM facturation \
                 INNER JOIN societe ON societe.societe_id = facturation.societe_id \
                 WHERE pack_id = 11 AND societe_valid = 1"
            }
            Related::Contacts => {
                "SELECT COUNT(*) FROM contacts \
                 INNER JOIN societe ON societe.societe_id = contacts.societe_id \
                 WHERE pack_id = 11 AND societe_valid = 1"
            }
            Related::Entreprises => {
                "SELECT COUNT(*) FROM entreprise \
                 INNER JOIN societe ON societe.societe_id = entreprise.societe_id \
                 WHERE pack_id = 11 AND entreprise_valid = 1 AND societe_valid = 1"
            }
            Related::FacturesFournisseurs => {
                "SELECT COUNT(*) FROM facture_fournisseur \
                 INNER JOIN societe ON societe.societe_id = facture_fournisseur.societe_id \
                 WHERE pack_id = 11 AND facture_fournisseur_valid = 1 AND societe_valid = 1"
            }
        }
    }
}

/// Visible company count
pub const TOTAL_SOCIETES: &str =
    "SELECT COUNT(*) FROM societe WHERE pack_id = 11 AND societe_valid = 1";

/// Maps a sort field to a column on the store
///
/// Only the name and the creation date are real columns. The four count
/// fields are accepted by the API but sort by name here, because the counts
/// are computed after paging. Everything else also sorts by name.
pub fn sort_column(field: SortField) -> &'static str {
    match field {
        SortField::CreatedAt => "s.societe_datecrea",
        _ => "s.societe_name",
    }
}

/// Escape character for `LIKE` patterns, named in every `ESCAPE` clause
///
/// Not a backslash: `NO_BACKSLASH_ESCAPES` would change its meaning.
pub const LIKE_ESCAPE: char = '!';

/// Escapes `LIKE` wildcards so `term` matches literally
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, LIKE_ESCAPE | '%' | '_') {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

/// Appends the listing `WHERE` clause
///
/// The tenant filter is fixed. Search matches the company name or the
/// street, case-insensitively. Only the lower creation-date bound applies:
/// `date_to` has never been part of the store query.
pub fn push_filters(builder: &mut QueryBuilder<'_, MySql>, query: &ClientQuery) {
    builder.push(format!(
        " WHERE s.pack_id = {} AND s.societe_valid = 1",
        PACK_ID
    ));

    if query.has_search() {
        let pattern = format!("%{}%", escape_like(&query.search.to_lowercase()));
        builder
            .push(" AND (LOWER(s.societe_name) LIKE ")
            .push_bind(pattern.clone())
            .push(format!(" ESCAPE '{}' OR LOWER(a.adresse_rue) LIKE ", LIKE_ESCAPE))
            .push_bind(pattern)
            .push(format!(" ESCAPE '{}')", LIKE_ESCAPE));
    }

    if let Some(from) = query.created_from() {
        builder
            .push(" AND s.societe_datecrea >= ")
            .push_bind(from.naive_utc());
    }
}

/// Appends `ORDER BY`, `LIMIT` and `OFFSET`
///
/// Ties are broken on the primary key so pages never overlap.
pub fn push_ordering(builder: &mut QueryBuilder<'_, MySql>, query: &ClientQuery) {
    builder
        .push(" ORDER BY ")
        .push(sort_column(query.sort_by))
        .push(" ")
        .push(query.sort_order.as_sql())
        .push(", s.societe_id ASC LIMIT ")
        .push_bind(u64::from(query.limit))
        .push(" OFFSET ")
        .push_bind(query.offset());
}

/// Display name of a stored country value
pub fn display_country(value: &str) -> &str {
    match value {
        "PAYS_BELGIQUE" => "Belgique",
        other => other,
    }
}

/// Joins the non-blank address parts with single spaces
pub fn build_address(
    street: Option<&str>,
    number: Option<&str>,
    postal_code: Option<&str>,
    country: Option<&str>,
) -> Option<String> {
    let country = country.map(|c| display_country(c.trim()));

    let parts: Vec<&str> = [street, number, postal_code, country]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}
