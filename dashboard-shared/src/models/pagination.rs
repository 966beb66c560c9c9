/// Listing parameters and the paginated envelope
///
/// `ClientQuery` is the validated, request-scoped form of the listing query
/// string. Parsing is lenient where the dashboard has always been lenient:
/// an unknown `sortBy` falls back to the company name and an unknown
/// `sortOrder` falls back to ascending.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Default page size
pub const DEFAULT_LIMIT: u32 = 10;

/// Largest page size accepted by the API
pub const MAX_LIMIT: u32 = 100;

/// Client field a listing can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    /// Company name (default)
    #[default]
    SocieteName,
    Email,
    Phone,
    Address,
    CreatedAt,
    UpdatedAt,
    FacturesCount,
    ContactsCount,
    EntreprisesCount,
    FacturesFournisseursCount,
    HasLegalUnit,
}

impl SortField {
    /// Parses a `sortBy` value; unknown keys fall back to `SocieteName`
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "email" => SortField::Email,
            "phone" => SortField::Phone,
            "address" => SortField::Address,
            "created_at" => SortField::CreatedAt,
            "updated_at" => SortField::UpdatedAt,
            "factures_count" => SortField::FacturesCount,
            "contacts_count" => SortField::ContactsCount,
            "entreprises_count" => SortField::EntreprisesCount,
            "factures_fournisseurs_count" => SortField::FacturesFournisseursCount,
            "has_legal_unit" => SortField::HasLegalUnit,
            _ => SortField::SocieteName,
        }
    }

    /// Wire name of the field
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::SocieteName => "societe_name",
            SortField::Email => "email",
            SortField::Phone => "phone",
            SortField::Address => "address",
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
            SortField::FacturesCount => "factures_count",
            SortField::ContactsCount => "contacts_count",
            SortField::EntreprisesCount => "entreprises_count",
            SortField::FacturesFournisseursCount => "factures_fournisseurs_count",
            SortField::HasLegalUnit => "has_legal_unit",
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Parses a `sortOrder` value; anything but `desc` is ascending
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("desc") {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }

    /// SQL keyword for the direction
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }

    /// Wire name of the direction
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Validated listing parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientQuery {
    /// 1-based page number
    pub page: u32,

    /// Page size
    pub limit: u32,

    /// Sort field
    pub sort_by: SortField,

    /// Sort direction
    pub sort_order: SortOrder,

    /// Trimmed search term; empty means no filtering
    pub search: String,

    /// Keep rows created on or after this day (midnight UTC)
    pub date_from: Option<NaiveDate>,

    /// Keep rows created on or before the end of this day (UTC)
    ///
    /// Only the fallback data set honors this bound; the primary store
    /// query has never filtered on an end date.
    pub date_to: Option<NaiveDate>,
}

impl Default for ClientQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
            sort_by: SortField::default(),
            sort_order: SortOrder::default(),
            search: String::new(),
            date_from: None,
            date_to: None,
        }
    }
}

impl ClientQuery {
    /// Number of rows skipped before the requested page
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }

    /// Whether a search term was supplied
    pub fn has_search(&self) -> bool {
        !self.search.is_empty()
    }

    /// Inclusive lower creation-date bound
    pub fn created_from(&self) -> Option<DateTime<Utc>> {
        self.date_from
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }

    /// Inclusive upper creation-date bound (last millisecond of `date_to`)
    pub fn created_to(&self) -> Option<DateTime<Utc>> {
        self.date_to
            .and_then(|d| d.and_hms_milli_opt(23, 59, 59, 999))
            .map(|dt| dt.and_utc())
    }
}

/// Parses a `dateFrom`/`dateTo` value
///
/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp (reduced to its UTC
/// day). Blank input means the bound is absent.
pub fn parse_date_param(value: &str) -> Result<Option<NaiveDate>, String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(Some(date));
    }

    DateTime::parse_from_rfc3339(value)
        .map(|dt| Some(dt.with_timezone(&Utc).date_naive()))
        .map_err(|_| format!("Invalid date '{}', expected YYYY-MM-DD", value))
}

/// Pagination block of a paginated response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
}

impl PaginationMeta {
    /// Builds the block; `total_pages = ceil(total / limit)`
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            total.div_ceil(u64::from(limit))
        };

        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }
}

/// Paginated list envelope: `{data: [...], pagination: {...}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, page: u32, limit: u32, total: u64) -> Self {
        Self {
            data,
            pagination: PaginationMeta::new(page, limit, total),
        }
    }
}
