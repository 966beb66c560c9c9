/// Listing and stats services
///
/// Each service asks the `ClientStore` first and substitutes the static
/// fallback data when the store cannot answer. The substitution is never
/// silent: the result is tagged `degraded` and a warning is logged with the
/// repository error attached.
///
/// - `listing`: client pages and single-client lookups
/// - `stats`: dashboard counters

pub mod listing;
pub mod stats;

use dashboard_shared::models::ApiResponse;

/// A service result plus where it came from
#[derive(Debug, Clone, PartialEq)]
pub struct Sourced<T> {
    /// The payload
    pub data: T,

    /// `true` when `data` came from the fallback set
    pub degraded: bool,
}

impl<T> Sourced<T> {
    /// Payload read from the store
    pub fn live(data: T) -> Self {
        Self {
            data,
            degraded: false,
        }
    }

    /// Payload taken from the fallback set
    pub fn fallback(data: T) -> Self {
        Self {
            data,
            degraded: true,
        }
    }

    /// Transforms the payload, keeping its origin
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Sourced<U> {
        Sourced {
            data: f(self.data),
            degraded: self.degraded,
        }
    }

    /// Wraps the payload in a success envelope
    pub fn into_envelope(self) -> ApiResponse<T> {
        ApiResponse::with_source(self.data, self.degraded)
    }
}
