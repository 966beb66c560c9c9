/// Uniform response envelope
///
/// Every JSON body the API produces (health aside) has this shape:
///
/// ```json
/// { "success": true, "data": { ... } }
/// { "success": true, "data": { ... }, "degraded": true }
/// { "success": false, "error": "Invalid credentials" }
/// ```
///
/// `degraded` is only present when the payload was served from the static
/// fallback set because a store could not answer.

use serde::{Deserialize, Serialize};

/// Per-field validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Offending field (wire name)
    pub field: String,

    /// Human-readable message
    pub message: String,
}

/// Response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub degraded: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl<T> ApiResponse<T> {
    /// Successful response carrying live data
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            details: None,
            degraded: false,
        }
    }

    /// Successful response; `degraded` marks fallback data
    pub fn with_source(data: T, degraded: bool) -> Self {
        Self {
            degraded,
            ..Self::ok(data)
        }
    }

    /// Failed response
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            details: None,
            degraded: false,
        }
    }

    /// Failed response with per-field details
    pub fn invalid(error: impl Into<String>, details: Vec<FieldError>) -> Self {
        Self {
            details: Some(details),
            ..Self::failure(error)
        }
    }

    /// Converts the envelope into a `Result`, keeping the error text
    pub fn into_result(self) -> Result<T, String> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            (true, None) => Err("Response carried no data".to_string()),
            (false, _) => Err(self
                .error
                .unwrap_or_else(|| "Unknown error".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_has_no_error() {
        let json = serde_json::to_value(ApiResponse::ok(json!({"a": 1}))).unwrap();
        assert_eq!(json, json!({"success": true, "data": {"a": 1}}));
    }

    #[test]
    fn test_failure_has_no_data() {
        let json = serde_json::to_value(ApiResponse::<()>::failure("Route not found")).unwrap();
        assert_eq!(json, json!({"success": false, "error": "Route not found"}));
    }

    #[test]
    fn test_degraded_flag_only_when_set() {
        let live = serde_json::to_value(ApiResponse::with_source(1, false)).unwrap();
        assert!(live.get("degraded").is_none());

        let fallback = serde_json::to_value(ApiResponse::with_source(1, true)).unwrap();
        assert_eq!(fallback["degraded"], true);
    }

    #[test]
    fn test_invalid_carries_details() {
        let resp = ApiResponse::<()>::invalid(
            "Validation failed",
            vec![FieldError {
                field: "limit".to_string(),
                message: "must be at least 1".to_string(),
            }],
        );
        let json = serde_json::to_value(resp).unwrap();
        assert_eq!(json["details"][0]["field"], "limit");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_into_result() {
        let parsed: ApiResponse<u32> =
            serde_json::from_value(json!({"success": true, "data": 7})).unwrap();
        assert_eq!(parsed.into_result(), Ok(7));

        let parsed: ApiResponse<u32> =
            serde_json::from_value(json!({"success": false, "error": "nope"})).unwrap();
        assert_eq!(parsed.into_result(), Err("nope".to_string()));
    }
}
