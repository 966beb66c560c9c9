/// Client-side errors

/// Errors returned by `ApiClient`
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The base URL cannot carry API paths
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// Transport failure or undecodable body
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A protected endpoint was called before logging in
    #[error("Not logged in")]
    NotAuthenticated,

    /// The server refused the session token; the session was dropped
    #[error("Session expired, log in again")]
    SessionExpired,

    /// The server answered with a failure envelope
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

impl ClientError {
    /// HTTP status of an `Api` error
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for client calls
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ClientError::Api {
            status: 404,
            message: "Client not found".to_string(),
        };
        assert_eq!(err.to_string(), "API error (404): Client not found");
        assert_eq!(err.status(), Some(404));
        assert_eq!(ClientError::SessionExpired.status(), None);
    }
}
