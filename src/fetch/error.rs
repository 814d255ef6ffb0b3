use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network request failed for station '{station}'")]
    NetworkRequest {
        station: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP request failed for station '{station}' with status {status}")]
    HttpStatus {
        station: String,
        status: reqwest::StatusCode,
    },

    #[error("Failed to decode the response for station '{station}'")]
    JsonParse {
        station: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Response for station '{station}' contained no records")]
    EmptyResponse { station: String },

    #[error("Failed to build the HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Invalid endpoint URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl FetchError {
    /// The HTTP status for upstream failures, `None` for anything else.
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            FetchError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the request never produced a response at all.
    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::NetworkRequest { .. })
    }
}
