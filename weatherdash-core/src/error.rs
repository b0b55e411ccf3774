//! Error types for the weather gateway and the content API.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("API key is not configured")]
    NotConfigured,

    #[error("API key is invalid or missing")]
    Unauthorized,

    #[error("Location not found")]
    NotFound,

    #[error("Too many requests")]
    RateLimited,

    #[error("API request failed with status {0}")]
    RequestFailed(u16),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Failed to parse response: {0}")]
    Parse(String),
}

impl GatewayError {
    /// Map an HTTP status to the matching failure. Callers only use this for non-2xx.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => Self::Unauthorized,
            404 => Self::NotFound,
            429 => Self::RateLimited,
            other => Self::RequestFailed(other),
        }
    }

    /// Single user-visible message for the dashboard error state.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotConfigured => {
                "API key is not configured. Run `weatherdash configure` first.".to_string()
            }
            Self::Unauthorized => "API key is invalid or missing".to_string(),
            Self::NotFound => "Location not found".to_string(),
            Self::RateLimited => "Too many requests. Please try again later".to_string(),
            Self::RequestFailed(status) => format!("API request failed with status {status}"),
            Self::Network(_) => "Network error occurred".to_string(),
            Self::Parse(_) => "Received malformed data from the weather service".to_string(),
        }
    }

    /// Nothing retries automatically; this only informs callers.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited | Self::Network(_))
    }
}
