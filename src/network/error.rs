//! Normalized API errors. `Display` is the one string the UI shows.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Network, DNS or TLS failure before a response arrived
    #[error("{0}")]
    Transport(String),

    /// Non-2xx response; `message` comes from a JSON `{message}` body when present
    #[error("{message}")]
    Status { status: u16, message: String },

    /// 2xx response whose body did not match the expected shape
    #[error("Invalid response body: {0}")]
    Decode(String),

    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),
}

impl ApiError {
    pub fn from_transport(e: &reqwest::Error) -> Self {
        let msg = if e.is_timeout() {
            "Request timed out".to_string()
        } else if e.is_connect() {
            format!("Connection failed: {}", e)
        } else {
            format!("Request failed: {}", e)
        };
        ApiError::Transport(msg)
    }

    /// Build the error for a non-2xx response from its raw body
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|json| {
                json.get("message")
                    .and_then(|m| m.as_str())
                    .filter(|m| !m.trim().is_empty())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| format!("HTTP error {}", status));
        ApiError::Status { status, message }
    }

    #[cfg(test)]
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
