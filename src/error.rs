use thiserror::Error;

/// Errors that can occur in ws-endpoint-picker
#[derive(Error, Debug)]
pub enum Error {
    /// WebSocket connection error
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// HTTP error from the discovery fetch
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Connection could not be established
    #[error("connection failed: {0}")]
    Connect(String),

    /// A discovery entry that cannot be used as an endpoint
    #[error("invalid endpoint '{name}': {reason}")]
    InvalidEndpoint { name: String, reason: String },
}
