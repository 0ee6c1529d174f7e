pub use crate::config::ClientConfig;
pub use crate::http::{Client, HttpClient, HttpMethod, HttpRequest, HttpResponse, ReqwestClient};
pub use crate::responses::*;

pub mod config;
pub mod http;
pub mod query;
pub mod responses;

/// Base URL of the hosted Wunderlist v1 API.
pub const DEFAULT_BASE_URL: &str = "https://api.wunderlist.com";

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Transport(String),
    #[error("Path not found")]
    NotFound,
    #[error("{message}")]
    Unprocessable { message: String },
    /// The server answered with a JSON payload carrying an `errors` key.
    #[error("API error: {0}")]
    Api(serde_json::Value),
    /// The body parsed but is neither a JSON object nor an array.
    #[error("Unexpected response payload: {0}")]
    UnexpectedPayload(serde_json::Value),
    #[error("JSON serialization/deserialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    /// HTTP status behind the error, for the variants that come from one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::NotFound => Some(404),
            ClientError::Unprocessable { .. } => Some(422),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
