//! The HTTP seam underneath [`Client`](crate::Client).
//!
//! A transport is built exactly once per client, from nothing more than the
//! application's API credentials, and is only ever asked to POST.

mod http_client;

pub use http_client::{HttpTransport, DEFAULT_API_URL};

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

/// Key-value parameters sent alongside a request (a body, or per-call options).
pub type Params = Map<String, Value>;

/// The application credentials a transport is initialized with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiCredentials {
    pub api_key: String,
    pub api_secret: String,
}

/// A response as handed back by a transport, before any JSON decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    /// JSON text.
    pub body: String,
}

/// Possible failures while talking to the API.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("invalid header {0:?}")]
    InvalidHeader(String),

    /// The API answered with a non-2xx status.
    #[error("API returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not valid JSON.
    #[error("failed to decode response body: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Performs the raw POST calls on behalf of a client.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POSTs `body` to `path`. How `options` travel on the wire is up to the
    /// implementation.
    async fn post(
        &self,
        path: &str,
        body: &Params,
        options: &Params,
    ) -> Result<RawResponse, TransportError>;
}
