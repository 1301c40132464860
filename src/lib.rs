//! A small client for the Napster API.
//!
//! ```ignore
//! use napster::{AuthMethod, Client, ClientConfig};
//! use serde_json::json;
//!
//! let config = ClientConfig::new("api key", "api secret").with_user("user", "password");
//! let mut client = Client::new(config)?;
//!
//! let tokens = client.authenticate(AuthMethod::PasswordGrant).await?;
//! let me = client.post("/v2.2/me", json!({}), json!({})).await?;
//! ```

pub mod api;
pub mod storage;
pub mod transport;

pub use api::{AuthMethod, Client, ClientConfig, NapsterError, Result};
pub use transport::{ApiCredentials, HttpTransport, Params, RawResponse, Transport, TransportError};
