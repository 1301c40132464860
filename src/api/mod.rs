mod auth;
mod client;
mod config;
mod error;

pub use auth::{AuthMethod, TOKEN_ENDPOINT};
pub use client::Client;
pub use config::ClientConfig;
pub use error::{NapsterError, Result};
