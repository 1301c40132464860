use super::AuthMethod;
use crate::transport::TransportError;
use thiserror::Error;

/// Possible error types while working with the Napster API.
#[derive(Error, Debug)]
pub enum NapsterError {
    /// A mandatory credential was absent when building a client.
    #[error("{0}")]
    Configuration(String),

    /// A call was made with malformed arguments. Nothing was sent.
    #[error("{0}")]
    Argument(String),

    /// A field the requested flow depends on has not been set on the client.
    #[error("The client is missing {0}")]
    MissingField(&'static str),

    /// The authentication method is recognized, but has no flow behind it.
    #[error("Authentication method {0} is not implemented")]
    UnsupportedAuthMethod(AuthMethod),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl NapsterError {
    pub(crate) fn argument(message: impl Into<String>) -> Self {
        Self::Argument(message.into())
    }
}

/// Result type for Napster client operations.
pub type Result<T> = std::result::Result<T, NapsterError>;
