use super::error::NapsterError;
use crate::transport::Params;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// The endpoint tokens are exchanged at.
pub const TOKEN_ENDPOINT: &str = "/oauth/token";

/// The ways a client can authenticate against the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthMethod {
    /// Exchange the user's username and password directly for tokens.
    PasswordGrant,
    /// The authorization-code flow. Accepted, but not implemented.
    OAuth2,
}

impl AuthMethod {
    pub const ALL: [AuthMethod; 2] = [AuthMethod::PasswordGrant, AuthMethod::OAuth2];

    pub fn as_str(self) -> &'static str {
        match self {
            AuthMethod::PasswordGrant => "password_grant",
            AuthMethod::OAuth2 => "oauth2",
        }
    }

    fn wrong_method() -> NapsterError {
        let valid: Vec<&str> = Self::ALL.iter().map(|method| method.as_str()).collect();
        NapsterError::argument(format!(
            "Wrong authentication method. Valid methods are [{}]",
            valid.join(", ")
        ))
    }
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthMethod {
    type Err = NapsterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(Self::wrong_method)
    }
}

impl TryFrom<&Value> for AuthMethod {
    type Error = NapsterError;

    /// Only JSON strings name a method; anything else is rejected before
    /// the name itself is looked at.
    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(name) => name.parse(),
            _ => Err(NapsterError::argument(
                "Authentication method must be passed as a string identifier",
            )),
        }
    }
}

/// The form body of a password-grant token request.
pub(crate) fn password_grant_body(username: &str, password: &str) -> Params {
    Params::from_iter([
        ("response_type".to_string(), Value::from("code")),
        ("grant_type".to_string(), Value::from("password")),
        ("username".to_string(), Value::from(username)),
        ("password".to_string(), Value::from(password)),
    ])
}

/// The options sent next to the body. These are never merged into it.
pub(crate) fn password_grant_options(api_key: &str, api_secret: &str) -> Params {
    Params::from_iter([
        ("api_key".to_string(), Value::from(api_key)),
        ("api_secret".to_string(), Value::from(api_secret)),
    ])
}
