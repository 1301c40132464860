use super::error::{NapsterError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Everything a [`Client`](super::Client) can be constructed with.
///
/// `api_key` and `api_secret` are optional here only so that their absence can
/// be reported when the client is built; a client never exists without them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub redirect_uri: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub state: Option<String>,
    pub auth_code: Option<String>,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            api_secret: Some(api_secret.into()),
            ..Self::default()
        }
    }

    /// Sets the resource owner used by the password grant.
    pub fn with_user(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(redirect_uri.into());
        self
    }

    /// Reads a configuration map such as `{"api_key": "...", "api_secret": "..."}`.
    /// Keys outside of the known set are rejected.
    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(NapsterError::Configuration(
                "The client configuration should be a map".to_string(),
            ));
        }

        serde_json::from_value(value).map_err(|err| {
            NapsterError::Configuration(format!("Invalid client configuration: {err}"))
        })
    }

    /// Both credentials, or an error naming the first one missing.
    /// Empty strings count as missing.
    pub(crate) fn credentials(&self) -> Result<(String, String)> {
        let api_key = present(&self.api_key).ok_or_else(|| {
            NapsterError::Configuration("The client is missing api_key".to_string())
        })?;
        let api_secret = present(&self.api_secret).ok_or_else(|| {
            NapsterError::Configuration("The client is missing api_secret".to_string())
        })?;
        Ok((api_key.to_string(), api_secret.to_string()))
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_a_full_configuration_map() {
        let config = ClientConfig::from_value(json!({
            "api_key": "k",
            "api_secret": "s",
            "redirect_uri": "https://example.com/callback",
            "username": "u",
            "password": "p",
            "state": "xyz",
            "auth_code": "code",
        }))
        .unwrap();

        assert_eq!(config.api_key.as_deref(), Some("k"));
        assert_eq!(config.api_secret.as_deref(), Some("s"));
        assert_eq!(config.redirect_uri.as_deref(), Some("https://example.com/callback"));
        assert_eq!(config.username.as_deref(), Some("u"));
        assert_eq!(config.password.as_deref(), Some("p"));
        assert_eq!(config.state.as_deref(), Some("xyz"));
        assert_eq!(config.auth_code.as_deref(), Some("code"));
    }

    #[test]
    fn optional_fields_may_be_omitted() {
        let config = ClientConfig::from_value(json!({"api_key": "k"})).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("k"));
        assert!(config.api_secret.is_none());
        assert!(config.username.is_none());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = ClientConfig::from_value(json!({
            "api_key": "k",
            "api_secret": "s",
            "favourite_artist": "Prince",
        }));

        match result {
            Err(NapsterError::Configuration(message)) => {
                assert!(message.contains("favourite_artist"));
            }
            other => panic!("Expected Configuration error, got {other:?}"),
        }
    }

    #[test]
    fn non_map_configuration_is_rejected() {
        assert!(matches!(
            ClientConfig::from_value(json!(["k", "s"])),
            Err(NapsterError::Configuration(_))
        ));
    }

    #[test]
    fn api_key_is_reported_before_api_secret() {
        let err = ClientConfig::default().credentials().unwrap_err();
        assert_eq!(err.to_string(), "The client is missing api_key");

        let config = ClientConfig {
            api_key: Some("k".to_string()),
            ..ClientConfig::default()
        };
        let err = config.credentials().unwrap_err();
        assert_eq!(err.to_string(), "The client is missing api_secret");
    }

    #[test]
    fn empty_credentials_count_as_missing() {
        let err = ClientConfig::new("", "s").credentials().unwrap_err();
        assert_eq!(err.to_string(), "The client is missing api_key");

        let err = ClientConfig::new("k", "").credentials().unwrap_err();
        assert_eq!(err.to_string(), "The client is missing api_secret");
    }

    #[test]
    fn builders_fill_optional_fields() {
        let config = ClientConfig::new("k", "s")
            .with_user("u", "p")
            .with_redirect_uri("https://example.com/callback");

        assert_eq!(config.username.as_deref(), Some("u"));
        assert_eq!(config.password.as_deref(), Some("p"));
        assert_eq!(config.redirect_uri.as_deref(), Some("https://example.com/callback"));
    }
}
