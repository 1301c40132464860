use super::auth::{self, AuthMethod, TOKEN_ENDPOINT};
use super::config::ClientConfig;
use super::error::{NapsterError, Result};
use crate::transport::{ApiCredentials, HttpTransport, Transport, TransportError};
use serde_json::Value;
use std::fmt;
use tracing::debug;

/// A client for the Napster API.
///
/// Holds the application's credentials, the user's credentials for the
/// password grant, and whatever tokens the last authentication produced.
/// Requests go through a [`Transport`] built once, when the client is.
pub struct Client<T = HttpTransport> {
    api_key: String,
    api_secret: String,
    redirect_uri: Option<String>,
    username: Option<String>,
    password: Option<String>,
    state: Option<String>,
    auth_code: Option<String>,
    access_token: Option<String>,
    refresh_token: Option<String>,
    /// Seconds, as reported by the token endpoint.
    expires_in: Option<u64>,
    request: T,
}

impl Client<HttpTransport> {
    /// Creates a new client talking to the public Napster API.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_transport(config, HttpTransport::new)
    }
}

impl<T: Transport> Client<T> {
    /// Creates a new client whose transport is produced by `connect`.
    ///
    /// `connect` is called exactly once, and only receives the API key and
    /// secret. It is never called if either of them is missing.
    pub fn with_transport<F>(config: ClientConfig, connect: F) -> Result<Self>
    where
        F: FnOnce(ApiCredentials) -> std::result::Result<T, TransportError>,
    {
        let (api_key, api_secret) = config.credentials()?;

        let request = connect(ApiCredentials {
            api_key: api_key.clone(),
            api_secret: api_secret.clone(),
        })?;

        Ok(Self {
            api_key,
            api_secret,
            redirect_uri: config.redirect_uri,
            username: config.username,
            password: config.password,
            state: config.state,
            auth_code: config.auth_code,
            access_token: None,
            refresh_token: None,
            expires_in: None,
            request,
        })
    }

    /// POSTs to an API endpoint and decodes the JSON it answers with.
    ///
    /// `body` and `options` must both be JSON objects; pass `json!({})` for
    /// none. The decoded value is returned as-is, with no schema applied.
    pub async fn post(&self, path: &str, body: Value, options: Value) -> Result<Value> {
        if path.is_empty() {
            return Err(NapsterError::argument("path is missing"));
        }
        let Value::Object(body) = body else {
            return Err(NapsterError::argument("body should be a hash"));
        };
        let Value::Object(options) = options else {
            return Err(NapsterError::argument("options should be a hash"));
        };

        debug!(path, "forwarding request");
        let raw_response = self.request.post(path, &body, &options).await?;

        let decoded = serde_json::from_str(&raw_response.body).map_err(TransportError::from)?;
        Ok(decoded)
    }

    /// Authenticates with the given method, returning the full token response.
    pub async fn authenticate(&mut self, method: AuthMethod) -> Result<Value> {
        debug!(%method, "authenticating");

        match method {
            AuthMethod::PasswordGrant => self.auth_password_grant().await,
            // There is no authorization-code flow to dispatch to.
            AuthMethod::OAuth2 => Err(NapsterError::UnsupportedAuthMethod(method)),
        }
    }

    async fn auth_password_grant(&mut self) -> Result<Value> {
        let username = self
            .username
            .as_deref()
            .ok_or(NapsterError::MissingField("username"))?;
        let password = self
            .password
            .as_deref()
            .ok_or(NapsterError::MissingField("password"))?;

        let body = auth::password_grant_body(username, password);
        let options = auth::password_grant_options(&self.api_key, &self.api_secret);

        let response_body = self
            .post(TOKEN_ENDPOINT, Value::Object(body), Value::Object(options))
            .await?;

        // Absent or oddly typed fields simply leave the token unset.
        self.access_token = response_body
            .get("access_token")
            .and_then(Value::as_str)
            .map(str::to_string);
        self.refresh_token = response_body
            .get("refresh_token")
            .and_then(Value::as_str)
            .map(str::to_string);
        self.expires_in = response_body.get("expires_in").and_then(Value::as_u64);

        debug!(
            authenticated = self.access_token.is_some(),
            "stored password grant tokens"
        );
        Ok(response_body)
    }
}

impl<T> Client<T> {
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn api_secret(&self) -> &str {
        &self.api_secret
    }

    pub fn redirect_uri(&self) -> Option<&str> {
        self.redirect_uri.as_deref()
    }

    pub fn set_redirect_uri(&mut self, redirect_uri: Option<String>) {
        self.redirect_uri = redirect_uri;
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn set_username(&mut self, username: Option<String>) {
        self.username = username;
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn set_password(&mut self, password: Option<String>) {
        self.password = password;
    }

    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    pub fn set_state(&mut self, state: Option<String>) {
        self.state = state;
    }

    pub fn auth_code(&self) -> Option<&str> {
        self.auth_code.as_deref()
    }

    pub fn set_auth_code(&mut self, auth_code: Option<String>) {
        self.auth_code = auth_code;
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn set_access_token(&mut self, access_token: Option<String>) {
        self.access_token = access_token;
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    pub fn set_refresh_token(&mut self, refresh_token: Option<String>) {
        self.refresh_token = refresh_token;
    }

    pub fn expires_in(&self) -> Option<u64> {
        self.expires_in
    }

    pub fn set_expires_in(&mut self, expires_in: Option<u64>) {
        self.expires_in = expires_in;
    }

    /// Whether an access token is currently held. Expiry is not checked.
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }
}

impl<T> fmt::Debug for Client<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Secrets and tokens stay out of logs.
        f.debug_struct("Client")
            .field("api_key", &self.api_key)
            .field("redirect_uri", &self.redirect_uri)
            .field("username", &self.username)
            .field("authenticated", &self.is_authenticated())
            .field("expires_in", &self.expires_in)
            .finish_non_exhaustive()
    }
}
