use super::{ApiCredentials, Params, RawResponse, Transport, TransportError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Where the Napster API lives unless told otherwise.
pub const DEFAULT_API_URL: &str = "https://api.napster.com";

/// The header every request carries the application's API key in.
const API_KEY_HEADER: &str = "apikey";

/// The default transport, backed by `reqwest`.
///
/// Bodies are sent form-encoded, as the OAuth token endpoint expects, and
/// every per-call option becomes a request header.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
    credentials: ApiCredentials,
}

impl HttpTransport {
    /// Creates a transport pointed at [`DEFAULT_API_URL`].
    pub fn new(credentials: ApiCredentials) -> Result<Self, TransportError> {
        Self::with_base_url(credentials, DEFAULT_API_URL)
    }

    /// Creates a transport pointed at an arbitrary API root.
    pub fn with_base_url(
        credentials: ApiCredentials,
        base_url: &str,
    ) -> Result<Self, TransportError> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("napster-rs/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    /// The API root requests are sent to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The credentials this transport was created with.
    pub fn credentials(&self) -> &ApiCredentials {
        &self.credentials
    }

    fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        let root = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{root}/{path}"))?)
    }

    fn headers(&self, options: &Params) -> Result<HeaderMap, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            API_KEY_HEADER,
            HeaderValue::from_str(&self.credentials.api_key)
                .map_err(|_| TransportError::InvalidHeader(API_KEY_HEADER.to_string()))?,
        );

        for (name, value) in options {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| TransportError::InvalidHeader(name.clone()))?;
            let header_value = HeaderValue::from_str(&param_text(value))
                .map_err(|_| TransportError::InvalidHeader(name.clone()))?;
            headers.insert(header_name, header_value);
        }

        Ok(headers)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(
        &self,
        path: &str,
        body: &Params,
        options: &Params,
    ) -> Result<RawResponse, TransportError> {
        let url = self.endpoint(path)?;
        debug!(url = %url, "POST");

        let form: Vec<(&str, String)> = body
            .iter()
            .map(|(key, value)| (key.as_str(), param_text(value)))
            .collect();

        let request = self
            .client
            .request(Method::POST, url)
            .headers(self.headers(options)?)
            .form(&form)
            .build()?;

        let result = self.client.execute(request).await?;
        let status = result.status();
        let body = result.text().await?;

        // Anything outside of 2xx is surfaced as-is for the caller to inspect.
        if !status.is_success() {
            debug!(status = status.as_u16(), "request was not successful");
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(RawResponse {
            status: status.as_u16(),
            body,
        })
    }
}

/// Renders a parameter the way it goes on the wire.
/// Strings are sent bare, everything else as its JSON text.
fn param_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn credentials() -> ApiCredentials {
        ApiCredentials {
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
        }
    }

    #[test]
    fn defaults_to_napster_api() {
        let transport = HttpTransport::new(credentials()).unwrap();
        assert_eq!(transport.base_url().as_str(), "https://api.napster.com/");
        assert_eq!(transport.credentials(), &credentials());
    }

    #[test]
    fn rejects_invalid_base_url() {
        let result = HttpTransport::with_base_url(credentials(), "not a url");
        assert!(matches!(result, Err(TransportError::InvalidUrl(_))));
    }

    #[test]
    fn joins_paths_with_a_single_slash() {
        let transport =
            HttpTransport::with_base_url(credentials(), "http://localhost:8080/v2/").unwrap();
        assert_eq!(
            transport.endpoint("/oauth/token").unwrap().as_str(),
            "http://localhost:8080/v2/oauth/token"
        );
        assert_eq!(
            transport.endpoint("me/library").unwrap().as_str(),
            "http://localhost:8080/v2/me/library"
        );
    }

    #[test]
    fn options_become_headers() {
        let transport = HttpTransport::new(credentials()).unwrap();
        let mut options = Params::new();
        options.insert("api_secret".to_string(), json!("secret"));
        options.insert("x-limit".to_string(), json!(5));

        let headers = transport.headers(&options).unwrap();
        assert_eq!(headers["apikey"], "key");
        assert_eq!(headers["api_secret"], "secret");
        assert_eq!(headers["x-limit"], "5");
    }

    #[test]
    fn rejects_unusable_header_names() {
        let transport = HttpTransport::new(credentials()).unwrap();
        let mut options = Params::new();
        options.insert("bad header".to_string(), json!("x"));

        assert!(matches!(
            transport.headers(&options),
            Err(TransportError::InvalidHeader(name)) if name == "bad header"
        ));
    }

    #[test]
    fn renders_params_as_text() {
        assert_eq!(param_text(&json!("code")), "code");
        assert_eq!(param_text(&json!(3600)), "3600");
        assert_eq!(param_text(&json!(true)), "true");
        assert_eq!(param_text(&Value::Null), "");
        assert_eq!(param_text(&json!({"a": 1})), r#"{"a":1}"#);
    }
}
