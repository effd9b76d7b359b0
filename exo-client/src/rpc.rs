//! JSON-RPC over HTTP
//!
//! Every method of the service is a `POST` to `<base_url><path>` with
//! non-path parameters in the query string and an optional JSON body.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{Result, response_to_error};
use crate::kernel::KernelClient;
use crate::workspace::WorkspaceClient;

const JSON_MIME: &str = "application/json";

/// Bytes escaped in query keys and values: everything but ASCII
/// alphanumerics and `-_.!~*'()`, as browsers encode URI components
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Low-level transport for the workspace service
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct RpcClient {
    /// Base URL of the service (e.g., "http://localhost:4000/_exo")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl RpcClient {
    /// Create a new client with default HTTP settings
    ///
    /// # Example
    /// ```
    /// use exo_client::RpcClient;
    ///
    /// let client = RpcClient::new("http://localhost:4000/_exo/");
    /// assert_eq!(client.base_url(), "http://localhost:4000/_exo");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Create a client from a validated configuration
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self::with_client(config.base_url.clone(), builder.build()?))
    }

    /// Get the base URL of the service
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Operations that are not scoped to a workspace
    pub fn kernel(&self) -> KernelClient {
        KernelClient::new(self.clone())
    }

    /// Operations scoped to the workspace `id`
    pub fn workspace(&self, id: impl Into<String>) -> WorkspaceClient {
        WorkspaceClient::new(self.clone(), id)
    }

    /// Full URL for `path` with `query` appended
    pub fn url(&self, path: &str, query: &[(&str, &str)]) -> String {
        build_url(&self.base_url, path, query)
    }

    /// Perform one RPC and return the decoded success payload
    ///
    /// The body is sent only when `body` is `Some`. Non-2xx responses are
    /// classified by [`response_to_error`]; a 2xx response whose body is not
    /// valid JSON fails with [`ClientError::Decode`](crate::ClientError::Decode).
    pub async fn call(
        &self,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Value> {
        let url = self.url(path, query);

        let mut request = self
            .client
            .post(&url)
            .header(ACCEPT, JSON_MIME)
            .header(CONTENT_TYPE, JSON_MIME);
        if let Some(body) = body {
            request = request.body(serde_json::to_vec(body)?);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        debug!(path, status, "rpc completed");

        if let Some(err) = response_to_error(status, &text) {
            return Err(err);
        }

        Ok(serde_json::from_str(&text)?)
    }

    /// Perform one RPC and deserialize the success payload into `T`
    pub async fn invoke<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<T> {
        let value = self.call(path, query, body).await?;
        Ok(serde_json::from_value(value)?)
    }
}

/// Join `base_url`, `path` and a percent-encoded query string
///
/// Pairs keep their given order. An empty `query` adds no `?`.
pub fn build_url(base_url: &str, path: &str, query: &[(&str, &str)]) -> String {
    let mut url = format!("{}{}", base_url, path);
    let mut sep = '?';
    for (key, value) in query {
        url.push(sep);
        sep = '&';
        url.extend(utf8_percent_encode(key, COMPONENT));
        url.push('=');
        url.extend(utf8_percent_encode(value, COMPONENT));
    }
    url
}
