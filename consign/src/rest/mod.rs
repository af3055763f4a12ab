pub mod endpoints;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::config::ConsignConfig;
use crate::error::{ConsignError, Result};

/// HTTP client wrapper for the marketplace admin API.
///
/// Built once per process and shared (it is cheap to clone; the underlying
/// connection pool is reference-counted).
#[derive(Debug, Clone)]
pub struct ConsignHttpClient {
    client: Client,
    base_url: String,
}

impl ConsignHttpClient {
    pub fn new(config: &ConsignConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &config.api_token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| ConsignError::Config(format!("invalid api token: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    /// GET a JSON resource.
    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(String, String)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, params = query.len(), "GET");
        let resp = self.client.get(&url).query(query).send().await?;
        let resp = Self::check(resp).await?;
        resp.json::<T>().await.map_err(ConsignError::Request)
    }

    /// Send a mutation with an optional JSON body. The response body is
    /// ignored; callers reload whatever they display.
    pub async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<()> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "mutation");
        let mut req = self.client.request(method, &url);
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = req.send().await?;
        Self::check(resp).await?;
        Ok(())
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn check(resp: Response) -> Result<Response> {
        if resp.status().is_success() {
            return Ok(resp);
        }
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        Err(ConsignError::Http {
            status,
            message: body,
        })
    }
}
