// src/services/api_client.rs
use reqwest::{Method, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    errors::{TawsilError as AppError, TawsilResult},
    state::ClientConfig,
    utils::decode::{decode_each, Decoded},
};

/// Bearer-token JSON client for the backend REST API.
///
/// Every path is relative to `{backend_url}/api`. The token is owned by the
/// [`Session`](crate::services::session::Session) and mirrored here so each
/// request can attach it.
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> TawsilResult<Self> {
        let base_url = config.api_base();
        reqwest::Url::parse(&base_url).map_err(|e| AppError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::ConfigurationError(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            token: RwLock::new(None),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn set_token(&self, token: Option<String>) {
        *self.token.write().await = token;
    }

    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    pub async fn has_token(&self) -> bool {
        self.token.read().await.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> TawsilResult<T> {
        let builder = self.client.get(self.url(path));
        self.send(Method::GET, path, builder).await
    }

    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> TawsilResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let builder = self.client.get(self.url(path)).query(query);
        self.send(Method::GET, path, builder).await
    }

    /// GET a list, decoding each element on its own and skipping malformed ones
    pub async fn get_list<T: DeserializeOwned>(&self, path: &str, what: &str) -> TawsilResult<Vec<T>> {
        let value: serde_json::Value = self.get(path).await?;
        let Decoded { items, skipped } = decode_each(value, what)?;
        if skipped > 0 {
            tracing::warn!("{} {} entries from {} could not be read", skipped, what, path);
        }
        Ok(items)
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> TawsilResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let builder = self.client.post(self.url(path)).json(body);
        self.send(Method::POST, path, builder).await
    }

    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> TawsilResult<T> {
        let builder = self.client.post(self.url(path));
        self.send(Method::POST, path, builder).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> TawsilResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let builder = self.client.put(self.url(path)).json(body);
        self.send(Method::PUT, path, builder).await
    }

    pub async fn put_empty<T: DeserializeOwned>(&self, path: &str) -> TawsilResult<T> {
        let builder = self.client.put(self.url(path));
        self.send(Method::PUT, path, builder).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> TawsilResult<T> {
        let builder = self.client.delete(self.url(path));
        self.send(Method::DELETE, path, builder).await
    }

    async fn send<T: DeserializeOwned>(&self, method: Method, path: &str, builder: RequestBuilder) -> TawsilResult<T> {
        let request_id = Uuid::new_v4().to_string();
        let mut builder = builder.header("X-Request-Id", &request_id);
        if let Some(token) = self.token.read().await.as_deref() {
            builder = builder.bearer_auth(token);
        }

        tracing::debug!(%request_id, "{} {}", method, path);

        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = AppError::from_response(status.as_u16(), &body);
            tracing::warn!(%request_id, "{} {} failed with {}: {}", method, path, status, error);
            return Err(error);
        }

        let bytes = response.bytes().await?;
        let parsed = if bytes.is_empty() {
            serde_json::from_slice(b"null")
        } else {
            serde_json::from_slice(&bytes)
        };

        parsed.map_err(|e| {
            tracing::error!(%request_id, "{} {} returned an unreadable body: {}", method, path, e);
            AppError::from(e)
        })
    }
}
