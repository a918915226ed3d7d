pub mod snaps;
pub mod types;

use reqwest::Response;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::credentials::Credentials;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ApiClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error (status {status}): {detail}")]
    ApiError { status: u16, detail: String },
    #[error("request rejected: {0}")]
    Rejected(String),
    #[error("invalid API base URL: {0}")]
    BaseUrl(#[from] url::ParseError),
    #[error("deserialization error: {0}")]
    Deserialize(String),
}

// ---------------------------------------------------------------------------
// API client
// ---------------------------------------------------------------------------

pub struct SnapsApiClient {
    http_client: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl SnapsApiClient {
    pub fn new(base_url: &str, credentials: Credentials) -> Result<Self, ApiClientError> {
        // A trailing slash keeps `Url::join` from dropping the last path segment.
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self {
            http_client: reqwest::Client::new(),
            base_url: base,
            token: credentials.token,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build a full API URL from a relative path (e.g. "snaps/123/block").
    pub(crate) fn url(&self, path: &str) -> Result<Url, ApiClientError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.token {
            Some(ref token) => req.bearer_auth(token),
            None => req,
        }
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiClientError> {
        tracing::debug!(%url, "GET");
        let resp = self.authorize(self.http_client.get(url)).send().await?;
        self.handle_response(resp).await
    }

    /// POST and hand back the raw 2xx body; action endpoints do not all answer in JSON.
    pub(crate) async fn post<B: serde::Serialize>(
        &self,
        url: Url,
        body: Option<&B>,
    ) -> Result<String, ApiClientError> {
        tracing::debug!(%url, "POST");
        let mut req = self.authorize(self.http_client.post(url));
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = req.send().await?;
        self.success_body(resp).await
    }

    /// Check status and deserialize the body. An empty 2xx body is read as `null`.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: Response,
    ) -> Result<T, ApiClientError> {
        let body = self.success_body(resp).await?;
        let body = if body.trim().is_empty() { "null" } else { &body };
        serde_json::from_str::<T>(body)
            .map_err(|e| ApiClientError::Deserialize(format!("{e}: {body}")))
    }

    /// Body text of a 2xx response; anything else becomes `ApiError`.
    async fn success_body(&self, resp: Response) -> Result<String, ApiClientError> {
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiClientError::ApiError {
                status: status.as_u16(),
                detail: error_detail(&body),
            });
        }

        Ok(resp.text().await?)
    }
}

/// Pull a human-readable message out of an error body, falling back to the raw text.
fn error_detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            ["message", "detail", "error"]
                .iter()
                .find_map(|key| v.get(*key).and_then(|m| m.as_str()).map(str::to_owned))
        })
        .unwrap_or_else(|| body.trim().to_owned())
}
