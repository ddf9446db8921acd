//! HTTP transport speaking the areal server's REST API.
//!
//! Enable with the `http` feature.

use crate::error::{ClientError, Result};
use crate::session::WindowLoader;
use areal_types::{FeatureCollection, QueryKey};

/// Loader that resolves window queries against a running areal server.
#[derive(Debug, Clone)]
pub struct HttpLoader {
    base_url: String,
    client: reqwest::Client,
}

impl HttpLoader {
    /// Point the loader at a server, e.g. `http://localhost:3001`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }
}

impl WindowLoader for HttpLoader {
    async fn load(&self, key: &QueryKey) -> Result<FeatureCollection> {
        let url = format!("{}/api/features/{}", self.base_url, key.dataset());
        let mut request = self
            .client
            .get(url)
            .query(&[("bbox", key.bounds().to_string())]);
        if let Some(within) = key.within() {
            request = request.query(&[("within", within)]);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ClientError::Server(format!("{status}: {body}")));
        }
        serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
    }
}
