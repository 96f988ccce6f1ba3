// HTTP implementation of the tree-store client

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{header, Method, RequestBuilder, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::{ClientError, DeleteKind, TreeStore, WriteKind};
use crate::config::BackendSettings;

/// Client for a tree store speaking the anchored-nodes HTTP API.
///
/// Reads hit `/anchors/{anchor}/node`, queries `/anchors/{anchor}/nodes/query`,
/// writes and deletes `/anchors/{anchor}/nodes`, and list-node operations
/// `/anchors/{anchor}/list-nodes`. The path expression always travels as a
/// query parameter, never as part of the URL path.
pub struct HttpTreeStore {
    client: reqwest::Client,
    base_url: String,
    username: Option<String>,
    password: Option<String>,
}

impl HttpTreeStore {
    pub fn new(settings: &BackendSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("Failed to build tree store HTTP client")?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            username: settings.username.clone(),
            password: settings.password.clone(),
        })
    }

    fn node_url(&self, anchor: &str) -> String {
        format!("{}/anchors/{}/node", self.base_url, urlencoding::encode(anchor))
    }

    fn nodes_url(&self, anchor: &str) -> String {
        format!("{}/anchors/{}/nodes", self.base_url, urlencoding::encode(anchor))
    }

    fn query_url(&self, anchor: &str) -> String {
        format!(
            "{}/anchors/{}/nodes/query",
            self.base_url,
            urlencoding::encode(anchor)
        )
    }

    fn list_nodes_url(&self, anchor: &str) -> String {
        format!(
            "{}/anchors/{}/list-nodes",
            self.base_url,
            urlencoding::encode(anchor)
        )
    }

    fn with_auth(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.username {
            Some(username) => builder.basic_auth(username, self.password.as_deref()),
            None => builder,
        }
    }

    async fn expect_success(response: reqwest::Response) -> Result<String, ClientError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::transport(e.to_string()))?;

        if status.is_success() {
            Ok(body)
        } else {
            Err(ClientError::status(status.as_u16(), snippet(&body)))
        }
    }
}

#[async_trait]
impl TreeStore for HttpTreeStore {
    async fn read(
        &self,
        anchor: &str,
        path: &str,
        include_descendants: bool,
    ) -> Result<String, ClientError> {
        debug!(%anchor, %path, include_descendants, "fetching node");

        let request = self
            .with_auth(self.client.get(self.node_url(anchor)))
            .header(header::ACCEPT, "application/json")
            .query(&[
                ("xpath", path),
                ("include-descendants", bool_str(include_descendants)),
            ]);

        let response = request
            .send()
            .await
            .map_err(|e| ClientError::transport(e.to_string()))?;
        Self::expect_success(response).await
    }

    async fn query(
        &self,
        anchor: &str,
        path: &str,
        by_tree_path: bool,
        include_descendants: bool,
    ) -> Result<String, ClientError> {
        // The store exposes two query dialects under the same endpoint,
        // selected by parameter name
        let param = if by_tree_path { "tree-path" } else { "xpath" };
        debug!(%anchor, %path, param, "querying nodes");

        let request = self
            .with_auth(self.client.get(self.query_url(anchor)))
            .header(header::ACCEPT, "application/json")
            .query(&[
                (param, path),
                ("include-descendants", bool_str(include_descendants)),
            ]);

        let response = request
            .send()
            .await
            .map_err(|e| ClientError::transport(e.to_string()))?;
        Self::expect_success(response).await
    }

    async fn write(
        &self,
        anchor: &str,
        path: &str,
        kind: WriteKind,
        payload: &Value,
    ) -> Result<String, ClientError> {
        let (method, url) = match kind {
            WriteKind::Put => (Method::PUT, self.nodes_url(anchor)),
            WriteKind::Post => (Method::POST, self.nodes_url(anchor)),
            WriteKind::Patch => (Method::PATCH, self.nodes_url(anchor)),
            WriteKind::PostListNode => (Method::POST, self.list_nodes_url(anchor)),
        };
        debug!(%anchor, %path, ?kind, "writing node");

        let request = self
            .with_auth(self.client.request(method, url))
            .header(header::ACCEPT, "application/json")
            .query(&[("xpath", path)])
            .json(payload);

        let response = request
            .send()
            .await
            .map_err(|e| ClientError::transport(e.to_string()))?;
        Self::expect_success(response).await
    }

    async fn remove(
        &self,
        anchor: &str,
        path: &str,
        kind: DeleteKind,
    ) -> Result<(), ClientError> {
        let url = match kind {
            DeleteKind::Node => self.nodes_url(anchor),
            DeleteKind::ListNode => self.list_nodes_url(anchor),
        };
        debug!(%anchor, %path, ?kind, "deleting node");

        let request = self
            .with_auth(self.client.delete(url))
            .query(&[("xpath", path)]);

        let response = request
            .send()
            .await
            .map_err(|e| ClientError::transport(e.to_string()))?;

        // Only no-content counts as a completed delete
        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(ClientError::status(status.as_u16(), snippet(&body)))
    }
}

fn bool_str(flag: bool) -> &'static str {
    if flag {
        "true"
    } else {
        "false"
    }
}

// Error bodies get embedded in messages, so keep them short
fn snippet(body: &str) -> String {
    let trimmed = body.trim();
    let mut short: String = trimmed.chars().take(200).collect();
    if short.len() < trimmed.len() {
        short.push_str("...");
    }
    short
}
