//! HTTP implementation of [`ArtifactStore`].
//!
//! ENDPOINTS
//! =========
//! | Operation | Request |
//! |-----------|---------|
//! | list | `GET /api/list` |
//! | load | `GET /api/load?file=<id>` |
//! | toggle | `POST /api/toggle {file, gx, gy}` |
//! | save | `POST /api/save {file, vector, module, width, height}` |
//! | export | `POST /api/export_png {file, out_name?}` |
//! | health | `GET /health` |
//! | images | `/api/render?file=&size=`, `/api/original?file=&size=` |
//!
//! ERROR HANDLING
//! ==============
//! A non-success status or an `{"error": ...}` body becomes
//! [`StoreError::Rejected`] carrying the store's message. Connection failures
//! become `Transport`, client-side timeouts `Timeout`, and bodies that do not
//! match the contract `Decode`.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use async_trait::async_trait;
use canvas::grid::{Cell, GridModel};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::store::{ArtifactStore, StoreError};
use super::types::{
    ArtifactData, ArtifactSummary, ErrorBody, ExportRequest, LoadResponse, SaveRequest, SavedResponse, ToggleRequest,
    ToggleResponse,
};
use crate::config::StoreConfig;

/// Artifact store reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpArtifactStore {
    http: reqwest::Client,
    base_url: String,
}

impl HttpArtifactStore {
    /// Build a client with the configured base URL and timeouts.
    ///
    /// # Errors
    ///
    /// `Transport` if the HTTP client cannot be constructed.
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| StoreError::Transport(format!("http client build failed: {e}")))?;
        Ok(Self { http, base_url: config.base_url().to_owned() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn file_endpoint(&self, path: &str, id: &str) -> String {
        format!("{}{path}?file={}", self.base_url, urlencoding::encode(id))
    }

    fn image_endpoint(&self, path: &str, id: &str, size: u32) -> String {
        format!("{}&size={size}", self.file_endpoint(path, id))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, StoreError> {
        debug!(%url, "store GET");
        let response = self.http.get(url).send().await?;
        read_json(response).await
    }

    async fn post_json<B, T>(&self, url: &str, body: &B) -> Result<T, StoreError>
    where
        B: serde::Serialize + Sync,
        T: DeserializeOwned,
    {
        debug!(%url, "store POST");
        let response = self.http.post(url).json(body).send().await?;
        read_json(response).await
    }
}

/// Read a JSON body, turning non-success statuses into `Rejected`.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, StoreError> {
    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        return Err(rejection(status.as_u16(), &text));
    }
    Ok(serde_json::from_str(&text)?)
}

fn rejection(status: u16, body: &str) -> StoreError {
    let message = match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.error,
        Err(_) if body.trim().is_empty() => format!("HTTP {status}"),
        Err(_) => format!("HTTP {status}: {}", body.trim()),
    };
    StoreError::rejected(Some(status), message)
}

fn saved_path(response: SavedResponse, what: &str) -> Result<String, StoreError> {
    if let Some(error) = response.error {
        return Err(StoreError::rejected(None, error));
    }
    match (response.ok, response.saved) {
        (true, Some(saved)) => Ok(saved),
        _ => Err(StoreError::Decode(format!("{what} response missing `saved`"))),
    }
}

#[async_trait]
impl ArtifactStore for HttpArtifactStore {
    async fn list_artifacts(&self) -> Result<Vec<ArtifactSummary>, StoreError> {
        self.get_json(&self.endpoint("/api/list")).await
    }

    async fn load_artifact(&self, id: &str) -> Result<ArtifactData, StoreError> {
        match self.get_json(&self.file_endpoint("/api/load", id)).await? {
            LoadResponse::Artifact(data) => Ok(data),
            LoadResponse::Error { error } => Err(StoreError::rejected(None, error)),
        }
    }

    async fn toggle_cell(&self, id: &str, cell: Cell) -> Result<u8, StoreError> {
        let body = ToggleRequest { file: id, gx: cell.x, gy: cell.y };
        let response: ToggleResponse = self.post_json(&self.endpoint("/api/toggle"), &body).await?;
        if let Some(error) = response.error {
            return Err(StoreError::rejected(None, error));
        }
        match (response.ok, response.value) {
            (true, Some(value)) => Ok(value),
            _ => Err(StoreError::Decode("toggle response missing `value`".to_owned())),
        }
    }

    async fn save_artifact(&self, id: &str, grid: &GridModel) -> Result<String, StoreError> {
        let body = SaveRequest::from_grid(id, grid);
        let response: SavedResponse = self.post_json(&self.endpoint("/api/save"), &body).await?;
        saved_path(response, "save")
    }

    async fn export_png(&self, id: &str, out_name: Option<&str>) -> Result<String, StoreError> {
        let body = ExportRequest { file: id, out_name };
        let response: SavedResponse = self.post_json(&self.endpoint("/api/export_png"), &body).await?;
        saved_path(response, "export")
    }

    async fn health(&self) -> Result<(), StoreError> {
        #[derive(serde::Deserialize)]
        struct Health {
            #[serde(default)]
            ok: bool,
        }
        let health: Health = self.get_json(&self.endpoint("/health")).await?;
        if health.ok { Ok(()) } else { Err(StoreError::rejected(None, "store reported unhealthy")) }
    }

    fn thumbnail_url(&self, id: &str, size: u32) -> String {
        self.image_endpoint("/api/render", id, size)
    }

    fn original_url(&self, id: &str, size: u32) -> String {
        self.image_endpoint("/api/original", id, size)
    }
}
