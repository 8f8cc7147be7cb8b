//! The artifact store contract.
//!
//! DESIGN
//! ======
//! The editor never talks to a concrete backend. Everything it needs (the
//! catalog, a matrix, a confirmed toggle, image URLs) goes through
//! [`ArtifactStore`], so the HTTP client and the in-memory store are
//! interchangeable and the core can be tested without a network.
//!
//! Image URLs are plain strings. The editor hands them to the host untouched
//! and never fetches or parses them.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use async_trait::async_trait;
use canvas::grid::{Cell, GridError, GridModel};
use canvas::svg::placeholder_data_url;

use super::types::{ArtifactData, ArtifactRef, ArtifactSummary};

/// Failures surfaced by an [`ArtifactStore`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The request never produced a response (connect, DNS, reset).
    #[error("request failed: {0}")]
    Transport(String),
    /// No response arrived within the request timeout.
    #[error("request timed out")]
    Timeout,
    /// The store answered with a non-success status or an `error` payload.
    #[error("{message}")]
    Rejected { status: Option<u16>, message: String },
    /// The response body did not match the contract.
    #[error("malformed response: {0}")]
    Decode(String),
    /// The returned matrix failed grid validation.
    #[error("invalid matrix: {0}")]
    Shape(#[from] GridError),
}

impl StoreError {
    #[must_use]
    pub fn rejected(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Rejected { status, message: message.into() }
    }

    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Remote (or in-memory) source of truth for artifacts.
///
/// Every method maps one store endpoint. Implementations must be safe to
/// call concurrently; the editor serializes toggles itself.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// All artifacts, including ones whose stored matrix is unreadable.
    async fn list_artifacts(&self) -> Result<Vec<ArtifactSummary>, StoreError>;

    /// The stored matrix and metadata for `id`.
    async fn load_artifact(&self, id: &str) -> Result<ArtifactData, StoreError>;

    /// Flip one stored cell and return its new authoritative value.
    async fn toggle_cell(&self, id: &str, cell: Cell) -> Result<u8, StoreError>;

    /// Overwrite the stored matrix. Returns where the store wrote it.
    async fn save_artifact(&self, id: &str, grid: &GridModel) -> Result<String, StoreError>;

    /// Export the stored matrix as a bitmap. Returns the written path.
    async fn export_png(&self, id: &str, out_name: Option<&str>) -> Result<String, StoreError>;

    /// Liveness probe.
    async fn health(&self) -> Result<(), StoreError>;

    /// Image URL of the rendered matrix at `size` pixels.
    fn thumbnail_url(&self, id: &str, size: u32) -> String;

    /// Image URL of the source bitmap at `size` pixels.
    fn original_url(&self, id: &str, size: u32) -> String;

    /// What to show in the reference panel for `artifact`: the source bitmap
    /// when one exists, otherwise the "no orig" placeholder.
    fn reference_url(&self, artifact: &ArtifactRef, size: u32) -> String {
        if artifact.original_exists {
            self.original_url(&artifact.id, size)
        } else {
            placeholder_data_url(size)
        }
    }
}
