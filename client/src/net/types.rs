//! Wire DTOs for the artifact store's HTTP contract.
//!
//! DESIGN
//! ======
//! Field names follow the store's JSON (`json`, `gx`, `gy`, `vector`), and
//! the Rust-side names follow the editor's vocabulary. Matrix cells are
//! accepted as integers, integral floats or booleans, since stores written
//! in array-oriented tooling emit all three.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use canvas::grid::{GridError, GridModel};
use serde::{Deserialize, Deserializer, Serialize};

/// Catalog entry returned by the list endpoint.
///
/// Entries whose stored JSON could not be read come back with `module`,
/// `width` and `height` set to `null`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactSummary {
    /// Artifact id (the stored file name).
    #[serde(rename = "json")]
    pub id: String,
    #[serde(default)]
    pub module: Option<usize>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    /// Whether a reference bitmap exists for comparison.
    #[serde(default)]
    pub original_exists: bool,
    #[serde(default)]
    pub original_name: Option<String>,
    #[serde(default)]
    pub stem: Option<String>,
}

impl ArtifactSummary {
    #[must_use]
    pub fn artifact_ref(&self) -> ArtifactRef {
        ArtifactRef { id: self.id.clone(), original_exists: self.original_exists }
    }
}

/// The identity of a selectable artifact.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactRef {
    pub id: String,
    pub original_exists: bool,
}

/// A loaded artifact: the module matrix plus source bitmap size.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactData {
    #[serde(deserialize_with = "deserialize_rows")]
    pub vector: Vec<Vec<u8>>,
    pub module: usize,
    pub width: u32,
    pub height: u32,
    /// Source bitmap file name, when the store records one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl ArtifactData {
    /// Validate into a [`GridModel`].
    ///
    /// # Errors
    ///
    /// Returns the grid's shape or value error for a malformed matrix.
    pub fn to_grid(&self) -> Result<GridModel, GridError> {
        GridModel::from_rows(&self.vector, self.module, self.width, self.height)
    }
}

/// Body of `GET /api/load`: either an artifact or an error payload.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LoadResponse {
    Error { error: String },
    Artifact(ArtifactData),
}

/// Body of `POST /api/toggle`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ToggleRequest<'a> {
    pub file: &'a str,
    pub gx: usize,
    pub gy: usize,
}

/// Response of `POST /api/toggle`. `value` is the new authoritative cell value.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ToggleResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub value: Option<u8>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Body of `POST /api/save`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SaveRequest<'a> {
    pub file: &'a str,
    pub vector: Vec<Vec<u8>>,
    pub module: usize,
    pub width: u32,
    pub height: u32,
}

impl<'a> SaveRequest<'a> {
    #[must_use]
    pub fn from_grid(file: &'a str, grid: &GridModel) -> Self {
        Self {
            file,
            vector: grid.to_rows(),
            module: grid.module_count(),
            width: grid.width_px(),
            height: grid.height_px(),
        }
    }
}

/// Body of `POST /api/export_png`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExportRequest<'a> {
    pub file: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_name: Option<&'a str>,
}

/// Response of the save and export endpoints. `saved` is the written path.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SavedResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub saved: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Generic error payload (`{"error": "..."}`) used by every endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

fn deserialize_rows<'de, D>(deserializer: D) -> Result<Vec<Vec<u8>>, D::Error>
where
    D: Deserializer<'de>,
{
    let rows = Vec::<Vec<serde_json::Value>>::deserialize(deserializer)?;
    rows.into_iter()
        .map(|row| row.into_iter().map(cell_from_value::<D::Error>).collect())
        .collect()
}

fn cell_from_value<E: serde::de::Error>(value: serde_json::Value) -> Result<u8, E> {
    match value {
        serde_json::Value::Bool(b) => Ok(u8::from(b)),
        serde_json::Value::Number(number) => {
            if let Some(int) = number.as_u64() {
                return u8::try_from(int).map_err(|_| E::custom(format!("cell value {int} out of range")));
            }
            if let Some(float) = number.as_f64()
                && float.is_finite()
                && float.fract() == 0.0
                && (0.0..=255.0).contains(&float)
            {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                return Ok(float as u8);
            }
            Err(E::custom(format!("expected integer cell value, got {number}")))
        }
        other => Err(E::custom(format!("expected number cell value, got {other}"))),
    }
}
