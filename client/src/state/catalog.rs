//! Artifact catalog shown in the picker.

use crate::net::types::ArtifactSummary;

/// Image URLs for one picker entry: the source bitmap (or the "no orig"
/// placeholder) next to the store's rendering of the matrix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogThumbs {
    pub id: String,
    pub original: String,
    pub rendered: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CatalogState {
    pub items: Vec<ArtifactSummary>,
    pub loading: bool,
    pub error: Option<String>,
}

impl CatalogState {
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&ArtifactSummary> {
        self.items.iter().find(|item| item.id == id)
    }
}
