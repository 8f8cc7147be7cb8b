//! View state: zoom, device pixel ratio and reference panel width.
//!
//! Survives artifact switches. Only `selected` changes when another
//! artifact loads.

#[cfg(test)]
#[path = "view_test.rs"]
mod view_test;

use canvas::consts::{ZOOM_DEFAULT, ZOOM_MAX, ZOOM_MIN};
use canvas::mapper::{normalize_dpr, reference_display_size};

use crate::net::types::ArtifactRef;

#[derive(Clone, Debug, PartialEq)]
pub struct ViewState {
    zoom: u32,
    device_pixel_ratio: f64,
    panel_width: f64,
    selected: Option<ArtifactRef>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self { zoom: ZOOM_DEFAULT, device_pixel_ratio: 1.0, panel_width: 0.0, selected: None }
    }
}

impl ViewState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pixels per module.
    #[must_use]
    pub fn zoom(&self) -> u32 {
        self.zoom
    }

    /// Set the zoom, clamped to `[ZOOM_MIN, ZOOM_MAX]`. Returns the value
    /// actually applied.
    pub fn set_zoom(&mut self, zoom: u32) -> u32 {
        self.zoom = zoom.clamp(ZOOM_MIN, ZOOM_MAX);
        self.zoom
    }

    #[must_use]
    pub fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    /// Non-finite or non-positive ratios are stored as `1.0`.
    pub fn set_device_pixel_ratio(&mut self, device_pixel_ratio: f64) -> f64 {
        self.device_pixel_ratio = normalize_dpr(device_pixel_ratio);
        self.device_pixel_ratio
    }

    #[must_use]
    pub fn panel_width(&self) -> f64 {
        self.panel_width
    }

    /// Negative or non-finite widths are stored as `0.0`.
    pub fn set_panel_width(&mut self, panel_width: f64) {
        self.panel_width = if panel_width.is_finite() && panel_width > 0.0 { panel_width } else { 0.0 };
    }

    /// Pixel size of the reference image for the current panel width.
    #[must_use]
    pub fn reference_size(&self) -> u32 {
        reference_display_size(self.panel_width)
    }

    #[must_use]
    pub fn selected(&self) -> Option<&ArtifactRef> {
        self.selected.as_ref()
    }

    pub fn select(&mut self, artifact: ArtifactRef) {
        self.selected = Some(artifact);
    }

    /// Update `original_exists` for the selected artifact. Returns whether
    /// anything changed.
    pub fn refresh_original_exists(&mut self, id: &str, original_exists: bool) -> bool {
        match self.selected.as_mut() {
            Some(selected) if selected.id == id && selected.original_exists != original_exists => {
                selected.original_exists = original_exists;
                true
            }
            _ => false,
        }
    }
}
