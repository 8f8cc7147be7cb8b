//! Coordinate mapping between pointer positions and grid cells.
//!
//! Two coordinate spaces matter here:
//!
//! - **CSS space**: what layout and pointer events use. One module is `zoom`
//!   CSS pixels wide, so the grid occupies `module * zoom` CSS pixels.
//! - **Backing store**: the canvas bitmap, `floor(css * dpr)` device pixels.
//!
//! Hit-testing always happens in CSS space. The backing-store size only
//! controls sharpness; mixing the two up blurs or misaligns the grid on
//! high-density displays.

#[cfg(test)]
#[path = "mapper_test.rs"]
mod mapper_test;

use crate::consts::{REFERENCE_MIN_PX, REFERENCE_PANEL_PADDING_PX};
use crate::grid::Cell;

/// Axis-aligned rectangle in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Square canvas dimensions for a grid at a given zoom and DPR.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CanvasSize {
    /// Side length in CSS pixels (`module * zoom`).
    pub css: u32,
    /// Side length of the backing bitmap (`floor(css * dpr)`).
    pub backing: u32,
}

/// Map a CSS-space point to the cell under it.
///
/// Returns `None` when the point is outside the half-open square
/// `[0, module * zoom)` on either axis, and for a zero zoom or empty grid.
#[must_use]
pub fn cell_from_point(px: f64, py: f64, zoom: u32, module_count: usize) -> Option<Cell> {
    if zoom == 0 || module_count == 0 {
        return None;
    }
    let zoom = f64::from(zoom);
    let extent = extent_css(module_count, zoom);

    // Written as positive range checks so NaN falls out as "outside".
    let inside = |v: f64| (0.0..extent).contains(&v);
    if !inside(px) || !inside(py) {
        return None;
    }

    let last = module_count - 1;
    Some(Cell::new(floor_index(px / zoom).min(last), floor_index(py / zoom).min(last)))
}

/// CSS offset of module boundary `index` (`index * zoom`).
#[must_use]
pub fn module_offset(index: usize, zoom: u32) -> f64 {
    index_to_f64(index) * f64::from(zoom)
}

/// The CSS-space rectangle covered by `cell`.
#[must_use]
pub fn cell_rect(cell: Cell, zoom: u32) -> Rect {
    Rect {
        x: module_offset(cell.x, zoom),
        y: module_offset(cell.y, zoom),
        width: f64::from(zoom),
        height: f64::from(zoom),
    }
}

/// CSS and backing-store side lengths for the grid canvas.
#[must_use]
pub fn canvas_size_for(module_count: usize, zoom: u32, device_pixel_ratio: f64) -> CanvasSize {
    let module = u32::try_from(module_count).unwrap_or(u32::MAX);
    let css = module.saturating_mul(zoom);
    let backing = f64::from(css) * normalize_dpr(device_pixel_ratio);
    CanvasSize { css, backing: saturating_u32(backing.floor()) }
}

/// Coerce a reported device pixel ratio into a usable scale factor.
///
/// Browsers occasionally report `0` or `NaN` while a window moves between
/// displays; those fall back to `1.0`.
#[must_use]
pub fn normalize_dpr(device_pixel_ratio: f64) -> f64 {
    if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
        device_pixel_ratio
    } else {
        1.0
    }
}

/// Pixel size to request for the large reference image, given the CSS
/// width of the panel that shows it.
#[must_use]
pub fn reference_display_size(panel_width: f64) -> u32 {
    let available = saturating_u32((panel_width - REFERENCE_PANEL_PADDING_PX).floor());
    available.max(REFERENCE_MIN_PX)
}

fn extent_css(module_count: usize, zoom: f64) -> f64 {
    index_to_f64(module_count) * zoom
}

#[allow(clippy::cast_precision_loss)]
fn index_to_f64(v: usize) -> f64 {
    v as f64
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn floor_index(v: f64) -> usize {
    v.floor() as usize
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn saturating_u32(v: f64) -> u32 {
    // `as` saturates: negatives and NaN become 0, overflow becomes u32::MAX.
    v as u32
}
