//! Shared numeric and color constants for the canvas crate.

// ── Cell fills ──────────────────────────────────────────────────

/// Fill for a dark module (value 1).
pub const DARK_FILL: &str = "#000";

/// Fill for a light module (value 0).
pub const LIGHT_FILL: &str = "#fff";

// ── Gridlines ───────────────────────────────────────────────────

/// Low-opacity stroke so gridlines read as a grid without hiding fills.
pub const GRID_STROKE: &str = "rgba(0,0,0,0.12)";

/// Gridline width in CSS pixels.
pub const GRID_LINE_WIDTH: f64 = 1.0;

// ── Stale cells ─────────────────────────────────────────────────

/// Outline color for cells whose stored value is unknown.
pub const STALE_STROKE: &str = "#d97706";

/// Stale outline width in CSS pixels.
pub const STALE_LINE_WIDTH: f64 = 2.0;

// ── Zoom ────────────────────────────────────────────────────────

/// Smallest rendered module size in CSS pixels.
pub const ZOOM_MIN: u32 = 1;

/// Largest rendered module size in CSS pixels.
pub const ZOOM_MAX: u32 = 64;

/// Module size used until the user moves the zoom slider.
pub const ZOOM_DEFAULT: u32 = 12;

// ── Reference image ─────────────────────────────────────────────

/// Smallest pixel size requested for the large reference image.
pub const REFERENCE_MIN_PX: u32 = 256;

/// Horizontal padding subtracted from the reference panel width.
pub const REFERENCE_PANEL_PADDING_PX: f64 = 24.0;

// ── Catalog ─────────────────────────────────────────────────────

/// Pixel size of the two thumbnails shown per picker entry.
pub const THUMBNAIL_PX: u32 = 96;
