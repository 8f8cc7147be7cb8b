//! Rendering: turns a grid into a complete list of draw commands.
//!
//! [`paint`] is pure. It reads the grid, zoom, device pixel ratio and the set
//! of stale cells and returns a [`Frame`]; it never mutates application
//! state. A [`Surface`] then executes the frame. Keeping the two apart lets
//! the painter be tested without a display and lets the same frame go to a
//! browser canvas ([`crate::web::WebSurface`]) or an SVG file
//! ([`crate::svg::SvgSurface`]).
//!
//! Every frame is a full repaint: transform, clear, one fill per cell in
//! row-major order, gridlines on every module boundary, then stale markers.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::collections::BTreeSet;

use crate::consts::{DARK_FILL, GRID_LINE_WIDTH, GRID_STROKE, LIGHT_FILL, STALE_LINE_WIDTH, STALE_STROKE};
use crate::grid::{Cell, GridModel};
use crate::mapper::{CanvasSize, canvas_size_for, cell_rect, module_offset, normalize_dpr};

/// Fill for a single module. Exactly two states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellFill {
    Dark,
    Light,
}

impl CellFill {
    #[must_use]
    pub fn for_value(value: u8) -> Self {
        if value == 1 { Self::Dark } else { Self::Light }
    }

    #[must_use]
    pub fn css(self) -> &'static str {
        match self {
            Self::Dark => DARK_FILL,
            Self::Light => LIGHT_FILL,
        }
    }
}

/// One drawing instruction. Coordinates are CSS pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    /// Scale so one drawing unit is one CSS pixel on the backing store.
    SetTransform { scale: f64 },
    /// Clear `[0, width) x [0, height)`.
    Clear { width: f64, height: f64 },
    /// Fill one module square.
    FillRect { x: f64, y: f64, size: f64, fill: CellFill },
    /// Gridline segment on a module boundary.
    GridLine { x0: f64, y0: f64, x1: f64, y1: f64 },
    /// Outline marking a cell whose stored value is unknown.
    StaleMarker { x: f64, y: f64, size: f64 },
}

/// A complete repaint: target size plus the commands to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub size: CanvasSize,
    pub commands: Vec<DrawCmd>,
}

/// Something that can execute draw commands.
///
/// Methods mirror the subset of `CanvasRenderingContext2d` the painter
/// needs. Only operations that can fail in the browser return `Result`.
pub trait Surface {
    type Error;

    /// Resize to `size.css` CSS pixels with a `size.backing` pixel bitmap.
    ///
    /// # Errors
    ///
    /// Implementation-defined (e.g. a rejected style property).
    fn resize(&mut self, size: CanvasSize) -> Result<(), Self::Error>;

    /// Replace the current transform with a uniform scale.
    ///
    /// # Errors
    ///
    /// Implementation-defined.
    fn set_transform(&mut self, scale: f64) -> Result<(), Self::Error>;

    fn clear_rect(&mut self, width: f64, height: f64);

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: &str);

    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), color: &str, line_width: f64);

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: &str, line_width: f64);
}

/// Build a full repaint of `grid`.
///
/// `stale` lists cells whose stored value is unknown (a toggle timed out);
/// they keep their last confirmed fill and gain an outline.
#[must_use]
pub fn paint(grid: &GridModel, zoom: u32, device_pixel_ratio: f64, stale: &BTreeSet<Cell>) -> Frame {
    let module = grid.module_count();
    let size = canvas_size_for(module, zoom, device_pixel_ratio);
    let css = f64::from(size.css);
    let z = f64::from(zoom);

    let mut commands = Vec::with_capacity(2 + module * module + 2 * (module + 1) + stale.len());
    commands.push(DrawCmd::SetTransform { scale: normalize_dpr(device_pixel_ratio) });
    commands.push(DrawCmd::Clear { width: css, height: css });

    for (cell, value) in grid.cells() {
        let rect = cell_rect(cell, zoom);
        commands.push(DrawCmd::FillRect { x: rect.x, y: rect.y, size: z, fill: CellFill::for_value(value) });
    }

    if module > 0 {
        for i in 0..=module {
            let at = module_offset(i, zoom);
            commands.push(DrawCmd::GridLine { x0: 0.0, y0: at, x1: css, y1: at });
            commands.push(DrawCmd::GridLine { x0: at, y0: 0.0, x1: at, y1: css });
        }
    }

    for &cell in stale.iter().filter(|c| c.x < module && c.y < module) {
        let rect = cell_rect(cell, zoom);
        commands.push(DrawCmd::StaleMarker { x: rect.x, y: rect.y, size: z });
    }

    Frame { size, commands }
}

/// Execute `frame` on `surface`.
///
/// # Errors
///
/// Propagates the first error from [`Surface::resize`] or
/// [`Surface::set_transform`].
pub fn draw<S: Surface>(surface: &mut S, frame: &Frame) -> Result<(), S::Error> {
    surface.resize(frame.size)?;

    for cmd in &frame.commands {
        match *cmd {
            DrawCmd::SetTransform { scale } => surface.set_transform(scale)?,
            DrawCmd::Clear { width, height } => surface.clear_rect(width, height),
            DrawCmd::FillRect { x, y, size, fill } => surface.fill_rect(x, y, size, size, fill.css()),
            DrawCmd::GridLine { x0, y0, x1, y1 } => {
                surface.stroke_line((x0, y0), (x1, y1), GRID_STROKE, GRID_LINE_WIDTH);
            }
            DrawCmd::StaleMarker { x, y, size } => {
                // Inset by half the line width so the outline stays inside the cell.
                let inset = STALE_LINE_WIDTH / 2.0;
                let side = (size - STALE_LINE_WIDTH).max(0.0);
                surface.stroke_rect(x + inset, y + inset, side, side, STALE_STROKE, STALE_LINE_WIDTH);
            }
        }
    }

    Ok(())
}
