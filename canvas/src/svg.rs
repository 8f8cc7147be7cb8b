//! SVG output: a [`Surface`] that builds an SVG document, plus the
//! decorative placeholder shown when an artifact has no original bitmap.
//!
//! SVG is resolution independent, so the device pixel ratio in a frame only
//! affects the recorded backing size, not the geometry written out.

#[cfg(test)]
#[path = "svg_test.rs"]
mod svg_test;

use std::convert::Infallible;

use crate::mapper::CanvasSize;
use crate::render::Surface;

/// Surface that accumulates SVG elements.
#[derive(Debug, Default)]
pub struct SvgSurface {
    size: CanvasSize,
    scale: f64,
    body: Vec<String>,
}

impl SvgSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Size set by the last frame.
    #[must_use]
    pub fn size(&self) -> CanvasSize {
        self.size
    }

    /// Scale set by the last frame's transform.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Serialize the current drawing as a standalone SVG document.
    #[must_use]
    pub fn to_document(&self) -> String {
        let side = self.size.css;
        let mut out = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{side}\" height=\"{side}\" \
             viewBox=\"0 0 {side} {side}\" shape-rendering=\"crispEdges\">\n"
        );
        for element in &self.body {
            out.push_str("  ");
            out.push_str(element);
            out.push('\n');
        }
        out.push_str("</svg>\n");
        out
    }
}

impl Surface for SvgSurface {
    type Error = Infallible;

    fn resize(&mut self, size: CanvasSize) -> Result<(), Infallible> {
        self.size = size;
        Ok(())
    }

    fn set_transform(&mut self, scale: f64) -> Result<(), Infallible> {
        self.scale = scale;
        Ok(())
    }

    fn clear_rect(&mut self, _width: f64, _height: f64) {
        // Frames always clear the whole canvas, so earlier elements are gone.
        self.body.clear();
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: &str) {
        self.body.push(format!(
            "<rect x=\"{x}\" y=\"{y}\" width=\"{width}\" height=\"{height}\" fill=\"{color}\"/>"
        ));
    }

    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), color: &str, line_width: f64) {
        self.body.push(format!(
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{color}\" stroke-width=\"{line_width}\"/>",
            from.0, from.1, to.0, to.1
        ));
    }

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: &str, line_width: f64) {
        self.body.push(format!(
            "<rect x=\"{x}\" y=\"{y}\" width=\"{width}\" height=\"{height}\" fill=\"none\" \
             stroke=\"{color}\" stroke-width=\"{line_width}\"/>"
        ));
    }
}

/// Square "no orig" graphic shown instead of a missing original bitmap.
#[must_use]
pub fn placeholder_svg(size: u32) -> String {
    format!(
        "<svg xmlns='http://www.w3.org/2000/svg' width='{size}' height='{size}'>\
         <rect width='100%' height='100%' fill='#fff'/>\
         <text x='50%' y='50%' dominant-baseline='middle' text-anchor='middle' \
         font-size='12' fill='#999'>no orig</text></svg>"
    )
}

/// [`placeholder_svg`] as an inline `data:` URL usable as an image source.
#[must_use]
pub fn placeholder_data_url(size: u32) -> String {
    format!("data:image/svg+xml;utf8,{}", urlencoding::encode(&placeholder_svg(size)))
}
