//! Browser surface: executes frames on an `HtmlCanvasElement`.
//!
//! This is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! The element's style size is set in CSS pixels and its `width`/`height`
//! attributes to the backing-store size, so hit-testing stays in CSS space
//! while the bitmap stays sharp on high-density displays.
//!
//! All fallible `Canvas2D` calls propagate errors as `JsValue`.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::mapper::{CanvasSize, normalize_dpr};
use crate::render::Surface;

/// A `<canvas>` element and its 2D context.
pub struct WebSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl WebSurface {
    /// Bind to `canvas`, acquiring its 2D context.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the element has no 2D context.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, ctx })
    }

    #[must_use]
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

/// The window's current device pixel ratio, or `1.0` outside a browser.
#[must_use]
pub fn current_device_pixel_ratio() -> f64 {
    web_sys::window().map_or(1.0, |w| normalize_dpr(w.device_pixel_ratio()))
}

impl Surface for WebSurface {
    type Error = JsValue;

    fn resize(&mut self, size: CanvasSize) -> Result<(), JsValue> {
        let style = self.canvas.style();
        style.set_property("width", &format!("{}px", size.css))?;
        style.set_property("height", &format!("{}px", size.css))?;
        self.canvas.set_width(size.backing);
        self.canvas.set_height(size.backing);
        Ok(())
    }

    fn set_transform(&mut self, scale: f64) -> Result<(), JsValue> {
        self.ctx.set_transform(scale, 0.0, 0.0, scale, 0.0, 0.0)
    }

    fn clear_rect(&mut self, width: f64, height: f64) {
        self.ctx.clear_rect(0.0, 0.0, width, height);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(x, y, width, height);
    }

    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), color: &str, line_width: f64) {
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(line_width);
        self.ctx.begin_path();
        self.ctx.move_to(from.0, from.1);
        self.ctx.line_to(to.0, to.1);
        self.ctx.stroke();
    }

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: &str, line_width: f64) {
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(line_width);
        self.ctx.stroke_rect(x, y, width, height);
    }
}
