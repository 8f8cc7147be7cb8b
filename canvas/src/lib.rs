//! Grid model, coordinate mapping and rendering for the QR module editor.
//!
//! This crate holds everything that can be computed without a network: the
//! square module matrix being edited, the mapping between pointer positions
//! and cells, and the painter that turns a matrix into draw commands. It is
//! compiled both natively (CLI, tests) and to WebAssembly, where
//! `web::WebSurface` executes the commands on a `<canvas>` element. The
//! `web` module only exists on `wasm32`.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`grid`] | [`grid::GridModel`], the authoritative module matrix |
//! | [`mapper`] | Pointer-to-cell mapping and CSS / backing-store sizing |
//! | [`render`] | Pure painter producing a [`render::Frame`] of draw commands |
//! | [`svg`] | SVG surface and the "no original" placeholder graphic |
//! | `web` | `CanvasRenderingContext2d` surface for the browser (wasm32 only) |
//! | [`consts`] | Colors, stroke widths and zoom limits |

pub mod consts;
pub mod grid;
pub mod mapper;
pub mod render;
pub mod svg;
#[cfg(target_arch = "wasm32")]
pub mod web;
