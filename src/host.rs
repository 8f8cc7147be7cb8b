//! Terminal host: repaints go to an SVG file, status lines to stdout.

#[cfg(test)]
#[path = "host_test.rs"]
mod host_test;

use std::io;
use std::path::PathBuf;

use canvas::render::{Frame, draw};
use canvas::svg::SvgSurface;
use client::net::types::ArtifactSummary;
use client::runtime::EditorHost;
use client::state::catalog::{CatalogState, CatalogThumbs};
use client::state::status::{StatusMessage, StatusTone};
use tracing::{debug, error, info};

#[derive(Debug, Default)]
pub struct SvgFileHost {
    out: Option<PathBuf>,
    echo: bool,
    surface: SvgSurface,
    renders: usize,
    reference: Option<String>,
    status: Option<StatusMessage>,
    catalog: Vec<ArtifactSummary>,
    write_error: Option<io::Error>,
}

impl SvgFileHost {
    /// Write each repaint to `out`, when given.
    #[must_use]
    pub fn new(out: Option<PathBuf>) -> Self {
        Self { out, ..Self::default() }
    }

    /// Print status messages and catalog updates as they arrive.
    #[must_use]
    pub fn echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// The last repaint as an SVG document.
    #[must_use]
    pub fn document(&self) -> String {
        self.surface.to_document()
    }

    #[must_use]
    pub fn renders(&self) -> usize {
        self.renders
    }

    #[must_use]
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    /// Last message shown, kept after the status line clears.
    #[must_use]
    pub fn last_status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    #[must_use]
    pub fn catalog(&self) -> &[ArtifactSummary] {
        &self.catalog
    }

    /// First failed SVG write since the last call.
    pub fn take_write_error(&mut self) -> Option<io::Error> {
        self.write_error.take()
    }
}

impl EditorHost for SvgFileHost {
    fn render(&mut self, frame: &Frame) {
        let Ok(()) = draw(&mut self.surface, frame);
        self.renders += 1;

        let Some(out) = &self.out else {
            return;
        };
        match std::fs::write(out, self.surface.to_document()) {
            Ok(()) => debug!(path = %out.display(), css = frame.size.css, "wrote canvas"),
            Err(err) => {
                error!(path = %out.display(), error = %err, "failed to write canvas");
                self.write_error.get_or_insert(err);
            }
        }
    }

    fn show_reference(&mut self, url: &str) {
        info!(url, "reference image");
        self.reference = Some(url.to_owned());
    }

    fn show_status(&mut self, status: Option<&StatusMessage>) {
        let Some(status) = status else {
            return;
        };
        if self.echo {
            match status.tone {
                StatusTone::Success => println!("{}", status.text),
                StatusTone::Error => eprintln!("{}", status.text),
            }
        }
        self.status = Some(status.clone());
    }

    fn show_catalog(&mut self, catalog: &CatalogState, thumbs: &[CatalogThumbs]) {
        if catalog.loading {
            return;
        }
        if self.echo && catalog.error.is_none() {
            for (item, thumb) in catalog.items.iter().zip(thumbs) {
                println!("{}", summary_line(item, thumb));
            }
        }
        self.catalog.clone_from(&catalog.items);
    }
}

/// One picker row: id, size, the original image (or "no orig") and the
/// rendered thumbnail.
#[must_use]
pub fn summary_line(item: &ArtifactSummary, thumb: &CatalogThumbs) -> String {
    let size = match (item.module, item.width, item.height) {
        (Some(module), Some(width), Some(height)) => format!("module={module}, {width}x{height}"),
        _ => "unreadable".to_owned(),
    };
    // The placeholder data URL is not worth printing.
    let original = if item.original_exists { thumb.original.as_str() } else { "no orig" };
    format!("{}\t{size}\t{original}\t{}", item.id, thumb.rendered)
}
