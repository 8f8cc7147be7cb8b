//! Editor core: keeps the local grid in sync with the artifact store.
//!
//! DESIGN
//! ======
//! `EditorCore` is a pure state machine. Every input (user action, request
//! completion, timer) arrives as an [`Event`]; [`EditorCore::handle`] updates
//! state and returns the [`Effect`]s the host must carry out. No I/O happens
//! here, so every ordering of completions can be replayed in tests.
//!
//! SYNCHRONIZATION
//! ===============
//! - The store is authoritative. A click never flips the local cell; the
//!   grid changes only when the store confirms the new value.
//! - Toggles are queued per artifact and sent one at a time. Each request
//!   carries a sequence number, and completions whose number is not the
//!   one in flight are dropped.
//! - A toggle that times out leaves its cell in an unknown state. The cell
//!   is marked stale (drawn with an outline) until a later confirmed toggle
//!   of that cell or a reload.
//! - Loads are also sequenced. Only the most recent load may replace the
//!   grid, and a failed load leaves the previous grid in place.
//! - A reload of the same artifact keeps queued toggles. Switching artifacts
//!   drops them and reports how many edits were lost.

#[cfg(test)]
#[path = "editor_test.rs"]
mod editor_test;

use std::collections::{BTreeSet, VecDeque};
use std::time::Duration;

use canvas::grid::{Cell, GridModel};
use canvas::mapper::cell_from_point;
use canvas::render::{Frame, paint};
use tracing::{debug, error, info, warn};

use super::catalog::CatalogState;
use super::status::{STATUS_TTL, StatusLine, StatusMessage, StatusTone};
use super::view::ViewState;
use crate::net::store::StoreError;
use crate::net::types::{ArtifactData, ArtifactRef, ArtifactSummary};

/// Derived editor phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Nothing loaded.
    Empty,
    /// An artifact load is pending, or the catalog is loading with nothing
    /// loaded yet.
    Loading,
    /// A grid is loaded and idle.
    Ready,
    /// A grid is loaded and a toggle is in flight.
    Saving,
}

/// Inputs to the editor core.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    LoadCatalog,
    CatalogLoaded { seq: u64, result: Result<Vec<ArtifactSummary>, StoreError> },
    Select { id: String },
    /// Reload the selected artifact.
    Refresh,
    ArtifactLoaded { seq: u64, result: Result<ArtifactData, StoreError> },
    /// Click in canvas CSS pixels, relative to the canvas origin.
    PointerClick { x: f64, y: f64 },
    ToggleResolved { seq: u64, result: Result<u8, StoreError> },
    ZoomChanged { zoom: u32 },
    ViewportResized { panel_width: f64 },
    DevicePixelRatioChanged { device_pixel_ratio: f64 },
    StatusExpired { seq: u64 },
}

/// Work the host performs on behalf of the core.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    FetchCatalog { seq: u64 },
    FetchArtifact { seq: u64, id: String },
    SendToggle { seq: u64, id: String, cell: Cell },
    /// Repaint the canvas from [`EditorCore::frame`].
    Render,
    /// Point the reference panel at `artifact`'s source image.
    ShowReference { artifact: ArtifactRef, size: u32 },
    /// The status line changed; read it from [`EditorCore::status`].
    ShowStatus,
    /// Deliver [`Event::StatusExpired`] with `seq` after `after`.
    ScheduleStatusClear { seq: u64, after: Duration },
    /// The catalog changed; read it from [`EditorCore::catalog`].
    CatalogUpdated,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct PendingLoad {
    seq: u64,
    id: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct InFlightToggle {
    seq: u64,
    id: String,
    cell: Cell,
}

#[derive(Debug, Default)]
pub struct EditorCore {
    grid: GridModel,
    view: ViewState,
    status: StatusLine,
    catalog: CatalogState,
    stale: BTreeSet<Cell>,
    queue: VecDeque<Cell>,
    in_flight: Option<InFlightToggle>,
    pending_load: Option<PendingLoad>,
    catalog_seq: u64,
    next_seq: u64,
    preselect: Option<String>,
}

impl EditorCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `id` once the first catalog load succeeds.
    #[must_use]
    pub fn with_preselect(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        self.preselect = (!id.is_empty()).then_some(id);
        self
    }

    /// Apply one event and return the effects it produced, in order.
    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::LoadCatalog => self.load_artifact_list(),
            Event::CatalogLoaded { seq, result } => self.on_catalog_loaded(seq, result),
            Event::Select { id } => self.select_artifact(id),
            Event::Refresh => self.refresh(),
            Event::ArtifactLoaded { seq, result } => self.on_artifact_loaded(seq, result),
            Event::PointerClick { x, y } => self.handle_pointer_click(x, y),
            Event::ToggleResolved { seq, result } => self.on_toggle_resolved(seq, result),
            Event::ZoomChanged { zoom } => self.change_zoom(zoom),
            Event::ViewportResized { panel_width } => self.handle_viewport_resize(panel_width),
            Event::DevicePixelRatioChanged { device_pixel_ratio } => self.set_device_pixel_ratio(device_pixel_ratio),
            Event::StatusExpired { seq } => self.on_status_expired(seq),
        }
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    #[must_use]
    pub fn phase(&self) -> Phase {
        if self.pending_load.is_some() || (self.catalog.loading && self.grid.is_empty()) {
            Phase::Loading
        } else if self.grid.is_empty() {
            Phase::Empty
        } else if self.in_flight.is_some() {
            Phase::Saving
        } else {
            Phase::Ready
        }
    }

    #[must_use]
    pub fn grid(&self) -> &GridModel {
        &self.grid
    }

    #[must_use]
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    #[must_use]
    pub fn catalog(&self) -> &CatalogState {
        &self.catalog
    }

    #[must_use]
    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.current()
    }

    /// Cells whose stored value is unknown after a timed-out toggle.
    #[must_use]
    pub fn stale(&self) -> &BTreeSet<Cell> {
        &self.stale
    }

    #[must_use]
    pub fn selected(&self) -> Option<&ArtifactRef> {
        self.view.selected()
    }

    /// Toggles waiting to be sent plus the one in flight.
    #[must_use]
    pub fn pending_toggles(&self) -> usize {
        self.queue.len() + usize::from(self.in_flight.is_some())
    }

    /// Full repaint of the current grid, or `None` when nothing is loaded.
    #[must_use]
    pub fn frame(&self) -> Option<Frame> {
        if self.grid.is_empty() {
            return None;
        }
        Some(paint(&self.grid, self.view.zoom(), self.view.device_pixel_ratio(), &self.stale))
    }

    /// `file=<id> | module=<n>, width=<w>, height=<h>` for the loaded artifact.
    #[must_use]
    pub fn metadata_line(&self) -> Option<String> {
        let selected = self.view.selected()?;
        if self.grid.is_empty() {
            return None;
        }
        Some(format!(
            "file={} | module={}, width={}, height={}",
            selected.id,
            self.grid.module_count(),
            self.grid.width_px(),
            self.grid.height_px()
        ))
    }

    // =========================================================================
    // CATALOG
    // =========================================================================

    pub fn load_artifact_list(&mut self) -> Vec<Effect> {
        let seq = self.bump_seq();
        self.catalog_seq = seq;
        self.catalog.loading = true;
        debug!(seq, "fetching catalog");
        vec![Effect::FetchCatalog { seq }, Effect::CatalogUpdated]
    }

    pub fn on_catalog_loaded(&mut self, seq: u64, result: Result<Vec<ArtifactSummary>, StoreError>) -> Vec<Effect> {
        if seq != self.catalog_seq || !self.catalog.loading {
            debug!(seq, current = self.catalog_seq, "dropping superseded catalog response");
            return Vec::new();
        }
        self.catalog.loading = false;

        let items = match result {
            Ok(items) => items,
            Err(err) => {
                warn!(error = %err, "catalog load failed");
                self.catalog.error = Some(err.to_string());
                let mut effects = vec![Effect::CatalogUpdated];
                effects.extend(self.show_status(format!("list failed: {err}"), StatusTone::Error));
                return effects;
            }
        };

        info!(count = items.len(), "catalog loaded");
        self.catalog.items = items;
        self.catalog.error = None;
        let mut effects = vec![Effect::CatalogUpdated];

        if let Some(selected) = self.view.selected().map(|s| s.id.clone())
            && let Some(original_exists) = self.catalog.find(&selected).map(|s| s.original_exists)
            && self.view.refresh_original_exists(&selected, original_exists)
        {
            effects.extend(self.reference_effect());
        }

        if let Some(id) = self.preselect.take() {
            effects.extend(self.select_artifact(id));
        }
        effects
    }

    // =========================================================================
    // ARTIFACT LOADS
    // =========================================================================

    pub fn select_artifact(&mut self, id: impl Into<String>) -> Vec<Effect> {
        let id = id.into();
        let seq = self.bump_seq();
        info!(%id, seq, "loading artifact");
        self.pending_load = Some(PendingLoad { seq, id: id.clone() });
        vec![Effect::FetchArtifact { seq, id }]
    }

    /// Reload the selected artifact. Clears stale markers on success.
    pub fn refresh(&mut self) -> Vec<Effect> {
        match self.view.selected().map(|s| s.id.clone()) {
            Some(id) => self.select_artifact(id),
            None => Vec::new(),
        }
    }

    pub fn on_artifact_loaded(&mut self, seq: u64, result: Result<ArtifactData, StoreError>) -> Vec<Effect> {
        let Some(pending) = self.pending_load.take_if(|p| p.seq == seq) else {
            debug!(seq, "dropping superseded artifact response");
            return Vec::new();
        };
        let id = pending.id;

        let loaded = result.and_then(|data| {
            self.grid
                .replace(&data.vector, data.module, data.width, data.height)
                .map_err(StoreError::from)
        });
        if let Err(err) = loaded {
            warn!(%id, error = %err, "artifact load failed");
            return self.show_status(format!("load failed: {err}"), StatusTone::Error);
        }

        // Queued clicks stay valid across a reload of the same artifact.
        let switching = self.view.selected().is_none_or(|s| s.id != id);
        let discarded = if switching {
            if let Some(dropped) = self.in_flight.take() {
                debug!(id = %dropped.id, seq = dropped.seq, "dropping in-flight toggle for previous artifact");
            }
            let discarded = self.queue.len();
            self.queue.clear();
            discarded
        } else {
            0
        };
        self.stale.clear();

        let original_exists = self.catalog.find(&id).map_or(true, |s| s.original_exists);
        info!(%id, module = self.grid.module_count(), "artifact loaded");
        self.view.select(ArtifactRef { id, original_exists });

        let mut effects = vec![Effect::Render];
        effects.extend(self.reference_effect());
        if discarded > 0 {
            warn!(discarded, "queued toggles discarded by artifact switch");
            let noun = if discarded == 1 { "edit" } else { "edits" };
            effects.extend(self.show_status(format!("{discarded} pending {noun} discarded"), StatusTone::Error));
        }
        effects.extend(self.send_next_toggle());
        effects
    }

    // =========================================================================
    // TOGGLES
    // =========================================================================

    /// Queue a toggle for the cell under `(px, py)`. Clicks outside the grid
    /// or while nothing is ready are ignored.
    pub fn handle_pointer_click(&mut self, px: f64, py: f64) -> Vec<Effect> {
        if !matches!(self.phase(), Phase::Ready | Phase::Saving) {
            debug!(phase = ?self.phase(), "ignoring click");
            return Vec::new();
        }
        let Some(cell) = cell_from_point(px, py, self.view.zoom(), self.grid.module_count()) else {
            return Vec::new();
        };
        debug!(x = cell.x, y = cell.y, queued = self.queue.len(), "toggle queued");
        self.queue.push_back(cell);
        self.send_next_toggle()
    }

    pub fn on_toggle_resolved(&mut self, seq: u64, result: Result<u8, StoreError>) -> Vec<Effect> {
        let Some(toggle) = self.in_flight.take_if(|t| t.seq == seq) else {
            debug!(seq, "dropping stale toggle response");
            return Vec::new();
        };
        let cell = toggle.cell;

        let mut effects = match result {
            Ok(value) => match self.grid.set(cell.x, cell.y, value) {
                Ok(()) => {
                    self.stale.remove(&cell);
                    info!(id = %toggle.id, x = cell.x, y = cell.y, value, "toggle confirmed");
                    let mut effects = vec![Effect::Render];
                    effects.extend(
                        self.show_status(format!("saved: ({}, {}) → {value}", cell.x, cell.y), StatusTone::Success),
                    );
                    effects
                }
                Err(err) => {
                    error!(id = %toggle.id, error = %err, "confirmed toggle does not fit the grid");
                    self.show_status(format!("save failed: {err}"), StatusTone::Error)
                }
            },
            Err(err) if err.is_timeout() => {
                warn!(id = %toggle.id, x = cell.x, y = cell.y, "toggle timed out; cell marked stale");
                self.stale.insert(cell);
                let mut effects = vec![Effect::Render];
                effects.extend(self.show_status(format!("save failed: {err}"), StatusTone::Error));
                effects
            }
            Err(err) => {
                warn!(id = %toggle.id, x = cell.x, y = cell.y, error = %err, "toggle failed");
                self.show_status(format!("save failed: {err}"), StatusTone::Error)
            }
        };

        effects.extend(self.send_next_toggle());
        effects
    }

    fn send_next_toggle(&mut self) -> Vec<Effect> {
        if self.in_flight.is_some() {
            return Vec::new();
        }
        let Some(id) = self.view.selected().map(|s| s.id.clone()) else {
            self.queue.clear();
            return Vec::new();
        };
        let Some(cell) = self.queue.pop_front() else {
            return Vec::new();
        };
        let seq = self.bump_seq();
        self.in_flight = Some(InFlightToggle { seq, id: id.clone(), cell });
        vec![Effect::SendToggle { seq, id, cell }]
    }

    // =========================================================================
    // VIEW
    // =========================================================================

    pub fn change_zoom(&mut self, zoom: u32) -> Vec<Effect> {
        let applied = self.view.set_zoom(zoom);
        debug!(requested = zoom, applied, "zoom changed");
        self.render_if_loaded()
    }

    pub fn set_device_pixel_ratio(&mut self, device_pixel_ratio: f64) -> Vec<Effect> {
        self.view.set_device_pixel_ratio(device_pixel_ratio);
        self.render_if_loaded()
    }

    pub fn handle_viewport_resize(&mut self, panel_width: f64) -> Vec<Effect> {
        self.view.set_panel_width(panel_width);
        self.reference_effect().into_iter().collect()
    }

    // =========================================================================
    // STATUS
    // =========================================================================

    pub fn on_status_expired(&mut self, seq: u64) -> Vec<Effect> {
        if self.status.expire(seq) { vec![Effect::ShowStatus] } else { Vec::new() }
    }

    fn show_status(&mut self, text: String, tone: StatusTone) -> Vec<Effect> {
        let seq = self.status.show(text, tone);
        vec![Effect::ShowStatus, Effect::ScheduleStatusClear { seq, after: STATUS_TTL }]
    }

    // =========================================================================
    // HELPERS
    // =========================================================================

    fn render_if_loaded(&self) -> Vec<Effect> {
        if self.grid.is_empty() { Vec::new() } else { vec![Effect::Render] }
    }

    fn reference_effect(&self) -> Option<Effect> {
        let artifact = self.view.selected()?.clone();
        Some(Effect::ShowReference { artifact, size: self.view.reference_size() })
    }

    fn bump_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }
}
