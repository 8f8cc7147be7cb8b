//! Async driver for [`EditorCore`].
//!
//! ARCHITECTURE
//! ============
//! The runtime owns the core, an [`ArtifactStore`] and an [`EditorHost`]
//! display. Each event is handled to completion before the next one is
//! taken, so the core sees a single logical thread. Store requests run as
//! tasks on a [`JoinSet`], each bounded by the request timeout. Their
//! completions come back as events, which keeps the loop responsive while
//! requests are in flight.
//!
//! Status expiry timers live on a separate set so tests and callers can
//! drain outstanding requests without waiting on cosmetic timers.

#[cfg(test)]
#[path = "runtime_test.rs"]
mod runtime_test;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use canvas::consts::THUMBNAIL_PX;
use canvas::render::Frame;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error};

use crate::net::store::{ArtifactStore, StoreError};
use crate::state::catalog::{CatalogState, CatalogThumbs};
use crate::state::editor::{Effect, EditorCore, Event};
use crate::state::status::StatusMessage;

/// The display side of the editor: canvas, reference image, status line and
/// artifact picker.
pub trait EditorHost {
    /// Repaint the canvas with a full frame.
    fn render(&mut self, frame: &Frame);

    /// Point the reference panel at an image URL.
    fn show_reference(&mut self, url: &str);

    /// Show the status line, or clear it when `None`.
    fn show_status(&mut self, status: Option<&StatusMessage>);

    /// Redraw the artifact picker. `thumbs` lines up with `catalog.items`.
    fn show_catalog(&mut self, catalog: &CatalogState, thumbs: &[CatalogThumbs]);
}

pub struct Runtime<S, H> {
    core: EditorCore,
    store: Arc<S>,
    host: H,
    request_timeout: Duration,
    requests: JoinSet<Event>,
    timers: JoinSet<Event>,
}

impl<S, H> Runtime<S, H>
where
    S: ArtifactStore + 'static,
    H: EditorHost,
{
    pub fn new(core: EditorCore, store: Arc<S>, host: H, request_timeout: Duration) -> Self {
        Self { core, store, host, request_timeout, requests: JoinSet::new(), timers: JoinSet::new() }
    }

    #[must_use]
    pub fn core(&self) -> &EditorCore {
        &self.core
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    #[must_use]
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Requests currently in flight.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.requests.len()
    }

    /// Handle one event and carry out its effects. Must be called inside a
    /// tokio runtime.
    pub fn dispatch(&mut self, event: Event) {
        for effect in self.core.handle(event) {
            self.apply(effect);
        }
    }

    /// Process events from `events` until the sender side closes, then wait
    /// for outstanding requests.
    pub async fn run(&mut self, mut events: mpsc::Receiver<Event>) {
        loop {
            tokio::select! {
                maybe_event = events.recv() => {
                    let Some(event) = maybe_event else {
                        break;
                    };
                    self.dispatch(event);
                }
                Some(done) = self.requests.join_next() => self.complete(done),
                Some(done) = self.timers.join_next() => self.complete(done),
            }
        }
        debug!(in_flight = self.requests.len(), "event channel closed; draining requests");
        self.run_until_idle().await;
    }

    /// Wait for every in-flight request, including ones started by earlier
    /// completions. Status timers are left running.
    pub async fn run_until_idle(&mut self) {
        while let Some(done) = self.requests.join_next().await {
            self.complete(done);
        }
    }

    /// Let pending status timers fire.
    pub async fn flush_timers(&mut self) {
        while let Some(done) = self.timers.join_next().await {
            self.complete(done);
        }
    }

    fn complete(&mut self, done: Result<Event, JoinError>) {
        match done {
            Ok(event) => self.dispatch(event),
            Err(err) => error!(error = %err, "editor task failed"),
        }
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::FetchCatalog { seq } => {
                let store = Arc::clone(&self.store);
                let limit = self.request_timeout;
                self.requests.spawn(async move {
                    let result = bounded(limit, store.list_artifacts()).await;
                    Event::CatalogLoaded { seq, result }
                });
            }
            Effect::FetchArtifact { seq, id } => {
                let store = Arc::clone(&self.store);
                let limit = self.request_timeout;
                self.requests.spawn(async move {
                    let result = bounded(limit, store.load_artifact(&id)).await;
                    Event::ArtifactLoaded { seq, result }
                });
            }
            Effect::SendToggle { seq, id, cell } => {
                let store = Arc::clone(&self.store);
                let limit = self.request_timeout;
                self.requests.spawn(async move {
                    let result = bounded(limit, store.toggle_cell(&id, cell)).await;
                    Event::ToggleResolved { seq, result }
                });
            }
            Effect::Render => {
                if let Some(frame) = self.core.frame() {
                    self.host.render(&frame);
                }
            }
            Effect::ShowReference { artifact, size } => {
                let url = self.store.reference_url(&artifact, size);
                self.host.show_reference(&url);
            }
            Effect::ShowStatus => self.host.show_status(self.core.status()),
            Effect::ScheduleStatusClear { seq, after } => {
                self.timers.spawn(async move {
                    tokio::time::sleep(after).await;
                    Event::StatusExpired { seq }
                });
            }
            Effect::CatalogUpdated => {
                let thumbs = self.catalog_thumbs();
                self.host.show_catalog(self.core.catalog(), &thumbs);
            }
        }
    }

    fn catalog_thumbs(&self) -> Vec<CatalogThumbs> {
        self.core
            .catalog()
            .items
            .iter()
            .map(|item| CatalogThumbs {
                id: item.id.clone(),
                original: self.store.reference_url(&item.artifact_ref(), THUMBNAIL_PX),
                rendered: self.store.thumbnail_url(&item.id, THUMBNAIL_PX),
            })
            .collect()
    }
}

/// Run a store call, mapping an elapsed deadline to [`StoreError::Timeout`].
async fn bounded<T>(limit: Duration, call: impl Future<Output = Result<T, StoreError>>) -> Result<T, StoreError> {
    tokio::time::timeout(limit, call).await.unwrap_or(Err(StoreError::Timeout))
}
