//! Client side of the QR module editor.
//!
//! ARCHITECTURE
//! ============
//! The editor is split into a pure state machine and an async driver:
//!
//! - [`state::editor::EditorCore`] consumes [`state::editor::Event`]s (user
//!   input, request completions, timers) and returns
//!   [`state::editor::Effect`]s for the host to carry out. It owns the grid,
//!   the view state and the status line, and never performs I/O.
//! - [`runtime::Runtime`] executes those effects against an
//!   [`net::store::ArtifactStore`] and an [`runtime::EditorHost`] display,
//!   feeding completions back into the core one event at a time.
//!
//! The store is reached over HTTP ([`net::api::HttpArtifactStore`]) or held
//! in memory ([`net::memory::MemoryStore`]).

pub mod config;
pub mod net;
pub mod runtime;
pub mod state;
