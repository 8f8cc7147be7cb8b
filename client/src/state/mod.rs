//! Editor state.
//!
//! DESIGN
//! ======
//! `editor` is the synchronization state machine. `view`, `status` and
//! `catalog` hold the presentation state it owns, split out so each piece
//! can be reasoned about and tested on its own.

pub mod catalog;
pub mod editor;
pub mod status;
pub mod view;
