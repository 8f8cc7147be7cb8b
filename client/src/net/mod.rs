//! Store access: the artifact store contract and its implementations.
//!
//! SYSTEM CONTEXT
//! ==============
//! `store` defines [`store::ArtifactStore`] and its error type, `api` talks
//! to the HTTP store, `memory` keeps artifacts in process, and `types`
//! defines the shared wire schema.

pub mod api;
pub mod memory;
pub mod store;
pub mod types;
