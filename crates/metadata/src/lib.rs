//! Metadata store abstraction for the curator dataset portal.
//!
//! This crate provides the control-plane data access layer:
//! - Dataset records (the published record of truth)
//! - Edit sessions (working copies staged by dataset owners)
//! - Nominations (proposals moving through the approval pipeline)
//!
//! The real document store is an external collaborator consumed through
//! the repository traits; [`MemoryStore`] is the in-process
//! implementation used by tests and local development.

pub mod error;
pub mod memory;
pub mod repos;
pub mod store;

pub use error::{MetadataError, MetadataResult};
pub use memory::MemoryStore;
pub use repos::{DatasetRepo, EditSessionRepo, NominationRepo};
pub use store::MetadataStore;
