//! Dataset edit and nomination lifecycle coordinators.
//!
//! The two workflows that keep the metadata document store and the
//! object store consistent without cross-store transactions:
//!
//! - [`EditCoordinator`] stages owner edits to a published dataset
//!   (metadata-only, or full content replacement through a shadow
//!   container) and drives publish/cancel/cleanup side effects.
//! - [`NominationService`] moves a proposed dataset through the
//!   approval/import pipeline, validating every status change against
//!   one transition table.
//!
//! Consistency comes from side-effect *ordering*, not transactions:
//! a resource (container) is always created before anything references
//! it, and references are always removed before the resource is torn
//! down. A crash can orphan an empty container; it can never leave a
//! record pointing at storage that does not exist.

pub mod edit;
pub mod error;
pub mod nomination;
pub mod search;

pub use edit::{EditCoordinator, PublishOutcome};
pub use error::{CatalogError, CatalogResult};
pub use nomination::{NominationService, StorageRequest};
pub use search::{NullSearchMirror, SearchMirror};
