//! Core domain types and shared logic for the curator dataset portal.
//!
//! This crate defines the canonical data model used across all other crates:
//! - Dataset records, owners, and the ownership predicate
//! - Edit session lifecycle (the working copy of an in-progress owner edit)
//! - Nomination records and the status transition table
//! - Container references and attachments
//! - Collision-safe container name derivation

pub mod config;
pub mod container;
pub mod dataset;
pub mod error;
pub mod name;
pub mod nomination;
pub mod principal;
pub mod session;

pub use config::CatalogConfig;
pub use container::{ContainerAttachment, ContainerRef, SUPPORTED_STORAGE_TYPE};
pub use dataset::{Dataset, DatasetId, DatasetPatch, LicenseKind, LicenseTerms};
pub use error::{Error, Result};
pub use name::{derive_name, update_suffix, DISAMBIGUATION_ALPHABET};
pub use nomination::{is_valid_transition, Nomination, NominationId, NominationStatus};
pub use principal::{is_owner, Owner, Principal};
pub use session::{EditSession, EditStatus};

/// Maximum container name length accepted by the backing object store.
pub const MAX_CONTAINER_NAME_LEN: usize = 63;

/// Minimum usable container name length; shorter derivations fall back
/// to [`CONTAINER_NAME_FALLBACK`].
pub const MIN_CONTAINER_NAME_LEN: usize = 3;

/// Fallback base name when a dataset name strips down to nothing usable.
pub const CONTAINER_NAME_FALLBACK: &str = "dataset";
