//! Object store abstraction for the curator dataset portal.
//!
//! This crate provides:
//! - The [`ObjectStore`] trait the coordinators consume (container
//!   lifecycle, existence probes, named access policies, locators)
//! - An in-memory backend with an operation journal for tests
//! - The access token issuer (time-limited, scope-limited HMAC grants,
//!   with revocable named policies for edit access)
//! - The collision-safe container name allocator

pub mod allocator;
pub mod error;
pub mod memory;
pub mod token;
pub mod traits;

pub use allocator::NameAllocator;
pub use error::{StorageError, StorageResult};
pub use memory::{MemoryObjectStore, StorageOp};
pub use token::{AccessGrant, TokenClaims, TokenIssuer, TokenScope, EDIT_POLICY_NAME};
pub use traits::{AccessPolicy, ObjectStore, Permissions};
