//! Collision-safe container name allocation.
//!
//! The pure derivation lives in `curator_core::name`; this module adds
//! the existence probe against the object store and the bounded
//! disambiguation walk.

use crate::error::{StorageError, StorageResult};
use crate::traits::ObjectStore;
use curator_core::name::{derive_name, update_suffix, DISAMBIGUATION_ALPHABET};
use time::Date;

/// Allocates container names that do not collide with existing ones.
#[derive(Clone, Copy, Debug)]
pub struct NameAllocator {
    max_len: usize,
}

impl NameAllocator {
    /// Create an allocator bounded by the store's maximum name length.
    pub fn new(max_len: usize) -> Self {
        Self { max_len }
    }

    /// Allocate a name derived from `dataset_name` (plus the given base
    /// suffixes) that no existing container in the account uses.
    ///
    /// Probes the bare derivation first, then walks the disambiguation
    /// alphabet one extra single-character suffix at a time. Purely
    /// existence probes; no retries or backoff. Fails with
    /// `AllocationExhausted` when the alphabet is spent, which should
    /// never happen in practice.
    pub async fn allocate_unique(
        &self,
        store: &dyn ObjectStore,
        account: &str,
        dataset_name: &str,
        base_suffixes: &[&str],
    ) -> StorageResult<String> {
        let candidate = derive_name(dataset_name, base_suffixes, self.max_len);
        if !store.container_exists(account, &candidate).await? {
            return Ok(candidate);
        }

        for disambiguator in DISAMBIGUATION_ALPHABET.chars() {
            let extra = disambiguator.to_string();
            let mut suffixes: Vec<&str> = base_suffixes.to_vec();
            suffixes.push(&extra);
            let candidate = derive_name(dataset_name, &suffixes, self.max_len);
            if !store.container_exists(account, &candidate).await? {
                return Ok(candidate);
            }
        }

        Err(StorageError::AllocationExhausted(dataset_name.to_string()))
    }

    /// Allocate a name for an update-session (shadow) container.
    ///
    /// Prepends the deterministic `u<YYYYMMDD>` suffix so concurrent
    /// edit sessions on different days do not collide by default.
    pub async fn allocate_update_name(
        &self,
        store: &dyn ObjectStore,
        account: &str,
        dataset_name: &str,
        date: Date,
    ) -> StorageResult<String> {
        let suffix = update_suffix(date);
        self.allocate_unique(store, account, dataset_name, &[&suffix])
            .await
    }
}

impl Default for NameAllocator {
    fn default() -> Self {
        Self::new(curator_core::MAX_CONTAINER_NAME_LEN)
    }
}
