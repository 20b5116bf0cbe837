//! Configuration types shared across crates.

use serde::{Deserialize, Serialize};

/// Catalog coordinator configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Storage account new containers are allocated in.
    pub storage_account: String,
    /// Maximum container name length accepted by the object store.
    #[serde(default = "default_max_container_name_len")]
    pub max_container_name_len: usize,
    /// Read token lifetime in seconds (default: 30 days).
    #[serde(default = "default_read_token_ttl_secs")]
    pub read_token_ttl_secs: u64,
    /// Edit token lifetime in seconds (default: 7 days).
    #[serde(default = "default_edit_token_ttl_secs")]
    pub edit_token_ttl_secs: u64,
}

impl CatalogConfig {
    /// Create a test configuration against a throwaway account.
    ///
    /// **For testing only.**
    pub fn for_testing() -> Self {
        Self {
            storage_account: "testaccount".to_string(),
            max_container_name_len: default_max_container_name_len(),
            read_token_ttl_secs: default_read_token_ttl_secs(),
            edit_token_ttl_secs: default_edit_token_ttl_secs(),
        }
    }

    /// Read token lifetime as a [`time::Duration`].
    pub fn read_token_ttl(&self) -> time::Duration {
        time::Duration::seconds(self.read_token_ttl_secs as i64)
    }

    /// Edit token lifetime as a [`time::Duration`].
    pub fn edit_token_ttl(&self) -> time::Duration {
        time::Duration::seconds(self.edit_token_ttl_secs as i64)
    }
}

fn default_max_container_name_len() -> usize {
    crate::MAX_CONTAINER_NAME_LEN
}

fn default_read_token_ttl_secs() -> u64 {
    30 * 24 * 60 * 60
}

fn default_edit_token_ttl_secs() -> u64 {
    7 * 24 * 60 * 60
}
