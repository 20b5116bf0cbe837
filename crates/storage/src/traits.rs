//! Object store trait definitions.

use crate::error::StorageResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Permission set carried by an access policy or token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permissions {
    /// Read object content.
    pub read: bool,
    /// List container contents.
    pub list: bool,
    /// Write objects.
    pub write: bool,
    /// Delete objects.
    pub delete: bool,
}

impl Permissions {
    /// Read + list, no mutation.
    pub fn read_only() -> Self {
        Self {
            read: true,
            list: true,
            write: false,
            delete: false,
        }
    }

    /// Full read/write/delete/list access.
    pub fn full() -> Self {
        Self {
            read: true,
            list: true,
            write: true,
            delete: true,
        }
    }

    /// Compact string form used in signed tokens (`r`, `l`, `w`, `d`).
    pub fn token_string(&self) -> String {
        let mut s = String::new();
        if self.read {
            s.push('r');
        }
        if self.write {
            s.push('w');
        }
        if self.delete {
            s.push('d');
        }
        if self.list {
            s.push('l');
        }
        s
    }
}

/// A named, revocable access policy stored on a container.
///
/// Tokens signed against a policy are invalidated the moment the policy
/// is removed, rather than waiting for their expiry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AccessPolicy {
    /// Policy name; tokens reference it by this name.
    pub name: String,
    /// Permissions the policy grants.
    pub permissions: Permissions,
    /// When the policy (and tokens bound to it) expires.
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

/// Object store abstraction at container granularity.
///
/// The coordinators never move bytes; they create, probe, and delete
/// containers and manage access policies. Bulk content flows directly
/// between clients and the store via issued tokens.
#[async_trait]
pub trait ObjectStore: Send + Sync + 'static {
    /// Create a container. Fails with `AlreadyExists` if present.
    async fn create_container(&self, account: &str, container: &str) -> StorageResult<()>;

    /// Delete a container and everything in it.
    ///
    /// Returns whether the container existed; deleting a missing
    /// container is not an error (cleanup paths retry).
    async fn delete_container(&self, account: &str, container: &str) -> StorageResult<bool>;

    /// Check whether a container exists.
    async fn container_exists(&self, account: &str, container: &str) -> StorageResult<bool>;

    /// Resolve a container's public locator URI.
    fn container_url(&self, account: &str, container: &str) -> String;

    /// Store a named access policy on a container, replacing any policy
    /// with the same name.
    async fn set_access_policy(
        &self,
        account: &str,
        container: &str,
        policy: AccessPolicy,
    ) -> StorageResult<()>;

    /// Remove a named access policy from a container.
    ///
    /// Returns whether the policy existed; removing a missing policy is
    /// not an error (revocation must be idempotent).
    async fn remove_access_policy(
        &self,
        account: &str,
        container: &str,
        policy_name: &str,
    ) -> StorageResult<bool>;

    /// Look up a named access policy on a container.
    async fn get_access_policy(
        &self,
        account: &str,
        container: &str,
        policy_name: &str,
    ) -> StorageResult<Option<AccessPolicy>>;

    /// Static identifier for the backend type, used in logs.
    fn backend_name(&self) -> &'static str;

    /// Verify backend connectivity.
    ///
    /// The default implementation returns `Ok(())`, suitable for
    /// backends without a meaningful probe.
    async fn health_check(&self) -> StorageResult<()> {
        Ok(())
    }
}
