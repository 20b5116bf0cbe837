//! In-memory object store for tests and local development.

use crate::error::{StorageError, StorageResult};
use crate::traits::{AccessPolicy, ObjectStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

/// A recorded side effect, in invocation order.
///
/// Tests use the journal to assert the *ordering* of side effects, which
/// is the consistency mechanism this system relies on in place of
/// cross-store transactions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageOp {
    /// A container was created.
    CreateContainer {
        /// Storage account.
        account: String,
        /// Container name.
        container: String,
    },
    /// A container was deleted.
    DeleteContainer {
        /// Storage account.
        account: String,
        /// Container name.
        container: String,
    },
    /// A named policy was stored.
    SetPolicy {
        /// Storage account.
        account: String,
        /// Container name.
        container: String,
        /// Policy name.
        policy: String,
    },
    /// A named policy was removed.
    RemovePolicy {
        /// Storage account.
        account: String,
        /// Container name.
        container: String,
        /// Policy name.
        policy: String,
    },
}

#[derive(Default)]
struct ContainerEntry {
    policies: HashMap<String, AccessPolicy>,
}

/// In-memory object store backend.
///
/// Accounts are implicit: any account name maps to its own container
/// namespace, which is all the coordinators need.
#[derive(Default)]
pub struct MemoryObjectStore {
    containers: RwLock<HashMap<(String, String), ContainerEntry>>,
    journal: Mutex<Vec<StorageOp>>,
}

impl MemoryObjectStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded operations, in order.
    pub fn operations(&self) -> Vec<StorageOp> {
        self.journal.lock().expect("journal lock poisoned").clone()
    }

    /// Names of containers currently present in an account.
    pub fn container_names(&self, account: &str) -> Vec<String> {
        let containers = self.containers.read().expect("store lock poisoned");
        let mut names: Vec<String> = containers
            .keys()
            .filter(|(a, _)| a == account)
            .map(|(_, c)| c.clone())
            .collect();
        names.sort();
        names
    }

    fn record(&self, op: StorageOp) {
        self.journal.lock().expect("journal lock poisoned").push(op);
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn create_container(&self, account: &str, container: &str) -> StorageResult<()> {
        let key = (account.to_string(), container.to_string());
        let mut containers = self.containers.write().expect("store lock poisoned");
        if containers.contains_key(&key) {
            return Err(StorageError::AlreadyExists(format!(
                "{account}/{container}"
            )));
        }
        containers.insert(key, ContainerEntry::default());
        drop(containers);
        self.record(StorageOp::CreateContainer {
            account: account.to_string(),
            container: container.to_string(),
        });
        Ok(())
    }

    async fn delete_container(&self, account: &str, container: &str) -> StorageResult<bool> {
        let key = (account.to_string(), container.to_string());
        let existed = {
            let mut containers = self.containers.write().expect("store lock poisoned");
            containers.remove(&key).is_some()
        };
        self.record(StorageOp::DeleteContainer {
            account: account.to_string(),
            container: container.to_string(),
        });
        Ok(existed)
    }

    async fn container_exists(&self, account: &str, container: &str) -> StorageResult<bool> {
        let containers = self.containers.read().expect("store lock poisoned");
        Ok(containers.contains_key(&(account.to_string(), container.to_string())))
    }

    fn container_url(&self, account: &str, container: &str) -> String {
        format!("https://{account}.store.invalid/{container}")
    }

    async fn set_access_policy(
        &self,
        account: &str,
        container: &str,
        policy: AccessPolicy,
    ) -> StorageResult<()> {
        let key = (account.to_string(), container.to_string());
        let policy_name = policy.name.clone();
        {
            let mut containers = self.containers.write().expect("store lock poisoned");
            let entry = containers
                .get_mut(&key)
                .ok_or_else(|| StorageError::NotFound(format!("{account}/{container}")))?;
            entry.policies.insert(policy.name.clone(), policy);
        }
        self.record(StorageOp::SetPolicy {
            account: account.to_string(),
            container: container.to_string(),
            policy: policy_name,
        });
        Ok(())
    }

    async fn remove_access_policy(
        &self,
        account: &str,
        container: &str,
        policy_name: &str,
    ) -> StorageResult<bool> {
        let key = (account.to_string(), container.to_string());
        let existed = {
            let mut containers = self.containers.write().expect("store lock poisoned");
            match containers.get_mut(&key) {
                Some(entry) => entry.policies.remove(policy_name).is_some(),
                // Container gone entirely: nothing left to revoke.
                None => false,
            }
        };
        self.record(StorageOp::RemovePolicy {
            account: account.to_string(),
            container: container.to_string(),
            policy: policy_name.to_string(),
        });
        Ok(existed)
    }

    async fn get_access_policy(
        &self,
        account: &str,
        container: &str,
        policy_name: &str,
    ) -> StorageResult<Option<AccessPolicy>> {
        let containers = self.containers.read().expect("store lock poisoned");
        Ok(containers
            .get(&(account.to_string(), container.to_string()))
            .and_then(|entry| entry.policies.get(policy_name).cloned()))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Permissions;
    use time::OffsetDateTime;

    #[tokio::test]
    async fn test_container_lifecycle() {
        let store = MemoryObjectStore::new();
        assert!(!store.container_exists("acct", "data").await.unwrap());

        store.create_container("acct", "data").await.unwrap();
        assert!(store.container_exists("acct", "data").await.unwrap());

        let err = store.create_container("acct", "data").await.unwrap_err();
        assert!(matches!(err, StorageError::AlreadyExists(_)));

        assert!(store.delete_container("acct", "data").await.unwrap());
        assert!(!store.delete_container("acct", "data").await.unwrap());
    }

    #[tokio::test]
    async fn test_accounts_are_isolated() {
        let store = MemoryObjectStore::new();
        store.create_container("a", "data").await.unwrap();
        assert!(!store.container_exists("b", "data").await.unwrap());
        assert_eq!(store.container_names("a"), vec!["data".to_string()]);
        assert!(store.container_names("b").is_empty());
    }

    #[tokio::test]
    async fn test_policy_requires_container() {
        let store = MemoryObjectStore::new();
        let policy = AccessPolicy {
            name: "p".to_string(),
            permissions: Permissions::full(),
            expires_at: OffsetDateTime::now_utc(),
        };
        let err = store
            .set_access_policy("acct", "missing", policy)
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));

        // Removal stays idempotent even when the container is gone.
        assert!(!store
            .remove_access_policy("acct", "missing", "p")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_journal_records_order() {
        let store = MemoryObjectStore::new();
        store.create_container("acct", "one").await.unwrap();
        store.delete_container("acct", "one").await.unwrap();

        let ops = store.operations();
        assert_eq!(
            ops,
            vec![
                StorageOp::CreateContainer {
                    account: "acct".to_string(),
                    container: "one".to_string()
                },
                StorageOp::DeleteContainer {
                    account: "acct".to_string(),
                    container: "one".to_string()
                },
            ]
        );
    }
}
