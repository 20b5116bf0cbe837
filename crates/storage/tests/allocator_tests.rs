// Name allocation against a live (in-memory) object store.

use curator_storage::{MemoryObjectStore, NameAllocator, ObjectStore, StorageError};
use time::macros::date;

#[tokio::test]
async fn test_first_candidate_when_free() {
    let store = MemoryObjectStore::new();
    let allocator = NameAllocator::default();

    let name = allocator
        .allocate_unique(&store, "acct", "My Dataset Name", &[])
        .await
        .unwrap();
    assert_eq!(name, "mydatasetname");
}

#[tokio::test]
async fn test_disambiguator_appended_on_collision() {
    let store = MemoryObjectStore::new();
    store.create_container("acct", "mydatasetname").await.unwrap();

    let allocator = NameAllocator::default();
    let name = allocator
        .allocate_unique(&store, "acct", "My Dataset Name", &[])
        .await
        .unwrap();
    assert_eq!(name, "mydatasetname-2");
}

#[tokio::test]
async fn test_disambiguator_walks_alphabet() {
    let store = MemoryObjectStore::new();
    store.create_container("acct", "mydatasetname").await.unwrap();
    store
        .create_container("acct", "mydatasetname-2")
        .await
        .unwrap();

    let allocator = NameAllocator::default();
    let name = allocator
        .allocate_unique(&store, "acct", "My Dataset Name", &[])
        .await
        .unwrap();
    assert_eq!(name, "mydatasetname-3");
}

#[tokio::test]
async fn test_allocation_exhausted_when_alphabet_spent() {
    let store = MemoryObjectStore::new();
    store.create_container("acct", "data").await.unwrap();
    for c in "23456789abcdefghjkmnpqrstuvwxyz".chars() {
        store
            .create_container("acct", &format!("data-{c}"))
            .await
            .unwrap();
    }

    let allocator = NameAllocator::default();
    let err = allocator
        .allocate_unique(&store, "acct", "data", &[])
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::AllocationExhausted(_)));
}

#[tokio::test]
async fn test_update_name_carries_date_suffix() {
    let store = MemoryObjectStore::new();
    let allocator = NameAllocator::default();

    let name = allocator
        .allocate_update_name(&store, "acct", "Weather Stations", date!(2026 - 08 - 30))
        .await
        .unwrap();
    assert_eq!(name, "weatherstations-u20260830");

    store.create_container("acct", &name).await.unwrap();
    let second = allocator
        .allocate_update_name(&store, "acct", "Weather Stations", date!(2026 - 08 - 30))
        .await
        .unwrap();
    assert_eq!(second, "weatherstations-u20260830-2");
}

#[tokio::test]
async fn test_collisions_are_account_scoped() {
    let store = MemoryObjectStore::new();
    store.create_container("other", "mydatasetname").await.unwrap();

    let allocator = NameAllocator::default();
    let name = allocator
        .allocate_unique(&store, "acct", "My Dataset Name", &[])
        .await
        .unwrap();
    assert_eq!(name, "mydatasetname");
}
