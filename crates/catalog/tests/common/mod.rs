// Shared test harness: in-memory collaborators wired the way the
// serving layer would wire the real ones.
#![allow(dead_code)]

pub mod fixtures;

use async_trait::async_trait;
use curator_catalog::{CatalogResult, EditCoordinator, NominationService, SearchMirror};
use curator_core::{CatalogConfig, DatasetId};
use curator_metadata::MemoryStore;
use curator_storage::{MemoryObjectStore, ObjectStore, TokenIssuer};
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

/// Search mirror that records every refresh for assertions.
#[derive(Default)]
pub struct RecordingSearchMirror {
    refreshed: Mutex<Vec<DatasetId>>,
}

impl RecordingSearchMirror {
    pub fn refreshed(&self) -> Vec<DatasetId> {
        self.refreshed.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchMirror for RecordingSearchMirror {
    async fn refresh_document(&self, dataset_id: DatasetId) -> CatalogResult<()> {
        self.refreshed.lock().unwrap().push(dataset_id);
        Ok(())
    }
}

pub struct Harness {
    pub metadata: Arc<MemoryStore>,
    pub store: Arc<MemoryObjectStore>,
    pub search: Arc<RecordingSearchMirror>,
    pub edits: EditCoordinator,
    pub nominations: NominationService,
    pub cancel: CancellationToken,
}

impl Harness {
    pub fn new() -> Self {
        let metadata = Arc::new(MemoryStore::new());
        let store = Arc::new(MemoryObjectStore::new());
        let search = Arc::new(RecordingSearchMirror::default());
        let config = CatalogConfig::for_testing();
        let tokens = Arc::new(TokenIssuer::for_testing(store.clone()));

        let edits = EditCoordinator::new(
            metadata.clone(),
            store.clone(),
            tokens,
            search.clone(),
            config.clone(),
        );
        let nominations = NominationService::new(metadata.clone(), store.clone(), config);

        Self {
            metadata,
            store,
            search,
            edits,
            nominations,
            cancel: CancellationToken::new(),
        }
    }

    /// Seed a published dataset and create its content container.
    pub async fn seed_published_dataset(&self) -> curator_core::Dataset {
        let dataset = fixtures::dataset();
        self.metadata.seed_dataset(&dataset);
        let container = dataset.container.as_ref().unwrap();
        self.store
            .create_container(&container.account, &container.container)
            .await
            .unwrap();
        dataset
    }
}
