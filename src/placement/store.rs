//! The persistence collaborator and an in-memory implementation of it.

use futures::FutureExt;
use futures::channel::mpsc;
use futures::future::BoxFuture;
use log::{debug, info};
use parking_lot::Mutex;

use crate::error::StoreError;
use crate::placement::record::{LandmarkId, NewLandmark, StoredLandmark};

/// Where landmarks are persisted
pub trait LandmarkStore: Send + Sync {
    /// Persists a new landmark and returns it with its assigned id
    fn create(&self, landmark: NewLandmark) -> BoxFuture<'_, Result<StoredLandmark, StoreError>>;

    fn list_all(&self) -> BoxFuture<'_, Result<Vec<StoredLandmark>, StoreError>>;
}

#[derive(Default)]
struct MemoryState {
    records: Vec<StoredLandmark>,
    created: Vec<NewLandmark>,
    fail_next: Option<StoreError>,
    subscribers: Vec<mpsc::UnboundedSender<StoredLandmark>>,
}

/// Keeps landmarks in memory and pushes every insert to realtime subscribers
#[derive(Default)]
pub struct MemoryLandmarkStore {
    state: Mutex<MemoryState>,
}

impl MemoryLandmarkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that already holds `records`
    pub fn with_records(records: Vec<StoredLandmark>) -> Self {
        let store = Self::new();
        store.state.lock().records = records;
        store
    }

    /// Makes the next `create` fail with `error`
    pub fn fail_next(&self, error: StoreError) {
        self.state.lock().fail_next = Some(error);
    }

    /// Every record `create` was called with, including failed ones
    pub fn created(&self) -> Vec<NewLandmark> {
        self.state.lock().created.clone()
    }

    pub fn len(&self) -> usize {
        self.state.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stream of every landmark inserted from now on
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<StoredLandmark> {
        let (tx, rx) = mpsc::unbounded();
        self.state.lock().subscribers.push(tx);
        rx
    }

    fn insert(&self, landmark: NewLandmark) -> Result<StoredLandmark, StoreError> {
        let mut state = self.state.lock();
        state.created.push(landmark.clone());
        if let Some(error) = state.fail_next.take() {
            debug!("💥 Injected store failure: {error}");
            return Err(error);
        }

        let stored = landmark.into_stored(LandmarkId::new_v4());
        state.records.push(stored.clone());
        // Drop subscribers whose receiver is gone
        state
            .subscribers
            .retain(|tx| tx.unbounded_send(stored.clone()).is_ok());
        info!("💾 Stored landmark '{}' as {}", stored.name, stored.id);
        Ok(stored)
    }
}

impl LandmarkStore for MemoryLandmarkStore {
    fn create(&self, landmark: NewLandmark) -> BoxFuture<'_, Result<StoredLandmark, StoreError>> {
        futures::future::ready(self.insert(landmark)).boxed()
    }

    fn list_all(&self) -> BoxFuture<'_, Result<Vec<StoredLandmark>, StoreError>> {
        let records = self.state.lock().records.clone();
        futures::future::ready(Ok(records)).boxed()
    }
}
