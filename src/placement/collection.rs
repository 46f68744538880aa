use std::sync::Arc;

use futures::{Stream, StreamExt};
use log::{debug, info};
use parking_lot::RwLock;

use crate::error::StoreError;
use crate::geo::{CartesianPoint, billboard_anchor};
use crate::placement::record::{LandmarkId, StoredLandmark};
use crate::placement::store::LandmarkStore;

/// Where the rendering host should draw a landmark sprite
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Billboard {
    pub id: LandmarkId,
    pub anchor: CartesianPoint,
}

/// Shared, append-only list of known landmarks.
///
/// Cloning gives another handle to the same list. Inserts are keyed by id,
/// so the same landmark arriving twice (a save and its realtime echo) is
/// kept once.
#[derive(Debug, Clone, Default)]
pub struct LandmarkCollection {
    landmarks: Arc<RwLock<Vec<StoredLandmark>>>,
}

impl LandmarkCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the landmark unless one with the same id exists; returns
    /// whether it was new
    pub fn merge(&self, landmark: StoredLandmark) -> bool {
        let mut landmarks = self.landmarks.write();
        if landmarks.iter().any(|l| l.id == landmark.id) {
            debug!("♻️ Landmark {} already known", landmark.id);
            return false;
        }
        debug!("📌 Landmark {} '{}' added", landmark.id, landmark.name);
        landmarks.push(landmark);
        true
    }

    /// Merges every landmark, returning how many were new
    pub fn extend(&self, landmarks: impl IntoIterator<Item = StoredLandmark>) -> usize {
        landmarks
            .into_iter()
            .map(|landmark| self.merge(landmark))
            .filter(|added| *added)
            .count()
    }

    pub fn get(&self, id: LandmarkId) -> Option<StoredLandmark> {
        self.landmarks.read().iter().find(|l| l.id == id).cloned()
    }

    pub fn contains(&self, id: LandmarkId) -> bool {
        self.landmarks.read().iter().any(|l| l.id == id)
    }

    pub fn len(&self) -> usize {
        self.landmarks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.read().is_empty()
    }

    /// Copy of the current list, in arrival order
    pub fn to_vec(&self) -> Vec<StoredLandmark> {
        self.landmarks.read().clone()
    }

    /// Fetches every persisted landmark and merges it
    pub async fn load_from(&self, store: &dyn LandmarkStore) -> Result<usize, StoreError> {
        let landmarks = store.list_all().await?;
        let total = landmarks.len();
        let added = self.extend(landmarks);
        info!("🌍 Loaded {total} landmarks ({added} new)");
        Ok(added)
    }

    /// Applies realtime inserts until the stream ends; returns how many were new
    pub async fn follow<S>(&self, mut inserts: S) -> usize
    where
        S: Stream<Item = StoredLandmark> + Unpin,
    {
        let mut added = 0;
        while let Some(landmark) = inserts.next().await {
            if self.merge(landmark) {
                added += 1;
            }
        }
        debug!("📡 Realtime feed ended after {added} new landmarks");
        added
    }

    /// Sprite anchors for every landmark on a sphere of `radius`
    pub fn billboards(&self, radius: f64, lift: f64) -> Vec<Billboard> {
        self.landmarks
            .read()
            .iter()
            .map(|l| Billboard {
                id: l.id,
                anchor: billboard_anchor(l.location(), radius, lift),
            })
            .collect()
    }
}
