//! Landmark placement: pick a point on the globe, draw, save.
//!
//! ```text
//!            pick (hit)              begin_save (valid name)
//!   Closed ─────────────► Open(geo) ─────────────────────────► Saving(geo)
//!     ▲                    │   ▲                                  │
//!     │       cancel       │   │       complete_save (failure)    │
//!     ├────────────────────┘   └──────────────────────────────────┤
//!     │                       complete_save (success)             │
//!     └───────────────────────────────────────────────────────────┘
//! ```

use log::{debug, error, info, warn};

use crate::codec::{PngDataUrlCodec, RasterCodec};
use crate::config::EditorConfig;
use crate::editor::EditorSession;
use crate::error::{PlacementError, StoreError};
use crate::geo::{GeoPoint, Ray, pick_to_geo};
use crate::placement::collection::LandmarkCollection;
use crate::placement::record::{LandmarkName, NewLandmark, StoredLandmark};
use crate::placement::store::LandmarkStore;

/// Where the controller is in the placement flow; the editor session lives
/// inside the open and saving states
#[derive(Debug, Default)]
pub enum PlacementState {
    #[default]
    Closed,
    Open(EditorSession),
    /// Waiting for persistence; edits and further saves are rejected
    Saving(EditorSession),
}

/// Data-free view of [`PlacementState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementPhase {
    Closed,
    Open,
    Saving,
}

impl PlacementState {
    pub fn phase(&self) -> PlacementPhase {
        match self {
            PlacementState::Closed => PlacementPhase::Closed,
            PlacementState::Open(_) => PlacementPhase::Open,
            PlacementState::Saving(_) => PlacementPhase::Saving,
        }
    }

    fn session(&self) -> Option<&EditorSession> {
        match self {
            PlacementState::Closed => None,
            PlacementState::Open(session) | PlacementState::Saving(session) => Some(session),
        }
    }
}

pub struct PlacementController {
    config: EditorConfig,
    state: PlacementState,
    collection: LandmarkCollection,
    codec: Box<dyn RasterCodec + Send + Sync>,
}

impl std::fmt::Debug for PlacementController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlacementController")
            .field("state", &self.state)
            .field("landmarks", &self.collection.len())
            .finish()
    }
}

impl PlacementController {
    pub fn new(config: EditorConfig, collection: LandmarkCollection) -> Self {
        Self::with_codec(config, collection, PngDataUrlCodec)
    }

    pub fn with_codec(
        config: EditorConfig,
        collection: LandmarkCollection,
        codec: impl RasterCodec + Send + Sync + 'static,
    ) -> Self {
        Self {
            config,
            state: PlacementState::Closed,
            collection,
            codec: Box::new(codec),
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn state(&self) -> &PlacementState {
        &self.state
    }

    pub fn phase(&self) -> PlacementPhase {
        self.state.phase()
    }

    pub fn collection(&self) -> &LandmarkCollection {
        &self.collection
    }

    /// Location of the pending landmark while open or saving
    pub fn location(&self) -> Option<GeoPoint> {
        self.state.session().map(EditorSession::location)
    }

    /// The editor, only while it accepts edits
    pub fn editor(&self) -> Option<&EditorSession> {
        match &self.state {
            PlacementState::Open(session) => Some(session),
            _ => None,
        }
    }

    pub fn editor_mut(&mut self) -> Option<&mut EditorSession> {
        match &mut self.state {
            PlacementState::Open(session) => Some(session),
            _ => None,
        }
    }

    /// Resolves a pointer ray against the globe.
    ///
    /// A hit opens the editor there, or moves the pending landmark if the
    /// editor is already open (the drawing is kept). A miss changes nothing
    /// and returns `Ok(None)`.
    pub fn pick(&mut self, ray: Ray) -> Result<Option<GeoPoint>, PlacementError> {
        if matches!(self.state, PlacementState::Saving(_)) {
            warn!("⏳ Ignoring pick while a save is in progress");
            return Err(PlacementError::SaveInProgress);
        }

        let geo = match pick_to_geo(ray, self.config.sphere_radius) {
            Ok(Some(geo)) => geo,
            Ok(None) => {
                debug!("🎯 Pick missed the globe");
                return Ok(None);
            }
            Err(e) => {
                warn!("⚠️ Ignoring pick: {e}");
                return Err(e.into());
            }
        };

        self.open_at(geo)?;
        Ok(Some(geo))
    }

    /// Opens the editor at a known location, or relocates the open one
    pub fn open_at(&mut self, geo: GeoPoint) -> Result<(), PlacementError> {
        match &mut self.state {
            PlacementState::Closed => {
                let session = EditorSession::open(geo, self.config.clone())?;
                self.state = PlacementState::Open(session);
                Ok(())
            }
            PlacementState::Open(session) => {
                session.relocate(geo);
                Ok(())
            }
            PlacementState::Saving(_) => Err(PlacementError::SaveInProgress),
        }
    }

    /// Closes the editor and throws the drawing away. No-op when closed.
    pub fn cancel(&mut self) -> Result<(), PlacementError> {
        match std::mem::take(&mut self.state) {
            PlacementState::Open(session) => {
                info!("✖️ Placement cancelled");
                session.close(true);
                Ok(())
            }
            PlacementState::Saving(session) => {
                self.state = PlacementState::Saving(session);
                Err(PlacementError::SaveInProgress)
            }
            PlacementState::Closed => Ok(()),
        }
    }

    /// Validates the name, exports the drawing and enters the saving state.
    ///
    /// Returns the record to hand to persistence. On any error the
    /// controller stays open with the drawing untouched.
    pub fn begin_save(&mut self, name: &str) -> Result<NewLandmark, PlacementError> {
        let session = match &self.state {
            PlacementState::Open(session) => session,
            PlacementState::Saving(_) => {
                warn!("⏳ Save requested while another is in progress");
                return Err(PlacementError::SaveInProgress);
            }
            PlacementState::Closed => return Err(PlacementError::NotOpen),
        };

        let name = LandmarkName::parse(name).inspect_err(|e| warn!("📝 Rejected landmark name: {e}"))?;
        let payload = session.export_payload(self.codec.as_ref())?;
        let record = NewLandmark::new(name, session.location(), payload);

        if let PlacementState::Open(session) = std::mem::take(&mut self.state) {
            self.state = PlacementState::Saving(session);
        }
        info!("💾 Saving landmark '{}' at ({:.4}, {:.4})", record.name, record.lat, record.lng);
        Ok(record)
    }

    /// Finishes a save with the persistence outcome.
    ///
    /// Success merges the landmark into the collection and closes the
    /// editor. Failure reopens the editor with everything as it was.
    pub fn complete_save(
        &mut self,
        result: Result<StoredLandmark, StoreError>,
    ) -> Result<StoredLandmark, PlacementError> {
        let session = match std::mem::take(&mut self.state) {
            PlacementState::Saving(session) => session,
            other => {
                self.state = other;
                return Err(PlacementError::NotSaving);
            }
        };

        match result {
            Ok(stored) => {
                self.collection.merge(stored.clone());
                session.close(false);
                info!("✅ Landmark '{}' saved as {}", stored.name, stored.id);
                Ok(stored)
            }
            Err(e) => {
                error!("❌ Saving landmark failed: {e}");
                self.state = PlacementState::Open(session);
                Err(PlacementError::Persistence(e))
            }
        }
    }

    /// Full save: validate and export, persist, then finish. The store call
    /// is the only suspension point.
    ///
    /// Dropping the returned future while the store call is pending leaves
    /// the controller in `Saving`, where `pick`, `cancel` and `begin_save`
    /// all fail with [`PlacementError::SaveInProgress`]. Recover by calling
    /// [`Self::complete_save`] with the outcome (an `Err` reopens the editor
    /// with the drawing intact).
    pub async fn save(
        &mut self,
        name: &str,
        store: &dyn LandmarkStore,
    ) -> Result<StoredLandmark, PlacementError> {
        let record = self.begin_save(name)?;
        let result = store.create(record).await;
        self.complete_save(result)
    }
}
