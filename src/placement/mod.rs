mod collection;
mod controller;
mod record;
mod store;

pub use collection::{Billboard, LandmarkCollection};
pub use controller::{PlacementController, PlacementPhase, PlacementState};
pub use record::{LandmarkId, LandmarkName, MAX_NAME_CHARS, NewLandmark, StoredLandmark};
pub use store::{LandmarkStore, MemoryLandmarkStore};
