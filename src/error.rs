use thiserror::Error;

use crate::element::ObjectId;

/// Errors from the geodesic projection math
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GeoError {
    /// The input geometry cannot produce a meaningful answer
    /// (zero-length vector, point at the sphere center, non-positive radius)
    #[error("degenerate geometry: {0}")]
    Degenerate(&'static str),
}

/// Reported when undo/redo would move past either end of the history
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum HistoryError {
    #[error("already at the oldest history entry")]
    AtHistoryStart,
    #[error("already at the newest history entry")]
    AtHistoryEnd,
}

/// Errors raised by the drawing document
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("no object is selected")]
    NoActiveSelection,

    #[error("no object with id {0}")]
    UnknownObject(ObjectId),

    #[error("no layer at index {0}")]
    UnknownLayer(usize),

    #[error("object {0} is not a text object")]
    NotText(ObjectId),

    #[error("failed to (de)serialize document: {0}")]
    Snapshot(#[from] serde_json::Error),
}

/// Errors that can occur while flattening the document
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RenderError {
    #[error("invalid canvas size {width}x{height}")]
    InvalidCanvasSize { width: u32, height: u32 },

    #[error("text raster of {width}x{height} pixels exceeds the coverage limit")]
    TextTooLarge { width: u32, height: u32 },
}

/// Errors from encoding/decoding raster payloads
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("image codec failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("payload is not a base64 PNG data URL")]
    NotADataUrl,

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Errors while loading or validating the editor configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Any error an editor session operation can report
#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// User input that fails the landmark record rules
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing name")]
    MissingName,

    #[error("name is {len} characters long, at most {max} are allowed")]
    NameTooLong { len: usize, max: usize },
}

/// Failure reported by the persistence collaborator
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("landmark store rejected the request: {0}")]
    Rejected(String),

    #[error("landmark store is unavailable")]
    Unavailable,
}

/// Errors surfaced by the landmark placement controller
#[derive(Debug, Error)]
pub enum PlacementError {
    #[error("cannot save landmark: {0}")]
    Validation(#[from] ValidationError),

    #[error("saving the landmark failed, your drawing is still open: {0}")]
    Persistence(#[from] StoreError),

    #[error(transparent)]
    Editor(#[from] EditorError),

    #[error(transparent)]
    Geo(#[from] GeoError),

    #[error("no landmark editor is open")]
    NotOpen,

    #[error("a save is already in progress")]
    SaveInProgress,

    #[error("no save is in progress")]
    NotSaving,
}
