#![warn(clippy::all, rust_2018_idioms)]

pub mod codec;
pub mod config;
pub mod document;
pub mod editor;
pub mod element;
pub mod error;
pub mod filter;
pub mod geo;
pub mod history;
pub mod id_generator;
pub mod input;
pub mod layer;
pub mod placement;
pub mod renderer;
pub mod tool;

pub use codec::{PngDataUrlCodec, RasterCodec, RasterPayload};
pub use config::EditorConfig;
pub use document::Document;
pub use editor::EditorSession;
pub use element::{DrawingObject, ObjectId, ObjectKind};
pub use error::{EditorError, GeoError, PlacementError};
pub use filter::Filter;
pub use geo::{CartesianPoint, GeoPoint, Ray};
pub use history::History;
pub use input::PointerEvent;
pub use layer::Layer;
pub use placement::{LandmarkCollection, LandmarkStore, PlacementController};
pub use tool::{Tool, ToolState};
