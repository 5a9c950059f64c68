pub mod color;
pub mod error;
pub mod geometry;
pub mod id;
pub mod model;
pub mod props;
pub mod scene;

pub use color::Color;
pub use error::SceneError;
pub use geometry::{CanvasSize, Geometry};
pub use id::ObjectId;
pub use model::*;
pub use props::{PropKey, PropValue, PropertySnapshot};
pub use scene::{Scene, SceneAdapter, SceneSnapshot};

// Re-export kurbo so downstream crates share one geometry type.
pub use kurbo::Rect;
