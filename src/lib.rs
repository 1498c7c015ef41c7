//! Interactive crop-region editing.
//!
//! A [`CropEditor`] keeps one crop rectangle over a displayed image and turns
//! pointer events into moves and handle resizes, with an optional aspect
//! ratio lock. [`InteractionController`] adds the raw-event side: container
//! offsets, window-wide capture during a gesture and cursor hints. The
//! rectangle lives in display space; [`CropEditor::rectangle_natural`] maps it
//! onto the image's own pixel grid.

pub mod config;
pub mod controller;
pub mod error;
pub mod export;
pub mod geometry;
pub mod mapper;
pub mod presets;
pub mod region;

pub use config::{EditorConfig, Settings};
pub use controller::{CursorHint, InteractionController, ListenerRegistry, Subscription};
pub use error::CropError;
pub use export::{PixelRegion, crop_image};
pub use geometry::{Bounds, CropRect, Point, ResizeHandle};
pub use mapper::ImageDimensions;
pub use presets::AspectRatioMode;
pub use region::{CropEditor, InteractionMode};
