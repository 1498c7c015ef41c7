use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CropError {
    #[error("Image dimensions must be positive and finite (got {width}x{height})")]
    InvalidDimensions { width: f64, height: f64 },

    #[error("Aspect ratio must be positive and finite (got {0})")]
    DegenerateRatio(f64),

    /// A move or resize frame that would break the size, bounds or ratio
    /// constraints. The editor keeps its previous rectangle.
    #[error("Update rejected, rectangle unchanged")]
    NoOpUpdate,

    #[error("Crop region is empty after rounding to pixels")]
    EmptyRegion,
}
