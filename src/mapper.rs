//! Conversion between display space and the image's natural pixel grid.

use crate::error::CropError;
use crate::geometry::{Bounds, CropRect, Point};

/// Rendered and intrinsic size of one loaded image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImageDimensions {
    pub display_width: f64,
    pub display_height: f64,
    pub natural_width: f64,
    pub natural_height: f64,
}

impl ImageDimensions {
    pub fn new(
        display_width: f64,
        display_height: f64,
        natural_width: f64,
        natural_height: f64,
    ) -> Result<Self, CropError> {
        let dims = Self {
            display_width,
            display_height,
            natural_width,
            natural_height,
        };
        dims.validate()?;
        Ok(dims)
    }

    pub fn validate(&self) -> Result<(), CropError> {
        let ok = |v: f64| v.is_finite() && v > 0.0;
        if !ok(self.display_width) || !ok(self.display_height) {
            return Err(CropError::InvalidDimensions {
                width: self.display_width,
                height: self.display_height,
            });
        }
        if !ok(self.natural_width) || !ok(self.natural_height) {
            return Err(CropError::InvalidDimensions {
                width: self.natural_width,
                height: self.natural_height,
            });
        }
        Ok(())
    }

    pub fn scale_x(&self) -> f64 {
        self.natural_width / self.display_width
    }

    pub fn scale_y(&self) -> f64 {
        self.natural_height / self.display_height
    }

    pub fn display_bounds(&self) -> Bounds {
        Bounds::new(self.display_width, self.display_height)
    }

    /// Same natural image rendered at a different size.
    pub fn with_display(&self, display_width: f64, display_height: f64) -> Result<Self, CropError> {
        Self::new(
            display_width,
            display_height,
            self.natural_width,
            self.natural_height,
        )
    }

    /// Converts a width/height ratio measured in natural pixels into the
    /// ratio the same shape has on screen.
    pub fn display_ratio(&self, natural_ratio: f64) -> f64 {
        natural_ratio * self.scale_y() / self.scale_x()
    }
}

/// One-shot conversion of a display rectangle into natural pixels.
pub fn to_natural(rect: &CropRect, dims: &ImageDimensions) -> CropRect {
    let (sx, sy) = (dims.scale_x(), dims.scale_y());
    CropRect::new(rect.x * sx, rect.y * sy, rect.width * sx, rect.height * sy)
}

pub fn to_display_rect(rect: &CropRect, dims: &ImageDimensions) -> CropRect {
    let (sx, sy) = (dims.scale_x(), dims.scale_y());
    CropRect::new(rect.x / sx, rect.y / sy, rect.width / sx, rect.height / sy)
}

/// Raw pointer coordinates to the container's local display space.
pub fn to_display(client_x: f64, client_y: f64, container_origin: Point) -> Point {
    Point::new(client_x - container_origin.x, client_y - container_origin.y)
}
