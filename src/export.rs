//! Turning a natural-space crop rectangle into an actual pixel crop.

use image::DynamicImage;

use crate::error::CropError;
use crate::geometry::CropRect;

/// Integer pixel region inside an image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRegion {
    /// Rounds `rect` to whole pixels and fits it inside an image of
    /// `image_width` x `image_height`.
    pub fn from_natural(
        rect: &CropRect,
        image_width: u32,
        image_height: u32,
    ) -> Result<Self, CropError> {
        if image_width == 0 || image_height == 0 {
            return Err(CropError::InvalidDimensions {
                width: image_width as f64,
                height: image_height as f64,
            });
        }
        if !rect.is_finite() {
            return Err(CropError::EmptyRegion);
        }

        let left = rect.x.round().clamp(0.0, image_width as f64) as u32;
        let top = rect.y.round().clamp(0.0, image_height as f64) as u32;
        let right = rect.right().round().clamp(0.0, image_width as f64) as u32;
        let bottom = rect.bottom().round().clamp(0.0, image_height as f64) as u32;

        if right <= left || bottom <= top {
            return Err(CropError::EmptyRegion);
        }
        Ok(Self {
            x: left,
            y: top,
            width: right - left,
            height: bottom - top,
        })
    }
}

pub fn crop_image(image: &DynamicImage, rect: &CropRect) -> Result<DynamicImage, CropError> {
    let region = PixelRegion::from_natural(rect, image.width(), image.height())?;
    tracing::debug!(?region, "cropping {}x{} image", image.width(), image.height());
    Ok(image.crop_imm(region.x, region.y, region.width, region.height))
}
