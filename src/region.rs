//! The crop region state machine.
//!
//! [`CropEditor`] owns the rectangle and the interaction mode. Pointer
//! events move it between `Idle`, `Dragging` and `Resizing`; the geometry of
//! each frame is computed by the pure functions in this module, always from
//! the rectangle as it was when the pointer went down.

use crate::config::EditorConfig;
use crate::error::CropError;
use crate::geometry::{self, Bounds, CropRect, Point, ResizeHandle};
use crate::mapper::{self, ImageDimensions};

/// Largest allowed drift of `width / height` from a locked ratio.
pub const RATIO_TOLERANCE: f64 = 1e-6;

const EPSILON: f64 = 1e-9;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InteractionMode {
    #[default]
    Idle,
    Dragging,
    Resizing(ResizeHandle),
}

impl InteractionMode {
    pub fn is_active(self) -> bool {
        !matches!(self, InteractionMode::Idle)
    }
}

/// Constraints applied to every resize frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResizeLimits {
    pub min_size: f64,
    pub aspect_ratio: Option<f64>,
}

/// Pointer position and rectangle captured on pointer-down.
#[derive(Clone, Copy, Debug)]
struct Grab {
    pointer: Point,
    rect: CropRect,
}

pub fn validate_ratio(ratio: f64) -> Result<f64, CropError> {
    if ratio.is_finite() && ratio > 0.0 {
        Ok(ratio)
    } else {
        Err(CropError::DegenerateRatio(ratio))
    }
}

/// Centred rectangle covering `fraction` of each bounds dimension, narrowed
/// to `ratio` when one is given.
pub fn default_rect(bounds: Bounds, fraction: f64, ratio: Option<f64>) -> CropRect {
    let mut width = bounds.width * fraction;
    let mut height = bounds.height * fraction;
    if let Some(ratio) = ratio {
        if width / height > ratio {
            width = height * ratio;
        } else {
            height = width / ratio;
        }
    }
    CropRect::new(
        (bounds.width - width) * 0.5,
        (bounds.height - height) * 0.5,
        width,
        height,
    )
}

/// Moves `start` by `delta`, keeping it inside `bounds`.
pub fn drag_rect(start: CropRect, delta: Point, bounds: Bounds) -> Result<CropRect, CropError> {
    let moved = start.translate(delta.x, delta.y);
    if !moved.is_finite() {
        return Err(CropError::NoOpUpdate);
    }
    Ok(geometry::clamp(moved, bounds))
}

/// Reshapes `start` to `ratio` around its centre, keeping the larger
/// dimension where the bounds allow it.
pub fn fit_to_ratio(rect: CropRect, ratio: f64, bounds: Bounds) -> CropRect {
    let center = rect.center();
    let max_dim = rect.width.max(rect.height);

    let (mut width, mut height) = if ratio >= 1.0 {
        (max_dim, max_dim / ratio)
    } else {
        (max_dim * ratio, max_dim)
    };

    if width > bounds.width {
        width = bounds.width;
        height = width / ratio;
    }
    if height > bounds.height {
        height = bounds.height;
        width = height * ratio;
    }

    CropRect::new(
        place(center.x - width * 0.5, width, bounds.width),
        place(center.y - height * 0.5, height, bounds.height),
        width,
        height,
    )
}

/// Resizes `start` by dragging `handle` by `delta`.
///
/// The size floor is applied to the delta first, then the result is fitted
/// to `bounds`. Frames that cannot satisfy the floor, the bounds and the
/// ratio at once return [`CropError::NoOpUpdate`].
pub fn resize_rect(
    start: CropRect,
    handle: ResizeHandle,
    delta: Point,
    bounds: Bounds,
    limits: ResizeLimits,
) -> Result<CropRect, CropError> {
    if !delta.x.is_finite() || !delta.y.is_finite() || !start.is_finite() {
        return Err(CropError::NoOpUpdate);
    }

    // A rectangle already below the floor may shrink no further, but may grow.
    let min_w = limits.min_size.min(bounds.width).min(start.width);
    let min_h = limits.min_size.min(bounds.height).min(start.height);

    let resized = match limits.aspect_ratio {
        None => resize_free(start, handle, delta, bounds, min_w, min_h),
        Some(ratio) => {
            let ratio = validate_ratio(ratio).map_err(|_| CropError::NoOpUpdate)?;
            if handle.is_corner() {
                resize_corner_locked(start, handle, delta, bounds, min_w.max(min_h * ratio), ratio)?
            } else {
                resize_edge_locked(start, handle, delta, bounds, min_w, min_h, ratio)?
            }
        }
    };

    commit(resized, bounds, min_w, min_h, limits.aspect_ratio)
}

fn resize_free(
    start: CropRect,
    handle: ResizeHandle,
    delta: Point,
    bounds: Bounds,
    min_w: f64,
    min_h: f64,
) -> CropRect {
    let (mut left, mut top, mut right, mut bottom) =
        (start.x, start.y, start.right(), start.bottom());

    if handle.moves_left() {
        left = (left + delta.x).min(right - min_w).max(0.0);
    }
    if handle.moves_right() {
        right = (right + delta.x).max(left + min_w).min(bounds.width);
    }
    if handle.moves_top() {
        top = (top + delta.y).min(bottom - min_h).max(0.0);
    }
    if handle.moves_bottom() {
        bottom = (bottom + delta.y).max(top + min_h).min(bounds.height);
    }

    CropRect::from_edges(left, top, right, bottom)
}

fn resize_corner_locked(
    start: CropRect,
    handle: ResizeHandle,
    delta: Point,
    bounds: Bounds,
    floor: f64,
    ratio: f64,
) -> Result<CropRect, CropError> {
    let (left, top) = (handle.moves_left(), handle.moves_top());
    let anchor_x = if left { start.right() } else { start.x };
    let anchor_y = if top { start.bottom() } else { start.y };

    let grow_w = if left { -delta.x } else { delta.x };
    let grow_h = if top { -delta.y } else { delta.y };

    // The axis with the larger movement, measured in width units, governs.
    let mut width = if grow_w.abs() >= (grow_h * ratio).abs() {
        start.width + grow_w
    } else {
        (start.height + grow_h) * ratio
    };
    width = width.max(floor);

    let room_w = if left { anchor_x } else { bounds.width - anchor_x };
    let room_h = if top { anchor_y } else { bounds.height - anchor_y };
    width = width.min(room_w).min(room_h * ratio);
    if width < floor - EPSILON {
        return Err(CropError::NoOpUpdate);
    }

    let height = width / ratio;
    let x = if left { anchor_x - width } else { anchor_x };
    let y = if top { anchor_y - height } else { anchor_y };
    Ok(CropRect::new(x, y, width, height))
}

fn resize_edge_locked(
    start: CropRect,
    handle: ResizeHandle,
    delta: Point,
    bounds: Bounds,
    min_w: f64,
    min_h: f64,
    ratio: f64,
) -> Result<CropRect, CropError> {
    let center = start.center();

    if handle.moves_left() || handle.moves_right() {
        let left = handle.moves_left();
        let anchor_x = if left { start.right() } else { start.x };
        let floor = min_w.max(min_h * ratio);
        let room_w = if left { anchor_x } else { bounds.width - anchor_x };

        let mut width = (start.width + if left { -delta.x } else { delta.x }).max(floor);
        width = width.min(room_w).min(bounds.height * ratio);
        if width < floor - EPSILON {
            return Err(CropError::NoOpUpdate);
        }

        let height = width / ratio;
        let x = if left { anchor_x - width } else { anchor_x };
        let y = place(center.y - height * 0.5, height, bounds.height);
        Ok(CropRect::new(x, y, width, height))
    } else {
        let top = handle.moves_top();
        let anchor_y = if top { start.bottom() } else { start.y };
        let floor = min_h.max(min_w / ratio);
        let room_h = if top { anchor_y } else { bounds.height - anchor_y };

        let mut height = (start.height + if top { -delta.y } else { delta.y }).max(floor);
        height = height.min(room_h).min(bounds.width / ratio);
        if height < floor - EPSILON {
            return Err(CropError::NoOpUpdate);
        }

        let width = height * ratio;
        let y = if top { anchor_y - height } else { anchor_y };
        let x = place(center.x - width * 0.5, width, bounds.width);
        Ok(CropRect::new(x, y, width, height))
    }
}

/// Start coordinate for a span of `len` near `desired`, inside `[0, limit]`.
fn place(desired: f64, len: f64, limit: f64) -> f64 {
    desired.min(limit - len).max(0.0)
}

/// Final gate of a resize frame: the rectangle must be finite, inside the
/// bounds, above the floor and on the ratio.
fn commit(
    rect: CropRect,
    bounds: Bounds,
    min_w: f64,
    min_h: f64,
    ratio: Option<f64>,
) -> Result<CropRect, CropError> {
    let inside = rect.x >= -EPSILON
        && rect.y >= -EPSILON
        && rect.right() <= bounds.width + EPSILON
        && rect.bottom() <= bounds.height + EPSILON;
    let sized = rect.width > 0.0
        && rect.height > 0.0
        && rect.width >= min_w - EPSILON
        && rect.height >= min_h - EPSILON;
    if !rect.is_finite() || !inside || !sized {
        return Err(CropError::NoOpUpdate);
    }

    let snapped = geometry::clamp(rect, bounds);
    if let Some(ratio) = ratio {
        if (snapped.width / snapped.height - ratio).abs() >= RATIO_TOLERANCE {
            return Err(CropError::NoOpUpdate);
        }
    }
    Ok(snapped)
}

/// One crop rectangle over one image, driven by pointer events in display
/// space.
#[derive(Debug)]
pub struct CropEditor {
    config: EditorConfig,
    dims: Option<ImageDimensions>,
    rect: Option<CropRect>,
    mode: InteractionMode,
    grab: Option<Grab>,
    aspect_ratio: Option<f64>,
    /// Set when the lock was requested in natural pixels. The display ratio
    /// is derived from it again whenever the display size changes.
    natural_ratio: Option<f64>,
}

impl Default for CropEditor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl CropEditor {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config: config.sanitized(),
            dims: None,
            rect: None,
            mode: InteractionMode::Idle,
            grab: None,
            aspect_ratio: None,
            natural_ratio: None,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Starts over with a freshly loaded image. Invalid dimensions leave the
    /// editor without an image.
    pub fn initialize(&mut self, dims: ImageDimensions) -> Result<CropRect, CropError> {
        self.end_gesture();
        if let Err(e) = dims.validate() {
            tracing::warn!("refusing to initialize crop region: {}", e);
            self.dims = None;
            self.rect = None;
            return Err(e);
        }

        if let Some(natural) = self.natural_ratio {
            self.aspect_ratio = Some(dims.display_ratio(natural));
        }
        let rect = self.default_for(&dims);
        self.dims = Some(dims);
        self.rect = Some(rect);
        tracing::debug!(?dims, ?rect, "crop region initialized");
        Ok(rect)
    }

    /// Puts the default rectangle back for the current image.
    pub fn reset(&mut self) -> Option<CropRect> {
        let dims = self.dims?;
        self.end_gesture();
        let rect = self.default_for(&dims);
        self.rect = Some(rect);
        tracing::debug!(?rect, "crop region reset");
        Some(rect)
    }

    /// The display size of the image changed while the natural size stayed
    /// the same. The rectangle is carried over through natural space, and a
    /// ratio locked in natural pixels is converted for the new layout.
    /// Ignored while a gesture is in progress.
    pub fn relayout(&mut self, display_width: f64, display_height: f64) -> Result<(), CropError> {
        let Some(dims) = self.dims else {
            return Ok(());
        };
        if self.mode.is_active()
            || (dims.display_width == display_width && dims.display_height == display_height)
        {
            return Ok(());
        }

        let new_dims = dims.with_display(display_width, display_height)?;
        let bounds = new_dims.display_bounds();
        if let Some(natural) = self.natural_ratio {
            self.aspect_ratio = Some(new_dims.display_ratio(natural));
        }
        if let Some(rect) = self.rect {
            let natural = mapper::to_natural(&rect, &dims);
            let mapped = mapper::to_display_rect(&natural, &new_dims);
            let mut mapped = geometry::clamp(mapped, bounds);
            if let Some(ratio) = self.aspect_ratio {
                if (mapped.width / mapped.height - ratio).abs() >= RATIO_TOLERANCE {
                    mapped = fit_to_ratio(mapped, ratio, bounds);
                }
            }
            self.rect = Some(mapped);
        }
        self.dims = Some(new_dims);
        Ok(())
    }

    /// Locks (or with `None` unlocks) the display-space ratio and reshapes
    /// the current rectangle to match.
    pub fn set_aspect_ratio(&mut self, ratio: Option<f64>) -> Result<(), CropError> {
        let ratio = ratio
            .map(validate_ratio)
            .transpose()
            .inspect_err(|e| tracing::warn!("{}", e))?;
        self.natural_ratio = None;
        self.apply_ratio(ratio);
        Ok(())
    }

    /// Same as [`set_aspect_ratio`](Self::set_aspect_ratio) with the ratio
    /// given in natural pixels. The lock follows later display resizes.
    pub fn set_natural_aspect_ratio(&mut self, ratio: Option<f64>) -> Result<(), CropError> {
        let natural = ratio
            .map(validate_ratio)
            .transpose()
            .inspect_err(|e| tracing::warn!("{}", e))?;
        let display = natural.map(|r| self.dims.map_or(r, |d| d.display_ratio(r)));
        self.natural_ratio = natural;
        self.apply_ratio(display);
        Ok(())
    }

    fn apply_ratio(&mut self, ratio: Option<f64>) {
        self.aspect_ratio = ratio;
        tracing::debug!(?ratio, natural = ?self.natural_ratio, "aspect ratio changed");

        if let (Some(ratio), Some(rect), Some(dims)) = (ratio, self.rect, self.dims) {
            let fitted = fit_to_ratio(rect, ratio, dims.display_bounds());
            self.rect = Some(fitted);
            if let Some(grab) = &mut self.grab {
                grab.rect = fitted;
            }
        }
    }

    pub fn on_pointer_down(&mut self, x: f64, y: f64) -> InteractionMode {
        if self.mode.is_active() {
            return self.mode;
        }
        let Some(rect) = self.rect else {
            return InteractionMode::Idle;
        };
        if !x.is_finite() || !y.is_finite() {
            return InteractionMode::Idle;
        }

        let hit = geometry::hit_test_handle(&rect, x, y, self.config.handle_size);
        let mode = if let Some(handle) = hit {
            InteractionMode::Resizing(handle)
        } else if geometry::contains_point(&rect, x, y) {
            InteractionMode::Dragging
        } else {
            InteractionMode::Idle
        };

        if mode.is_active() {
            self.grab = Some(Grab {
                pointer: Point::new(x, y),
                rect,
            });
            tracing::debug!(?mode, x, y, "pointer down");
        }
        self.mode = mode;
        mode
    }

    /// Applies one pointer move. Returns whether the rectangle changed.
    pub fn on_pointer_move(&mut self, x: f64, y: f64) -> bool {
        let (Some(grab), Some(dims)) = (self.grab, self.dims) else {
            return false;
        };
        let delta = Point::new(x - grab.pointer.x, y - grab.pointer.y);
        let bounds = dims.display_bounds();

        let result = match self.mode {
            InteractionMode::Idle => return false,
            InteractionMode::Dragging => drag_rect(grab.rect, delta, bounds),
            InteractionMode::Resizing(handle) => {
                resize_rect(grab.rect, handle, delta, bounds, self.limits())
            }
        };

        match result {
            Ok(rect) => {
                let changed = self.rect != Some(rect);
                self.rect = Some(rect);
                changed
            }
            Err(e) => {
                tracing::trace!(mode = ?self.mode, x, y, "{}", e);
                false
            }
        }
    }

    pub fn on_pointer_up(&mut self) {
        if self.mode.is_active() {
            tracing::debug!(mode = ?self.mode, rect = ?self.rect, "pointer up");
        }
        self.end_gesture();
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    /// Locked ratio in display space.
    pub fn aspect_ratio(&self) -> Option<f64> {
        self.aspect_ratio
    }

    /// Locked ratio in natural pixels, if it was set that way.
    pub fn natural_aspect_ratio(&self) -> Option<f64> {
        self.natural_ratio
    }

    pub fn dimensions(&self) -> Option<ImageDimensions> {
        self.dims
    }

    pub fn has_image(&self) -> bool {
        self.dims.is_some()
    }

    /// Current rectangle in display space.
    pub fn rectangle(&self) -> Option<CropRect> {
        self.rect
    }

    /// Current rectangle in natural pixels, for extracting the crop.
    pub fn rectangle_natural(&self) -> Option<CropRect> {
        Some(mapper::to_natural(&self.rect?, &self.dims?))
    }

    fn limits(&self) -> ResizeLimits {
        ResizeLimits {
            min_size: self.config.min_size,
            aspect_ratio: self.aspect_ratio,
        }
    }

    fn default_for(&self, dims: &ImageDimensions) -> CropRect {
        default_rect(
            dims.display_bounds(),
            self.config.default_fraction,
            self.aspect_ratio,
        )
    }

    fn end_gesture(&mut self) {
        self.mode = InteractionMode::Idle;
        self.grab = None;
    }
}
