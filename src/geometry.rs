//! Rectangle primitives, handle hit-testing and clamping.
//!
//! Everything here works in display space: pixels of the rendered image,
//! origin at its top-left corner.

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Size of the area a rectangle must stay inside.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Top-left anchored rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Nominal centre of a handle on this rectangle.
    pub fn handle_position(&self, handle: ResizeHandle) -> Point {
        let c = self.center();
        match handle {
            ResizeHandle::NorthWest => Point::new(self.x, self.y),
            ResizeHandle::NorthEast => Point::new(self.right(), self.y),
            ResizeHandle::SouthWest => Point::new(self.x, self.bottom()),
            ResizeHandle::SouthEast => Point::new(self.right(), self.bottom()),
            ResizeHandle::North => Point::new(c.x, self.y),
            ResizeHandle::South => Point::new(c.x, self.bottom()),
            ResizeHandle::West => Point::new(self.x, c.y),
            ResizeHandle::East => Point::new(self.right(), c.y),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResizeHandle {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl ResizeHandle {
    pub const CORNERS: [ResizeHandle; 4] = [
        ResizeHandle::NorthWest,
        ResizeHandle::NorthEast,
        ResizeHandle::SouthWest,
        ResizeHandle::SouthEast,
    ];

    pub const EDGES: [ResizeHandle; 4] = [
        ResizeHandle::North,
        ResizeHandle::South,
        ResizeHandle::West,
        ResizeHandle::East,
    ];

    pub fn is_corner(self) -> bool {
        matches!(
            self,
            ResizeHandle::NorthEast
                | ResizeHandle::NorthWest
                | ResizeHandle::SouthEast
                | ResizeHandle::SouthWest
        )
    }

    pub fn moves_left(self) -> bool {
        matches!(
            self,
            ResizeHandle::West | ResizeHandle::NorthWest | ResizeHandle::SouthWest
        )
    }

    pub fn moves_right(self) -> bool {
        matches!(
            self,
            ResizeHandle::East | ResizeHandle::NorthEast | ResizeHandle::SouthEast
        )
    }

    pub fn moves_top(self) -> bool {
        matches!(
            self,
            ResizeHandle::North | ResizeHandle::NorthWest | ResizeHandle::NorthEast
        )
    }

    pub fn moves_bottom(self) -> bool {
        matches!(
            self,
            ResizeHandle::South | ResizeHandle::SouthWest | ResizeHandle::SouthEast
        )
    }
}

/// Inclusive containment test.
pub fn contains_point(rect: &CropRect, x: f64, y: f64) -> bool {
    x >= rect.x && x <= rect.right() && y >= rect.y && y <= rect.bottom()
}

/// Finds the handle whose square hit zone (side `handle_size`) contains the
/// point. Corners win over edges where zones overlap.
pub fn hit_test_handle(
    rect: &CropRect,
    x: f64,
    y: f64,
    handle_size: f64,
) -> Option<ResizeHandle> {
    let half = handle_size * 0.5;
    let within = |handle: ResizeHandle| {
        let p = rect.handle_position(handle);
        (x - p.x).abs() <= half && (y - p.y).abs() <= half
    };

    ResizeHandle::CORNERS
        .into_iter()
        .chain(ResizeHandle::EDGES)
        .find(|&handle| within(handle))
}

/// Shifts `rect` back inside `bounds`. Width and height are only truncated
/// when they exceed the bounds themselves.
pub fn clamp(rect: CropRect, bounds: Bounds) -> CropRect {
    let mut out = rect;
    out.width = out.width.min(bounds.width);
    out.height = out.height.min(bounds.height);

    if out.x < 0.0 {
        out.x = 0.0;
    }
    if out.x + out.width > bounds.width {
        out.x = bounds.width - out.width;
    }
    if out.y < 0.0 {
        out.y = 0.0;
    }
    if out.y + out.height > bounds.height {
        out.y = bounds.height - out.height;
    }
    out
}
