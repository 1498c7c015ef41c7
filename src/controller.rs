//! Binds raw pointer events to a [`CropEditor`].
//!
//! While a drag or resize is in progress the controller holds a
//! [`Subscription`] from its [`ListenerRegistry`]. The host routes pointer
//! moves and releases from the whole window (not just the image container)
//! to the controller only while [`InteractionController::is_capturing`] is
//! true. Every way out of a gesture hands the subscription back.

use std::collections::BTreeSet;

use crate::config::EditorConfig;
use crate::error::CropError;
use crate::geometry::{self, CropRect, Point, ResizeHandle};
use crate::mapper::{self, ImageDimensions};
use crate::region::{CropEditor, InteractionMode};

/// Capability to receive pointer events outside the container.
#[must_use]
#[derive(Debug, PartialEq, Eq)]
pub struct Subscription {
    id: u64,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Arena of live window-wide pointer subscriptions.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    next_id: u64,
    active: BTreeSet<u64>,
}

impl ListenerRegistry {
    pub fn acquire(&mut self) -> Subscription {
        let id = self.next_id;
        self.next_id += 1;
        self.active.insert(id);
        tracing::trace!(id, "pointer listeners attached");
        Subscription { id }
    }

    pub fn release(&mut self, subscription: Subscription) {
        if self.active.remove(&subscription.id) {
            tracing::trace!(id = subscription.id, "pointer listeners detached");
        }
    }

    pub fn is_active(&self, subscription: &Subscription) -> bool {
        self.active.contains(&subscription.id)
    }

    pub fn active(&self) -> usize {
        self.active.len()
    }
}

/// Advisory cursor for the pointer position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CursorHint {
    #[default]
    Default,
    Move,
    Resize(ResizeHandle),
}

impl CursorHint {
    /// CSS cursor name.
    pub fn name(self) -> &'static str {
        match self {
            CursorHint::Default => "default",
            CursorHint::Move => "move",
            CursorHint::Resize(handle) => match handle {
                ResizeHandle::North => "n-resize",
                ResizeHandle::South => "s-resize",
                ResizeHandle::East => "e-resize",
                ResizeHandle::West => "w-resize",
                ResizeHandle::NorthEast => "ne-resize",
                ResizeHandle::NorthWest => "nw-resize",
                ResizeHandle::SouthEast => "se-resize",
                ResizeHandle::SouthWest => "sw-resize",
            },
        }
    }
}

impl std::fmt::Display for CursorHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Default)]
pub struct InteractionController {
    editor: CropEditor,
    origin: Point,
    listeners: ListenerRegistry,
    capture: Option<Subscription>,
}

impl InteractionController {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            editor: CropEditor::new(config),
            origin: Point::default(),
            listeners: ListenerRegistry::default(),
            capture: None,
        }
    }

    pub fn editor(&self) -> &CropEditor {
        &self.editor
    }

    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    /// Top-left of the image container in raw pointer coordinates.
    pub fn set_container_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    pub fn container_origin(&self) -> Point {
        self.origin
    }

    pub fn is_capturing(&self) -> bool {
        self.capture.is_some()
    }

    /// A new image finished loading.
    pub fn load(&mut self, dims: ImageDimensions) -> Result<CropRect, CropError> {
        self.release_capture();
        self.editor.initialize(dims)
    }

    pub fn reset(&mut self) -> Option<CropRect> {
        self.release_capture();
        self.editor.reset()
    }

    pub fn relayout(&mut self, display_width: f64, display_height: f64) -> Result<(), CropError> {
        self.editor.relayout(display_width, display_height)
    }

    pub fn set_aspect_ratio(&mut self, ratio: Option<f64>) -> Result<(), CropError> {
        self.editor.set_aspect_ratio(ratio)
    }

    pub fn set_natural_aspect_ratio(&mut self, ratio: Option<f64>) -> Result<(), CropError> {
        self.editor.set_natural_aspect_ratio(ratio)
    }

    /// Pointer pressed on the container.
    pub fn pointer_down(&mut self, client_x: f64, client_y: f64) -> InteractionMode {
        if self.is_capturing() {
            return self.editor.mode();
        }
        let p = mapper::to_display(client_x, client_y, self.origin);
        let mode = self.editor.on_pointer_down(p.x, p.y);
        if mode.is_active() {
            self.capture = Some(self.listeners.acquire());
        }
        mode
    }

    /// Pointer moved anywhere in the window. Returns whether the rectangle
    /// changed.
    pub fn pointer_move(&mut self, client_x: f64, client_y: f64) -> bool {
        if !self.is_capturing() {
            return false;
        }
        let p = mapper::to_display(client_x, client_y, self.origin);
        self.editor.on_pointer_move(p.x, p.y)
    }

    /// Pointer released anywhere in the window.
    pub fn pointer_up(&mut self) {
        self.editor.on_pointer_up();
        self.release_capture();
    }

    pub fn cursor_hint(&self, client_x: f64, client_y: f64) -> CursorHint {
        match self.editor.mode() {
            InteractionMode::Dragging => return CursorHint::Move,
            InteractionMode::Resizing(handle) => return CursorHint::Resize(handle),
            InteractionMode::Idle => {}
        }

        let Some(rect) = self.editor.rectangle() else {
            return CursorHint::Default;
        };
        let p = mapper::to_display(client_x, client_y, self.origin);
        let handle_size = self.editor.config().handle_size;
        if let Some(handle) = geometry::hit_test_handle(&rect, p.x, p.y, handle_size) {
            CursorHint::Resize(handle)
        } else if geometry::contains_point(&rect, p.x, p.y) {
            CursorHint::Move
        } else {
            CursorHint::Default
        }
    }

    fn release_capture(&mut self) {
        if let Some(subscription) = self.capture.take() {
            self.listeners.release(subscription);
        }
    }
}

impl Drop for InteractionController {
    fn drop(&mut self) {
        self.release_capture();
    }
}
