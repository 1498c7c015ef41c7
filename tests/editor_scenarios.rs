use image_cropper::mapper::{to_display_rect, to_natural};
use image_cropper::{
    CropEditor, CropError, CropRect, EditorConfig, ImageDimensions, InteractionMode, ResizeHandle,
};

fn dims_400x300() -> ImageDimensions {
    ImageDimensions::new(400.0, 300.0, 1600.0, 1200.0).unwrap()
}

fn editor() -> CropEditor {
    let mut editor = CropEditor::new(EditorConfig::default());
    editor.initialize(dims_400x300()).unwrap();
    editor
}

/// Drags `handle` of the current rectangle by `(dx, dy)` in one move.
fn drag_handle(editor: &mut CropEditor, handle: ResizeHandle, dx: f64, dy: f64) {
    let rect = editor.rectangle().unwrap();
    let p = rect.handle_position(handle);
    assert_eq!(editor.on_pointer_down(p.x, p.y), InteractionMode::Resizing(handle));
    editor.on_pointer_move(p.x + dx, p.y + dy);
    editor.on_pointer_up();
}

fn assert_inside(rect: &CropRect, w: f64, h: f64) {
    let eps = 1e-9;
    assert!(rect.x >= 0.0, "{rect:?}");
    assert!(rect.y >= 0.0, "{rect:?}");
    assert!(rect.right() <= w + eps, "{rect:?}");
    assert!(rect.bottom() <= h + eps, "{rect:?}");
    assert!(rect.width > 0.0 && rect.height > 0.0, "{rect:?}");
}

/// Small deterministic generator so the sequences are reproducible.
struct XorShift(u64);

impl XorShift {
    fn next(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (self.next() % 10_000) as f64 / 10_000.0 * (hi - lo)
    }
}

const ALL_HANDLES: [ResizeHandle; 8] = [
    ResizeHandle::North,
    ResizeHandle::South,
    ResizeHandle::East,
    ResizeHandle::West,
    ResizeHandle::NorthEast,
    ResizeHandle::NorthWest,
    ResizeHandle::SouthEast,
    ResizeHandle::SouthWest,
];

/// Runs a random mix of body drags and handle resizes, checking `check`
/// after every pointer event.
fn random_session(editor: &mut CropEditor, seed: u64, check: impl Fn(&CropRect)) {
    let mut rng = XorShift(seed);
    for _ in 0..300 {
        let rect = editor.rectangle().unwrap();
        let grab = if rng.next() % 3 == 0 {
            rect.center()
        } else {
            rect.handle_position(ALL_HANDLES[(rng.next() % 8) as usize])
        };
        editor.on_pointer_down(grab.x, grab.y);
        for _ in 0..5 {
            let x = rng.range(-600.0, 1000.0);
            let y = rng.range(-600.0, 900.0);
            editor.on_pointer_move(x, y);
            check(&editor.rectangle().unwrap());
        }
        editor.on_pointer_up();
        assert_eq!(editor.mode(), InteractionMode::Idle);
    }
}

#[test]
fn initialize_gives_centered_half_rectangle() {
    let mut editor = CropEditor::default();
    let rect = editor.initialize(dims_400x300()).unwrap();
    assert_eq!(rect, CropRect::new(100.0, 75.0, 200.0, 150.0));
    assert_eq!(editor.rectangle(), Some(rect));
    assert_eq!(editor.mode(), InteractionMode::Idle);
}

#[test]
fn zero_dimensions_refuse_to_initialize() {
    let mut editor = editor();
    let bad = ImageDimensions {
        display_width: 0.0,
        display_height: 300.0,
        natural_width: 1600.0,
        natural_height: 1200.0,
    };
    assert!(matches!(
        editor.initialize(bad),
        Err(CropError::InvalidDimensions { .. })
    ));
    assert!(!editor.has_image());
    assert_eq!(editor.rectangle(), None);
    assert_eq!(editor.on_pointer_down(200.0, 150.0), InteractionMode::Idle);
    assert_eq!(editor.reset(), None);
}

#[test]
fn south_east_with_square_lock_follows_larger_delta() {
    let mut editor = CropEditor::default();
    editor.set_aspect_ratio(Some(1.0)).unwrap();
    editor.initialize(ImageDimensions::new(400.0, 300.0, 400.0, 300.0).unwrap()).unwrap();
    // Default with ratio 1 is (125, 75, 150, 150); move it to (100, 100).
    assert_eq!(editor.on_pointer_down(200.0, 150.0), InteractionMode::Dragging);
    editor.on_pointer_move(175.0, 175.0);
    editor.on_pointer_up();
    assert_eq!(editor.rectangle(), Some(CropRect::new(100.0, 100.0, 150.0, 150.0)));

    // Shrink to 100x100 from the south-east corner.
    drag_handle(&mut editor, ResizeHandle::SouthEast, -50.0, -50.0);
    assert_eq!(editor.rectangle(), Some(CropRect::new(100.0, 100.0, 100.0, 100.0)));

    drag_handle(&mut editor, ResizeHandle::SouthEast, 50.0, 20.0);
    assert_eq!(editor.rectangle(), Some(CropRect::new(100.0, 100.0, 150.0, 150.0)));
}

#[test]
fn north_west_past_left_edge_stops_at_zero() {
    let mut editor = editor();
    let before = editor.rectangle().unwrap();
    drag_handle(&mut editor, ResizeHandle::NorthWest, -1000.0, 0.0);
    let rect = editor.rectangle().unwrap();
    assert_eq!(rect.x, 0.0);
    assert_eq!(rect.right(), before.right());
    assert_eq!(rect.width, before.right());
    assert!(rect.width >= 50.0);
    assert_eq!(rect.y, before.y);
}

#[test]
fn north_west_past_left_edge_with_lock() {
    let mut editor = editor();
    editor.set_aspect_ratio(Some(4.0 / 3.0)).unwrap();
    let before = editor.rectangle().unwrap();
    drag_handle(&mut editor, ResizeHandle::NorthWest, -1000.0, 0.0);
    let rect = editor.rectangle().unwrap();
    assert!(rect.x >= 0.0);
    assert!((rect.right() - before.right()).abs() < 1e-9);
    assert!((rect.bottom() - before.bottom()).abs() < 1e-9);
    assert!((rect.width / rect.height - 4.0 / 3.0).abs() < 1e-6);
}

#[test]
fn miss_stays_idle_and_moves_do_nothing() {
    let mut editor = editor();
    let before = editor.rectangle();
    assert_eq!(editor.on_pointer_down(10.0, 10.0), InteractionMode::Idle);
    assert!(!editor.on_pointer_move(200.0, 200.0));
    assert!(!editor.on_pointer_move(5.0, 290.0));
    assert_eq!(editor.rectangle(), before);
    assert_eq!(editor.mode(), InteractionMode::Idle);
}

#[test]
fn pointer_up_outside_container_ends_gesture() {
    let mut editor = editor();
    editor.on_pointer_down(200.0, 150.0);
    editor.on_pointer_move(-900.0, 2000.0);
    editor.on_pointer_up();
    assert_eq!(editor.mode(), InteractionMode::Idle);
    let rect = editor.rectangle().unwrap();
    assert_eq!(rect, CropRect::new(0.0, 150.0, 200.0, 150.0));
}

#[test]
fn handle_wins_over_body() {
    let mut editor = editor();
    // Inside the rectangle but within the north-west zone.
    assert_eq!(
        editor.on_pointer_down(105.0, 80.0),
        InteractionMode::Resizing(ResizeHandle::NorthWest)
    );
}

#[test]
fn rectangle_stays_inside_bounds() {
    for seed in [1, 7, 42, 1234] {
        let mut editor = editor();
        random_session(&mut editor, seed, |r| assert_inside(r, 400.0, 300.0));
    }
}

#[test]
fn free_resizes_respect_minimum() {
    let mut editor = editor();
    random_session(&mut editor, 99, |r| {
        assert!(r.width >= 50.0 - 1e-9 && r.height >= 50.0 - 1e-9, "{r:?}");
    });
}

#[test]
fn locked_ratio_holds_after_every_update() {
    for ratio in [1.0, 16.0 / 9.0, 9.0 / 16.0, 2.5] {
        let mut editor = editor();
        editor.set_aspect_ratio(Some(ratio)).unwrap();
        random_session(&mut editor, 5, |r| {
            assert_inside(r, 400.0, 300.0);
            assert!((r.width / r.height - ratio).abs() < 1e-6, "{r:?} at {ratio}");
        });
    }
}

#[test]
fn set_aspect_ratio_reshapes_immediately() {
    let mut editor = editor();
    editor.set_aspect_ratio(Some(2.0)).unwrap();
    let r = editor.rectangle().unwrap();
    assert!((r.width / r.height - 2.0).abs() < 1e-6);
    assert_inside(&r, 400.0, 300.0);
    assert_eq!(editor.aspect_ratio(), Some(2.0));

    editor.set_aspect_ratio(None).unwrap();
    assert_eq!(editor.rectangle(), Some(r));
    assert_eq!(editor.aspect_ratio(), None);
}

#[test]
fn degenerate_ratio_keeps_previous() {
    let mut editor = editor();
    editor.set_aspect_ratio(Some(1.5)).unwrap();
    let rect = editor.rectangle();
    for bad in [0.0, -2.0, f64::NAN, f64::INFINITY] {
        assert!(matches!(
            editor.set_aspect_ratio(Some(bad)),
            Err(CropError::DegenerateRatio(_))
        ));
        assert_eq!(editor.aspect_ratio(), Some(1.5));
        assert_eq!(editor.rectangle(), rect);
    }
}

#[test]
fn nan_pointer_is_a_no_op() {
    let mut editor = editor();
    editor.on_pointer_down(200.0, 150.0);
    let before = editor.rectangle();
    assert!(!editor.on_pointer_move(f64::NAN, 10.0));
    assert_eq!(editor.rectangle(), before);
    editor.on_pointer_up();

    drag_handle(&mut editor, ResizeHandle::East, 0.0, 0.0);
    let rect = editor.rectangle().unwrap();
    let p = rect.handle_position(ResizeHandle::East);
    editor.on_pointer_down(p.x, p.y);
    assert!(!editor.on_pointer_move(f64::INFINITY, p.y));
    assert_eq!(editor.rectangle(), Some(rect));
}

#[test]
fn reset_is_idempotent() {
    let mut editor = editor();
    drag_handle(&mut editor, ResizeHandle::SouthEast, 60.0, 40.0);
    let first = editor.reset();
    let second = editor.reset();
    assert_eq!(first, second);
    assert_eq!(first, Some(CropRect::new(100.0, 75.0, 200.0, 150.0)));
}

#[test]
fn natural_rectangle_scales_by_four() {
    let editor = editor();
    assert_eq!(
        editor.rectangle_natural(),
        Some(CropRect::new(400.0, 300.0, 800.0, 600.0))
    );
}

#[test]
fn natural_round_trip_within_one_pixel() {
    let dims = dims_400x300();
    for natural in [
        CropRect::new(0.0, 0.0, 1600.0, 1200.0),
        CropRect::new(13.0, 7.0, 331.0, 517.0),
        CropRect::new(1201.0, 999.0, 397.0, 199.0),
    ] {
        let back = to_natural(&to_display_rect(&natural, &dims), &dims);
        assert!((back.x - natural.x).abs() <= 1.0);
        assert!((back.y - natural.y).abs() <= 1.0);
        assert!((back.width - natural.width).abs() <= 1.0);
        assert!((back.height - natural.height).abs() <= 1.0);
    }
}

#[test]
fn new_image_recreates_rectangle() {
    let mut editor = editor();
    drag_handle(&mut editor, ResizeHandle::SouthEast, 60.0, 40.0);
    editor.on_pointer_down(150.0, 150.0);
    let rect = editor
        .initialize(ImageDimensions::new(200.0, 100.0, 200.0, 100.0).unwrap())
        .unwrap();
    assert_eq!(rect, CropRect::new(50.0, 25.0, 100.0, 50.0));
    assert_eq!(editor.mode(), InteractionMode::Idle);
}

#[test]
fn ratio_change_mid_drag_applies_to_next_move() {
    let mut editor = editor();
    assert_eq!(editor.on_pointer_down(200.0, 150.0), InteractionMode::Dragging);
    editor.set_aspect_ratio(Some(1.0)).unwrap();
    assert_eq!(editor.mode(), InteractionMode::Dragging);

    assert!(editor.on_pointer_move(210.0, 150.0));
    let rect = editor.rectangle().unwrap();
    assert!((rect.width / rect.height - 1.0).abs() < 1e-6, "{rect:?}");
    assert_inside(&rect, 400.0, 300.0);
    assert_eq!(rect, CropRect::new(110.0, 50.0, 200.0, 200.0));
    editor.on_pointer_up();
}

#[test]
fn ratio_change_mid_resize_applies_to_next_move() {
    let mut editor = editor();
    assert_eq!(
        editor.on_pointer_down(300.0, 225.0),
        InteractionMode::Resizing(ResizeHandle::SouthEast)
    );
    editor.set_aspect_ratio(Some(1.0)).unwrap();

    for (x, y) in [(320.0, 235.0), (250.0, 260.0), (400.0, 400.0)] {
        editor.on_pointer_move(x, y);
        let rect = editor.rectangle().unwrap();
        assert!((rect.width / rect.height - 1.0).abs() < 1e-6, "{rect:?} at ({x}, {y})");
        assert_inside(&rect, 400.0, 300.0);
    }
    editor.on_pointer_up();
    assert_eq!(editor.mode(), InteractionMode::Idle);
}
