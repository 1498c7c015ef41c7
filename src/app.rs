use eframe::egui;
use image::DynamicImage;

use image_cropper::{
    AspectRatioMode, CropError, CropRect, CursorHint, ImageDimensions, InteractionController,
    Point, ResizeHandle, Settings, crop_image,
};

const PADDING: f32 = 20.0;

/// Display size is only known once the canvas is laid out, so a freshly
/// opened image is loaded into the controller on its first usable frame and
/// relaid out on later ones.
#[derive(Debug, Default)]
struct LayoutSync {
    pending_load: bool,
}

impl LayoutSync {
    fn image_opened(&mut self) {
        self.pending_load = true;
    }

    /// Returns `Ok(true)` when the image was loaded by this call. A failed
    /// load stays pending and is retried on the next frame.
    fn sync(
        &mut self,
        controller: &mut InteractionController,
        natural: (f64, f64),
        display: (f64, f64),
    ) -> Result<bool, CropError> {
        if !self.pending_load {
            if let Err(e) = controller.relayout(display.0, display.1) {
                tracing::warn!("keeping previous layout: {}", e);
            }
            return Ok(false);
        }

        ImageDimensions::new(display.0, display.1, natural.0, natural.1)
            .and_then(|dims| controller.load(dims))?;
        self.pending_load = false;
        Ok(true)
    }
}

pub struct ImageCropper {
    image: Option<DynamicImage>,
    texture: Option<egui::TextureHandle>,
    controller: InteractionController,
    aspect_ratio_mode: AspectRatioMode,
    settings: Settings,
    status: Option<String>,
    layout: LayoutSync,
}

impl ImageCropper {
    pub fn new(_cc: &eframe::CreationContext<'_>, settings: Settings) -> Self {
        Self {
            image: None,
            texture: None,
            controller: InteractionController::new(settings.editor),
            aspect_ratio_mode: AspectRatioMode::default(),
            settings,
            status: None,
            layout: LayoutSync::default(),
        }
    }

    fn open(&mut self, ctx: &egui::Context, path: &std::path::Path) {
        match image::open(path) {
            Ok(img) => {
                tracing::info!("opened {} ({}x{})", path.display(), img.width(), img.height());
                self.image = Some(img);
                self.load_texture(ctx);
                self.layout.image_opened();
                self.status = None;
            }
            Err(e) => {
                tracing::error!("failed to open {}: {}", path.display(), e);
                self.status = Some(format!("Failed to open image: {}", e));
            }
        }
    }

    fn load_texture(&mut self, ctx: &egui::Context) {
        if let Some(image) = &self.image {
            let size = [image.width() as _, image.height() as _];
            let image_buffer = image.to_rgba8();
            let pixels = image_buffer.as_flat_samples();
            let color_image = egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice());
            self.texture =
                Some(ctx.load_texture("image", color_image, egui::TextureOptions::LINEAR));
        }
    }

    fn sync_layout(&mut self, natural: egui::Vec2, display: egui::Vec2) {
        let natural = (natural.x as f64, natural.y as f64);
        let display = (display.x as f64, display.y as f64);
        match self.layout.sync(&mut self.controller, natural, display) {
            Ok(true) => {
                self.status = None;
                self.apply_aspect_ratio();
            }
            Ok(false) => {}
            Err(e) => {
                tracing::debug!("crop region unavailable: {}", e);
                self.status = Some(format!("Cannot crop this image yet: {}", e));
            }
        }
    }

    fn apply_aspect_ratio(&mut self) {
        let Some(dims) = self.controller.editor().dimensions() else {
            return;
        };
        let ratio = self.aspect_ratio_mode.ratio(
            dims.natural_width,
            dims.natural_height,
            self.settings.custom_w,
            self.settings.custom_h,
        );
        if let Err(e) = self.controller.set_natural_aspect_ratio(ratio) {
            self.status = Some(format!("Cannot use aspect ratio: {}", e));
        }
    }

    fn save_cropped(&mut self) {
        let (Some(image), Some(rect)) = (&self.image, self.controller.editor().rectangle_natural())
        else {
            return;
        };
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Image", &["png", "jpg", "jpeg", "bmp"])
            .save_file()
        else {
            return;
        };

        let saved = crop_image(image, &rect)
            .map_err(|e| e.to_string())
            .and_then(|cropped| cropped.save(&path).map_err(|e| e.to_string()));
        match saved {
            Ok(()) => {
                tracing::info!("saved crop to {}", path.display());
                self.status = Some(format!("Saved {}", path.display()));
            }
            Err(e) => {
                tracing::error!("failed to save image: {}", e);
                self.status = Some(format!("Failed to save image: {}", e));
            }
        }
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Aspect Ratio:");
            let mut changed = false;
            let presets: Vec<AspectRatioMode> = if self.settings.portrait {
                AspectRatioMode::PORTRAIT.to_vec()
            } else {
                AspectRatioMode::LANDSCAPE.to_vec()
            };
            egui::ComboBox::from_id_salt("params_aspect_ratio")
                .selected_text(format!("{}", self.aspect_ratio_mode))
                .show_ui(ui, |ui| {
                    for mode in [
                        AspectRatioMode::Free,
                        AspectRatioMode::Original,
                        AspectRatioMode::Square,
                    ] {
                        changed |= ui
                            .selectable_value(&mut self.aspect_ratio_mode, mode, mode.to_string())
                            .changed();
                    }
                    ui.separator();
                    for mode in presets {
                        changed |= ui
                            .selectable_value(&mut self.aspect_ratio_mode, mode, mode.to_string())
                            .changed();
                    }
                    ui.separator();
                    changed |= ui
                        .selectable_value(
                            &mut self.aspect_ratio_mode,
                            AspectRatioMode::Custom,
                            "Custom",
                        )
                        .changed();
                });

            if ui.button("🔄").clicked() {
                self.settings.portrait = !self.settings.portrait;
                if self.aspect_ratio_mode == AspectRatioMode::Custom {
                    std::mem::swap(&mut self.settings.custom_w, &mut self.settings.custom_h);
                } else {
                    self.aspect_ratio_mode = self.aspect_ratio_mode.counterpart();
                }
                self.settings.save();
                changed = true;
            }

            if self.aspect_ratio_mode == AspectRatioMode::Custom {
                let mut custom_changed = ui
                    .add(
                        egui::DragValue::new(&mut self.settings.custom_w)
                            .speed(0.1)
                            .range(1..=100),
                    )
                    .changed();
                ui.label(":");
                custom_changed |= ui
                    .add(
                        egui::DragValue::new(&mut self.settings.custom_h)
                            .speed(0.1)
                            .range(1..=100),
                    )
                    .changed();
                if custom_changed {
                    self.settings.save();
                    changed = true;
                }
            }

            if changed {
                self.apply_aspect_ratio();
            }

            if ui.button("Reset").clicked() {
                self.controller.reset();
            }

            if ui.button("Save Cropped Image").clicked() {
                self.save_cropped();
            }
        });
    }

    fn canvas(&mut self, ui: &mut egui::Ui) {
        let Some(texture) = self.texture.clone() else {
            return;
        };

        let available_size = ui.available_size();
        let max_size = available_size - egui::vec2(PADDING * 2.0, PADDING * 2.0);
        let image_size = texture.size_vec2();

        // Calculate size to fit within available space while maintaining aspect ratio
        let scale = (max_size.x / image_size.x).min(max_size.y / image_size.y);
        let display_size = image_size * scale;
        let total_display_size = display_size + egui::vec2(PADDING * 2.0, PADDING * 2.0);

        // Manual centering
        let x_offset = (available_size.x - total_display_size.x) / 2.0;
        let y_offset = (available_size.y - total_display_size.y) / 2.0;
        let start_pos = ui.cursor().min + egui::vec2(x_offset.max(0.0), y_offset.max(0.0));
        let target_rect = egui::Rect::from_min_size(start_pos, total_display_size);

        let response = ui.allocate_rect(target_rect, egui::Sense::drag());
        let painter = ui.painter_at(target_rect);
        let image_rect = egui::Rect::from_min_size(
            target_rect.min + egui::vec2(PADDING, PADDING),
            display_size,
        );

        self.sync_layout(image_size, display_size);
        self.controller
            .set_container_origin(Point::new(image_rect.min.x as f64, image_rect.min.y as f64));

        self.handle_pointer(ui.ctx(), &response);

        painter.image(
            texture.id(),
            image_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        if let Some(rect) = self.controller.editor().rectangle() {
            draw_crop_overlay(&painter, image_rect, to_screen(image_rect, &rect));
        }
    }

    /// Presses count on the padded container; moves and releases are taken
    /// from the whole window while the controller is capturing.
    fn handle_pointer(&mut self, ctx: &egui::Context, response: &egui::Response) {
        let (pressed, released, press_pos, latest_pos) = ctx.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.press_origin(),
                i.pointer.latest_pos(),
            )
        });

        if pressed && response.contains_pointer() {
            if let Some(pos) = press_pos {
                self.controller.pointer_down(pos.x as f64, pos.y as f64);
            }
        }
        if self.controller.is_capturing() {
            if let Some(pos) = latest_pos {
                self.controller.pointer_move(pos.x as f64, pos.y as f64);
            }
            if released {
                self.controller.pointer_up();
            }
        }

        if let Some(pos) = latest_pos {
            if self.controller.is_capturing() || response.contains_pointer() {
                let hint = self.controller.cursor_hint(pos.x as f64, pos.y as f64);
                ctx.set_cursor_icon(cursor_icon(hint));
            }
        }
    }
}

fn to_screen(image_rect: egui::Rect, rect: &CropRect) -> egui::Rect {
    egui::Rect::from_min_size(
        image_rect.min + egui::vec2(rect.x as f32, rect.y as f32),
        egui::vec2(rect.width as f32, rect.height as f32),
    )
}

fn cursor_icon(hint: CursorHint) -> egui::CursorIcon {
    match hint {
        CursorHint::Default => egui::CursorIcon::Default,
        CursorHint::Move => egui::CursorIcon::Move,
        CursorHint::Resize(handle) => match handle {
            ResizeHandle::North => egui::CursorIcon::ResizeNorth,
            ResizeHandle::South => egui::CursorIcon::ResizeSouth,
            ResizeHandle::East => egui::CursorIcon::ResizeEast,
            ResizeHandle::West => egui::CursorIcon::ResizeWest,
            ResizeHandle::NorthEast => egui::CursorIcon::ResizeNorthEast,
            ResizeHandle::NorthWest => egui::CursorIcon::ResizeNorthWest,
            ResizeHandle::SouthEast => egui::CursorIcon::ResizeSouthEast,
            ResizeHandle::SouthWest => egui::CursorIcon::ResizeSouthWest,
        },
    }
}

fn draw_crop_overlay(painter: &egui::Painter, image_rect: egui::Rect, crop: egui::Rect) {
    // Dimmed area outside the crop
    let overlay_color = egui::Color32::from_black_alpha(150);
    let shades = [
        egui::Rect::from_min_max(image_rect.min, egui::pos2(image_rect.max.x, crop.min.y)),
        egui::Rect::from_min_max(egui::pos2(image_rect.min.x, crop.max.y), image_rect.max),
        egui::Rect::from_min_max(
            egui::pos2(image_rect.min.x, crop.min.y),
            egui::pos2(crop.min.x, crop.max.y),
        ),
        egui::Rect::from_min_max(
            egui::pos2(crop.max.x, crop.min.y),
            egui::pos2(image_rect.max.x, crop.max.y),
        ),
    ];
    for shade in shades {
        painter.rect_filled(shade, 0.0, overlay_color);
    }

    painter.rect_stroke(crop, 0.0, egui::Stroke::new(1.0, egui::Color32::WHITE));

    let handle_radius = 6.0;
    let handle_stroke = egui::Stroke::new(1.0, egui::Color32::BLACK);
    let handle_fill = egui::Color32::WHITE;
    let handles = [
        crop.min,
        crop.max,
        egui::pos2(crop.min.x, crop.max.y),
        egui::pos2(crop.max.x, crop.min.y),
        crop.center_top(),
        crop.center_bottom(),
        crop.left_center(),
        crop.right_center(),
    ];
    for pos in handles {
        painter.circle(pos, handle_radius, handle_fill, handle_stroke);
    }
}

impl eframe::App for ImageCropper {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Handle dropped files
        if !ctx.input(|i| i.raw.dropped_files.is_empty()) {
            let dropped_files = ctx.input(|i| i.raw.dropped_files.clone());
            if let Some(path) = dropped_files.first().and_then(|f| f.path.clone()) {
                self.open(ctx, &path);
            }
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Open Image").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("Image", &["png", "jpg", "jpeg", "bmp"])
                        .pick_file()
                    {
                        self.open(ctx, &path);
                    }
                }
                if let Some(status) = &self.status {
                    ui.label(status);
                }
            });

            if self.texture.is_some() {
                self.toolbar(ui);
                ui.separator();
            }

            self.canvas(ui);
        });
    }
}
