//! Overlay as an egui viewport, for hosts without the Win32 layered window
//!
//! Mouse passthrough stands in for the click-through window style; moving and
//! resizing go through viewport position/size updates.

use crate::surface::OverlaySurface;
use eframe::egui;
use imaging::OverlayImage;
use log::info;
use overlay::geometry::{self, HANDLE_SIZE};
use overlay::{HandleColor, Interaction, OverlayState, Point, Size};

/// Used until the viewport reports its monitor
const FALLBACK_SCREEN: Size = Size {
    width: 1920.0,
    height: 1080.0,
};

const BORDER_COLOR: egui::Color32 = egui::Color32::from_rgb(30, 144, 255);

fn handle_stroke(color: HandleColor) -> egui::Color32 {
    match color {
        HandleColor::Idle => egui::Color32::BLUE,
        HandleColor::Free => egui::Color32::RED,
        HandleColor::Proportional => egui::Color32::from_rgb(0, 128, 0),
    }
}

/// Pointer input sampled once per frame
struct PointerFrame {
    local: Option<Point>,
    /// Screen position of the viewport's top-left corner
    origin: Option<Point>,
    pressed: bool,
    released: bool,
    /// Pointer moved since the previous frame
    moved: bool,
    shift: bool,
}

pub struct ViewportOverlay {
    model: OverlayState,
    /// Image waiting for a context to upload it and a monitor size to fit it
    pending: Option<OverlayImage>,
    texture: Option<egui::TextureHandle>,
    closed: bool,
}

impl ViewportOverlay {
    pub fn new() -> Self {
        Self {
            model: OverlayState::new(),
            pending: None,
            texture: None,
            closed: false,
        }
    }

    fn upload_pending(&mut self, ctx: &egui::Context) {
        let Some(image) = self.pending.take() else {
            return;
        };

        let screen = ctx
            .input(|i| i.viewport().monitor_size)
            .map(|s| Size::new(s.x as f64, s.y as f64))
            .unwrap_or(FALLBACK_SCREEN);

        let color = egui::ColorImage::from_rgba_unmultiplied(
            [image.width as usize, image.height as usize],
            &image.to_rgba(),
        );
        self.texture = Some(ctx.load_texture("overlay-image", color, egui::TextureOptions::LINEAR));
        let bounds = self.model.set_image(image.width, image.height, screen);
        info!(
            "Overlay image {}x{} shown at {:.0}x{:.0}",
            image.width, image.height, bounds.width, bounds.height
        );
    }

    fn builder(&self) -> egui::ViewportBuilder {
        let bounds = self.model.bounds();
        egui::ViewportBuilder::default()
            .with_title("SimpleOverlay")
            .with_decorations(false)
            .with_transparent(true)
            .with_always_on_top()
            .with_taskbar(false)
            .with_resizable(false)
            .with_mouse_passthrough(self.model.click_through())
            .with_position([bounds.x as f32, bounds.y as f32])
            .with_inner_size([bounds.width as f32, bounds.height as f32])
    }

    /// Feed one frame of pointer input to the model; returns the window-local
    /// pointer position when there is one
    fn apply_pointer(&mut self, pointer: &PointerFrame) -> Option<Point> {
        self.model.set_proportional(pointer.shift);

        let (Some(local), Some(origin)) = (pointer.local, pointer.origin) else {
            if pointer.released {
                self.model.pointer_up();
            }
            return None;
        };
        let screen = Point::new(origin.x + local.x, origin.y + local.y);

        if pointer.pressed {
            self.model.pointer_down(local, screen);
        } else if pointer.released {
            self.model.pointer_up();
        } else if pointer.moved {
            // The reported origin trails our own position updates while the
            // local position stays put; a resting pointer must not step the model.
            match self.model.interaction() {
                Interaction::Dragging { .. } => {
                    self.model.drag_to(screen);
                }
                Interaction::Resizing => {
                    self.model.resize_to(screen, pointer.shift);
                }
                Interaction::Idle => {}
            }
        }
        Some(local)
    }

    fn overlay_ui(&mut self, ctx: &egui::Context) {
        if ctx.input(|i| i.viewport().close_requested()) {
            // Only the control window closes the overlay.
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
        }

        let pointer = ctx.input(|i| PointerFrame {
            local: i.pointer.latest_pos().map(|p| Point::new(p.x as f64, p.y as f64)),
            origin: i
                .viewport()
                .inner_rect
                .map(|r| Point::new(r.min.x as f64, r.min.y as f64)),
            pressed: i.pointer.primary_pressed(),
            released: i.pointer.primary_released(),
            moved: i.pointer.delta() != egui::Vec2::ZERO,
            shift: i.modifiers.shift,
        });
        let shift = pointer.shift;

        if let Some(local) = self.apply_pointer(&pointer) {
            if self.model.shows_chrome() {
                let on_handle = self.model.interaction() == Interaction::Resizing
                    || geometry::handle_contains(self.model.bounds().size(), local);
                ctx.set_cursor_icon(if on_handle {
                    egui::CursorIcon::ResizeNwSe
                } else {
                    egui::CursorIcon::Move
                });
            }
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                let painter = ui.painter();

                if let Some(ref texture) = self.texture {
                    let tint = egui::Color32::WHITE.gamma_multiply(self.model.opacity());
                    let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                    painter.image(texture.id(), rect, uv, tint);
                }

                if self.model.shows_chrome() {
                    painter.rect_stroke(rect.shrink(1.0), 0.0, egui::Stroke::new(2.0, BORDER_COLOR));

                    let origin = geometry::handle_origin(self.model.bounds().size());
                    let handle = egui::Rect::from_min_size(
                        rect.min + egui::vec2(origin.x as f32, origin.y as f32),
                        egui::vec2(HANDLE_SIZE as f32, HANDLE_SIZE as f32),
                    );
                    let stroke = handle_stroke(self.model.handle_color(shift));
                    painter.rect_filled(handle, 0.0, egui::Color32::WHITE);
                    painter.rect_stroke(handle, 0.0, egui::Stroke::new(2.0, stroke));
                }
            });

        if !matches!(self.model.interaction(), Interaction::Idle) {
            ctx.request_repaint();
        }
    }
}

impl Default for ViewportOverlay {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlaySurface for ViewportOverlay {
    fn set_image(&mut self, image: &OverlayImage) -> anyhow::Result<()> {
        self.pending = Some(image.clone());
        Ok(())
    }

    fn set_move_mode(&mut self, enabled: bool) -> anyhow::Result<()> {
        self.model.set_move_mode(enabled);
        Ok(())
    }

    fn set_opacity(&mut self, opacity: f32) -> anyhow::Result<()> {
        self.model.set_opacity(opacity);
        Ok(())
    }

    fn close(&mut self) {
        self.closed = true;
        self.texture = None;
    }

    fn frame(&mut self, ctx: &egui::Context) {
        if self.closed {
            return;
        }
        self.upload_pending(ctx);
        if !self.model.has_image() {
            return;
        }

        ctx.show_viewport_immediate(
            egui::ViewportId::from_hash_of("overlay_viewport"),
            self.builder(),
            |ctx, _class| self.overlay_ui(ctx),
        );
    }
}
