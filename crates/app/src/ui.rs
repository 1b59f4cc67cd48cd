//! Control window using egui framework

use crate::cli::MIN_OPACITY;
use crate::state::ControlState;
use crate::surface::OverlaySurface;
use eframe::egui;
use imaging::SUPPORTED_EXTENSIONS;
use log::{error, info};
use std::path::{Path, PathBuf};

/// Control window: load, mode toggle, opacity, close
pub struct ControlApp {
    state: ControlState,
    /// Image named on the command line, loaded on the first frame
    startup_image: Option<PathBuf>,
    /// Raw HWND of this window, owner of the overlay
    main_hwnd: Option<isize>,
}

impl ControlApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        opacity: f32,
        move_mode: bool,
        startup_image: Option<PathBuf>,
    ) -> Self {
        Self {
            state: ControlState::new(opacity, move_mode),
            startup_image,
            main_hwnd: None,
        }
    }

    #[cfg(windows)]
    fn capture_hwnd(&mut self, frame: &eframe::Frame) {
        use raw_window_handle::{HasWindowHandle, RawWindowHandle};

        if self.main_hwnd.is_none() {
            if let Ok(handle) = frame.window_handle() {
                if let RawWindowHandle::Win32(win32) = handle.as_raw() {
                    self.main_hwnd = Some(win32.hwnd.get());
                }
            }
        }
    }

    #[cfg(not(windows))]
    fn capture_hwnd(&mut self, _frame: &eframe::Frame) {}

    fn on_load_click(&mut self) {
        let picked = rfd::FileDialog::new()
            .set_title("Select Image")
            .add_filter("Image Files", SUPPORTED_EXTENSIONS)
            .add_filter("All Files", &["*"])
            .pick_file();

        if let Some(path) = picked {
            self.load(&path);
        }
    }

    fn load(&mut self, path: &Path) {
        info!("Loading {}", path.display());

        let owner = self.main_hwnd;
        let result = imaging::load_image(path)
            .map_err(anyhow::Error::from)
            .and_then(|image| self.state.show_image(&image, move || create_overlay(owner)));

        if let Err(e) = result {
            error!("Failed to load image {}: {e:#}", path.display());
            self.state.status_text = "Load failed".to_string();
            show_error(&format!("Failed to load image: {e}"));
        }
    }

    fn on_close_click(&mut self, ctx: &egui::Context) {
        self.state.close_overlay();
        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let (toggle, escape) = ctx.input_mut(|i| {
            (
                only_command(i.modifiers) && i.consume_key(egui::Modifiers::COMMAND, egui::Key::M),
                i.key_pressed(egui::Key::Escape),
            )
        });

        if toggle {
            self.state.toggle_move_mode();
        } else if escape {
            self.state.set_move_mode(false);
        }
    }
}

/// Ctrl (Cmd on macOS) with no other modifier
fn only_command(modifiers: egui::Modifiers) -> bool {
    modifiers.command && !modifiers.shift && !modifiers.alt
}

#[cfg(windows)]
fn create_overlay(owner: Option<isize>) -> anyhow::Result<Box<dyn OverlaySurface>> {
    Ok(Box::new(overlay::OverlayWindow::create(owner)?))
}

#[cfg(not(windows))]
fn create_overlay(_owner: Option<isize>) -> anyhow::Result<Box<dyn OverlaySurface>> {
    Ok(Box::new(crate::viewport::ViewportOverlay::new()))
}

fn show_error(message: &str) {
    rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Error)
        .set_title("Error")
        .set_description(message)
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
}

impl eframe::App for ControlApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        self.capture_hwnd(frame);

        if let Some(path) = self.startup_image.take() {
            self.load(&path);
        }

        self.handle_shortcuts(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            // Dragging the background moves the window.
            let background = ui.interact(
                ui.max_rect(),
                egui::Id::new("control_background"),
                egui::Sense::click_and_drag(),
            );
            if background.drag_started_by(egui::PointerButton::Primary) {
                ctx.send_viewport_cmd(egui::ViewportCommand::StartDrag);
            }

            ui.vertical_centered(|ui| {
                ui.add_space(8.0);
                ui.heading(egui::RichText::new("SimpleOverlay").size(20.0));
                ui.separator();
                ui.add_space(8.0);

                ui.horizontal(|ui| {
                    let load_btn = egui::Button::new(egui::RichText::new("Load Image").size(15.0))
                        .min_size(egui::vec2(110.0, 32.0))
                        .rounding(6.0);
                    if ui.add(load_btn).clicked() {
                        self.on_load_click();
                    }

                    let mut move_mode = self.state.move_mode();
                    let label = egui::RichText::new(self.state.move_mode_label()).size(15.0);
                    if ui.toggle_value(&mut move_mode, label).clicked() {
                        self.state.set_move_mode(move_mode);
                    }

                    let close_btn = egui::Button::new(
                        egui::RichText::new("Close")
                            .size(15.0)
                            .color(egui::Color32::WHITE),
                    )
                    .fill(egui::Color32::from_rgb(220, 53, 69))
                    .min_size(egui::vec2(80.0, 32.0))
                    .rounding(6.0);
                    if ui.add(close_btn).clicked() {
                        self.on_close_click(ctx);
                    }
                });

                ui.add_space(10.0);

                let mut opacity = self.state.opacity();
                let slider = egui::Slider::new(&mut opacity, MIN_OPACITY..=1.0)
                    .text("Opacity")
                    .fixed_decimals(2);
                if ui.add(slider).changed() {
                    self.state.set_opacity(opacity);
                }

                ui.add_space(8.0);
                ui.label(
                    egui::RichText::new(&self.state.status_text)
                        .size(13.0)
                        .color(egui::Color32::from_rgb(136, 136, 136)),
                );
                ui.label(
                    egui::RichText::new("Ctrl+M toggles move mode, Esc leaves it. Shift-drag the handle to keep proportions.")
                        .size(11.0)
                        .color(egui::Color32::from_rgb(136, 136, 136)),
                );
            });
        });

        self.state.frame(ctx);
    }

    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        // The overlay viewport shares this and must stay see-through.
        [0.0, 0.0, 0.0, 0.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_mode_chord_needs_bare_command() {
        assert!(only_command(egui::Modifiers::COMMAND));
        assert!(!only_command(egui::Modifiers::NONE));
        assert!(!only_command(egui::Modifiers {
            shift: true,
            ..egui::Modifiers::COMMAND
        }));
        assert!(!only_command(egui::Modifiers {
            alt: true,
            ..egui::Modifiers::COMMAND
        }));
    }
}
