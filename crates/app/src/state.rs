//! Control window state and overlay lifecycle

use crate::surface::OverlaySurface;
use anyhow::Result;
use imaging::OverlayImage;
use log::warn;

/// What the control window knows and forwards
pub struct ControlState {
    overlay: Option<Box<dyn OverlaySurface>>,
    move_mode: bool,
    opacity: f32,
    pub status_text: String,
}

impl ControlState {
    pub fn new(opacity: f32, move_mode: bool) -> Self {
        Self {
            overlay: None,
            move_mode,
            opacity,
            status_text: "No image loaded".to_string(),
        }
    }

    pub fn move_mode(&self) -> bool {
        self.move_mode
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }

    /// Caption of the move-mode toggle: names the mode it switches to
    pub fn move_mode_label(&self) -> &'static str {
        if self.move_mode {
            "Normal Mode"
        } else {
            "Move Mode"
        }
    }

    /// Show an image, creating the overlay on first use
    pub fn show_image<F>(&mut self, image: &OverlayImage, create: F) -> Result<()>
    where
        F: FnOnce() -> Result<Box<dyn OverlaySurface>>,
    {
        if self.overlay.is_none() {
            let mut overlay = create()?;
            overlay.set_opacity(self.opacity)?;
            overlay.set_move_mode(self.move_mode)?;
            self.overlay = Some(overlay);
        }

        if let Some(ref mut overlay) = self.overlay {
            overlay.set_image(image)?;
        }
        self.status_text = format!("Showing {}x{} image", image.width, image.height);
        Ok(())
    }

    pub fn set_move_mode(&mut self, enabled: bool) {
        self.move_mode = enabled;
        if let Some(ref mut overlay) = self.overlay {
            if let Err(e) = overlay.set_move_mode(enabled) {
                warn!("Failed to switch move mode: {e}");
            }
        }
    }

    pub fn toggle_move_mode(&mut self) {
        self.set_move_mode(!self.move_mode);
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity;
        if let Some(ref mut overlay) = self.overlay {
            if let Err(e) = overlay.set_opacity(opacity) {
                warn!("Failed to set opacity: {e}");
            }
        }
    }

    pub fn frame(&mut self, ctx: &egui::Context) {
        if let Some(ref mut overlay) = self.overlay {
            overlay.frame(ctx);
        }
    }

    pub fn close_overlay(&mut self) {
        if let Some(mut overlay) = self.overlay.take() {
            overlay.close();
        }
    }
}

impl Drop for ControlState {
    fn drop(&mut self) {
        self.close_overlay();
    }
}
