//! The seam between the control window and whatever draws the overlay

use imaging::OverlayImage;

/// Commands the control window forwards to the overlay
pub trait OverlaySurface {
    fn set_image(&mut self, image: &OverlayImage) -> anyhow::Result<()>;

    fn set_move_mode(&mut self, enabled: bool) -> anyhow::Result<()>;

    fn set_opacity(&mut self, opacity: f32) -> anyhow::Result<()>;

    fn close(&mut self);

    /// Runs once per control-window frame
    fn frame(&mut self, _ctx: &egui::Context) {}
}

#[cfg(windows)]
impl OverlaySurface for overlay::OverlayWindow {
    fn set_image(&mut self, image: &OverlayImage) -> anyhow::Result<()> {
        overlay::OverlayWindow::set_image(self, image)?;
        Ok(())
    }

    fn set_move_mode(&mut self, enabled: bool) -> anyhow::Result<()> {
        overlay::OverlayWindow::set_move_mode(self, enabled)?;
        Ok(())
    }

    fn set_opacity(&mut self, opacity: f32) -> anyhow::Result<()> {
        overlay::OverlayWindow::set_opacity(self, opacity)?;
        Ok(())
    }

    fn close(&mut self) {
        overlay::OverlayWindow::close(self);
    }
}
