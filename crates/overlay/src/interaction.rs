//! Overlay interaction state: move mode, dragging and resizing

use crate::geometry::{self, Bounds, Point, Size, DRAG_THRESHOLD};

/// Pointer interaction in progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Interaction {
    Idle,
    /// Moving the window; `moved` flips once the pointer leaves the threshold
    Dragging { last: Point, moved: bool },
    /// Resizing from the bottom-right handle
    Resizing,
}

/// Stroke color of the resize handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleColor {
    /// Blue
    Idle,
    /// Red: free resize in progress
    Free,
    /// Green: Shift held, aspect ratio locked
    Proportional,
}

/// What a left-button press started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressTarget {
    Ignored,
    Drag,
    Resize,
}

/// Geometry and mode of the overlay window
#[derive(Debug, Clone)]
pub struct OverlayState {
    bounds: Bounds,
    aspect_ratio: f64,
    opacity: f32,
    move_mode: bool,
    has_image: bool,
    interaction: Interaction,
    /// Shift held on the last pointer update
    proportional: bool,
}

impl OverlayState {
    pub fn new() -> Self {
        Self {
            bounds: Bounds::default(),
            aspect_ratio: 1.0,
            opacity: 1.0,
            move_mode: false,
            has_image: false,
            interaction: Interaction::Idle,
            proportional: false,
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn move_mode(&self) -> bool {
        self.move_mode
    }

    pub fn has_image(&self) -> bool {
        self.has_image
    }

    pub fn interaction(&self) -> Interaction {
        self.interaction
    }

    pub fn proportional(&self) -> bool {
        self.proportional
    }

    /// Record the Shift state; true when the handle needs repainting
    pub fn set_proportional(&mut self, held: bool) -> bool {
        let before = self.handle_color(self.proportional);
        self.proportional = held;
        before != self.handle_color(held)
    }

    /// Whether mouse input should pass through the window
    pub fn click_through(&self) -> bool {
        !self.move_mode
    }

    /// Adopt a new image: fit it to the screen and center it
    pub fn set_image(&mut self, image_width: u32, image_height: u32, screen: Size) -> Bounds {
        let (w, h) = (image_width as f64, image_height as f64);
        self.aspect_ratio = if h > 0.0 { w / h } else { 1.0 };

        let size = geometry::fit_to_screen(w, h, screen);
        let origin = geometry::centered(size, screen);
        self.bounds = Bounds::new(origin, size);
        self.has_image = true;
        self.interaction = Interaction::Idle;
        self.bounds
    }

    /// Switch move mode, returning the click-through flag to apply
    pub fn set_move_mode(&mut self, enabled: bool) -> bool {
        self.move_mode = enabled;
        if !enabled {
            self.interaction = Interaction::Idle;
        }
        self.click_through()
    }

    pub fn set_opacity(&mut self, opacity: f32) -> f32 {
        self.opacity = if opacity.is_nan() { 1.0 } else { opacity.clamp(0.0, 1.0) };
        self.opacity
    }

    /// Route a left-button press at a window-local point
    pub fn pointer_down(&mut self, local: Point, screen: Point) -> PressTarget {
        if !self.move_mode || !self.has_image {
            return PressTarget::Ignored;
        }

        if geometry::handle_contains(self.bounds.size(), local) {
            self.begin_resize();
            PressTarget::Resize
        } else {
            self.begin_drag(screen);
            PressTarget::Drag
        }
    }

    pub fn begin_drag(&mut self, screen: Point) -> bool {
        if !self.move_mode {
            return false;
        }
        self.interaction = Interaction::Dragging {
            last: screen,
            moved: false,
        };
        true
    }

    /// Follow the pointer while dragging; returns the new bounds if the window moved
    pub fn drag_to(&mut self, screen: Point) -> Option<Bounds> {
        if !self.move_mode {
            return None;
        }
        let Interaction::Dragging { last, moved } = self.interaction else {
            return None;
        };

        let dx = screen.x - last.x;
        let dy = screen.y - last.y;
        let moved = moved || dx.abs() > DRAG_THRESHOLD || dy.abs() > DRAG_THRESHOLD;

        if !moved {
            return None;
        }

        self.interaction = Interaction::Dragging { last: screen, moved };
        if dx == 0.0 && dy == 0.0 {
            return None;
        }
        self.bounds.x += dx;
        self.bounds.y += dy;
        Some(self.bounds)
    }

    pub fn end_drag(&mut self) -> bool {
        if matches!(self.interaction, Interaction::Dragging { .. }) {
            self.interaction = Interaction::Idle;
            true
        } else {
            false
        }
    }

    pub fn begin_resize(&mut self) -> bool {
        if !self.move_mode {
            return false;
        }
        self.interaction = Interaction::Resizing;
        true
    }

    /// Follow the pointer while resizing; the window's top-left corner stays put
    pub fn resize_to(&mut self, screen: Point, proportional: bool) -> Option<Bounds> {
        if !self.move_mode || !matches!(self.interaction, Interaction::Resizing) {
            return None;
        }

        let handle = self
            .bounds
            .to_screen(geometry::handle_center(self.bounds.size()));
        let dx = screen.x - handle.x;
        let dy = screen.y - handle.y;

        let size = geometry::resize(self.bounds.size(), dx, dy, self.aspect_ratio, proportional);
        if size == self.bounds.size() {
            return None;
        }
        self.bounds.width = size.width;
        self.bounds.height = size.height;
        Some(self.bounds)
    }

    pub fn end_resize(&mut self) -> bool {
        if matches!(self.interaction, Interaction::Resizing) {
            self.interaction = Interaction::Idle;
            true
        } else {
            false
        }
    }

    /// Release of the left button, whatever was in progress
    pub fn pointer_up(&mut self) -> bool {
        self.proportional = false;
        self.end_drag() || self.end_resize()
    }

    pub fn handle_color(&self, proportional: bool) -> HandleColor {
        match self.interaction {
            Interaction::Resizing if proportional => HandleColor::Proportional,
            Interaction::Resizing => HandleColor::Free,
            _ => HandleColor::Idle,
        }
    }

    /// Whether the move border and handle are drawn
    pub fn shows_chrome(&self) -> bool {
        self.move_mode && self.has_image
    }
}

impl Default for OverlayState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: Size = Size {
        width: 1920.0,
        height: 1080.0,
    };

    fn loaded(move_mode: bool) -> OverlayState {
        let mut state = OverlayState::new();
        state.set_image(400, 300, SCREEN);
        state.set_move_mode(move_mode);
        state
    }

    #[test]
    fn starts_click_through_without_image() {
        let state = OverlayState::new();
        assert!(state.click_through());
        assert!(!state.has_image());
        assert_eq!(state.opacity(), 1.0);
    }

    #[test]
    fn set_image_centers_and_records_aspect() {
        let mut state = OverlayState::new();
        let bounds = state.set_image(400, 300, SCREEN);
        assert_eq!(bounds, Bounds { x: 760.0, y: 390.0, width: 400.0, height: 300.0 });
        assert!((state.aspect_ratio() - 4.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn move_mode_controls_click_through() {
        let mut state = OverlayState::new();
        assert!(!state.set_move_mode(true));
        assert!(state.set_move_mode(false));
    }

    #[test]
    fn opacity_is_clamped() {
        let mut state = OverlayState::new();
        assert_eq!(state.set_opacity(1.7), 1.0);
        assert_eq!(state.set_opacity(-0.2), 0.0);
        assert_eq!(state.set_opacity(0.4), 0.4);
    }

    #[test]
    fn drag_ignored_outside_move_mode() {
        let mut state = loaded(false);
        assert!(!state.begin_drag(Point::new(800.0, 400.0)));
        assert_eq!(state.drag_to(Point::new(900.0, 500.0)), None);
        assert_eq!(state.pointer_down(Point::new(10.0, 10.0), Point::new(770.0, 400.0)), PressTarget::Ignored);
    }

    #[test]
    fn drag_waits_for_threshold() {
        let mut state = loaded(true);
        state.begin_drag(Point::new(800.0, 400.0));

        assert_eq!(state.drag_to(Point::new(802.0, 398.0)), None);
        assert_eq!(state.bounds().origin(), Point::new(760.0, 390.0));

        // The delta is measured from the press, so small steps accumulate.
        let bounds = state.drag_to(Point::new(803.0, 400.0)).unwrap();
        assert_eq!(bounds.origin(), Point::new(763.0, 390.0));
    }

    #[test]
    fn drag_follows_pointer_once_moving() {
        let mut state = loaded(true);
        state.begin_drag(Point::new(800.0, 400.0));
        state.drag_to(Point::new(810.0, 410.0));

        let bounds = state.drag_to(Point::new(811.0, 409.0)).unwrap();
        assert_eq!(bounds.origin(), Point::new(771.0, 399.0));
        assert_eq!(bounds.size(), Size::new(400.0, 300.0));

        assert!(state.end_drag());
        assert_eq!(state.interaction(), Interaction::Idle);
        assert_eq!(state.drag_to(Point::new(900.0, 500.0)), None);
    }

    #[test]
    fn press_on_handle_starts_resize() {
        let mut state = loaded(true);
        let local = Point::new(380.0, 280.0);
        let screen = state.bounds().to_screen(local);

        assert_eq!(state.pointer_down(local, screen), PressTarget::Resize);
        assert!(matches!(state.interaction(), Interaction::Resizing));
    }

    #[test]
    fn press_elsewhere_starts_drag() {
        let mut state = loaded(true);
        let local = Point::new(50.0, 50.0);
        let screen = state.bounds().to_screen(local);

        assert_eq!(state.pointer_down(local, screen), PressTarget::Drag);
    }

    #[test]
    fn free_resize_keeps_origin() {
        let mut state = loaded(true);
        let handle = state.bounds().to_screen(geometry::handle_center(state.bounds().size()));
        state.begin_resize();

        let bounds = state
            .resize_to(Point::new(handle.x + 40.0, handle.y + 20.0), false)
            .unwrap();
        assert_eq!(bounds.origin(), Point::new(760.0, 390.0));
        assert_eq!(bounds.size(), Size::new(420.0, 310.0));
        assert_eq!(state.handle_color(false), HandleColor::Free);
    }

    #[test]
    fn proportional_resize_keeps_aspect() {
        let mut state = loaded(true);
        let handle = state.bounds().to_screen(geometry::handle_center(state.bounds().size()));
        state.begin_resize();

        let bounds = state
            .resize_to(Point::new(handle.x + 30.0, handle.y + 40.0), true)
            .unwrap();
        assert!((bounds.width / bounds.height - 4.0 / 3.0).abs() < 1e-9);
        assert_eq!(bounds.width, 425.0);
        assert_eq!(state.handle_color(true), HandleColor::Proportional);
    }

    #[test]
    fn resize_without_press_does_nothing() {
        let mut state = loaded(true);
        assert_eq!(state.resize_to(Point::new(0.0, 0.0), false), None);
        assert_eq!(state.handle_color(true), HandleColor::Idle);
    }

    #[test]
    fn leaving_move_mode_cancels_interaction() {
        let mut state = loaded(true);
        state.begin_resize();
        state.set_move_mode(false);

        assert_eq!(state.interaction(), Interaction::Idle);
        assert!(!state.pointer_up());
    }

    #[test]
    fn new_image_cancels_interaction() {
        let mut state = loaded(true);
        state.begin_drag(Point::new(800.0, 400.0));
        state.drag_to(Point::new(820.0, 400.0));

        let bounds = state.set_image(200, 100, SCREEN);
        assert_eq!(state.interaction(), Interaction::Idle);
        assert_eq!(state.drag_to(Point::new(900.0, 500.0)), None);
        assert_eq!(state.bounds(), bounds);

        state.begin_resize();
        state.set_image(400, 300, SCREEN);
        assert_eq!(state.interaction(), Interaction::Idle);
        assert!(!state.pointer_up());
    }

    #[test]
    fn press_without_image_is_ignored() {
        let mut state = OverlayState::new();
        state.set_move_mode(true);

        let target = state.pointer_down(Point::new(10.0, 10.0), Point::new(10.0, 10.0));
        assert_eq!(target, PressTarget::Ignored);
        assert_eq!(state.interaction(), Interaction::Idle);
    }

    #[test]
    fn drag_without_movement_reports_nothing() {
        let mut state = loaded(true);
        state.begin_drag(Point::new(800.0, 400.0));
        assert_eq!(state.drag_to(Point::new(800.0, 400.0)), None);

        // Past the threshold, a repeat of the same position is still no move.
        let moved = state.drag_to(Point::new(810.0, 400.0)).unwrap();
        assert_eq!(state.drag_to(Point::new(810.0, 400.0)), None);
        assert_eq!(state.bounds(), moved);
    }

    #[test]
    fn shift_change_during_resize_needs_repaint() {
        let mut state = loaded(true);
        assert!(!state.set_proportional(true));

        state.begin_resize();
        assert!(!state.set_proportional(true));
        assert!(state.set_proportional(false));
        assert_eq!(state.handle_color(state.proportional()), HandleColor::Free);
        assert!(state.set_proportional(true));
        assert_eq!(state.handle_color(state.proportional()), HandleColor::Proportional);

        assert!(state.pointer_up());
        assert!(!state.proportional());
    }

    #[test]
    fn shift_release_at_minimum_size_needs_repaint() {
        let mut state = loaded(true);
        let handle = state.bounds().to_screen(geometry::handle_center(state.bounds().size()));
        state.begin_resize();
        state.set_proportional(true);

        // Far up-left pins the size at the floor; the next step changes nothing.
        let floor = Point::new(handle.x - 2000.0, handle.y - 2000.0);
        let pinned = state.resize_to(floor, true).unwrap();
        assert_eq!(pinned.size(), Size::new(200.0, 150.0));
        assert_eq!(state.resize_to(floor, true), None);
        assert_eq!(state.bounds(), pinned);

        assert!(state.set_proportional(false));
    }

    #[test]
    fn chrome_requires_image_and_move_mode() {
        let mut state = OverlayState::new();
        state.set_move_mode(true);
        assert!(!state.shows_chrome());
        state.set_image(10, 10, SCREEN);
        assert!(state.shows_chrome());
    }
}
