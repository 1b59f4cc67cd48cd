//! Overlay geometry: initial fit, handle placement, resize math

/// Largest share of the screen a freshly loaded image may cover
pub const MAX_SCREEN_FRACTION: f64 = 0.8;
/// Smallest overlay width reachable by resizing
pub const MIN_WIDTH: f64 = 200.0;
/// Smallest overlay height reachable by resizing
pub const MIN_HEIGHT: f64 = 150.0;
/// Side length of the square resize handle
pub const HANDLE_SIZE: f64 = 25.0;
/// Distance from the bottom-right corner to the handle origin
pub const HANDLE_INSET: f64 = 30.0;
/// Minimum distance from the top-left corner to the handle origin
pub const HANDLE_MARGIN: f64 = 5.0;
/// Pointer-to-size damping applied while resizing
pub const RESIZE_DAMPING: f64 = 0.5;
/// Pointer travel (per axis, exclusive) before a drag starts moving the window
pub const DRAG_THRESHOLD: f64 = 2.0;

/// Point in screen or window-local pixels
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width and height in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Window rectangle in screen pixels
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(origin: Point, size: Size) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            width: size.width,
            height: size.height,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Convert a screen point into window-local coordinates
    pub fn to_local(&self, screen: Point) -> Point {
        Point::new(screen.x - self.x, screen.y - self.y)
    }

    /// Convert a window-local point into screen coordinates
    pub fn to_screen(&self, local: Point) -> Point {
        Point::new(local.x + self.x, local.y + self.y)
    }
}

/// Size for a newly loaded image: native pixels, or shrunk uniformly to 80% of the screen
pub fn fit_to_screen(image_width: f64, image_height: f64, screen: Size) -> Size {
    let max_width = screen.width * MAX_SCREEN_FRACTION;
    let max_height = screen.height * MAX_SCREEN_FRACTION;

    if image_width > max_width || image_height > max_height {
        let scale = (max_width / image_width).min(max_height / image_height);
        Size::new(image_width * scale, image_height * scale)
    } else {
        Size::new(image_width, image_height)
    }
}

/// Origin that centers `size` on the screen
pub fn centered(size: Size, screen: Size) -> Point {
    Point::new(
        (screen.width - size.width) / 2.0,
        (screen.height - size.height) / 2.0,
    )
}

/// Top-left corner of the resize handle, window-local
pub fn handle_origin(size: Size) -> Point {
    let x = (size.width - HANDLE_SIZE).min(size.width - HANDLE_INSET);
    let y = (size.height - HANDLE_SIZE).min(size.height - HANDLE_INSET);
    Point::new(x.max(HANDLE_MARGIN), y.max(HANDLE_MARGIN))
}

/// Center of the resize handle, window-local
pub fn handle_center(size: Size) -> Point {
    let origin = handle_origin(size);
    Point::new(origin.x + HANDLE_SIZE / 2.0, origin.y + HANDLE_SIZE / 2.0)
}

/// Hit test for the resize handle
pub fn handle_contains(size: Size, local: Point) -> bool {
    let origin = handle_origin(size);
    local.x >= origin.x
        && local.x < origin.x + HANDLE_SIZE
        && local.y >= origin.y
        && local.y < origin.y + HANDLE_SIZE
}

/// New window size for a pointer `(dx, dy)` away from the handle center.
///
/// Free resizing follows each axis independently. Proportional resizing uses
/// the diagonal distance and derives the height from `aspect`, growing when
/// the pointer is right of or below the handle and shrinking otherwise.
pub fn resize(current: Size, dx: f64, dy: f64, aspect: f64, proportional: bool) -> Size {
    if proportional && aspect > 0.0 {
        let diagonal = (dx * dx + dy * dy).sqrt();
        let step = if dx > 0.0 || dy > 0.0 {
            diagonal * RESIZE_DAMPING
        } else {
            -diagonal * RESIZE_DAMPING
        };

        let mut width = (current.width + step).max(MIN_WIDTH);
        let mut height = width / aspect;
        if height < MIN_HEIGHT {
            height = MIN_HEIGHT;
            width = height * aspect;
        }
        Size::new(width, height)
    } else {
        Size::new(
            (current.width + dx * RESIZE_DAMPING).max(MIN_WIDTH),
            (current.height + dy * RESIZE_DAMPING).max(MIN_HEIGHT),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: Size = Size {
        width: 1920.0,
        height: 1080.0,
    };

    #[test]
    fn small_image_keeps_native_size() {
        assert_eq!(fit_to_screen(640.0, 480.0, SCREEN), Size::new(640.0, 480.0));
    }

    #[test]
    fn image_at_exact_limit_is_not_scaled() {
        let size = fit_to_screen(1536.0, 864.0, SCREEN);
        assert_eq!(size, Size::new(1536.0, 864.0));
    }

    #[test]
    fn tall_image_is_limited_by_height() {
        let size = fit_to_screen(1000.0, 2000.0, SCREEN);
        assert!((size.height - 864.0).abs() < 1e-9);
        assert!((size.width - 432.0).abs() < 1e-9);
    }

    #[test]
    fn wide_image_is_limited_by_width() {
        let size = fit_to_screen(3840.0, 1000.0, SCREEN);
        assert!((size.width - 1536.0).abs() < 1e-9);
        assert!((size.height - 400.0).abs() < 1e-9);
    }

    #[test]
    fn centered_origin() {
        let origin = centered(Size::new(640.0, 480.0), SCREEN);
        assert_eq!(origin, Point::new(640.0, 300.0));
    }

    #[test]
    fn handle_sits_thirty_pixels_inside_corner() {
        assert_eq!(handle_origin(Size::new(400.0, 300.0)), Point::new(370.0, 270.0));
        assert_eq!(handle_center(Size::new(400.0, 300.0)), Point::new(382.5, 282.5));
    }

    #[test]
    fn handle_never_crosses_top_left_margin() {
        assert_eq!(handle_origin(Size::new(20.0, 10.0)), Point::new(5.0, 5.0));
    }

    #[test]
    fn handle_hit_test() {
        let size = Size::new(400.0, 300.0);
        assert!(handle_contains(size, Point::new(370.0, 270.0)));
        assert!(handle_contains(size, Point::new(394.0, 294.0)));
        assert!(!handle_contains(size, Point::new(395.0, 295.0)));
        assert!(!handle_contains(size, Point::new(100.0, 100.0)));
    }

    #[test]
    fn free_resize_is_damped_per_axis() {
        let size = resize(Size::new(400.0, 300.0), 40.0, -20.0, 4.0 / 3.0, false);
        assert_eq!(size, Size::new(420.0, 290.0));
    }

    #[test]
    fn free_resize_respects_minimums() {
        let size = resize(Size::new(210.0, 160.0), -100.0, -100.0, 1.0, false);
        assert_eq!(size, Size::new(MIN_WIDTH, MIN_HEIGHT));
    }

    #[test]
    fn proportional_resize_grows_along_diagonal() {
        let size = resize(Size::new(400.0, 200.0), 30.0, 40.0, 2.0, true);
        assert_eq!(size, Size::new(425.0, 212.5));
    }

    #[test]
    fn proportional_resize_shrinks_up_left() {
        let size = resize(Size::new(400.0, 200.0), -30.0, -40.0, 2.0, true);
        assert_eq!(size, Size::new(375.0, 187.5));
    }

    #[test]
    fn proportional_resize_grows_when_either_axis_is_positive() {
        let size = resize(Size::new(400.0, 200.0), 30.0, -40.0, 2.0, true);
        assert_eq!(size.width, 425.0);
    }

    #[test]
    fn proportional_resize_keeps_aspect_at_minimum_height() {
        // A wide image hits the height floor before the width floor.
        let size = resize(Size::new(400.0, 100.0), -1000.0, 0.0, 4.0, true);
        assert_eq!(size, Size::new(600.0, 150.0));
    }

    #[test]
    fn bounds_coordinate_conversion() {
        let bounds = Bounds::new(Point::new(100.0, 50.0), Size::new(300.0, 200.0));
        let local = bounds.to_local(Point::new(150.0, 70.0));
        assert_eq!(local, Point::new(50.0, 20.0));
        assert_eq!(bounds.to_screen(local), Point::new(150.0, 70.0));
    }
}
