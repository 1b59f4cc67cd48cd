//! GDI rendering for the overlay window

use crate::geometry::{self, HANDLE_SIZE};
use crate::interaction::{HandleColor, OverlayState};
use imaging::OverlayImage;
use std::mem::size_of;
use windows::Win32::Foundation::{COLORREF, HWND, RECT};
use windows::Win32::Graphics::Gdi::{
    BeginPaint, CreatePen, CreateSolidBrush, DeleteObject, EndPaint, FillRect, GetStockObject,
    Rectangle, SelectObject, SetDIBitsToDevice, BITMAPINFO, BITMAPINFOHEADER, BI_RGB,
    DIB_RGB_COLORS, HDC, NULL_BRUSH, PAINTSTRUCT, PS_SOLID,
};
use windows::Win32::UI::WindowsAndMessaging::GetClientRect;

// COLORREF is 0x00BBGGRR
const BORDER_COLOR: COLORREF = COLORREF(0x00FF_901E);
const HANDLE_FILL: COLORREF = COLORREF(0x00FF_FFFF);
const BACKGROUND: COLORREF = COLORREF(0x0000_0000);
const BORDER_WIDTH: i32 = 2;
const HANDLE_STROKE: i32 = 2;

fn handle_stroke(color: HandleColor) -> COLORREF {
    match color {
        HandleColor::Idle => COLORREF(0x00FF_0000),
        HandleColor::Free => COLORREF(0x0000_00FF),
        HandleColor::Proportional => COLORREF(0x0000_8000),
    }
}

/// Paints the image stretched to the client area, plus move-mode chrome
pub struct OverlayRenderer {
    source: Option<OverlayImage>,
    /// Source resampled to the last painted client size
    scaled: Option<OverlayImage>,
}

impl OverlayRenderer {
    pub fn new() -> Self {
        Self {
            source: None,
            scaled: None,
        }
    }

    pub fn set_image(&mut self, image: OverlayImage) {
        self.source = Some(image);
        self.scaled = None;
    }

    /// Render to window
    pub fn render(&mut self, hwnd: HWND, state: &OverlayState) {
        unsafe {
            let mut ps = PAINTSTRUCT::default();
            let hdc = BeginPaint(hwnd, &mut ps);

            let mut client = RECT::default();
            let _ = GetClientRect(hwnd, &mut client);
            let width = (client.right - client.left).max(1) as u32;
            let height = (client.bottom - client.top).max(1) as u32;

            match self.frame(width, height) {
                Some(frame) => Self::draw_image(hdc, frame),
                None => Self::fill(hdc, &client, BACKGROUND),
            }

            if state.shows_chrome() {
                Self::draw_border(hdc, &client);
                Self::draw_handle(hdc, state, state.handle_color(state.proportional()));
            }

            let _ = EndPaint(hwnd, &ps);
        }
    }

    fn frame(&mut self, width: u32, height: u32) -> Option<&OverlayImage> {
        let source = self.source.as_ref()?;
        let stale = self
            .scaled
            .as_ref()
            .map_or(true, |s| s.width != width || s.height != height);
        if stale {
            self.scaled = Some(source.scaled(width, height));
        }
        self.scaled.as_ref()
    }

    unsafe fn draw_image(hdc: HDC, frame: &OverlayImage) {
        let width = frame.width as i32;
        let height = frame.height as i32;

        let bmi = BITMAPINFO {
            bmiHeader: BITMAPINFOHEADER {
                biSize: size_of::<BITMAPINFOHEADER>() as u32,
                biWidth: width,
                biHeight: -height, // Top-down
                biPlanes: 1,
                biBitCount: 32,
                biCompression: BI_RGB.0,
                biSizeImage: 0,
                biXPelsPerMeter: 0,
                biYPelsPerMeter: 0,
                biClrUsed: 0,
                biClrImportant: 0,
            },
            bmiColors: [Default::default()],
        };

        SetDIBitsToDevice(
            hdc,
            0,
            0,
            width as u32,
            height as u32,
            0,
            0,
            0,
            height as u32,
            frame.bgra.as_ptr() as *const _,
            &bmi,
            DIB_RGB_COLORS,
        );
    }

    unsafe fn fill(hdc: HDC, rect: &RECT, color: COLORREF) {
        let brush = CreateSolidBrush(color);
        FillRect(hdc, rect, brush);
        let _ = DeleteObject(brush);
    }

    unsafe fn draw_border(hdc: HDC, client: &RECT) {
        let pen = CreatePen(PS_SOLID, BORDER_WIDTH, BORDER_COLOR);
        let old_pen = SelectObject(hdc, pen);
        let old_brush = SelectObject(hdc, GetStockObject(NULL_BRUSH));

        let _ = Rectangle(hdc, client.left, client.top, client.right, client.bottom);

        SelectObject(hdc, old_brush);
        SelectObject(hdc, old_pen);
        let _ = DeleteObject(pen);
    }

    unsafe fn draw_handle(hdc: HDC, state: &OverlayState, color: HandleColor) {
        let origin = geometry::handle_origin(state.bounds().size());
        let rect = RECT {
            left: origin.x.round() as i32,
            top: origin.y.round() as i32,
            right: (origin.x + HANDLE_SIZE).round() as i32,
            bottom: (origin.y + HANDLE_SIZE).round() as i32,
        };

        Self::fill(hdc, &rect, HANDLE_FILL);

        let pen = CreatePen(PS_SOLID, HANDLE_STROKE, handle_stroke(color));
        let old_pen = SelectObject(hdc, pen);
        let old_brush = SelectObject(hdc, GetStockObject(NULL_BRUSH));

        let _ = Rectangle(hdc, rect.left, rect.top, rect.right, rect.bottom);

        SelectObject(hdc, old_brush);
        SelectObject(hdc, old_pen);
        let _ = DeleteObject(pen);
    }
}

impl Default for OverlayRenderer {
    fn default() -> Self {
        Self::new()
    }
}
