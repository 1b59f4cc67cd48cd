//! Overlay window implementation
//!
//! The window lives on the thread that creates it and is driven by that
//! thread's message loop, so all of its state is thread-local.

use crate::{
    geometry::{self, Bounds, Point, Size},
    interaction::{Interaction, OverlayState, PressTarget},
    render::OverlayRenderer,
    style::{opacity_to_alpha, set_click_through},
    OverlayError, OverlayResult,
};
use imaging::OverlayImage;
use log::{debug, info, warn};
use once_cell::sync::OnceCell;
use std::cell::RefCell;
use windows::core::{w, PCWSTR};
use windows::Win32::Foundation::{COLORREF, HINSTANCE, HWND, LPARAM, LRESULT, POINT, WPARAM};
use windows::Win32::Graphics::Gdi::{InvalidateRect, UpdateWindow};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::Input::KeyboardAndMouse::{GetCapture, ReleaseCapture, SetCapture};
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, GetCursorPos, GetSystemMetrics, LoadCursorW,
    RegisterClassExW, SetCursor, SetLayeredWindowAttributes, SetWindowPos, ShowWindow,
    HTTRANSPARENT, HWND_TOPMOST, IDC_ARROW, IDC_SIZEALL, IDC_SIZENWSE, LWA_ALPHA, MA_NOACTIVATE,
    SM_CXSCREEN, SM_CYSCREEN, SWP_NOACTIVATE, SWP_SHOWWINDOW, SW_HIDE, WM_CAPTURECHANGED,
    WM_ERASEBKGND, WM_LBUTTONDOWN, WM_LBUTTONUP, WM_MOUSEACTIVATE, WM_MOUSEMOVE, WM_NCHITTEST,
    WM_PAINT, WM_SETCURSOR, WNDCLASSEXW, WS_EX_LAYERED, WS_EX_NOACTIVATE, WS_EX_TOOLWINDOW,
    WS_EX_TOPMOST, WS_EX_TRANSPARENT, WS_POPUP,
};

thread_local! {
    static OVERLAY_STATE: RefCell<Option<WindowState>> = RefCell::new(None);
}

struct WindowState {
    model: OverlayState,
    renderer: OverlayRenderer,
}

static CLASS: OnceCell<()> = OnceCell::new();

/// Handle to the layered overlay window
pub struct OverlayWindow {
    hwnd: HWND,
}

impl OverlayWindow {
    const CLASS_NAME: PCWSTR = w!("SimpleOverlayImage");

    // Mouse message key flags
    const MK_LBUTTON: usize = 0x0001;
    const MK_SHIFT: usize = 0x0004;

    /// Create the overlay, hidden and click-through, owned by `owner` when given
    pub fn create(owner: Option<isize>) -> OverlayResult<Self> {
        let exists = OVERLAY_STATE.with(|s| s.borrow().is_some());
        if exists {
            return Err(OverlayError::AlreadyOpen);
        }

        unsafe {
            let hmodule = GetModuleHandleW(None)?;
            let hinstance = HINSTANCE(hmodule.0);

            CLASS.get_or_try_init(|| -> OverlayResult<()> {
                let wc = WNDCLASSEXW {
                    cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
                    lpfnWndProc: Some(Self::wnd_proc),
                    hInstance: hinstance,
                    hCursor: LoadCursorW(None, IDC_ARROW)?,
                    lpszClassName: Self::CLASS_NAME,
                    ..Default::default()
                };
                if RegisterClassExW(&wc) == 0 {
                    return Err(windows::core::Error::from_win32().into());
                }
                Ok(())
            })?;

            let owner = owner
                .map(|raw| HWND(raw as *mut std::ffi::c_void))
                .unwrap_or_default();

            let hwnd = CreateWindowExW(
                WS_EX_TOPMOST | WS_EX_TOOLWINDOW | WS_EX_NOACTIVATE | WS_EX_LAYERED | WS_EX_TRANSPARENT,
                Self::CLASS_NAME,
                w!("SimpleOverlay"),
                WS_POPUP,
                0,
                0,
                1,
                1,
                owner,
                None,
                hinstance,
                None,
            )?;

            // A layered window stays invisible until it has attributes.
            if let Err(e) =
                SetLayeredWindowAttributes(hwnd, COLORREF(0), opacity_to_alpha(1.0), LWA_ALPHA)
            {
                let _ = DestroyWindow(hwnd);
                return Err(e.into());
            }
            set_click_through(hwnd, true);

            OVERLAY_STATE.with(|s| {
                *s.borrow_mut() = Some(WindowState {
                    model: OverlayState::new(),
                    renderer: OverlayRenderer::new(),
                });
            });

            info!("Overlay window created");
            Ok(Self { hwnd })
        }
    }

    fn ensure_open(&self) -> OverlayResult<()> {
        if self.hwnd.is_invalid() {
            Err(OverlayError::Closed)
        } else {
            Ok(())
        }
    }

    /// Show an image at its fitted size, centered on the primary screen
    pub fn set_image(&self, image: &OverlayImage) -> OverlayResult<()> {
        self.ensure_open()?;

        let screen = primary_screen_size();
        let bounds = with_state(|state| {
            state.renderer.set_image(image.clone());
            state.model.set_image(image.width, image.height, screen)
        });

        if let Some(bounds) = bounds {
            info!(
                "Overlay image {}x{} shown at {:.0}x{:.0}",
                image.width, image.height, bounds.width, bounds.height
            );
            apply_bounds(self.hwnd, bounds)?;
            unsafe {
                let _ = InvalidateRect(self.hwnd, None, false);
                let _ = UpdateWindow(self.hwnd);
            }
        }
        Ok(())
    }

    /// Move mode makes the overlay interactive; normal mode passes clicks through
    pub fn set_move_mode(&self, enabled: bool) -> OverlayResult<()> {
        self.ensure_open()?;

        let click_through = with_state(|state| state.model.set_move_mode(enabled)).unwrap_or(true);
        set_click_through(self.hwnd, click_through);

        unsafe {
            if !enabled && GetCapture() == self.hwnd {
                let _ = ReleaseCapture();
            }
            let _ = InvalidateRect(self.hwnd, None, false);
        }
        debug!("Move mode {}", if enabled { "on" } else { "off" });
        Ok(())
    }

    pub fn set_opacity(&self, opacity: f32) -> OverlayResult<()> {
        self.ensure_open()?;

        let opacity = with_state(|state| state.model.set_opacity(opacity)).unwrap_or(1.0);
        unsafe {
            SetLayeredWindowAttributes(self.hwnd, COLORREF(0), opacity_to_alpha(opacity), LWA_ALPHA)?;
        }
        Ok(())
    }

    /// Destroy the window. Safe to call more than once.
    pub fn close(&mut self) {
        if self.hwnd.is_invalid() {
            return;
        }

        OVERLAY_STATE.with(|s| {
            *s.borrow_mut() = None;
        });
        unsafe {
            let _ = ShowWindow(self.hwnd, SW_HIDE);
            let _ = DestroyWindow(self.hwnd);
        }
        self.hwnd = HWND::default();
        info!("Overlay window closed");
    }

    unsafe extern "system" fn wnd_proc(
        hwnd: HWND,
        msg: u32,
        wparam: WPARAM,
        lparam: LPARAM,
    ) -> LRESULT {
        match msg {
            WM_PAINT => {
                let painted = OVERLAY_STATE.with(|s| {
                    if let Some(ref mut state) = *s.borrow_mut() {
                        let WindowState { model, renderer } = state;
                        renderer.render(hwnd, model);
                        true
                    } else {
                        false
                    }
                });
                if painted {
                    LRESULT(0)
                } else {
                    DefWindowProcW(hwnd, msg, wparam, lparam)
                }
            }

            WM_ERASEBKGND => LRESULT(1),

            WM_NCHITTEST => {
                let click_through = with_state(|state| state.model.click_through()).unwrap_or(true);
                if click_through {
                    LRESULT(HTTRANSPARENT as isize)
                } else {
                    DefWindowProcW(hwnd, msg, wparam, lparam)
                }
            }

            WM_MOUSEACTIVATE => LRESULT(MA_NOACTIVATE as isize),

            WM_SETCURSOR => {
                if Self::handle_set_cursor() {
                    LRESULT(1)
                } else {
                    DefWindowProcW(hwnd, msg, wparam, lparam)
                }
            }

            WM_LBUTTONDOWN => {
                Self::handle_mouse_down(hwnd, lparam);
                LRESULT(0)
            }

            WM_MOUSEMOVE => {
                Self::handle_mouse_move(hwnd, wparam);
                LRESULT(0)
            }

            WM_LBUTTONUP => {
                Self::handle_mouse_up(hwnd);
                LRESULT(0)
            }

            WM_CAPTURECHANGED => {
                // Capture lost mid-gesture ends it.
                with_state(|state| state.model.pointer_up());
                let _ = InvalidateRect(hwnd, None, false);
                LRESULT(0)
            }

            _ => DefWindowProcW(hwnd, msg, wparam, lparam),
        }
    }

    unsafe fn handle_set_cursor() -> bool {
        let Some(screen) = cursor_pos() else {
            return false;
        };
        let cursor = with_state(|state| {
            if !state.model.shows_chrome() {
                return None;
            }
            let bounds = state.model.bounds();
            let on_handle = state.model.interaction() == Interaction::Resizing
                || geometry::handle_contains(bounds.size(), bounds.to_local(screen));
            Some(if on_handle { IDC_SIZENWSE } else { IDC_SIZEALL })
        })
        .flatten();

        match cursor.and_then(|id| LoadCursorW(None, id).ok()) {
            Some(cursor) => {
                SetCursor(cursor);
                true
            }
            None => false,
        }
    }

    unsafe fn handle_mouse_down(hwnd: HWND, lparam: LPARAM) {
        let x = (lparam.0 & 0xFFFF) as i16 as f64;
        let y = ((lparam.0 >> 16) & 0xFFFF) as i16 as f64;
        let Some(screen) = cursor_pos() else {
            return;
        };

        let target = with_state(|state| state.model.pointer_down(Point::new(x, y), screen))
            .unwrap_or(PressTarget::Ignored);

        if target != PressTarget::Ignored {
            SetCapture(hwnd);
            let _ = InvalidateRect(hwnd, None, false);
        }
    }

    unsafe fn handle_mouse_move(hwnd: HWND, wparam: WPARAM) {
        if wparam.0 & Self::MK_LBUTTON == 0 {
            return;
        }
        let proportional = wparam.0 & Self::MK_SHIFT != 0;
        let Some(screen) = cursor_pos() else {
            return;
        };

        // Compute under the borrow, touch the window after it is released:
        // SetWindowPos sends messages back into wnd_proc synchronously.
        let Some((change, recolored)) = with_state(|state| {
            let recolored = state.model.set_proportional(proportional);
            let change = match state.model.interaction() {
                Interaction::Dragging { .. } => state.model.drag_to(screen).map(|b| (b, false)),
                Interaction::Resizing => state
                    .model
                    .resize_to(screen, proportional)
                    .map(|b| (b, true)),
                Interaction::Idle => None,
            };
            (change, recolored)
        }) else {
            return;
        };

        let mut repaint = recolored;
        if let Some((bounds, resized)) = change {
            if let Err(e) = apply_bounds(hwnd, bounds) {
                warn!("Failed to move overlay to {:?}: {}", bounds, e);
            }
            repaint |= resized;
        }
        if repaint {
            let _ = InvalidateRect(hwnd, None, false);
        }
    }

    unsafe fn handle_mouse_up(hwnd: HWND) {
        let ended = with_state(|state| state.model.pointer_up()).unwrap_or(false);

        if ended {
            let _ = ReleaseCapture();
            let _ = InvalidateRect(hwnd, None, false);
        }
    }
}

impl Drop for OverlayWindow {
    fn drop(&mut self) {
        self.close();
    }
}

fn with_state<R>(f: impl FnOnce(&mut WindowState) -> R) -> Option<R> {
    OVERLAY_STATE.with(|s| s.borrow_mut().as_mut().map(f))
}

fn cursor_pos() -> Option<Point> {
    let mut pt = POINT::default();
    unsafe { GetCursorPos(&mut pt).ok()? };
    Some(Point::new(pt.x as f64, pt.y as f64))
}

fn primary_screen_size() -> Size {
    unsafe {
        Size::new(
            GetSystemMetrics(SM_CXSCREEN) as f64,
            GetSystemMetrics(SM_CYSCREEN) as f64,
        )
    }
}

fn apply_bounds(hwnd: HWND, bounds: Bounds) -> OverlayResult<()> {
    unsafe {
        SetWindowPos(
            hwnd,
            HWND_TOPMOST,
            bounds.x.round() as i32,
            bounds.y.round() as i32,
            bounds.width.round() as i32,
            bounds.height.round() as i32,
            SWP_NOACTIVATE | SWP_SHOWWINDOW,
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moving_a_missing_window_reports_failure() {
        let bounds = Bounds::new(Point::new(0.0, 0.0), Size::new(200.0, 150.0));
        assert!(apply_bounds(HWND::default(), bounds).is_err());
    }
}
