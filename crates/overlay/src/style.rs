//! Click-through window styles and layered-window opacity

/// `WS_EX_TRANSPARENT`: hit testing skips the window
pub const EX_TRANSPARENT: u32 = 0x0000_0020;
/// `WS_EX_LAYERED`: per-window alpha is honored
pub const EX_LAYERED: u32 = 0x0008_0000;

/// Extended style with click-through switched on or off.
///
/// The window stays layered either way so its opacity survives the toggle.
pub fn click_through_style(ex_style: u32, enabled: bool) -> u32 {
    if enabled {
        ex_style | EX_TRANSPARENT | EX_LAYERED
    } else {
        (ex_style & !EX_TRANSPARENT) | EX_LAYERED
    }
}

/// Layered-window alpha for an opacity in `[0, 1]`
pub fn opacity_to_alpha(opacity: f32) -> u8 {
    let opacity = if opacity.is_nan() { 1.0 } else { opacity.clamp(0.0, 1.0) };
    (opacity * 255.0).round() as u8
}

#[cfg(windows)]
pub use platform::set_click_through;

#[cfg(windows)]
mod platform {
    use super::click_through_style;
    use log::{debug, warn};
    use windows::Win32::Foundation::{GetLastError, SetLastError, HWND, WIN32_ERROR};
    use windows::Win32::UI::WindowsAndMessaging::{GetWindowLongW, SetWindowLongW, GWL_EXSTYLE};

    /// Apply click-through to a live window. Failures are logged, not raised.
    pub fn set_click_through(hwnd: HWND, enabled: bool) {
        if hwnd.is_invalid() {
            return;
        }

        unsafe {
            let current = GetWindowLongW(hwnd, GWL_EXSTYLE) as u32;
            let updated = click_through_style(current, enabled);
            if updated == current {
                return;
            }

            // SetWindowLongW returns 0 both on failure and when the old value was 0.
            SetLastError(WIN32_ERROR(0));
            if SetWindowLongW(hwnd, GWL_EXSTYLE, updated as i32) == 0 {
                let err = GetLastError();
                if err.0 != 0 {
                    warn!("Failed to set click-through={}: error {}", enabled, err.0);
                    return;
                }
            }
        }

        debug!("Click-through {}", if enabled { "on" } else { "off" });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EX_TOPMOST: u32 = 0x0000_0008;

    #[test]
    fn enabling_sets_transparent_and_layered() {
        let style = click_through_style(EX_TOPMOST, true);
        assert_eq!(style, EX_TOPMOST | EX_TRANSPARENT | EX_LAYERED);
    }

    #[test]
    fn disabling_clears_only_transparent() {
        let style = click_through_style(EX_TOPMOST | EX_TRANSPARENT | EX_LAYERED, false);
        assert_eq!(style, EX_TOPMOST | EX_LAYERED);
    }

    #[test]
    fn disabling_keeps_window_layered() {
        assert_eq!(click_through_style(0, false), EX_LAYERED);
    }

    #[test]
    fn toggle_is_idempotent() {
        let once = click_through_style(EX_TOPMOST, true);
        assert_eq!(click_through_style(once, true), once);
    }

    #[test]
    fn alpha_conversion() {
        assert_eq!(opacity_to_alpha(1.0), 255);
        assert_eq!(opacity_to_alpha(0.0), 0);
        assert_eq!(opacity_to_alpha(0.5), 128);
        assert_eq!(opacity_to_alpha(3.0), 255);
    }
}
