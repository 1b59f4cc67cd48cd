//! Overlay module for SimpleOverlay
//!
//! Image overlay geometry, drag/resize interaction and click-through handling,
//! plus the Win32 layered window that puts them on screen.

pub mod geometry;
pub mod interaction;
pub mod style;

#[cfg(windows)]
pub mod render;
#[cfg(windows)]
pub mod window;

pub use geometry::{Bounds, Point, Size};
pub use interaction::{HandleColor, Interaction, OverlayState, PressTarget};

#[cfg(windows)]
pub use window::OverlayWindow;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OverlayError {
    #[cfg(windows)]
    #[error("Windows API error: {0}")]
    Windows(#[from] windows::core::Error),

    #[error("Overlay window already exists")]
    AlreadyOpen,

    #[error("Overlay window is closed")]
    Closed,
}

pub type OverlayResult<T> = Result<T, OverlayError>;
