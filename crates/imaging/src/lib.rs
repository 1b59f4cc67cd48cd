//! Image loading for SimpleOverlay
//!
//! Decodes image files into BGRA pixel buffers ready to blit onto an overlay.

mod decode;
mod formats;

pub use decode::load_image;
pub use formats::SUPPORTED_EXTENSIONS;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImagingError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unrecognized image format: {}", .0.display())]
    UnknownFormat(PathBuf),

    #[error("{0}")]
    Decode(#[from] image::ImageError),

    #[error("image has no pixels")]
    EmptyImage,
}

pub type ImagingResult<T> = Result<T, ImagingError>;

/// Decoded image in top-down BGRA order (the layout of a 32-bit DIB)
#[derive(Clone, PartialEq, Eq)]
pub struct OverlayImage {
    pub width: u32,
    pub height: u32,
    pub bgra: Vec<u8>,
}

impl std::fmt::Debug for OverlayImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.bgra.len())
            .finish()
    }
}

impl OverlayImage {
    /// Resample to the given pixel size
    pub fn scaled(&self, width: u32, height: u32) -> OverlayImage {
        let width = width.max(1);
        let height = height.max(1);
        if width == self.width && height == self.height {
            return self.clone();
        }

        // Channel order does not matter to the filter, so BGRA goes through as RGBA.
        let Some(buffer) = image::RgbaImage::from_raw(self.width, self.height, self.bgra.clone())
        else {
            return self.clone();
        };
        let resized = image::imageops::resize(
            &buffer,
            width,
            height,
            image::imageops::FilterType::Triangle,
        );

        OverlayImage {
            width,
            height,
            bgra: resized.into_raw(),
        }
    }

    /// Pixels in RGBA order
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut rgba = self.bgra.clone();
        for pixel in rgba.chunks_exact_mut(4) {
            pixel.swap(0, 2);
        }
        rgba
    }
}
