//! Decoding image files into BGRA buffers

use crate::{ImagingError, ImagingResult, OverlayImage};
use image::{DynamicImage, ImageFormat};
use log::debug;
use std::fs;
use std::path::Path;

/// Load an image file for display on the overlay
pub fn load_image(path: &Path) -> ImagingResult<OverlayImage> {
    let data = fs::read(path).map_err(|source| ImagingError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let format = detect_format(path, &data)?;
    let img = image::load_from_memory_with_format(&data, format)?;

    debug!(
        "Decoded {} as {:?} ({}x{})",
        path.display(),
        format,
        img.width(),
        img.height()
    );

    to_overlay_image(img)
}

/// Content sniffing first, then the file extension
fn detect_format(path: &Path, data: &[u8]) -> ImagingResult<ImageFormat> {
    image::guess_format(data)
        .or_else(|_| ImageFormat::from_path(path))
        .map_err(|_| ImagingError::UnknownFormat(path.to_path_buf()))
}

fn to_overlay_image(img: DynamicImage) -> ImagingResult<OverlayImage> {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(ImagingError::EmptyImage);
    }

    let mut bgra = rgba.into_raw();
    for pixel in bgra.chunks_exact_mut(4) {
        pixel.swap(0, 2); // Swap R and B
    }

    Ok(OverlayImage {
        width,
        height,
        bgra,
    })
}
