//! File types offered in the open dialog

/// Extensions listed under "Image Files"
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "tif", "tiff", "webp"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions_are_lowercase_and_unique() {
        for (i, ext) in SUPPORTED_EXTENSIONS.iter().enumerate() {
            assert_eq!(*ext, ext.to_ascii_lowercase());
            assert!(!SUPPORTED_EXTENSIONS[i + 1..].contains(ext));
        }
    }
}
