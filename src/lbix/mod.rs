//! LBIX format family
//!
//! One versioned family selected by the leading magic tag: framed plane
//! blobs (`LBIX5` image, `LBICON7` icon) are canonical, the PNG passthrough
//! entry is the legacy dialect.

pub mod blob;
pub mod cli;
pub mod constants;
pub mod defaults;
pub mod legacy;
pub mod manifest;
pub mod packaging;
pub mod planes;
pub mod reader;

use constants::{ICON_MAGIC, IMAGE_MAGIC};

// Re-export main functions
pub use blob::{decode_icon, decode_image, encode_icon, encode_image};
pub use packaging::{pack, write_container};
pub use reader::{Unpacked, open, unpack};

/// Dialects an image-like entry can be stored in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobDialect {
    /// Framed planes under `LBIX5`
    Image,
    /// Framed planes under `LBICON7`
    Icon,
    /// PNG stream stored verbatim
    LegacyPng,
}

impl BlobDialect {
    /// Short label used in reports
    pub fn label(self) -> &'static str {
        match self {
            BlobDialect::Image => "LBIX5",
            BlobDialect::Icon => "LBICON7",
            BlobDialect::LegacyPng => "PNG (legacy)",
        }
    }
}

/// Detect the dialect of an entry by its magic bytes
pub fn detect_dialect(data: &[u8]) -> Option<BlobDialect> {
    log::trace!("Detecting dialect for {} bytes", data.len());
    if data.starts_with(IMAGE_MAGIC) {
        Some(BlobDialect::Image)
    } else if data.starts_with(ICON_MAGIC) {
        Some(BlobDialect::Icon)
    } else if legacy::is_legacy_png(data) {
        Some(BlobDialect::LegacyPng)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    #[test]
    fn test_detect_dialect() {
        let img = RgbaImage::new(1, 1);
        assert_eq!(detect_dialect(&encode_image(&img)), Some(BlobDialect::Image));
        assert_eq!(detect_dialect(&encode_icon(&img)), Some(BlobDialect::Icon));
        assert_eq!(
            detect_dialect(constants::PNG_SIGNATURE),
            Some(BlobDialect::LegacyPng)
        );
        assert_eq!(detect_dialect(b"nothing"), None);
    }
}
