//! Legacy passthrough dialect
//!
//! Early containers stored the main image as a PNG stream verbatim instead
//! of framed planes. These are still readable; nothing writes them.

use super::constants::PNG_SIGNATURE;
use crate::exceptions::DecodeError;
use image::RgbaImage;
use log::debug;

/// True if the entry bytes are a PNG stream
pub fn is_legacy_png(data: &[u8]) -> bool {
    data.starts_with(PNG_SIGNATURE)
}

/// Decode a legacy PNG image entry
pub fn decode_legacy_png(data: &[u8]) -> Result<RgbaImage, DecodeError> {
    if !is_legacy_png(data) {
        return Err(DecodeError::FormatMismatch { expected: "PNG" });
    }

    let raster = image::load_from_memory_with_format(data, image::ImageFormat::Png)
        .map_err(|e| DecodeError::LegacyPng(e.to_string()))?
        .to_rgba8();
    debug!(
        "🗃️ Decoded legacy PNG entry: {}x{}",
        raster.width(),
        raster.height()
    );
    Ok(raster)
}
