//! Pixel plane codec
//!
//! A raster is stored as two flat planes in row-major pixel order: the RGB
//! triplets interleaved without padding, followed separately by one alpha
//! byte per pixel.

use super::constants::{ALPHA_CHANNELS, RGB_CHANNELS};
use crate::exceptions::{DecodeError, Result};
use image::RgbaImage;
use log::{debug, trace};
use std::path::Path;

/// Split an RGBA raster into its RGB and alpha planes
pub fn split(raster: &RgbaImage) -> (Vec<u8>, Vec<u8>) {
    let pixels = raster.width() as usize * raster.height() as usize;
    let mut rgb = Vec::with_capacity(pixels * RGB_CHANNELS);
    let mut alpha = Vec::with_capacity(pixels * ALPHA_CHANNELS);

    for pixel in raster.pixels() {
        let [r, g, b, a] = pixel.0;
        rgb.extend_from_slice(&[r, g, b]);
        alpha.push(a);
    }

    trace!(
        "🧩 Split {}x{} raster: rgb={} alpha={}",
        raster.width(),
        raster.height(),
        rgb.len(),
        alpha.len()
    );
    (rgb, alpha)
}

/// Merge RGB and alpha planes back into an RGBA raster
pub fn merge(
    rgb: &[u8],
    alpha: &[u8],
    width: u32,
    height: u32,
) -> std::result::Result<RgbaImage, DecodeError> {
    let pixels = width as usize * height as usize;

    let expected_rgb = pixels * RGB_CHANNELS;
    if rgb.len() != expected_rgb {
        return Err(DecodeError::MalformedPlaneLength {
            plane: "rgb",
            expected: expected_rgb,
            actual: rgb.len(),
        });
    }

    let expected_alpha = pixels * ALPHA_CHANNELS;
    if alpha.len() != expected_alpha {
        return Err(DecodeError::MalformedPlaneLength {
            plane: "alpha",
            expected: expected_alpha,
            actual: alpha.len(),
        });
    }

    let mut rgba = Vec::with_capacity(pixels * 4);
    for (triplet, &a) in rgb.chunks_exact(RGB_CHANNELS).zip(alpha) {
        rgba.extend_from_slice(triplet);
        rgba.push(a);
    }

    // Lengths were checked above so the buffer always fits
    RgbaImage::from_raw(width, height, rgba).ok_or(DecodeError::MalformedPlaneLength {
        plane: "rgba",
        expected: pixels * 4,
        actual: 0,
    })
}

/// Scale every pixel's alpha by `alpha / 255`
///
/// Source transparency is preserved: a pixel that was already half
/// transparent stays proportionally more transparent than an opaque one.
pub fn blend_alpha(raster: &RgbaImage, alpha: u8) -> RgbaImage {
    let mut blended = raster.clone();
    if alpha == u8::MAX {
        return blended;
    }

    for pixel in blended.pixels_mut() {
        let scaled = (u16::from(pixel.0[3]) * u16::from(alpha) + 127) / 255;
        pixel.0[3] = scaled as u8;
    }
    blended
}

/// Load a PNG (or any sniffable format) from disk as an RGBA raster
pub fn load_png(path: &Path) -> Result<RgbaImage> {
    debug!("🖼️ Loading raster from {:?}", path);
    let data = std::fs::read(path)?;
    load_png_bytes(&data)
}

/// Decode an in-memory PNG stream as an RGBA raster
pub fn load_png_bytes(data: &[u8]) -> Result<RgbaImage> {
    let raster = image::load_from_memory(data)?.to_rgba8();
    trace!("🖼️ Decoded {}x{} raster", raster.width(), raster.height());
    Ok(raster)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn sample() -> RgbaImage {
        let mut img = RgbaImage::new(2, 2);
        img.put_pixel(0, 0, Rgba([1, 2, 3, 4]));
        img.put_pixel(1, 0, Rgba([5, 6, 7, 8]));
        img.put_pixel(0, 1, Rgba([9, 10, 11, 12]));
        img.put_pixel(1, 1, Rgba([13, 14, 15, 255]));
        img
    }

    #[test]
    fn test_split_is_row_major() {
        let (rgb, alpha) = split(&sample());
        assert_eq!(rgb, vec![1, 2, 3, 5, 6, 7, 9, 10, 11, 13, 14, 15]);
        assert_eq!(alpha, vec![4, 8, 12, 255]);
    }

    #[test]
    fn test_merge_inverts_split() {
        let img = sample();
        let (rgb, alpha) = split(&img);
        let merged = merge(&rgb, &alpha, 2, 2).unwrap();
        assert_eq!(merged, img);
    }

    #[test]
    fn test_merge_rejects_short_rgb() {
        let err = merge(&[0; 11], &[0; 4], 2, 2).unwrap_err();
        assert_eq!(
            err,
            DecodeError::MalformedPlaneLength {
                plane: "rgb",
                expected: 12,
                actual: 11
            }
        );
    }

    #[test]
    fn test_merge_rejects_long_alpha() {
        let err = merge(&[0; 12], &[0; 5], 2, 2).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::MalformedPlaneLength { plane: "alpha", .. }
        ));
    }

    #[test]
    fn test_blend_alpha() {
        let img = sample();
        assert_eq!(blend_alpha(&img, 255), img);

        let clear = blend_alpha(&img, 0);
        assert!(clear.pixels().all(|p| p.0[3] == 0));

        let half = blend_alpha(&img, 128);
        assert_eq!(half.get_pixel(1, 1).0, [13, 14, 15, 128]);
        // Colour channels are untouched
        assert_eq!(half.get_pixel(0, 0).0[..3], [1, 2, 3]);
    }

    #[test]
    fn test_load_png_bytes() {
        let img = sample();
        let mut png = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();
        assert_eq!(load_png_bytes(&png).unwrap(), img);
    }
}
