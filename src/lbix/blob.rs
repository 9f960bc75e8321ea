// src/lbix/blob.rs
// LBIX framed blobs - magic | width | height | marker | rgb plane | alpha plane

use super::constants::{
    ALPHA_CHANNELS, DIMENSION_SIZE, ICON_MAGIC, IMAGE_MAGIC, MARKER_SIZE, RGB_CHANNELS,
    TRANSPARENCY_MARKER,
};
use super::planes;
use crate::exceptions::DecodeError;
use image::RgbaImage;
use log::{debug, trace};

type DecodeResult<T> = std::result::Result<T, DecodeError>;

/// Which header layout a blob uses; the magic tag selects it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobKind {
    /// Main image, magic `LBIX5`
    Image,
    /// Window icon, magic `LBICON7`
    Icon,
}

impl BlobKind {
    /// Leading magic bytes for this layout
    pub fn magic(self) -> &'static [u8] {
        match self {
            BlobKind::Image => IMAGE_MAGIC,
            BlobKind::Icon => ICON_MAGIC,
        }
    }

    /// Magic as text, for error messages
    pub fn magic_str(self) -> &'static str {
        match self {
            BlobKind::Image => "LBIX5",
            BlobKind::Icon => "LBICON7",
        }
    }

    /// Offset where the RGB plane begins
    pub fn header_len(self) -> usize {
        self.magic().len() + 2 * DIMENSION_SIZE + MARKER_SIZE
    }
}

/// Fixed-width blob header
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlobHeader {
    pub kind: BlobKind,
    pub width: u32,
    pub height: u32,
    pub marker: [u8; 4], // Reserved, ignored on read
}

impl BlobHeader {
    /// Create a header with the standard transparency marker
    pub fn new(kind: BlobKind, width: u32, height: u32) -> Self {
        BlobHeader {
            kind,
            width,
            height,
            marker: *TRANSPARENCY_MARKER,
        }
    }

    /// Number of pixels described by the header
    pub fn pixel_count(&self) -> Option<usize> {
        (self.width as usize).checked_mul(self.height as usize)
    }

    /// Total blob length implied by the header, `None` if it cannot be addressed
    pub fn blob_len(&self) -> Option<usize> {
        self.pixel_count()?
            .checked_mul(RGB_CHANNELS + ALPHA_CHANNELS)?
            .checked_add(self.kind.header_len())
    }

    /// Pack header to bytes
    pub fn pack(&self) -> Vec<u8> {
        let magic = self.kind.magic();
        let mut bytes = Vec::with_capacity(self.kind.header_len());
        bytes.extend_from_slice(magic);
        bytes.extend_from_slice(&self.width.to_le_bytes());
        bytes.extend_from_slice(&self.height.to_le_bytes());
        bytes.extend_from_slice(&self.marker);
        bytes
    }

    /// Unpack header from the front of a blob
    pub fn unpack(kind: BlobKind, data: &[u8]) -> DecodeResult<Self> {
        let magic = kind.magic();
        if !data.starts_with(magic) {
            return Err(DecodeError::FormatMismatch {
                expected: kind.magic_str(),
            });
        }

        let header_len = kind.header_len();
        if data.len() < header_len {
            return Err(DecodeError::Truncated {
                needed: header_len,
                available: data.len(),
            });
        }

        // Offsets derive from the magic length, never fixed
        let width_at = magic.len();
        let height_at = width_at + DIMENSION_SIZE;
        let marker_at = height_at + DIMENSION_SIZE;

        let width = read_u32_le(data, width_at)?;
        let height = read_u32_le(data, height_at)?;
        let mut marker = [0u8; MARKER_SIZE];
        marker.copy_from_slice(&data[marker_at..marker_at + MARKER_SIZE]);

        if marker != *TRANSPARENCY_MARKER {
            debug!(
                "Unexpected transparency marker {:02x?} in {} blob (ignored)",
                marker,
                kind.magic_str()
            );
        }

        Ok(BlobHeader {
            kind,
            width,
            height,
            marker,
        })
    }
}

fn read_u32_le(data: &[u8], at: usize) -> DecodeResult<u32> {
    let bytes: [u8; DIMENSION_SIZE] = data
        .get(at..at + DIMENSION_SIZE)
        .and_then(|b| b.try_into().ok())
        .ok_or(DecodeError::Truncated {
            needed: at + DIMENSION_SIZE,
            available: data.len(),
        })?;
    Ok(u32::from_le_bytes(bytes))
}

/// Encode a raster under the given header layout
pub fn encode(kind: BlobKind, raster: &RgbaImage) -> Vec<u8> {
    let header = BlobHeader::new(kind, raster.width(), raster.height());
    let (rgb, alpha) = planes::split(raster);

    let mut bytes = header.pack();
    bytes.reserve(rgb.len() + alpha.len());
    bytes.extend_from_slice(&rgb);
    bytes.extend_from_slice(&alpha);

    debug!(
        "📦 Encoded {} blob: {}x{} -> {} bytes",
        kind.magic_str(),
        header.width,
        header.height,
        bytes.len()
    );
    bytes
}

/// Decode a blob of the given layout back into a raster
pub fn decode(kind: BlobKind, data: &[u8]) -> DecodeResult<RgbaImage> {
    let header = BlobHeader::unpack(kind, data)?;
    let header_end = kind.header_len();

    let needed = header.blob_len().ok_or(DecodeError::Truncated {
        needed: usize::MAX,
        available: data.len(),
    })?;
    if data.len() < needed {
        return Err(DecodeError::Truncated {
            needed,
            available: data.len(),
        });
    }
    if data.len() > needed {
        trace!(
            "Ignoring {} trailing bytes after {} planes",
            data.len() - needed,
            kind.magic_str()
        );
    }

    // blob_len succeeded so pixel_count cannot overflow here
    let pixels = header.pixel_count().unwrap_or_default();
    let rgb_end = header_end + pixels * RGB_CHANNELS;
    let alpha_end = rgb_end + pixels * ALPHA_CHANNELS;

    let raster = planes::merge(
        &data[header_end..rgb_end],
        &data[rgb_end..alpha_end],
        header.width,
        header.height,
    )?;
    debug!(
        "📂 Decoded {} blob: {}x{}",
        kind.magic_str(),
        header.width,
        header.height
    );
    Ok(raster)
}

/// Encode the main image (`LBIX5`)
pub fn encode_image(raster: &RgbaImage) -> Vec<u8> {
    encode(BlobKind::Image, raster)
}

/// Encode a window icon (`LBICON7`)
pub fn encode_icon(raster: &RgbaImage) -> Vec<u8> {
    encode(BlobKind::Icon, raster)
}

/// Decode the main image (`LBIX5`)
pub fn decode_image(data: &[u8]) -> DecodeResult<RgbaImage> {
    decode(BlobKind::Image, data)
}

/// Decode a window icon (`LBICON7`)
pub fn decode_icon(data: &[u8]) -> DecodeResult<RgbaImage> {
    decode(BlobKind::Icon, data)
}
