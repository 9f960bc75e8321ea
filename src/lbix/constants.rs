// src/lbix/constants.rs
// Core format constants that never change
// For defaults and configuration, see defaults.rs

// Magic tags - the tag selects both format and header layout
pub const IMAGE_MAGIC: &[u8] = b"LBIX5"; // Main image blob
pub const ICON_MAGIC: &[u8] = b"LBICON7"; // Window icon blob

// Reserved transparency marker, written after width/height
pub const TRANSPARENCY_MARKER: &[u8; 4] = b"TRAN";

// Fixed field widths
pub const DIMENSION_SIZE: usize = 4; // u32 little-endian
pub const MARKER_SIZE: usize = 4;

// Bytes per pixel in each plane
pub const RGB_CHANNELS: usize = 3;
pub const ALPHA_CHANNELS: usize = 1;

// Container entry names - fixed and case-sensitive
pub const IMAGE_ENTRY: &str = "main.lbimg";
pub const SCRIPT_ENTRY: &str = "script.lbix";
pub const ICON_ENTRY: &str = "icon.lbicon";

// Legacy passthrough dialect stores a PNG stream verbatim
pub const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

// Entry size limits - declared sizes are untrusted
pub const MAX_ENTRY_SIZE: u64 = 1 << 30; // 1 GiB, fits a 16384x16384 plane blob
pub const MAX_ENTRY_PREALLOC: u64 = 16 << 20;

// Archive signature used to reject non-containers early
pub const ZIP_SIGNATURE: &[u8] = b"PK\x03\x04";
pub const ZIP_EMPTY_SIGNATURE: &[u8] = b"PK\x05\x06";
