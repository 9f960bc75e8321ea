// src/lbix/reader.rs
// Container reader - required image entry, opportunistic script and icon entries

use super::blob::{decode_icon, decode_image};
use super::constants::{
    ICON_ENTRY, IMAGE_ENTRY, MAX_ENTRY_PREALLOC, MAX_ENTRY_SIZE, SCRIPT_ENTRY,
    ZIP_EMPTY_SIGNATURE, ZIP_SIGNATURE,
};
use super::legacy::decode_legacy_png;
use super::{BlobDialect, detect_dialect};
use crate::exceptions::ContainerError;
use image::RgbaImage;
use log::{debug, trace, warn};
use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use std::time::Instant;
use zip::ZipArchive;
use zip::result::ZipError;

type ReadResult<T> = std::result::Result<T, ContainerError>;

/// Everything a viewer needs from a container
#[derive(Debug, Clone, PartialEq)]
pub struct Unpacked {
    pub image: RgbaImage,
    pub script: Option<String>,
    pub icon: Option<RgbaImage>,
    /// Dialect the image entry was stored in
    pub dialect: BlobDialect,
}

/// Reader over a container archive
pub struct Reader<R: Read + Seek> {
    archive: ZipArchive<R>,
}

impl<R: Read + Seek> std::fmt::Debug for Reader<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reader")
            .field("entries", &self.archive.len())
            .finish()
    }
}

impl Reader<File> {
    /// Open a container file from disk
    pub fn open(path: &Path) -> ReadResult<Self> {
        trace!("Creating reader for: {:?}", path);
        let file = File::open(path)?;
        Self::new(file)
    }
}

impl<R: Read + Seek> Reader<R> {
    /// Wrap any seekable source
    pub fn new(source: R) -> ReadResult<Self> {
        let archive = ZipArchive::new(source).map_err(|e| match e {
            ZipError::Io(io) if io.kind() != std::io::ErrorKind::UnexpectedEof => {
                ContainerError::Io(io)
            }
            other => ContainerError::NotAContainer(other.to_string()),
        })?;
        debug!("📖 Opened container with {} entries", archive.len());
        Ok(Self { archive })
    }

    /// Names of every entry in archive order
    pub fn entry_names(&self) -> Vec<String> {
        self.archive.file_names().map(str::to_string).collect()
    }

    /// Read a named entry, `None` if absent
    pub fn read_entry(&mut self, name: &str) -> ReadResult<Option<Vec<u8>>> {
        let mut entry = match self.archive.by_name(name) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let declared = entry.size();
        if declared > MAX_ENTRY_SIZE {
            return Err(ContainerError::Archive(format!(
                "entry {name} declares {declared} bytes, limit is {MAX_ENTRY_SIZE}"
            )));
        }

        // The declared size only sizes the first allocation; the read is bounded separately
        let mut data = Vec::with_capacity(declared.min(MAX_ENTRY_PREALLOC) as usize);
        (&mut entry).take(MAX_ENTRY_SIZE + 1).read_to_end(&mut data)?;
        if data.len() as u64 > MAX_ENTRY_SIZE {
            return Err(ContainerError::Archive(format!(
                "entry {name} inflates past {MAX_ENTRY_SIZE} bytes"
            )));
        }
        trace!("📄 Read entry {} ({} bytes)", name, data.len());
        Ok(Some(data))
    }

    /// Decode the image and whatever optional entries are usable
    pub fn unpack(&mut self) -> ReadResult<Unpacked> {
        let timer = Instant::now();

        let image_data = self
            .read_entry(IMAGE_ENTRY)?
            .ok_or(ContainerError::MissingImageEntry)?;

        // A corrupt image entry aborts the open; no partial raster is returned
        let (image, dialect) = match detect_dialect(&image_data) {
            Some(BlobDialect::LegacyPng) => {
                (decode_legacy_png(&image_data)?, BlobDialect::LegacyPng)
            }
            _ => (decode_image(&image_data)?, BlobDialect::Image),
        };

        let script = self.read_optional_script()?;
        let icon = self.read_optional_icon()?;

        debug!(
            "✅ Container unpacked in {:?}: {}x{} {} (script={}, icon={})",
            timer.elapsed(),
            image.width(),
            image.height(),
            dialect.label(),
            script.is_some(),
            icon.is_some()
        );

        Ok(Unpacked {
            image,
            script,
            icon,
            dialect,
        })
    }

    fn read_optional_script(&mut self) -> ReadResult<Option<String>> {
        let Some(data) = self.read_entry(SCRIPT_ENTRY)? else {
            return Ok(None);
        };
        match String::from_utf8(data) {
            Ok(text) => Ok(Some(text)),
            Err(e) => {
                warn!("⚠️ Script entry is not valid UTF-8, treating as absent: {e}");
                Ok(None)
            }
        }
    }

    fn read_optional_icon(&mut self) -> ReadResult<Option<RgbaImage>> {
        let Some(data) = self.read_entry(ICON_ENTRY)? else {
            return Ok(None);
        };
        match decode_icon(&data) {
            Ok(icon) => Ok(Some(icon)),
            Err(e) => {
                warn!("⚠️ Icon entry unreadable, treating as absent: {e}");
                Ok(None)
            }
        }
    }
}

/// Whether `bytes` start with an archive signature
pub fn has_archive_signature(bytes: &[u8]) -> bool {
    bytes.starts_with(ZIP_SIGNATURE) || bytes.starts_with(ZIP_EMPTY_SIGNATURE)
}

/// Unpack a container held in memory
pub fn unpack(bytes: &[u8]) -> ReadResult<Unpacked> {
    if !has_archive_signature(bytes) {
        return Err(ContainerError::NotAContainer(
            "missing archive signature".to_string(),
        ));
    }
    Reader::new(Cursor::new(bytes))?.unpack()
}

/// Open and unpack a container file
pub fn open(path: &Path) -> ReadResult<Unpacked> {
    Reader::open(path)?.unpack()
}
