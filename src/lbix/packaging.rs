// src/lbix/packaging.rs
// Container packing - image entry always, script and icon entries only when given

use super::blob::{encode_icon, encode_image};
use super::constants::{ICON_ENTRY, IMAGE_ENTRY, SCRIPT_ENTRY};
use crate::exceptions::ContainerError;
use image::RgbaImage;
use log::{debug, info, trace};
use std::fs::File;
use std::io::{Cursor, Seek, Write};
use std::path::Path;
use std::time::Instant;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

type PackResult<T> = std::result::Result<T, ContainerError>;

/// Pack a container into memory
pub fn pack(
    raster: &RgbaImage,
    script: Option<&str>,
    icon: Option<&RgbaImage>,
) -> PackResult<Vec<u8>> {
    let writer = write_entries(Cursor::new(Vec::new()), raster, script, icon)?;
    Ok(writer.into_inner())
}

/// Pack a container straight to disk
pub fn write_container(
    output_path: &Path,
    raster: &RgbaImage,
    script: Option<&str>,
    icon: Option<&RgbaImage>,
) -> PackResult<()> {
    info!("🔨 Writing container: {:?}", output_path);
    let out = File::create(output_path)?;
    let mut out = write_entries(out, raster, script, icon)?;
    out.flush()?;
    Ok(())
}

fn write_entries<W: Write + Seek>(
    sink: W,
    raster: &RgbaImage,
    script: Option<&str>,
    icon: Option<&RgbaImage>,
) -> PackResult<W> {
    let timer = Instant::now();
    let options = FileOptions::<()>::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(sink);

    let image_blob = encode_image(raster);
    zip.start_file(IMAGE_ENTRY, options)?;
    zip.write_all(&image_blob)?;
    trace!("✍️ Wrote {} ({} bytes)", IMAGE_ENTRY, image_blob.len());

    // Absence of an entry is the only "feature not present" signal
    if let Some(text) = script {
        zip.start_file(SCRIPT_ENTRY, options)?;
        zip.write_all(text.as_bytes())?;
        trace!("✍️ Wrote {} ({} bytes)", SCRIPT_ENTRY, text.len());
    }

    if let Some(icon) = icon {
        let icon_blob = encode_icon(icon);
        zip.start_file(ICON_ENTRY, options)?;
        zip.write_all(&icon_blob)?;
        trace!("✍️ Wrote {} ({} bytes)", ICON_ENTRY, icon_blob.len());
    }

    let sink = zip.finish()?;
    debug!(
        "✅ Container packed in {:?} (script={}, icon={})",
        timer.elapsed(),
        script.is_some(),
        icon.is_some()
    );
    Ok(sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::io::Read;
    use zip::ZipArchive;

    fn entry_names(bytes: &[u8]) -> Vec<String> {
        let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
        names.sort();
        names
    }

    #[test]
    fn test_image_only() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 4]));
        let bytes = pack(&img, None, None).unwrap();
        assert_eq!(entry_names(&bytes), vec![IMAGE_ENTRY.to_string()]);
    }

    #[test]
    fn test_all_entries() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 4]));
        let icon = RgbaImage::from_pixel(1, 1, Rgba([5, 6, 7, 8]));
        let bytes = pack(&img, Some("setwintitle X"), Some(&icon)).unwrap();

        assert_eq!(
            entry_names(&bytes),
            vec![
                ICON_ENTRY.to_string(),
                IMAGE_ENTRY.to_string(),
                SCRIPT_ENTRY.to_string()
            ]
        );

        let mut archive = ZipArchive::new(Cursor::new(&bytes)).unwrap();
        let mut script = String::new();
        archive
            .by_name(SCRIPT_ENTRY)
            .unwrap()
            .read_to_string(&mut script)
            .unwrap();
        assert_eq!(script, "setwintitle X");

        let mut image_blob = Vec::new();
        archive
            .by_name(IMAGE_ENTRY)
            .unwrap()
            .read_to_end(&mut image_blob)
            .unwrap();
        assert_eq!(image_blob, encode_image(&img));
    }

    #[test]
    fn test_write_container() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out.lbix");
        let img = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 255]));

        write_container(&path, &img, Some("close"), None).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(
            entry_names(&bytes),
            vec![IMAGE_ENTRY.to_string(), SCRIPT_ENTRY.to_string()]
        );
    }
}
