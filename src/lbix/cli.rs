//! CLI command handlers for LBIX containers

use super::blob::{BlobHeader, BlobKind};
use super::constants::{ICON_ENTRY, IMAGE_ENTRY, SCRIPT_ENTRY};
use super::detect_dialect;
use super::reader::Reader;
use crate::exceptions::ContainerError;
use crate::script::parse_script;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::Path;

/// One archive entry as seen by `--info`
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EntryReport {
    pub name: String,
    pub size: usize,
    pub sha256: String,
    /// Dialect label for image-like entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dialect: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<(u32, u32)>,
}

/// Summary of a container without running its script
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ContainerReport {
    pub path: String,
    pub entries: Vec<EntryReport>,
    pub has_script: bool,
    pub script_lines: usize,
    /// First parse error in the script, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script_error: Option<String>,
    pub has_icon: bool,
}

fn describe_entry(name: &str, data: &[u8]) -> EntryReport {
    let digest = Sha256::digest(data);

    let (dialect, dimensions) = match detect_dialect(data) {
        Some(dialect) => {
            let kind = if data.starts_with(BlobKind::Icon.magic()) {
                BlobKind::Icon
            } else {
                BlobKind::Image
            };
            let dimensions = BlobHeader::unpack(kind, data)
                .ok()
                .map(|header| (header.width, header.height));
            (Some(dialect.label().to_string()), dimensions)
        }
        None => (None, None),
    };

    EntryReport {
        name: name.to_string(),
        size: data.len(),
        sha256: hex::encode(digest),
        dialect,
        dimensions,
    }
}

/// Collect a report for the container at `path`
pub fn inspect(path: &Path) -> Result<ContainerReport, ContainerError> {
    log::trace!("inspect starting for: {:?}", path);
    let mut reader = Reader::open(path)?;

    let mut names = reader.entry_names();
    names.sort();

    let mut entries = Vec::with_capacity(names.len());
    let mut script = None;
    for name in &names {
        let Some(data) = reader.read_entry(name)? else {
            continue;
        };
        if name == SCRIPT_ENTRY {
            script = Some(String::from_utf8_lossy(&data).into_owned());
        }
        entries.push(describe_entry(name, &data));
    }

    if !names.iter().any(|n| n == IMAGE_ENTRY) {
        return Err(ContainerError::MissingImageEntry);
    }

    let script_error = script
        .as_deref()
        .and_then(|text| parse_script(text).err())
        .map(|e| e.to_string());

    Ok(ContainerReport {
        path: path.display().to_string(),
        has_script: script.is_some(),
        script_lines: script.as_deref().map_or(0, |s| s.lines().count()),
        script_error,
        has_icon: names.iter().any(|n| n == ICON_ENTRY),
        entries,
    })
}

/// Print a human-readable report
pub fn show_info(path: &Path) -> i32 {
    let report = match inspect(path) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: Failed to inspect container: {}", e);
            return 1;
        }
    };

    println!("🖼️  Container: {}", report.path);
    println!();
    println!("📦 Entries:");
    for entry in &report.entries {
        print!("  {} ({} bytes)", entry.name, entry.size);
        if let Some(dialect) = &entry.dialect {
            print!(" [{}]", dialect);
        }
        if let Some((w, h)) = entry.dimensions {
            print!(" {}x{}", w, h);
        }
        println!();
        println!("    sha256: {}", entry.sha256);
    }
    println!();
    println!("📜 Script:");
    if report.has_script {
        println!("  Lines: {}", report.script_lines);
        match &report.script_error {
            Some(err) => println!("  ✗ {}", err),
            None => println!("  ✓ Parses cleanly"),
        }
    } else {
        println!("  (none)");
    }
    println!("  Icon: {}", if report.has_icon { "yes" } else { "no" });

    0
}

/// Print the report as JSON
pub fn show_report_json(path: &Path) -> i32 {
    let report = match inspect(path) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: Failed to inspect container: {}", e);
            return 1;
        }
    };

    match serde_json::to_string_pretty(&report) {
        Ok(json) => {
            println!("{}", json);
            0
        }
        Err(e) => {
            eprintln!("Error: Failed to encode report: {}", e);
            1
        }
    }
}
