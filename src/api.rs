//! High-level API for lbix operations

use crate::exceptions::{LbixError, Result};
use crate::lbix::cli::{ContainerReport, inspect};
use crate::lbix::defaults::ScriptOptions;
use crate::lbix::manifest::BuildManifest;
use crate::lbix::planes::load_png;
use crate::lbix::{Unpacked, open, write_container};
use crate::script::{
    Dialogs, DisplaySurface, HeadlessSurface, Interpreter, RunReport, TerminalDialogs,
    parse_script,
};
use crate::utils::container_base_name;
use anyhow::Context;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// Options for building a container
#[derive(Debug, Default, Clone)]
pub struct BuildOptions {
    /// Main image (PNG)
    pub image: Option<PathBuf>,
    /// Script file, stored verbatim
    pub script: Option<PathBuf>,
    /// Inline script text, preferred over `script`
    pub script_text: Option<String>,
    /// Window icon (PNG)
    pub icon: Option<PathBuf>,
}

impl BuildOptions {
    /// Load options from a JSON manifest; relative paths resolve against it
    pub fn from_manifest(manifest_path: &Path) -> Result<Self> {
        let base = manifest_path.parent().unwrap_or(Path::new("."));
        let manifest = load_manifest(manifest_path)?.resolve_paths(base);
        Ok(manifest.into())
    }

    /// Fill unset fields from `other`
    pub fn or(self, other: BuildOptions) -> Self {
        BuildOptions {
            image: self.image.or(other.image),
            script: self.script.or(other.script),
            script_text: self.script_text.or(other.script_text),
            icon: self.icon.or(other.icon),
        }
    }
}

impl From<BuildManifest> for BuildOptions {
    fn from(manifest: BuildManifest) -> Self {
        BuildOptions {
            image: Some(manifest.image),
            script: manifest.script,
            script_text: manifest.script_text,
            icon: manifest.icon,
        }
    }
}

fn load_manifest(path: &Path) -> anyhow::Result<BuildManifest> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read manifest {}", path.display()))?;
    BuildManifest::from_json(&text)
        .with_context(|| format!("cannot parse manifest {}", path.display()))
}

/// Options for viewing a container
#[derive(Debug, Default, Clone)]
pub struct ViewOptions {
    pub script: ScriptOptions,
    /// Write every rendered frame here as PNG
    pub snapshot_dir: Option<PathBuf>,
}

fn read_script(options: &BuildOptions) -> anyhow::Result<Option<String>> {
    let text = match (&options.script_text, &options.script) {
        (Some(text), _) => Some(text.clone()),
        (None, Some(path)) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("cannot read script {}", path.display()))?,
        ),
        (None, None) => None,
    };

    Ok(text.and_then(|text| {
        if text.trim().is_empty() {
            warn!("⚠️ Script is empty, container will have no script entry");
            None
        } else {
            Some(text)
        }
    }))
}

/// Build a container at `output_path`
pub fn build_container(output_path: &Path, options: BuildOptions) -> Result<()> {
    let image_path = options
        .image
        .as_deref()
        .ok_or_else(|| LbixError::BuildError("an image is required".to_string()))?;
    info!("🔨 Building {:?} from {:?}", output_path, image_path);

    let image = load_png(image_path)?;
    let icon = options.icon.as_deref().map(load_png).transpose()?;
    let script = read_script(&options)?;

    // Scripts are stored verbatim; problems only surface when run
    if let Some(text) = &script {
        match parse_script(text) {
            Ok(lines) => debug!("📜 Script has {} commands", lines.len()),
            Err(e) => warn!("⚠️ Script will fail when run: {e}"),
        }
    }

    write_container(output_path, &image, script.as_deref(), icon.as_ref())?;
    info!("✅ Container written: {:?}", output_path);
    Ok(())
}

/// Open a container and decode its entries
pub fn open_container(path: &Path) -> Result<Unpacked> {
    Ok(open(path)?)
}

/// Report on a container without running it
pub fn inspect_container(path: &Path) -> Result<ContainerReport> {
    Ok(inspect(path)?)
}

/// Open a container and run its script against the given collaborators
///
/// A container without a script is shown and left open.
pub fn view_container_with<S: DisplaySurface, D: Dialogs>(
    path: &Path,
    surface: S,
    dialogs: D,
    options: ScriptOptions,
) -> Result<RunReport> {
    let unpacked = open_container(path)?;
    let name = container_base_name(path);
    debug!("🖼️ Viewing {} ({})", name, unpacked.dialect.label());

    let mut interpreter = Interpreter::new(surface, dialogs, unpacked.image, &name, options)
        .with_icon(unpacked.icon);

    match unpacked.script {
        Some(script) => Ok(interpreter.run(&script)?),
        None => {
            interpreter.open();
            Ok(interpreter.report())
        }
    }
}

/// View a container on the terminal
pub fn view_container(path: &Path, options: ViewOptions) -> Result<RunReport> {
    let surface = HeadlessSurface::new().with_snapshots(options.snapshot_dir);
    view_container_with(path, surface, TerminalDialogs::stdio(), options.script)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exceptions::ScriptError;
    use image::{Rgba, RgbaImage};
    use std::io::Cursor;
    use tempfile::TempDir;

    fn write_png(dir: &Path, name: &str, img: &RgbaImage) -> PathBuf {
        let path = dir.join(name);
        img.save(&path).unwrap();
        path
    }

    fn quiet_dialogs(input: &str) -> TerminalDialogs<Cursor<Vec<u8>>, Vec<u8>> {
        TerminalDialogs::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_build_and_view() {
        let dir = TempDir::new().unwrap();
        let img = RgbaImage::from_pixel(3, 3, Rgba([10, 20, 30, 255]));
        let image = write_png(dir.path(), "main.png", &img);
        let output = dir.path().join("pic.lbix");

        build_container(
            &output,
            BuildOptions {
                image: Some(image),
                script_text: Some(
                    "showtxtbox \"Name?\"\nsetwintitle \"hi txtboxinput from lbixname\"\ntransparency sub 55"
                        .into(),
                ),
                ..BuildOptions::default()
            },
        )
        .unwrap();

        let unpacked = open_container(&output).unwrap();
        assert_eq!(unpacked.image, img);

        let mut surface = HeadlessSurface::new().quiet();
        let report = view_container_with(
            &output,
            &mut surface,
            quiet_dialogs("Ada\n"),
            ScriptOptions::default(),
        )
        .unwrap();

        assert_eq!(report.alpha, 200);
        assert_eq!(report.executed, 3);
        assert_eq!(surface.title(), "hi Ada from pic.lbix");
    }

    #[test]
    fn test_blank_script_is_dropped() {
        let dir = TempDir::new().unwrap();
        let image = write_png(dir.path(), "main.png", &RgbaImage::new(1, 1));
        let script = dir.path().join("script.txt");
        std::fs::write(&script, "  \n\n").unwrap();
        let output = dir.path().join("out.lbix");

        build_container(
            &output,
            BuildOptions {
                image: Some(image),
                script: Some(script),
                ..BuildOptions::default()
            },
        )
        .unwrap();

        assert_eq!(open_container(&output).unwrap().script, None);
        assert!(!inspect_container(&output).unwrap().has_script);
    }

    #[test]
    fn test_build_requires_image() {
        let dir = TempDir::new().unwrap();
        let err = build_container(&dir.path().join("x.lbix"), BuildOptions::default())
            .unwrap_err();
        assert!(matches!(err, LbixError::BuildError(_)));
    }

    #[test]
    fn test_missing_script_file_names_the_path() {
        let dir = TempDir::new().unwrap();
        let image = write_png(dir.path(), "main.png", &RgbaImage::new(1, 1));
        let err = build_container(
            &dir.path().join("x.lbix"),
            BuildOptions {
                image: Some(image),
                script: Some(dir.path().join("gone.txt")),
                ..BuildOptions::default()
            },
        )
        .unwrap_err();

        match err {
            LbixError::Generic(msg) => {
                assert!(msg.contains("cannot read script"));
                assert!(msg.contains("gone.txt"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_manifest_errors_carry_context() {
        let dir = TempDir::new().unwrap();

        let missing = dir.path().join("missing.json");
        let err = BuildOptions::from_manifest(&missing).unwrap_err();
        assert!(matches!(err, LbixError::Generic(ref msg)
            if msg.contains("cannot read manifest") && msg.contains("missing.json")));

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{ not json").unwrap();
        let err = BuildOptions::from_manifest(&broken).unwrap_err();
        assert!(matches!(err, LbixError::Generic(ref msg)
            if msg.contains("cannot parse manifest") && msg.contains("broken.json")));
    }

    #[test]
    fn test_build_from_manifest() {
        let dir = TempDir::new().unwrap();
        write_png(dir.path(), "main.png", &RgbaImage::new(2, 1));
        write_png(dir.path(), "icon.png", &RgbaImage::new(1, 1));
        let manifest = dir.path().join("build.json");
        std::fs::write(
            &manifest,
            r#"{"image": "main.png", "icon": "icon.png", "script_text": "close"}"#,
        )
        .unwrap();

        let options = BuildOptions::from_manifest(&manifest).unwrap();
        let output = dir.path().join("m.lbix");
        build_container(&output, options).unwrap();

        let unpacked = open_container(&output).unwrap();
        assert_eq!(unpacked.script.as_deref(), Some("close"));
        assert!(unpacked.icon.is_some());
    }

    #[test]
    fn test_view_reports_script_error() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("bad.lbix");
        write_container(&output, &RgbaImage::new(1, 1), Some("frobnicate"), None).unwrap();

        let mut surface = HeadlessSurface::new().quiet();
        let err = view_container_with(
            &output,
            &mut surface,
            quiet_dialogs(""),
            ScriptOptions::default(),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            LbixError::Script(ScriptError::UnknownCommand { line: 1, .. })
        ));
        assert!(surface.is_live());
    }

    #[test]
    fn test_view_without_script_stays_open() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("plain.lbix");
        write_container(&output, &RgbaImage::new(2, 2), None, None).unwrap();

        let mut surface = HeadlessSurface::new().quiet();
        let report = view_container_with(
            &output,
            &mut surface,
            quiet_dialogs(""),
            ScriptOptions::default(),
        )
        .unwrap();

        assert_eq!(report.executed, 0);
        assert!(!report.closed);
        assert_eq!(surface.title(), "plain.lbix");
        assert_eq!(surface.frames(), 1);
    }

    #[test]
    fn test_options_or() {
        let flags = BuildOptions {
            image: Some("a.png".into()),
            ..BuildOptions::default()
        };
        let manifest = BuildOptions {
            image: Some("b.png".into()),
            icon: Some("i.png".into()),
            ..BuildOptions::default()
        };
        let merged = flags.or(manifest);
        assert_eq!(merged.image, Some(PathBuf::from("a.png")));
        assert_eq!(merged.icon, Some(PathBuf::from("i.png")));
    }
}
