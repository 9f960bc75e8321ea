//! Terminal-backed collaborators for running scripts without a window system

use super::surface::{Dialogs, DisplaySurface};
use image::RgbaImage;
use log::{debug, trace, warn};
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// A surface that reports what a window would show
///
/// Titles and renders are printed to stdout. When `snapshot_dir` is set,
/// every rendered frame is also written there as `frame-NNN.png`.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    live: bool,
    destroyed: bool,
    title: String,
    frames: usize,
    snapshot_dir: Option<PathBuf>,
    quiet: bool,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save each rendered frame under `dir`
    pub fn with_snapshots(mut self, dir: Option<PathBuf>) -> Self {
        self.snapshot_dir = dir;
        self
    }

    /// Log events without printing them
    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Number of frames rendered so far
    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn was_destroyed(&self) -> bool {
        self.destroyed
    }

    fn announce(&self, message: &str) {
        if !self.quiet {
            println!("{message}");
        }
    }

    fn save_frame(&self, frame: &RgbaImage) {
        let Some(dir) = &self.snapshot_dir else {
            return;
        };
        let path = dir.join(format!("frame-{:03}.png", self.frames));
        let saved = std::fs::create_dir_all(dir)
            .map_err(|e| e.to_string())
            .and_then(|()| frame.save(&path).map_err(|e| e.to_string()));
        match saved {
            Ok(()) => debug!("📸 Saved frame to {}", path.display()),
            Err(e) => warn!("⚠️ Could not save frame {}: {e}", path.display()),
        }
    }
}

impl DisplaySurface for HeadlessSurface {
    fn is_live(&self) -> bool {
        self.live
    }

    fn render(&mut self, frame: &RgbaImage) {
        if self.destroyed {
            trace!("Render after destroy ignored");
            return;
        }
        self.live = true;
        self.frames += 1;
        let alpha = frame.pixels().map(|p| p.0[3]).max().unwrap_or(0);
        self.announce(&format!(
            "🖼️  frame {} ({}x{}, max alpha {alpha})",
            self.frames,
            frame.width(),
            frame.height()
        ));
        self.save_frame(frame);
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
        debug!("🏷️ Title set to {title:?}");
        self.announce(&format!("🏷️  title: {title}"));
    }

    fn set_icon(&mut self, icon: &RgbaImage) {
        debug!("Icon set ({}x{})", icon.width(), icon.height());
    }

    fn pump(&mut self) {
        trace!("Event pump");
    }

    fn destroy(&mut self) {
        if self.live {
            self.live = false;
            self.destroyed = true;
            self.announce("🚪 window closed");
        }
    }
}

/// Dialogs answered on a text stream
///
/// An empty answer or end of input counts as cancel.
#[derive(Debug)]
pub struct TerminalDialogs<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalDialogs<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn write(&mut self, text: &str) {
        if let Err(e) = self.output.write_all(text.as_bytes()).and_then(|()| self.output.flush()) {
            warn!("⚠️ Dialog output failed: {e}");
        }
    }

    fn read_answer(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => {
                let answer = line.trim_end_matches(['\r', '\n']);
                if answer.is_empty() {
                    None
                } else {
                    Some(answer.to_string())
                }
            }
            Err(e) => {
                warn!("⚠️ Dialog input failed: {e}");
                None
            }
        }
    }
}

impl TerminalDialogs<std::io::StdinLock<'static>, std::io::Stdout> {
    /// Dialogs on the process's stdin and stdout
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> Dialogs for TerminalDialogs<R, W> {
    fn show_message(&mut self, title: &str, text: &str) {
        self.write(&format!("💬 [{title}]\n{text}\n"));
    }

    fn show_error(&mut self, title: &str, text: &str) {
        self.write(&format!("❌ [{title}]\n{text}\n"));
    }

    fn ask_text(&mut self, title: &str, prompt: &str) -> Option<String> {
        self.write(&format!("✏️  [{title}] {prompt}: "));
        self.read_answer()
    }

    fn pick_file(&mut self, title: &str) -> Option<PathBuf> {
        self.write(&format!("📂 [{title}] path: "));
        self.read_answer().map(PathBuf::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::io::Cursor;
    use tempfile::TempDir;

    #[test]
    fn test_surface_lifecycle() {
        let mut surface = HeadlessSurface::new().quiet();
        assert!(!surface.is_live());

        surface.render(&RgbaImage::new(2, 2));
        surface.set_title("hello");
        assert!(surface.is_live());
        assert_eq!(surface.title(), "hello");
        assert_eq!(surface.frames(), 1);

        surface.destroy();
        surface.destroy();
        assert!(!surface.is_live());
        assert!(surface.was_destroyed());

        surface.render(&RgbaImage::new(2, 2));
        assert!(!surface.is_live());
        assert_eq!(surface.frames(), 1);
    }

    #[test]
    fn test_snapshots_written() {
        let dir = TempDir::new().unwrap();
        let snapshots = dir.path().join("frames");
        let mut surface = HeadlessSurface::new()
            .quiet()
            .with_snapshots(Some(snapshots.clone()));

        surface.render(&RgbaImage::from_pixel(3, 1, Rgba([1, 2, 3, 128])));
        surface.render(&RgbaImage::from_pixel(3, 1, Rgba([1, 2, 3, 64])));

        let second = image::open(snapshots.join("frame-002.png")).unwrap().to_rgba8();
        assert!(snapshots.join("frame-001.png").exists());
        assert_eq!(second.get_pixel(0, 0), &Rgba([1, 2, 3, 64]));
    }

    #[test]
    fn test_terminal_dialogs() {
        let input = Cursor::new(b"Ada\n\n/tmp/file.txt\r\n".to_vec());
        let mut dialogs = TerminalDialogs::new(input, Vec::new());

        dialogs.show_message("Hi", "there");
        assert_eq!(dialogs.ask_text("Input", "Name"), Some("Ada".into()));
        assert_eq!(dialogs.ask_text("Input", "Again"), None);
        assert_eq!(
            dialogs.pick_file("Pick"),
            Some(PathBuf::from("/tmp/file.txt"))
        );
        // End of input cancels
        assert_eq!(dialogs.pick_file("Pick"), None);

        let output = String::from_utf8(dialogs.into_output()).unwrap();
        assert!(output.contains("[Hi]\nthere"));
        assert!(output.contains("Name: "));
    }
}
