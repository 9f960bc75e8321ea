//! Collaborator seams driven by the interpreter
//!
//! The window and dialogs are owned by the front end. The interpreter only
//! ever talks to them through these traits, passed in at construction.

use image::RgbaImage;
use std::path::PathBuf;

/// The live window the decoded image is shown in
pub trait DisplaySurface {
    /// False before the first render and after the window was destroyed
    /// or closed externally
    fn is_live(&self) -> bool;

    /// Show `frame`, opening the window on first use
    fn render(&mut self, frame: &RgbaImage);

    fn set_title(&mut self, title: &str);

    /// Use `icon` as the window icon
    fn set_icon(&mut self, _icon: &RgbaImage) {}

    /// Process pending window events once so the window stays responsive
    fn pump(&mut self);

    /// Tear the window down; must be a no-op when already gone
    fn destroy(&mut self);
}

/// Modal dialogs; every call blocks until the user dismisses it
pub trait Dialogs {
    fn show_message(&mut self, title: &str, text: &str);

    fn show_error(&mut self, title: &str, text: &str);

    /// `None` when the user cancels
    fn ask_text(&mut self, title: &str, prompt: &str) -> Option<String>;

    /// `None` when the user cancels
    fn pick_file(&mut self, title: &str) -> Option<PathBuf>;
}

impl<T: DisplaySurface + ?Sized> DisplaySurface for &mut T {
    fn is_live(&self) -> bool {
        (**self).is_live()
    }

    fn render(&mut self, frame: &RgbaImage) {
        (**self).render(frame)
    }

    fn set_title(&mut self, title: &str) {
        (**self).set_title(title)
    }

    fn set_icon(&mut self, icon: &RgbaImage) {
        (**self).set_icon(icon)
    }

    fn pump(&mut self) {
        (**self).pump()
    }

    fn destroy(&mut self) {
        (**self).destroy()
    }
}

impl<T: Dialogs + ?Sized> Dialogs for &mut T {
    fn show_message(&mut self, title: &str, text: &str) {
        (**self).show_message(title, text)
    }

    fn show_error(&mut self, title: &str, text: &str) {
        (**self).show_error(title, text)
    }

    fn ask_text(&mut self, title: &str, prompt: &str) -> Option<String> {
        (**self).ask_text(title, prompt)
    }

    fn pick_file(&mut self, title: &str) -> Option<PathBuf> {
        (**self).pick_file(title)
    }
}
