//! LBScript interpreter
//!
//! Runs a script body top to bottom against one display surface. Each line
//! is parsed and executed before the next one is read, so a failing line
//! never lets a later line run.

use super::command::{AlphaOp, Command, ScriptLine, parse_line};
use super::expr::{ExprError, expand_inline_math};
use super::placeholders::{FILEPICKED, LBIXNAME, TXTBOXINPUT, Variables};
use super::surface::{Dialogs, DisplaySurface};
use crate::exceptions::ScriptError;
use crate::lbix::defaults::{
    DEFAULT_ALPHA, MAX_ALPHA, MIN_ALPHA, SCRIPT_ERROR_TITLE, ScriptOptions, TEXTBOX_TITLE,
};
use crate::lbix::planes::blend_alpha;
use image::RgbaImage;
use log::{debug, info, trace, warn};
use std::thread;
use std::time::{Duration, Instant};

/// Mutable state owned by one interpreter
///
/// Alpha adjustments accumulate unclamped and only the shown alpha is
/// clamped, so `sub 1000` followed by `add 10` still shows 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpreterState {
    pub variables: Variables,
    /// Sum of every adjustment so far; only the clamped value is shown
    alpha_level: i64,
}

impl InterpreterState {
    pub fn new(lbix_name: &str) -> Self {
        Self {
            variables: Variables::new(lbix_name),
            alpha_level: i64::from(DEFAULT_ALPHA),
        }
    }

    /// Effective display alpha in `[0, 255]`
    pub fn alpha(&self) -> u8 {
        u8::try_from(self.alpha_level.clamp(MIN_ALPHA, MAX_ALPHA)).unwrap_or(DEFAULT_ALPHA)
    }

    fn adjust_alpha(&mut self, op: AlphaOp, amount: i64) {
        self.alpha_level = op.apply(self.alpha_level, amount);
    }
}

/// Outcome of a script that ran to completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Commands executed, not counting blank or comment lines
    pub executed: usize,
    pub alpha: u8,
    /// Whether the surface was gone when the script ended
    pub closed: bool,
    pub variables: Variables,
}

/// Executes LBScript against a display surface and dialogs
pub struct Interpreter<S: DisplaySurface, D: Dialogs> {
    surface: S,
    dialogs: D,
    image: RgbaImage,
    icon: Option<RgbaImage>,
    options: ScriptOptions,
    state: InterpreterState,
    opened: bool,
    executed: usize,
}

impl<S: DisplaySurface, D: Dialogs> std::fmt::Debug for Interpreter<S, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interpreter")
            .field("image", &(self.image.width(), self.image.height()))
            .field("icon", &self.icon.is_some())
            .field("options", &self.options)
            .field("state", &self.state)
            .field("opened", &self.opened)
            .field("executed", &self.executed)
            .finish()
    }
}

impl<S: DisplaySurface, D: Dialogs> Interpreter<S, D> {
    /// Create an interpreter for a freshly decoded image
    pub fn new(
        surface: S,
        dialogs: D,
        image: RgbaImage,
        lbix_name: &str,
        options: ScriptOptions,
    ) -> Self {
        Self {
            surface,
            dialogs,
            image,
            icon: None,
            options,
            state: InterpreterState::new(lbix_name),
            opened: false,
            executed: 0,
        }
    }

    /// Apply a window icon when the surface opens
    pub fn with_icon(mut self, icon: Option<RgbaImage>) -> Self {
        self.icon = icon;
        self
    }

    pub fn state(&self) -> &InterpreterState {
        &self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Show the image in a new window, once
    pub fn open(&mut self) {
        if self.opened {
            return;
        }
        self.opened = true;

        if let Some(icon) = &self.icon {
            self.surface.set_icon(icon);
        }
        self.render();
        if let Some(name) = self.state.variables.get(LBIXNAME) {
            let name = name.to_string();
            self.surface.set_title(&name);
        }
        debug!("🪟 Surface opened for {}x{} image", self.image.width(), self.image.height());
    }

    /// Run a whole script; the first failing line stops execution
    pub fn run(&mut self, script: &str) -> Result<RunReport, ScriptError> {
        let timer = Instant::now();
        info!("📜 Running script ({} lines)", script.lines().count());
        self.open();

        for (index, raw) in script.lines().enumerate() {
            let number = index + 1;
            let outcome = parse_line(number, raw).and_then(|parsed| match parsed {
                Some(command) => self.execute(&ScriptLine { number, command }),
                None => Ok(()),
            });

            if let Err(err) = outcome {
                warn!("❌ Script stopped at line {number}: {err}");
                let message = format!("Error executing line:\n{}\n\n{err}", raw.trim());
                self.dialogs.show_error(SCRIPT_ERROR_TITLE, &message);
                return Err(err);
            }
        }

        debug!(
            "✅ Script finished in {:?}: {} commands, alpha={}",
            timer.elapsed(),
            self.executed,
            self.state.alpha()
        );
        Ok(self.report())
    }

    /// Snapshot of the current state
    pub fn report(&self) -> RunReport {
        RunReport {
            executed: self.executed,
            alpha: self.state.alpha(),
            closed: self.opened && !self.surface.is_live(),
            variables: self.state.variables.clone(),
        }
    }

    /// Execute one parsed command
    pub fn execute(&mut self, line: &ScriptLine) -> Result<(), ScriptError> {
        trace!("▶️ Line {}: {}", line.number, line.command.keyword());

        match &line.command {
            Command::SetWinTitle(text) => {
                let title = self.state.variables.substitute(text);
                if self.surface.is_live() {
                    self.surface.set_title(&title);
                } else {
                    debug!("No live surface, ignoring setwintitle");
                }
            }

            Command::ShowMsgBox { title, text } => {
                let mut title = self.state.variables.substitute(title);
                let mut text = self.state.variables.substitute(text);
                if self.options.inline_math {
                    let bad = |e: ExprError| ScriptError::BadArgument {
                        line: line.number,
                        message: format!("inline math: {e}"),
                    };
                    title = expand_inline_math(&title).map_err(bad)?;
                    text = expand_inline_math(&text).map_err(bad)?;
                }
                self.dialogs.show_message(&title, &text);
            }

            Command::Wait(ms) => {
                // Let the window repaint before blocking
                if self.surface.is_live() {
                    self.surface.pump();
                }
                let ms = self.options.clamp_wait(*ms);
                trace!("⏳ Waiting {ms} ms");
                thread::sleep(Duration::from_millis(ms));
            }

            Command::Transparency { op, amount } => {
                self.state.adjust_alpha(*op, *amount);
                self.rerender();
            }

            Command::ShowTxtBox(prompt) => {
                let prompt = self.state.variables.substitute(prompt);
                let input = self
                    .dialogs
                    .ask_text(TEXTBOX_TITLE, &prompt)
                    .unwrap_or_default();
                self.state.variables.set(TXTBOXINPUT, input);
            }

            Command::Math { op, amount } => {
                self.state.adjust_alpha(*op, amount.trunc() as i64);
                self.rerender();
            }

            Command::ShowFilePicker(title) => {
                let title = self.state.variables.substitute(title);
                match self.dialogs.pick_file(&title) {
                    Some(path) => {
                        self.state
                            .variables
                            .set(FILEPICKED, path.to_string_lossy().into_owned());
                    }
                    None => debug!("File picker cancelled"),
                }
            }

            Command::Close => self.close(),
        }

        self.executed += 1;
        Ok(())
    }

    /// Destroy the surface; safe to call repeatedly
    pub fn close(&mut self) {
        if self.surface.is_live() {
            debug!("🚪 Closing surface");
            self.surface.destroy();
        } else {
            trace!("Surface already closed");
        }
    }

    fn rerender(&mut self) {
        if self.surface.is_live() {
            self.render();
        } else {
            debug!("No live surface, alpha={} kept for state only", self.state.alpha());
        }
    }

    fn render(&mut self) {
        let frame = blend_alpha(&self.image, self.state.alpha());
        self.surface.render(&frame);
    }
}

/// Run `script` against `image` on the given collaborators
pub fn run<S: DisplaySurface, D: Dialogs>(
    script: &str,
    image: RgbaImage,
    lbix_name: &str,
    surface: S,
    dialogs: D,
    options: ScriptOptions,
) -> Result<RunReport, ScriptError> {
    Interpreter::new(surface, dialogs, image, lbix_name, options).run(script)
}
