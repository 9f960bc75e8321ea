//! LBScript: the line-oriented scripting language embedded in containers

pub mod command;
pub mod expr;
pub mod headless;
pub mod interpreter;
pub mod placeholders;
pub mod surface;

// Re-export main types
pub use command::{AlphaOp, Command, ScriptLine, parse_line, parse_script};
pub use headless::{HeadlessSurface, TerminalDialogs};
pub use interpreter::{Interpreter, InterpreterState, RunReport, run};
pub use placeholders::Variables;
pub use surface::{Dialogs, DisplaySurface};
