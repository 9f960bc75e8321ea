// src/lbix/defaults.rs
// Centralized default values for containers and scripts

use crate::utils::is_env_true;
use std::env;

// =================================
// Container defaults
// =================================
pub const DEFAULT_EXTENSION: &str = "lbix";
pub const DEFAULT_CONTAINER_NAME: &str = "untitled.lbix";

// =================================
// Interpreter defaults
// =================================
pub const DEFAULT_ALPHA: u8 = 255; // Fully opaque
pub const MIN_ALPHA: i64 = 0;
pub const MAX_ALPHA: i64 = 255;
pub const DEFAULT_INLINE_MATH: bool = false;

// =================================
// Dialog titles
// =================================
pub const TEXTBOX_TITLE: &str = "Input";
pub const SCRIPT_ERROR_TITLE: &str = "LBScript Error";

// =================================
// Environment variables (front ends only)
// =================================
pub const ENV_LOG_LEVEL: &str = "LBIX_LOG_LEVEL";
pub const ENV_LOG_PATH: &str = "LBIX_LOG_PATH";
pub const ENV_INLINE_MATH: &str = "LBIX_INLINE_MATH";
pub const ENV_MAX_WAIT_MS: &str = "LBIX_MAX_WAIT_MS";

/// Knobs that change how a script is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptOptions {
    /// Evaluate `math <expr>` fragments inside message box text
    pub inline_math: bool,
    /// Upper bound applied to every `wait`
    pub max_wait_ms: Option<u64>,
}

impl Default for ScriptOptions {
    fn default() -> Self {
        Self {
            inline_math: DEFAULT_INLINE_MATH,
            max_wait_ms: None,
        }
    }
}

impl ScriptOptions {
    /// Read options from the environment, falling back to defaults
    pub fn from_env() -> Self {
        let max_wait_ms = env::var(ENV_MAX_WAIT_MS)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok());

        Self {
            inline_math: is_env_true(ENV_INLINE_MATH),
            max_wait_ms,
        }
    }

    /// Apply the configured ceiling to a requested wait
    pub fn clamp_wait(&self, requested_ms: u64) -> u64 {
        match self.max_wait_ms {
            Some(max) => requested_ms.min(max),
            None => requested_ms,
        }
    }
}
