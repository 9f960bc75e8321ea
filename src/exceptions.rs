//! Error types for lbix

use std::fmt;

/// Failures while decoding a framed blob or splitting/merging planes
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("Format mismatch: blob does not start with {expected}")]
    FormatMismatch { expected: &'static str },

    #[error("Truncated blob: need {needed} bytes, have {available}")]
    Truncated { needed: usize, available: usize },

    #[error("Malformed {plane} plane: expected {expected} bytes, got {actual}")]
    MalformedPlaneLength {
        plane: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Legacy PNG entry unreadable: {0}")]
    LegacyPng(String),
}

/// Failures while opening or writing a container archive
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    #[error("Not an LBIX container: {0}")]
    NotAContainer(String),

    #[error("Container has no image entry")]
    MissingImageEntry,

    #[error("Image entry: {0}")]
    Decode(#[from] DecodeError),

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<zip::result::ZipError> for ContainerError {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => ContainerError::Io(e),
            other => ContainerError::Archive(other.to_string()),
        }
    }
}

/// Failures raised by the LBScript interpreter, tagged with the 1-based line
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScriptError {
    #[error("Bad syntax on line {line}: {message}")]
    BadSyntax { line: usize, message: String },

    #[error("Bad argument on line {line}: {message}")]
    BadArgument { line: usize, message: String },

    #[error("Unknown command on line {line}: {text}")]
    UnknownCommand { line: usize, text: String },
}

impl ScriptError {
    /// Line the error was raised on
    pub fn line(&self) -> usize {
        match self {
            ScriptError::BadSyntax { line, .. }
            | ScriptError::BadArgument { line, .. }
            | ScriptError::UnknownCommand { line, .. } => *line,
        }
    }
}

/// Main error type for lbix operations
#[derive(Debug)]
pub enum LbixError {
    /// Blob or plane decode failure
    Decode(DecodeError),

    /// Container archive failure
    Container(ContainerError),

    /// Script execution failure
    Script(ScriptError),

    /// Build error
    BuildError(String),

    /// IO error
    IoError(std::io::Error),

    /// JSON parsing error
    JsonError(serde_json::Error),

    /// Raster load or save error
    ImageError(image::ImageError),

    /// Generic error with message
    Generic(String),
}

impl fmt::Display for LbixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LbixError::Decode(err) => write!(f, "Decode error: {err}"),
            LbixError::Container(err) => write!(f, "Container error: {err}"),
            LbixError::Script(err) => write!(f, "Script error: {err}"),
            LbixError::BuildError(msg) => write!(f, "Build error: {msg}"),
            LbixError::IoError(err) => write!(f, "IO error: {err}"),
            LbixError::JsonError(err) => write!(f, "JSON error: {err}"),
            LbixError::ImageError(err) => write!(f, "Image error: {err}"),
            LbixError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for LbixError {}

impl From<DecodeError> for LbixError {
    fn from(err: DecodeError) -> Self {
        LbixError::Decode(err)
    }
}

impl From<ContainerError> for LbixError {
    fn from(err: ContainerError) -> Self {
        LbixError::Container(err)
    }
}

impl From<ScriptError> for LbixError {
    fn from(err: ScriptError) -> Self {
        LbixError::Script(err)
    }
}

impl From<std::io::Error> for LbixError {
    fn from(err: std::io::Error) -> Self {
        LbixError::IoError(err)
    }
}

impl From<serde_json::Error> for LbixError {
    fn from(err: serde_json::Error) -> Self {
        LbixError::JsonError(err)
    }
}

impl From<image::ImageError> for LbixError {
    fn from(err: image::ImageError) -> Self {
        LbixError::ImageError(err)
    }
}

impl From<anyhow::Error> for LbixError {
    fn from(err: anyhow::Error) -> Self {
        LbixError::Generic(format!("{err:#}"))
    }
}

/// Result type for lbix operations
pub type Result<T> = std::result::Result<T, LbixError>;
