//! Standard exit codes for lbix binaries
//!
//! Shared by the builder and the viewer so scripts wrapping them can tell
//! failure kinds apart.

use crate::exceptions::LbixError;

/// Successful execution
pub const EXIT_SUCCESS: i32 = 0;

/// Generic error (avoid using - be more specific)
pub const EXIT_ERROR: i32 = 1;

/// Panic or unrecoverable error
pub const EXIT_PANIC: i32 = 101;

/// Blob format error (wrong magic, truncated or malformed planes)
pub const EXIT_FORMAT_ERROR: i32 = 102;

/// Container error (not an archive, missing image entry)
pub const EXIT_CONTAINER_ERROR: i32 = 103;

/// Script error (bad syntax, bad argument, unknown command)
pub const EXIT_SCRIPT_ERROR: i32 = 104;

/// Invalid command-line arguments
pub const EXIT_INVALID_ARGS: i32 = 105;

/// I/O error (file not found, permission denied, disk error)
pub const EXIT_IO_ERROR: i32 = 106;

/// Raster could not be loaded or saved
pub const EXIT_IMAGE_ERROR: i32 = 107;

/// Build/packaging error (builder-specific)
pub const EXIT_BUILD_ERROR: i32 = 108;

/// Configuration error (invalid manifest, missing required fields)
pub const EXIT_CONFIG_ERROR: i32 = 109;

/// Map an error to the exit code a binary should return
pub fn exit_code_for(err: &LbixError) -> i32 {
    use crate::exceptions::ContainerError;

    match err {
        LbixError::Decode(_) => EXIT_FORMAT_ERROR,
        LbixError::Container(ContainerError::Decode(_)) => EXIT_FORMAT_ERROR,
        LbixError::Container(ContainerError::Io(_)) => EXIT_IO_ERROR,
        LbixError::Container(_) => EXIT_CONTAINER_ERROR,
        LbixError::Script(_) => EXIT_SCRIPT_ERROR,
        LbixError::BuildError(_) => EXIT_BUILD_ERROR,
        LbixError::IoError(_) => EXIT_IO_ERROR,
        LbixError::JsonError(_) => EXIT_CONFIG_ERROR,
        LbixError::ImageError(_) => EXIT_IMAGE_ERROR,
        LbixError::Generic(_) => EXIT_ERROR,
    }
}

/// The line a binary prints on stderr before exiting with a failure
///
/// Script errors were already shown to the user in an error dialog, so
/// only the exit code is repeated for them.
pub fn failure_line(err: &LbixError) -> String {
    let code = exit_code_for(err);
    match err {
        LbixError::Script(_) => format!("❌ Script stopped (exit code {code})"),
        other => format!("❌ {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exceptions::{ContainerError, DecodeError, ScriptError};

    #[test]
    fn test_exit_code_for() {
        let truncated = DecodeError::Truncated {
            needed: 20,
            available: 3,
        };
        assert_eq!(
            exit_code_for(&LbixError::Decode(truncated.clone())),
            EXIT_FORMAT_ERROR
        );
        assert_eq!(
            exit_code_for(&ContainerError::Decode(truncated).into()),
            EXIT_FORMAT_ERROR
        );
        assert_eq!(
            exit_code_for(&ContainerError::MissingImageEntry.into()),
            EXIT_CONTAINER_ERROR
        );
        assert_eq!(
            exit_code_for(
                &ScriptError::UnknownCommand {
                    line: 1,
                    text: "x".into()
                }
                .into()
            ),
            EXIT_SCRIPT_ERROR
        );
        assert_eq!(
            exit_code_for(&LbixError::BuildError("nope".into())),
            EXIT_BUILD_ERROR
        );
    }

    #[test]
    fn test_failure_line_does_not_repeat_script_errors() {
        let err: LbixError = ScriptError::UnknownCommand {
            line: 3,
            text: "frobnicate".into(),
        }
        .into();
        let line = failure_line(&err);
        assert_eq!(line, "❌ Script stopped (exit code 104)");
        assert!(!line.contains("frobnicate"));

        let err = LbixError::BuildError("nope".into());
        assert!(failure_line(&err).contains("nope"));
    }
}
