//! JSON structured logging implementation for lbix

use crate::lbix::defaults::{ENV_LOG_LEVEL, ENV_LOG_PATH};
use chrono::{Local, Utc};
use log::{LevelFilter, Log, Metadata, Record};
use serde_json::json;
use std::env;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::sync::Mutex;

/// Level used when nothing is configured
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Split a level string such as `debug`, `json` or `json:trace`
///
/// Returns whether JSON output was requested and the level filter.
pub fn parse_level_spec(spec: &str) -> (bool, LevelFilter) {
    let spec = spec.trim().to_ascii_lowercase();
    let (use_json, level) = match spec.strip_prefix("json") {
        Some("") => (true, "info"),
        Some(rest) => match rest.strip_prefix(':') {
            Some(level) => (true, level),
            None => (false, spec.as_str()),
        },
        None => (false, spec.as_str()),
    };

    let filter = match level {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Warn,
    };
    (use_json, filter)
}

/// JSON logger implementation
#[derive(Debug)]
pub struct JsonLogger {
    level: LevelFilter,
    target_file: Mutex<Option<std::fs::File>>,
}

impl JsonLogger {
    /// Create a new JSON logger
    pub fn new(level: LevelFilter, log_path: Option<String>) -> Self {
        let target_file = log_path
            .and_then(|path| OpenOptions::new().create(true).append(true).open(path).ok());

        JsonLogger {
            level,
            target_file: Mutex::new(target_file),
        }
    }

    /// Initialize the logger from a level string
    pub fn init_with_level(level_str: &str) {
        let (use_json, level_filter) = parse_level_spec(level_str);

        if !use_json {
            let result = env_logger::Builder::new()
                .filter_level(level_filter)
                .format(|buf, record| {
                    write!(buf, "🖼️  ")?;
                    write!(
                        buf,
                        "[{} {} {}] ",
                        Local::now().format("%Y-%m-%dT%H:%M:%S"),
                        record.level(),
                        record.target()
                    )?;
                    writeln!(buf, "{}", record.args())
                })
                .try_init();
            if let Err(e) = result {
                eprintln!("Failed to initialize logger: {e}");
            }
            return;
        }

        let logger = Box::new(JsonLogger::new(level_filter, env::var(ENV_LOG_PATH).ok()));
        if let Err(e) = log::set_boxed_logger(logger) {
            eprintln!("Failed to initialize JSON logger: {e}");
            return;
        }
        log::set_max_level(level_filter);
    }

    /// Initialize from `LBIX_LOG_LEVEL`, defaulting to warnings only
    pub fn init() {
        let level = env::var(ENV_LOG_LEVEL).unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());
        Self::init_with_level(&level);
    }

    fn write_line(&self, line: &str) {
        if let Ok(mut file_guard) = self.target_file.lock() {
            if let Some(ref mut file) = *file_guard {
                let _ = file.write_all(line.as_bytes());
                let _ = file.flush();
                return;
            }
        }
        let _ = io::stderr().write_all(line.as_bytes());
        let _ = io::stderr().flush();
    }
}

impl Log for JsonLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let log_entry = json!({
            "@timestamp": Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true),
            "@level": record.level().to_string().to_lowercase(),
            "@message": record.args().to_string(),
            "@module": record.target(),
            "@pid": std::process::id(),
            "@file": record.file().unwrap_or("unknown"),
            "@line": record.line().unwrap_or(0),
        });

        let json_string = format!(
            "{}\n",
            serde_json::to_string(&log_entry).unwrap_or_default()
        );
        self.write_line(&json_string);
    }

    fn flush(&self) {
        if let Ok(mut file_guard) = self.target_file.lock() {
            if let Some(ref mut file) = *file_guard {
                let _ = file.flush();
            }
        }
        let _ = io::stderr().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;

    #[test]
    fn test_parse_level_spec() {
        assert_eq!(parse_level_spec("debug"), (false, LevelFilter::Debug));
        assert_eq!(parse_level_spec("JSON"), (true, LevelFilter::Info));
        assert_eq!(parse_level_spec("json:trace"), (true, LevelFilter::Trace));
        assert_eq!(parse_level_spec("off"), (false, LevelFilter::Off));
        assert_eq!(parse_level_spec("loud"), (false, LevelFilter::Warn));
        assert_eq!(parse_level_spec("jsonish"), (false, LevelFilter::Warn));
    }

    #[test]
    fn test_json_logger_writes_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("log.jsonl");
        let logger = JsonLogger::new(
            LevelFilter::Info,
            Some(path.to_string_lossy().into_owned()),
        );

        logger.log(
            &Record::builder()
                .args(format_args!("hello"))
                .level(Level::Info)
                .target("lbix::test")
                .build(),
        );
        logger.log(
            &Record::builder()
                .args(format_args!("hidden"))
                .level(Level::Debug)
                .build(),
        );
        logger.flush();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 1);
        let entry: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(entry["@message"], "hello");
        assert_eq!(entry["@level"], "info");
        assert_eq!(entry["@module"], "lbix::test");
    }
}
