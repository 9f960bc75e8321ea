//! lbix container viewer binary
//!
//! Shows the container on the terminal: renders and title changes are
//! printed, dialogs are answered on stdin.

use clap::Parser;
use lbix::exit_codes::{EXIT_PANIC, EXIT_SUCCESS, exit_code_for, failure_line};
use lbix::{ScriptOptions, ViewOptions, view_container};
use std::{env, panic, path::PathBuf, process};

const VERSION: &str = lbix::version::VERSION;

#[derive(Parser, Debug)]
#[command(version = VERSION, about = "View LBIX image containers and run their scripts")]
struct Args {
    /// Container to open
    container: PathBuf,

    /// Print a container report instead of running it
    #[arg(long)]
    info: bool,

    /// With --info, print the report as JSON
    #[arg(long, requires = "info")]
    json: bool,

    /// Evaluate `math <expr>` inside message boxes
    #[arg(long)]
    inline_math: bool,

    /// Upper bound for every `wait`, in milliseconds
    #[arg(long)]
    max_wait_ms: Option<u64>,

    /// Save every rendered frame as PNG in this directory
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, json[:level])
    #[arg(long)]
    log_level: Option<String>,
}

fn main() {
    // Set up panic handler to return specific exit code
    panic::set_hook(Box::new(|panic_info| {
        eprintln!("PANIC: {}", panic_info);
        process::exit(EXIT_PANIC);
    }));

    let result = panic::catch_unwind(run);

    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(_) => {
            eprintln!("Fatal: Unhandled panic in viewer");
            process::exit(EXIT_PANIC);
        }
    }
}

fn run() -> i32 {
    if env::args().nth(1).as_deref() == Some("--version") {
        println!("lbix-viewer {}", lbix::version::full_version());
        return EXIT_SUCCESS;
    }

    let args = Args::parse();

    if let Some(ref level) = args.log_level {
        lbix::logger::JsonLogger::init_with_level(level);
    } else {
        lbix::logger::JsonLogger::init();
    }

    log::debug!("🚀 Viewer started for {:?}", args.container);

    if args.info {
        return if args.json {
            lbix::lbix::cli::show_report_json(&args.container)
        } else {
            lbix::lbix::cli::show_info(&args.container)
        };
    }

    // Flags win over the environment
    let env_options = ScriptOptions::from_env();
    let options = ViewOptions {
        script: ScriptOptions {
            inline_math: args.inline_math || env_options.inline_math,
            max_wait_ms: args.max_wait_ms.or(env_options.max_wait_ms),
        },
        snapshot_dir: args.snapshot_dir,
    };

    match view_container(&args.container, options) {
        Ok(report) => {
            log::debug!(
                "✅ Script done: {} commands, alpha={}, closed={}",
                report.executed,
                report.alpha,
                report.closed
            );
            EXIT_SUCCESS
        }
        Err(e) => {
            log::error!("❌ View failed: {}", e);
            eprintln!("{}", failure_line(&e));
            exit_code_for(&e)
        }
    }
}
