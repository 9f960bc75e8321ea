//! lbix container builder binary

use clap::Parser;
use lbix::exit_codes::{
    EXIT_CONFIG_ERROR, EXIT_INVALID_ARGS, EXIT_PANIC, EXIT_SUCCESS, exit_code_for,
};
use lbix::lbix::defaults::DEFAULT_EXTENSION;
use lbix::{BuildOptions, build_container};
use std::{env, panic, path::PathBuf, process};

const VERSION: &str = lbix::version::VERSION;

#[derive(Parser, Debug)]
#[command(version = VERSION, about = "Build LBIX image containers")]
struct Args {
    /// Main image (PNG)
    #[arg(short, long)]
    image: Option<PathBuf>,

    /// LBScript file to embed
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Window icon (PNG)
    #[arg(long)]
    icon: Option<PathBuf>,

    /// Path to a JSON build manifest; flags override its fields
    #[arg(short, long)]
    manifest: Option<PathBuf>,

    /// Output path for the container
    #[arg(short, long)]
    output: PathBuf,

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
            eprintln!("Fatal: Unhandled panic in builder");
            process::exit(EXIT_PANIC);
        }
    }
}

fn run() -> i32 {
    // Handle --version before clap
    if env::args().nth(1).as_deref() == Some("--version") {
        println!("lbix-builder {}", lbix::version::full_version());
        return EXIT_SUCCESS;
    }

    let args = Args::parse();

    if let Some(ref level) = args.log_level {
        lbix::logger::JsonLogger::init_with_level(level);
    } else {
        lbix::logger::JsonLogger::init();
    }

    let flags = BuildOptions {
        image: args.image,
        script: args.script,
        script_text: None,
        icon: args.icon,
    };

    let options = match &args.manifest {
        Some(manifest) => match BuildOptions::from_manifest(manifest) {
            Ok(from_manifest) => flags.or(from_manifest),
            Err(e) => {
                eprintln!("Manifest error: {}", e);
                return EXIT_CONFIG_ERROR;
            }
        },
        None => flags,
    };

    if options.image.is_none() {
        eprintln!("Error: an image is required (--image or manifest \"image\")");
        return EXIT_INVALID_ARGS;
    }

    let output = if args.output.extension().is_none() {
        args.output.with_extension(DEFAULT_EXTENSION)
    } else {
        args.output
    };

    match build_container(&output, options) {
        Ok(()) => {
            println!("✅ Wrote {}", output.display());
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("Build error: {}", e);
            exit_code_for(&e)
        }
    }
}
