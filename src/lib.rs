//! lbix - LBIX image containers and the LBScript interpreter
//!
//! This crate provides functionality for packing, opening and inspecting
//! LBIX containers and for running the LBScript embedded in them.

// Enforce strict code quality and reliability
#![deny(
    // Safety
    unsafe_code,

    // Correctness
    missing_debug_implementations,
    unreachable_pub,

    // Future compatibility
    future_incompatible,

    // Rust 2018 idioms
    rust_2018_idioms,
)]
#![warn(
    // Error handling best practices
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::unimplemented,
    clippy::todo,

    // Performance
    clippy::inefficient_to_string,
    clippy::large_enum_variant,

    // Code clarity and maintainability
    clippy::cognitive_complexity,
    clippy::type_complexity,

    // Best practices
    clippy::clone_on_ref_ptr,
    clippy::wildcard_imports,
    clippy::enum_glob_use,
    clippy::if_not_else,
    clippy::single_match_else,
    clippy::needless_continue,
    clippy::explicit_iter_loop,
    clippy::explicit_into_iter_loop,
)]

pub mod api;
pub mod exceptions;
pub mod exit_codes;
pub mod lbix;
pub mod logger;
pub mod script;
pub mod utils;
pub mod version;

// Re-export main API functions
pub use api::{
    BuildOptions, ViewOptions, build_container, inspect_container, open_container,
    view_container, view_container_with,
};
pub use exceptions::{ContainerError, DecodeError, LbixError, ScriptError};

// Re-export format types for advanced usage
pub use lbix::defaults::ScriptOptions;
pub use lbix::{BlobDialect, Unpacked, decode_icon, decode_image, encode_icon, encode_image};
pub use script::{Dialogs, DisplaySurface, RunReport};
