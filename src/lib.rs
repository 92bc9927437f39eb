//! redup - Duplicate File Manager
//!
//! A cross-platform Rust CLI application that finds files with identical
//! content, relocates redundant copies into a timestamped backup tree,
//! and journals every move into an append-only CSV session log that can
//! be replayed in reverse to undo the whole operation.

pub mod app;
pub mod backup;
pub mod cli;
pub mod config;
pub mod confirm;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod menu;
pub mod output;
pub mod scanner;

pub use app::run_app;
