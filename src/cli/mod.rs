//! Command-line interface for lexo.

mod commands;
pub mod icons;
pub mod render;

pub use commands::{is_verbose, run};
