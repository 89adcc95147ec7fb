//! Command-line interface for mixset.
//!
//! This module provides the pipeline commands: scanning a library,
//! annotating tracks, sequencing the set, organizing the set folder, and
//! writing tags.

mod commands;

pub use commands::{Cli, Commands, run_command};
