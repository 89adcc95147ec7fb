//! Mixset - harmonic DJ-set sequencing.
//!
//! Scans a directory of audio files, annotates them with tempo and musical
//! key, orders them into a harmonically mixable set on the Camelot wheel,
//! and materializes the result as an ordinal-prefixed folder ready to play.

pub mod annotate;
pub mod camelot;
pub mod cli;
pub mod config;
pub mod db;
pub mod metadata;
pub mod model;
pub mod organizer;
pub mod sequencer;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(EnvFilter::from_default_env().add_directive("mixset=info".parse().unwrap()))
        .init();

    cli::run_command(&args)
}
