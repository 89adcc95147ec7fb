//! CLI command definitions and dispatch.
//!
//! Each pipeline stage is implemented in its own submodule:
//! - `scan`: library import from audio file tags
//! - `annotate`: remote tempo/key lookup and wheel-code normalization
//! - `sequence`: the harmonic ordering itself
//! - `organize`: ordinal-prefixed set folder construction
//! - `tags`: embedding the set annotations into the organized files

mod annotate;
mod organize;
mod scan;
mod sequence;
mod tags;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::runtime::Runtime;

pub use annotate::cmd_annotate;
pub use organize::cmd_organize;
pub use scan::{cmd_list, cmd_scan};
pub use sequence::cmd_sequence;
pub use tags::cmd_write_tags;

/// Harmonic DJ-set sequencing pipeline
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Working database path (default: mixset.db, or the configured value)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Scan a directory of audio files into the working library
    Scan {
        /// Path to the directory to scan
        path: PathBuf,
    },
    /// List all tracks and their annotation status
    List,
    /// Fetch missing tempo/key annotations and derive wheel codes
    Annotate {
        /// MusicBrainz contact string (or set MIXSET_CONTACT)
        #[arg(long, env = "MIXSET_CONTACT")]
        contact: Option<String>,
        /// Re-derive wheel codes even for tracks that already have one
        #[arg(long)]
        renormalize: bool,
    },
    /// Order the eligible tracks into a set and store the positions
    Sequence {
        /// Also write the ordered set to a JSON file
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Copy the sequenced files into an ordinal-prefixed set folder
    Organize {
        /// Destination folder (default from config)
        #[arg(short, long)]
        destination: Option<PathBuf>,
        /// Dry run - show what would be copied without copying
        #[arg(long)]
        dry_run: bool,
        /// Remove the copies recorded in the folder's manifest instead
        #[arg(long)]
        undo: bool,
    },
    /// Write BPM / initial-key tags into the organized files
    WriteTags {
        /// Set folder holding the organized copies (default from config)
        #[arg(short, long)]
        destination: Option<PathBuf>,
        /// Preview changes without writing
        #[arg(long)]
        preview: bool,
    },
    /// Show the config file location and current settings
    Config {
        /// Write a default config file if none exists yet
        #[arg(long)]
        init: bool,
    },
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let rt = Runtime::new()?;
    let config = crate::config::load();

    let db_url = crate::db::db_url(Some(
        cli.db.as_deref().unwrap_or(&config.library.database),
    ));

    match &cli.command {
        Commands::Scan { path } => cmd_scan(&rt, &db_url, path),
        Commands::List => cmd_list(&rt, &db_url),
        Commands::Annotate {
            contact,
            renormalize,
        } => {
            let contact = contact
                .clone()
                .or_else(|| config.annotation.contact.clone())
                .unwrap_or_default();
            cmd_annotate(&rt, &db_url, &contact, *renormalize)
        }
        Commands::Sequence { export } => cmd_sequence(&rt, &db_url, export.as_deref()),
        Commands::Organize {
            destination,
            dry_run,
            undo,
        } => {
            let destination = destination.as_deref().unwrap_or(&config.library.set_folder);
            cmd_organize(&rt, &db_url, destination, *dry_run, *undo)
        }
        Commands::WriteTags {
            destination,
            preview,
        } => {
            let destination = destination.as_deref().unwrap_or(&config.library.set_folder);
            cmd_write_tags(&rt, &db_url, destination, *preview)
        }
        Commands::Config { init } => {
            let path = crate::config::config_path()
                .ok_or_else(|| anyhow::anyhow!("could not determine config directory"))?;
            if *init && !path.exists() {
                crate::config::save(&config)?;
                println!("Wrote default config to {}", path.display());
            }
            println!("Config file: {}", path.display());
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

// ============================================================================
// Shared helper functions
// ============================================================================

/// Collect audio files under a path, recursively, in deterministic order.
pub(crate) fn collect_audio_files(path: &std::path::Path) -> Vec<PathBuf> {
    if !path.is_dir() {
        return vec![path.to_path_buf()];
    }
    walkdir::WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| is_audio_file(e.path()))
        .map(|e| e.path().to_path_buf())
        .collect()
}

/// Check if a path has an audio file extension
pub(crate) fn is_audio_file(path: &std::path::Path) -> bool {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());
    matches!(ext.as_deref(), Some("mp3" | "flac" | "ogg" | "m4a" | "wav"))
}
