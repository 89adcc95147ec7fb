//! Set-folder build command.

use std::path::{Path, PathBuf};

use anyhow::bail;
use tokio::runtime::Runtime;

use crate::db;
use crate::organizer::{self, SetManifest};

/// Copy the sequenced set into an ordinal-prefixed folder.
///
/// `--dry-run` prints the copy plan without touching the filesystem and
/// `--undo` removes a previously built folder via its manifest.
pub fn cmd_organize(
    rt: &Runtime,
    db_url: &str,
    destination: &Path,
    dry_run: bool,
    undo: bool,
) -> anyhow::Result<()> {
    if undo {
        let removed = organizer::undo_set_folder(destination)?;
        println!("Removed {removed} copies from {}", destination.display());
        return Ok(());
    }

    let sources = rt.block_on(async {
        let pool = db::init_db(db_url).await?;
        let tracks = db::get_sequenced_tracks(&pool).await?;
        anyhow::Ok(
            tracks
                .iter()
                .map(|t| PathBuf::from(&t.path))
                .collect::<Vec<_>>(),
        )
    })?;

    if sources.is_empty() {
        bail!("no sequenced tracks found, run `mixset sequence` first");
    }

    if dry_run {
        for plan in organizer::plan_set_folder(&sources, destination) {
            println!(
                "{} -> {}",
                plan.source.display(),
                plan.destination.display()
            );
        }
        println!("Dry run: {} copies planned, nothing written.", sources.len());
        return Ok(());
    }

    if SetManifest::exists(destination) {
        bail!(
            "{} already holds a built set, undo it first with --undo",
            destination.display()
        );
    }

    let manifest = organizer::build_set_folder(&sources, destination)?;
    println!(
        "Built set folder {} with {} tracks.",
        destination.display(),
        manifest.copies.len()
    );
    Ok(())
}
