//! Set folder construction.
//!
//! Copies the sequenced audio files into a destination folder under names
//! carrying a zero-padded ordinal prefix (`001 - track.flac`), so any player
//! or DJ software sorting by filename plays the set in order. The prefix
//! width follows the total track count.
//!
//! # Features
//! - Preview mode to see the copies before making them
//! - A JSON manifest of every copy, enabling undo
//! - Source files are never modified or moved, only copied

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// A record of one file copy, used for undo functionality
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopyRecord {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub position: usize,
}

/// The manifest describing a built set folder
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SetManifest {
    pub copies: Vec<CopyRecord>,
    pub timestamp: Option<String>,
}

impl SetManifest {
    const FILE_NAME: &'static str = "mixset_manifest.json";

    /// Load the manifest from a set folder
    pub fn load(folder: &Path) -> Option<Self> {
        fs::read_to_string(folder.join(Self::FILE_NAME))
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
    }

    /// Save the manifest into the set folder
    pub fn save(&self, folder: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(folder.join(Self::FILE_NAME), json)?;
        Ok(())
    }

    /// Whether a set folder has a manifest to undo
    pub fn exists(folder: &Path) -> bool {
        folder.join(Self::FILE_NAME).exists()
    }
}

/// Planned copy for one track (also the dry-run preview shape)
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedCopy {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub position: usize,
}

/// Digits needed to zero-pad ordinals for `total` tracks.
///
/// 9 tracks need 1 digit, 10-99 need 2, and so on. A set of zero tracks
/// never reaches the prefix formatting, but width 1 keeps it total.
pub fn ordinal_width(total: usize) -> usize {
    total.max(1).to_string().len()
}

/// The prefixed file name for one track: `"<ordinal> - <original name>"`.
pub fn prefixed_name(position: usize, width: usize, file_name: &str) -> String {
    format!(
        "{:0width$} - {}",
        position,
        sanitize_file_name(file_name),
        width = width
    )
}

/// Plan the copies for a sequenced set without touching the filesystem.
///
/// `sources` must already be in play order; positions are 1-based.
pub fn plan_set_folder(sources: &[PathBuf], destination: &Path) -> Vec<PlannedCopy> {
    let width = ordinal_width(sources.len());
    sources
        .iter()
        .enumerate()
        .map(|(index, source)| {
            let position = index + 1;
            let file_name = source
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("unnamed");
            PlannedCopy {
                source: source.clone(),
                destination: destination.join(prefixed_name(position, width, file_name)),
                position,
            }
        })
        .collect()
}

/// Build the set folder: copy every source into place and write a manifest.
///
/// Missing source files are skipped with a warning (mirroring the rest of
/// the pipeline's per-track recovery); everything that does exist is
/// copied. Returns the manifest of copies actually made.
pub fn build_set_folder(sources: &[PathBuf], destination: &Path) -> Result<SetManifest> {
    fs::create_dir_all(destination)
        .with_context(|| format!("Failed to create set folder: {destination:?}"))?;

    let mut manifest = SetManifest {
        copies: Vec::new(),
        timestamp: Some(chrono::Utc::now().to_rfc3339()),
    };

    for plan in plan_set_folder(sources, destination) {
        if !plan.source.exists() {
            tracing::warn!(source = %plan.source.display(), "source file missing, skipped");
            continue;
        }
        fs::copy(&plan.source, &plan.destination)
            .with_context(|| format!("Failed to copy file to: {:?}", plan.destination))?;
        manifest.copies.push(CopyRecord {
            source: plan.source,
            destination: plan.destination,
            position: plan.position,
        });
    }

    manifest.save(destination)?;
    Ok(manifest)
}

/// Remove every copy listed in the folder's manifest, then the manifest
/// itself and the folder if nothing else is left.
pub fn undo_set_folder(destination: &Path) -> Result<usize> {
    let manifest = SetManifest::load(destination)
        .with_context(|| format!("No manifest found in {destination:?}"))?;

    let mut removed = 0;
    for record in &manifest.copies {
        match fs::remove_file(&record.destination) {
            Ok(()) => removed += 1,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %record.destination.display(), "copy already gone");
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to remove {:?}", record.destination));
            }
        }
    }

    fs::remove_file(destination.join(SetManifest::FILE_NAME))?;
    // Leave the folder in place if the user put other files there.
    if fs::read_dir(destination)?.next().is_none() {
        fs::remove_dir(destination)?;
    }

    Ok(removed)
}

/// Sanitizes a file name by replacing invalid characters
fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect()
}
