//! Audio file metadata reading and writing.
//!
//! Uses the lofty crate for format-independent metadata access.
//! Supports MP3, FLAC, OGG, M4A, and WAV files.
//!
//! # Features
//! - Read track metadata (artist, title, and any embedded BPM / initial key)
//! - Idempotent set-tag writing: prior BPM and INITIALKEY values are removed
//!   before the new ones land, so repeated runs never accumulate duplicates
//! - Preview of set-tag changes before writing

use anyhow::{Context, Result};
use lofty::config::WriteOptions;
use lofty::file::TaggedFileExt;
use lofty::probe::Probe;
use lofty::tag::{Accessor, ItemKey, Tag, TagExt};
use std::path::Path;

/// Tag fields read when a track enters the library.
///
/// `bpm` and `initial_key` are picked up when a previous tool already
/// embedded them, which lets those tracks skip remote annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackTags {
    pub artist: String,
    pub title: String,
    pub bpm: Option<f64>,
    pub initial_key: Option<String>,
}

/// The set annotations embedded into an organized file.
#[derive(Debug, Clone, PartialEq)]
pub struct SetTags {
    /// Tempo, rounded to whole beats per minute
    pub bpm: u32,
    /// Camelot wheel code string, e.g. "8A"
    pub wheel_code: String,
    /// 1-based position in the set
    pub position: usize,
    /// Total tracks in the set
    pub total: usize,
}

impl SetTags {
    /// The comment line written alongside the tags.
    fn comment(&self) -> String {
        format!("mixset position {}/{}", self.position, self.total)
    }
}

/// Read artist, title, and any embedded tempo/key from a file's tags.
///
/// Missing artist/title fall back to "Unknown" placeholders and, for the
/// title, the file stem - a file with no tags at all is still usable.
pub fn read(path: &Path) -> Result<TrackTags> {
    let tagged_file = Probe::open(path)
        .context("Failed to open file for probing")?
        .read()
        .context("Failed to read file metadata")?;

    let tag = tagged_file
        .primary_tag()
        .or_else(|| tagged_file.first_tag());

    let artist = tag
        .and_then(|t| t.artist().map(|s| s.to_string()))
        .unwrap_or_else(|| "Unknown Artist".to_string());

    let title = tag
        .and_then(|t| t.title().map(|s| s.to_string()))
        .unwrap_or_else(|| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Unknown Title")
                .to_string()
        });

    // Accept either BPM spelling; some taggers write fractional values.
    let bpm = tag.and_then(|t| {
        t.get_string(&ItemKey::IntegerBpm)
            .or_else(|| t.get_string(&ItemKey::Bpm))
            .and_then(|s| s.trim().parse::<f64>().ok())
            .filter(|b| *b > 0.0)
    });

    let initial_key = tag.and_then(|t| t.get_string(&ItemKey::InitialKey).map(|s| s.to_string()));

    Ok(TrackTags {
        artist,
        title,
        bpm,
        initial_key,
    })
}

/// Write set annotations to an audio file's tags.
///
/// Idempotent: any existing BPM, initial-key, and comment values are
/// removed before the new ones are inserted, mirroring what a fresh run
/// would produce.
pub fn write_set_tags(path: &Path, tags: &SetTags) -> Result<()> {
    let mut tagged_file = Probe::open(path)
        .context("Failed to open file for writing")?
        .read()
        .context("Failed to read file for tag writing")?;

    let tag_type = tagged_file.primary_tag_type();

    let tag = if let Some(tag) = tagged_file.tag_mut(tag_type) {
        tag
    } else {
        tagged_file.insert_tag(Tag::new(tag_type));
        tagged_file.tag_mut(tag_type).expect("Just inserted tag")
    };

    // Delete stale values first so re-runs replace rather than accumulate.
    tag.remove_key(&ItemKey::IntegerBpm);
    tag.remove_key(&ItemKey::Bpm);
    tag.remove_key(&ItemKey::InitialKey);
    tag.remove_comment();

    tag.insert_text(ItemKey::IntegerBpm, tags.bpm.to_string());
    tag.insert_text(ItemKey::InitialKey, tags.wheel_code.clone());
    tag.set_comment(tags.comment());

    tag.save_to_path(path, WriteOptions::default())
        .context("Failed to write tags to file")?;

    Ok(())
}

/// A single field change that a write would make.
#[derive(Debug, Clone)]
pub struct FieldChange {
    pub field: String,
    pub current_value: String,
    pub new_value: String,
}

/// Preview what [`write_set_tags`] would change, without writing.
pub fn preview_set_tags(path: &Path, tags: &SetTags) -> Result<Vec<FieldChange>> {
    let current = read(path)?;

    let mut changes = Vec::new();
    let mut add_change = |field: &str, current_val: String, new_val: String| {
        if current_val != new_val {
            changes.push(FieldChange {
                field: field.to_string(),
                current_value: current_val,
                new_value: new_val,
            });
        }
    };

    add_change(
        "bpm",
        current
            .bpm
            .map(|b| b.round() as u32)
            .map(|b| b.to_string())
            .unwrap_or_default(),
        tags.bpm.to_string(),
    );
    add_change(
        "initial_key",
        current.initial_key.unwrap_or_default(),
        tags.wheel_code.clone(),
    );

    Ok(changes)
}
