//! Tag write-back command for a built set folder.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, bail};
use tokio::runtime::Runtime;
use tracing::warn;

use crate::db;
use crate::metadata::{self, SetTags};
use crate::model::SetTrack;
use crate::organizer::SetManifest;

/// Write tempo, wheel code and position tags onto the copies in a set folder.
///
/// Sources are never touched. The manifest maps each copy back to the library
/// row that carries its annotation.
pub fn cmd_write_tags(
    rt: &Runtime,
    db_url: &str,
    destination: &Path,
    preview: bool,
) -> anyhow::Result<()> {
    let manifest = SetManifest::load(destination)
        .with_context(|| format!("no set manifest found in {}", destination.display()))?;

    let tracks = rt.block_on(async {
        let pool = db::init_db(db_url).await?;
        anyhow::Ok(db::get_sequenced_tracks(&pool).await?)
    })?;
    if tracks.is_empty() {
        bail!("no sequenced tracks found, run `mixset sequence` first");
    }

    let by_path: HashMap<&str, &SetTrack> =
        tracks.iter().map(|t| (t.path.as_str(), t)).collect();
    let total = manifest.copies.len();

    let mut written = 0;
    let mut skipped = 0;
    for record in &manifest.copies {
        let source = record.source.to_string_lossy();
        let Some(track) = by_path.get(source.as_ref()) else {
            warn!(source = %source, "copy has no matching library row, skipped");
            skipped += 1;
            continue;
        };
        let Some(tags) = set_tags_for(track, record.position, total) else {
            warn!(source = %source, "track lacks tempo or wheel code, skipped");
            skipped += 1;
            continue;
        };

        if preview {
            let changes = metadata::preview_set_tags(&record.destination, &tags)?;
            if changes.is_empty() {
                println!("{}: up to date", record.destination.display());
            } else {
                println!("{}:", record.destination.display());
                for change in changes {
                    println!(
                        "  {}: {:?} -> {:?}",
                        change.field, change.current_value, change.new_value
                    );
                }
            }
        } else {
            metadata::write_set_tags(&record.destination, &tags)?;
            written += 1;
        }
    }

    if preview {
        println!("Preview complete, {skipped} skipped.");
    } else {
        println!("Tagged {written} files, {skipped} skipped.");
    }
    Ok(())
}

fn set_tags_for(track: &SetTrack, position: usize, total: usize) -> Option<SetTags> {
    Some(SetTags {
        bpm: track.bpm?.round() as u32,
        wheel_code: track.wheel_code.clone()?,
        position,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(bpm: Option<f64>, wheel_code: Option<&str>) -> SetTrack {
        SetTrack {
            id: 1,
            path: "/music/a.mp3".into(),
            artist: "A".into(),
            title: "One".into(),
            bpm,
            raw_key: None,
            wheel_code: wheel_code.map(str::to_string),
            mbid: None,
            position: Some(1),
        }
    }

    #[test]
    fn test_set_tags_rounds_bpm() {
        let tags = set_tags_for(&track(Some(127.6), Some("8A")), 3, 12).unwrap();
        assert_eq!(tags.bpm, 128);
        assert_eq!(tags.wheel_code, "8A");
        assert_eq!(tags.position, 3);
        assert_eq!(tags.total, 12);
    }

    #[test]
    fn test_set_tags_requires_annotation() {
        assert!(set_tags_for(&track(None, Some("8A")), 1, 1).is_none());
        assert!(set_tags_for(&track(Some(128.0), None), 1, 1).is_none());
    }
}
