//! Library import and listing commands.

use std::path::Path;
use tokio::runtime::Runtime;
use tracing::warn;

use crate::{db, metadata};

use super::collect_audio_files;

/// Scan a directory of audio files into the working library.
///
/// Reads each file's tags; embedded BPM / INITIALKEY values are imported
/// too, so already-analyzed tracks skip the remote annotate stage.
pub fn cmd_scan(rt: &Runtime, db_url: &str, path: &Path) -> anyhow::Result<()> {
    rt.block_on(async {
        let pool = db::init_db(db_url).await?;
        println!("Scanning directory: {path:?}");

        let files = collect_audio_files(path);
        let mut imported = 0;
        let mut errors = 0;

        for file in &files {
            let Some(file_str) = file.to_str() else {
                warn!(path = %file.display(), "non-UTF8 path, skipped");
                errors += 1;
                continue;
            };
            match metadata::read(file) {
                Ok(tags) => {
                    db::upsert_track(
                        &pool,
                        file_str,
                        &tags.artist,
                        &tags.title,
                        tags.bpm,
                        tags.initial_key.as_deref(),
                    )
                    .await?;
                    imported += 1;
                }
                Err(e) => {
                    eprintln!("Error reading {file:?}: {e}");
                    errors += 1;
                }
            }
        }

        println!("Scan complete: {imported} imported, {errors} errors.");
        Ok(())
    })
}

/// List all tracks and their annotation status.
pub fn cmd_list(rt: &Runtime, db_url: &str) -> anyhow::Result<()> {
    rt.block_on(async {
        let pool = db::init_db(db_url).await?;
        let tracks = db::get_all_tracks(&pool).await?;

        let mut eligible = 0;
        for track in &tracks {
            let bpm = track
                .bpm
                .map(|b| format!("{b:.1}"))
                .unwrap_or_else(|| "?".to_string());
            let key = track.wheel_code.as_deref().unwrap_or("?");
            let pos = track
                .position
                .map(|p| format!("#{p}"))
                .unwrap_or_else(|| "-".to_string());
            if track.is_eligible() {
                eligible += 1;
            }
            println!(
                "{pos:>4}  {bpm:>6} BPM  {key:>3}  {} - {} ({})",
                track.artist,
                track.title,
                track.file_name()
            );
        }
        println!(
            "{} tracks, {} eligible for sequencing.",
            tracks.len(),
            eligible
        );
        Ok(())
    })
}
