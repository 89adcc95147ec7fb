//! Harmonic sequencing command.

use std::path::Path;

use serde::Serialize;
use tokio::runtime::Runtime;
use tracing::warn;

use crate::db;
use crate::sequencer::{self, Entry, Mix};

#[derive(Serialize)]
struct ExportRow<'a> {
    position: usize,
    artist: &'a str,
    title: &'a str,
    bpm: f64,
    wheel_code: String,
    path: &'a str,
}

/// Order the annotated library into a playable set and persist the result.
pub fn cmd_sequence(rt: &Runtime, db_url: &str, export: Option<&Path>) -> anyhow::Result<()> {
    rt.block_on(async {
        let pool = db::init_db(db_url).await?;
        let tracks = db::get_all_tracks(&pool).await?;

        let mut entries = Vec::with_capacity(tracks.len());
        let mut skipped = 0;
        for track in &tracks {
            match Entry::from_track(track) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    warn!(path = %track.path, "excluded from sequencing: {e}");
                    skipped += 1;
                }
            }
        }

        let mix = sequencer::sequence(entries)?;

        let ordered_ids: Vec<i64> = mix.entries.iter().map(|e| e.id).collect();
        db::store_positions(&pool, &ordered_ids).await?;

        print_mix(&mix, skipped);

        if let Some(path) = export {
            export_mix(&mix, path)?;
            println!("Exported set to {}", path.display());
        }
        Ok(())
    })
}

fn print_mix(mix: &Mix, skipped: usize) {
    let mut reset_at = mix.resets.iter().peekable();
    for (i, entry) in mix.entries.iter().enumerate() {
        if let Some(reset) = reset_at.peek()
            && reset.output_index == i
        {
            println!(
                "    -- reset: {:.1} -> {:.1} bpm --",
                reset.from_bpm, reset.to_bpm
            );
            reset_at.next();
        }
        println!(
            "{:>3}. {} [{} {:.1} bpm]",
            i + 1,
            entry.label,
            entry.key,
            entry.bpm
        );
    }
    println!(
        "\n{} tracks sequenced, {} resets, {} skipped.",
        mix.entries.len(),
        mix.resets.len(),
        skipped
    );
}

fn export_mix(mix: &Mix, path: &Path) -> anyhow::Result<()> {
    let rows: Vec<ExportRow> = mix
        .entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let (artist, title) = entry
                .label
                .split_once(" - ")
                .unwrap_or((entry.label.as_str(), ""));
            ExportRow {
                position: i + 1,
                artist,
                title,
                bpm: entry.bpm,
                wheel_code: entry.key.to_string(),
                path: &entry.path,
            }
        })
        .collect();
    let json = serde_json::to_string_pretty(&rows)?;
    std::fs::write(path, json)?;
    Ok(())
}
