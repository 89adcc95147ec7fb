//! Remote annotation and wheel-code normalization command.

use tokio::runtime::Runtime;
use tracing::warn;

use crate::annotate::{AnnotationError, AnnotationService};
use crate::camelot::{self, WheelCode};
use crate::db;

/// Fill missing tempo/key annotations, then derive wheel codes.
///
/// Remote lookups run only for tracks still missing bpm or raw key; the
/// normalization pass afterwards covers every track. Per-track failures are
/// warnings, not aborts - the batch carries on.
pub fn cmd_annotate(
    rt: &Runtime,
    db_url: &str,
    contact: &str,
    renormalize: bool,
) -> anyhow::Result<()> {
    rt.block_on(async {
        let pool = db::init_db(db_url).await?;
        let service = AnnotationService::new(contact);

        let pending = db::get_unannotated_tracks(&pool).await?;
        println!("{} tracks need remote annotation.", pending.len());

        let mut annotated = 0;
        let mut misses = 0;
        for (i, track) in pending.iter().enumerate() {
            if i > 0 {
                service.pace().await;
            }
            match service.annotate(&track.artist, &track.title).await {
                Ok(annotation) => {
                    println!(
                        "[{}/{}] {} - {}: bpm {:?}, key {:?}",
                        i + 1,
                        pending.len(),
                        track.artist,
                        track.title,
                        annotation.bpm,
                        annotation.raw_key
                    );
                    db::update_annotation(
                        &pool,
                        track.id,
                        annotation.bpm,
                        annotation.raw_key.as_deref(),
                        Some(&annotation.mbid),
                    )
                    .await?;
                    annotated += 1;
                }
                Err(AnnotationError::NoMatches) => {
                    warn!(artist = %track.artist, title = %track.title, "no recording match");
                    misses += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }

        // Normalization pass: derive wheel codes from whatever raw keys we
        // now have. A raw key may already be a wheel code string (imported
        // from tags) or a musicological spelling needing the table.
        let mut derived = 0;
        let mut unresolved = 0;
        for track in db::get_all_tracks(&pool).await? {
            if track.wheel_code.is_some() && !renormalize {
                continue;
            }
            let Some(raw) = track.raw_key.as_deref() else {
                continue;
            };
            match derive_wheel_code(raw) {
                Some(code) => {
                    db::update_wheel_code(&pool, track.id, Some(&code.to_string())).await?;
                    derived += 1;
                }
                None => {
                    warn!(
                        artist = %track.artist,
                        title = %track.title,
                        raw_key = raw,
                        "key could not be mapped to a wheel code, track excluded from sequencing"
                    );
                    db::update_wheel_code(&pool, track.id, None).await?;
                    unresolved += 1;
                }
            }
        }

        println!(
            "Annotation complete: {annotated} annotated remotely, {misses} unmatched, \
             {derived} wheel codes derived, {unresolved} keys unresolved."
        );
        Ok(())
    })
}

/// Interpret a stored raw key: a literal wheel code string passes through,
/// anything else goes to the normalization table.
fn derive_wheel_code(raw: &str) -> Option<WheelCode> {
    raw.parse::<WheelCode>()
        .ok()
        .or_else(|| camelot::normalize(raw).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_accepts_wheel_code_strings() {
        assert_eq!(derive_wheel_code("8A"), "8A".parse().ok());
        assert_eq!(derive_wheel_code("12b"), "12B".parse().ok());
    }

    #[test]
    fn test_derive_accepts_musicological_keys() {
        assert_eq!(derive_wheel_code("A minor"), "8A".parse().ok());
        assert_eq!(derive_wheel_code("Ab major"), "4B".parse().ok());
    }

    #[test]
    fn test_derive_rejects_unresolvable_keys() {
        assert_eq!(derive_wheel_code("D"), None);
        assert_eq!(derive_wheel_code("H major"), None);
        assert_eq!(derive_wheel_code("13A"), None);
    }
}
