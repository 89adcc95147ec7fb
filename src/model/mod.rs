//! Core data model for the set pipeline.
//!
//! A [`SetTrack`] is one row of the working store. Annotation columns
//! (`bpm`, `raw_key`, `wheel_code`, `mbid`) are `None` until the annotate
//! stage fills them; `position` is `None` until the track has been
//! sequenced into the set.

use sqlx::FromRow;

/// A track in the working store.
///
/// `path` is the stable identity token (unique per row). Once annotated,
/// a track is immutable apart from its derived `wheel_code` and its set
/// `position`.
#[derive(Debug, Clone, FromRow)]
pub struct SetTrack {
    /// Database ID (auto-generated)
    pub id: i64,
    /// Absolute file path (unique identifier)
    pub path: String,
    /// Artist name (from tags, or "Unknown Artist")
    pub artist: String,
    /// Track title (from tags or filename)
    pub title: String,
    /// Tempo in beats per minute
    pub bpm: Option<f64>,
    /// Raw estimated key, e.g. "C# minor"
    pub raw_key: Option<String>,
    /// Derived Camelot code, e.g. "12A"; set once by normalization
    pub wheel_code: Option<String>,
    /// MusicBrainz recording ID, when resolved remotely
    pub mbid: Option<String>,
    /// 1-based position in the sequenced set
    pub position: Option<i64>,
}

impl SetTrack {
    /// Whether the track carries everything the sequencer needs.
    pub fn is_eligible(&self) -> bool {
        self.bpm.is_some() && self.wheel_code.is_some()
    }

    /// File name component of the path, for display and ordinal renaming.
    pub fn file_name(&self) -> &str {
        std::path::Path::new(&self.path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.path)
    }
}
