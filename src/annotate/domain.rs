//! Internal domain models for remote track annotation.
//!
//! These types are OUR types - they don't change when external APIs change.
//! All external API responses get converted into these types via adapters.

/// A recording resolved by artist/title search on MusicBrainz.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingMatch {
    /// MusicBrainz recording ID
    pub mbid: String,
    /// Search relevance score reported by the API (0-100)
    pub score: Option<i32>,
}

/// Acoustic features reported by AcousticBrainz for one recording.
///
/// Either field may be missing; a track without both tempo and key stays
/// ineligible for sequencing and is reported, not fatal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AcousticFeatures {
    /// Estimated tempo in beats per minute
    pub bpm: Option<f64>,
    /// Estimated key as "<tonic> <scale>", e.g. "C# minor"
    pub raw_key: Option<String>,
}

/// The full result of annotating one track remotely.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackAnnotation {
    /// The recording the track resolved to
    pub mbid: String,
    /// Estimated tempo, when the features lookup had one
    pub bpm: Option<f64>,
    /// Estimated raw key, when the features lookup had one
    pub raw_key: Option<String>,
}

/// Errors that can occur during remote annotation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AnnotationError {
    #[error("API request failed: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("No matching recording found")]
    NoMatches,

    #[error("Rate limited - try again later")]
    RateLimited,
}
