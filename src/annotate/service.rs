//! Annotation service - orchestrates remote tempo/key lookup.
//!
//! This is the high-level API for annotating tracks:
//! 1. Resolve artist + title to a MusicBrainz recording ID (search)
//! 2. Fetch precomputed acoustic features (bpm, key) from AcousticBrainz
//!
//! A resolved recording with no archived analysis is still a useful partial
//! result - the MBID is kept and the track simply stays ineligible for
//! sequencing until its tempo and key arrive from somewhere else (e.g.
//! embedded tags).

use std::time::Duration;

use crate::annotate::acousticbrainz::AcousticBrainzClient;
use crate::annotate::domain::{AnnotationError, TrackAnnotation};
use crate::annotate::musicbrainz::MusicBrainzClient;
use crate::annotate::traits::{AcousticFeaturesApi, RecordingSearchApi};

/// Pause between consecutive MusicBrainz requests (1 req/sec policy).
const MUSICBRAINZ_PACE: Duration = Duration::from_millis(1100);

/// Service for annotating tracks from external sources.
pub struct AnnotationService<S = MusicBrainzClient, F = AcousticBrainzClient> {
    search: S,
    features: F,
}

impl AnnotationService {
    /// Create a service backed by the real MusicBrainz and AcousticBrainz
    /// clients. `contact` is the MusicBrainz User-Agent contact string.
    pub fn new(contact: &str) -> Self {
        Self {
            search: MusicBrainzClient::new(contact),
            features: AcousticBrainzClient::new(),
        }
    }
}

impl<S: RecordingSearchApi, F: AcousticFeaturesApi> AnnotationService<S, F> {
    /// Create a service with explicit clients (used by tests with mocks).
    pub fn with_clients(search: S, features: F) -> Self {
        Self { search, features }
    }

    /// Annotate one track: resolve its recording, then fetch features.
    ///
    /// Fails with [`AnnotationError::NoMatches`] when the search finds no
    /// recording at all. A recording without archived analysis returns an
    /// annotation with the MBID and empty features.
    pub async fn annotate(
        &self,
        artist: &str,
        title: &str,
    ) -> Result<TrackAnnotation, AnnotationError> {
        let hit = self.search.search_recording(artist, title).await?;
        tracing::debug!(artist, title, mbid = %hit.mbid, score = ?hit.score, "recording resolved");

        let features = match self.features.low_level(&hit.mbid).await {
            Ok(features) => features,
            Err(AnnotationError::NoMatches) => {
                // Resolved but never analyzed; keep the MBID.
                tracing::warn!(mbid = %hit.mbid, "no archived analysis for recording");
                Default::default()
            }
            Err(e) => return Err(e),
        };

        Ok(TrackAnnotation {
            mbid: hit.mbid,
            bpm: features.bpm,
            raw_key: features.raw_key,
        })
    }

    /// Sleep long enough to respect the MusicBrainz rate limit between
    /// consecutive [`annotate`](Self::annotate) calls in a batch.
    pub async fn pace(&self) {
        tokio::time::sleep(MUSICBRAINZ_PACE).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::traits::mocks::{MockFeatures, MockSearch};

    #[tokio::test]
    async fn test_annotate_happy_path() {
        let service = AnnotationService::with_clients(
            MockSearch::hit("mbid-1"),
            MockFeatures::full(127.8, "C# minor"),
        );

        let annotation = service.annotate("Artist", "Title").await.unwrap();
        assert_eq!(annotation.mbid, "mbid-1");
        assert_eq!(annotation.bpm, Some(127.8));
        assert_eq!(annotation.raw_key.as_deref(), Some("C# minor"));
    }

    #[tokio::test]
    async fn test_unresolved_recording_is_no_matches() {
        let service =
            AnnotationService::with_clients(MockSearch::miss(), MockFeatures::full(120.0, "A minor"));

        let result = service.annotate("Artist", "Title").await;
        assert!(matches!(result, Err(AnnotationError::NoMatches)));
    }

    #[tokio::test]
    async fn test_unanalyzed_recording_keeps_mbid() {
        let service =
            AnnotationService::with_clients(MockSearch::hit("mbid-2"), MockFeatures::unanalyzed());

        let annotation = service.annotate("Artist", "Title").await.unwrap();
        assert_eq!(annotation.mbid, "mbid-2");
        assert!(annotation.bpm.is_none());
        assert!(annotation.raw_key.is_none());
    }

    #[tokio::test]
    async fn test_transport_errors_propagate() {
        let service = AnnotationService::with_clients(
            MockSearch::with_error(AnnotationError::RateLimited),
            MockFeatures::full(120.0, "A minor"),
        );
        assert!(matches!(
            service.annotate("Artist", "Title").await,
            Err(AnnotationError::RateLimited)
        ));

        let service = AnnotationService::with_clients(
            MockSearch::hit("mbid-3"),
            MockFeatures::with_error(AnnotationError::Network("boom".into())),
        );
        assert!(matches!(
            service.annotate("Artist", "Title").await,
            Err(AnnotationError::Network(_))
        ));
    }
}
