//! Trait definitions for external API clients.
//!
//! These traits enable dependency injection and mocking for tests.
//! Production code uses the real client implementations, while tests
//! substitute mock implementations in the service.

use async_trait::async_trait;

use super::domain::{AcousticFeatures, AnnotationError, RecordingMatch};

/// Trait for MusicBrainz recording search.
///
/// Implement this trait to create mock implementations for testing.
#[async_trait]
pub trait RecordingSearchApi: Send + Sync {
    /// Resolve an artist + title pair to the best-matching recording.
    async fn search_recording(
        &self,
        artist: &str,
        title: &str,
    ) -> Result<RecordingMatch, AnnotationError>;
}

/// Trait for AcousticBrainz feature lookup.
///
/// Implement this trait to create mock implementations for testing.
#[async_trait]
pub trait AcousticFeaturesApi: Send + Sync {
    /// Fetch low-level features for a recording ID.
    async fn low_level(&self, mbid: &str) -> Result<AcousticFeatures, AnnotationError>;
}

// Implement traits for real clients

#[async_trait]
impl RecordingSearchApi for super::musicbrainz::MusicBrainzClient {
    async fn search_recording(
        &self,
        artist: &str,
        title: &str,
    ) -> Result<RecordingMatch, AnnotationError> {
        self.search_recording(artist, title).await
    }
}

#[async_trait]
impl AcousticFeaturesApi for super::acousticbrainz::AcousticBrainzClient {
    async fn low_level(&self, mbid: &str) -> Result<AcousticFeatures, AnnotationError> {
        self.low_level(mbid).await
    }
}

/// Mock clients for service tests.
#[cfg(test)]
pub mod mocks {
    use super::*;

    /// Mock recording search returning a fixed result.
    pub struct MockSearch {
        /// Match to return
        pub result: Option<RecordingMatch>,
        /// Error to return (takes precedence over result)
        pub error: Option<AnnotationError>,
    }

    impl MockSearch {
        /// A search that resolves every track to the given MBID.
        pub fn hit(mbid: &str) -> Self {
            Self {
                result: Some(RecordingMatch {
                    mbid: mbid.to_string(),
                    score: Some(100),
                }),
                error: None,
            }
        }

        /// A search that never finds anything.
        pub fn miss() -> Self {
            Self {
                result: None,
                error: None,
            }
        }

        /// A search that fails with the given error.
        pub fn with_error(error: AnnotationError) -> Self {
            Self {
                result: None,
                error: Some(error),
            }
        }
    }

    #[async_trait]
    impl RecordingSearchApi for MockSearch {
        async fn search_recording(
            &self,
            _artist: &str,
            _title: &str,
        ) -> Result<RecordingMatch, AnnotationError> {
            if let Some(ref err) = self.error {
                return Err(err.clone());
            }
            self.result.clone().ok_or(AnnotationError::NoMatches)
        }
    }

    /// Mock features lookup returning a fixed result.
    pub struct MockFeatures {
        /// Features to return
        pub result: Option<AcousticFeatures>,
        /// Error to return (takes precedence over result)
        pub error: Option<AnnotationError>,
    }

    impl MockFeatures {
        /// Features with both bpm and raw key present.
        pub fn full(bpm: f64, raw_key: &str) -> Self {
            Self {
                result: Some(AcousticFeatures {
                    bpm: Some(bpm),
                    raw_key: Some(raw_key.to_string()),
                }),
                error: None,
            }
        }

        /// A recording AcousticBrainz never analyzed.
        pub fn unanalyzed() -> Self {
            Self {
                result: None,
                error: Some(AnnotationError::NoMatches),
            }
        }

        /// A lookup that fails with the given error.
        pub fn with_error(error: AnnotationError) -> Self {
            Self {
                result: None,
                error: Some(error),
            }
        }
    }

    #[async_trait]
    impl AcousticFeaturesApi for MockFeatures {
        async fn low_level(&self, _mbid: &str) -> Result<AcousticFeatures, AnnotationError> {
            if let Some(ref err) = self.error {
                return Err(err.clone());
            }
            Ok(self.result.clone().unwrap_or_default())
        }
    }
}
