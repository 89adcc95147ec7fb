//! AcousticBrainz low-level features client.
//!
//! Fetches precomputed acoustic analysis (tempo, estimated key) for a
//! MusicBrainz recording ID. The AcousticBrainz project stopped collecting
//! new submissions in 2022 but keeps serving its archive, which covers most
//! catalogue releases. See: https://acousticbrainz.org/data

use crate::annotate::domain::{AcousticFeatures, AnnotationError};

/// AcousticBrainz API client
pub struct AcousticBrainzClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl AcousticBrainzClient {
    /// Create a new client.
    pub fn new() -> Self {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("mixset/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http_client,
            base_url: "https://acousticbrainz.org".to_string(),
        }
    }

    /// Create a client for testing with custom base URL
    #[cfg(test)]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .user_agent("mixset/test")
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    /// Fetch low-level features (bpm, key) for a recording.
    pub async fn low_level(&self, mbid: &str) -> Result<AcousticFeatures, AnnotationError> {
        let response = self.send_low_level_request(mbid).await?;
        Ok(adapter::to_features(response))
    }

    /// Send the HTTP request and parse the response
    async fn send_low_level_request(
        &self,
        mbid: &str,
    ) -> Result<dto::LowLevelResponse, AnnotationError> {
        let url = format!("{}/api/v1/{}/low-level", self.base_url, mbid);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| AnnotationError::Network(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            // Recording simply was never analyzed.
            return Err(AnnotationError::NoMatches);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AnnotationError::RateLimited);
        }

        if !status.is_success() {
            return Err(AnnotationError::Network(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        response
            .json::<dto::LowLevelResponse>()
            .await
            .map_err(|e| AnnotationError::Parse(e.to_string()))
    }
}

impl Default for AcousticBrainzClient {
    fn default() -> Self {
        Self::new()
    }
}

/// AcousticBrainz API Data Transfer Objects.
///
/// These types match EXACTLY the slice of the low-level document we use.
/// Serde skips the (large) remainder of the payload.
mod dto {
    use serde::Deserialize;

    /// Low-level analysis document (the parts we care about)
    #[derive(Debug, Clone, Deserialize)]
    pub struct LowLevelResponse {
        #[serde(default)]
        pub rhythm: Option<Rhythm>,
        #[serde(default)]
        pub tonal: Option<Tonal>,
    }

    /// Rhythm descriptors
    #[derive(Debug, Clone, Deserialize)]
    pub struct Rhythm {
        /// Estimated tempo
        pub bpm: Option<f64>,
    }

    /// Tonal descriptors
    #[derive(Debug, Clone, Deserialize)]
    pub struct Tonal {
        /// Estimated tonic, e.g. "C#"
        pub key_key: Option<String>,
        /// Estimated scale, "major" or "minor"
        pub key_scale: Option<String>,
    }
}

/// Convert API DTOs to domain models.
mod adapter {
    use super::dto;
    use crate::annotate::domain::AcousticFeatures;

    /// The raw key only exists when the analysis produced both a tonic and
    /// a scale; one without the other is useless to the normalizer.
    pub fn to_features(response: dto::LowLevelResponse) -> AcousticFeatures {
        let bpm = response.rhythm.and_then(|r| r.bpm);
        let raw_key = response.tonal.and_then(|t| match (t.key_key, t.key_scale) {
            (Some(key), Some(scale)) => Some(format!("{key} {scale}")),
            _ => None,
        });
        AcousticFeatures { bpm, raw_key }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = AcousticBrainzClient::new();
        assert_eq!(client.base_url, "https://acousticbrainz.org");
    }

    #[test]
    fn test_low_level_document_parses() {
        let json = r#"{
            "rhythm": {"bpm": 127.8, "beats_count": 512},
            "tonal": {"key_key": "C#", "key_scale": "minor", "key_strength": 0.71},
            "metadata": {"version": {"essentia": "2.1-beta2"}}
        }"#;
        let parsed: dto::LowLevelResponse = serde_json::from_str(json).unwrap();
        let features = adapter::to_features(parsed);
        assert_eq!(features.bpm, Some(127.8));
        assert_eq!(features.raw_key.as_deref(), Some("C# minor"));
    }

    #[test]
    fn test_missing_scale_yields_no_raw_key() {
        let json = r#"{"rhythm": {"bpm": 120.0}, "tonal": {"key_key": "D"}}"#;
        let parsed: dto::LowLevelResponse = serde_json::from_str(json).unwrap();
        let features = adapter::to_features(parsed);
        assert_eq!(features.bpm, Some(120.0));
        assert!(features.raw_key.is_none());
    }

    #[test]
    fn test_empty_document_yields_empty_features() {
        let parsed: dto::LowLevelResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(adapter::to_features(parsed), AcousticFeatures::default());
    }
}
