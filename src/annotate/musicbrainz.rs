//! MusicBrainz recording search client.
//!
//! Resolves an artist + title pair to a MusicBrainz recording ID via the
//! search endpoint. See: https://musicbrainz.org/doc/MusicBrainz_API/Search
//!
//! IMPORTANT: MusicBrainz requires a User-Agent header with contact
//! information and rate limits to 1 req/sec; the service layer paces calls.

use crate::annotate::domain::{AnnotationError, RecordingMatch};

/// MusicBrainz API client
pub struct MusicBrainzClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl MusicBrainzClient {
    /// Create a new client. `contact` goes into the User-Agent as
    /// MusicBrainz asks of all API consumers.
    pub fn new(contact: &str) -> Self {
        let user_agent = format!(
            "mixset/{} ({})",
            env!("CARGO_PKG_VERSION"),
            if contact.is_empty() {
                "no-contact-configured"
            } else {
                contact
            }
        );
        let http_client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http_client,
            base_url: "https://musicbrainz.org/ws/2".to_string(),
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

    /// Search for a recording by artist and title, returning the best match.
    pub async fn search_recording(
        &self,
        artist: &str,
        title: &str,
    ) -> Result<RecordingMatch, AnnotationError> {
        let response = self.send_search_request(artist, title).await?;
        adapter::to_match(response)
    }

    /// Send the HTTP request and parse the response
    async fn send_search_request(
        &self,
        artist: &str,
        title: &str,
    ) -> Result<dto::SearchResponse, AnnotationError> {
        let query = build_query(artist, title);
        let url = format!(
            "{}/recording?query={}&fmt=json&limit=1",
            self.base_url,
            urlencoding::encode(&query)
        );

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| AnnotationError::Network(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AnnotationError::RateLimited);
        }

        if !status.is_success() {
            if let Ok(error) = response.json::<dto::ApiError>().await {
                return Err(AnnotationError::ApiError(error.error));
            }
            return Err(AnnotationError::Network(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        response
            .json::<dto::SearchResponse>()
            .await
            .map_err(|e| AnnotationError::Parse(e.to_string()))
    }
}

/// Build the Lucene search query. Embedded quotes would break the phrase
/// syntax, so they are stripped from the terms.
fn build_query(artist: &str, title: &str) -> String {
    format!(
        "artist:\"{}\" AND recording:\"{}\"",
        artist.replace('"', ""),
        title.replace('"', "")
    )
}

/// MusicBrainz search API Data Transfer Objects.
///
/// These types match EXACTLY what the API returns. Do not use them outside
/// this module - convert to domain types via the adapter.
mod dto {
    use serde::Deserialize;

    /// Recording search response
    #[derive(Debug, Clone, Deserialize)]
    pub struct SearchResponse {
        /// Matching recordings, best first
        #[serde(default)]
        pub recordings: Vec<Recording>,
    }

    /// One recording search hit
    #[derive(Debug, Clone, Deserialize)]
    pub struct Recording {
        /// MusicBrainz recording ID
        pub id: String,
        /// Search relevance score (0-100)
        pub score: Option<i32>,
    }

    /// Error response shape
    #[derive(Debug, Clone, Deserialize)]
    pub struct ApiError {
        pub error: String,
    }
}

/// Convert API DTOs to domain models.
mod adapter {
    use super::dto;
    use crate::annotate::domain::{AnnotationError, RecordingMatch};

    /// An empty hit list is a clean "no matches", not a transport failure.
    pub fn to_match(response: dto::SearchResponse) -> Result<RecordingMatch, AnnotationError> {
        let best = response
            .recordings
            .into_iter()
            .next()
            .ok_or(AnnotationError::NoMatches)?;
        Ok(RecordingMatch {
            mbid: best.id,
            score: best.score,
        })
    }
}
