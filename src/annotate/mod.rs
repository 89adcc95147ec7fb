//! Remote acoustic annotation - resolves tracks to MusicBrainz recordings
//! and fetches tempo/key estimates from AcousticBrainz.
//!
//! # Architecture
//!
//! This module follows a clean separation between:
//! - **Domain models** (`domain.rs`) - Internal types that represent our pipeline
//! - **API DTOs** (in `musicbrainz.rs` / `acousticbrainz.rs`) - Exact API response shapes
//! - **Adapters** - Convert DTOs to domain models
//! - **Clients** - HTTP clients for the external APIs
//! - **Service** - High-level orchestration of the annotation flow
//!
//! This decoupling means API changes don't ripple through the pipeline and
//! the flow is testable against mock clients.
//!
//! # Usage
//!
//! ```ignore
//! use mixset::annotate::AnnotationService;
//!
//! let service = AnnotationService::new("dj@example.com");
//! let annotation = service.annotate("Donato Dozzy", "Vaporware 01").await?;
//! println!("bpm: {:?}, key: {:?}", annotation.bpm, annotation.raw_key);
//! ```

pub mod acousticbrainz;
pub mod domain;
pub mod musicbrainz;
pub mod service;
pub mod traits;

pub use domain::{AcousticFeatures, AnnotationError, RecordingMatch, TrackAnnotation};
pub use service::AnnotationService;
