//! Core identity and annotation types shared across the workspace.
//!
//! This crate carries no behavior beyond identity minting: documents and
//! views are referenced by stable IDs, languages by a host-assigned dense ID,
//! and annotation output is a revisioned batch of tagged byte-range spans.

/// Annotation output data model: ranges, spans, and batches.
pub mod annotations;
/// Light document model at the host boundary.
pub mod document;
/// Identifier types for host entities.
pub mod ids;
/// Language identity.
pub mod language;

pub use annotations::{AnnotationBatch, AnnotationSpan, AnnotationTag, TextRange};
pub use document::Document;
pub use ids::{DocumentId, ViewId};
pub use language::LanguageId;
