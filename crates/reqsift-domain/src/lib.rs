//! Reqsift Domain Layer
//!
//! Core vocabulary shared by every Reqsift crate: the requirement records a
//! language model extracts from an SRS document, and the trait seams behind
//! which the infrastructure (model client, document reader, result store)
//! lives.
//!
//! ## Key Concepts
//!
//! - **Requirement**: a titled statement plus an optional source location
//! - **ExtractionResult**: the functional and non-functional requirement lists
//! - **ModalVerb**: the fixed vocabulary non-functional descriptions are
//!   reworded with, each verb carrying an importance level
//!
//! ## Architecture
//!
//! - Pure data types and trait definitions only
//! - Infrastructure implementations live in other crates
//! - The only external dependency is serde, since requirement records travel
//!   between crates as JSON

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod modal;
pub mod requirement;
pub mod traits;

// Re-exports for convenience
pub use modal::ModalVerb;
pub use requirement::{
    ExtractionResult, JsonObject, Requirement, RequirementKind, RequirementSource,
};
