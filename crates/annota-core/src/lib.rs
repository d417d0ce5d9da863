//! # annota-core
//!
//! Core types, traits, and abstractions for the annota notes backend.
//!
//! This crate provides the foundational data structures and trait definitions
//! that other annota crates depend on: the note/category models, the
//! enrichment result types, the error taxonomy, and the store/provider
//! traits that make the persistence and inference backends pluggable.

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::{
    Category, EnrichmentKind, EnrichmentResult, Note, Provenance, Sentiment, SuggestionMethod,
};
pub use traits::{
    CategoryStore, CreateCategory, CreateNote, InferenceProvider, NoteStore, Page, SearchNotes,
    UpdateCategory, UpdateNote,
};
