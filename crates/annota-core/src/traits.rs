//! Core traits for annota abstractions.
//!
//! These traits define the interfaces that concrete implementations
//! must satisfy, enabling pluggable backends and testability.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Category, Note, Sentiment};

// =============================================================================
// NOTE STORE
// =============================================================================

/// Request for creating a new note.
///
/// Carries no `summary`/`sentiment`: derived fields are never client-supplied.
#[derive(Debug, Clone)]
pub struct CreateNote {
    pub title: String,
    pub content: String,
    pub category_ids: Vec<Uuid>,
}

/// Partial update for a note. `None` fields are left untouched, which lets
/// the enrichment merge overwrite only derived fields without clobbering
/// title or content.
#[derive(Debug, Clone, Default)]
pub struct UpdateNote {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category_ids: Option<Vec<Uuid>>,
    pub summary: Option<String>,
    pub sentiment: Option<Sentiment>,
}

impl UpdateNote {
    /// True if no field would change.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.category_ids.is_none()
            && self.summary.is_none()
            && self.sentiment.is_none()
    }
}

/// Pagination for list operations.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: crate::defaults::PAGE_LIMIT,
            offset: crate::defaults::PAGE_OFFSET,
        }
    }
}

/// Filter for note searches. Empty filters match everything, so an
/// unconstrained search behaves like a plain list.
#[derive(Debug, Clone, Default)]
pub struct SearchNotes {
    /// Case-insensitive substring matched against title or content.
    pub keyword: Option<String>,
    /// Restrict to notes assigned to this category.
    pub category_id: Option<Uuid>,
}

impl SearchNotes {
    /// True if no filter is set.
    pub fn is_unfiltered(&self) -> bool {
        self.keyword.is_none() && self.category_id.is_none()
    }
}

/// Opaque CRUD store for notes, keyed by identifier.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Insert a new note, returning its assigned ID.
    async fn create(&self, req: CreateNote) -> Result<Note>;

    /// Fetch a note by ID. Fails with `Error::NoteNotFound` if absent.
    async fn get(&self, id: Uuid) -> Result<Note>;

    /// List notes, newest first.
    async fn list(&self, page: Page) -> Result<Vec<Note>>;

    /// Search notes by keyword and category, newest first.
    async fn search(&self, query: SearchNotes, page: Page) -> Result<Vec<Note>>;

    /// Apply a partial update. Fails with `Error::NoteNotFound` if absent.
    async fn update(&self, id: Uuid, req: UpdateNote) -> Result<Note>;

    /// Delete a note. Fails with `Error::NoteNotFound` if absent.
    async fn delete(&self, id: Uuid) -> Result<()>;
}

// =============================================================================
// CATEGORY STORE
// =============================================================================

/// Request for creating a category.
#[derive(Debug, Clone)]
pub struct CreateCategory {
    pub name: String,
    pub description: Option<String>,
}

/// Partial update for a category.
#[derive(Debug, Clone, Default)]
pub struct UpdateCategory {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Opaque CRUD store for categories.
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Insert a new category. Fails with `Error::Conflict` on duplicate name.
    async fn create(&self, req: CreateCategory) -> Result<Category>;

    /// Fetch a category by ID. Fails with `Error::CategoryNotFound` if absent.
    async fn get(&self, id: Uuid) -> Result<Category>;

    /// List all categories, name-ordered.
    async fn list(&self) -> Result<Vec<Category>>;

    /// Apply a partial update.
    async fn update(&self, id: Uuid, req: UpdateCategory) -> Result<Category>;

    /// Delete a category. Notes referencing it keep the dangling reference.
    async fn delete(&self, id: Uuid) -> Result<()>;
}

// =============================================================================
// INFERENCE PROVIDER
// =============================================================================

/// AI capability provider consumed by the enrichment pipeline.
///
/// Implementations wrap one backing inference service (hosted API or local
/// model server). All methods fail with `Error::Inference` on transport,
/// auth, rate-limit, or malformed-response problems, and the pipeline converts
/// those failures into fallback results and never propagates them.
#[async_trait]
pub trait InferenceProvider: Send + Sync {
    /// Summarize a note, aiming for at most `max_chars` characters.
    async fn summarize(&self, title: &str, content: &str, max_chars: usize) -> Result<String>;

    /// Classify sentiment. Returns the provider's free-form answer; the
    /// pipeline canonicalizes it.
    async fn classify_sentiment(&self, title: &str, content: &str) -> Result<String>;

    /// Zero-shot classification of `content` against `candidates`.
    /// Returns `Ok(None)` when the provider yields no usable match.
    async fn suggest_category(
        &self,
        content: &str,
        candidates: &[String],
    ) -> Result<Option<(String, f32)>>;

    /// Model identifier for logging.
    fn model_name(&self) -> &str;
}
