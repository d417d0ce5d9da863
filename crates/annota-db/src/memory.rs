//! In-process document store implementation.
//!
//! Holds notes and categories as documents in process memory behind the same
//! store traits as the Postgres implementation, so the two are observably
//! interchangeable. Selected via `ANNOTA_STORE=memory`; suitable for
//! development and tests, not durable.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use annota_core::{
    Category, CategoryStore, CreateCategory, CreateNote, Error, Note, NoteStore, Page, Result,
    SearchNotes, UpdateCategory, UpdateNote,
};

/// In-memory implementation of [`NoteStore`].
#[derive(Clone, Default)]
pub struct MemNoteStore {
    docs: Arc<RwLock<HashMap<Uuid, Note>>>,
}

impl MemNoteStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored notes.
    pub fn len(&self) -> usize {
        self.docs.read().unwrap().len()
    }

    /// True if no notes are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl NoteStore for MemNoteStore {
    async fn create(&self, req: CreateNote) -> Result<Note> {
        let now = Utc::now();
        let note = Note {
            id: Uuid::new_v4(),
            title: req.title,
            content: req.content,
            category_ids: req.category_ids,
            summary: None,
            sentiment: None,
            created_at: now,
            updated_at: now,
        };
        self.docs.write().unwrap().insert(note.id, note.clone());
        Ok(note)
    }

    async fn get(&self, id: Uuid) -> Result<Note> {
        self.docs
            .read()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(Error::NoteNotFound(id))
    }

    async fn list(&self, page: Page) -> Result<Vec<Note>> {
        let docs = self.docs.read().unwrap();
        let mut notes: Vec<Note> = docs.values().cloned().collect();
        notes.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let offset = page.offset.max(0) as usize;
        let limit = page.limit.max(0) as usize;
        Ok(notes.into_iter().skip(offset).take(limit).collect())
    }

    async fn search(&self, query: SearchNotes, page: Page) -> Result<Vec<Note>> {
        let keyword = query.keyword.as_deref().map(str::to_lowercase);
        let docs = self.docs.read().unwrap();
        let mut notes: Vec<Note> = docs
            .values()
            .filter(|n| {
                keyword.as_deref().map_or(true, |kw| {
                    n.title.to_lowercase().contains(kw) || n.content.to_lowercase().contains(kw)
                })
            })
            .filter(|n| {
                query
                    .category_id
                    .map_or(true, |id| n.category_ids.contains(&id))
            })
            .cloned()
            .collect();
        notes.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let offset = page.offset.max(0) as usize;
        let limit = page.limit.max(0) as usize;
        Ok(notes.into_iter().skip(offset).take(limit).collect())
    }

    async fn update(&self, id: Uuid, req: UpdateNote) -> Result<Note> {
        let mut docs = self.docs.write().unwrap();
        let note = docs.get_mut(&id).ok_or(Error::NoteNotFound(id))?;

        if let Some(title) = req.title {
            note.title = title;
        }
        if let Some(content) = req.content {
            note.content = content;
        }
        if let Some(category_ids) = req.category_ids {
            note.category_ids = category_ids;
        }
        if let Some(summary) = req.summary {
            note.summary = Some(summary);
        }
        if let Some(sentiment) = req.sentiment {
            note.sentiment = Some(sentiment);
        }
        note.updated_at = Utc::now();
        Ok(note.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.docs
            .write()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(Error::NoteNotFound(id))
    }
}

/// In-memory implementation of [`CategoryStore`].
#[derive(Clone, Default)]
pub struct MemCategoryStore {
    docs: Arc<RwLock<HashMap<Uuid, Category>>>,
}

impl MemCategoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn name_taken(docs: &HashMap<Uuid, Category>, name: &str, except: Option<Uuid>) -> bool {
        docs.values()
            .any(|c| c.name == name && Some(c.id) != except)
    }
}

#[async_trait]
impl CategoryStore for MemCategoryStore {
    async fn create(&self, req: CreateCategory) -> Result<Category> {
        let mut docs = self.docs.write().unwrap();
        if Self::name_taken(&docs, &req.name, None) {
            return Err(Error::Conflict(format!(
                "A category named '{}' already exists",
                req.name
            )));
        }

        let now = Utc::now();
        let category = Category {
            id: Uuid::new_v4(),
            name: req.name,
            description: req.description,
            created_at: now,
            updated_at: now,
        };
        docs.insert(category.id, category.clone());
        Ok(category)
    }

    async fn get(&self, id: Uuid) -> Result<Category> {
        self.docs
            .read()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(Error::CategoryNotFound(id))
    }

    async fn list(&self) -> Result<Vec<Category>> {
        let docs = self.docs.read().unwrap();
        let mut categories: Vec<Category> = docs.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn update(&self, id: Uuid, req: UpdateCategory) -> Result<Category> {
        let mut docs = self.docs.write().unwrap();

        if let Some(name) = &req.name {
            if Self::name_taken(&docs, name, Some(id)) {
                return Err(Error::Conflict(format!(
                    "A category named '{}' already exists",
                    name
                )));
            }
        }

        let category = docs.get_mut(&id).ok_or(Error::CategoryNotFound(id))?;
        if let Some(name) = req.name {
            category.name = name;
        }
        if let Some(description) = req.description {
            category.description = Some(description);
        }
        category.updated_at = Utc::now();
        Ok(category.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.docs
            .write()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(Error::CategoryNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note_req(title: &str) -> CreateNote {
        CreateNote {
            title: title.to_string(),
            content: "some content".to_string(),
            category_ids: vec![],
        }
    }

    #[tokio::test]
    async fn create_and_get_note() {
        let store = MemNoteStore::new();
        let created = store.create(note_req("hello")).await.unwrap();
        let fetched = store.get(created.id).await.unwrap();

        assert_eq!(fetched.title, "hello");
        assert!(fetched.summary.is_none());
        assert!(fetched.sentiment.is_none());
    }

    #[tokio::test]
    async fn get_missing_note_fails_typed() {
        let store = MemNoteStore::new();
        let id = Uuid::new_v4();
        match store.get(id).await {
            Err(Error::NoteNotFound(missing)) => assert_eq!(missing, id),
            other => panic!("expected NoteNotFound, got {:?}", other.map(|n| n.id)),
        }
    }

    #[tokio::test]
    async fn partial_update_preserves_other_fields() {
        let store = MemNoteStore::new();
        let note = store.create(note_req("title")).await.unwrap();

        let updated = store
            .update(
                note.id,
                UpdateNote {
                    summary: Some("a summary".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "title");
        assert_eq!(updated.content, "some content");
        assert_eq!(updated.summary.as_deref(), Some("a summary"));
    }

    #[tokio::test]
    async fn category_names_are_unique() {
        let store = MemCategoryStore::new();
        store
            .create(CreateCategory {
                name: "Work".to_string(),
                description: None,
            })
            .await
            .unwrap();

        let dup = store
            .create(CreateCategory {
                name: "Work".to_string(),
                description: None,
            })
            .await;
        assert!(matches!(dup, Err(Error::Conflict(_))));
    }

    #[tokio::test]
    async fn deleting_category_leaves_note_reference() {
        let categories = MemCategoryStore::new();
        let notes = MemNoteStore::new();

        let cat = categories
            .create(CreateCategory {
                name: "Personal".to_string(),
                description: None,
            })
            .await
            .unwrap();

        let note = notes
            .create(CreateNote {
                title: "n".to_string(),
                content: "c".to_string(),
                category_ids: vec![cat.id],
            })
            .await
            .unwrap();

        categories.delete(cat.id).await.unwrap();

        // Dangling reference is retained by design.
        let fetched = notes.get(note.id).await.unwrap();
        assert_eq!(fetched.category_ids, vec![cat.id]);
    }

    #[tokio::test]
    async fn search_matches_title_and_content_case_insensitively() {
        let store = MemNoteStore::new();
        store
            .create(CreateNote {
                title: "Grocery run".to_string(),
                content: "milk and eggs".to_string(),
                category_ids: vec![],
            })
            .await
            .unwrap();
        store
            .create(CreateNote {
                title: "Standup".to_string(),
                content: "Discussed the MILK project".to_string(),
                category_ids: vec![],
            })
            .await
            .unwrap();
        store.create(note_req("unrelated")).await.unwrap();

        let hits = store
            .search(
                SearchNotes {
                    keyword: Some("milk".to_string()),
                    category_id: None,
                },
                Page::default(),
            )
            .await
            .unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn search_filters_by_category() {
        let store = MemNoteStore::new();
        let cat = Uuid::new_v4();
        store
            .create(CreateNote {
                title: "tagged".to_string(),
                content: "milk".to_string(),
                category_ids: vec![cat],
            })
            .await
            .unwrap();
        store
            .create(CreateNote {
                title: "untagged".to_string(),
                content: "milk".to_string(),
                category_ids: vec![],
            })
            .await
            .unwrap();

        let hits = store
            .search(
                SearchNotes {
                    keyword: Some("milk".to_string()),
                    category_id: Some(cat),
                },
                Page::default(),
            )
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "tagged");
    }

    #[tokio::test]
    async fn unfiltered_search_behaves_like_list() {
        let store = MemNoteStore::new();
        for i in 0..3 {
            store.create(note_req(&format!("n{}", i))).await.unwrap();
        }

        let hits = store
            .search(SearchNotes::default(), Page::default())
            .await
            .unwrap();
        assert_eq!(hits.len(), 3);
    }

    #[tokio::test]
    async fn list_is_newest_first_and_paginated() {
        let store = MemNoteStore::new();
        for i in 0..5 {
            store.create(note_req(&format!("note-{}", i))).await.unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }

        let first_page = store.list(Page { limit: 2, offset: 0 }).await.unwrap();
        assert_eq!(first_page.len(), 2);
        assert_eq!(first_page[0].title, "note-4");

        let second_page = store.list(Page { limit: 2, offset: 2 }).await.unwrap();
        assert_eq!(second_page[0].title, "note-2");
    }
}
