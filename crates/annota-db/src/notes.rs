//! Postgres note store implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres, Row, Transaction};
use uuid::Uuid;

use annota_core::{
    CreateNote, Error, Note, NoteStore, Page, Result, SearchNotes, Sentiment, UpdateNote,
};

/// Wrap a keyword as an ILIKE substring pattern, escaping LIKE wildcards
/// so user input matches literally.
fn like_pattern(keyword: &str) -> String {
    let escaped = keyword
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// PostgreSQL implementation of [`NoteStore`].
pub struct PgNoteStore {
    pool: Pool<Postgres>,
}

impl PgNoteStore {
    /// Create a new PgNoteStore with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn fetch_category_ids(
        tx: &mut Transaction<'_, Postgres>,
        note_id: Uuid,
    ) -> Result<Vec<Uuid>> {
        let rows = sqlx::query(
            "SELECT category_id FROM note_category WHERE note_id = $1 ORDER BY category_id",
        )
        .bind(note_id)
        .fetch_all(&mut **tx)
        .await
        .map_err(Error::Database)?;

        Ok(rows.iter().map(|r| r.get("category_id")).collect())
    }

    async fn replace_category_ids(
        tx: &mut Transaction<'_, Postgres>,
        note_id: Uuid,
        category_ids: &[Uuid],
    ) -> Result<()> {
        sqlx::query("DELETE FROM note_category WHERE note_id = $1")
            .bind(note_id)
            .execute(&mut **tx)
            .await
            .map_err(Error::Database)?;

        for category_id in category_ids {
            sqlx::query(
                "INSERT INTO note_category (note_id, category_id) VALUES ($1, $2)
                 ON CONFLICT DO NOTHING",
            )
            .bind(note_id)
            .bind(category_id)
            .execute(&mut **tx)
            .await
            .map_err(Error::Database)?;
        }
        Ok(())
    }

    fn map_row(row: &sqlx::postgres::PgRow, category_ids: Vec<Uuid>) -> Note {
        let sentiment: Option<String> = row.get("sentiment");
        Note {
            id: row.get("id"),
            title: row.get("title"),
            content: row.get("content"),
            category_ids,
            summary: row.get("summary"),
            sentiment: sentiment.as_deref().and_then(Sentiment::from_label),
            created_at: row.get::<DateTime<Utc>, _>("created_at"),
            updated_at: row.get::<DateTime<Utc>, _>("updated_at"),
        }
    }
}

#[async_trait]
impl NoteStore for PgNoteStore {
    async fn create(&self, req: CreateNote) -> Result<Note> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let id = Uuid::new_v4();
        let row = sqlx::query(
            "INSERT INTO note (id, title, content) VALUES ($1, $2, $3)
             RETURNING id, title, content, summary, sentiment, created_at, updated_at",
        )
        .bind(id)
        .bind(&req.title)
        .bind(&req.content)
        .fetch_one(&mut *tx)
        .await
        .map_err(Error::Database)?;

        Self::replace_category_ids(&mut tx, id, &req.category_ids).await?;
        let category_ids = Self::fetch_category_ids(&mut tx, id).await?;

        tx.commit().await.map_err(Error::Database)?;
        Ok(Self::map_row(&row, category_ids))
    }

    async fn get(&self, id: Uuid) -> Result<Note> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let row = sqlx::query(
            "SELECT id, title, content, summary, sentiment, created_at, updated_at
             FROM note WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(Error::Database)?
        .ok_or(Error::NoteNotFound(id))?;

        let category_ids = Self::fetch_category_ids(&mut tx, id).await?;
        tx.commit().await.map_err(Error::Database)?;

        Ok(Self::map_row(&row, category_ids))
    }

    async fn list(&self, page: Page) -> Result<Vec<Note>> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let rows = sqlx::query(
            "SELECT id, title, content, summary, sentiment, created_at, updated_at
             FROM note ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&mut *tx)
        .await
        .map_err(Error::Database)?;

        let mut notes = Vec::with_capacity(rows.len());
        for row in &rows {
            let id: Uuid = row.get("id");
            let category_ids = Self::fetch_category_ids(&mut tx, id).await?;
            notes.push(Self::map_row(row, category_ids));
        }

        tx.commit().await.map_err(Error::Database)?;
        Ok(notes)
    }

    async fn search(&self, query: SearchNotes, page: Page) -> Result<Vec<Note>> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let pattern = query.keyword.as_deref().map(like_pattern);
        let rows = sqlx::query(
            "SELECT id, title, content, summary, sentiment, created_at, updated_at
             FROM note
             WHERE ($1::text IS NULL OR title ILIKE $1 OR content ILIKE $1)
               AND ($2::uuid IS NULL
                    OR id IN (SELECT note_id FROM note_category WHERE category_id = $2))
             ORDER BY created_at DESC LIMIT $3 OFFSET $4",
        )
        .bind(pattern.as_deref())
        .bind(query.category_id)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&mut *tx)
        .await
        .map_err(Error::Database)?;

        let mut notes = Vec::with_capacity(rows.len());
        for row in &rows {
            let id: Uuid = row.get("id");
            let category_ids = Self::fetch_category_ids(&mut tx, id).await?;
            notes.push(Self::map_row(row, category_ids));
        }

        tx.commit().await.map_err(Error::Database)?;
        Ok(notes)
    }

    async fn update(&self, id: Uuid, req: UpdateNote) -> Result<Note> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        // COALESCE keeps unspecified fields intact so the enrichment merge
        // can overwrite summary/sentiment without touching title/content.
        let row = sqlx::query(
            "UPDATE note SET
                 title = COALESCE($2, title),
                 content = COALESCE($3, content),
                 summary = COALESCE($4, summary),
                 sentiment = COALESCE($5, sentiment),
                 updated_at = now()
             WHERE id = $1
             RETURNING id, title, content, summary, sentiment, created_at, updated_at",
        )
        .bind(id)
        .bind(req.title.as_deref())
        .bind(req.content.as_deref())
        .bind(req.summary.as_deref())
        .bind(req.sentiment.map(|s| s.as_str()))
        .fetch_optional(&mut *tx)
        .await
        .map_err(Error::Database)?
        .ok_or(Error::NoteNotFound(id))?;

        if let Some(category_ids) = &req.category_ids {
            Self::replace_category_ids(&mut tx, id, category_ids).await?;
        }
        let category_ids = Self::fetch_category_ids(&mut tx, id).await?;

        tx.commit().await.map_err(Error::Database)?;
        Ok(Self::map_row(&row, category_ids))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM note WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NoteNotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("rust"), "%rust%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
    }
}
