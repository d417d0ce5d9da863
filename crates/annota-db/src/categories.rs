//! Postgres category store implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use annota_core::{Category, CategoryStore, CreateCategory, Error, Result, UpdateCategory};

/// PostgreSQL implementation of [`CategoryStore`].
pub struct PgCategoryStore {
    pool: Pool<Postgres>,
}

impl PgCategoryStore {
    /// Create a new PgCategoryStore with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn map_row(row: &sqlx::postgres::PgRow) -> Category {
        Category {
            id: row.get("id"),
            name: row.get("name"),
            description: row.get("description"),
            created_at: row.get::<DateTime<Utc>, _>("created_at"),
            updated_at: row.get::<DateTime<Utc>, _>("updated_at"),
        }
    }

    fn map_unique_violation(err: sqlx::Error, name: &str) -> Error {
        let msg = err.to_string();
        if msg.contains("duplicate key") || msg.contains("unique constraint") {
            return Error::Conflict(format!("A category named '{}' already exists", name));
        }
        Error::Database(err)
    }
}

#[async_trait]
impl CategoryStore for PgCategoryStore {
    async fn create(&self, req: CreateCategory) -> Result<Category> {
        let row = sqlx::query(
            "INSERT INTO category (id, name, description) VALUES ($1, $2, $3)
             RETURNING id, name, description, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(&req.name)
        .bind(req.description.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| Self::map_unique_violation(e, &req.name))?;

        Ok(Self::map_row(&row))
    }

    async fn get(&self, id: Uuid) -> Result<Category> {
        let row = sqlx::query(
            "SELECT id, name, description, created_at, updated_at FROM category WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?
        .ok_or(Error::CategoryNotFound(id))?;

        Ok(Self::map_row(&row))
    }

    async fn list(&self) -> Result<Vec<Category>> {
        let rows = sqlx::query(
            "SELECT id, name, description, created_at, updated_at FROM category ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.iter().map(Self::map_row).collect())
    }

    async fn update(&self, id: Uuid, req: UpdateCategory) -> Result<Category> {
        let name_for_conflict = req.name.clone().unwrap_or_default();
        let row = sqlx::query(
            "UPDATE category SET
                 name = COALESCE($2, name),
                 description = COALESCE($3, description),
                 updated_at = now()
             WHERE id = $1
             RETURNING id, name, description, created_at, updated_at",
        )
        .bind(id)
        .bind(req.name.as_deref())
        .bind(req.description.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Self::map_unique_violation(e, &name_for_conflict))?
        .ok_or(Error::CategoryNotFound(id))?;

        Ok(Self::map_row(&row))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        // No cascade: notes referencing this category keep the dangling ID.
        let result = sqlx::query("DELETE FROM category WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::CategoryNotFound(id));
        }
        Ok(())
    }
}
