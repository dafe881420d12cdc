//! Authors repository
//!
//! Author names are unique. [`AuthorsRepository::create`] is a compare-and-create
//! keyed on the name, so two concurrent submissions for the same unseen author
//! end up sharing one record.

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use super::sqlite_helpers::{new_id, now_iso8601};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRecord {
    pub id: String,
    pub name: String,
    pub born: Option<i32>,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct CreateAuthor {
    pub name: String,
    pub born: Option<i32>,
}

type AuthorRow = (String, String, Option<i32>, String);

fn row_to_record(r: AuthorRow) -> AuthorRecord {
    AuthorRecord {
        id: r.0,
        name: r.1,
        born: r.2,
        created_at: r.3,
    }
}

pub struct AuthorsRepository {
    pool: SqlitePool,
}

impl AuthorsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Count all authors
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// List all authors in insertion order
    pub async fn list(&self) -> Result<Vec<AuthorRecord>> {
        let rows = sqlx::query_as::<_, AuthorRow>(
            "SELECT id, name, born, created_at FROM authors ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(row_to_record).collect())
    }

    /// Get author by exact name
    pub async fn get_by_name(&self, name: &str) -> Result<Option<AuthorRecord>> {
        let row = sqlx::query_as::<_, AuthorRow>(
            "SELECT id, name, born, created_at FROM authors WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(row_to_record))
    }

    /// Get author by ID
    pub async fn get_by_id(&self, id: &str) -> Result<Option<AuthorRecord>> {
        let row = sqlx::query_as::<_, AuthorRow>(
            "SELECT id, name, born, created_at FROM authors WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(row_to_record))
    }

    /// Insert an author, or return the one that already holds this name
    pub async fn create(&self, author: CreateAuthor) -> Result<AuthorRecord> {
        let id = new_id();

        let inserted = sqlx::query(
            r#"
            INSERT INTO authors (id, name, born, created_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(name) DO NOTHING
            "#,
        )
        .bind(&id)
        .bind(&author.name)
        .bind(author.born)
        .bind(now_iso8601())
        .execute(&self.pool)
        .await?
        .rows_affected();

        if inserted == 0 {
            tracing::debug!(author = %author.name, "Author already exists, reusing record");
        }

        self.get_by_name(&author.name)
            .await?
            .ok_or_else(|| anyhow!("Failed to create author '{}'", author.name))
    }

    /// Persist the mutable fields of an existing author
    pub async fn update(&self, author: &AuthorRecord) -> Result<AuthorRecord> {
        let updated = sqlx::query("UPDATE authors SET name = ?, born = ? WHERE id = ?")
            .bind(&author.name)
            .bind(author.born)
            .bind(&author.id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if updated == 0 {
            return Err(anyhow!("Author {} no longer exists", author.id));
        }

        self.get_by_id(&author.id)
            .await?
            .ok_or_else(|| anyhow!("Author {} no longer exists", author.id))
    }
}
