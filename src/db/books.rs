//! Books repository
//!
//! Every read joins the referenced author so callers always receive a
//! populated [`BookRecord::author`].

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use super::authors::AuthorRecord;
use super::sqlite_helpers::{
    json_array_contains_sql, json_to_vec, new_id, now_iso8601, vec_to_json,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    pub id: String,
    pub title: String,
    pub published: i32,
    pub author: AuthorRecord,
    pub genres: Vec<String>,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct CreateBook {
    pub title: String,
    pub published: i32,
    pub author_id: String,
    pub genres: Vec<String>,
}

/// Filter for [`BooksRepository::list`]; set fields combine with AND
#[derive(Debug, Clone, Default)]
pub struct BookFilter {
    pub author_id: Option<String>,
    /// Matches books whose genre list contains this value
    pub genre: Option<String>,
}

type BookRow = (
    String,
    String,
    i32,
    String,
    String,
    String,
    String,
    Option<i32>,
    String,
);

const SELECT_BOOKS: &str = r#"
    SELECT b.id, b.title, b.published, b.genres, b.created_at,
           a.id, a.name, a.born, a.created_at
    FROM books b
    JOIN authors a ON a.id = b.author_id
"#;

fn row_to_record(r: BookRow) -> BookRecord {
    BookRecord {
        id: r.0,
        title: r.1,
        published: r.2,
        genres: json_to_vec(&r.3),
        created_at: r.4,
        author: AuthorRecord {
            id: r.5,
            name: r.6,
            born: r.7,
            created_at: r.8,
        },
    }
}

pub struct BooksRepository {
    pool: SqlitePool,
}

impl BooksRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Count all books
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Count books referencing an author
    pub async fn count_by_author(&self, author_id: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE author_id = ?")
            .bind(author_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// List books matching the filter, in insertion order
    pub async fn list(&self, filter: &BookFilter) -> Result<Vec<BookRecord>> {
        let mut conditions = Vec::new();
        if filter.author_id.is_some() {
            conditions.push("b.author_id = ?".to_string());
        }
        if filter.genre.is_some() {
            conditions.push(json_array_contains_sql("b.genres"));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let query = format!("{} {} ORDER BY b.rowid", SELECT_BOOKS, where_clause);

        let mut builder = sqlx::query_as::<_, BookRow>(&query);
        if let Some(author_id) = &filter.author_id {
            builder = builder.bind(author_id);
        }
        if let Some(genre) = &filter.genre {
            builder = builder.bind(genre);
        }

        let rows = builder.fetch_all(&self.pool).await?;

        Ok(rows.into_iter().map(row_to_record).collect())
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: &str) -> Result<Option<BookRecord>> {
        let row = sqlx::query_as::<_, BookRow>(&format!("{} WHERE b.id = ?", SELECT_BOOKS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(row_to_record))
    }

    /// Insert a book and return it with its author populated
    pub async fn create(&self, book: CreateBook) -> Result<BookRecord> {
        let id = new_id();

        sqlx::query(
            r#"
            INSERT INTO books (id, title, published, author_id, genres, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&book.title)
        .bind(book.published)
        .bind(&book.author_id)
        .bind(vec_to_json(&book.genres))
        .bind(now_iso8601())
        .execute(&self.pool)
        .await?;

        self.get_by_id(&id)
            .await?
            .ok_or_else(|| anyhow!("Failed to create book '{}'", book.title))
    }
}
