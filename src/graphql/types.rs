//! GraphQL object types exposed by the schema

use std::sync::Arc;

use async_graphql::{ComplexObject, Context, ErrorExtensions, ID, Result, SimpleObject};

use crate::db::{AuthorRecord, BookRecord};
use crate::services::{CatalogService, UserProfile};

/// An author; created implicitly the first time a book names them
#[derive(Debug, Clone, SimpleObject)]
#[graphql(complex)]
pub struct Author {
    pub id: ID,
    pub name: String,
    pub born: Option<i32>,
}

#[ComplexObject]
impl Author {
    /// Number of books referencing this author
    async fn book_count(&self, ctx: &Context<'_>) -> Result<i64> {
        let catalog = ctx.data_unchecked::<Arc<CatalogService>>();
        catalog
            .author_book_count(&self.id)
            .await
            .map_err(|e| e.extend())
    }
}

impl From<AuthorRecord> for Author {
    fn from(r: AuthorRecord) -> Self {
        Self {
            id: ID(r.id),
            name: r.name,
            born: r.born,
        }
    }
}

#[derive(Debug, Clone, SimpleObject)]
pub struct Book {
    pub id: ID,
    pub title: String,
    pub published: i32,
    pub author: Author,
    pub genres: Vec<String>,
}

impl From<BookRecord> for Book {
    fn from(r: BookRecord) -> Self {
        Self {
            id: ID(r.id),
            title: r.title,
            published: r.published,
            author: r.author.into(),
            genres: r.genres,
        }
    }
}

#[derive(Debug, Clone, SimpleObject)]
pub struct User {
    pub id: ID,
    pub username: String,
    pub favorite_genre: String,
}

impl From<UserProfile> for User {
    fn from(p: UserProfile) -> Self {
        Self {
            id: ID(p.id),
            username: p.username,
            favorite_genre: p.favorite_genre,
        }
    }
}

/// Bearer token returned by `login`
#[derive(Debug, Clone, SimpleObject)]
pub struct Token {
    pub value: String,
}
