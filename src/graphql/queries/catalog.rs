use super::prelude::*;

#[derive(Default)]
pub struct CatalogQueries;

#[Object]
impl CatalogQueries {
    /// Total number of books
    async fn book_count(&self, ctx: &Context<'_>) -> Result<i64> {
        let catalog = ctx.data_unchecked::<Arc<CatalogService>>();
        catalog.book_count().await.map_err(|e| e.extend())
    }

    /// Total number of authors
    async fn author_count(&self, ctx: &Context<'_>) -> Result<i64> {
        let catalog = ctx.data_unchecked::<Arc<CatalogService>>();
        catalog.author_count().await.map_err(|e| e.extend())
    }

    /// Books, optionally filtered by exact author name and/or genre membership
    async fn all_books(
        &self,
        ctx: &Context<'_>,
        author: Option<String>,
        genre: Option<String>,
    ) -> Result<Vec<Book>> {
        let catalog = ctx.data_unchecked::<Arc<CatalogService>>();
        let books = catalog
            .all_books(author.as_deref(), genre.as_deref())
            .await
            .map_err(|e| e.extend())?;

        Ok(books.into_iter().map(Book::from).collect())
    }

    /// All authors
    async fn all_authors(&self, ctx: &Context<'_>) -> Result<Vec<Author>> {
        let catalog = ctx.data_unchecked::<Arc<CatalogService>>();
        let authors = catalog.all_authors().await.map_err(|e| e.extend())?;

        Ok(authors.into_iter().map(Author::from).collect())
    }
}
