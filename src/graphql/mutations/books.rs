use super::prelude::*;

#[derive(Default)]
pub struct BookMutations;

#[Object]
impl BookMutations {
    /// Add a book, creating its author on first mention
    ///
    /// Requires authentication.
    async fn add_book(
        &self,
        ctx: &Context<'_>,
        title: String,
        author: String,
        published: i32,
        genres: Vec<String>,
    ) -> Result<Option<Book>> {
        let catalog = ctx.data_unchecked::<Arc<CatalogService>>();
        let input = NewBook {
            title,
            author,
            published,
            genres,
        };

        let book = catalog
            .add_book(ctx.principal(), input)
            .await
            .map_err(|e| e.extend())?;

        Ok(Some(book.into()))
    }
}
