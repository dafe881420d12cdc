use super::prelude::*;

#[derive(Default)]
pub struct AuthorMutations;

#[Object]
impl AuthorMutations {
    /// Set an author's birth year; null if the author does not exist
    ///
    /// Requires authentication.
    async fn edit_author(
        &self,
        ctx: &Context<'_>,
        name: String,
        set_born_to: i32,
    ) -> Result<Option<Author>> {
        let catalog = ctx.data_unchecked::<Arc<CatalogService>>();
        let author = catalog
            .edit_author(ctx.principal(), &name, set_born_to)
            .await
            .map_err(|e| e.extend())?;

        Ok(author.map(Author::from))
    }
}
