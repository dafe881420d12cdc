use super::prelude::*;

#[derive(Default)]
pub struct UserQueries;

#[Object]
impl UserQueries {
    /// The current user, or null when not logged in
    async fn me(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        let catalog = ctx.data_unchecked::<Arc<CatalogService>>();
        let profile = catalog
            .me(ctx.principal())
            .await
            .map_err(|e| e.extend())?;

        Ok(profile.map(User::from))
    }
}
