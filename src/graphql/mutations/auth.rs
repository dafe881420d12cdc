//! Account mutations
//!
//! Neither mutation requires authentication.

use super::prelude::*;

#[derive(Default)]
pub struct AuthMutations;

#[Object]
impl AuthMutations {
    /// Register a new user; the password is stored only as a hash
    async fn create_user(
        &self,
        ctx: &Context<'_>,
        username: String,
        favorite_genre: String,
        password: Option<String>,
    ) -> Result<Option<User>> {
        let catalog = ctx.data_unchecked::<Arc<CatalogService>>();
        let user = catalog
            .create_user(NewUser {
                username,
                password,
                favorite_genre: Some(favorite_genre),
            })
            .await
            .map_err(|e| e.extend())?;

        Ok(Some(user.into()))
    }

    /// Exchange username and password for a bearer token
    async fn login(
        &self,
        ctx: &Context<'_>,
        username: String,
        password: String,
    ) -> Result<Option<Token>> {
        let catalog = ctx.data_unchecked::<Arc<CatalogService>>();
        let value = catalog
            .login(&username, &password)
            .await
            .map_err(|e| e.extend())?;

        Ok(Some(Token { value }))
    }
}
