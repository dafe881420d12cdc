//! Request authentication for GraphQL operations
//!
//! A bearer token is resolved to a [`Principal`] before the operation runs and
//! stored in the request data. Resolvers read it back through [`AuthExt`] and
//! pass it explicitly to the catalog service.

use async_graphql::{Context, Data};

use crate::services::{CredentialService, Principal};

/// Strip an optional `Bearer ` prefix from an authorization value
pub fn bearer_token(value: &str) -> Option<&str> {
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    (!token.is_empty()).then_some(token)
}

/// Build request data holding the principal behind `authorization`, if any
pub fn principal_data(credentials: &CredentialService, authorization: Option<&str>) -> Data {
    let mut data = Data::default();
    if let Some(principal) = authorization
        .and_then(bearer_token)
        .and_then(|token| credentials.resolve_principal(token))
    {
        tracing::debug!(username = %principal.username, "Request authenticated");
        data.insert(principal);
    }
    data
}

/// Extension trait to get the current principal from GraphQL context
pub trait AuthExt {
    /// The principal bound to this request, if the token resolved
    fn principal(&self) -> Option<&Principal>;
}

impl<'a> AuthExt for Context<'a> {
    fn principal(&self) -> Option<&Principal> {
        self.data_opt::<Principal>()
    }
}
