//! GraphQL schema definition with queries, mutations, and subscriptions

use std::sync::Arc;

use async_graphql::extensions::Tracing;
use async_graphql::{MergedObject, Schema};

use crate::services::CatalogService;

use super::mutations::{AuthMutations, AuthorMutations, BookMutations};
use super::queries::{CatalogQueries, UserQueries};
use super::subscriptions::SubscriptionRoot;

/// The GraphQL schema type
pub type CatalogSchema = Schema<QueryRoot, MutationRoot, SubscriptionRoot>;

#[derive(MergedObject, Default)]
pub struct QueryRoot(CatalogQueries, UserQueries);

#[derive(MergedObject, Default)]
pub struct MutationRoot(BookMutations, AuthorMutations, AuthMutations);

/// Build the GraphQL schema with all resolvers
pub fn build_schema(catalog: Arc<CatalogService>) -> CatalogSchema {
    Schema::build(
        QueryRoot::default(),
        MutationRoot::default(),
        SubscriptionRoot,
    )
    .data(catalog)
    .extension(Tracing)
    .finish()
}
