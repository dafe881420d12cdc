//! GraphQL API with subscriptions for real-time updates
//!
//! Queries and mutations are served over HTTP, `bookAdded` over WebSocket.
//! Resolvers are thin: they read the request principal and delegate to
//! [`CatalogService`](crate::services::CatalogService).

pub mod auth;
pub mod mutations;
pub mod queries;
mod schema;
mod subscriptions;
pub mod types;

pub use auth::{AuthExt, bearer_token, principal_data};
pub use schema::{CatalogSchema, MutationRoot, QueryRoot, build_schema};
pub use subscriptions::SubscriptionRoot;
pub use types::{Author, Book, Token, User};
