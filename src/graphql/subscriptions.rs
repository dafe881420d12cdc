//! GraphQL subscriptions for real-time updates
//!
//! Subscriptions allow clients to receive push updates over WebSocket.

use std::sync::Arc;

use async_graphql::{Context, Subscription};
use futures::Stream;
use tokio_stream::StreamExt;

use crate::services::CatalogService;

use super::types::Book;

pub struct SubscriptionRoot;

#[Subscription]
impl SubscriptionRoot {
    /// Every book added after the subscription starts
    async fn book_added<'ctx>(&self, ctx: &Context<'ctx>) -> impl Stream<Item = Book> + 'ctx {
        let catalog = ctx.data_unchecked::<Arc<CatalogService>>();
        catalog.book_added().map(Book::from)
    }
}
