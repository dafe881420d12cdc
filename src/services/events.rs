//! Book event bus
//!
//! In-process fan-out of domain events to live subscribers. Each subscriber
//! sees every event published after it subscribed; there is no replay and no
//! durable queue. A subscriber that falls more than the channel capacity
//! behind loses the overwritten events.

use futures::Stream;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;

use crate::db::BookRecord;

/// Topic name of [`BookEvent::Added`]
pub const BOOK_ADDED: &str = "BOOK_ADDED";

/// Event broadcast after a catalog change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookEvent {
    /// A book was persisted
    Added { book: BookRecord },
}

impl BookEvent {
    pub fn topic(&self) -> &'static str {
        match self {
            Self::Added { .. } => BOOK_ADDED,
        }
    }
}

/// Event bus configuration
#[derive(Debug, Clone)]
pub struct EventBusConfig {
    /// Broadcast channel capacity
    pub channel_capacity: usize,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 256,
        }
    }
}

pub struct BookEventBus {
    event_tx: broadcast::Sender<BookEvent>,
}

impl BookEventBus {
    pub fn new(config: EventBusConfig) -> Self {
        let (event_tx, _) = broadcast::channel(config.channel_capacity.max(1));
        Self { event_tx }
    }

    pub fn with_defaults() -> Self {
        Self::new(EventBusConfig::default())
    }

    /// Publish an event; never blocks and never fails the caller
    pub fn publish(&self, event: BookEvent) {
        let topic = event.topic();
        match self.event_tx.send(event) {
            Ok(receivers) => tracing::debug!(topic, receivers, "Published book event"),
            Err(_) => tracing::debug!(topic, "Published book event with no subscribers"),
        }
    }

    /// Subscribe to raw events
    pub fn subscribe(&self) -> broadcast::Receiver<BookEvent> {
        self.event_tx.subscribe()
    }

    /// Books added from now on, as a stream
    pub fn book_added_stream(&self) -> impl Stream<Item = BookRecord> + Send + use<> {
        BroadcastStream::new(self.subscribe()).filter_map(|result| match result {
            Ok(BookEvent::Added { book }) => Some(book),
            Err(err) => {
                tracing::warn!(error = %err, "Book subscriber lagged, events dropped");
                None
            }
        })
    }

    /// Number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        self.event_tx.receiver_count()
    }
}
