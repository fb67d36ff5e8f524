//! Store event notifications
//!
//! State changes are published through the store's watch channel; this bus
//! carries a log of *what happened* (actions applied, fetches started and
//! settled) for consumers such as activity panels or tracing sinks.
//!
//! The bus uses `tokio::sync::broadcast`, so any number of subscribers can
//! listen. Emitting never blocks: with no subscribers the event is dropped,
//! and a lagging subscriber loses the oldest events first.
//!
//! # Example
//!
//! ```no_run
//! use libpostboard::events::{EventBus, StoreEvent};
//! use libpostboard::gateway::Resource;
//!
//! # async fn example() {
//! let bus = EventBus::new(100);
//! let mut receiver = bus.subscribe();
//!
//! bus.emit(StoreEvent::FetchStarted {
//!     resource: Resource::Posts,
//! });
//!
//! if let Ok(event) = receiver.recv().await {
//!     println!("Received: {:?}", event);
//! }
//! # }
//! ```

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::gateway::Resource;

pub type EventReceiver = broadcast::Receiver<StoreEvent>;

#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<StoreEvent>,
}

impl EventBus {
    /// Create a bus buffering up to `capacity` events per subscriber
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> EventReceiver {
        self.sender.subscribe()
    }

    pub fn emit(&self, event: StoreEvent) {
        // Err only means nobody is listening
        let _ = self.sender.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreEvent {
    /// An action changed the state
    ActionApplied {
        /// Action kind, e.g. `posts/reactionAdded`
        kind: String,
    },

    FetchStarted {
        resource: Resource,
    },

    FetchSucceeded {
        resource: Resource,
        /// Number of records received
        records: usize,
    },

    FetchFailed {
        resource: Resource,
        error: String,
    },
}
