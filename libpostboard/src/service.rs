//! Presentation-facing facade
//!
//! `Postboard` bundles a [`Store`] with the [`Gateway`] that populates it and
//! exposes the commands, fetches and subscriptions a UI needs. Construct one
//! at startup and hand it (or clones of it) to the views; there is no global
//! instance.
//!
//! # Example
//!
//! ```no_run
//! use libpostboard::service::Postboard;
//! use libpostboard::store::NewPost;
//! use libpostboard::selectors::select_posts_newest_first;
//!
//! # async fn example() -> libpostboard::Result<()> {
//! let config = libpostboard::Config::load()?;
//! let board = Postboard::from_config(&config)?;
//!
//! board.fetch_users().await;
//! board.fetch_posts().await;
//! board.create_post(NewPost::new("Hello", "First!", "0"));
//!
//! let state = board.state();
//! for post in select_posts_newest_first(&state) {
//!     println!("{} ({})", post.title, post.date);
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::events::{EventBus, EventReceiver};
use crate::fetch::{self, FetchOutcome};
use crate::gateway::http::HttpGateway;
use crate::gateway::Gateway;
use crate::store::{AppState, NewPost, Store};
use crate::types::{PostId, ReactionKind};
use crate::Result;

#[derive(Clone)]
pub struct Postboard {
    store: Store,
    gateway: Arc<dyn Gateway>,
}

impl Postboard {
    /// Fresh, empty store backed by `gateway`
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self::with_store(Store::new(), gateway)
    }

    pub fn with_store(store: Store, gateway: Arc<dyn Gateway>) -> Self {
        Self { store, gateway }
    }

    /// HTTP-backed instance built from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let gateway = HttpGateway::new(&config.gateway)?;
        let store = Store::with_state(AppState::new(), EventBus::new(config.events.capacity));
        tracing::info!(base_url = %config.gateway.base_url, "Postboard initialised");
        Ok(Self::with_store(store, Arc::new(gateway)))
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn gateway(&self) -> &dyn Gateway {
        self.gateway.as_ref()
    }

    /// Current snapshot
    pub fn state(&self) -> AppState {
        self.store.snapshot()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.store.subscribe()
    }

    /// Receiver for store events (actions applied, fetch progress)
    pub fn events(&self) -> EventReceiver {
        self.store.events().subscribe()
    }

    pub fn create_post(&self, new_post: NewPost) -> PostId {
        self.store.create_post(new_post)
    }

    pub fn update_post(&self, id: &PostId, title: impl Into<String>, content: impl Into<String>) {
        self.store.update_post(id, title, content)
    }

    pub fn add_reaction(&self, post_id: &PostId, reaction: ReactionKind) {
        self.store.add_reaction(post_id, reaction)
    }

    /// Fetch posts and wait for the outcome
    ///
    /// Dropping the future stops waiting but not the fetch itself; the
    /// records are still appended when they arrive.
    pub async fn fetch_posts(&self) -> FetchOutcome {
        fetch::fetch_posts(&self.store, Arc::clone(&self.gateway)).await
    }

    /// Fetch users and wait for the outcome
    pub async fn fetch_users(&self) -> FetchOutcome {
        fetch::fetch_users(&self.store, Arc::clone(&self.gateway)).await
    }

    /// Run [`Postboard::fetch_posts`] on the tokio runtime
    ///
    /// Must be called from within a runtime.
    pub fn spawn_fetch_posts(&self) -> JoinHandle<FetchOutcome> {
        let board = self.clone();
        tokio::spawn(async move { board.fetch_posts().await })
    }

    /// Run [`Postboard::fetch_users`] on the tokio runtime
    ///
    /// Must be called from within a runtime.
    pub fn spawn_fetch_users(&self) -> JoinHandle<FetchOutcome> {
        let board = self.clone();
        tokio::spawn(async move { board.fetch_users().await })
    }
}

impl std::fmt::Debug for Postboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Postboard")
            .field("store", &self.store)
            .field("gateway", &self.gateway.name())
            .finish()
    }
}
