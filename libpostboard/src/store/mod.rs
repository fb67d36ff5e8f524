//! Application state container
//!
//! # Architecture
//!
//! ```text
//! command ──► Action ──► AppState::reduce ──► new AppState ──► watch subscribers
//!                                                  └──────────► EventBus
//! ```
//!
//! [`AppState`] is an immutable snapshot. Reducers are pure functions from a
//! snapshot and an [`Action`] to the next snapshot, and share every entity they
//! do not touch with the previous one, so readers holding an older snapshot
//! are never affected by later dispatches.
//!
//! [`Store`] owns the current snapshot inside a `tokio::sync::watch` channel.
//! Dispatch runs the reducer while holding the channel's write lock, which
//! serialises transitions: no two reducers ever interleave. Stores are plain
//! values; create as many as needed.
//!
//! # Example
//!
//! ```
//! use libpostboard::store::{NewPost, Store};
//! use libpostboard::types::ReactionKind;
//!
//! let store = Store::new();
//! let id = store.create_post(NewPost::new("Hello", "First post", "0"));
//! store.add_reaction(&id, ReactionKind::Heart);
//!
//! let state = store.snapshot();
//! assert_eq!(state.posts.get(&id).unwrap().reactions.get(ReactionKind::Heart), 1);
//! ```

pub mod posts;
pub mod status;
pub mod users;

pub use posts::{NewPost, PostsAction, PostsState};
pub use status::{LoadState, LoadStatus};
pub use users::{UsersAction, UsersState};

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::events::{EventBus, StoreEvent};
use crate::types::{PostId, ReactionKind};

/// Default number of buffered events per subscriber
pub const DEFAULT_EVENT_CAPACITY: usize = 100;

/// Root state: one slice per entity collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub posts: PostsState,
    pub users: UsersState,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route the action to the slice that owns it
    pub fn reduce(&self, action: &Action) -> Self {
        match action {
            Action::Posts(action) => Self {
                posts: self.posts.reduce(action),
                users: self.users.clone(),
            },
            Action::Users(action) => Self {
                posts: self.posts.clone(),
                users: self.users.reduce(action),
            },
        }
    }
}

/// Every state transition the store accepts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "slice", content = "action", rename_all = "lowercase")]
pub enum Action {
    Posts(PostsAction),
    Users(UsersAction),
}

impl Action {
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Posts(action) => action.kind(),
            Action::Users(action) => action.kind(),
        }
    }
}

impl From<PostsAction> for Action {
    fn from(action: PostsAction) -> Self {
        Action::Posts(action)
    }
}

impl From<UsersAction> for Action {
    fn from(action: UsersAction) -> Self {
        Action::Users(action)
    }
}

/// Shared handle to one application state
///
/// Cloning the handle does not copy the state; all clones dispatch into and
/// read from the same container.
#[derive(Clone)]
pub struct Store {
    state: Arc<watch::Sender<AppState>>,
    events: EventBus,
}

impl Store {
    /// Create a store with empty collections and idle status
    pub fn new() -> Self {
        Self::with_state(AppState::new(), EventBus::new(DEFAULT_EVENT_CAPACITY))
    }

    pub fn with_state(initial: AppState, events: EventBus) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            state: Arc::new(sender),
            events,
        }
    }

    /// Apply an action
    ///
    /// Subscribers are notified only when the state actually changed, so
    /// actions aimed at unknown posts are invisible to them.
    pub fn dispatch(&self, action: impl Into<Action>) {
        let action = action.into();
        let kind = action.kind();
        tracing::debug!(action = kind, "Dispatching action");

        let changed = self.state.send_if_modified(|state| {
            let next = state.reduce(&action);
            if next == *state {
                false
            } else {
                *state = next;
                true
            }
        });

        if changed {
            self.events.emit(StoreEvent::ActionApplied {
                kind: kind.to_string(),
            });
        } else {
            tracing::debug!(action = kind, "Action left state unchanged");
        }
    }

    /// Clone of the current snapshot
    pub fn snapshot(&self) -> AppState {
        self.state.borrow().clone()
    }

    /// Run a read-only query against the current snapshot without cloning it
    ///
    /// The store is locked for reading while `query` runs; do not dispatch
    /// from inside it.
    pub fn read<R>(&self, query: impl FnOnce(&AppState) -> R) -> R {
        let state = self.state.borrow();
        query(&*state)
    }

    /// Receiver that observes every committed snapshot
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.state.subscribe()
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Prepare and dispatch a new post, returning its generated id
    pub fn create_post(&self, new_post: NewPost) -> PostId {
        let post = new_post.into_post();
        let id = post.id.clone();
        self.dispatch(PostsAction::PostAdded(post));
        id
    }

    /// Replace title and content of an existing post; unknown ids are ignored
    pub fn update_post(&self, id: &PostId, title: impl Into<String>, content: impl Into<String>) {
        self.dispatch(PostsAction::PostUpdated {
            id: id.clone(),
            title: title.into(),
            content: content.into(),
        });
    }

    /// Count one reaction on a post; unknown ids are ignored
    pub fn add_reaction(&self, post_id: &PostId, reaction: ReactionKind) {
        self.dispatch(PostsAction::ReactionAdded {
            post_id: post_id.clone(),
            reaction,
        });
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &*self.state.borrow())
            .field("events", &self.events)
            .finish()
    }
}
