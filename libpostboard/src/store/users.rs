//! Users store
//!
//! Users are read-only locally. The only transitions come from the fetch
//! lifecycle, and a successful fetch replaces the whole collection.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::status::{LoadState, LoadStatus};
use crate::types::{User, UserId};

/// Actions understood by the users reducer
///
/// All of them come from the fetch lifecycle; there are no local user edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum UsersAction {
    FetchPending,
    FetchFulfilled(Vec<User>),
    FetchRejected(String),
}

impl UsersAction {
    /// Stable name of the action, used in logs and [`crate::events::StoreEvent`]
    pub fn kind(&self) -> &'static str {
        match self {
            UsersAction::FetchPending => "users/fetchUsers/pending",
            UsersAction::FetchFulfilled(_) => "users/fetchUsers/fulfilled",
            UsersAction::FetchRejected(_) => "users/fetchUsers/rejected",
        }
    }
}

/// Snapshot of the users collection
///
/// Users are kept in the order the API returned them. Like posts, entries
/// are reference counted so unchanged users are shared between snapshots.
///
/// # Example
///
/// ```
/// use libpostboard::store::{UsersAction, UsersState};
/// use libpostboard::{LoadStatus, User, UserId};
///
/// let state = UsersState::new()
///     .reduce(&UsersAction::FetchPending)
///     .reduce(&UsersAction::FetchFulfilled(vec![User {
///         id: UserId::from("0"),
///         name: "Tianna Jenkins".to_string(),
///     }]));
///
/// assert_eq!(state.status(), LoadStatus::Succeeded);
/// assert_eq!(state.get(&UserId::from(0u64)).unwrap().name, "Tianna Jenkins");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsersState {
    users: Vec<Arc<User>>,
    load: LoadState,
}

impl UsersState {
    /// Empty collection that has never been fetched
    pub fn new() -> Self {
        Self::default()
    }

    /// All users in fetch order
    pub fn users(&self) -> &[Arc<User>] {
        &self.users
    }

    /// User with the given id, if it is known
    ///
    /// # Arguments
    ///
    /// * `id` - Identifier as received from the API; numeric ids compare by
    ///   their decimal form
    pub fn get(&self, id: &UserId) -> Option<&Arc<User>> {
        self.users.iter().find(|user| &user.id == id)
    }

    /// Number of users held
    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Current load status; `Loading` while any fetch is in flight
    pub fn status(&self) -> LoadStatus {
        self.load.status()
    }

    /// Message of the most recent failed fetch
    pub fn error(&self) -> Option<&str> {
        self.load.error()
    }

    /// Full fetch bookkeeping, including the in-flight count
    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    /// Compute the next state
    ///
    /// A fulfilled fetch replaces the whole collection; a rejected one keeps
    /// the users already held.
    pub fn reduce(&self, action: &UsersAction) -> Self {
        match action {
            UsersAction::FetchPending => Self {
                users: self.users.clone(),
                load: self.load.begin(),
            },
            UsersAction::FetchFulfilled(records) => Self {
                users: records.iter().cloned().map(Arc::new).collect(),
                load: self.load.succeed(),
            },
            UsersAction::FetchRejected(message) => Self {
                users: self.users.clone(),
                load: self.load.fail(message),
            },
        }
    }
}
