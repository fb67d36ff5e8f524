//! Asynchronous population of the store from a [`Gateway`]
//!
//! A fetch is a single future. [`FetchTask`] ties its lifecycle actions
//! together: `begin` dispatches the pending action, and `settle` dispatches
//! exactly one fulfilled or rejected action.
//!
//! Fetches cannot be cancelled. The gateway call and the settlement run on a
//! spawned tokio task, so dropping the future returned by [`fetch_posts`] or
//! [`fetch_users`] only stops waiting: the request still completes and its
//! lifecycle actions are still applied. If the spawned task dies before
//! settling (a panicking gateway, a runtime shutting down), the drop guard on
//! [`FetchTask`] records a rejection so the collection never stays `Loading`.
//!
//! Overlapping fetches of the same resource are not coalesced. Each one
//! settles independently; for posts this appends the records once per fetch.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::GatewayError;
use crate::events::StoreEvent;
use crate::gateway::{decode_records, Gateway, Resource};
use crate::store::{Action, PostsAction, Store, UsersAction};

/// Message recorded when a fetch task ends without settling
pub const INTERRUPTED_MESSAGE: &str = "fetch task ended before completion";

/// How a fetch ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FetchOutcome {
    Fulfilled { records: usize },
    Rejected { message: String },
}

impl FetchOutcome {
    pub fn is_fulfilled(&self) -> bool {
        matches!(self, FetchOutcome::Fulfilled { .. })
    }
}

/// An in-flight fetch of one resource
///
/// Settles exactly once. A task dropped without settling rejects itself
/// with [`INTERRUPTED_MESSAGE`].
pub struct FetchTask {
    store: Store,
    resource: Resource,
    settled: bool,
}

impl FetchTask {
    /// Mark `resource` as loading in `store`
    pub fn begin(store: &Store, resource: Resource) -> Self {
        tracing::debug!(%resource, "Fetch started");
        store.dispatch(pending_action(resource));
        store.events().emit(StoreEvent::FetchStarted { resource });

        Self {
            store: store.clone(),
            resource,
            settled: false,
        }
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    /// Apply the gateway's answer to the store
    pub fn settle(mut self, result: Result<Vec<serde_json::Value>, GatewayError>) -> FetchOutcome {
        self.settled = true;
        let resource = self.resource;

        match result.and_then(|records| fulfilled_action(resource, records)) {
            Ok((records, action)) => {
                tracing::info!(%resource, records, "Fetch succeeded");
                self.store.dispatch(action);
                self.store
                    .events()
                    .emit(StoreEvent::FetchSucceeded { resource, records });
                FetchOutcome::Fulfilled { records }
            }
            Err(err) => {
                let message = err.to_string();
                self.reject(&message);
                FetchOutcome::Rejected { message }
            }
        }
    }

    fn reject(&self, message: &str) {
        tracing::warn!(resource = %self.resource, error = message, "Fetch failed");
        self.store.dispatch(rejected_action(self.resource, message));
        self.store.events().emit(StoreEvent::FetchFailed {
            resource: self.resource,
            error: message.to_string(),
        });
    }
}

impl Drop for FetchTask {
    fn drop(&mut self) {
        if !self.settled {
            self.reject(INTERRUPTED_MESSAGE);
        }
    }
}

fn pending_action(resource: Resource) -> Action {
    match resource {
        Resource::Posts => PostsAction::FetchPending.into(),
        Resource::Users => UsersAction::FetchPending.into(),
    }
}

fn rejected_action(resource: Resource, message: &str) -> Action {
    match resource {
        Resource::Posts => PostsAction::FetchRejected(message.to_string()).into(),
        Resource::Users => UsersAction::FetchRejected(message.to_string()).into(),
    }
}

fn fulfilled_action(
    resource: Resource,
    records: Vec<serde_json::Value>,
) -> Result<(usize, Action), GatewayError> {
    Ok(match resource {
        Resource::Posts => {
            let posts = decode_records(resource, records)?;
            (posts.len(), PostsAction::FetchFulfilled(posts).into())
        }
        Resource::Users => {
            let users = decode_records(resource, records)?;
            (users.len(), UsersAction::FetchFulfilled(users).into())
        }
    })
}

async fn run(store: &Store, gateway: Arc<dyn Gateway>, resource: Resource) -> FetchOutcome {
    let task = FetchTask::begin(store, resource);
    tracing::debug!(gateway = gateway.name(), %resource, "Awaiting gateway");

    let handle = tokio::spawn(async move {
        let result = gateway.fetch(resource).await;
        task.settle(result)
    });

    match handle.await {
        Ok(outcome) => outcome,
        Err(err) => {
            tracing::error!(%resource, error = %err, "Fetch task did not complete");
            FetchOutcome::Rejected {
                message: INTERRUPTED_MESSAGE.to_string(),
            }
        }
    }
}

/// Load posts and append them to the collection
///
/// Must be called from within a tokio runtime. Dropping the returned future
/// does not cancel the fetch.
pub async fn fetch_posts(store: &Store, gateway: Arc<dyn Gateway>) -> FetchOutcome {
    run(store, gateway, Resource::Posts).await
}

/// Load users and replace the collection
///
/// Must be called from within a tokio runtime. Dropping the returned future
/// does not cancel the fetch.
pub async fn fetch_users(store: &Store, gateway: Arc<dyn Gateway>) -> FetchOutcome {
    run(store, gateway, Resource::Users).await
}
