//! Postboard - application state for a small blog client
//!
//! This library holds the posts and users of a blog-like app in an explicit,
//! snapshot-based store. Posts can be created, edited and reacted to locally;
//! both collections can be populated from a remote API. Views read the state
//! through the functions in [`selectors`].

pub mod config;
pub mod error;
pub mod events;
pub mod fetch;
pub mod gateway;
pub mod logging;
pub mod selectors;
pub mod service;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use error::{PostboardError, Result};
pub use fetch::FetchOutcome;
pub use service::Postboard;
pub use store::{Action, AppState, LoadStatus, NewPost, Store};
pub use types::{Post, PostId, ReactionKind, Reactions, User, UserId};
