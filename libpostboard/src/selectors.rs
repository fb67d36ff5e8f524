//! Read-only queries over [`AppState`]
//!
//! Selectors are the only way the presentation layer should look into the
//! state. They never mutate, and keeping them here means a change to the
//! state layout only touches this module.

use std::sync::Arc;

use crate::store::{AppState, LoadStatus};
use crate::types::{Post, PostId, User, UserId};

/// All posts in stored (append) order
pub fn select_all_posts(state: &AppState) -> &[Arc<Post>] {
    state.posts.posts()
}

/// Look up a single post
///
/// # Arguments
///
/// * `state` - Snapshot to read from
/// * `id` - Post identifier; when the id is stored more than once the first
///   copy is returned
///
/// # Example
///
/// ```
/// use libpostboard::selectors::select_post_by_id;
/// use libpostboard::{NewPost, Store};
///
/// let store = Store::new();
/// let id = store.create_post(NewPost::new("Title", "Body", "0"));
///
/// let state = store.snapshot();
/// assert_eq!(select_post_by_id(&state, &id).unwrap().title, "Title");
/// ```
pub fn select_post_by_id<'a>(state: &'a AppState, id: &PostId) -> Option<&'a Arc<Post>> {
    state.posts.get(id)
}

/// All users in fetch order
pub fn select_all_users(state: &AppState) -> &[Arc<User>] {
    state.users.users()
}

/// Look up a single user
///
/// # Arguments
///
/// * `state` - Snapshot to read from
/// * `id` - User identifier, usually taken from [`Post::user`]
pub fn select_user_by_id<'a>(state: &'a AppState, id: &UserId) -> Option<&'a Arc<User>> {
    state.users.get(id)
}

/// Posts written by `user_id`, in stored order
pub fn select_posts_by_user<'a>(state: &'a AppState, user_id: &UserId) -> Vec<&'a Arc<Post>> {
    state
        .posts
        .posts()
        .iter()
        .filter(|post| &post.user == user_id)
        .collect()
}

/// Posts ordered newest first
///
/// Compares the stored ISO-8601 dates as strings, which matches
/// chronological order for well-formed timestamps. Equal dates keep their
/// stored order.
pub fn select_posts_newest_first(state: &AppState) -> Vec<&Arc<Post>> {
    let mut posts: Vec<&Arc<Post>> = state.posts.posts().iter().collect();
    posts.sort_by(|a, b| b.date.cmp(&a.date));
    posts
}

/// Author of a post, if both the post and its user are known
pub fn select_post_author<'a>(state: &'a AppState, post_id: &PostId) -> Option<&'a Arc<User>> {
    select_post_by_id(state, post_id).and_then(|post| state.users.get(&post.user))
}

/// Load status of the posts collection
pub fn select_posts_status(state: &AppState) -> LoadStatus {
    state.posts.status()
}

/// Message of the most recent failed posts fetch
pub fn select_posts_error(state: &AppState) -> Option<&str> {
    state.posts.error()
}

/// Load status of the users collection
pub fn select_users_status(state: &AppState) -> LoadStatus {
    state.users.status()
}
