//! Posts store: the post collection and its reducer

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::status::{LoadState, LoadStatus};
use crate::types::{format_date, Post, PostId, ReactionKind, Reactions, UserId};

/// Actions understood by the posts reducer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum PostsAction {
    /// A fully prepared post; see [`NewPost::prepare`]
    PostAdded(Post),
    PostUpdated {
        id: PostId,
        title: String,
        content: String,
    },
    ReactionAdded {
        post_id: PostId,
        reaction: ReactionKind,
    },
    FetchPending,
    FetchFulfilled(Vec<Post>),
    FetchRejected(String),
}

impl PostsAction {
    pub fn kind(&self) -> &'static str {
        match self {
            PostsAction::PostAdded(_) => "posts/postAdded",
            PostsAction::PostUpdated { .. } => "posts/postUpdated",
            PostsAction::ReactionAdded { .. } => "posts/reactionAdded",
            PostsAction::FetchPending => "posts/fetchPosts/pending",
            PostsAction::FetchFulfilled(_) => "posts/fetchPosts/fulfilled",
            PostsAction::FetchRejected(_) => "posts/fetchPosts/rejected",
        }
    }
}

/// Input for creating a post
///
/// Id and timestamp are assigned by [`NewPost::prepare`] when the command is
/// issued, so replaying the resulting action always yields the same state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub user: UserId,
    pub reactions: Reactions,
}

impl NewPost {
    pub fn new(title: impl Into<String>, content: impl Into<String>, user: impl Into<UserId>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            user: user.into(),
            reactions: Reactions::new(),
        }
    }

    pub fn with_reactions(mut self, reactions: Reactions) -> Self {
        self.reactions = reactions;
        self
    }

    /// Assign a fresh id and the current time
    pub fn prepare(self) -> PostsAction {
        PostsAction::PostAdded(self.into_post())
    }

    /// Assign an explicit id and creation time
    pub fn prepare_with(self, id: PostId, created_at: DateTime<Utc>) -> PostsAction {
        PostsAction::PostAdded(self.into_post_with(id, created_at))
    }

    pub fn into_post(self) -> Post {
        self.into_post_with(PostId::new(Uuid::new_v4().to_string()), Utc::now())
    }

    pub fn into_post_with(self, id: PostId, created_at: DateTime<Utc>) -> Post {
        Post {
            id,
            title: self.title,
            content: self.content,
            date: format_date(created_at),
            user: self.user,
            reactions: self.reactions,
        }
    }
}

/// Snapshot of the posts collection
///
/// Posts are kept in append order and shared between snapshots; a reducer
/// only allocates the entries it changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostsState {
    posts: Vec<Arc<Post>>,
    load: LoadState,
}

impl PostsState {
    /// Empty collection that has never been fetched
    pub fn new() -> Self {
        Self::default()
    }

    /// All posts in append order: local additions and fetched records
    /// interleaved as they arrived
    pub fn posts(&self) -> &[Arc<Post>] {
        &self.posts
    }

    /// First post with the given id
    ///
    /// Repeated fetches may store the same remote post more than once; the
    /// earliest copy wins.
    pub fn get(&self, id: &PostId) -> Option<&Arc<Post>> {
        self.posts.iter().find(|post| &post.id == id)
    }

    /// Number of posts held, duplicates included
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Current load status; `Loading` while any fetch is in flight
    pub fn status(&self) -> LoadStatus {
        self.load.status()
    }

    /// Message of the most recent failed fetch
    ///
    /// Kept after a later success; check [`PostsState::status`] to know
    /// whether it is still current.
    pub fn error(&self) -> Option<&str> {
        self.load.error()
    }

    /// Full fetch bookkeeping, including the in-flight count
    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    /// Compute the next state
    ///
    /// # Panics
    ///
    /// Panics if `PostAdded` carries an id that is already present. Generated
    /// ids are random; a duplicate means the id source is broken and the
    /// existing post must not be overwritten.
    pub fn reduce(&self, action: &PostsAction) -> Self {
        match action {
            PostsAction::PostAdded(post) => {
                if self.get(&post.id).is_some() {
                    tracing::error!(post_id = %post.id, "Post identifier collision");
                    panic!("identifier collision: post {} already exists", post.id);
                }
                let mut posts = self.posts.clone();
                posts.push(Arc::new(post.clone()));
                Self {
                    posts,
                    load: self.load.clone(),
                }
            }
            PostsAction::PostUpdated { id, title, content } => self.modify(id, |post| {
                post.title = title.clone();
                post.content = content.clone();
            }),
            PostsAction::ReactionAdded { post_id, reaction } => {
                self.modify(post_id, |post| post.reactions.increment(*reaction))
            }
            PostsAction::FetchPending => Self {
                posts: self.posts.clone(),
                load: self.load.begin(),
            },
            PostsAction::FetchFulfilled(records) => {
                let mut posts = self.posts.clone();
                posts.extend(records.iter().cloned().map(Arc::new));
                Self {
                    posts,
                    load: self.load.succeed(),
                }
            }
            PostsAction::FetchRejected(message) => Self {
                posts: self.posts.clone(),
                load: self.load.fail(message),
            },
        }
    }

    fn modify(&self, id: &PostId, edit: impl FnOnce(&mut Post)) -> Self {
        let Some(index) = self.posts.iter().position(|post| &post.id == id) else {
            tracing::debug!(post_id = %id, "Ignoring action for unknown post");
            return self.clone();
        };

        let mut updated = Post::clone(&self.posts[index]);
        edit(&mut updated);

        let mut posts = self.posts.clone();
        posts[index] = Arc::new(updated);
        Self {
            posts,
            load: self.load.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn added(id: &str, title: &str) -> PostsAction {
        let at = Utc.with_ymd_and_hms(2021, 6, 1, 12, 0, 0).unwrap();
        NewPost::new(title, "content", "0").prepare_with(PostId::from(id), at)
    }

    fn remote_post(id: &str) -> Post {
        Post {
            id: PostId::from(id),
            title: format!("Remote {}", id),
            content: "fetched".to_string(),
            date: "2020-01-01T00:00:00.000Z".to_string(),
            user: UserId::from("1"),
            reactions: Reactions::new(),
        }
    }

    #[test]
    fn test_prepare_assigns_unique_ids_and_iso_date() {
        let first = NewPost::new("A", "b", "1").prepare();
        let second = NewPost::new("A", "b", "1").prepare();

        match (first, second) {
            (PostsAction::PostAdded(a), PostsAction::PostAdded(b)) => {
                assert_ne!(a.id, b.id);
                assert!(a.timestamp().is_some());
                assert!(a.date.ends_with('Z'));
            }
            _ => panic!("prepare must produce PostAdded"),
        }
    }

    #[test]
    fn test_post_added_appends_exactly_one() {
        let state = PostsState::new().reduce(&added("p1", "First"));
        assert_eq!(state.len(), 1);

        let state = state.reduce(&added("p2", "Second"));
        assert_eq!(state.len(), 2);
        assert_eq!(state.posts()[0].title, "First");
        assert_eq!(state.posts()[1].title, "Second");
    }

    #[test]
    fn test_post_added_keeps_supplied_reactions() {
        let reactions: Reactions = [(ReactionKind::Hooray, 3)].into_iter().collect();
        let action = NewPost::new("A", "b", "1").with_reactions(reactions).prepare();
        let state = PostsState::new().reduce(&action);
        assert_eq!(state.posts()[0].reactions.get(ReactionKind::Hooray), 3);
        assert_eq!(state.posts()[0].reactions.get(ReactionKind::Heart), 0);
    }

    #[test]
    #[should_panic(expected = "identifier collision")]
    fn test_post_added_collision_panics() {
        let state = PostsState::new().reduce(&added("p1", "First"));
        let _ = state.reduce(&added("p1", "Duplicate"));
    }

    #[test]
    fn test_post_updated_changes_only_title_and_content() {
        let state = PostsState::new()
            .reduce(&added("p1", "First"))
            .reduce(&PostsAction::ReactionAdded {
                post_id: PostId::from("p1"),
                reaction: ReactionKind::Eyes,
            });
        let before = Post::clone(&state.posts()[0]);

        let state = state.reduce(&PostsAction::PostUpdated {
            id: PostId::from("p1"),
            title: "Edited".to_string(),
            content: "New body".to_string(),
        });
        let after = &state.posts()[0];

        assert_eq!(after.title, "Edited");
        assert_eq!(after.content, "New body");
        assert_eq!(after.id, before.id);
        assert_eq!(after.date, before.date);
        assert_eq!(after.user, before.user);
        assert_eq!(after.reactions, before.reactions);
    }

    #[test]
    fn test_post_updated_unknown_id_is_noop() {
        let state = PostsState::new().reduce(&added("p1", "First"));
        let next = state.reduce(&PostsAction::PostUpdated {
            id: PostId::from("missing"),
            title: "x".to_string(),
            content: "y".to_string(),
        });
        assert_eq!(next, state);
    }

    #[test]
    fn test_reaction_added_n_times() {
        let mut state = PostsState::new().reduce(&added("p1", "First"));
        for _ in 0..5 {
            state = state.reduce(&PostsAction::ReactionAdded {
                post_id: PostId::from("p1"),
                reaction: ReactionKind::Rocket,
            });
        }
        assert_eq!(state.posts()[0].reactions.get(ReactionKind::Rocket), 5);
        assert_eq!(state.posts()[0].reactions.get(ReactionKind::Heart), 0);
    }

    #[test]
    fn test_reaction_added_unknown_id_is_noop() {
        let state = PostsState::new().reduce(&added("p1", "First"));
        let next = state.reduce(&PostsAction::ReactionAdded {
            post_id: PostId::from("nope"),
            reaction: ReactionKind::Heart,
        });
        assert_eq!(next, state);
    }

    #[test]
    fn test_reduce_leaves_prior_snapshot_untouched() {
        let before = PostsState::new().reduce(&added("p1", "First"));
        let after = before.reduce(&PostsAction::ReactionAdded {
            post_id: PostId::from("p1"),
            reaction: ReactionKind::Heart,
        });

        assert_eq!(before.posts()[0].reactions.get(ReactionKind::Heart), 0);
        assert_eq!(after.posts()[0].reactions.get(ReactionKind::Heart), 1);
    }

    #[test]
    fn test_untouched_posts_are_shared_between_snapshots() {
        let before = PostsState::new()
            .reduce(&added("p1", "First"))
            .reduce(&added("p2", "Second"));
        let after = before.reduce(&PostsAction::PostUpdated {
            id: PostId::from("p2"),
            title: "Edited".to_string(),
            content: "c".to_string(),
        });

        assert!(Arc::ptr_eq(&before.posts()[0], &after.posts()[0]));
        assert!(!Arc::ptr_eq(&before.posts()[1], &after.posts()[1]));
    }

    #[test]
    fn test_fetch_fulfilled_appends_after_existing() {
        let local = PostsState::new().reduce(&added("local", "Mine"));
        let state = local
            .reduce(&PostsAction::FetchPending)
            .reduce(&PostsAction::FetchFulfilled(vec![remote_post("r1"), remote_post("r2")]));

        let ids: Vec<&str> = state.posts().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["local", "r1", "r2"]);
        assert_eq!(state.status(), LoadStatus::Succeeded);
    }

    #[test]
    fn test_fetch_fulfilled_twice_keeps_duplicates() {
        let state = PostsState::new()
            .reduce(&PostsAction::FetchPending)
            .reduce(&PostsAction::FetchPending)
            .reduce(&PostsAction::FetchFulfilled(vec![remote_post("r1")]))
            .reduce(&PostsAction::FetchFulfilled(vec![remote_post("r1")]));

        assert_eq!(state.len(), 2);
        assert_eq!(state.status(), LoadStatus::Succeeded);
    }

    #[test]
    fn test_fetch_pending_leaves_posts_and_error() {
        let failed = PostsState::new()
            .reduce(&PostsAction::FetchPending)
            .reduce(&PostsAction::FetchRejected("offline".to_string()));
        let pending = failed.reduce(&PostsAction::FetchPending);

        assert_eq!(pending.status(), LoadStatus::Loading);
        assert_eq!(pending.error(), Some("offline"));
        assert_eq!(pending.posts(), failed.posts());
    }

    #[test]
    fn test_fetch_rejected_records_error() {
        let before = PostsState::new().reduce(&added("p1", "First"));
        let state = before
            .reduce(&PostsAction::FetchPending)
            .reduce(&PostsAction::FetchRejected("Network Error".to_string()));

        assert_eq!(state.status(), LoadStatus::Failed);
        assert_eq!(state.error(), Some("Network Error"));
        assert_eq!(state.posts(), before.posts());
    }

    #[test]
    fn test_action_kinds() {
        assert_eq!(PostsAction::FetchPending.kind(), "posts/fetchPosts/pending");
        assert_eq!(added("p", "t").kind(), "posts/postAdded");
        assert_eq!(
            PostsAction::FetchRejected(String::new()).kind(),
            "posts/fetchPosts/rejected"
        );
    }

    #[test]
    fn test_action_serializes_as_tagged_record() {
        let action = PostsAction::ReactionAdded {
            post_id: PostId::from("p1"),
            reaction: ReactionKind::Heart,
        };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["type"], "reactionAdded");
        assert_eq!(json["payload"]["post_id"], "p1");
        assert_eq!(json["payload"]["reaction"], "heart");

        let back: PostsAction = serde_json::from_value(json).unwrap();
        assert_eq!(back, action);
    }
}
