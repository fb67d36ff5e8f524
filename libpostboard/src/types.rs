//! Core types for Postboard

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Wire shapes accepted for an identifier.
///
/// The remote API is not consistent about id types: user ids in particular
/// arrive as small integers on some deployments.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Unsigned(u64),
    Signed(i64),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Text(s) => s,
            RawId::Unsigned(n) => n.to_string(),
            RawId::Signed(n) => n.to_string(),
        }
    }
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                RawId::deserialize(deserializer).map(|raw| Self(raw.into_string()))
            }
        }
    };
}

string_id!(
    /// Opaque post identifier, generated locally when a post is created
    PostId
);

string_id!(
    /// Opaque user identifier, always sourced from the remote API
    UserId
);

/// The fixed set of reactions a post can receive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReactionKind {
    ThumbsUp,
    Hooray,
    Heart,
    Rocket,
    Eyes,
}

impl ReactionKind {
    /// Every reaction kind, in display order
    pub const ALL: [ReactionKind; 5] = [
        ReactionKind::ThumbsUp,
        ReactionKind::Hooray,
        ReactionKind::Heart,
        ReactionKind::Rocket,
        ReactionKind::Eyes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ThumbsUp => "thumbsUp",
            Self::Hooray => "hooray",
            Self::Heart => "heart",
            Self::Rocket => "rocket",
            Self::Eyes => "eyes",
        }
    }
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReactionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "Invalid reaction: '{}'. Valid options: thumbsUp, hooray, heart, rocket, eyes",
                    s
                )
            })
    }
}

/// Reaction counters for a single post
///
/// Storage is sparse: a kind that was never reacted with has no entry and
/// reads as zero. Counters only ever grow.
///
/// Decoding is lenient so one odd record cannot fail a whole fetch: `null`
/// reads as no reactions, and unknown kinds or non-integer counts are
/// skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Reactions(BTreeMap<ReactionKind, u64>);

impl<'de> Deserialize<'de> for Reactions {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<BTreeMap<String, serde_json::Value>> = Option::deserialize(deserializer)?;

        Ok(raw
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(key, value)| {
                let kind = key.parse::<ReactionKind>().ok();
                let count = value.as_u64();
                if kind.is_none() || count.is_none() {
                    tracing::debug!(reaction = %key, %value, "Skipping unrecognised reaction entry");
                }
                Some((kind?, count?))
            })
            .collect())
    }
}

impl Reactions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current count for `kind`, zero when absent
    pub fn get(&self, kind: ReactionKind) -> u64 {
        self.0.get(&kind).copied().unwrap_or(0)
    }

    /// Add one reaction of `kind`, starting from zero if it was never set
    pub fn increment(&mut self, kind: ReactionKind) {
        let count = self.0.entry(kind).or_insert(0);
        *count = count.saturating_add(1);
    }

    /// Every kind with its count, including zeros, in display order
    pub fn iter_all(&self) -> impl Iterator<Item = (ReactionKind, u64)> + '_ {
        ReactionKind::ALL.into_iter().map(|kind| (kind, self.get(kind)))
    }

    pub fn total(&self) -> u64 {
        self.0.values().fold(0u64, |acc, n| acc.saturating_add(*n))
    }
}

impl FromIterator<(ReactionKind, u64)> for Reactions {
    fn from_iter<I: IntoIterator<Item = (ReactionKind, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A blog post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    /// ISO-8601 creation time; only used for ordering
    pub date: String,
    /// Author; a weak reference into the users collection
    pub user: UserId,
    #[serde(default)]
    pub reactions: Reactions,
}

impl Post {
    /// Parsed creation time, `None` if the stored date is not valid RFC 3339
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.date)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// First `max_chars` characters of the content
    pub fn excerpt(&self, max_chars: usize) -> &str {
        match self.content.char_indices().nth(max_chars) {
            Some((idx, _)) => &self.content[..idx],
            None => &self.content,
        }
    }
}

/// Format a timestamp the way post dates are stored
pub fn format_date(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// A user known to the remote API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
}
