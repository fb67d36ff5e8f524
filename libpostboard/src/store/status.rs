//! Load status tracking shared by the posts and users stores

use serde::{Deserialize, Serialize};

/// Externally visible load status of an entity collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

impl std::fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadStatus::Idle => write!(f, "idle"),
            LoadStatus::Loading => write!(f, "loading"),
            LoadStatus::Succeeded => write!(f, "succeeded"),
            LoadStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Fetch bookkeeping for one collection
///
/// `Loading` is never stored. It is derived from the number of fetches
/// currently in flight, so overlapping fetches keep the collection loading
/// until the last one settles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadState {
    in_flight: u32,
    last: LoadStatus,
    error: Option<String>,
}

impl LoadState {
    pub fn status(&self) -> LoadStatus {
        if self.in_flight > 0 {
            LoadStatus::Loading
        } else {
            self.last
        }
    }

    /// Message recorded by the most recent failed fetch
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn in_flight(&self) -> u32 {
        self.in_flight
    }

    pub(crate) fn begin(&self) -> Self {
        Self {
            in_flight: self.in_flight.saturating_add(1),
            ..self.clone()
        }
    }

    pub(crate) fn succeed(&self) -> Self {
        Self {
            in_flight: self.in_flight.saturating_sub(1),
            last: LoadStatus::Succeeded,
            error: self.error.clone(),
        }
    }

    pub(crate) fn fail(&self, message: &str) -> Self {
        Self {
            in_flight: self.in_flight.saturating_sub(1),
            last: LoadStatus::Failed,
            error: Some(message.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_idle() {
        let state = LoadState::default();
        assert_eq!(state.status(), LoadStatus::Idle);
        assert_eq!(state.error(), None);
        assert_eq!(state.in_flight(), 0);
    }

    #[test]
    fn test_begin_then_succeed() {
        let loading = LoadState::default().begin();
        assert_eq!(loading.status(), LoadStatus::Loading);

        let done = loading.succeed();
        assert_eq!(done.status(), LoadStatus::Succeeded);
        assert_eq!(done.in_flight(), 0);
    }

    #[test]
    fn test_begin_then_fail_records_message() {
        let failed = LoadState::default().begin().fail("timeout");
        assert_eq!(failed.status(), LoadStatus::Failed);
        assert_eq!(failed.error(), Some("timeout"));
    }

    #[test]
    fn test_overlapping_fetches_stay_loading_until_last_settles() {
        let state = LoadState::default().begin().begin();
        let first_done = state.succeed();
        assert_eq!(first_done.status(), LoadStatus::Loading);

        let second_done = first_done.fail("boom");
        assert_eq!(second_done.status(), LoadStatus::Failed);
    }

    #[test]
    fn test_settle_without_begin_does_not_underflow() {
        let state = LoadState::default().succeed();
        assert_eq!(state.in_flight(), 0);
        assert_eq!(state.status(), LoadStatus::Succeeded);
    }

    #[test]
    fn test_load_status_display() {
        assert_eq!(LoadStatus::Idle.to_string(), "idle");
        assert_eq!(LoadStatus::Loading.to_string(), "loading");
        assert_eq!(LoadStatus::Succeeded.to_string(), "succeeded");
        assert_eq!(LoadStatus::Failed.to_string(), "failed");
    }
}
