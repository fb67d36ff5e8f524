//! Mock gateway implementation for testing
//!
//! Serves canned records per resource and can simulate failures and network
//! latency, so the fetch lifecycle can be exercised without a server.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tokio::time::sleep;

use super::{Gateway, Resource};
use crate::error::GatewayError;
use crate::types::{Post, User};

/// Configuration for mock gateway behavior
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub name: String,

    /// Records returned per resource; a missing resource yields an empty array
    pub records: HashMap<Resource, Vec<serde_json::Value>>,

    /// When set, every fetch fails with this network error
    pub failure: Option<String>,

    /// Delay before answering (simulates network latency)
    pub delay: Duration,

    /// Number of fetches served, shared between clones
    pub fetch_count: Arc<AtomicUsize>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            name: "mock".to_string(),
            records: HashMap::new(),
            failure: None,
            delay: Duration::from_millis(0),
            fetch_count: Arc::new(AtomicUsize::new(0)),
        }
    }
}

pub struct MockGateway {
    config: MockConfig,
}

impl MockGateway {
    pub fn new(config: MockConfig) -> Self {
        Self { config }
    }

    /// Gateway with no records for any resource
    pub fn empty() -> Self {
        Self::new(MockConfig::default())
    }

    /// Gateway serving the given posts and users
    pub fn with_data(posts: &[Post], users: &[User]) -> Self {
        Self::empty()
            .with_records(Resource::Posts, posts)
            .with_records(Resource::Users, users)
    }

    /// Gateway whose every fetch fails with `error`
    pub fn failing(error: &str) -> Self {
        Self::new(MockConfig {
            failure: Some(error.to_string()),
            ..Default::default()
        })
    }

    /// Serve `records` for `resource`
    ///
    /// # Panics
    ///
    /// Panics if a record cannot be converted to JSON, which only happens for
    /// types with non-string map keys.
    pub fn with_records<T: Serialize>(mut self, resource: Resource, records: &[T]) -> Self {
        let values = records
            .iter()
            .map(|record| serde_json::to_value(record).expect("mock record must serialize"))
            .collect();
        self.config.records.insert(resource, values);
        self
    }

    /// Serve raw JSON values for `resource`, e.g. to simulate malformed data
    pub fn with_raw_records(mut self, resource: Resource, records: Vec<serde_json::Value>) -> Self {
        self.config.records.insert(resource, records);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.config.delay = delay;
        self
    }

    /// Number of fetches served so far
    pub fn fetch_count(&self) -> usize {
        self.config.fetch_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Gateway for MockGateway {
    async fn fetch(&self, resource: Resource) -> Result<Vec<serde_json::Value>, GatewayError> {
        self.config.fetch_count.fetch_add(1, Ordering::SeqCst);

        if !self.config.delay.is_zero() {
            sleep(self.config.delay).await;
        }

        if let Some(error) = &self.config.failure {
            return Err(GatewayError::Network(error.clone()));
        }

        Ok(self.config.records.get(&resource).cloned().unwrap_or_default())
    }

    fn name(&self) -> &str {
        &self.config.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UserId;

    #[tokio::test]
    async fn test_mock_serves_records() {
        let users = vec![User {
            id: UserId::from("0"),
            name: "Tianna".to_string(),
        }];
        let gateway = MockGateway::with_data(&[], &users);

        let records = gateway.fetch(Resource::Users).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["name"], "Tianna");

        let posts = gateway.fetch(Resource::Posts).await.unwrap();
        assert!(posts.is_empty());
        assert_eq!(gateway.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let gateway = MockGateway::failing("Network Error");

        let err = gateway.fetch(Resource::Posts).await.unwrap_err();
        assert!(err.to_string().contains("Network Error"));
        assert_eq!(gateway.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_with_delay() {
        let gateway = MockGateway::empty().with_delay(Duration::from_millis(50));

        let start = std::time::Instant::now();
        gateway.fetch(Resource::Users).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn test_mock_name() {
        assert_eq!(MockGateway::empty().name(), "mock");
    }
}
