//! Remote data gateway
//!
//! The store never talks to the network itself. It asks a [`Gateway`] for the
//! raw records of a [`Resource`] and decodes them into entity types. Anything
//! beyond "return an array of records or fail" (retries, paging, auth) belongs
//! to the gateway implementation.
//!
//! # Examples
//!
//! ```no_run
//! use libpostboard::config::GatewayConfig;
//! use libpostboard::gateway::{http::HttpGateway, Gateway, Resource};
//!
//! # async fn example() -> libpostboard::Result<()> {
//! let gateway = HttpGateway::new(&GatewayConfig::default())?;
//! let records = gateway.fetch(Resource::Posts).await?;
//! println!("{} returned {} posts", gateway.name(), records.len());
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

pub mod http;

// Available outside tests so integration tests and demos can use it
pub mod mock;

/// Collections the remote API serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Posts,
    Users,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Posts => "posts",
            Resource::Users => "users",
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[async_trait]
pub trait Gateway: Send + Sync {
    /// Fetch every record of `resource`
    ///
    /// # Errors
    ///
    /// - `GatewayError::Network` if the request could not be completed
    /// - `GatewayError::Status` if the server answered with a non-success status
    /// - `GatewayError::Decode` if the body is not an array of records
    async fn fetch(&self, resource: Resource) -> Result<Vec<serde_json::Value>, GatewayError>;

    /// Short identifier used in logs (e.g. "http", "mock")
    fn name(&self) -> &str;
}

/// Decode raw records into entities, failing on the first malformed record
pub fn decode_records<T: DeserializeOwned>(
    resource: Resource,
    records: Vec<serde_json::Value>,
) -> Result<Vec<T>, GatewayError> {
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            serde_json::from_value(record).map_err(|e| {
                GatewayError::Decode(format!("{} record {}: {}", resource, index, e))
            })
        })
        .collect()
}
