//! HTTP gateway backed by reqwest

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::{Gateway, Resource};
use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result};

/// Fetches records with `GET {base_url}{path}` and expects a JSON array
pub struct HttpGateway {
    client: Client,
    base_url: String,
    posts_path: String,
    users_path: String,
}

impl HttpGateway {
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(GatewayError::from)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            posts_path: config.posts_path.clone(),
            users_path: config.users_path.clone(),
        })
    }

    pub fn endpoint(&self, resource: Resource) -> String {
        let path = match resource {
            Resource::Posts => &self.posts_path,
            Resource::Users => &self.users_path,
        };
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn fetch(&self, resource: Resource) -> std::result::Result<Vec<serde_json::Value>, GatewayError> {
        let url = self.endpoint(resource);
        tracing::debug!(%url, %resource, "Requesting records");

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status {
                resource: resource.to_string(),
                status: status.as_u16(),
            });
        }

        match response.json::<serde_json::Value>().await? {
            serde_json::Value::Array(records) => Ok(records),
            other => Err(GatewayError::Decode(format!(
                "expected a JSON array of {}, got {}",
                resource,
                json_kind(&other)
            ))),
        }
    }

    fn name(&self) -> &str {
        "http"
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
