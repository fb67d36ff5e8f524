//! Error types for Postboard
//!
//! Store mutations never fail: a missing post is a silent no-op and fetch
//! failures are recorded in the store. These types cover the edges around
//! the store (configuration and the remote gateway).

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PostboardError>;

#[derive(Error, Debug)]
pub enum PostboardError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

#[derive(Error, Debug, Clone)]
pub enum GatewayError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request for {resource} returned status {status}")]
    Status { resource: String, status: u16 },

    #[error("Malformed response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GatewayError::Decode(err.to_string())
        } else {
            GatewayError::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_formatting_network() {
        let error = PostboardError::Gateway(GatewayError::Network("connection refused".to_string()));
        assert_eq!(error.to_string(), "Gateway error: Network error: connection refused");
    }

    #[test]
    fn test_error_message_formatting_status() {
        let error = GatewayError::Status {
            resource: "posts".to_string(),
            status: 503,
        };
        assert_eq!(error.to_string(), "Request for posts returned status 503");
    }

    #[test]
    fn test_error_message_formatting_decode() {
        let error = PostboardError::Gateway(GatewayError::Decode("expected an array".to_string()));
        assert_eq!(
            error.to_string(),
            "Gateway error: Malformed response: expected an array"
        );
    }

    #[test]
    fn test_error_message_formatting_config() {
        let error = PostboardError::Config(ConfigError::MissingField("gateway.base_url".to_string()));
        assert_eq!(
            error.to_string(),
            "Configuration error: Missing required field: gateway.base_url"
        );
    }

    #[test]
    fn test_error_message_formatting_invalid_value() {
        let error = ConfigError::InvalidValue {
            field: "events.capacity".to_string(),
            reason: "must be greater than zero".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid value for events.capacity: must be greater than zero"
        );
    }

    #[test]
    fn test_error_conversion_from_config_error() {
        let error: PostboardError = ConfigError::MissingField("test".to_string()).into();
        assert!(matches!(error, PostboardError::Config(_)));
    }

    #[test]
    fn test_error_conversion_from_gateway_error() {
        let error: PostboardError = GatewayError::Network("test".to_string()).into();
        assert!(matches!(error, PostboardError::Gateway(_)));
    }

    #[test]
    fn test_error_conversion_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error: PostboardError = ConfigError::from(io).into();
        assert!(error.to_string().starts_with("Configuration error: Failed to read config file"));
    }
}
