//! # Client Configuration
//!
//! Settings for the backend boundary. Embedded as the `[client]` table of the
//! desktop's `salesys.toml`:
//!
//! ```toml
//! [client]
//! endpoint = "https://pos.example.com/rpc"   # backend gateway
//! api_token = "..."                          # optional bearer token
//! call_timeout_ms = 15000   # per remote call, every stage of a submission
//! ```

use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

/// Backend boundary settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the backend gateway. Each operation is posted to
    /// `{endpoint}/{operation}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Sent as a bearer token with every call when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,

    /// Upper bound for a single backend call (milliseconds).
    #[serde(default = "default_call_timeout")]
    pub call_timeout_ms: u64,
}

fn default_call_timeout() -> u64 {
    15_000
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            endpoint: None,
            api_token: None,
            call_timeout_ms: default_call_timeout(),
        }
    }
}

impl ClientConfig {
    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }

    /// The gateway URL, if one is configured.
    pub fn endpoint_url(&self) -> ClientResult<Option<Url>> {
        let Some(endpoint) = self.endpoint.as_deref() else {
            return Ok(None);
        };
        let url = Url::parse(endpoint).map_err(|e| {
            ClientError::InvalidConfig(format!("endpoint {endpoint:?} is not a URL: {e}"))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::InvalidConfig(format!(
                "endpoint must use http or https, got {}",
                url.scheme()
            )));
        }
        Ok(Some(url))
    }

    pub fn validate(&self) -> ClientResult<()> {
        if self.call_timeout_ms == 0 {
            return Err(ClientError::InvalidConfig(
                "call_timeout_ms must be greater than 0".into(),
            ));
        }
        self.endpoint_url()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeout() {
        let config = ClientConfig::default();
        assert_eq!(config.call_timeout(), Duration::from_secs(15));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = ClientConfig {
            call_timeout_ms: 0,
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_field_uses_default() {
        let config: ClientConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.call_timeout_ms, 15_000);
        assert!(config.endpoint.is_none());
    }

    #[test]
    fn test_endpoint_must_be_http() {
        let mut config = ClientConfig {
            endpoint: Some("http://127.0.0.1:8080/rpc".to_string()),
            ..ClientConfig::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(
            config.endpoint_url().unwrap().unwrap().path(),
            "/rpc"
        );

        config.endpoint = Some("ftp://pos.example.com".to_string());
        assert!(config.validate().is_err());

        config.endpoint = Some("not a url".to_string());
        assert!(config.validate().is_err());
    }
}
