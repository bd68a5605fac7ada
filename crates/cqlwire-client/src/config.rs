//! Client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use cqlwire_core::error::{ClientError, Result};
use cqlwire_core::Consistency;

/// Configuration shared by every batch a [`Client`](crate::Client) creates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Consistency used when neither the batch nor the call sets one.
    pub default_consistency: Option<Consistency>,
    /// Timeout handed to the transport when none is given.
    pub default_timeout: Option<Duration>,
    /// Attempts at building a request before an unprepared statement is fatal.
    pub max_unprepared_attempts: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            default_consistency: Some(Consistency::Quorum),
            default_timeout: None,
            max_unprepared_attempts: 3,
        }
    }
}

impl ClientConfig {
    /// Parse a JSON config document; missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ClientError::Other(format!("invalid client config: {e}")))
    }
}
