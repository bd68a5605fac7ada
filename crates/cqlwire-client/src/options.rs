//! Default [`OptionsDecoder`]: fills configured defaults and validates.

use std::time::Duration;

use cqlwire_core::error::{ClientError, Result};
use cqlwire_core::{BatchOptions, Consistency, ExecuteOptions, OptionsDecoder};

use crate::config::ClientConfig;

#[derive(Debug, Clone)]
pub struct DefaultOptionsDecoder {
    default_consistency: Option<Consistency>,
    default_timeout: Option<Duration>,
}

impl DefaultOptionsDecoder {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            default_consistency: config.default_consistency,
            default_timeout: config.default_timeout,
        }
    }
}

impl OptionsDecoder for DefaultOptionsDecoder {
    fn decode_options(&self, options: BatchOptions) -> Result<ExecuteOptions> {
        let consistency = options
            .consistency
            .or(self.default_consistency)
            .ok_or(ClientError::MissingOption("consistency"))?;
        let timeout = options.timeout.or(self.default_timeout);
        if timeout == Some(Duration::ZERO) {
            return Err(ClientError::InvalidOption {
                key: "timeout",
                reason: "must be greater than zero".into(),
            });
        }
        Ok(ExecuteOptions {
            consistency,
            trace: options.trace.unwrap_or(false),
            timeout,
        })
    }
}
