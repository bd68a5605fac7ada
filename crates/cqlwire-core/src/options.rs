//! Execute options: the mergeable option map and its resolved form.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consistency::Consistency;

/// Options given at batch creation or per `execute` call.
///
/// Unset keys fall through to the base options when merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchOptions {
    pub consistency: Option<Consistency>,
    pub trace: Option<bool>,
    pub timeout: Option<Duration>,
}

impl BatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_consistency(mut self, consistency: Consistency) -> Self {
        self.consistency = Some(consistency);
        self
    }

    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = Some(trace);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Overlay `overrides` onto `self`; keys set in `overrides` win.
    pub fn merge(&self, overrides: &BatchOptions) -> BatchOptions {
        BatchOptions {
            consistency: overrides.consistency.or(self.consistency),
            trace: overrides.trace.or(self.trace),
            timeout: overrides.timeout.or(self.timeout),
        }
    }
}

/// A bare consistency level is shorthand for `{consistency: level}`.
impl From<Consistency> for BatchOptions {
    fn from(consistency: Consistency) -> Self {
        Self::new().with_consistency(consistency)
    }
}

/// Options after validation by an [`OptionsDecoder`](crate::transport::OptionsDecoder).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecuteOptions {
    pub consistency: Consistency,
    pub trace: bool,
    pub timeout: Option<Duration>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_site_keys_win() {
        let base = BatchOptions::new()
            .with_consistency(Consistency::Quorum)
            .with_timeout(Duration::from_secs(5));
        let merged = base.merge(&BatchOptions::new().with_consistency(Consistency::One));
        assert_eq!(merged.consistency, Some(Consistency::One));
        assert_eq!(merged.timeout, Some(Duration::from_secs(5)));
        assert_eq!(merged.trace, None);
    }

    #[test]
    fn bare_consistency_is_shorthand() {
        let base = BatchOptions::new().with_trace(true);
        assert_eq!(
            base.merge(&Consistency::All.into()),
            base.merge(&BatchOptions {
                consistency: Some(Consistency::All),
                ..Default::default()
            })
        );
    }

    #[test]
    fn deserializes_partial_maps() {
        let opts: BatchOptions = serde_json::from_str(r#"{"consistency":"local_one"}"#).unwrap();
        assert_eq!(opts.consistency, Some(Consistency::LocalOne));
        assert_eq!(opts.trace, None);
    }
}
