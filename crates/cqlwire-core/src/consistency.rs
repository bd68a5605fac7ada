//! Consistency levels and their wire index table.

use serde::{Deserialize, Serialize};

use crate::error::DecodingError;

/// Durability/visibility requirement attached to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Consistency {
    Any,
    One,
    Two,
    Three,
    Quorum,
    All,
    LocalQuorum,
    EachQuorum,
    Serial,
    LocalSerial,
    LocalOne,
}

/// Known levels, indexed by their wire code.
pub const CONSISTENCIES: [Consistency; 11] = [
    Consistency::Any,
    Consistency::One,
    Consistency::Two,
    Consistency::Three,
    Consistency::Quorum,
    Consistency::All,
    Consistency::LocalQuorum,
    Consistency::EachQuorum,
    Consistency::Serial,
    Consistency::LocalSerial,
    Consistency::LocalOne,
];

impl Consistency {
    /// Look up a level by its wire index.
    pub fn from_index(index: u16) -> Result<Self, DecodingError> {
        CONSISTENCIES
            .get(index as usize)
            .copied()
            .ok_or(DecodingError::UnknownConsistency(index))
    }

    /// The wire index of this level.
    pub fn index(self) -> u16 {
        self as u16
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::One => "one",
            Self::Two => "two",
            Self::Three => "three",
            Self::Quorum => "quorum",
            Self::All => "all",
            Self::LocalQuorum => "local_quorum",
            Self::EachQuorum => "each_quorum",
            Self::Serial => "serial",
            Self::LocalSerial => "local_serial",
            Self::LocalOne => "local_one",
        }
    }
}

impl std::fmt::Display for Consistency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Consistency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CONSISTENCIES
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown consistency: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_order_matches_discriminants() {
        for (i, c) in CONSISTENCIES.iter().enumerate() {
            assert_eq!(c.index() as usize, i);
            assert_eq!(Consistency::from_index(i as u16).unwrap(), *c);
        }
    }

    #[test]
    fn out_of_range_index_fails() {
        assert_eq!(
            Consistency::from_index(11),
            Err(DecodingError::UnknownConsistency(11))
        );
    }

    #[test]
    fn parse_and_serde_names() {
        assert_eq!("LOCAL_QUORUM".parse::<Consistency>().unwrap(), Consistency::LocalQuorum);
        let json = serde_json::to_string(&Consistency::EachQuorum).unwrap();
        assert_eq!(json, "\"each_quorum\"");
    }
}
