//! Values bound to statement markers.

use bytes::{BufMut, Bytes};

use crate::encoding;
use crate::error::EncodingError;

/// A single value bound to a `?` marker.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundValue {
    Null,
    Int(i32),
    BigInt(i64),
    Boolean(bool),
    Double(f64),
    Text(String),
    Blob(Bytes),
}

impl BoundValue {
    /// Encode as a protocol `[bytes]` value; `Null` uses the absent sentinel.
    pub fn encode(&self, buf: &mut impl BufMut) -> Result<(), EncodingError> {
        match self {
            Self::Null => encoding::write_bytes(buf, None),
            Self::Int(v) => encoding::write_bytes(buf, Some(&v.to_be_bytes())),
            Self::BigInt(v) => encoding::write_bytes(buf, Some(&v.to_be_bytes())),
            Self::Boolean(v) => encoding::write_bytes(buf, Some(&[u8::from(*v)])),
            Self::Double(v) => encoding::write_bytes(buf, Some(&v.to_be_bytes())),
            Self::Text(v) => encoding::write_bytes(buf, Some(v.as_bytes())),
            Self::Blob(v) => encoding::write_bytes(buf, Some(v.as_ref())),
        }
    }
}

impl From<i32> for BoundValue {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<i64> for BoundValue {
    fn from(v: i64) -> Self {
        Self::BigInt(v)
    }
}

impl From<bool> for BoundValue {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<f64> for BoundValue {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<&str> for BoundValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for BoundValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Bytes> for BoundValue {
    fn from(v: Bytes) -> Self {
        Self::Blob(v)
    }
}

impl<T: Into<BoundValue>> From<Option<T>> for BoundValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}
