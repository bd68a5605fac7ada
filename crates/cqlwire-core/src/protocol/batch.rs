//! BATCH request model.
//!
//! Body layout (protocol v2):
//! ```text
//! [byte type][short n]
//!   n × ( [byte 0][long string query] | [byte 1][short bytes id] )
//!       [short value count][bytes value]*
//! [short consistency]
//! ```

use bytes::{Bytes, BytesMut};
use serde::{Deserialize, Serialize};

use crate::consistency::Consistency;
use crate::encoding;
use crate::error::{ClientError, DecodingError, EncodingError};
use crate::protocol::frame::{flags, FrameHeader, Opcode, REQUEST_VERSION};
use crate::value::BoundValue;

/// How the server applies the statements of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchType {
    Logged,
    Unlogged,
    Counter,
}

impl BatchType {
    pub const LOGGED_TYPE: u8 = 0;
    pub const UNLOGGED_TYPE: u8 = 1;
    pub const COUNTER_TYPE: u8 = 2;

    /// Protocol code for this batch type.
    pub fn code(self) -> u8 {
        match self {
            Self::Logged => Self::LOGGED_TYPE,
            Self::Unlogged => Self::UNLOGGED_TYPE,
            Self::Counter => Self::COUNTER_TYPE,
        }
    }

    /// Batch type for a protocol code read off the wire.
    pub fn from_code(code: u8) -> Result<Self, DecodingError> {
        match code {
            Self::LOGGED_TYPE => Ok(Self::Logged),
            Self::UNLOGGED_TYPE => Ok(Self::Unlogged),
            Self::COUNTER_TYPE => Ok(Self::Counter),
            other => Err(DecodingError::UnknownBatchType(other)),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Logged => "logged",
            Self::Unlogged => "unlogged",
            Self::Counter => "counter",
        }
    }
}

impl std::fmt::Display for BatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<u8> for BatchType {
    type Error = ClientError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_code(code).map_err(|_| ClientError::InvalidBatchType(code.to_string()))
    }
}

impl TryFrom<&str> for BatchType {
    type Error = ClientError;

    fn try_from(name: &str) -> Result<Self, Self::Error> {
        match name.to_ascii_lowercase().as_str() {
            "logged" => Ok(Self::Logged),
            "unlogged" => Ok(Self::Unlogged),
            "counter" => Ok(Self::Counter),
            _ => Err(ClientError::InvalidBatchType(name.to_string())),
        }
    }
}

impl std::str::FromStr for BatchType {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

/// One serialized statement inside a [`BatchRequest`].
#[derive(Debug, Clone, PartialEq)]
pub enum BatchRequestPart {
    Query { cql: String, values: Vec<BoundValue> },
    Prepared { id: Bytes, values: Vec<BoundValue> },
}

impl BatchRequestPart {
    const QUERY_KIND: u8 = 0;
    const PREPARED_KIND: u8 = 1;

    pub fn values(&self) -> &[BoundValue] {
        match self {
            Self::Query { values, .. } | Self::Prepared { values, .. } => values,
        }
    }
}

/// The outbound BATCH request. Parts are kept in the order they were added.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRequest {
    pub batch_type: BatchType,
    pub consistency: Consistency,
    pub trace: bool,
    parts: Vec<BatchRequestPart>,
}

impl BatchRequest {
    pub fn new(batch_type: BatchType, consistency: Consistency, trace: bool) -> Self {
        Self {
            batch_type,
            consistency,
            trace,
            parts: Vec::new(),
        }
    }

    /// Append a raw CQL statement and its bound values.
    pub fn add_query(&mut self, cql: impl Into<String>, values: Vec<BoundValue>) {
        self.parts.push(BatchRequestPart::Query {
            cql: cql.into(),
            values,
        });
    }

    /// Append a prepared statement by its connection-scoped id.
    pub fn add_prepared(&mut self, id: Bytes, values: Vec<BoundValue>) {
        self.parts.push(BatchRequestPart::Prepared { id, values });
    }

    pub fn parts(&self) -> &[BatchRequestPart] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Header flags for this request.
    pub fn frame_flags(&self) -> u8 {
        if self.trace {
            flags::TRACING
        } else {
            0
        }
    }

    /// Append the BATCH body to `buf`. On failure `buf` is left unchanged.
    pub fn encode_body(&self, buf: &mut BytesMut) -> Result<(), EncodingError> {
        let mut body = BytesMut::new();
        encoding::write_byte(&mut body, self.batch_type.code());
        let count = encoding::length("batch parts", self.parts.len(), encoding::MAX_SHORT_LENGTH)?;
        encoding::write_short(&mut body, count);
        for part in &self.parts {
            match part {
                BatchRequestPart::Query { cql, .. } => {
                    encoding::write_byte(&mut body, BatchRequestPart::QUERY_KIND);
                    encoding::write_long_string(&mut body, cql)?;
                }
                BatchRequestPart::Prepared { id, .. } => {
                    encoding::write_byte(&mut body, BatchRequestPart::PREPARED_KIND);
                    encoding::write_short_bytes(&mut body, Some(id.as_ref()))?;
                }
            }
            let values = part.values();
            let count = encoding::length("bound values", values.len(), encoding::MAX_SHORT_LENGTH)?;
            encoding::write_short(&mut body, count);
            for value in values {
                value.encode(&mut body)?;
            }
        }
        encoding::write_consistency(&mut body, self.consistency);
        buf.extend_from_slice(&body);
        Ok(())
    }

    /// Encode header and body as one frame on `stream`.
    pub fn encode_frame(&self, stream: i8) -> Result<Bytes, EncodingError> {
        let mut body = BytesMut::new();
        self.encode_body(&mut body)?;
        let header = FrameHeader {
            version: REQUEST_VERSION,
            flags: self.frame_flags(),
            stream,
            opcode: Opcode::Batch,
            length: encoding::length("a frame body", body.len(), encoding::MAX_INT_LENGTH)?,
        };
        let mut frame = BytesMut::with_capacity(FrameHeader::SIZE + body.len());
        header.encode(&mut frame);
        frame.extend_from_slice(&body);
        Ok(frame.freeze())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoding;

    #[test]
    fn batch_type_codes() {
        assert_eq!(BatchType::Logged.code(), 0);
        assert_eq!(BatchType::Unlogged.code(), 1);
        assert_eq!(BatchType::Counter.code(), 2);
        assert_eq!(BatchType::try_from(2u8).unwrap(), BatchType::Counter);
        assert_eq!(BatchType::from_code(3), Err(DecodingError::UnknownBatchType(3)));
    }

    #[test]
    fn unknown_batch_type_name_fails() {
        let err = BatchType::try_from("sometimes").unwrap_err();
        assert!(matches!(err, ClientError::InvalidBatchType(ref t) if t == "sometimes"));
        assert_eq!("Unlogged".parse::<BatchType>().unwrap(), BatchType::Unlogged);
    }

    #[test]
    fn unknown_batch_type_code_is_an_invalid_batch_type() {
        let err = BatchType::try_from(7u8).unwrap_err();
        assert!(matches!(err, ClientError::InvalidBatchType(ref t) if t == "7"));
    }

    #[test]
    fn body_layout() {
        let mut req = BatchRequest::new(BatchType::Unlogged, Consistency::One, false);
        req.add_query("INSERT INTO t (a) VALUES (?)", vec![BoundValue::Int(1)]);
        req.add_prepared(Bytes::from_static(&[0xca, 0xfe]), vec![]);

        let mut body = BytesMut::new();
        req.encode_body(&mut body).unwrap();
        let mut b = body.freeze();

        assert_eq!(decoding::read_byte(&mut b).unwrap(), 1);
        assert_eq!(decoding::read_short(&mut b).unwrap(), 2);
        assert_eq!(decoding::read_byte(&mut b).unwrap(), 0);
        assert_eq!(decoding::read_long_string(&mut b).unwrap(), "INSERT INTO t (a) VALUES (?)");
        assert_eq!(decoding::read_short(&mut b).unwrap(), 1);
        assert_eq!(
            decoding::read_bytes(&mut b).unwrap(),
            Some(Bytes::from_static(&[0, 0, 0, 1]))
        );
        assert_eq!(decoding::read_byte(&mut b).unwrap(), 1);
        assert_eq!(
            decoding::read_short_bytes(&mut b).unwrap(),
            Some(Bytes::from_static(&[0xca, 0xfe]))
        );
        assert_eq!(decoding::read_short(&mut b).unwrap(), 0);
        assert_eq!(decoding::read_consistency(&mut b).unwrap(), Consistency::One);
        assert!(b.is_empty());
    }

    #[test]
    fn frame_carries_tracing_flag() {
        let traced = BatchRequest::new(BatchType::Logged, Consistency::Quorum, true);
        let mut frame = traced.encode_frame(3).unwrap();
        let header = FrameHeader::decode(&mut frame).unwrap();
        assert_eq!(header.flags, flags::TRACING);
        assert_eq!(header.opcode, Opcode::Batch);
        assert_eq!(header.stream, 3);
        assert_eq!(header.length as usize, frame.len());

        let plain = BatchRequest::new(BatchType::Logged, Consistency::Quorum, false);
        assert_eq!(plain.frame_flags(), 0);
    }

    #[test]
    fn part_count_over_short_limit_is_rejected() {
        let mut req = BatchRequest::new(BatchType::Unlogged, Consistency::One, false);
        for _ in 0..=encoding::MAX_SHORT_LENGTH {
            req.add_query("", vec![]);
        }
        assert_eq!(req.len(), 65_536);

        let mut body = BytesMut::new();
        assert_eq!(
            req.encode_body(&mut body),
            Err(EncodingError::TooLong {
                what: "batch parts",
                len: 65_536,
                max: 65_535,
            })
        );
        assert!(body.is_empty());
        assert!(req.encode_frame(0).is_err());
    }

    #[test]
    fn oversized_value_leaves_buffer_unchanged() {
        let mut req = BatchRequest::new(BatchType::Logged, Consistency::One, false);
        req.add_query("INSERT INTO t (a) VALUES (?)", vec![BoundValue::Int(1)]);
        req.add_prepared(Bytes::from(vec![0u8; 40_000]), vec![]);

        let mut body = BytesMut::from(&b"prefix"[..]);
        let err = req.encode_body(&mut body).unwrap_err();
        assert!(matches!(err, EncodingError::TooLong { what: "a short bytes value", len: 40_000, .. }));
        assert_eq!(&body[..], b"prefix");
    }
}
