//! Frame header and response body decoding.
//!
//! v2 header, 8 bytes:
//! ```text
//! ┌─────────┬───────┬────────┬────────┬──────────┐
//! │ version │ flags │ stream │ opcode │ length   │
//! │ 1 byte  │ 1 byte│ 1 byte │ 1 byte │ int32 BE │
//! └─────────┴───────┴────────┴────────┴──────────┘
//! ```

use bytes::{BufMut, Bytes};

use crate::decoding::{self, StringMultimap};
use crate::error::DecodingError;

/// Version byte of frames sent to the server.
pub const REQUEST_VERSION: u8 = 0x02;

/// Version byte of frames received from the server.
pub const RESPONSE_VERSION: u8 = 0x82;

/// Header flag bits.
pub mod flags {
    pub const COMPRESSION: u8 = 0x01;
    pub const TRACING: u8 = 0x02;
}

/// Server error code for an id the connection has not prepared.
pub const UNPREPARED_ERROR_CODE: i32 = 0x2500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Opcode {
    Error = 0x00,
    Startup = 0x01,
    Ready = 0x02,
    Authenticate = 0x03,
    Options = 0x05,
    Supported = 0x06,
    Query = 0x07,
    Result = 0x08,
    Prepare = 0x09,
    Execute = 0x0A,
    Register = 0x0B,
    Event = 0x0C,
    Batch = 0x0D,
    AuthChallenge = 0x0E,
    AuthResponse = 0x0F,
    AuthSuccess = 0x10,
}

impl TryFrom<u8> for Opcode {
    type Error = DecodingError;

    fn try_from(byte: u8) -> Result<Self, DecodingError> {
        Ok(match byte {
            0x00 => Opcode::Error,
            0x01 => Opcode::Startup,
            0x02 => Opcode::Ready,
            0x03 => Opcode::Authenticate,
            0x05 => Opcode::Options,
            0x06 => Opcode::Supported,
            0x07 => Opcode::Query,
            0x08 => Opcode::Result,
            0x09 => Opcode::Prepare,
            0x0A => Opcode::Execute,
            0x0B => Opcode::Register,
            0x0C => Opcode::Event,
            0x0D => Opcode::Batch,
            0x0E => Opcode::AuthChallenge,
            0x0F => Opcode::AuthResponse,
            0x10 => Opcode::AuthSuccess,
            other => return Err(DecodingError::UnknownOpcode(other)),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub version: u8,
    pub flags: u8,
    pub stream: i8,
    pub opcode: Opcode,
    /// Body length in bytes.
    pub length: u32,
}

impl FrameHeader {
    pub const SIZE: usize = 8;

    pub fn encode(&self, buf: &mut impl BufMut) {
        buf.put_u8(self.version);
        buf.put_u8(self.flags);
        buf.put_i8(self.stream);
        buf.put_u8(self.opcode as u8);
        buf.put_u32(self.length);
    }

    /// Decode a header; the buffer is untouched on failure.
    pub fn decode(buffer: &mut Bytes) -> Result<Self, DecodingError> {
        if buffer.len() < Self::SIZE {
            return Err(DecodingError::Underflow {
                what: "a frame header",
                needed: Self::SIZE,
                available: buffer.len(),
            });
        }
        let opcode = Opcode::try_from(buffer[3])?;
        let mut cursor = buffer.split_to(Self::SIZE);
        let version = decoding::read_byte(&mut cursor)?;
        let flags = decoding::read_byte(&mut cursor)?;
        let stream = decoding::read_byte(&mut cursor)? as i8;
        let _opcode = decoding::read_byte(&mut cursor)?;
        let length = decoding::read_int(&mut cursor)? as u32;
        Ok(Self {
            version,
            flags,
            stream,
            opcode,
            length,
        })
    }

    pub fn is_traced(&self) -> bool {
        self.flags & flags::TRACING != 0
    }
}

/// ERROR response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub code: i32,
    pub message: String,
    /// Statement id the server did not recognise, for code `0x2500`.
    pub unprepared_id: Option<Bytes>,
}

/// RESULT response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryResult {
    Void,
    SetKeyspace(String),
    /// Rows, prepared and schema-change results, left undecoded.
    Raw { kind: i32, body: Bytes },
}

impl QueryResult {
    const VOID_KIND: i32 = 0x0001;
    const SET_KEYSPACE_KIND: i32 = 0x0003;
}

/// A decoded response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Ready,
    Supported(StringMultimap),
    Error(ErrorResponse),
    Result(QueryResult),
    Other { opcode: Opcode, body: Bytes },
}

impl Response {
    /// Decode the body of a frame whose header carries `opcode`.
    pub fn decode(opcode: Opcode, mut body: Bytes) -> Result<Self, DecodingError> {
        let response = match opcode {
            Opcode::Ready => Self::Ready,
            Opcode::Supported => Self::Supported(decoding::read_string_multimap(&mut body)?),
            Opcode::Error => {
                let code = decoding::read_int(&mut body)?;
                let message = decoding::read_string(&mut body)?;
                let unprepared_id = if code == UNPREPARED_ERROR_CODE {
                    decoding::read_short_bytes(&mut body)?
                } else {
                    None
                };
                Self::Error(ErrorResponse {
                    code,
                    message,
                    unprepared_id,
                })
            }
            Opcode::Result => {
                let kind = decoding::read_int(&mut body)?;
                Self::Result(match kind {
                    QueryResult::VOID_KIND => QueryResult::Void,
                    QueryResult::SET_KEYSPACE_KIND => {
                        QueryResult::SetKeyspace(decoding::read_string(&mut body)?)
                    }
                    _ => QueryResult::Raw { kind, body },
                })
            }
            other => Self::Other { opcode: other, body },
        };
        Ok(response)
    }
}

/// A whole response frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseFrame {
    pub header: FrameHeader,
    /// Raw 16-byte tracing session id, present when the tracing flag is set.
    pub trace_id: Option<Bytes>,
    pub response: Response,
}

impl ResponseFrame {
    /// Decode one complete frame. Fails without consuming if the buffer does
    /// not yet hold the whole body.
    pub fn decode(buffer: &mut Bytes) -> Result<Self, DecodingError> {
        let mut cursor = buffer.clone();
        let header = FrameHeader::decode(&mut cursor)?;
        let length = header.length as usize;
        if cursor.len() < length {
            return Err(DecodingError::Underflow {
                what: "a frame body",
                needed: length,
                available: cursor.len(),
            });
        }
        let mut body = cursor.split_to(length);
        let trace_id = if header.is_traced() {
            if body.len() < 16 {
                return Err(DecodingError::Underflow {
                    what: "a tracing id",
                    needed: 16,
                    available: body.len(),
                });
            }
            Some(body.split_to(16))
        } else {
            None
        };
        let response = Response::decode(header.opcode, body)?;
        *buffer = cursor;
        Ok(Self {
            header,
            trace_id,
            response,
        })
    }
}
