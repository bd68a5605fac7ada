//! Decoding and client-level error types.

use thiserror::Error;

/// Errors raised while decoding a protocol primitive from a frame buffer.
///
/// A decode call that fails leaves the buffer untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodingError {
    /// Fewer bytes remain than the field declares.
    #[error("Need {needed} bytes to decode {what}, only {available} bytes given")]
    Underflow {
        what: &'static str,
        needed: usize,
        available: usize,
    },

    /// Consistency index outside the known table.
    #[error("Unknown consistency index {0}")]
    UnknownConsistency(u16),

    /// Batch type code outside {logged, unlogged, counter}.
    #[error("Unknown batch type code {0}")]
    UnknownBatchType(u8),

    /// Frame carries an opcode this decoder does not know.
    #[error("Unknown opcode 0x{0:02x}")]
    UnknownOpcode(u8),

    /// A string field is not valid UTF-8.
    #[error("Invalid UTF-8 in {what}")]
    InvalidUtf8 { what: &'static str },

    /// The primitive is declared by the protocol but not decoded by this crate.
    #[error("Decoding {primitive} is not supported")]
    Unsupported { primitive: &'static str },
}

/// Errors raised while writing a protocol primitive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// A length or count does not fit its wire prefix.
    #[error("{what} of length {len} exceeds the wire maximum of {max}")]
    TooLong {
        what: &'static str,
        len: usize,
        max: usize,
    },
}

/// Errors surfaced by batch construction and execution.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Malformed or truncated frame.
    #[error("Decoding error: {0}")]
    Decoding(#[from] DecodingError),

    /// A request field too large for its length prefix.
    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    /// Requested batch type is not logged, unlogged or counter.
    #[error("Unknown batch type: {0}")]
    InvalidBatchType(String),

    /// A prepared statement has no identifier on the chosen connection.
    #[error("Statement {statement} is not prepared on connection {connection}")]
    NotPrepared { connection: String, statement: String },

    /// A required execute option is absent after merging.
    #[error("Missing required option: {0}")]
    MissingOption(&'static str),

    /// An execute option has an unusable value.
    #[error("Invalid option {key}: {reason}")]
    InvalidOption { key: &'static str, reason: String },

    /// The connection pool has nothing to hand out.
    #[error("No connections available")]
    NoConnections,

    /// Error response returned by the server.
    #[error("Server error 0x{code:04x}: {message}")]
    Server { code: i32, message: String },

    /// Transport-level failure (socket closed, channel dropped, ...).
    #[error("Transport error: {0}")]
    Transport(String),

    /// Request timed out in the transport.
    #[error("Request timed out after {ms}ms")]
    Timeout { ms: u64 },

    /// Failure re-raised by a blocking call, attributed to its call site.
    #[error("{source} (at {location})")]
    Synchronous {
        location: String,
        #[source]
        source: Box<ClientError>,
    },

    #[error("{0}")]
    Other(String),
}

impl ClientError {
    /// The error with any call-site annotation stripped.
    pub fn root(&self) -> &ClientError {
        match self {
            Self::Synchronous { source, .. } => source.root(),
            other => other,
        }
    }

    /// Returns `true` for the unprepared-statement condition.
    pub fn is_not_prepared(&self) -> bool {
        matches!(self.root(), Self::NotPrepared { .. })
    }

    /// Returns `true` if the failure is transient at the transport level.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.root(),
            Self::Transport(_) | Self::Timeout { .. } | Self::NoConnections
        )
    }
}

impl From<std::convert::Infallible> for ClientError {
    fn from(never: std::convert::Infallible) -> Self {
        match never {}
    }
}

/// Result type alias using [`ClientError`].
pub type Result<T> = std::result::Result<T, ClientError>;
