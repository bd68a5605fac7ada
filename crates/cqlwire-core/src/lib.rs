//! cqlwire-core — wire-protocol primitives for a CQL client driver.
//!
//! # Overview
//!
//! - [`decoding`] — frame decoder for protocol primitives, bounds-checked
//! - [`encoding`] — the matching write-direction primitives
//! - [`protocol`] — [`BatchRequest`] model, frame header and response decoding
//! - [`Consistency`] — consistency levels and their wire table
//! - [`transport`] — collaborator traits: [`ConnectionPool`], [`OptionsDecoder`],
//!   [`PreparedStatement`], [`Transport`]
//! - [`ClientError`] / [`DecodingError`] / [`EncodingError`] — structured error types

pub mod consistency;
pub mod decoding;
pub mod encoding;
pub mod error;
pub mod options;
pub mod protocol;
pub mod transport;
pub mod value;

pub use consistency::{Consistency, CONSISTENCIES};
pub use error::{ClientError, DecodingError, EncodingError, Result};
pub use options::{BatchOptions, ExecuteOptions};
pub use protocol::{BatchRequest, BatchRequestPart, BatchType, QueryResult, Response};
pub use transport::{
    Connection, ConnectionPool, OptionsDecoder, PreparedStatement, ResponseFuture, Transport,
};
pub use value::BoundValue;
