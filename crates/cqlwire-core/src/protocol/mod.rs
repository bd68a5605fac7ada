//! Wire request model and response frame decoding.

pub mod batch;
pub mod frame;

pub use batch::{BatchRequest, BatchRequestPart, BatchType};
pub use frame::{
    flags, ErrorResponse, FrameHeader, Opcode, QueryResult, Response, ResponseFrame,
    REQUEST_VERSION, RESPONSE_VERSION, UNPREPARED_ERROR_CODE,
};
