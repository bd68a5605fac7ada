//! Collaborator traits at the edge of the core: connection pool, options
//! decoder, prepared statements and the transport that fulfils a request.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::error::Result;
use crate::options::{BatchOptions, ExecuteOptions};
use crate::protocol::{BatchRequest, QueryResult, Response};
use crate::value::BoundValue;

/// Opaque handle to one established transport session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Connection {
    id: u64,
    address: String,
}

impl Connection {
    pub fn new(id: u64, address: impl Into<String>) -> Self {
        Self {
            id,
            address: address.into(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.address, self.id)
    }
}

/// Deferred result of an execute call.
pub type ResponseFuture = BoxFuture<'static, Result<QueryResult>>;

/// Source of usable connections.
pub trait ConnectionPool: Send + Sync + 'static {
    /// Hand back one currently usable connection.
    fn random_connection(&self) -> Result<Connection>;
}

/// Validates and normalises a merged option map.
pub trait OptionsDecoder: Send + Sync + 'static {
    fn decode_options(&self, options: BatchOptions) -> Result<ExecuteOptions>;
}

/// A statement registered with the server, identified per connection.
pub trait PreparedStatement: Send + Sync + fmt::Debug {
    /// Append this statement to `request` using its id on `connection`.
    ///
    /// Fails with [`ClientError::NotPrepared`](crate::ClientError::NotPrepared)
    /// if the statement has no id on that connection.
    fn add_to_batch(
        &self,
        request: &mut BatchRequest,
        connection: &Connection,
        bound_args: &[BoundValue],
    ) -> Result<()>;
}

/// Sends a request over a connection and resolves with the server response.
///
/// # Object Safety
/// The trait is object-safe and can be stored as `Arc<dyn Transport>`.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn dispatch(
        &self,
        connection: &Connection,
        request: BatchRequest,
        timeout: Option<Duration>,
    ) -> Result<Response>;
}
