//! Batch execution engine.
//!
//! An [`AsyncBatch`] collects statements and, on each `execute`, rebuilds the
//! wire request from scratch:
//!
//! ```text
//! merge options → decode options → pick connection → build request → dispatch
//!                                        ↑                │
//!                                        └── not prepared ┘ (bounded)
//! ```
//!
//! Prepared statement ids are scoped to a connection, so the connection is
//! picked before any part is serialized. When a statement is not prepared on
//! the picked connection the whole request is rebuilt against a freshly
//! picked one, up to the configured attempt ceiling.

use std::sync::Arc;

use cqlwire_core::error::{ClientError, Result};
use cqlwire_core::{
    BatchOptions, BatchRequest, BatchType, BoundValue, Connection, ConnectionPool,
    ExecuteOptions, OptionsDecoder, PreparedStatement, ResponseFuture,
};

use crate::runner::RequestRunner;

/// Attempts at building a request when statements keep turning up unprepared.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// The statement half of a batch part.
#[derive(Debug, Clone)]
pub enum Statement {
    Cql(String),
    Prepared(Arc<dyn PreparedStatement>),
}

impl From<&str> for Statement {
    fn from(cql: &str) -> Self {
        Self::Cql(cql.to_string())
    }
}

impl From<String> for Statement {
    fn from(cql: String) -> Self {
        Self::Cql(cql)
    }
}

impl From<Arc<dyn PreparedStatement>> for Statement {
    fn from(statement: Arc<dyn PreparedStatement>) -> Self {
        Self::Prepared(statement)
    }
}

impl<S: PreparedStatement + 'static> From<Arc<S>> for Statement {
    fn from(statement: Arc<S>) -> Self {
        Self::Prepared(statement)
    }
}

#[derive(Debug, Clone)]
struct BatchPart {
    statement: Statement,
    bound_args: Vec<BoundValue>,
}

/// Collaborators shared by every batch of a client.
#[derive(Clone)]
pub struct BatchContext {
    pub(crate) options_decoder: Arc<dyn OptionsDecoder>,
    pub(crate) connection_manager: Arc<dyn ConnectionPool>,
    pub(crate) request_runner: RequestRunner,
    pub(crate) max_attempts: u32,
}

impl BatchContext {
    pub fn new(
        options_decoder: Arc<dyn OptionsDecoder>,
        connection_manager: Arc<dyn ConnectionPool>,
        request_runner: RequestRunner,
    ) -> Self {
        Self {
            options_decoder,
            connection_manager,
            request_runner,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }
}

/// Non-blocking batch: `execute` returns the deferred result.
///
/// `add` takes `&mut self`; share a batch across threads behind a lock.
pub struct AsyncBatch {
    batch_type: BatchType,
    options: BatchOptions,
    context: BatchContext,
    parts: Vec<BatchPart>,
}

impl AsyncBatch {
    /// Create an empty batch. Fails if `batch_type` does not name one of
    /// logged, unlogged or counter.
    pub fn new<T>(batch_type: T, context: BatchContext, options: BatchOptions) -> Result<Self>
    where
        T: TryInto<BatchType>,
        ClientError: From<T::Error>,
    {
        Ok(Self {
            batch_type: batch_type.try_into()?,
            options,
            context,
            parts: Vec::new(),
        })
    }

    pub fn batch_type(&self) -> BatchType {
        self.batch_type
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Append a statement with its bound values. Never fails; problems with
    /// the statement surface at execution.
    pub fn add(&mut self, statement: impl Into<Statement>, bound_args: Vec<BoundValue>) {
        self.parts.push(BatchPart {
            statement: statement.into(),
            bound_args,
        });
    }

    /// Build the request and hand it to the transport.
    ///
    /// `options` may be a bare [`Consistency`](cqlwire_core::Consistency);
    /// either way it is merged over the options given at creation.
    /// Construction failures are returned directly; dispatch failures
    /// resolve through the returned future.
    pub fn execute(&self, options: impl Into<BatchOptions>) -> Result<ResponseFuture> {
        let merged = self.options.merge(&options.into());
        let options = self.context.options_decoder.decode_options(merged)?;
        let (connection, request) = self.build_request(&options)?;
        Ok(self
            .context
            .request_runner
            .execute(connection, request, options.timeout))
    }

    fn build_request(&self, options: &ExecuteOptions) -> Result<(Connection, BatchRequest)> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            let connection = self.context.connection_manager.random_connection()?;
            tracing::debug!(attempt, connection = %connection, "building batch request");
            match self.assemble(&connection, options) {
                Ok(request) => return Ok((connection, request)),
                Err(e) if e.is_not_prepared() && attempt < self.context.max_attempts => {
                    tracing::warn!(
                        attempt,
                        connection = %connection,
                        error = %e,
                        "statement not prepared on connection, rebuilding batch"
                    );
                }
                Err(e) => {
                    if e.is_not_prepared() {
                        tracing::error!(attempt, error = %e, "statement still not prepared, giving up");
                    }
                    return Err(e);
                }
            }
        }
    }

    fn assemble(&self, connection: &Connection, options: &ExecuteOptions) -> Result<BatchRequest> {
        let mut request = BatchRequest::new(self.batch_type, options.consistency, options.trace);
        for part in &self.parts {
            match &part.statement {
                Statement::Cql(cql) => request.add_query(cql.clone(), part.bound_args.clone()),
                Statement::Prepared(statement) => {
                    statement.add_to_batch(&mut request, connection, &part.bound_args)?
                }
            }
        }
        Ok(request)
    }
}

impl std::fmt::Debug for AsyncBatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncBatch")
            .field("batch_type", &self.batch_type)
            .field("options", &self.options)
            .field("parts", &self.parts)
            .finish()
    }
}
