//! Entry point that wires the collaborators together and hands out batches.

use std::sync::Arc;

use cqlwire_core::error::{ClientError, Result};
use cqlwire_core::{
    BatchOptions, BatchType, ConnectionPool, OptionsDecoder, PreparedStatement, Transport,
};

use crate::batch::{AsyncBatch, BatchContext};
use crate::config::ClientConfig;
use crate::options::DefaultOptionsDecoder;
use crate::prepared::{AsyncPreparedStatementBatch, SyncPreparedStatementBatch};
use crate::runner::RequestRunner;
use crate::sync::SyncBatch;

/// Creates batches bound to one connection pool and transport.
#[derive(Clone)]
pub struct Client {
    context: BatchContext,
}

impl Client {
    pub fn new(
        config: ClientConfig,
        connection_manager: Arc<dyn ConnectionPool>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let context = BatchContext::new(
            Arc::new(DefaultOptionsDecoder::new(&config)),
            connection_manager,
            RequestRunner::new(transport),
        )
        .with_max_attempts(config.max_unprepared_attempts);
        Self { context }
    }

    /// Replace the options decoder built from the config.
    pub fn with_options_decoder(mut self, options_decoder: Arc<dyn OptionsDecoder>) -> Self {
        self.context.options_decoder = options_decoder;
        self
    }

    pub fn batch<T>(&self, batch_type: T, options: BatchOptions) -> Result<AsyncBatch>
    where
        T: TryInto<BatchType>,
        ClientError: From<T::Error>,
    {
        AsyncBatch::new(batch_type, self.context.clone(), options)
    }

    pub fn blocking_batch<T>(&self, batch_type: T, options: BatchOptions) -> Result<SyncBatch>
    where
        T: TryInto<BatchType>,
        ClientError: From<T::Error>,
    {
        self.batch(batch_type, options).map(SyncBatch::new)
    }

    pub fn prepared_batch<T>(
        &self,
        prepared_statement: Arc<dyn PreparedStatement>,
        batch_type: T,
        options: BatchOptions,
    ) -> Result<AsyncPreparedStatementBatch>
    where
        T: TryInto<BatchType>,
        ClientError: From<T::Error>,
    {
        let batch = self.batch(batch_type, options)?;
        Ok(AsyncPreparedStatementBatch::new(prepared_statement, batch))
    }

    pub fn blocking_prepared_batch<T>(
        &self,
        prepared_statement: Arc<dyn PreparedStatement>,
        batch_type: T,
        options: BatchOptions,
    ) -> Result<SyncPreparedStatementBatch>
    where
        T: TryInto<BatchType>,
        ClientError: From<T::Error>,
    {
        self.prepared_batch(prepared_statement, batch_type, options)
            .map(SyncPreparedStatementBatch::new)
    }
}
