//! A prepared statement bound as the sole statement of a batch, so a single
//! execution shares the batch path.

use std::panic::Location;
use std::sync::Arc;

use cqlwire_core::error::Result;
use cqlwire_core::{BatchOptions, BoundValue, PreparedStatement, QueryResult, ResponseFuture};

use crate::batch::{AsyncBatch, Statement};
use crate::sync::{at_call_site, wait};

#[derive(Debug)]
pub struct AsyncPreparedStatementBatch {
    prepared_statement: Arc<dyn PreparedStatement>,
    batch: AsyncBatch,
}

impl AsyncPreparedStatementBatch {
    pub fn new(prepared_statement: Arc<dyn PreparedStatement>, batch: AsyncBatch) -> Self {
        Self {
            prepared_statement,
            batch,
        }
    }

    /// Add one set of bound values for the prepared statement.
    pub fn add(&mut self, bound_args: Vec<BoundValue>) {
        let statement = Statement::Prepared(Arc::clone(&self.prepared_statement));
        self.batch.add(statement, bound_args);
    }

    pub fn execute(&self, options: impl Into<BatchOptions>) -> Result<ResponseFuture> {
        self.batch.execute(options)
    }
}

#[derive(Debug)]
pub struct SyncPreparedStatementBatch {
    inner: AsyncPreparedStatementBatch,
}

impl SyncPreparedStatementBatch {
    pub fn new(inner: AsyncPreparedStatementBatch) -> Self {
        Self { inner }
    }

    pub fn add(&mut self, bound_args: Vec<BoundValue>) {
        self.inner.add(bound_args);
    }

    #[track_caller]
    pub fn execute(&self, options: impl Into<BatchOptions>) -> Result<QueryResult> {
        let location = Location::caller();
        self.inner
            .execute(options)
            .and_then(wait)
            .map_err(|e| at_call_site(e, location))
    }
}
