//! Blocking façade over [`AsyncBatch`].

use std::panic::Location;

use cqlwire_core::error::{ClientError, Result};
use cqlwire_core::{BatchOptions, BatchType, BoundValue, QueryResult, ResponseFuture};
use tokio::runtime::{Handle, RuntimeFlavor};

use crate::batch::{AsyncBatch, Statement};

/// Blocking batch: `execute` waits for the result on the calling thread.
#[derive(Debug)]
pub struct SyncBatch {
    inner: AsyncBatch,
}

impl SyncBatch {
    pub fn new(inner: AsyncBatch) -> Self {
        Self { inner }
    }

    pub fn batch_type(&self) -> BatchType {
        self.inner.batch_type()
    }

    pub fn add(&mut self, statement: impl Into<Statement>, bound_args: Vec<BoundValue>) {
        self.inner.add(statement, bound_args);
    }

    /// Execute and wait. Any failure is reported as raised from the caller
    /// of this method.
    #[track_caller]
    pub fn execute(&self, options: impl Into<BatchOptions>) -> Result<QueryResult> {
        let location = Location::caller();
        self.inner
            .execute(options)
            .and_then(wait)
            .map_err(|e| at_call_site(e, location))
    }

    pub fn into_inner(self) -> AsyncBatch {
        self.inner
    }
}

/// Block the current thread until `future` resolves.
///
/// Inside a multi-thread Tokio runtime the wait happens on a scoped thread
/// so the remaining workers keep driving timers and IO. A current-thread
/// runtime has no other worker, so the future gets its own runtime on the
/// scoped thread instead.
pub(crate) fn wait(future: ResponseFuture) -> Result<QueryResult> {
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            std::thread::scope(|s| {
                s.spawn(|| handle.block_on(future))
                    .join()
                    .map_err(|_| ClientError::Other("blocking wait panicked".into()))?
            })
        }
        Ok(_) => std::thread::scope(|s| {
            s.spawn(|| block_on_own_runtime(future))
                .join()
                .map_err(|_| ClientError::Other("blocking wait panicked".into()))?
        }),
        Err(_) => block_on_own_runtime(future),
    }
}

fn block_on_own_runtime(future: ResponseFuture) -> Result<QueryResult> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| ClientError::Other(format!("failed to create runtime: {e}")))?;
    rt.block_on(future)
}

pub(crate) fn at_call_site(error: ClientError, location: &'static Location<'static>) -> ClientError {
    ClientError::Synchronous {
        location: location.to_string(),
        source: Box::new(error),
    }
}
