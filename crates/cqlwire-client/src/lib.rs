//! cqlwire-client — batch execution over a CQL connection pool.
//!
//! # Overview
//!
//! - [`AsyncBatch`] — collects statements, builds the BATCH request against a
//!   randomly picked connection, rebuilds it when a prepared statement is not
//!   prepared there, and returns the deferred result
//! - [`SyncBatch`] — blocking wrapper that waits for the result
//! - [`AsyncPreparedStatementBatch`] / [`SyncPreparedStatementBatch`] — a
//!   single prepared statement executed through the batch path
//! - [`ConnectionManager`] — random-pick connection pool
//! - [`DefaultOptionsDecoder`] / [`ClientConfig`] — option defaults and validation
//!
//! ```ignore
//! use cqlwire_client::{Client, ClientConfig};
//! use cqlwire_core::{BatchOptions, Consistency};
//!
//! let client = Client::new(ClientConfig::default(), pool, transport);
//! let mut batch = client.batch("unlogged", BatchOptions::default())?;
//! batch.add("INSERT INTO t (a) VALUES (?)", vec![1.into()]);
//! batch.add("INSERT INTO t (a) VALUES (?)", vec![2.into()]);
//! let result = batch.execute(Consistency::One)?.await?;
//! ```

pub mod batch;
pub mod config;
pub mod options;
pub mod pool;
pub mod prepared;
pub mod runner;
pub mod sync;

mod client;

pub use batch::{AsyncBatch, BatchContext, Statement, DEFAULT_MAX_ATTEMPTS};
pub use client::Client;
pub use config::ClientConfig;
pub use options::DefaultOptionsDecoder;
pub use pool::ConnectionManager;
pub use prepared::{AsyncPreparedStatementBatch, SyncPreparedStatementBatch};
pub use runner::RequestRunner;
pub use sync::SyncBatch;
