//! Dispatches an assembled request and turns the response into a result.

use std::sync::Arc;
use std::time::Duration;

use cqlwire_core::error::ClientError;
use cqlwire_core::protocol::{Response, UNPREPARED_ERROR_CODE};
use cqlwire_core::{BatchRequest, Connection, ResponseFuture, Transport};

#[derive(Clone)]
pub struct RequestRunner {
    transport: Arc<dyn Transport>,
}

impl RequestRunner {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Send `request` on `connection`. Nothing happens until the returned
    /// future is polled.
    pub fn execute(
        &self,
        connection: Connection,
        request: BatchRequest,
        timeout: Option<Duration>,
    ) -> ResponseFuture {
        let transport = Arc::clone(&self.transport);
        Box::pin(async move {
            tracing::debug!(
                connection = %connection,
                batch_type = %request.batch_type,
                consistency = %request.consistency,
                parts = request.len(),
                trace = request.trace,
                "dispatching batch"
            );
            match transport.dispatch(&connection, request, timeout).await? {
                Response::Result(result) => Ok(result),
                Response::Error(err) if err.code == UNPREPARED_ERROR_CODE => {
                    Err(ClientError::NotPrepared {
                        connection: connection.to_string(),
                        statement: err.unprepared_id.as_deref().map(hex).unwrap_or_default(),
                    })
                }
                Response::Error(err) => Err(ClientError::Server {
                    code: err.code,
                    message: err.message,
                }),
                other => Err(ClientError::Other(format!(
                    "unexpected response to batch: {other:?}"
                ))),
            }
        })
    }
}

fn hex(id: &[u8]) -> String {
    id.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use cqlwire_core::error::Result;
    use cqlwire_core::protocol::{ErrorResponse, QueryResult};
    use cqlwire_core::{BatchType, Consistency};

    struct StaticTransport(Response);

    #[async_trait]
    impl Transport for StaticTransport {
        async fn dispatch(
            &self,
            _connection: &Connection,
            _request: BatchRequest,
            _timeout: Option<Duration>,
        ) -> Result<Response> {
            Ok(self.0.clone())
        }
    }

    fn run(response: Response) -> Result<QueryResult> {
        let runner = RequestRunner::new(Arc::new(StaticTransport(response)));
        let request = BatchRequest::new(BatchType::Logged, Consistency::One, false);
        futures::executor::block_on(runner.execute(Connection::new(1, "a"), request, None))
    }

    #[test]
    fn result_passes_through() {
        assert_eq!(run(Response::Result(QueryResult::Void)).unwrap(), QueryResult::Void);
    }

    #[test]
    fn unprepared_response_maps_to_not_prepared() {
        let err = run(Response::Error(ErrorResponse {
            code: UNPREPARED_ERROR_CODE,
            message: "Unprepared".into(),
            unprepared_id: Some(Bytes::from_static(&[0xab, 0xcd])),
        }))
        .unwrap_err();
        assert!(matches!(err, ClientError::NotPrepared { ref statement, .. } if statement == "abcd"));
    }

    #[test]
    fn server_error_keeps_code() {
        let err = run(Response::Error(ErrorResponse {
            code: 0x2200,
            message: "Invalid".into(),
            unprepared_id: None,
        }))
        .unwrap_err();
        assert!(matches!(err, ClientError::Server { code: 0x2200, .. }));
    }

    #[test]
    fn unexpected_opcode_is_an_error() {
        assert!(run(Response::Ready).is_err());
    }
}
