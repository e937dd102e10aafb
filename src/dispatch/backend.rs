//! The abstract RPC backend.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::envelope::Reply;
use crate::headers::PropagatedHeaders;
use crate::status::RpcError;

/// One-way door to the RPC side.
///
/// The gateway only needs "invoke this operation with this request and
/// these propagated headers"; transport, connection management and retry
/// policy live behind the implementation.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn invoke(
        &self,
        operation: &str,
        request: Value,
        headers: &PropagatedHeaders,
    ) -> Result<Reply, RpcError>;
}

/// Stand-in transport that echoes the decoded request.
///
/// Used by the binary for local runs and by tests that only exercise the
/// transcoding pipeline.
#[derive(Debug, Default)]
pub struct EchoBackend;

#[async_trait]
impl Backend for EchoBackend {
    async fn invoke(
        &self,
        operation: &str,
        request: Value,
        _headers: &PropagatedHeaders,
    ) -> Result<Reply, RpcError> {
        Ok(Reply::new(json!({
            "operation": operation,
            "request": request,
        })))
    }
}
