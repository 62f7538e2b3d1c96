//! The boundary between routing and the storage provider.
//!
//! [`S3Handler`] receives an identified operation with its routing context and
//! produces a complete HTTP response.

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use s3gate_model::error::S3Error;
use s3gate_model::operations::S3Operation;

use crate::body::S3ResponseBody;
use crate::router::RoutingContext;

/// Future returned by [`S3Handler::handle_operation`].
pub type HandlerFuture =
    Pin<Box<dyn Future<Output = Result<http::Response<S3ResponseBody>, S3Error>> + Send>>;

/// Business logic behind the HTTP service.
///
/// The future is boxed so the trait stays object safe.
pub trait S3Handler: Send + Sync + 'static {
    /// Handle one S3 operation.
    fn handle_operation(
        &self,
        op: S3Operation,
        parts: http::request::Parts,
        body: Bytes,
        ctx: RoutingContext,
    ) -> HandlerFuture;
}

/// Hand a routed request to the handler.
pub async fn dispatch_operation<H: S3Handler>(
    handler: &H,
    parts: http::request::Parts,
    body: Bytes,
    ctx: RoutingContext,
) -> Result<http::Response<S3ResponseBody>, S3Error> {
    let op = ctx.operation;
    tracing::debug!(operation = %op, bucket = ?ctx.bucket, key = ?ctx.key, "dispatching S3 operation");
    handler.handle_operation(op, parts, body, ctx).await
}

/// Answers every operation with `NotImplemented`. Lets routing be exercised
/// without a provider.
#[derive(Debug, Clone, Default)]
pub struct NotImplementedHandler;

impl S3Handler for NotImplementedHandler {
    fn handle_operation(
        &self,
        op: S3Operation,
        _parts: http::request::Parts,
        _body: Bytes,
        _ctx: RoutingContext,
    ) -> HandlerFuture {
        Box::pin(async move { Err(S3Error::not_implemented(op.as_str())) })
    }
}

#[cfg(test)]
mod tests {
    use s3gate_model::error::S3ErrorCode;

    use super::*;
    use crate::router::route_path_style;

    #[tokio::test]
    async fn test_should_return_not_implemented_for_default_handler() {
        let req = http::Request::builder()
            .method(http::Method::GET)
            .uri("/bucket-a")
            .body(())
            .expect("valid request");
        let (parts, ()) = req.into_parts();
        let ctx = RoutingContext {
            bucket: Some("bucket-a".to_owned()),
            key: None,
            operation: S3Operation::ListObjects,
            query_params: vec![],
            routed: route_path_style("/bucket-a", &http::Method::GET),
        };

        let err = dispatch_operation(&NotImplementedHandler, parts, Bytes::new(), ctx)
            .await
            .unwrap_err();
        assert_eq!(err.code, S3ErrorCode::NotImplemented);
    }
}
