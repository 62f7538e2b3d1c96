//! [`S3Handler`] implementation backed by [`S3Provider`].
//!
//! Each operation is delegated to the matching `handle_*` method and the
//! result is turned into an HTTP response.

use std::collections::HashMap;

use bytes::Bytes;
use http::StatusCode;
use http::header::CONTENT_TYPE;
use s3gate_core::S3Provider;
use s3gate_http::body::S3ResponseBody;
use s3gate_http::dispatch::{HandlerFuture, S3Handler};
use s3gate_http::response::{
    IntoS3Response, created_bucket_response, empty_response, etag_response, object_response,
};
use s3gate_http::router::RoutingContext;
use s3gate_model::error::{S3Error, S3ErrorCode};
use s3gate_model::input::{ListObjectsInput, ListObjectsV2Input};
use s3gate_model::operations::S3Operation;

/// Serves S3 operations from an [`S3Provider`].
#[derive(Debug, Clone)]
pub struct S3GateHandler(pub S3Provider);

impl S3Handler for S3GateHandler {
    fn handle_operation(
        &self,
        op: S3Operation,
        parts: http::request::Parts,
        body: Bytes,
        ctx: RoutingContext,
    ) -> HandlerFuture {
        let provider = self.0.clone();
        Box::pin(async move { handle(&provider, op, &parts, body, &ctx) })
    }
}

fn handle(
    provider: &S3Provider,
    op: S3Operation,
    parts: &http::request::Parts,
    body: Bytes,
    ctx: &RoutingContext,
) -> Result<http::Response<S3ResponseBody>, S3Error> {
    match op {
        S3Operation::ListBuckets => provider.handle_list_buckets().into_s3_response(),
        S3Operation::CreateBucket => {
            let location = provider.handle_create_bucket(require_bucket(ctx)?)?;
            created_bucket_response(&location)
        }
        S3Operation::DeleteBucket => {
            provider.handle_delete_bucket(require_bucket(ctx)?)?;
            empty_response(StatusCode::NO_CONTENT)
        }
        S3Operation::HeadBucket => {
            let region = provider.handle_head_bucket(require_bucket(ctx)?)?;
            let mut response = empty_response(StatusCode::OK)?;
            if let Ok(hv) = http::HeaderValue::from_str(&region) {
                response.headers_mut().insert("x-amz-bucket-region", hv);
            }
            Ok(response)
        }
        S3Operation::GetBucketLocation => provider
            .handle_get_bucket_location(require_bucket(ctx)?)?
            .into_s3_response(),
        S3Operation::ListObjects => {
            let input = ListObjectsInput::from_query(require_bucket(ctx)?, &query_map(ctx));
            provider.handle_list_objects(input)?.into_s3_response()
        }
        S3Operation::ListObjectsV2 => {
            let input = ListObjectsV2Input::from_query(require_bucket(ctx)?, &query_map(ctx));
            provider.handle_list_objects_v2(input)?.into_s3_response()
        }
        S3Operation::PutObject => {
            let content_type = parts
                .headers
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(ToOwned::to_owned);
            let etag = provider.handle_put_object(
                require_bucket(ctx)?,
                require_key(ctx)?,
                body,
                content_type,
            )?;
            etag_response(&etag)
        }
        S3Operation::GetObject => {
            let object = provider.handle_get_object(require_bucket(ctx)?, require_key(ctx)?)?;
            object_response(object, true)
        }
        S3Operation::HeadObject => {
            let object = provider.handle_head_object(require_bucket(ctx)?, require_key(ctx)?)?;
            object_response(object, false)
        }
        S3Operation::DeleteObject => {
            provider.handle_delete_object(require_bucket(ctx)?, require_key(ctx)?)?;
            empty_response(StatusCode::NO_CONTENT)
        }
    }
}

fn require_bucket(ctx: &RoutingContext) -> Result<&str, S3Error> {
    ctx.bucket.as_deref().ok_or_else(|| {
        S3Error::with_message(S3ErrorCode::InvalidRequest, "Missing bucket name")
    })
}

fn require_key(ctx: &RoutingContext) -> Result<&str, S3Error> {
    ctx.key
        .as_deref()
        .ok_or_else(|| S3Error::with_message(S3ErrorCode::InvalidRequest, "Missing object key"))
}

/// First value wins for repeated parameters.
fn query_map(ctx: &RoutingContext) -> HashMap<String, String> {
    let mut map = HashMap::with_capacity(ctx.query_params.len());
    for (k, v) in &ctx.query_params {
        map.entry(k.clone()).or_insert_with(|| v.clone());
    }
    map
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use http_body_util::BodyExt;
    use s3gate_core::ServerConfig;
    use s3gate_http::router::S3Router;

    use super::*;

    fn provider() -> S3Provider {
        let provider = S3Provider::new(ServerConfig::default());
        provider.handle_create_bucket("bucket-a").expect("create");
        provider
    }

    async fn call(
        provider: &S3Provider,
        method: http::Method,
        host: &str,
        uri: &str,
        body: &'static [u8],
    ) -> http::Response<S3ResponseBody> {
        let router = S3Router::new(Arc::new(provider.endpoint_config()));
        let req = http::Request::builder()
            .method(method)
            .uri(uri)
            .header("Host", host)
            .header("Content-Type", "text/plain")
            .body(())
            .expect("valid request");
        let ctx = router.resolve(&req).expect("route");
        let (parts, ()) = req.into_parts();
        S3GateHandler(provider.clone())
            .handle_operation(ctx.operation, parts, Bytes::from_static(body), ctx)
            .await
            .unwrap_or_else(|err| s3gate_http::error_to_response(&err, "test"))
    }

    async fn body_string(resp: http::Response<S3ResponseBody>) -> String {
        let bytes = resp
            .into_body()
            .collect()
            .await
            .expect("collect")
            .to_bytes();
        String::from_utf8(bytes.to_vec()).expect("utf-8")
    }

    #[tokio::test]
    async fn test_should_list_buckets_on_endpoint_host() {
        let provider = provider();
        let resp = call(&provider, http::Method::GET, "s3.amazonaws.com", "/", b"").await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_string(resp).await;
        assert!(body.contains("<ListAllMyBucketsResult"));
        assert!(body.contains("<Name>bucket-a</Name>"));
    }

    #[tokio::test]
    async fn test_should_put_and_get_object_by_subdomain() {
        let provider = provider();
        let host = "bucket-a.s3.amazonaws.com";
        let resp = call(&provider, http::Method::PUT, host, "/dir/a.txt", b"hello").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().contains_key("ETag"));

        let resp = call(&provider, http::Method::GET, host, "/dir/a.txt", b"").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("Content-Type").and_then(|v| v.to_str().ok()),
            Some("text/plain")
        );
        assert_eq!(body_string(resp).await, "hello");

        let resp = call(&provider, http::Method::GET, host, "/?list-type=2", b"").await;
        let body = body_string(resp).await;
        assert!(body.contains("<Key>dir/a.txt</Key>"));
        assert!(body.contains("<KeyCount>1</KeyCount>"));
    }

    #[tokio::test]
    async fn test_should_create_and_delete_bucket_path_style() {
        let provider = provider();
        let resp = call(&provider, http::Method::PUT, "localhost:4566", "/bucket-b", b"").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("Location").and_then(|v| v.to_str().ok()),
            Some("/bucket-b")
        );
        assert!(provider.state().bucket_exists("bucket-b"));

        let resp =
            call(&provider, http::Method::DELETE, "localhost:4566", "/bucket-b", b"").await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert!(!provider.state().bucket_exists("bucket-b"));
    }

    #[tokio::test]
    async fn test_should_report_missing_bucket_for_unknown_bare_host() {
        let provider = provider();
        let resp = call(&provider, http::Method::GET, "bucket-zzz", "/", b"").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(body_string(resp).await.contains("<Code>NoSuchBucket</Code>"));
    }

    #[tokio::test]
    async fn test_should_head_bucket_with_region() {
        let provider = provider();
        let resp = call(&provider, http::Method::HEAD, "bucket-a", "/", b"").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()
                .get("x-amz-bucket-region")
                .and_then(|v| v.to_str().ok()),
            Some("us-east-1")
        );
    }
}
