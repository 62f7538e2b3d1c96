//! The hyper service.
//!
//! [`S3HttpService`] runs every request through the same pipeline:
//!
//! 1. Health probes (`GET /_health`, `GET /_localstack/health`)
//! 2. CORS preflight (`OPTIONS`)
//! 3. Routing via [`S3Router`]
//! 4. Body collection
//! 5. Dispatch to the [`S3Handler`]
//! 6. Common response headers (`x-amz-request-id`, `x-amz-id-2`, `Server`)

use std::convert::Infallible;
use std::fmt::Display;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderValue};
use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper::service::Service;
use s3gate_core::EndpointConfig;
use s3gate_core::utils::generate_request_id;
use s3gate_model::error::S3Error;
use tracing::{debug, error, info, warn};

use crate::body::S3ResponseBody;
use crate::dispatch::{S3Handler, dispatch_operation};
use crate::response::error_to_response;
use crate::router::S3Router;

const SERVER_NAME: &str = "s3gate";

/// Configuration for the HTTP service.
#[derive(Debug, Clone)]
pub struct S3HttpConfig {
    /// Host resolution settings and the live bucket registry.
    pub endpoint: EndpointConfig,
    /// The region reported by health probes.
    pub region: String,
}

impl Default for S3HttpConfig {
    fn default() -> Self {
        Self {
            endpoint: EndpointConfig::default(),
            region: "us-east-1".to_owned(),
        }
    }
}

/// S3 over HTTP, generic over the business logic handler.
#[derive(Debug)]
pub struct S3HttpService<H: S3Handler> {
    handler: Arc<H>,
    router: S3Router,
    config: Arc<S3HttpConfig>,
}

impl<H: S3Handler> S3HttpService<H> {
    /// Create a service that owns its handler.
    #[must_use]
    pub fn new(handler: H, config: S3HttpConfig) -> Self {
        Self::from_shared(Arc::new(handler), config)
    }

    /// Create a service around a shared handler.
    #[must_use]
    pub fn from_shared(handler: Arc<H>, config: S3HttpConfig) -> Self {
        let router = S3Router::new(Arc::new(config.endpoint.clone()));
        Self {
            handler,
            router,
            config: Arc::new(config),
        }
    }

    /// The router requests are resolved with.
    #[must_use]
    pub fn router(&self) -> &S3Router {
        &self.router
    }

    /// Run one request through the pipeline without a connection.
    pub async fn handle<B>(&self, req: http::Request<B>) -> http::Response<S3ResponseBody>
    where
        B: http_body::Body<Data = Bytes> + Send,
        B::Error: Display,
    {
        let request_id = generate_request_id();
        let response =
            process_request(req, self.handler.as_ref(), &self.router, &self.config, &request_id)
                .await;
        add_common_headers(response, &request_id)
    }
}

impl<H: S3Handler> Clone for S3HttpService<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            router: self.router.clone(),
            config: Arc::clone(&self.config),
        }
    }
}

impl<H: S3Handler> Service<http::Request<Incoming>> for S3HttpService<H> {
    type Response = http::Response<S3ResponseBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<Incoming>) -> Self::Future {
        let service = self.clone();
        Box::pin(async move { Ok(service.handle(req).await) })
    }
}

async fn process_request<B, H>(
    req: http::Request<B>,
    handler: &H,
    router: &S3Router,
    config: &S3HttpConfig,
    request_id: &str,
) -> http::Response<S3ResponseBody>
where
    B: http_body::Body<Data = Bytes> + Send,
    B::Error: Display,
    H: S3Handler,
{
    let method = req.method().clone();
    let uri = req.uri().clone();
    debug!(%method, %uri, request_id, "processing S3 request");

    if is_health_check(&method, uri.path()) {
        return health_check_response(&config.region);
    }

    if method == http::Method::OPTIONS {
        return cors_preflight_response();
    }

    let ctx = match router.resolve(&req) {
        Ok(ctx) => ctx,
        Err(err) => {
            warn!(%method, %uri, error = %err, request_id, "failed to route S3 request");
            return error_to_response(&err, request_id);
        }
    };

    info!(
        operation = %ctx.operation,
        bucket = ?ctx.bucket,
        key = ?ctx.key,
        request_id,
        "routed S3 request"
    );

    let (parts, body) = req.into_parts();
    let body = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) => {
            error!(error = %err, request_id, "failed to collect request body");
            let s3_err = S3Error::internal_error("Failed to read request body");
            return error_to_response(&s3_err, request_id);
        }
    };

    match dispatch_operation(handler, parts, body, ctx).await {
        Ok(response) => response,
        Err(err) => {
            debug!(error = %err, request_id, "S3 operation returned error");
            error_to_response(&err, request_id)
        }
    }
}

fn is_health_check(method: &http::Method, path: &str) -> bool {
    *method == http::Method::GET && (path == "/_health" || path == "/_localstack/health")
}

fn health_check_response(region: &str) -> http::Response<S3ResponseBody> {
    let body = serde_json::json!({
        "status": "running",
        "service": "s3",
        "region": region,
    });
    let mut response = http::Response::new(S3ResponseBody::from_string(body.to_string()));
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

fn cors_preflight_response() -> http::Response<S3ResponseBody> {
    let mut response = http::Response::new(S3ResponseBody::empty());
    let headers = response.headers_mut();
    headers.insert(
        "Access-Control-Allow-Origin",
        HeaderValue::from_static("*"),
    );
    headers.insert(
        "Access-Control-Allow-Methods",
        HeaderValue::from_static("GET, PUT, DELETE, HEAD, OPTIONS"),
    );
    headers.insert(
        "Access-Control-Allow-Headers",
        HeaderValue::from_static("*, Authorization, Content-Type, x-amz-*"),
    );
    headers.insert("Access-Control-Max-Age", HeaderValue::from_static("86400"));
    response
}

fn add_common_headers(
    mut response: http::Response<S3ResponseBody>,
    request_id: &str,
) -> http::Response<S3ResponseBody> {
    let headers = response.headers_mut();

    if let Ok(hv) = HeaderValue::from_str(request_id) {
        headers.insert("x-amz-request-id", hv.clone());
        headers.insert("x-amz-id-2", hv);
    }
    headers.insert("Server", HeaderValue::from_static(SERVER_NAME));
    headers.insert(
        "Access-Control-Allow-Origin",
        HeaderValue::from_static("*"),
    );
    headers.insert(
        "Access-Control-Expose-Headers",
        HeaderValue::from_static("x-amz-request-id, x-amz-id-2, ETag"),
    );

    response
}
