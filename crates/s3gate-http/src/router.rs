//! S3 request routing.
//!
//! Routing runs in three steps:
//!
//! 1. [`crate::host::classify`] turns the `Host` header into a [`ResolvedTarget`].
//! 2. [`route`] (virtual-host addressing) or [`route_path_style`] splits the
//!    path into the part consumed by addressing and the residual object key,
//!    giving a [`RoutedRequest`].
//! 3. [`identify_operation`] picks the [`S3Operation`] from the scope, the
//!    method and the query string.
//!
//! [`S3Router`] runs all three against an `http::Request`.

use std::sync::Arc;

use http::Method;
use percent_encoding::percent_decode_str;
use s3gate_core::EndpointConfig;
use s3gate_model::error::S3Error;
use s3gate_model::operations::S3Operation;
use tracing::debug;

use crate::host::{self, HostStyle, InvalidHostError, ResolvedTarget};

/// What a routed request operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteScope {
    /// The account: list buckets.
    Service,
    /// A bucket as a whole.
    Bucket,
    /// One object inside a bucket.
    Object,
}

/// A request after addressing has been resolved.
///
/// `residual_path` never contains the bucket segment captured by `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutedRequest {
    /// The addressed target.
    pub target: ResolvedTarget,
    /// What is left of the path: the raw object key for object requests,
    /// empty for bucket requests, the original path for account requests.
    pub residual_path: String,
    /// The HTTP method.
    pub method: Method,
    /// What the request operates on.
    pub scope: RouteScope,
}

/// Combine a host-resolved target with the request path.
///
/// # Examples
///
/// ```
/// use http::Method;
/// use s3gate_http::host::ResolvedTarget;
/// use s3gate_http::router::{RouteScope, route};
///
/// let target = ResolvedTarget::BucketLevel { bucket: "bucket-a".to_owned() };
/// let routed = route(target, "/", &Method::GET);
/// assert_eq!(routed.scope, RouteScope::Bucket);
/// assert_eq!(routed.residual_path, "");
/// ```
#[must_use]
pub fn route(target: ResolvedTarget, path: &str, method: &Method) -> RoutedRequest {
    match target {
        ResolvedTarget::AccountLevel => RoutedRequest {
            target,
            residual_path: path.to_owned(),
            method: method.clone(),
            scope: RouteScope::Service,
        },
        ResolvedTarget::BucketLevel { .. } => {
            let (residual_path, scope) = if path.is_empty() || path == "/" {
                (String::new(), RouteScope::Bucket)
            } else {
                let key = path.strip_prefix('/').unwrap_or(path);
                (key.to_owned(), RouteScope::Object)
            };
            RoutedRequest {
                target,
                residual_path,
                method: method.clone(),
                scope,
            }
        }
    }
}

/// Route a path-style request: `/{bucket}` or `/{bucket}/{key...}`.
///
/// A path without a bucket segment routes to the account.
#[must_use]
pub fn route_path_style(path: &str, method: &Method) -> RoutedRequest {
    let Some((bucket, rest)) = split_bucket_segment(path) else {
        return route(ResolvedTarget::AccountLevel, path, method);
    };

    let target = ResolvedTarget::BucketLevel { bucket };
    match rest {
        Some(key) if !key.is_empty() => RoutedRequest {
            target,
            residual_path: key.to_owned(),
            method: method.clone(),
            scope: RouteScope::Object,
        },
        _ => RoutedRequest {
            target,
            residual_path: String::new(),
            method: method.clone(),
            scope: RouteScope::Bucket,
        },
    }
}

/// Split `/{bucket}/{rest}` into the decoded bucket and the raw rest.
fn split_bucket_segment(path: &str) -> Option<(String, Option<&str>)> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.split_once('/') {
        Some((bucket, rest)) => Some((decode_uri_component(bucket), Some(rest))),
        None => Some((decode_uri_component(trimmed), None)),
    }
}

/// Sub-resources s3gate recognizes but does not serve.
const UNSUPPORTED_SUBRESOURCES: &[&str] = &[
    "accelerate",
    "acl",
    "analytics",
    "attributes",
    "cors",
    "delete",
    "encryption",
    "intelligent-tiering",
    "inventory",
    "legal-hold",
    "lifecycle",
    "logging",
    "metrics",
    "notification",
    "object-lock",
    "ownershipControls",
    "partNumber",
    "policy",
    "policyStatus",
    "publicAccessBlock",
    "replication",
    "requestPayment",
    "restore",
    "retention",
    "select",
    "tagging",
    "torrent",
    "uploadId",
    "uploads",
    "versionId",
    "versioning",
    "versions",
    "website",
];

/// Identify the S3 operation for a routed request.
///
/// # Errors
///
/// - `NotImplemented` for a recognized but unsupported sub-resource.
/// - `MethodNotAllowed` for a method the scope does not accept.
pub fn identify_operation(
    routed: &RoutedRequest,
    query_params: &[(String, String)],
) -> Result<S3Operation, S3Error> {
    let method = &routed.method;

    if routed.scope == RouteScope::Service {
        return if *method == Method::GET {
            Ok(S3Operation::ListBuckets)
        } else {
            Err(S3Error::method_not_allowed(method.as_str()))
        };
    }

    if let Some(sub) = UNSUPPORTED_SUBRESOURCES
        .iter()
        .find(|sub| query_has_key(query_params, sub))
    {
        return Err(S3Error::not_implemented(format!(
            "{method} with ?{sub} is not supported"
        )));
    }

    match (routed.scope, method) {
        (RouteScope::Bucket, &Method::GET) => Ok(identify_bucket_get(query_params)),
        (RouteScope::Bucket, &Method::PUT) => Ok(S3Operation::CreateBucket),
        (RouteScope::Bucket, &Method::DELETE) => Ok(S3Operation::DeleteBucket),
        (RouteScope::Bucket, &Method::HEAD) => Ok(S3Operation::HeadBucket),
        (RouteScope::Object, &Method::GET) => Ok(S3Operation::GetObject),
        (RouteScope::Object, &Method::PUT) => Ok(S3Operation::PutObject),
        (RouteScope::Object, &Method::HEAD) => Ok(S3Operation::HeadObject),
        (RouteScope::Object, &Method::DELETE) => Ok(S3Operation::DeleteObject),
        _ => Err(S3Error::method_not_allowed(method.as_str())),
    }
}

fn identify_bucket_get(params: &[(String, String)]) -> S3Operation {
    if query_value(params, "list-type") == Some("2") {
        return S3Operation::ListObjectsV2;
    }
    if query_has_key(params, "location") {
        return S3Operation::GetBucketLocation;
    }
    S3Operation::ListObjects
}

/// The result of routing an HTTP request to an S3 operation.
#[derive(Debug, Clone)]
pub struct RoutingContext {
    /// The addressed bucket, if any.
    pub bucket: Option<String>,
    /// The percent-decoded object key, if any.
    pub key: Option<String>,
    /// The identified S3 operation.
    pub operation: S3Operation,
    /// Decoded query parameters in request order.
    pub query_params: Vec<(String, String)>,
    /// The addressing decision behind `bucket` and `key`.
    pub routed: RoutedRequest,
}

impl RoutingContext {
    /// Look up a query parameter by name.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<&str> {
        query_value(&self.query_params, name)
    }
}

/// Routes `http::Request`s against a shared endpoint configuration.
#[derive(Debug, Clone)]
pub struct S3Router {
    endpoint: Arc<EndpointConfig>,
}

impl S3Router {
    /// Create a router for the given endpoint configuration.
    #[must_use]
    pub fn new(endpoint: Arc<EndpointConfig>) -> Self {
        Self { endpoint }
    }

    /// The endpoint configuration this router resolves against.
    #[must_use]
    pub fn endpoint(&self) -> &EndpointConfig {
        &self.endpoint
    }

    /// Resolve an HTTP request to a routing context.
    ///
    /// The host comes from the `Host` header, or from the URI authority when
    /// the header is absent (HTTP/2, absolute-form requests).
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if the host is missing, empty or malformed.
    /// - Any error from [`identify_operation`].
    pub fn resolve<B>(&self, req: &http::Request<B>) -> Result<RoutingContext, S3Error> {
        let raw_host = request_host(req)
            .map_err(invalid_host)?
            .ok_or_else(|| invalid_host(InvalidHostError::Empty))?;
        let (target, style) = host::classify(raw_host, &self.endpoint).map_err(invalid_host)?;

        let path = req.uri().path();
        let path_style = match &target {
            ResolvedTarget::AccountLevel => true,
            ResolvedTarget::BucketLevel { bucket } => {
                style == HostStyle::BareVhost && self.prefers_path_style(bucket, path)
            }
        };
        let routed = if path_style {
            route_path_style(path, req.method())
        } else {
            route(target, path, req.method())
        };

        let query_params = parse_query_params(req.uri().query().unwrap_or(""));
        let operation = identify_operation(&routed, &query_params)?;

        let bucket = routed.target.bucket().map(ToOwned::to_owned);
        let key = (routed.scope == RouteScope::Object)
            .then(|| decode_uri_component(&routed.residual_path));

        debug!(
            host = %raw_host,
            style = ?style,
            bucket = ?bucket,
            key = ?key,
            operation = %operation,
            "request routed"
        );

        Ok(RoutingContext {
            bucket,
            key,
            operation,
            query_params,
            routed,
        })
    }

    /// A bare-vhost bucket that does not exist yields to a path whose first
    /// segment names an existing bucket.
    fn prefers_path_style(&self, host_bucket: &str, path: &str) -> bool {
        if self.endpoint.is_known_bucket(host_bucket) {
            return false;
        }
        split_bucket_segment(path)
            .is_some_and(|(path_bucket, _)| self.endpoint.is_known_bucket(&path_bucket))
    }
}

/// A `Host` header that is present but not visible ASCII is malformed, never
/// absent.
fn request_host<B>(req: &http::Request<B>) -> Result<Option<&str>, InvalidHostError> {
    match req.headers().get(http::header::HOST) {
        Some(value) => value.to_str().map(Some).map_err(|_| {
            InvalidHostError::Malformed(String::from_utf8_lossy(value.as_bytes()).into_owned())
        }),
        None => Ok(req.uri().authority().map(http::uri::Authority::as_str)),
    }
}

fn invalid_host(err: InvalidHostError) -> S3Error {
    S3Error::invalid_argument(err.to_string()).with_source(err)
}

/// Decode a percent-encoded URI component.
fn decode_uri_component(s: &str) -> String {
    percent_decode_str(s).decode_utf8_lossy().into_owned()
}

/// Parse a query string into decoded key-value pairs. `+` means space.
fn parse_query_params(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|s| !s.is_empty())
        .map(|pair| {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            (
                decode_uri_component(&k.replace('+', " ")),
                decode_uri_component(&v.replace('+', " ")),
            )
        })
        .collect()
}

fn query_has_key(params: &[(String, String)], key: &str) -> bool {
    params.iter().any(|(k, _)| k == key)
}

fn query_value<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}
