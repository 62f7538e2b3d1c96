//! Host resolution, request routing and the hyper service for s3gate.
//!
//! - [`host`]: decides from the `Host` header whether a request addresses the
//!   account or a bucket.
//! - [`router`]: splits the path into bucket and key and identifies the S3
//!   operation.
//! - [`dispatch`]: the [`S3Handler`](dispatch::S3Handler) boundary to the
//!   storage provider.
//! - [`response`]: typed outputs and errors to HTTP responses.
//! - [`service`]: [`S3HttpService`](service::S3HttpService), the hyper
//!   `Service` tying it together.
//!
//! # Architecture
//!
//! ```text
//! HTTP Request
//!   -> S3HttpService (hyper Service)
//!     -> Health check / CORS interception
//!     -> S3Router
//!          host::classify   (Host header -> account | bucket)
//!          router::route    (path -> bucket / object scope)
//!          identify_operation
//!     -> Body collection
//!     -> dispatch_operation (S3Handler trait)
//!     -> Common response headers (x-amz-request-id, Server)
//!   <- HTTP Response
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use s3gate_http::dispatch::NotImplementedHandler;
//! use s3gate_http::service::{S3HttpConfig, S3HttpService};
//!
//! let service = S3HttpService::new(NotImplementedHandler, S3HttpConfig::default());
//! // Serve `service` with hyper.
//! ```

// S3Error is large but returned on every routing and dispatch path.
#![allow(clippy::result_large_err)]

pub mod body;
pub mod dispatch;
pub mod host;
pub mod response;
pub mod router;
pub mod service;

pub use body::S3ResponseBody;
pub use dispatch::{NotImplementedHandler, S3Handler};
pub use host::{HostStyle, InvalidHostError, ResolvedTarget};
pub use response::{IntoS3Response, error_to_response};
pub use router::{RouteScope, RoutedRequest, RoutingContext, S3Router};
pub use service::{S3HttpConfig, S3HttpService};
