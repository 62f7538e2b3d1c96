//! Integration tests for the s3gate server.
//!
//! `test_vhost` starts a server in-process on a free port and drives it with
//! raw HTTP, setting the `Host` header by hand. `test_sdk` targets a server
//! already running at `localhost:4566` and is marked `#[ignore]`:
//!
//! ```text
//! S3_CONFIGURE_BUCKETS=bucket-a,bucket-b s3gate-server &
//! cargo test -p s3gate-integration -- --ignored
//! ```

use std::sync::Once;

use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use s3gate_core::{BucketSeed, ServerConfig};
use s3gate_server::RunningServer;

mod test_sdk;
mod test_vhost;

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Start an in-process server on `127.0.0.1:0` with the given seed buckets.
pub async fn start_server(buckets: &[&str], vhost_buckets: bool) -> RunningServer {
    let config = ServerConfig::builder()
        .gateway_listen("127.0.0.1:0".to_owned())
        .vhost_buckets(vhost_buckets)
        .configure_buckets(buckets.iter().copied().map(BucketSeed::new).collect())
        .build();
    start_server_with(config).await
}

/// Start an in-process server from a full configuration.
pub async fn start_server_with(config: ServerConfig) -> RunningServer {
    init_tracing();
    s3gate_server::spawn(config).await.expect("server should start")
}

/// Send a request to `server` with an explicit `Host` header.
pub async fn send(
    server: &RunningServer,
    method: reqwest::Method,
    host: &str,
    path: &str,
    body: Option<&'static str>,
) -> reqwest::Response {
    let client = reqwest::Client::new();
    let mut request = client
        .request(method, format!("{}{path}", server.base_url()))
        .header(reqwest::header::HOST, host);
    if let Some(body) = body {
        request = request.body(body);
    }
    request.send().await.expect("request should be sent")
}

/// Endpoint URL for an externally running server.
fn endpoint_url() -> String {
    std::env::var("S3_ENDPOINT_URL").unwrap_or_else(|_| "http://localhost:4566".to_owned())
}

/// A path-style S3 client for an externally running server.
#[must_use]
pub fn s3_client() -> aws_sdk_s3::Client {
    init_tracing();

    let creds = Credentials::new("test", "test", None, None, "integration-test");

    let config = aws_sdk_s3::config::Builder::new()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(creds)
        .endpoint_url(endpoint_url())
        .force_path_style(true)
        .build();

    aws_sdk_s3::Client::from_conf(config)
}

/// A unique bucket name for a test.
#[must_use]
pub fn test_bucket_name(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().simple().to_string()[..8].to_owned();
    format!("test-{prefix}-{id}")
}
