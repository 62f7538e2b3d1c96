//! Server configuration.
//!
//! Provides [`ServerConfig`], loaded from environment variables at startup.
//! The routing layer never reads it directly; it is turned into an
//! [`EndpointConfig`](crate::EndpointConfig) once and passed down explicitly.

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// A bucket created when the server starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketSeed {
    /// Bucket name.
    pub name: String,
}

impl BucketSeed {
    /// Create a seed for the named bucket.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// s3gate server configuration.
///
/// # Examples
///
/// ```
/// use s3gate_core::config::ServerConfig;
///
/// let config = ServerConfig::default();
/// assert_eq!(config.gateway_listen, "0.0.0.0:4566");
/// assert!(config.vhost_buckets);
/// assert!(config.service_endpoint.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Bind address for the gateway (e.g. `"0.0.0.0:4566"`).
    #[builder(default = String::from("0.0.0.0:4566"))]
    pub gateway_listen: String,

    /// Whether a bare `Host` header (no service-endpoint suffix) names a bucket.
    #[builder(default = true)]
    pub vhost_buckets: bool,

    /// Custom service domain. When set to `example.com` the effective endpoint
    /// is `s3.example.com`; when unset it is `s3.amazonaws.com`.
    #[builder(default, setter(strip_option, into))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_endpoint: Option<String>,

    /// Exact service endpoint hostname, used as-is without the `s3.` prefix.
    /// Takes precedence over `service_endpoint`. Set it to the machine's
    /// hostname to list buckets on `http://<hostname>:<port>/`.
    #[builder(default, setter(strip_option, into))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_host: Option<String>,

    /// Buckets created at startup, in order.
    #[builder(default)]
    #[serde(default)]
    pub configure_buckets: Vec<BucketSeed>,

    /// Region reported by `GetBucketLocation`.
    #[builder(default = String::from("us-east-1"))]
    pub default_region: String,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `GATEWAY_LISTEN` | `0.0.0.0:4566` |
    /// | `S3_VHOST_BUCKETS` | `true` |
    /// | `S3_SERVICE_ENDPOINT` | *(unset)* |
    /// | `S3_SERVICE_HOST` | *(unset)* |
    /// | `S3_CONFIGURE_BUCKETS` | *(empty)*, comma-separated names |
    /// | `DEFAULT_REGION` | `us-east-1` |
    /// | `LOG_LEVEL` | `info` |
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// [`ServerConfig::from_env`] is this function over the process
    /// environment.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = lookup("GATEWAY_LISTEN") {
            config.gateway_listen = v;
        }
        if let Some(v) = lookup("S3_VHOST_BUCKETS") {
            config.vhost_buckets = parse_bool(&v);
        }
        if let Some(v) = lookup("S3_SERVICE_ENDPOINT") {
            let v = v.trim();
            if !v.is_empty() {
                config.service_endpoint = Some(v.to_owned());
            }
        }
        if let Some(v) = lookup("S3_SERVICE_HOST") {
            let v = v.trim();
            if !v.is_empty() {
                config.service_host = Some(v.to_owned());
            }
        }
        if let Some(v) = lookup("S3_CONFIGURE_BUCKETS") {
            config.configure_buckets = parse_bucket_list(&v);
        }
        if let Some(v) = lookup("DEFAULT_REGION") {
            config.default_region = v;
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }
}

/// Parse a string as a boolean, accepting `"1"` and `"true"` (case-insensitive).
fn parse_bool(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

/// Parse a comma-separated bucket list, keeping order and dropping blanks.
fn parse_bucket_list(value: &str) -> Vec<BucketSeed> {
    value
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(BucketSeed::new)
        .collect()
}
