//! Process-wide endpoint configuration consumed by host resolution.

use std::fmt;
use std::sync::Arc;

use crate::config::ServerConfig;
use crate::registry::{BucketRegistry, StaticBucketRegistry};

/// Service endpoint used when none is configured.
pub const DEFAULT_SERVICE_ENDPOINT: &str = "s3.amazonaws.com";

/// Immutable endpoint settings plus a live view of the bucket registry.
///
/// The endpoint hostname is stored normalized: lowercase, non-empty and
/// without a trailing dot.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use s3gate_core::{EndpointConfig, StaticBucketRegistry};
///
/// let registry: StaticBucketRegistry = ["bucket-a"].into_iter().collect();
/// let endpoint = EndpointConfig::new("S3.Example.COM.", Arc::new(registry));
/// assert_eq!(endpoint.service_endpoint(), "s3.example.com");
/// assert!(endpoint.vhost_buckets_enabled());
/// assert!(endpoint.is_known_bucket("bucket-a"));
/// ```
#[derive(Clone)]
pub struct EndpointConfig {
    service_endpoint: String,
    vhost_buckets: bool,
    registry: Arc<dyn BucketRegistry>,
}

impl fmt::Debug for EndpointConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointConfig")
            .field("service_endpoint", &self.service_endpoint)
            .field("vhost_buckets", &self.vhost_buckets)
            .finish_non_exhaustive()
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_SERVICE_ENDPOINT,
            Arc::new(StaticBucketRegistry::new()),
        )
    }
}

impl EndpointConfig {
    /// Create an endpoint config with virtual-host addressing enabled.
    ///
    /// An empty (or all-dots) endpoint falls back to
    /// [`DEFAULT_SERVICE_ENDPOINT`].
    #[must_use]
    pub fn new(service_endpoint: impl AsRef<str>, registry: Arc<dyn BucketRegistry>) -> Self {
        Self {
            service_endpoint: normalize_endpoint(service_endpoint.as_ref()),
            vhost_buckets: true,
            registry,
        }
    }

    /// Build the endpoint config from server settings.
    ///
    /// [`ServerConfig::service_host`] is used verbatim. Otherwise a custom
    /// domain `D` in [`ServerConfig::service_endpoint`] yields the endpoint
    /// `s3.D`.
    #[must_use]
    pub fn from_server_config(config: &ServerConfig, registry: Arc<dyn BucketRegistry>) -> Self {
        let endpoint = if let Some(host) = config.service_host.as_deref() {
            host.to_owned()
        } else {
            match config.service_endpoint.as_deref().map(normalize_endpoint) {
                Some(domain) if domain != DEFAULT_SERVICE_ENDPOINT => format!("s3.{domain}"),
                _ => DEFAULT_SERVICE_ENDPOINT.to_owned(),
            }
        };
        Self::new(endpoint, registry).with_vhost_buckets(config.vhost_buckets)
    }

    /// Enable or disable bare virtual-host addressing.
    #[must_use]
    pub fn with_vhost_buckets(mut self, enabled: bool) -> Self {
        self.vhost_buckets = enabled;
        self
    }

    /// The normalized service endpoint hostname.
    #[must_use]
    pub fn service_endpoint(&self) -> &str {
        &self.service_endpoint
    }

    /// Whether a bare `Host` header is treated as a bucket name.
    #[must_use]
    pub fn vhost_buckets_enabled(&self) -> bool {
        self.vhost_buckets
    }

    /// Whether `name` is currently a registered bucket.
    #[must_use]
    pub fn is_known_bucket(&self, name: &str) -> bool {
        self.registry.contains_bucket(name)
    }
}

fn normalize_endpoint(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('.');
    if trimmed.is_empty() {
        DEFAULT_SERVICE_ENDPOINT.to_owned()
    } else {
        trimmed.to_ascii_lowercase()
    }
}
