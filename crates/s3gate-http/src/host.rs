//! Host header resolution.
//!
//! Decides from the `Host` header alone whether a request addresses the
//! account (list buckets) or a single bucket. Three addressing styles are
//! recognized against the configured service endpoint `E`:
//!
//! | Host | Target |
//! |------|--------|
//! | `E` | account |
//! | `B.E` | bucket `B` (subdomain style) |
//! | `B` | bucket `B` (bare vhost, when enabled) |
//! | anything else | account (path-style addressing follows) |
//!
//! Resolution is pure: it never consults the bucket registry.

use std::net::Ipv4Addr;

use s3gate_core::EndpointConfig;
use s3gate_core::validation::validate_bucket_name;

/// A `Host` header that cannot be resolved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidHostError {
    /// Nothing left after stripping whitespace, port and trailing dots.
    #[error("Host header is empty")]
    Empty,
    /// The host contains characters no hostname may contain.
    #[error("Host header is malformed: {0}")]
    Malformed(String),
}

/// What a `Host` header addresses.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResolvedTarget {
    /// The service root; the request operates on the account.
    AccountLevel,
    /// A single bucket named by the host.
    BucketLevel {
        /// The bucket name exactly as the host yielded it.
        bucket: String,
    },
}

impl ResolvedTarget {
    /// The bucket name, if this is [`ResolvedTarget::BucketLevel`].
    #[must_use]
    pub fn bucket(&self) -> Option<&str> {
        match self {
            Self::AccountLevel => None,
            Self::BucketLevel { bucket } => Some(bucket),
        }
    }
}

/// Which rule produced a [`ResolvedTarget`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostStyle {
    /// The host is the service endpoint itself.
    Endpoint,
    /// The host is `<bucket>.<endpoint>`.
    Subdomain,
    /// The whole host is taken as the bucket name.
    BareVhost,
    /// No rule matched.
    Fallback,
}

/// Resolve a raw `Host` header value against the endpoint configuration.
///
/// # Errors
///
/// Returns [`InvalidHostError`] if the header is empty or malformed.
///
/// # Examples
///
/// ```
/// use s3gate_core::EndpointConfig;
/// use s3gate_http::host::{ResolvedTarget, resolve};
///
/// let config = EndpointConfig::default();
/// assert_eq!(
///     resolve("bucket-a.s3.amazonaws.com", &config).unwrap(),
///     ResolvedTarget::BucketLevel { bucket: "bucket-a".to_owned() }
/// );
/// assert_eq!(
///     resolve("s3.amazonaws.com:443", &config).unwrap(),
///     ResolvedTarget::AccountLevel
/// );
/// ```
pub fn resolve(
    raw_host: &str,
    config: &EndpointConfig,
) -> Result<ResolvedTarget, InvalidHostError> {
    classify(raw_host, config).map(|(target, _)| target)
}

/// Like [`resolve`], also reporting which rule matched.
///
/// # Errors
///
/// Returns [`InvalidHostError`] if the header is empty or malformed.
pub fn classify(
    raw_host: &str,
    config: &EndpointConfig,
) -> Result<(ResolvedTarget, HostStyle), InvalidHostError> {
    let host = normalize_host(raw_host)?;
    let endpoint = config.service_endpoint();

    if host == endpoint {
        return Ok((ResolvedTarget::AccountLevel, HostStyle::Endpoint));
    }

    if let Some(bucket) = subdomain_bucket(&host, endpoint) {
        return Ok((
            ResolvedTarget::BucketLevel {
                bucket: bucket.to_owned(),
            },
            HostStyle::Subdomain,
        ));
    }

    if config.vhost_buckets_enabled() && is_bare_bucket_token(&host) {
        return Ok((
            ResolvedTarget::BucketLevel { bucket: host },
            HostStyle::BareVhost,
        ));
    }

    Ok((ResolvedTarget::AccountLevel, HostStyle::Fallback))
}

/// Normalize a raw `Host` value: trim, drop the port, drop trailing dots,
/// lowercase.
///
/// # Errors
///
/// Returns [`InvalidHostError`] if nothing is left or the remainder contains
/// characters outside `[a-z0-9.-_[]:]`.
pub fn normalize_host(raw_host: &str) -> Result<String, InvalidHostError> {
    let trimmed = raw_host.trim();
    let host =
        strip_port(trimmed).ok_or_else(|| InvalidHostError::Malformed(trimmed.to_owned()))?;
    let host = host.trim_end_matches('.').to_ascii_lowercase();

    if host.is_empty() {
        return Err(InvalidHostError::Empty);
    }
    if !host.bytes().all(is_host_byte) {
        return Err(InvalidHostError::Malformed(trimmed.to_owned()));
    }
    Ok(host)
}

/// Strip `:<digits>` from a host. Returns `None` for a bracketed literal
/// followed by anything other than a port.
fn strip_port(host: &str) -> Option<&str> {
    if host.starts_with('[') {
        let end = host.find(']')?;
        let (literal, rest) = host.split_at(end + 1);
        return match rest.strip_prefix(':') {
            None if rest.is_empty() => Some(literal),
            Some(port) if port.bytes().all(|b| b.is_ascii_digit()) => Some(literal),
            _ => None,
        };
    }

    match host.rsplit_once(':') {
        // Several colons without brackets: an IPv6 literal, no port.
        Some((name, _)) if name.contains(':') => Some(host),
        Some((name, port)) if port.bytes().all(|b| b.is_ascii_digit()) => Some(name),
        Some(_) => None,
        None => Some(host),
    }
}

fn is_host_byte(b: u8) -> bool {
    b.is_ascii_lowercase()
        || b.is_ascii_digit()
        || matches!(b, b'.' | b'-' | b'_' | b'[' | b']' | b':')
}

/// `B` when `host` is `B.endpoint` with a non-empty `B`.
fn subdomain_bucket<'a>(host: &'a str, endpoint: &str) -> Option<&'a str> {
    let prefix = host.strip_suffix(endpoint)?.strip_suffix('.')?;
    (!prefix.is_empty()).then_some(prefix)
}

fn is_ip_literal(host: &str) -> bool {
    host.contains(':') || host.starts_with('[') || host.parse::<Ipv4Addr>().is_ok()
}

/// Whether a whole host may be read as a bucket name.
fn is_bare_bucket_token(host: &str) -> bool {
    if host == "localhost" || is_ip_literal(host) {
        return false;
    }
    !host.contains('.') || validate_bucket_name(host).is_ok()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use s3gate_core::{BucketRegistry, ServerConfig, StaticBucketRegistry};

    use super::*;

    fn registry() -> Arc<dyn BucketRegistry> {
        Arc::new(["bucket-a"].into_iter().collect::<StaticBucketRegistry>())
    }

    fn config() -> EndpointConfig {
        EndpointConfig::new("s3.amazonaws.com", registry())
    }

    fn bucket(name: &str) -> ResolvedTarget {
        ResolvedTarget::BucketLevel {
            bucket: name.to_owned(),
        }
    }

    fn ok(host: &str, config: &EndpointConfig) -> ResolvedTarget {
        resolve(host, config).unwrap_or_else(|e| panic!("resolve({host}) failed: {e}"))
    }

    // --- Normalization ---

    #[test]
    fn test_should_strip_port_and_lowercase() {
        assert_eq!(
            normalize_host("Bucket-A.S3.AmazonAWS.com:4566").unwrap(),
            "bucket-a.s3.amazonaws.com"
        );
        assert_eq!(
            normalize_host("  s3.amazonaws.com  ").unwrap(),
            "s3.amazonaws.com"
        );
        assert_eq!(normalize_host("s3.amazonaws.com.").unwrap(), "s3.amazonaws.com");
    }

    #[test]
    fn test_should_keep_ipv6_brackets() {
        assert_eq!(normalize_host("[::1]:4566").unwrap(), "[::1]");
        assert_eq!(normalize_host("[::1]").unwrap(), "[::1]");
        assert_eq!(normalize_host("::1").unwrap(), "::1");
    }

    #[test]
    fn test_should_reject_empty_host() {
        assert_eq!(normalize_host(""), Err(InvalidHostError::Empty));
        assert_eq!(normalize_host("   "), Err(InvalidHostError::Empty));
        assert_eq!(normalize_host(":4566"), Err(InvalidHostError::Empty));
        assert_eq!(normalize_host("."), Err(InvalidHostError::Empty));
        assert_eq!(resolve("", &config()), Err(InvalidHostError::Empty));
    }

    #[test]
    fn test_should_reject_malformed_host() {
        for host in ["bucket/a", "user@host", "bad host", "host:port", "[::1]x"] {
            assert!(
                matches!(normalize_host(host), Err(InvalidHostError::Malformed(_))),
                "{host} should be malformed"
            );
        }
    }

    // --- Scenarios ---

    #[test]
    fn test_should_resolve_subdomain_bucket() {
        assert_eq!(ok("bucket-a.s3.amazonaws.com", &config()), bucket("bucket-a"));
    }

    #[test]
    fn test_should_resolve_bare_vhost_when_enabled() {
        assert_eq!(ok("bucket-a", &config()), bucket("bucket-a"));
    }

    #[test]
    fn test_should_fall_back_when_vhost_disabled() {
        let config = config().with_vhost_buckets(false);
        assert_eq!(ok("bucket-a", &config), ResolvedTarget::AccountLevel);
    }

    #[test]
    fn test_should_resolve_custom_domain_endpoint() {
        let server = ServerConfig::builder().service_endpoint("example.com").build();
        let config = EndpointConfig::from_server_config(&server, registry());
        assert_eq!(ok("s3.example.com", &config), ResolvedTarget::AccountLevel);
        assert_eq!(ok("bucket-a.s3.example.com", &config), bucket("bucket-a"));
    }

    #[test]
    fn test_should_resolve_machine_hostname_endpoint() {
        let config = EndpointConfig::new("build-host-01", registry());
        assert_eq!(ok("build-host-01:4566", &config), ResolvedTarget::AccountLevel);
        assert_eq!(ok("bucket-a.build-host-01", &config), bucket("bucket-a"));
    }

    // --- Laws ---

    #[test]
    fn test_should_be_idempotent() {
        let config = config();
        for host in [
            "bucket-a.s3.amazonaws.com",
            "bucket-a",
            "s3.amazonaws.com",
            "127.0.0.1:4566",
            "",
            "bad host",
        ] {
            assert_eq!(resolve(host, &config), resolve(host, &config));
        }
    }

    #[test]
    fn test_should_prefer_subdomain_over_bare_vhost() {
        let config = config();
        let (target, style) = classify("my.bucket.s3.amazonaws.com", &config).unwrap();
        assert_eq!(target, bucket("my.bucket"));
        assert_eq!(style, HostStyle::Subdomain);
    }

    #[test]
    fn test_should_anchor_suffix_on_dot() {
        let config = config();
        assert_eq!(ok("bucket-a.s3.amazonaws.com", &config), bucket("bucket-a"));
        assert_ne!(
            ok("bucket-a.s3.amazonaws.com.evil.com", &config),
            bucket("bucket-a")
        );
        // No dot boundary before the endpoint.
        assert_ne!(ok("evils3.amazonaws.com", &config), bucket("evil"));
        assert_eq!(
            classify("evils3.amazonaws.com", &config).unwrap().1,
            HostStyle::BareVhost
        );
    }

    #[test]
    fn test_should_reject_spoofed_suffix_with_vhost_disabled() {
        let config = config().with_vhost_buckets(false);
        assert_eq!(
            ok("bucket-a.s3.amazonaws.com.evil.com", &config),
            ResolvedTarget::AccountLevel
        );
    }

    #[test]
    fn test_should_keep_subdomain_when_vhost_disabled() {
        let config = config().with_vhost_buckets(false);
        assert_eq!(ok("bucket-a.s3.amazonaws.com", &config), bucket("bucket-a"));
        for host in ["bucket-a", "other.example.org", "x"] {
            assert_eq!(ok(host, &config), ResolvedTarget::AccountLevel, "{host}");
        }
    }

    // --- Edge cases ---

    #[test]
    fn test_should_pass_through_odd_subdomain_names() {
        let config = config();
        assert_eq!(ok("bucket_a.s3.amazonaws.com", &config), bucket("bucket_a"));
        assert_eq!(ok("Bucket-A.s3.amazonaws.com", &config), bucket("bucket-a"));
    }

    #[test]
    fn test_should_not_treat_empty_subdomain_as_bucket() {
        let (target, style) = classify(".s3.amazonaws.com", &config()).unwrap();
        assert_eq!(target, ResolvedTarget::AccountLevel);
        assert_eq!(style, HostStyle::Fallback);
    }

    #[test]
    fn test_should_never_take_local_hosts_as_buckets() {
        let config = config();
        for host in ["localhost", "localhost:4566", "127.0.0.1:4566", "[::1]:4566", "::1"] {
            assert_eq!(ok(host, &config), ResolvedTarget::AccountLevel, "{host}");
        }
    }

    #[test]
    fn test_should_only_take_bucket_like_dotted_hosts() {
        let config = config();
        assert_eq!(ok("bucket_a", &config), bucket("bucket_a"));
        assert_eq!(ok("my.bucket", &config), bucket("my.bucket"));
        assert_eq!(ok("my_odd.host.name", &config), ResolvedTarget::AccountLevel);
    }

    #[test]
    fn test_should_expose_bucket_accessor() {
        assert_eq!(bucket("bucket-a").bucket(), Some("bucket-a"));
        assert_eq!(ResolvedTarget::AccountLevel.bucket(), None);
    }
}
