//! The S3 provider.
//!
//! [`S3Provider`] owns the service state and server configuration. Individual
//! operations live in the [`crate::ops`] submodules as `handle_*` methods; the
//! server binary bridges them to HTTP through the `S3Handler` trait of
//! `s3gate-http`.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::{BucketSeed, ServerConfig};
use crate::endpoint::EndpointConfig;
use crate::error::S3ServiceError;
use crate::registry::BucketRegistry;
use crate::state::object::Owner;
use crate::state::service::S3ServiceState;

/// The in-memory S3 provider.
///
/// All fields are `Arc`-wrapped so the provider clones cheaply into each
/// connection task.
///
/// # Examples
///
/// ```
/// use s3gate_core::{S3Provider, ServerConfig};
///
/// let provider = S3Provider::new(ServerConfig::default());
/// assert_eq!(provider.endpoint_config().service_endpoint(), "s3.amazonaws.com");
/// ```
#[derive(Debug, Clone)]
pub struct S3Provider {
    pub(crate) state: Arc<S3ServiceState>,
    pub(crate) config: Arc<ServerConfig>,
    pub(crate) owner: Owner,
}

impl S3Provider {
    /// Create a provider with empty state.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        Self {
            state: Arc::new(S3ServiceState::new()),
            config: Arc::new(config),
            owner: Owner::default(),
        }
    }

    /// Returns a reference to the service state.
    #[must_use]
    pub fn state(&self) -> &S3ServiceState {
        &self.state
    }

    /// Returns a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// The live bucket registry backed by this provider's state.
    #[must_use]
    pub fn registry(&self) -> Arc<dyn BucketRegistry> {
        Arc::clone(&self.state) as Arc<dyn BucketRegistry>
    }

    /// Endpoint configuration for host resolution, wired to the live registry.
    #[must_use]
    pub fn endpoint_config(&self) -> EndpointConfig {
        EndpointConfig::from_server_config(&self.config, self.registry())
    }

    /// Create the configured seed buckets, in order.
    ///
    /// Buckets that already exist are left alone. Returns the number of
    /// buckets created.
    ///
    /// # Errors
    ///
    /// Returns [`S3ServiceError::InvalidBucketName`] for the first seed whose
    /// name is not a valid bucket name.
    pub fn seed_buckets(&self, seeds: &[BucketSeed]) -> Result<usize, S3ServiceError> {
        let mut created = 0;
        for seed in seeds {
            match self.handle_create_bucket(&seed.name) {
                Ok(_) => created += 1,
                Err(S3ServiceError::BucketAlreadyOwnedByYou { bucket }) => {
                    warn!(bucket = %bucket, "seed bucket already exists, skipping");
                }
                Err(e) => return Err(e),
            }
        }
        info!(created, "seed buckets created");
        Ok(created)
    }

    /// Reset all state.
    pub fn reset(&self) {
        self.state.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_create_provider_with_defaults() {
        let provider = S3Provider::new(ServerConfig::default());
        assert_eq!(provider.config().gateway_listen, "0.0.0.0:4566");
        assert!(provider.state().list_buckets().is_empty());
        assert!(format!("{provider:?}").contains("S3Provider"));
    }

    #[test]
    fn test_should_seed_buckets_once() {
        let provider = S3Provider::new(ServerConfig::default());
        let seeds = vec![BucketSeed::new("bucket-a"), BucketSeed::new("bucket-b")];

        assert_eq!(provider.seed_buckets(&seeds).expect("seed"), 2);
        assert_eq!(provider.seed_buckets(&seeds).expect("seed"), 0);
        assert!(provider.state().bucket_exists("bucket-a"));
        assert!(provider.state().bucket_exists("bucket-b"));
    }

    #[test]
    fn test_should_reject_invalid_seed() {
        let provider = S3Provider::new(ServerConfig::default());
        let result = provider.seed_buckets(&[BucketSeed::new("Not_Valid")]);
        assert!(matches!(
            result,
            Err(S3ServiceError::InvalidBucketName { .. })
        ));
    }

    #[test]
    fn test_should_expose_live_registry_through_endpoint() {
        let provider = S3Provider::new(ServerConfig::default());
        let endpoint = provider.endpoint_config();
        assert!(!endpoint.is_known_bucket("bucket-a"));

        provider.handle_create_bucket("bucket-a").expect("create");
        assert!(endpoint.is_known_bucket("bucket-a"));
    }

    #[test]
    fn test_should_share_state_between_clones() {
        let provider = S3Provider::new(ServerConfig::default());
        let clone = provider.clone();
        provider.handle_create_bucket("bucket-a").expect("create");
        assert!(clone.state().bucket_exists("bucket-a"));

        clone.reset();
        assert!(!provider.state().bucket_exists("bucket-a"));
    }
}
