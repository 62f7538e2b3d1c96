//! Top-level S3 service state.
//!
//! [`S3ServiceState`] owns the bucket table. It is also the live
//! [`BucketRegistry`] that host resolution consults, so a bucket created or
//! deleted here is visible to the next request without any refresh step.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use dashmap::mapref::one::Ref;
use tracing::{debug, info};

use crate::error::S3ServiceError;
use crate::registry::BucketRegistry;

use super::bucket::S3Bucket;
use super::object::Owner;

/// Top-level S3 service state holding all buckets.
///
/// All access goes through `DashMap`; no external locking is required.
pub struct S3ServiceState {
    buckets: DashMap<String, S3Bucket>,
}

impl std::fmt::Debug for S3ServiceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3ServiceState")
            .field("bucket_count", &self.buckets.len())
            .finish_non_exhaustive()
    }
}

impl Default for S3ServiceState {
    fn default() -> Self {
        Self::new()
    }
}

impl S3ServiceState {
    /// Create a new, empty service state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buckets: DashMap::new(),
        }
    }

    /// Create a new bucket.
    ///
    /// # Errors
    ///
    /// Returns [`S3ServiceError::BucketAlreadyOwnedByYou`] if the name is
    /// already taken.
    pub fn create_bucket(
        &self,
        name: String,
        region: String,
        owner: Owner,
    ) -> Result<(), S3ServiceError> {
        match self.buckets.entry(name) {
            Entry::Occupied(entry) => Err(S3ServiceError::BucketAlreadyOwnedByYou {
                bucket: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                let name = entry.key().clone();
                entry.insert(S3Bucket::new(name.clone(), region, owner));
                info!(bucket = %name, "bucket created");
                Ok(())
            }
        }
    }

    /// Delete an empty bucket.
    ///
    /// # Errors
    ///
    /// - [`S3ServiceError::NoSuchBucket`] if the bucket does not exist.
    /// - [`S3ServiceError::BucketNotEmpty`] if the bucket still holds objects.
    pub fn delete_bucket(&self, name: &str) -> Result<(), S3ServiceError> {
        if self
            .buckets
            .remove_if(name, |_, bucket| bucket.is_empty())
            .is_some()
        {
            info!(bucket = %name, "bucket deleted");
            return Ok(());
        }

        if self.buckets.contains_key(name) {
            Err(S3ServiceError::BucketNotEmpty {
                bucket: name.to_owned(),
            })
        } else {
            Err(S3ServiceError::NoSuchBucket {
                bucket: name.to_owned(),
            })
        }
    }

    /// Get a reference to a bucket.
    ///
    /// # Errors
    ///
    /// Returns [`S3ServiceError::NoSuchBucket`] if the bucket does not exist.
    pub fn get_bucket(&self, name: &str) -> Result<Ref<'_, String, S3Bucket>, S3ServiceError> {
        self.buckets
            .get(name)
            .ok_or_else(|| S3ServiceError::NoSuchBucket {
                bucket: name.to_owned(),
            })
    }

    /// List all buckets, returning `(name, creation_date)` pairs sorted by name.
    #[must_use]
    pub fn list_buckets(&self) -> Vec<(String, DateTime<Utc>)> {
        let mut buckets: Vec<(String, DateTime<Utc>)> = self
            .buckets
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().creation_date))
            .collect();
        buckets.sort_by(|a, b| a.0.cmp(&b.0));
        buckets
    }

    /// Check whether a bucket exists.
    #[must_use]
    pub fn bucket_exists(&self, name: &str) -> bool {
        self.buckets.contains_key(name)
    }

    /// Reset all state, removing all buckets.
    pub fn reset(&self) {
        debug!("resetting all S3 service state");
        self.buckets.clear();
    }
}

impl BucketRegistry for S3ServiceState {
    fn contains_bucket(&self, name: &str) -> bool {
        self.bucket_exists(name)
    }
}
