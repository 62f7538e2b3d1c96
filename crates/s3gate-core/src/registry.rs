//! Bucket registry seam.
//!
//! Host resolution needs to ask "is this a bucket we know about?" without
//! knowing where buckets live. [`BucketRegistry`] is that question.
//! [`S3ServiceState`](crate::S3ServiceState) answers it from the live bucket
//! table; [`StaticBucketRegistry`] answers it from a fixed set and is used in
//! tests and for offline configuration.

use std::collections::HashSet;

/// Read-only view of the set of existing buckets.
///
/// Implementations must reflect creations and deletions immediately; callers
/// never cache the answer.
pub trait BucketRegistry: Send + Sync + 'static {
    /// Returns `true` if a bucket with exactly this name exists.
    fn contains_bucket(&self, name: &str) -> bool;
}

/// A fixed set of bucket names.
#[derive(Debug, Clone, Default)]
pub struct StaticBucketRegistry {
    names: HashSet<String>,
}

impl StaticBucketRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no names are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for StaticBucketRegistry {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl BucketRegistry for StaticBucketRegistry {
    fn contains_bucket(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}
