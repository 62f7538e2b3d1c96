//! Per-bucket state.
//!
//! The object store sits behind a `parking_lot::RwLock` so readers (listing,
//! GET) proceed concurrently while writers take the lock briefly.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use super::keystore::ObjectStore;
use super::object::Owner;

/// An S3 bucket.
#[derive(Debug)]
pub struct S3Bucket {
    /// Bucket name.
    pub name: String,
    /// Region the bucket was created in.
    pub region: String,
    /// Bucket owner.
    pub owner: Owner,
    /// When the bucket was created.
    pub creation_date: DateTime<Utc>,
    /// The bucket's objects.
    pub objects: RwLock<ObjectStore>,
}

impl S3Bucket {
    /// Create an empty bucket stamped with the current time.
    #[must_use]
    pub fn new(name: String, region: String, owner: Owner) -> Self {
        Self {
            name,
            region,
            owner,
            creation_date: Utc::now(),
            objects: RwLock::new(ObjectStore::default()),
        }
    }

    /// Whether the bucket holds no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }
}
