//! Stored objects and their owner.

use std::fmt;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The owner of an S3 object or bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    /// The canonical user ID of the owner.
    pub id: String,
    /// The display name of the owner.
    pub display_name: String,
}

impl Default for Owner {
    fn default() -> Self {
        Self {
            id: "75aa57f09aa0c8caeab4f8c24e99d10f8e7faeebf76c078efc7c6caea54ba06a".to_owned(),
            display_name: "webfile".to_owned(),
        }
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.display_name, self.id)
    }
}

impl From<&Owner> for s3gate_model::output::Owner {
    fn from(owner: &Owner) -> Self {
        Self {
            id: owner.id.clone(),
            display_name: owner.display_name.clone(),
        }
    }
}

/// An object held in memory.
#[derive(Debug, Clone)]
pub struct S3Object {
    /// The object key.
    pub key: String,
    /// The object body.
    pub data: Bytes,
    /// Quoted hex MD5 of the body.
    pub etag: String,
    /// Body size in bytes.
    pub size: u64,
    /// When the object was last written.
    pub last_modified: DateTime<Utc>,
    /// `Content-Type` supplied on upload.
    pub content_type: String,
    /// Storage class, always `STANDARD`.
    pub storage_class: String,
    /// Who wrote the object.
    pub owner: Owner,
}

impl S3Object {
    /// Build an object from its body, computing ETag and size.
    #[must_use]
    pub fn new(
        key: impl Into<String>,
        data: Bytes,
        content_type: Option<String>,
        owner: Owner,
    ) -> Self {
        Self {
            key: key.into(),
            etag: crate::utils::compute_etag(&data),
            size: data.len() as u64,
            data,
            last_modified: Utc::now(),
            content_type: content_type
                .unwrap_or_else(|| "application/octet-stream".to_owned()),
            storage_class: "STANDARD".to_owned(),
            owner,
        }
    }

    /// Listing entry for this object.
    #[must_use]
    pub fn to_listing_entry(&self, include_owner: bool) -> s3gate_model::output::Object {
        s3gate_model::output::Object {
            key: self.key.clone(),
            last_modified: self.last_modified,
            e_tag: self.etag.clone(),
            size: self.size,
            storage_class: self.storage_class.clone(),
            owner: include_owner.then(|| (&self.owner).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_compute_etag_and_size() {
        let obj = S3Object::new("a.txt", Bytes::from_static(b"hello"), None, Owner::default());
        assert_eq!(obj.size, 5);
        assert_eq!(obj.etag, "\"5d41402abc4b2a76b9719d911017c592\"");
        assert_eq!(obj.content_type, "application/octet-stream");
        assert_eq!(obj.storage_class, "STANDARD");
    }

    #[test]
    fn test_should_build_listing_entry() {
        let obj = S3Object::new(
            "dir/b.txt",
            Bytes::from_static(b"xyz"),
            Some("text/plain".to_owned()),
            Owner::default(),
        );
        let entry = obj.to_listing_entry(false);
        assert_eq!(entry.key, "dir/b.txt");
        assert_eq!(entry.size, 3);
        assert!(entry.owner.is_none());
        assert!(obj.to_listing_entry(true).owner.is_some());
    }
}
