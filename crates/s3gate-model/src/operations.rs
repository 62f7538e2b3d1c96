//! The S3 operations s3gate can dispatch.

use std::fmt;

/// All supported S3 operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum S3Operation {
    /// The ListBuckets operation (account level).
    ListBuckets,
    /// The CreateBucket operation.
    CreateBucket,
    /// The DeleteBucket operation.
    DeleteBucket,
    /// The HeadBucket operation.
    HeadBucket,
    /// The GetBucketLocation operation.
    GetBucketLocation,
    /// The ListObjects operation.
    ListObjects,
    /// The ListObjectsV2 operation.
    ListObjectsV2,
    /// The PutObject operation.
    PutObject,
    /// The GetObject operation.
    GetObject,
    /// The HeadObject operation.
    HeadObject,
    /// The DeleteObject operation.
    DeleteObject,
}

impl S3Operation {
    /// Returns the AWS operation name string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ListBuckets => "ListBuckets",
            Self::CreateBucket => "CreateBucket",
            Self::DeleteBucket => "DeleteBucket",
            Self::HeadBucket => "HeadBucket",
            Self::GetBucketLocation => "GetBucketLocation",
            Self::ListObjects => "ListObjects",
            Self::ListObjectsV2 => "ListObjectsV2",
            Self::PutObject => "PutObject",
            Self::GetObject => "GetObject",
            Self::HeadObject => "HeadObject",
            Self::DeleteObject => "DeleteObject",
        }
    }

    /// Parse an operation name string into an S3Operation.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ListBuckets" => Some(Self::ListBuckets),
            "CreateBucket" => Some(Self::CreateBucket),
            "DeleteBucket" => Some(Self::DeleteBucket),
            "HeadBucket" => Some(Self::HeadBucket),
            "GetBucketLocation" => Some(Self::GetBucketLocation),
            "ListObjects" => Some(Self::ListObjects),
            "ListObjectsV2" => Some(Self::ListObjectsV2),
            "PutObject" => Some(Self::PutObject),
            "GetObject" => Some(Self::GetObject),
            "HeadObject" => Some(Self::HeadObject),
            "DeleteObject" => Some(Self::DeleteObject),
            _ => None,
        }
    }

    /// Whether the operation addresses the account rather than a bucket.
    #[must_use]
    pub fn is_account_level(&self) -> bool {
        matches!(self, Self::ListBuckets)
    }
}

impl fmt::Display for S3Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
