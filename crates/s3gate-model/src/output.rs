//! Operation outputs rendered into S3 XML response bodies.

use chrono::{DateTime, Utc};

/// Bucket or object owner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Owner {
    /// Canonical user id.
    pub id: String,
    /// Display name.
    pub display_name: String,
}

/// One entry of a `ListBuckets` response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    /// Bucket name.
    pub name: String,
    /// When the bucket was created.
    pub creation_date: DateTime<Utc>,
}

/// Output of `ListBuckets`, serialized as `ListAllMyBucketsResult`.
#[derive(Debug, Clone, Default)]
pub struct ListBucketsOutput {
    /// The account owner.
    pub owner: Option<Owner>,
    /// Buckets in creation order.
    pub buckets: Vec<Bucket>,
}

/// One object entry (`<Contents>`) of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Object {
    /// Object key.
    pub key: String,
    /// Last write time.
    pub last_modified: DateTime<Utc>,
    /// Quoted ETag.
    pub e_tag: String,
    /// Size in bytes.
    pub size: u64,
    /// Storage class.
    pub storage_class: String,
    /// Owner, when requested.
    pub owner: Option<Owner>,
}

/// A rolled-up key prefix (`<CommonPrefixes>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommonPrefix {
    /// The prefix up to and including the delimiter.
    pub prefix: String,
}

/// Output of `ListObjects` (v1), serialized as `ListBucketResult`.
#[derive(Debug, Clone, Default)]
pub struct ListObjectsOutput {
    /// Bucket name.
    pub name: String,
    /// Echo of the `prefix` query.
    pub prefix: Option<String>,
    /// Echo of the `marker` query.
    pub marker: Option<String>,
    /// Effective `max-keys`.
    pub max_keys: u32,
    /// Echo of the `delimiter` query.
    pub delimiter: Option<String>,
    /// Whether more results follow.
    pub is_truncated: bool,
    /// Marker for the next page, set only with a delimiter.
    pub next_marker: Option<String>,
    /// Matching objects.
    pub contents: Vec<Object>,
    /// Rolled-up prefixes.
    pub common_prefixes: Vec<CommonPrefix>,
}

/// Output of `ListObjectsV2`, serialized as `ListBucketResult`.
#[derive(Debug, Clone, Default)]
pub struct ListObjectsV2Output {
    /// Bucket name.
    pub name: String,
    /// Echo of the `prefix` query.
    pub prefix: Option<String>,
    /// Objects plus common prefixes returned.
    pub key_count: u32,
    /// Effective `max-keys`.
    pub max_keys: u32,
    /// Echo of the `delimiter` query.
    pub delimiter: Option<String>,
    /// Whether more results follow.
    pub is_truncated: bool,
    /// Echo of the `continuation-token` query.
    pub continuation_token: Option<String>,
    /// Token for the next page.
    pub next_continuation_token: Option<String>,
    /// Echo of the `start-after` query.
    pub start_after: Option<String>,
    /// Matching objects.
    pub contents: Vec<Object>,
    /// Rolled-up prefixes.
    pub common_prefixes: Vec<CommonPrefix>,
}

/// Output of `GetBucketLocation`.
///
/// `us-east-1` is reported as an empty constraint, as AWS does.
#[derive(Debug, Clone, Default)]
pub struct GetBucketLocationOutput {
    /// The region, `None` for `us-east-1`.
    pub location_constraint: Option<String>,
}
