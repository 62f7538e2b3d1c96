//! Operation inputs parsed from the query string.

use std::collections::HashMap;

/// Default and maximum `max-keys` for listings.
pub const DEFAULT_MAX_KEYS: u32 = 1000;

/// Input of `ListObjects` (v1).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListObjectsInput {
    /// HTTP label: the addressed bucket.
    pub bucket: String,
    /// HTTP query: `prefix`.
    pub prefix: Option<String>,
    /// HTTP query: `delimiter`.
    pub delimiter: Option<String>,
    /// HTTP query: `marker`.
    pub marker: Option<String>,
    /// HTTP query: `max-keys`.
    pub max_keys: Option<u32>,
}

/// Input of `ListObjectsV2`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListObjectsV2Input {
    /// HTTP label: the addressed bucket.
    pub bucket: String,
    /// HTTP query: `prefix`.
    pub prefix: Option<String>,
    /// HTTP query: `delimiter`.
    pub delimiter: Option<String>,
    /// HTTP query: `continuation-token`.
    pub continuation_token: Option<String>,
    /// HTTP query: `start-after`.
    pub start_after: Option<String>,
    /// HTTP query: `max-keys`.
    pub max_keys: Option<u32>,
    /// HTTP query: `fetch-owner`.
    pub fetch_owner: bool,
}

fn non_empty(query: &HashMap<String, String>, name: &str) -> Option<String> {
    query.get(name).filter(|v| !v.is_empty()).cloned()
}

/// Parse `max-keys`; unparsable values are treated as absent.
fn max_keys(query: &HashMap<String, String>) -> Option<u32> {
    query.get("max-keys").and_then(|v| v.parse().ok())
}

impl ListObjectsInput {
    /// Build from decoded query parameters.
    #[must_use]
    pub fn from_query(bucket: impl Into<String>, query: &HashMap<String, String>) -> Self {
        Self {
            bucket: bucket.into(),
            prefix: non_empty(query, "prefix"),
            delimiter: non_empty(query, "delimiter"),
            marker: non_empty(query, "marker"),
            max_keys: max_keys(query),
        }
    }
}

impl ListObjectsV2Input {
    /// Build from decoded query parameters.
    #[must_use]
    pub fn from_query(bucket: impl Into<String>, query: &HashMap<String, String>) -> Self {
        Self {
            bucket: bucket.into(),
            prefix: non_empty(query, "prefix"),
            delimiter: non_empty(query, "delimiter"),
            continuation_token: non_empty(query, "continuation-token"),
            start_after: non_empty(query, "start-after"),
            max_keys: max_keys(query),
            fetch_owner: query
                .get("fetch-owner")
                .is_some_and(|v| v.eq_ignore_ascii_case("true")),
        }
    }
}
