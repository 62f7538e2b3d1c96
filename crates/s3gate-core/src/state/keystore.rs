//! Sorted object storage and the shared listing walk.
//!
//! Keys live in a `BTreeMap` so iteration order is the lexicographic order
//! S3 listings require.

use std::collections::{BTreeMap, HashSet};

use super::object::S3Object;

/// Result of a `ListObjects` / `ListObjectsV2` walk.
#[derive(Debug, Clone, Default)]
pub struct ListResult {
    /// The objects that match the listing criteria.
    pub objects: Vec<S3Object>,
    /// Common prefixes when a delimiter is used.
    pub common_prefixes: Vec<String>,
    /// Whether more keys are available.
    pub is_truncated: bool,
    /// The last key or prefix returned when truncated.
    pub next_marker: Option<String>,
}

/// Objects of one bucket, keyed by object key.
#[derive(Debug, Default)]
pub struct ObjectStore {
    objects: BTreeMap<String, S3Object>,
}

impl ObjectStore {
    /// Insert or replace an object. Returns the previous object if any.
    pub fn put(&mut self, object: S3Object) -> Option<S3Object> {
        self.objects.insert(object.key.clone(), object)
    }

    /// Get an object by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&S3Object> {
        self.objects.get(key)
    }

    /// Remove an object by key. Returns the removed object if any.
    pub fn delete(&mut self, key: &str) -> Option<S3Object> {
        self.objects.remove(key)
    }

    /// Number of stored objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// List objects matching prefix, delimiter, start-after, and max-keys.
    #[must_use]
    pub fn list_objects(
        &self,
        prefix: &str,
        delimiter: &str,
        start_after: &str,
        max_keys: usize,
    ) -> ListResult {
        list_from_btree(
            self.objects.values(),
            prefix,
            delimiter,
            start_after,
            max_keys,
        )
    }
}

/// Walk sorted objects, applying prefix, delimiter, start-after, and
/// max-keys. Objects and common prefixes both count toward `max_keys`.
fn list_from_btree<'a>(
    objects: impl Iterator<Item = &'a S3Object>,
    prefix: &str,
    delimiter: &str,
    start_after: &str,
    max_keys: usize,
) -> ListResult {
    let use_delim = !delimiter.is_empty();
    let mut result = ListResult::default();
    let mut seen_prefixes = HashSet::new();
    let mut count = 0usize;
    let mut last_entry: Option<String> = None;

    for obj in objects {
        if !start_after.is_empty() && obj.key.as_str() <= start_after {
            continue;
        }

        // A marker that is itself a common prefix skips the whole group.
        if use_delim
            && !start_after.is_empty()
            && start_after.ends_with(delimiter)
            && obj.key.starts_with(start_after)
        {
            continue;
        }

        if !obj.key.starts_with(prefix) {
            continue;
        }

        if use_delim {
            let after_prefix = &obj.key[prefix.len()..];
            if let Some(pos) = after_prefix.find(delimiter) {
                let cp = format!("{prefix}{}{delimiter}", &after_prefix[..pos]);
                if seen_prefixes.contains(&cp) {
                    continue;
                }
                if count >= max_keys {
                    result.is_truncated = true;
                    break;
                }
                seen_prefixes.insert(cp.clone());
                last_entry = Some(cp.clone());
                result.common_prefixes.push(cp);
                count += 1;
                continue;
            }
        }

        if count >= max_keys {
            result.is_truncated = true;
            break;
        }

        last_entry = Some(obj.key.clone());
        result.objects.push(obj.clone());
        count += 1;
    }

    if result.is_truncated {
        result.next_marker = last_entry;
    }
    result
}
