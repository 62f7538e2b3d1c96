//! List operation handlers.
//!
//! Implements `list_objects` (v1) and `list_objects_v2`.

use s3gate_model::input::{DEFAULT_MAX_KEYS, ListObjectsInput, ListObjectsV2Input};
use s3gate_model::output::{CommonPrefix, ListObjectsOutput, ListObjectsV2Output};
use tracing::debug;

use crate::error::S3ServiceError;
use crate::provider::S3Provider;
use crate::utils::{decode_continuation_token, encode_continuation_token};

fn to_common_prefixes(prefixes: Vec<String>) -> Vec<CommonPrefix> {
    prefixes
        .into_iter()
        .map(|prefix| CommonPrefix { prefix })
        .collect()
}

/// Clamp a requested `max-keys` to `[0, 1000]`, defaulting to 1000.
fn effective_max_keys(requested: Option<u32>) -> u32 {
    requested.map_or(DEFAULT_MAX_KEYS, |n| n.min(DEFAULT_MAX_KEYS))
}

impl S3Provider {
    /// List objects (v1 API with markers).
    ///
    /// # Errors
    ///
    /// Returns [`S3ServiceError::NoSuchBucket`] if the bucket does not exist.
    pub fn handle_list_objects(
        &self,
        input: ListObjectsInput,
    ) -> Result<ListObjectsOutput, S3ServiceError> {
        let bucket = self.state.get_bucket(&input.bucket)?;

        let prefix = input.prefix.as_deref().unwrap_or("");
        let delimiter = input.delimiter.as_deref().unwrap_or("");
        let marker = input.marker.as_deref().unwrap_or("");
        let max_keys = effective_max_keys(input.max_keys);

        let result = bucket
            .objects
            .read()
            .list_objects(prefix, delimiter, marker, max_keys as usize);
        drop(bucket);

        debug!(
            bucket = %input.bucket,
            prefix = %prefix,
            count = result.objects.len(),
            is_truncated = result.is_truncated,
            "list_objects completed"
        );

        // S3 only reports NextMarker when a delimiter is in play.
        let next_marker = if input.delimiter.is_some() {
            result.next_marker
        } else {
            None
        };

        Ok(ListObjectsOutput {
            contents: result
                .objects
                .iter()
                .map(|obj| obj.to_listing_entry(true))
                .collect(),
            common_prefixes: to_common_prefixes(result.common_prefixes),
            is_truncated: result.is_truncated,
            next_marker,
            name: input.bucket,
            prefix: input.prefix,
            marker: input.marker,
            max_keys,
            delimiter: input.delimiter,
        })
    }

    /// List objects (v2 API with continuation tokens).
    ///
    /// # Errors
    ///
    /// - [`S3ServiceError::NoSuchBucket`] if the bucket does not exist.
    /// - [`S3ServiceError::InvalidArgument`] if the continuation token is bad.
    pub fn handle_list_objects_v2(
        &self,
        input: ListObjectsV2Input,
    ) -> Result<ListObjectsV2Output, S3ServiceError> {
        let bucket = self.state.get_bucket(&input.bucket)?;

        let prefix = input.prefix.as_deref().unwrap_or("");
        let delimiter = input.delimiter.as_deref().unwrap_or("");
        let max_keys = effective_max_keys(input.max_keys);

        let decoded_token = input
            .continuation_token
            .as_deref()
            .map(decode_continuation_token)
            .transpose()?;
        let start_after = decoded_token
            .as_deref()
            .or(input.start_after.as_deref())
            .unwrap_or("");

        let result = bucket
            .objects
            .read()
            .list_objects(prefix, delimiter, start_after, max_keys as usize);
        drop(bucket);

        let next_continuation_token = if result.is_truncated {
            result.next_marker.as_deref().map(encode_continuation_token)
        } else {
            None
        };
        let key_count = u32::try_from(result.objects.len() + result.common_prefixes.len())
            .unwrap_or(u32::MAX);

        debug!(
            bucket = %input.bucket,
            prefix = %prefix,
            count = key_count,
            is_truncated = result.is_truncated,
            "list_objects_v2 completed"
        );

        Ok(ListObjectsV2Output {
            contents: result
                .objects
                .iter()
                .map(|obj| obj.to_listing_entry(input.fetch_owner))
                .collect(),
            common_prefixes: to_common_prefixes(result.common_prefixes),
            is_truncated: result.is_truncated,
            key_count,
            max_keys,
            next_continuation_token,
            name: input.bucket,
            prefix: input.prefix,
            delimiter: input.delimiter,
            continuation_token: input.continuation_token,
            start_after: input.start_after,
        })
    }
}
