//! Object operation handlers.
//!
//! Implements `put_object`, `get_object`, `head_object` and `delete_object`.

use bytes::Bytes;
use tracing::debug;

use crate::error::S3ServiceError;
use crate::provider::S3Provider;
use crate::state::object::S3Object;
use crate::validation::validate_object_key;

impl S3Provider {
    /// Store an object, replacing any previous one. Returns its ETag.
    ///
    /// # Errors
    ///
    /// - [`S3ServiceError::NoSuchBucket`] if the bucket does not exist.
    /// - [`S3ServiceError::InvalidArgument`] if the key is empty or too long.
    pub fn handle_put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: Option<String>,
    ) -> Result<String, S3ServiceError> {
        validate_object_key(key)?;
        let bucket_ref = self.state.get_bucket(bucket)?;

        let object = S3Object::new(key, body, content_type, self.owner.clone());
        let etag = object.etag.clone();
        let size = object.size;
        bucket_ref.objects.write().put(object);
        drop(bucket_ref);

        debug!(bucket = %bucket, key = %key, size, "put_object completed");
        Ok(etag)
    }

    /// Fetch an object with its body.
    ///
    /// # Errors
    ///
    /// - [`S3ServiceError::NoSuchBucket`] if the bucket does not exist.
    /// - [`S3ServiceError::NoSuchKey`] if the key does not exist.
    pub fn handle_get_object(&self, bucket: &str, key: &str) -> Result<S3Object, S3ServiceError> {
        let bucket_ref = self.state.get_bucket(bucket)?;
        let object = bucket_ref
            .objects
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| S3ServiceError::NoSuchKey {
                key: key.to_owned(),
            })?;

        debug!(bucket = %bucket, key = %key, size = object.size, "get_object completed");
        Ok(object)
    }

    /// Fetch an object's metadata. The returned body is empty.
    ///
    /// # Errors
    ///
    /// Same as [`S3Provider::handle_get_object`].
    pub fn handle_head_object(&self, bucket: &str, key: &str) -> Result<S3Object, S3ServiceError> {
        let mut object = self.handle_get_object(bucket, key)?;
        object.data = Bytes::new();
        Ok(object)
    }

    /// Delete an object. Deleting a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`S3ServiceError::NoSuchBucket`] if the bucket does not exist.
    pub fn handle_delete_object(&self, bucket: &str, key: &str) -> Result<(), S3ServiceError> {
        let bucket_ref = self.state.get_bucket(bucket)?;
        let removed = bucket_ref.objects.write().delete(key).is_some();
        drop(bucket_ref);

        debug!(bucket = %bucket, key = %key, removed, "delete_object completed");
        Ok(())
    }
}
