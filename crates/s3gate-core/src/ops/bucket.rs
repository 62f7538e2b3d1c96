//! Bucket operation handlers.
//!
//! Implements `list_buckets`, `create_bucket`, `delete_bucket`, `head_bucket`
//! and `get_bucket_location`.

use s3gate_model::output::{Bucket, GetBucketLocationOutput, ListBucketsOutput};
use tracing::debug;

use crate::error::S3ServiceError;
use crate::provider::S3Provider;
use crate::validation::validate_bucket_name;

impl S3Provider {
    /// List every bucket with its creation date.
    #[must_use]
    pub fn handle_list_buckets(&self) -> ListBucketsOutput {
        let buckets: Vec<Bucket> = self
            .state
            .list_buckets()
            .into_iter()
            .map(|(name, creation_date)| Bucket {
                name,
                creation_date,
            })
            .collect();

        debug!(count = buckets.len(), "list_buckets completed");

        ListBucketsOutput {
            owner: Some((&self.owner).into()),
            buckets,
        }
    }

    /// Create a bucket in the default region. Returns its `Location`.
    ///
    /// # Errors
    ///
    /// - [`S3ServiceError::InvalidBucketName`] if the name is not valid.
    /// - [`S3ServiceError::BucketAlreadyOwnedByYou`] if it already exists.
    pub fn handle_create_bucket(&self, bucket: &str) -> Result<String, S3ServiceError> {
        validate_bucket_name(bucket)?;

        self.state.create_bucket(
            bucket.to_owned(),
            self.config.default_region.clone(),
            self.owner.clone(),
        )?;

        debug!(bucket = %bucket, "create_bucket completed");
        Ok(format!("/{bucket}"))
    }

    /// Delete an empty bucket.
    ///
    /// # Errors
    ///
    /// - [`S3ServiceError::NoSuchBucket`] if the bucket does not exist.
    /// - [`S3ServiceError::BucketNotEmpty`] if it still holds objects.
    pub fn handle_delete_bucket(&self, bucket: &str) -> Result<(), S3ServiceError> {
        self.state.delete_bucket(bucket)?;
        debug!(bucket = %bucket, "delete_bucket completed");
        Ok(())
    }

    /// Check a bucket exists. Returns its region.
    ///
    /// # Errors
    ///
    /// Returns [`S3ServiceError::NoSuchBucket`] if the bucket does not exist.
    pub fn handle_head_bucket(&self, bucket: &str) -> Result<String, S3ServiceError> {
        let bucket = self.state.get_bucket(bucket)?;
        Ok(bucket.region.clone())
    }

    /// Report a bucket's region. `us-east-1` is reported as no constraint.
    ///
    /// # Errors
    ///
    /// Returns [`S3ServiceError::NoSuchBucket`] if the bucket does not exist.
    pub fn handle_get_bucket_location(
        &self,
        bucket: &str,
    ) -> Result<GetBucketLocationOutput, S3ServiceError> {
        let region = self.handle_head_bucket(bucket)?;
        Ok(GetBucketLocationOutput {
            location_constraint: (region != "us-east-1").then_some(region),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::config::ServerConfig;
    use crate::error::S3ServiceError;
    use crate::provider::S3Provider;

    fn provider() -> S3Provider {
        S3Provider::new(ServerConfig::default())
    }

    #[test]
    fn test_should_list_created_buckets_with_owner() {
        let provider = provider();
        provider.handle_create_bucket("bucket-b").expect("create");
        provider.handle_create_bucket("bucket-a").expect("create");

        let output = provider.handle_list_buckets();
        let names: Vec<_> = output.buckets.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["bucket-a", "bucket-b"]);
        assert!(output.owner.is_some());
    }

    #[test]
    fn test_should_return_location_on_create() {
        let provider = provider();
        assert_eq!(
            provider.handle_create_bucket("bucket-a").expect("create"),
            "/bucket-a"
        );
    }

    #[test]
    fn test_should_reject_invalid_bucket_name() {
        let provider = provider();
        assert!(matches!(
            provider.handle_create_bucket("UPPER"),
            Err(S3ServiceError::InvalidBucketName { .. })
        ));
    }

    #[test]
    fn test_should_head_and_delete_bucket() {
        let provider = provider();
        provider.handle_create_bucket("bucket-a").expect("create");
        assert_eq!(
            provider.handle_head_bucket("bucket-a").expect("head"),
            "us-east-1"
        );

        provider.handle_delete_bucket("bucket-a").expect("delete");
        assert!(matches!(
            provider.handle_head_bucket("bucket-a"),
            Err(S3ServiceError::NoSuchBucket { .. })
        ));
    }

    #[test]
    fn test_should_report_location_constraint() {
        let provider = provider();
        provider.handle_create_bucket("bucket-a").expect("create");
        let location = provider
            .handle_get_bucket_location("bucket-a")
            .expect("location");
        assert!(location.location_constraint.is_none());

        let provider = S3Provider::new(
            ServerConfig::builder()
                .default_region("eu-west-1".to_owned())
                .build(),
        );
        provider.handle_create_bucket("bucket-a").expect("create");
        let location = provider
            .handle_get_bucket_location("bucket-a")
            .expect("location");
        assert_eq!(location.location_constraint.as_deref(), Some("eu-west-1"));
    }
}
