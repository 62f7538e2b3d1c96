//! Validation for bucket names and object keys.
//!
//! Rules follow the
//! [Amazon S3 bucket naming documentation](https://docs.aws.amazon.com/AmazonS3/latest/userguide/bucketnamingrules.html).
//! Host resolution does not call into this module: a `Host` header may
//! yield a string that is not a valid bucket name, and the lookup that
//! follows simply fails with `NoSuchBucket`.

use std::net::Ipv4Addr;

use crate::error::S3ServiceError;

/// Maximum object key length in bytes.
const MAX_KEY_BYTES: usize = 1024;

/// Minimum bucket name length.
const MIN_BUCKET_NAME_LEN: usize = 3;

/// Maximum bucket name length.
const MAX_BUCKET_NAME_LEN: usize = 63;

/// Validate an S3 bucket name.
///
/// Rules:
/// - 3-63 characters long
/// - Only lowercase letters, numbers, hyphens, and dots
/// - Must start and end with a letter or number
/// - No consecutive dots (`..`)
/// - Not formatted as an IPv4 address (e.g. `192.168.0.1`)
/// - Must not start with `xn--` or `sthree-`
/// - Must not end with `-s3alias`
///
/// # Errors
///
/// Returns [`S3ServiceError::InvalidBucketName`] if any rule is violated.
///
/// # Examples
///
/// ```
/// use s3gate_core::validation::validate_bucket_name;
///
/// assert!(validate_bucket_name("bucket-a").is_ok());
/// assert!(validate_bucket_name("AB").is_err());
/// ```
pub fn validate_bucket_name(name: &str) -> Result<(), S3ServiceError> {
    let invalid = |reason: &str| S3ServiceError::InvalidBucketName {
        name: name.to_owned(),
        reason: reason.to_owned(),
    };
    let len = name.len();

    if !(MIN_BUCKET_NAME_LEN..=MAX_BUCKET_NAME_LEN).contains(&len) {
        return Err(invalid(&format!(
            "Bucket name must be between {MIN_BUCKET_NAME_LEN} and {MAX_BUCKET_NAME_LEN} characters long"
        )));
    }

    if !name
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'.')
    {
        return Err(invalid(
            "Bucket name must only contain lowercase letters, numbers, hyphens, and dots",
        ));
    }

    let first = name.as_bytes()[0];
    let last = name.as_bytes()[len - 1];
    if !first.is_ascii_alphanumeric() || !last.is_ascii_alphanumeric() {
        return Err(invalid(
            "Bucket name must start and end with a letter or number",
        ));
    }

    if name.contains("..") {
        return Err(invalid("Bucket name must not contain consecutive dots"));
    }

    if name.parse::<Ipv4Addr>().is_ok() {
        return Err(invalid(
            "Bucket name must not be formatted as an IP address",
        ));
    }

    if name.starts_with("xn--") {
        return Err(invalid("Bucket name must not start with 'xn--'"));
    }

    if name.starts_with("sthree-") {
        return Err(invalid("Bucket name must not start with 'sthree-'"));
    }

    if name.ends_with("-s3alias") {
        return Err(invalid("Bucket name must not end with '-s3alias'"));
    }

    Ok(())
}

/// Validate an S3 object key: 1-1024 bytes.
///
/// # Errors
///
/// Returns [`S3ServiceError::InvalidArgument`] if the key is empty or too long.
pub fn validate_object_key(key: &str) -> Result<(), S3ServiceError> {
    if key.is_empty() {
        return Err(S3ServiceError::InvalidArgument {
            message: "Object key must not be empty".to_owned(),
        });
    }

    if key.len() > MAX_KEY_BYTES {
        return Err(S3ServiceError::InvalidArgument {
            message: format!("Object key must not exceed {MAX_KEY_BYTES} bytes"),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_accept_valid_bucket_names() {
        for name in ["bucket-a", "my.bucket", "abc", "123bucket", &"a".repeat(63)] {
            assert!(validate_bucket_name(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn test_should_reject_bad_length() {
        assert!(validate_bucket_name("ab").is_err());
        assert!(validate_bucket_name(&"a".repeat(64)).is_err());
    }

    #[test]
    fn test_should_reject_bad_characters() {
        assert!(validate_bucket_name("Bucket-A").is_err());
        assert!(validate_bucket_name("bucket_a").is_err());
        assert!(validate_bucket_name("bucket a").is_err());
    }

    #[test]
    fn test_should_reject_bad_edges() {
        assert!(validate_bucket_name("-bucket").is_err());
        assert!(validate_bucket_name("bucket-").is_err());
        assert!(validate_bucket_name(".bucket").is_err());
    }

    #[test]
    fn test_should_reject_reserved_forms() {
        assert!(validate_bucket_name("my..bucket").is_err());
        assert!(validate_bucket_name("192.168.0.1").is_err());
        assert!(validate_bucket_name("xn--bucket").is_err());
        assert!(validate_bucket_name("sthree-bucket").is_err());
        assert!(validate_bucket_name("bucket-s3alias").is_err());
    }

    #[test]
    fn test_should_report_reason() {
        let err = validate_bucket_name("ab").unwrap_err();
        match err {
            S3ServiceError::InvalidBucketName { name, reason } => {
                assert_eq!(name, "ab");
                assert!(reason.contains("between 3 and 63"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_should_validate_object_keys() {
        assert!(validate_object_key("photos/2024/image.jpg").is_ok());
        assert!(validate_object_key("").is_err());
        assert!(validate_object_key(&"k".repeat(1024)).is_ok());
        assert!(validate_object_key(&"k".repeat(1025)).is_err());
    }
}
