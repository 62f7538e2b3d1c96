//! Domain error type for bucket and object operations.
//!
//! [`S3ServiceError`] is what the state layer and [`S3Provider`](crate::S3Provider)
//! return. The [`From`] impl maps each variant onto a wire-level
//! [`S3Error`] carrying the right code, status and resource.
//!
//! ```
//! use s3gate_core::error::S3ServiceError;
//! use s3gate_model::{S3Error, S3ErrorCode};
//!
//! let err = S3ServiceError::NoSuchBucket {
//!     bucket: "bucket-a".to_owned(),
//! };
//! let s3_err: S3Error = err.into();
//! assert_eq!(s3_err.code, S3ErrorCode::NoSuchBucket);
//! assert_eq!(s3_err.resource.as_deref(), Some("bucket-a"));
//! ```

use s3gate_model::{S3Error, S3ErrorCode};

/// S3 service error type.
#[derive(Debug, thiserror::Error)]
pub enum S3ServiceError {
    /// The specified bucket does not exist.
    #[error("The specified bucket does not exist: {bucket}")]
    NoSuchBucket {
        /// The bucket name that was not found.
        bucket: String,
    },

    /// The bucket already exists and is owned by you.
    #[error(
        "Your previous request to create the named bucket succeeded and you already own it: {bucket}"
    )]
    BucketAlreadyOwnedByYou {
        /// The bucket name that already exists.
        bucket: String,
    },

    /// The bucket is not empty and cannot be deleted.
    #[error("The bucket you tried to delete is not empty: {bucket}")]
    BucketNotEmpty {
        /// The bucket name that is not empty.
        bucket: String,
    },

    /// The specified key does not exist.
    #[error("The specified key does not exist: {key}")]
    NoSuchKey {
        /// The key that was not found.
        key: String,
    },

    /// The specified bucket name is not valid.
    #[error("Invalid bucket name: {name}: {reason}")]
    InvalidBucketName {
        /// The invalid bucket name.
        name: String,
        /// The reason for the error.
        reason: String,
    },

    /// An argument provided is invalid.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument.
        message: String,
    },
}

impl S3ServiceError {
    /// The resource this error refers to, if any.
    #[must_use]
    pub fn resource(&self) -> Option<&str> {
        match self {
            Self::NoSuchBucket { bucket }
            | Self::BucketAlreadyOwnedByYou { bucket }
            | Self::BucketNotEmpty { bucket } => Some(bucket),
            Self::NoSuchKey { key } => Some(key),
            Self::InvalidBucketName { name, .. } => Some(name),
            Self::InvalidArgument { .. } => None,
        }
    }
}

impl From<S3ServiceError> for S3Error {
    fn from(err: S3ServiceError) -> Self {
        let message = err.to_string();
        let resource = err.resource().map(ToOwned::to_owned);
        let mut s3_err = S3Error::with_message(error_code(&err), message);
        s3_err.resource = resource;
        s3_err
    }
}

fn error_code(err: &S3ServiceError) -> S3ErrorCode {
    match err {
        S3ServiceError::NoSuchBucket { .. } => S3ErrorCode::NoSuchBucket,
        S3ServiceError::BucketAlreadyOwnedByYou { .. } => S3ErrorCode::BucketAlreadyOwnedByYou,
        S3ServiceError::BucketNotEmpty { .. } => S3ErrorCode::BucketNotEmpty,
        S3ServiceError::NoSuchKey { .. } => S3ErrorCode::NoSuchKey,
        S3ServiceError::InvalidBucketName { .. } => S3ErrorCode::InvalidBucketName,
        S3ServiceError::InvalidArgument { .. } => S3ErrorCode::InvalidArgument,
    }
}

/// Convenience result type for S3 service operations.
pub type S3ServiceResult<T> = Result<T, S3ServiceError>;
