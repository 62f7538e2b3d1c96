//! Shared utilities: request IDs, ETags and continuation tokens.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use md5::{Digest, Md5};
use uuid::Uuid;

use crate::error::S3ServiceError;

/// Generate a unique request ID (UUID v4 without dashes).
///
/// # Examples
///
/// ```
/// use s3gate_core::utils::generate_request_id;
///
/// let id = generate_request_id();
/// assert_eq!(id.len(), 32);
/// assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
/// ```
#[must_use]
pub fn generate_request_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Compute the quoted hex MD5 digest of `data`, as S3 reports ETags.
///
/// # Examples
///
/// ```
/// use s3gate_core::utils::compute_etag;
///
/// assert_eq!(compute_etag(b""), "\"d41d8cd98f00b204e9800998ecf8427e\"");
/// ```
#[must_use]
pub fn compute_etag(data: &[u8]) -> String {
    let md5_hex = hex::encode(Md5::digest(data));
    format!("\"{md5_hex}\"")
}

/// Encode a key as an opaque `ListObjectsV2` continuation token.
#[must_use]
pub fn encode_continuation_token(key: &str) -> String {
    BASE64_STANDARD.encode(key.as_bytes())
}

/// Decode a continuation token produced by [`encode_continuation_token`].
///
/// # Errors
///
/// Returns [`S3ServiceError::InvalidArgument`] if the token is not valid
/// base64 or does not decode to UTF-8.
pub fn decode_continuation_token(token: &str) -> Result<String, S3ServiceError> {
    let bytes = BASE64_STANDARD
        .decode(token)
        .map_err(|_| S3ServiceError::InvalidArgument {
            message: "The continuation token provided is incorrect".to_owned(),
        })?;
    String::from_utf8(bytes).map_err(|_| S3ServiceError::InvalidArgument {
        message: "Continuation token contains invalid UTF-8".to_owned(),
    })
}
