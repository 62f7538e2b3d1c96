//! S3 wire-level types shared by the s3gate crates.
//!
//! - [`error`]: [`S3Error`] and the [`S3ErrorCode`] values the emulator can produce.
//! - [`input`]: listing inputs parsed from the query string.
//! - [`operations`]: the [`S3Operation`] identified by the router.
//! - [`output`]: listing outputs rendered as XML by `s3gate-xml`.

pub mod error;
// Input and output fields mirror the S3 query and XML names one to one.
#[allow(missing_docs)]
pub mod input;
pub mod operations;
#[allow(missing_docs)]
pub mod output;

pub use error::{S3Error, S3ErrorCode};
pub use operations::S3Operation;
