//! S3 XML serialization for s3gate.
//!
//! Renders the listing outputs of `s3gate-model` and error responses in the
//! S3 RestXml wire format.
//!
//! # S3 XML conventions
//!
//! - Namespace: `http://s3.amazonaws.com/doc/2006-03-01/`
//! - Booleans: lowercase `true`/`false`
//! - Timestamps: ISO 8601 format (`2006-02-03T16:45:09.000Z`)
//! - XML declaration: `<?xml version="1.0" encoding="UTF-8"?>`

pub mod error;
pub mod serialize;

pub use error::{XmlError, error_to_xml};
pub use serialize::{S3_NAMESPACE, S3Serialize, format_timestamp, location_to_xml, to_xml};
