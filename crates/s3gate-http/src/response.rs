//! Typed output to HTTP response conversion.
//!
//! Listing outputs become XML documents via `s3gate-xml`; object reads carry
//! their metadata in headers; errors become the flat S3 `<Error>` document.

use bytes::Bytes;
use http::StatusCode;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE, ETAG, HeaderValue, LAST_MODIFIED, LOCATION};
use s3gate_core::state::S3Object;
use s3gate_model::error::S3Error;
use s3gate_model::output::{
    GetBucketLocationOutput, ListBucketsOutput, ListObjectsOutput, ListObjectsV2Output,
};
use s3gate_xml::{S3Serialize, XmlError, location_to_xml, to_xml};

use crate::body::S3ResponseBody;

const XML_CONTENT_TYPE: &str = "application/xml";

/// Convert an S3 output into an HTTP response.
pub trait IntoS3Response {
    /// Convert this output into an HTTP response.
    ///
    /// # Errors
    ///
    /// Returns `InternalError` if the body cannot be serialized or a header
    /// value is invalid.
    fn into_s3_response(self) -> Result<http::Response<S3ResponseBody>, S3Error>;
}

impl IntoS3Response for ListBucketsOutput {
    fn into_s3_response(self) -> Result<http::Response<S3ResponseBody>, S3Error> {
        serialized_xml_response("ListAllMyBucketsResult", &self)
    }
}

impl IntoS3Response for ListObjectsOutput {
    fn into_s3_response(self) -> Result<http::Response<S3ResponseBody>, S3Error> {
        serialized_xml_response("ListBucketResult", &self)
    }
}

impl IntoS3Response for ListObjectsV2Output {
    fn into_s3_response(self) -> Result<http::Response<S3ResponseBody>, S3Error> {
        serialized_xml_response("ListBucketResult", &self)
    }
}

impl IntoS3Response for GetBucketLocationOutput {
    fn into_s3_response(self) -> Result<http::Response<S3ResponseBody>, S3Error> {
        let xml = location_to_xml(&self).map_err(xml_failure)?;
        xml_response(StatusCode::OK, xml)
    }
}

fn serialized_xml_response<T: S3Serialize>(
    root: &str,
    value: &T,
) -> Result<http::Response<S3ResponseBody>, S3Error> {
    let xml = to_xml(root, value).map_err(xml_failure)?;
    xml_response(StatusCode::OK, xml)
}

fn xml_failure(err: XmlError) -> S3Error {
    S3Error::internal_error("failed to serialize response").with_source(err)
}

fn build_response(
    builder: http::response::Builder,
    body: S3ResponseBody,
) -> Result<http::Response<S3ResponseBody>, S3Error> {
    builder
        .body(body)
        .map_err(|e| S3Error::internal_error(format!("failed to build response: {e}")))
}

/// An XML document response.
///
/// # Errors
///
/// Returns `InternalError` if the response cannot be built.
pub fn xml_response(
    status: StatusCode,
    xml: Vec<u8>,
) -> Result<http::Response<S3ResponseBody>, S3Error> {
    build_response(
        http::Response::builder()
            .status(status)
            .header(CONTENT_TYPE, XML_CONTENT_TYPE),
        S3ResponseBody::from_bytes(Bytes::from(xml)),
    )
}

/// A response with no body.
///
/// # Errors
///
/// Returns `InternalError` if the response cannot be built.
pub fn empty_response(status: StatusCode) -> Result<http::Response<S3ResponseBody>, S3Error> {
    build_response(
        http::Response::builder().status(status),
        S3ResponseBody::empty(),
    )
}

/// `200 OK` for a created bucket, with its `Location`.
///
/// # Errors
///
/// Returns `InternalError` if the location is not a valid header value.
pub fn created_bucket_response(location: &str) -> Result<http::Response<S3ResponseBody>, S3Error> {
    let location = header_value(location)?;
    build_response(
        http::Response::builder()
            .status(StatusCode::OK)
            .header(LOCATION, location),
        S3ResponseBody::empty(),
    )
}

/// `200 OK` for a stored object, with its `ETag`.
///
/// # Errors
///
/// Returns `InternalError` if the ETag is not a valid header value.
pub fn etag_response(etag: &str) -> Result<http::Response<S3ResponseBody>, S3Error> {
    let etag = header_value(etag)?;
    build_response(
        http::Response::builder()
            .status(StatusCode::OK)
            .header(ETAG, etag),
        S3ResponseBody::empty(),
    )
}

/// An object read. `Content-Length` is the stored size even when the body is
/// left out for HEAD.
///
/// # Errors
///
/// Returns `InternalError` if a metadata value is not a valid header value.
pub fn object_response(
    object: S3Object,
    include_body: bool,
) -> Result<http::Response<S3ResponseBody>, S3Error> {
    let last_modified = object
        .last_modified
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string();

    let builder = http::Response::builder()
        .status(StatusCode::OK)
        .header(ETAG, header_value(&object.etag)?)
        .header(CONTENT_LENGTH, object.size)
        .header(CONTENT_TYPE, header_value(&object.content_type)?)
        .header(LAST_MODIFIED, header_value(&last_modified)?)
        .header("x-amz-storage-class", header_value(&object.storage_class)?)
        .header("Accept-Ranges", "bytes");

    let body = if include_body {
        S3ResponseBody::from_bytes(object.data)
    } else {
        S3ResponseBody::empty()
    };
    build_response(builder, body)
}

fn header_value(value: &str) -> Result<HeaderValue, S3Error> {
    HeaderValue::from_str(value)
        .map_err(|e| S3Error::internal_error(format!("invalid header value: {e}")))
}

/// Convert an [`S3Error`] into an HTTP error response with an XML body.
#[must_use]
pub fn error_to_response(err: &S3Error, request_id: &str) -> http::Response<S3ResponseBody> {
    let xml_bytes = s3gate_xml::error_to_xml(
        err.code.as_str(),
        &err.message,
        err.resource.as_deref(),
        request_id,
    );

    let mut response = http::Response::new(S3ResponseBody::from_bytes(Bytes::from(xml_bytes)));
    *response.status_mut() = err.status_code;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(XML_CONTENT_TYPE));
    response
}
