//! S3 XML serialization of listing outputs.

use std::io::{self, Write};

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesText, Event};
use s3gate_model::output::{
    Bucket, CommonPrefix, GetBucketLocationOutput, ListBucketsOutput, ListObjectsOutput,
    ListObjectsV2Output, Object, Owner,
};

use crate::error::XmlError;

/// The S3 XML namespace.
pub const S3_NAMESPACE: &str = "http://s3.amazonaws.com/doc/2006-03-01/";

/// Trait for serializing S3 types to XML.
///
/// Implementors write their content as child elements of the current element;
/// the root element and namespace come from [`to_xml`].
pub trait S3Serialize {
    /// Serialize this value as XML child elements into the given writer.
    ///
    /// # Errors
    ///
    /// Returns `io::Error` if writing to the underlying writer fails.
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()>;
}

/// Serialize a value as a complete S3 XML document under `root_element`.
///
/// # Errors
///
/// Returns `XmlError` if serialization fails.
pub fn to_xml<T: S3Serialize>(root_element: &str, value: &T) -> Result<Vec<u8>, XmlError> {
    let mut buf = Vec::with_capacity(512);
    let mut writer = Writer::new(&mut buf);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    writer
        .create_element(root_element)
        .with_attribute(("xmlns", S3_NAMESPACE))
        .write_inner_content(|w| value.serialize_xml(w))?;

    Ok(buf)
}

/// Serialize a `GetBucketLocation` output.
///
/// The location is the text content of the root element itself, so it does
/// not fit [`S3Serialize`].
///
/// # Errors
///
/// Returns `XmlError` if serialization fails.
pub fn location_to_xml(output: &GetBucketLocationOutput) -> Result<Vec<u8>, XmlError> {
    let mut buf = Vec::with_capacity(128);
    let mut writer = Writer::new(&mut buf);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let element = writer
        .create_element("LocationConstraint")
        .with_attribute(("xmlns", S3_NAMESPACE));
    match output.location_constraint.as_deref() {
        Some(location) => {
            element.write_text_content(BytesText::new(location))?;
        }
        None => {
            element.write_empty()?;
        }
    }

    Ok(buf)
}

/// Format a timestamp as ISO 8601 with milliseconds and `Z` suffix.
#[must_use]
pub fn format_timestamp(dt: &chrono::DateTime<chrono::Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

fn write_text_element<W: Write>(writer: &mut Writer<W>, tag: &str, text: &str) -> io::Result<()> {
    writer
        .create_element(tag)
        .write_text_content(BytesText::new(text))?;
    Ok(())
}

fn write_optional_text<W: Write>(
    writer: &mut Writer<W>,
    tag: &str,
    value: Option<&str>,
) -> io::Result<()> {
    if let Some(v) = value {
        write_text_element(writer, tag, v)?;
    }
    Ok(())
}

fn write_bool<W: Write>(writer: &mut Writer<W>, tag: &str, value: bool) -> io::Result<()> {
    write_text_element(writer, tag, if value { "true" } else { "false" })
}

impl S3Serialize for Owner {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        writer.create_element("Owner").write_inner_content(|w| {
            write_text_element(w, "ID", &self.id)?;
            write_text_element(w, "DisplayName", &self.display_name)?;
            Ok(())
        })?;
        Ok(())
    }
}

impl S3Serialize for Bucket {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        writer.create_element("Bucket").write_inner_content(|w| {
            write_text_element(w, "Name", &self.name)?;
            write_text_element(w, "CreationDate", &format_timestamp(&self.creation_date))?;
            Ok(())
        })?;
        Ok(())
    }
}

impl S3Serialize for Object {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        writer.create_element("Contents").write_inner_content(|w| {
            write_text_element(w, "Key", &self.key)?;
            write_text_element(w, "LastModified", &format_timestamp(&self.last_modified))?;
            write_text_element(w, "ETag", &self.e_tag)?;
            write_text_element(w, "Size", &self.size.to_string())?;
            write_text_element(w, "StorageClass", &self.storage_class)?;
            if let Some(ref owner) = self.owner {
                owner.serialize_xml(w)?;
            }
            Ok(())
        })?;
        Ok(())
    }
}

impl S3Serialize for CommonPrefix {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        writer
            .create_element("CommonPrefixes")
            .write_inner_content(|w| write_text_element(w, "Prefix", &self.prefix))?;
        Ok(())
    }
}

impl S3Serialize for ListBucketsOutput {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        if let Some(ref owner) = self.owner {
            owner.serialize_xml(writer)?;
        }
        writer.create_element("Buckets").write_inner_content(|w| {
            for bucket in &self.buckets {
                bucket.serialize_xml(w)?;
            }
            Ok(())
        })?;
        Ok(())
    }
}

impl S3Serialize for ListObjectsOutput {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        write_text_element(writer, "Name", &self.name)?;
        write_text_element(writer, "Prefix", self.prefix.as_deref().unwrap_or(""))?;
        write_text_element(writer, "Marker", self.marker.as_deref().unwrap_or(""))?;
        write_text_element(writer, "MaxKeys", &self.max_keys.to_string())?;
        write_optional_text(writer, "Delimiter", self.delimiter.as_deref())?;
        write_bool(writer, "IsTruncated", self.is_truncated)?;
        write_optional_text(writer, "NextMarker", self.next_marker.as_deref())?;
        for obj in &self.contents {
            obj.serialize_xml(writer)?;
        }
        for cp in &self.common_prefixes {
            cp.serialize_xml(writer)?;
        }
        Ok(())
    }
}

impl S3Serialize for ListObjectsV2Output {
    fn serialize_xml<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        write_text_element(writer, "Name", &self.name)?;
        write_text_element(writer, "Prefix", self.prefix.as_deref().unwrap_or(""))?;
        write_text_element(writer, "KeyCount", &self.key_count.to_string())?;
        write_text_element(writer, "MaxKeys", &self.max_keys.to_string())?;
        write_optional_text(writer, "Delimiter", self.delimiter.as_deref())?;
        write_bool(writer, "IsTruncated", self.is_truncated)?;
        write_optional_text(
            writer,
            "ContinuationToken",
            self.continuation_token.as_deref(),
        )?;
        write_optional_text(
            writer,
            "NextContinuationToken",
            self.next_continuation_token.as_deref(),
        )?;
        write_optional_text(writer, "StartAfter", self.start_after.as_deref())?;
        for obj in &self.contents {
            obj.serialize_xml(writer)?;
        }
        for cp in &self.common_prefixes {
            cp.serialize_xml(writer)?;
        }
        Ok(())
    }
}
