//! Error codes and the S3 error document.
//!
//! S3 errors serialize as a flat `<Error>` element (no outer wrapper), which
//! is what the SDK's restXml deserializer expects:
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <Error>
//!   <Code>NoSuchBucket</Code>
//!   <Message>The specified bucket does not exist: b1</Message>
//!   <Resource>/b1</Resource>
//!   <RequestId>tx000001</RequestId>
//! </Error>
//! ```

use http::StatusCode;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesText, Event};

/// Errors the simulated endpoint can answer with.
///
/// Each variant maps to a well-known S3 error code and HTTP status.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MockS3Error {
    /// The specified bucket does not exist.
    #[error("The specified bucket does not exist: {bucket}")]
    NoSuchBucket {
        /// The bucket name that was not found.
        bucket: String,
    },

    /// The bucket already exists and is owned by the caller.
    ///
    /// A single-owner endpoint never reports the cross-account
    /// `BucketAlreadyExists` code; every duplicate create collides with the
    /// caller's own bucket.
    #[error(
        "Your previous request to create the named bucket succeeded and you already own it: {bucket}"
    )]
    BucketAlreadyOwnedByYou {
        /// The bucket name that already exists.
        bucket: String,
    },

    /// The specified key does not exist.
    #[error("The specified key does not exist: {key}")]
    NoSuchKey {
        /// The key that was not found.
        key: String,
    },

    /// The request body could not be decoded.
    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    /// The requested operation is outside the simulated surface.
    #[error("Operation not implemented: {0}")]
    NotImplemented(String),
}

impl MockS3Error {
    /// The S3 error code string for this error.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoSuchBucket { .. } => "NoSuchBucket",
            Self::BucketAlreadyOwnedByYou { .. } => "BucketAlreadyOwnedByYou",
            Self::NoSuchKey { .. } => "NoSuchKey",
            Self::MalformedBody(_) => "InvalidArgument",
            Self::NotImplemented(_) => "NotImplemented",
        }
    }

    /// The HTTP status code this error is reported with.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NoSuchBucket { .. } | Self::NoSuchKey { .. } => StatusCode::NOT_FOUND,
            Self::BucketAlreadyOwnedByYou { .. } => StatusCode::CONFLICT,
            Self::MalformedBody(_) => StatusCode::BAD_REQUEST,
            Self::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
        }
    }
}

/// Serialize an error as the flat S3 `<Error>` XML document.
#[must_use]
pub fn error_to_xml(err: &MockS3Error, resource: &str, request_id: &str) -> Vec<u8> {
    let mut buf = Vec::with_capacity(256);
    // Writing to a Vec is infallible; an error here is a logic bug.
    if let Err(e) = write_error_xml(&mut buf, err, resource, request_id) {
        tracing::error!(error = %e, "failed to serialize error XML");
        buf.clear();
    }
    buf
}

fn write_error_xml(
    buf: &mut Vec<u8>,
    err: &MockS3Error,
    resource: &str,
    request_id: &str,
) -> std::io::Result<()> {
    let mut writer = Writer::new(buf);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let message = err.to_string();
    writer.create_element("Error").write_inner_content(|w| {
        w.create_element("Code")
            .write_text_content(BytesText::new(err.code()))?;
        w.create_element("Message")
            .write_text_content(BytesText::new(&message))?;
        w.create_element("Resource")
            .write_text_content(BytesText::new(resource))?;
        w.create_element("RequestId")
            .write_text_content(BytesText::new(request_id))?;
        Ok(())
    })?;

    Ok(())
}
