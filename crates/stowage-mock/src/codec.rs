//! AWS chunked transfer decoding.
//!
//! SDK clients sometimes frame a `PutObject` body with the proprietary
//! `aws-chunked` encoding (size line with a chunk signature, data, CRLF,
//! repeated, terminated by a zero-size chunk and optional trailers):
//!
//! ```text
//! <hex-size>;chunk-signature=<sig>\r\n
//! <data>\r\n
//! 0;chunk-signature=<sig>\r\n
//! \r\n
//! ```
//!
//! The endpoint must store the raw payload, not the envelope, so the framing
//! is stripped before the object is written.

use bytes::{Bytes, BytesMut};
use http::HeaderMap;
use http::header::CONTENT_ENCODING;

use crate::error::MockS3Error;

/// Whether the request body is AWS-chunked.
///
/// True when `Content-Encoding` lists `aws-chunked`, or when
/// `x-amz-content-sha256` carries a `STREAMING-*` placeholder.
#[must_use]
pub fn is_aws_chunked(headers: &HeaderMap) -> bool {
    let encoded = headers
        .get(CONTENT_ENCODING)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.split(',').any(|e| e.trim().eq_ignore_ascii_case("aws-chunked")));

    let streaming = headers
        .get("x-amz-content-sha256")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("STREAMING-"));

    encoded || streaming
}

/// Strip the chunk framing from an AWS-chunked body.
///
/// Trailer headers after the terminal zero-size chunk are ignored.
///
/// # Errors
///
/// Returns [`MockS3Error::MalformedBody`] if the framing is truncated or a
/// size line is not valid hex.
pub fn decode_aws_chunked(body: &[u8]) -> Result<Bytes, MockS3Error> {
    let mut payload = BytesMut::with_capacity(body.len());
    let mut rest = body;

    loop {
        let (size_line, after_line) = take_line(rest)?;

        // Size line is `<hex-size>` optionally followed by `;`-separated
        // extensions such as the chunk signature.
        let hex_size = size_line
            .split(|&b| b == b';')
            .next()
            .unwrap_or(size_line);
        let hex_size = std::str::from_utf8(hex_size)
            .map_err(|_| MockS3Error::MalformedBody("chunk size is not UTF-8".to_owned()))?
            .trim();
        let chunk_size = usize::from_str_radix(hex_size, 16).map_err(|_| {
            MockS3Error::MalformedBody(format!("invalid chunk size '{hex_size}'"))
        })?;

        if chunk_size == 0 {
            // Terminal chunk; trailers (if any) follow and are ignored.
            return Ok(payload.freeze());
        }

        if after_line.len() < chunk_size + 2 {
            return Err(MockS3Error::MalformedBody(
                "chunk data truncated".to_owned(),
            ));
        }
        let (data, after_data) = after_line.split_at(chunk_size);
        if &after_data[..2] != b"\r\n" {
            return Err(MockS3Error::MalformedBody(
                "missing CRLF after chunk data".to_owned(),
            ));
        }

        payload.extend_from_slice(data);
        rest = &after_data[2..];
    }
}

/// Split off one CRLF-terminated line, returning it without the terminator.
fn take_line(data: &[u8]) -> Result<(&[u8], &[u8]), MockS3Error> {
    data.windows(2)
        .position(|w| w == b"\r\n")
        .map(|pos| (&data[..pos], &data[pos + 2..]))
        .ok_or_else(|| MockS3Error::MalformedBody("missing chunk size line".to_owned()))
}
