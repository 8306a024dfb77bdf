//! Minimal idempotent-upload client for S3-compatible object storage.
//!
//! The entire business logic of this crate is one routine:
//! [`BucketUploader::upload`] checks whether a bucket exists, creates it if
//! absent, aborts if it is already present, and writes a single local file
//! into the freshly created bucket as one object.
//!
//! Credentials and the endpoint address come from an explicit
//! [`ProfileConfig`] value (loaded from an `.ini` profile file), never from
//! process-wide environment state, so independent uploaders can coexist in
//! the same process and tests can run in parallel.

mod config;
mod error;
mod uploader;

pub use config::ProfileConfig;
pub use error::{BoxError, UploadError, UploadResult};
pub use uploader::BucketUploader;
