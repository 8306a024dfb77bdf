//! Error taxonomy for the upload routine.

use std::path::PathBuf;

/// Boxed error used to carry SDK transport failures verbatim.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failures surfaced by [`BucketUploader`](crate::BucketUploader) and the
/// profile loader.
///
/// "Bucket absent" is deliberately not represented here: a not-found result
/// from the existence check is the trigger for bucket creation, not an error.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// The target bucket already exists; the operation aborts before any
    /// object is written.
    ///
    /// The message format is load-bearing: callers match on it to tell an
    /// environment collision apart from transport failures.
    #[error("Bucket '{bucket}' already exists.")]
    BucketExists {
        /// Name of the bucket that was already present.
        bucket: String,
    },

    /// The local source file could not be read.
    #[error("failed to read source file '{}'", .path.display())]
    Source {
        /// Path that failed to open or read.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Any other check/create/put failure (connectivity, auth, malformed
    /// request), propagated verbatim from the storage client.
    #[error("storage request failed: {0}")]
    Transport(#[source] BoxError),

    /// Profile file or client configuration problem.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience result type for upload operations.
pub type UploadResult<T> = Result<T, UploadError>;
