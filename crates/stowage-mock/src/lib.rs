//! In-process simulated object-storage endpoint.
//!
//! Speaks just enough of the S3 wire protocol (path-style addressing only)
//! for a real `aws-sdk-s3` client to exercise the four operations the
//! uploader needs: `HeadBucket`, `CreateBucket`, `PutObject`, and
//! `GetObject`. Everything else answers with a `NotImplemented` error
//! document.
//!
//! This is a test double, not a storage service: state is in-memory only,
//! signatures are never validated, and there is no listing, deletion,
//! versioning, or multipart support.
//!
//! ```no_run
//! # async fn demo() -> std::io::Result<()> {
//! use stowage_mock::MockS3Server;
//!
//! let server = MockS3Server::spawn().await?;
//! let endpoint = server.endpoint_url(); // e.g. http://127.0.0.1:49152
//! # let _ = endpoint;
//! # Ok(())
//! # }
//! ```

mod codec;
mod error;
mod server;
mod service;
mod state;

pub use error::MockS3Error;
pub use server::MockS3Server;
pub use service::MockS3Service;
pub use state::{MockS3State, StoredObject};
