//! Integration tests for the upload routine.
//!
//! Every test spawns its own in-process simulated endpoint on an ephemeral
//! port, so tests are hermetic and run in parallel without interfering with
//! each other. No external server is required.

use std::path::PathBuf;
use std::sync::Once;

use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use stowage_core::{BucketUploader, ProfileConfig};
use stowage_mock::MockS3Server;

/// The sample payload the original scenario uploads.
pub const SAMPLE_BODY: &[u8] = br#"{"ID": 123456}"#;

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Spawn a fresh simulated endpoint.
pub async fn start_endpoint() -> MockS3Server {
    init_tracing();
    MockS3Server::spawn().await.expect("spawn endpoint")
}

/// Profile pointing at the given endpoint, mirroring the sample `.ini` file.
#[must_use]
pub fn test_profile(endpoint_url: &str) -> ProfileConfig {
    ProfileConfig {
        aws_access_key_id: "123456".to_owned(),
        aws_secret_access_key: "123456".to_owned(),
        region: "us-east-1".to_owned(),
        endpoint_url: endpoint_url.to_owned(),
    }
}

/// Uploader wired to the given endpoint.
#[must_use]
pub fn uploader_for(server: &MockS3Server) -> BucketUploader {
    BucketUploader::new(&test_profile(&server.endpoint_url()))
}

/// Bare SDK client pointing at the given endpoint, for direct protocol-level
/// checks that bypass the uploader.
#[must_use]
pub fn s3_client(endpoint_url: &str) -> aws_sdk_s3::Client {
    let creds = Credentials::new("123456", "123456", None, None, "integration-test");

    let config = aws_sdk_s3::config::Builder::new()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(creds)
        .endpoint_url(endpoint_url)
        .force_path_style(true)
        .build();

    aws_sdk_s3::Client::from_conf(config)
}

/// Write a source file into the scratch directory and return its path.
pub fn write_source_file(dir: &tempfile::TempDir, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).expect("write source file");
    path
}

mod test_endpoint;
mod test_upload;
