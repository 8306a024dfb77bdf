//! The ensure-bucket-then-put-object routine.

use std::path::Path;

use aws_sdk_s3::Client;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::primitives::ByteStream;
use tracing::{debug, info};

use crate::config::ProfileConfig;
use crate::error::{UploadError, UploadResult};

/// Uploads one local file into a freshly created bucket.
///
/// The routine is a two-state sequence: check the bucket, then either create
/// it and upload, or abort. An existing bucket is an environment collision
/// and fails the whole operation; no object is written in that case.
///
/// One SDK client is built per uploader; nothing is pooled or shared through
/// globals.
#[derive(Debug, Clone)]
pub struct BucketUploader {
    client: Client,
}

impl BucketUploader {
    /// Build an uploader addressing the endpoint described by `config`.
    ///
    /// The client uses path-style addressing, which localhost endpoints
    /// require (virtual-hosted bucket subdomains do not resolve there).
    #[must_use]
    pub fn new(config: &ProfileConfig) -> Self {
        let creds = Credentials::new(
            config.aws_access_key_id.clone(),
            config.aws_secret_access_key.clone(),
            None,
            None,
            "stowage-profile",
        );

        let sdk_config = aws_sdk_s3::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(creds)
            .endpoint_url(config.endpoint_url.clone())
            .force_path_style(true)
            .build();

        Self {
            client: Client::from_conf(sdk_config),
        }
    }

    /// The underlying SDK client, for callers that need to inspect what was
    /// stored (e.g. verification in a test harness).
    #[must_use]
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Ensure `bucket_name` is freshly created, then upload the full contents
    /// of `file_path` as the object at `key`.
    ///
    /// At most one bucket creation and one object write happen per call.
    /// There is no retry and no cleanup: if reading `file_path` fails after
    /// the bucket was created, the bucket stays behind, empty.
    ///
    /// # Errors
    ///
    /// - [`UploadError::BucketExists`] if the bucket is already present; the
    ///   operation aborts before any write.
    /// - [`UploadError::Source`] if `file_path` is missing or unreadable.
    /// - [`UploadError::Transport`] for any other check/create/put failure,
    ///   carried verbatim from the SDK.
    pub async fn upload(
        &self,
        bucket_name: &str,
        key: &str,
        file_path: impl AsRef<Path>,
    ) -> UploadResult<()> {
        let file_path = file_path.as_ref();

        match self.client.head_bucket().bucket(bucket_name).send().await {
            Ok(_) => {
                return Err(UploadError::BucketExists {
                    bucket: bucket_name.to_owned(),
                });
            }
            Err(SdkError::ServiceError(ctx)) if ctx.err().is_not_found() => {
                debug!(bucket = %bucket_name, "bucket not found, creating");
            }
            Err(e) => return Err(UploadError::Transport(e.into())),
        }

        self.client
            .create_bucket()
            .bucket(bucket_name)
            .send()
            .await
            .map_err(|e| UploadError::Transport(e.into()))?;

        let body = tokio::fs::read(file_path)
            .await
            .map_err(|source| UploadError::Source {
                path: file_path.to_owned(),
                source,
            })?;

        self.client
            .put_object()
            .bucket(bucket_name)
            .key(key)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| UploadError::Transport(e.into()))?;

        info!(
            bucket = %bucket_name,
            key = %key,
            "File '{}' uploaded to bucket '{bucket_name}' with key '{key}'.",
            file_path.display(),
        );

        Ok(())
    }
}
