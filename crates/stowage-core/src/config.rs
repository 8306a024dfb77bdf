//! Profile-based configuration for the uploader.
//!
//! Credentials live in an `.ini` file with one section per profile, in the
//! same shape as an AWS shared-credentials file pointed at a local endpoint:
//!
//! ```ini
//! [default]
//! aws_access_key_id = 123456
//! aws_secret_access_key = 123456
//! region = us-east-1
//! endpoint_url = http://localhost:4566
//! ```
//!
//! The loaded [`ProfileConfig`] is handed to
//! [`BucketUploader::new`](crate::BucketUploader::new) as an explicit value;
//! nothing here mutates process environment variables.

use std::path::Path;

use serde::Deserialize;

use crate::error::{UploadError, UploadResult};

/// Default endpoint when the profile does not name one (a locally running
/// S3-compatible endpoint).
const DEFAULT_ENDPOINT_URL: &str = "http://localhost:4566";

/// A named set of credentials and region settings for one storage endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProfileConfig {
    /// Access key presented to the endpoint.
    pub aws_access_key_id: String,
    /// Secret key presented to the endpoint.
    pub aws_secret_access_key: String,
    /// Region the client addresses.
    pub region: String,
    /// Endpoint URL, e.g. `http://localhost:4566`.
    #[serde(default = "default_endpoint_url")]
    pub endpoint_url: String,
}

fn default_endpoint_url() -> String {
    DEFAULT_ENDPOINT_URL.to_owned()
}

impl ProfileConfig {
    /// Load the named profile from an `.ini` credentials file.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::Config`] if the file does not exist, cannot be
    /// parsed, or does not contain the requested profile (or a required key
    /// within it).
    pub fn from_ini(path: impl AsRef<Path>, profile: &str) -> UploadResult<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(UploadError::Config(format!(
                "config file '{}' does not exist",
                path.display()
            )));
        }

        let path_str = path.to_str().ok_or_else(|| {
            UploadError::Config(format!("config file path '{}' is not UTF-8", path.display()))
        })?;

        let settings = config::Config::builder()
            .add_source(config::File::new(path_str, config::FileFormat::Ini))
            .build()
            .map_err(|e| {
                UploadError::Config(format!("failed to parse '{}': {e}", path.display()))
            })?;

        settings.get::<Self>(profile).map_err(|e| match e {
            config::ConfigError::NotFound(_) => UploadError::Config(format!(
                "profile '{profile}' does not exist in '{}'",
                path.display()
            )),
            other => UploadError::Config(format!(
                "profile '{profile}' in '{}' is incomplete: {other}",
                path.display()
            )),
        })
    }
}
