//! Orchestration task wrapper around the upload routine.
//!
//! Runs one upload with static arguments on a manual trigger, the way the
//! surrounding workflow scheduler would: load the credential profile, build
//! the uploader, upload the sample file, and report any failure as task
//! failure through the process exit code.
//!
//! # Usage
//!
//! ```text
//! stowage-task
//! ```
//!
//! Expects `aws_localstack_config.ini` and `sample_data.json` in the working
//! directory. `RUST_LOG` controls log verbosity (default `info`).

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use stowage_core::{BucketUploader, ProfileConfig};

/// Task identifier carried in log lines.
const TASK_ID: &str = "upload_to_s3_ini";

/// Credential profile file, in the working directory.
const CONFIG_FILE: &str = "aws_localstack_config.ini";

/// Profile section to load.
const PROFILE: &str = "default";

/// Target bucket.
const BUCKET_NAME: &str = "my-local-bucket";

/// Object key within the bucket.
const OBJECT_KEY: &str = "sample_data.json";

/// Local file whose contents become the object payload.
const SOURCE_FILE: &str = "sample_data.json";

/// Initialize the tracing subscriber, honoring `RUST_LOG` when set.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = ProfileConfig::from_ini(CONFIG_FILE, PROFILE)
        .context("failed to load storage profile")?;

    info!(
        task = TASK_ID,
        endpoint = %config.endpoint_url,
        region = %config.region,
        bucket = BUCKET_NAME,
        key = OBJECT_KEY,
        "starting upload task"
    );

    let uploader = BucketUploader::new(&config);
    uploader
        .upload(BUCKET_NAME, OBJECT_KEY, SOURCE_FILE)
        .await
        .with_context(|| format!("task '{TASK_ID}' failed"))?;

    info!(task = TASK_ID, "upload task finished");
    Ok(())
}
