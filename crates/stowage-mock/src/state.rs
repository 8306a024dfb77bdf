//! In-memory endpoint state.
//!
//! [`MockS3State`] holds the bucket map and enforces bucket-name uniqueness.
//! All access is thread-safe via `DashMap`; no external locking is required.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use md5::{Digest, Md5};
use tracing::info;

use crate::error::MockS3Error;

/// One stored object: the body plus the metadata surfaced on `GetObject`.
#[derive(Debug, Clone)]
pub struct StoredObject {
    /// The object payload.
    pub body: Bytes,
    /// Quoted MD5-hex ETag, as S3 reports for non-multipart objects.
    pub e_tag: String,
    /// Content type supplied on upload, if any.
    pub content_type: Option<String>,
    /// Time the object was written.
    pub last_modified: DateTime<Utc>,
}

/// A bucket holding its objects.
#[derive(Debug)]
struct MockBucket {
    region: String,
    objects: DashMap<String, StoredObject>,
}

/// Top-level endpoint state.
#[derive(Debug, Default)]
pub struct MockS3State {
    buckets: DashMap<String, MockBucket>,
}

impl MockS3State {
    /// Create empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a bucket.
    ///
    /// The check-and-insert happens under one map entry, so two racing
    /// creates cannot both succeed.
    ///
    /// # Errors
    ///
    /// Returns [`MockS3Error::BucketAlreadyOwnedByYou`] if the name is taken.
    pub fn create_bucket(&self, name: &str, region: &str) -> Result<(), MockS3Error> {
        match self.buckets.entry(name.to_owned()) {
            Entry::Occupied(_) => Err(MockS3Error::BucketAlreadyOwnedByYou {
                bucket: name.to_owned(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(MockBucket {
                    region: region.to_owned(),
                    objects: DashMap::new(),
                });
                info!(bucket = %name, "bucket created");
                Ok(())
            }
        }
    }

    /// Check that a bucket exists, returning its region.
    ///
    /// # Errors
    ///
    /// Returns [`MockS3Error::NoSuchBucket`] if it does not.
    pub fn head_bucket(&self, name: &str) -> Result<String, MockS3Error> {
        self.buckets
            .get(name)
            .map(|b| b.region.clone())
            .ok_or_else(|| MockS3Error::NoSuchBucket {
                bucket: name.to_owned(),
            })
    }

    /// Store an object, returning its ETag.
    ///
    /// A repeated put to the same key replaces the previous body, matching
    /// S3's last-writer-wins semantics.
    ///
    /// # Errors
    ///
    /// Returns [`MockS3Error::NoSuchBucket`] if the bucket does not exist.
    pub fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: Option<String>,
    ) -> Result<String, MockS3Error> {
        let bucket_ref = self
            .buckets
            .get(bucket)
            .ok_or_else(|| MockS3Error::NoSuchBucket {
                bucket: bucket.to_owned(),
            })?;

        let e_tag = format!("\"{}\"", hex::encode(Md5::digest(&body)));
        let size = body.len();

        bucket_ref.objects.insert(
            key.to_owned(),
            StoredObject {
                body,
                e_tag: e_tag.clone(),
                content_type,
                last_modified: Utc::now(),
            },
        );

        info!(bucket = %bucket, key = %key, size, "object stored");
        Ok(e_tag)
    }

    /// Fetch an object.
    ///
    /// # Errors
    ///
    /// Returns [`MockS3Error::NoSuchBucket`] or [`MockS3Error::NoSuchKey`].
    pub fn get_object(&self, bucket: &str, key: &str) -> Result<StoredObject, MockS3Error> {
        let bucket_ref = self
            .buckets
            .get(bucket)
            .ok_or_else(|| MockS3Error::NoSuchBucket {
                bucket: bucket.to_owned(),
            })?;

        bucket_ref
            .objects
            .get(key)
            .map(|o| o.value().clone())
            .ok_or_else(|| MockS3Error::NoSuchKey {
                key: key.to_owned(),
            })
    }

    /// Number of objects in a bucket, if the bucket exists.
    #[must_use]
    pub fn object_count(&self, bucket: &str) -> Option<usize> {
        self.buckets.get(bucket).map(|b| b.objects.len())
    }
}
