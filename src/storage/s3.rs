//! S3 session backed by the AWS SDK.
//!
//! The SDK is async; each session owns a current-thread runtime and blocks
//! on it so exports stay synchronous.

use super::{ObjectStore, StorageSession};
use crate::error::StorageError;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use tokio::runtime::Runtime;

/// AWS configuration resolved from the default provider chain.
pub struct S3Session {
    runtime: Runtime,
    config: aws_config::SdkConfig,
}

impl S3Session {
    /// Resolve credentials and region, optionally from a named profile.
    pub fn new(profile: Option<&str>, region: Option<&str>) -> Result<Self, StorageError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| StorageError::Session(err.to_string()))?;

        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region.to_string()));
        }
        if let Some(profile) = profile {
            loader = loader.profile_name(profile);
        }

        let config = runtime.block_on(loader.load());
        tracing::debug!(
            region = ?config.region(),
            profile = profile.unwrap_or("default"),
            "resolved AWS configuration"
        );

        Ok(Self { runtime, config })
    }
}

impl StorageSession for S3Session {
    fn client(&self) -> Result<Box<dyn ObjectStore + '_>, StorageError> {
        Ok(Box::new(S3Store {
            client: Client::new(&self.config),
            runtime: &self.runtime,
        }))
    }
}

struct S3Store<'a> {
    client: Client,
    runtime: &'a Runtime,
}

impl ObjectStore for S3Store<'_> {
    fn put(
        &self,
        bucket: &str,
        key: &str,
        body: &[u8],
        content_type: &str,
    ) -> Result<(), StorageError> {
        let request = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body.to_vec()))
            .content_type(content_type);

        self.runtime
            .block_on(request.send())
            .map(|_| ())
            .map_err(|err| StorageError::Put {
                bucket: bucket.to_string(),
                key: key.to_string(),
                message: DisplayErrorContext(&err).to_string(),
            })
    }
}
