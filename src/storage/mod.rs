//! Object storage behind the remote export sink.
//!
//! A [`StorageSession`] hands out [`ObjectStore`] clients; the only call the
//! exporters make is a single blocking `put`.

use crate::error::StorageError;

mod memory;
mod s3;

pub use memory::{MemoryStore, StoredObject};
pub use s3::S3Session;

/// Client able to store one object.
pub trait ObjectStore {
    fn put(
        &self,
        bucket: &str,
        key: &str,
        body: &[u8],
        content_type: &str,
    ) -> Result<(), StorageError>;
}

impl<T: ObjectStore + ?Sized> ObjectStore for &T {
    fn put(
        &self,
        bucket: &str,
        key: &str,
        body: &[u8],
        content_type: &str,
    ) -> Result<(), StorageError> {
        (**self).put(bucket, key, body, content_type)
    }
}

/// Credentials/region context that can produce storage clients.
pub trait StorageSession {
    fn client(&self) -> Result<Box<dyn ObjectStore + '_>, StorageError>;
}
