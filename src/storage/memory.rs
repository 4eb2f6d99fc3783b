//! In-process object store, for dry runs and tests.

use super::{ObjectStore, StorageSession};
use crate::error::StorageError;
use std::cell::RefCell;
use std::collections::BTreeMap;

/// An object as it was stored.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub content_type: String,
}

/// Object store keeping everything in memory.
///
/// A store built with [`MemoryStore::failing`] rejects every put with the
/// given message, the way a bucket without write access would.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: RefCell<BTreeMap<(String, String), StoredObject>>,
    failure: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn get(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.objects
            .borrow()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    /// Keys stored under `bucket`, in order.
    pub fn keys(&self, bucket: &str) -> Vec<String> {
        self.objects
            .borrow()
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, key)| key.clone())
            .collect()
    }
}

impl ObjectStore for MemoryStore {
    fn put(
        &self,
        bucket: &str,
        key: &str,
        body: &[u8],
        content_type: &str,
    ) -> Result<(), StorageError> {
        if let Some(message) = &self.failure {
            return Err(StorageError::Put {
                bucket: bucket.to_string(),
                key: key.to_string(),
                message: message.clone(),
            });
        }

        self.objects.borrow_mut().insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                body: body.to_vec(),
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }
}

impl StorageSession for MemoryStore {
    fn client(&self) -> Result<Box<dyn ObjectStore + '_>, StorageError> {
        Ok(Box::new(self))
    }
}
