//! Destinations for a finished export buffer.
//!
//! A buffer is written exactly once, either to the local filesystem or as a
//! single object-store put. Local files are written to a sibling temp file
//! and renamed into place, so a failed export never leaves a truncated file.

use super::format::{ExportFormat, content_type_for_key};
use crate::error::{ExportError, StorageError};
use crate::storage::{ObjectStore, StorageSession};
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Where an export should land.
pub enum ExportTarget<'a> {
    /// A directory (created if missing), or the working directory.
    Local { dir: Option<PathBuf> },
    /// An object-store bucket and optional key prefix.
    ObjectStore {
        bucket: String,
        prefix: Option<String>,
        session: Option<&'a dyn StorageSession>,
    },
}

impl<'a> ExportTarget<'a> {
    pub fn local(dir: Option<impl Into<PathBuf>>) -> Self {
        ExportTarget::Local {
            dir: dir.map(Into::into),
        }
    }

    pub fn object_store(
        bucket: impl Into<String>,
        prefix: Option<&str>,
        session: Option<&'a dyn StorageSession>,
    ) -> Self {
        ExportTarget::ObjectStore {
            bucket: bucket.into(),
            prefix: prefix.map(str::to_string),
            session,
        }
    }

    /// Reject a remote target that has no session to upload with.
    pub(crate) fn check(&self) -> Result<(), ExportError> {
        match self {
            ExportTarget::ObjectStore {
                bucket,
                session: None,
                ..
            } => Err(StorageError::MissingSession(bucket.clone()).into()),
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for ExportTarget<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportTarget::Local { dir } => f.debug_struct("Local").field("dir", dir).finish(),
            ExportTarget::ObjectStore {
                bucket,
                prefix,
                session,
            } => f
                .debug_struct("ObjectStore")
                .field("bucket", bucket)
                .field("prefix", prefix)
                .field("session", &session.is_some())
                .finish(),
        }
    }
}

/// Resolved location of a delivered export.
#[derive(Debug, Clone, PartialEq)]
pub enum Delivered {
    Local(PathBuf),
    Remote(String),
}

impl Delivered {
    pub fn location(&self) -> String {
        match self {
            Delivered::Local(path) => path.display().to_string(),
            Delivered::Remote(uri) => uri.clone(),
        }
    }
}

/// Object key for `file_name` under `prefix`, without a leading slash.
pub fn object_key(prefix: Option<&str>, file_name: &str) -> String {
    let key = match prefix.map(|p| p.trim_end_matches('/')) {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}/{file_name}"),
        _ => file_name.to_string(),
    };
    key.trim_start_matches('/').to_string()
}

/// Put `content` at `bucket`/`key` and return its `s3://` URI.
///
/// The content type is inferred from the key's extension unless given.
pub fn upload(
    store: &dyn ObjectStore,
    bucket: &str,
    key: &str,
    content: &[u8],
    content_type: Option<&str>,
) -> Result<String, StorageError> {
    let content_type = content_type.unwrap_or_else(|| content_type_for_key(key));
    store.put(bucket, key, content, content_type)?;
    tracing::info!(bucket, key, content_type, bytes = content.len(), "uploaded export");
    Ok(format!("s3://{bucket}/{key}"))
}

/// Write `content` to `dir`/`file_name` and return the absolute path.
pub fn write_local(
    dir: Option<&Path>,
    file_name: &str,
    content: &[u8],
) -> Result<PathBuf, ExportError> {
    let path = match dir {
        Some(dir) => {
            fs::create_dir_all(dir).map_err(|source| ExportError::Write {
                path: dir.to_path_buf(),
                source,
            })?;
            dir.join(file_name)
        }
        None => PathBuf::from(file_name),
    };

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let write_err = |source: std::io::Error| ExportError::Write {
        path: path.clone(),
        source,
    };
    let mut staged = NamedTempFile::new_in(parent).map_err(write_err)?;
    staged.write_all(content).map_err(write_err)?;
    staged.as_file().sync_all().map_err(write_err)?;
    // On failure the temp file comes back inside the error and is removed on drop.
    staged.persist(&path).map_err(|e| write_err(e.error))?;
    tracing::info!(path = %path.display(), bytes = content.len(), "wrote export");

    std::path::absolute(&path).map_err(|source| ExportError::Write { path, source })
}

/// Deliver an encoded buffer to `target`.
pub(crate) fn deliver(
    target: &ExportTarget<'_>,
    file_name: &str,
    content: &[u8],
    format: ExportFormat,
) -> Result<Delivered, ExportError> {
    match target {
        ExportTarget::Local { dir } => {
            write_local(dir.as_deref(), file_name, content).map(Delivered::Local)
        }
        ExportTarget::ObjectStore {
            bucket,
            prefix,
            session,
        } => {
            let session = session.ok_or_else(|| StorageError::MissingSession(bucket.clone()))?;
            let client = session.client()?;
            let key = object_key(prefix.as_deref(), file_name);
            let uri = upload(
                &*client,
                bucket,
                &key,
                content,
                Some(format.content_type()),
            )?;
            Ok(Delivered::Remote(uri))
        }
    }
}
