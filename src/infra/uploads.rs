//! Runtime upload storage for article images.
//!
//! Accepts `image/*` payloads up to the configured ceiling, streams them to a
//! date-partitioned path under the storage root, and hands back the public
//! URL the stored asset is served from.

use std::error::Error as StdError;
use std::fmt::Write as FmtWrite;
use std::path::{Component, Path, PathBuf};

use bytes::Bytes;
use futures::{StreamExt, pin_mut, stream};
use sha2::{Digest, Sha256};
use slug::slugify;
use thiserror::Error;
use tokio::{fs, io::AsyncWriteExt};
use uuid::Uuid;

/// Errors that can occur while interacting with the upload storage backend.
#[derive(Debug, Error)]
pub enum UploadStorageError {
    #[error("invalid stored path")]
    InvalidPath,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("uploaded file exceeds the {limit_bytes} byte ceiling")]
    PayloadTooLarge { limit_bytes: u64 },
    #[error("uploaded file must be an image, got `{content_type}`")]
    UnsupportedType { content_type: String },
    #[error("uploaded file stream failed")]
    PayloadStream {
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
    #[error("uploaded file is empty")]
    EmptyPayload,
}

/// Result of storing an upload payload.
#[derive(Debug, Clone)]
pub struct StoredUpload {
    pub stored_path: String,
    pub public_url: String,
    pub checksum: String,
    pub size_bytes: i64,
}

/// Filesystem-backed upload storage with an image-only, size-capped policy.
#[derive(Debug)]
pub struct UploadStorage {
    root: PathBuf,
    max_bytes: u64,
}

impl UploadStorage {
    /// Initialise storage rooted at the provided directory, creating it if necessary.
    pub fn new(root: PathBuf, max_bytes: u64) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&root)?;
        Ok(Self { root, max_bytes })
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Reject payloads that do not declare (or imply, via their filename) an
    /// image content type.
    pub fn check_content_type(
        &self,
        original_name: &str,
        content_type: Option<&str>,
    ) -> Result<(), UploadStorageError> {
        let declared = content_type.map(str::trim).filter(|value| !value.is_empty());

        let is_image = match declared {
            Some(value) => value.starts_with("image/"),
            None => mime_guess::from_path(original_name)
                .first()
                .is_some_and(|mime| mime.type_() == mime_guess::mime::IMAGE),
        };

        if is_image {
            Ok(())
        } else {
            Err(UploadStorageError::UnsupportedType {
                content_type: declared.unwrap_or("unknown").to_string(),
            })
        }
    }

    /// Store the provided payload and return metadata describing the stored
    /// asset. The payload is streamed to disk and aborted as soon as it
    /// crosses the size ceiling.
    pub async fn store_stream<S>(
        &self,
        original_name: &str,
        stream: S,
    ) -> Result<StoredUpload, UploadStorageError>
    where
        S: futures::Stream<Item = Result<Bytes, UploadStorageError>>,
    {
        let stored_path = self.build_stored_path(original_name);
        let absolute = self.resolve(&stored_path)?;

        if let Some(parent) = absolute.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut file = fs::File::create(&absolute).await?;
        let mut hasher = Sha256::new();
        let mut total_bytes: u64 = 0;

        pin_mut!(stream);
        while let Some(chunk_result) = stream.next().await {
            let chunk = match chunk_result {
                Ok(chunk) => chunk,
                Err(err) => {
                    drop(file);
                    let _ = fs::remove_file(&absolute).await;
                    return Err(err);
                }
            };

            if chunk.is_empty() {
                continue;
            }

            total_bytes = total_bytes.saturating_add(chunk.len() as u64);
            if total_bytes > self.max_bytes {
                drop(file);
                let _ = fs::remove_file(&absolute).await;
                return Err(UploadStorageError::PayloadTooLarge {
                    limit_bytes: self.max_bytes,
                });
            }

            file.write_all(&chunk).await?;
            hasher.update(&chunk);
        }

        file.flush().await?;

        if total_bytes == 0 {
            drop(file);
            let _ = fs::remove_file(&absolute).await;
            return Err(UploadStorageError::EmptyPayload);
        }

        let digest = hasher.finalize();
        Ok(StoredUpload {
            public_url: format!("/uploads/{stored_path}"),
            stored_path,
            checksum: hex_from_bytes(&digest),
            size_bytes: total_bytes as i64,
        })
    }

    /// Store a fully-buffered payload. Intended for tests and small assets.
    pub async fn store(
        &self,
        original_name: &str,
        data: Bytes,
    ) -> Result<StoredUpload, UploadStorageError> {
        let stream = stream::once(async move { Ok::<_, UploadStorageError>(data) });
        self.store_stream(original_name, stream).await
    }

    /// Attempt to read the stored payload into memory.
    pub async fn read(&self, stored_path: &str) -> Result<Bytes, UploadStorageError> {
        let absolute = self.resolve(stored_path)?;
        let data = fs::read(absolute).await?;
        Ok(Bytes::from(data))
    }

    /// Remove the stored payload. Missing files are treated as success.
    pub async fn delete(&self, stored_path: &str) -> Result<(), UploadStorageError> {
        let absolute = self.resolve(stored_path)?;
        match fs::remove_file(&absolute).await {
            Ok(_) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(UploadStorageError::Io(err)),
        }
    }

    /// Resolve the absolute filesystem path for a stored upload.
    fn resolve(&self, stored_path: &str) -> Result<PathBuf, UploadStorageError> {
        let relative = Path::new(stored_path);
        if relative.is_absolute()
            || relative
                .components()
                .any(|component| matches!(component, Component::ParentDir | Component::Prefix(_)))
        {
            return Err(UploadStorageError::InvalidPath);
        }

        Ok(self.root.join(relative))
    }

    /// Public helper for the handler serving `/uploads/{*path}`.
    pub fn absolute_path(&self, stored_path: &str) -> Result<PathBuf, UploadStorageError> {
        self.resolve(stored_path)
    }

    fn build_stored_path(&self, original_name: &str) -> String {
        let (year, month, day) = time::OffsetDateTime::now_utc().to_calendar_date();
        let directory = format!("{year}/{:02}/{:02}", month as u8, day);
        let identifier = Uuid::new_v4();
        let filename = sanitize_filename(original_name);
        format!("{directory}/{identifier}-{filename}")
    }
}

fn sanitize_filename(original: &str) -> String {
    let path = Path::new(original);
    let stem = path
        .file_stem()
        .and_then(|value| value.to_str())
        .unwrap_or("upload");
    let mut base = slugify(stem);
    if base.is_empty() {
        base = "upload".to_string();
    }

    let extension = path
        .extension()
        .and_then(|value| value.to_str())
        .map(|value| value.trim_matches('.').to_ascii_lowercase())
        .filter(|value| !value.is_empty());

    match extension {
        Some(ext) => format!("{base}.{ext}"),
        None => base,
    }
}

fn hex_from_bytes(bytes: &[u8]) -> String {
    let mut output = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = FmtWrite::write_fmt(&mut output, format_args!("{byte:02x}"));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filenames_are_sanitized_and_keep_extensions() {
        assert_eq!(sanitize_filename("Cover Photo.PNG"), "cover-photo.png");
        assert_eq!(sanitize_filename("../../evil"), "evil");
        assert_eq!(sanitize_filename("???"), "upload");
    }

    #[test]
    fn content_type_policy_accepts_images_only() {
        let storage = UploadStorage {
            root: PathBuf::from("uploads"),
            max_bytes: 1024,
        };

        assert!(storage.check_content_type("a.png", Some("image/png")).is_ok());
        assert!(storage.check_content_type("a.png", None).is_ok());
        assert!(storage.check_content_type("a.pdf", Some("application/pdf")).is_err());
        assert!(storage.check_content_type("notes.txt", None).is_err());
    }

    #[test]
    fn traversal_paths_are_rejected() {
        let storage = UploadStorage {
            root: PathBuf::from("uploads"),
            max_bytes: 1024,
        };
        assert!(matches!(
            storage.resolve("../outside"),
            Err(UploadStorageError::InvalidPath)
        ));
        assert!(matches!(
            storage.resolve("/etc/passwd"),
            Err(UploadStorageError::InvalidPath)
        ));
    }
}
