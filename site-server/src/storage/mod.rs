//! Media Storage
//!
//! Filesystem-backed object storage for uploaded images, rooted at
//! `<work_dir>/uploads`. Folders mirror the site structure (`hero`,
//! `about`, `events`, `menu`, `interior`, `gallery/<category>`); stored
//! names are `<unix-millis>_<sanitized-original-name>.jpg`. Every upload
//! is validated and re-encoded to JPEG before it touches disk.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::fs;

use crate::utils::AppError;
use crate::utils::time::now_millis;

/// Maximum upload size (5MB)
const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Accepted upload formats (everything is converted to JPEG)
const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// JPEG quality for stored images
const JPEG_QUALITY: u8 = 85;

/// Top-level storage folders
pub const FOLDERS: &[&str] = &["hero", "about", "events", "menu", "interior", "gallery"];

/// Result of a successful upload
#[derive(Debug, Clone, Serialize)]
pub struct StoredFile {
    pub file_name: String,
    /// Path relative to the storage root (folder + file name)
    pub path: String,
    /// Public URL the stored file is served from
    pub url: String,
    pub size: usize,
}

/// One stored file as returned by [`MediaStorage::list`]
#[derive(Debug, Clone, Serialize)]
pub struct FileDescriptor {
    pub file_name: String,
    pub path: String,
    pub size: u64,
}

/// Filesystem-backed media storage
#[derive(Debug, Clone)]
pub struct MediaStorage {
    root: PathBuf,
    public_base: String,
}

impl MediaStorage {
    pub fn new(root: PathBuf, public_base: impl Into<String>) -> Self {
        Self {
            root,
            public_base: public_base.into(),
        }
    }

    /// Validate and store an uploaded image; returns its descriptor with
    /// the public URL.
    pub async fn upload(
        &self,
        folder: &str,
        original_name: &str,
        data: &[u8],
    ) -> Result<StoredFile, AppError> {
        validate_folder(folder)?;

        if data.is_empty() {
            return Err(AppError::validation("Empty file provided"));
        }

        let ext = Path::new(original_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|s| s.to_lowercase())
            .ok_or_else(|| {
                AppError::validation(format!("Invalid file extension for: {original_name}"))
            })?;

        validate_image(data, &ext)?;
        let jpeg = reencode_jpeg(data)?;

        let stem = Path::new(original_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("image");
        let file_name = format!("{}_{}.jpg", now_millis(), sanitize_name(stem));

        let dir = self.resolve(folder)?;
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| AppError::internal(format!("Failed to create folder: {e}")))?;

        let file_path = dir.join(&file_name);
        fs::write(&file_path, &jpeg)
            .await
            .map_err(|e| AppError::internal(format!("Failed to save file: {e}")))?;

        let path = format!("{folder}/{file_name}");
        let url = self.public_url(&path);

        tracing::info!(
            original_name = %original_name,
            path = %path,
            size = %jpeg.len(),
            "Image stored"
        );

        Ok(StoredFile {
            file_name,
            path,
            url,
            size: jpeg.len(),
        })
    }

    /// List the files in a folder; a missing folder is an empty list.
    pub async fn list(&self, folder: &str) -> Result<Vec<FileDescriptor>, AppError> {
        validate_folder(folder)?;
        let dir = self.resolve(folder)?;

        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(AppError::internal(format!("Failed to list folder: {e}"))),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| AppError::internal(format!("Failed to list folder: {e}")))?
        {
            let metadata = match entry.metadata().await {
                Ok(m) if m.is_file() => m,
                _ => continue,
            };
            let file_name = entry.file_name().to_string_lossy().to_string();
            files.push(FileDescriptor {
                path: format!("{folder}/{file_name}"),
                file_name,
                size: metadata.len(),
            });
        }

        files.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Ok(files)
    }

    /// Delete a stored file by its storage-relative path. Deleting a
    /// missing file is not an error.
    pub async fn delete(&self, path: &str) -> Result<(), AppError> {
        let file_path = self.resolve(path)?;
        match fs::remove_file(&file_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::internal(format!("Failed to delete file: {e}"))),
        }
    }

    /// Public URL for a storage-relative path
    pub fn public_url(&self, path: &str) -> String {
        format!(
            "{}/media/{}",
            self.public_base.trim_end_matches('/'),
            path
        )
    }

    /// Resolve a storage-relative path, refusing traversal out of the
    /// root.
    pub fn resolve(&self, path: &str) -> Result<PathBuf, AppError> {
        if path.is_empty()
            || path.split('/').any(|part| {
                part.is_empty() || part == "." || part == ".." || part.contains('\\')
            })
        {
            return Err(AppError::validation(format!("Invalid storage path: {path}")));
        }
        Ok(self.root.join(path))
    }
}

/// Accept a top-level folder or one gallery subfolder (`gallery/<key>`)
pub fn validate_folder(folder: &str) -> Result<(), AppError> {
    let mut parts = folder.split('/');
    let top = parts.next().unwrap_or_default();

    if !FOLDERS.contains(&top) {
        return Err(AppError::validation(format!("Unknown folder: {folder}")));
    }

    match parts.next() {
        None => Ok(()),
        Some(sub)
            if top == "gallery"
                && !sub.is_empty()
                && parts.next().is_none()
                && sub
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') =>
        {
            Ok(())
        }
        _ => Err(AppError::validation(format!("Unknown folder: {folder}"))),
    }
}

/// Keep file names portable: ascii alphanumerics, `-` and `_`, the rest
/// collapses to a single hyphen.
fn sanitize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_hyphen = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(c);
        } else {
            pending_hyphen = true;
        }
    }
    if out.is_empty() {
        out.push_str("image");
    }
    out
}

/// Validate an upload before it is stored
fn validate_image(data: &[u8], ext: &str) -> Result<(), AppError> {
    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::validation(format!(
            "File too large. Maximum size is {}MB",
            MAX_FILE_SIZE / 1024 / 1024
        )));
    }

    if !SUPPORTED_FORMATS.contains(&ext) {
        return Err(AppError::validation(format!(
            "Unsupported file format '{}'. Supported: {}",
            ext,
            SUPPORTED_FORMATS.join(", ")
        )));
    }

    if let Err(e) = image::load_from_memory(data) {
        return Err(AppError::validation(format!(
            "Invalid image file ({ext}): {e}"
        )));
    }

    Ok(())
}

/// Re-encode to JPEG at the configured quality
fn reencode_jpeg(data: &[u8]) -> Result<Vec<u8>, AppError> {
    let img = image::load_from_memory(data)
        .map_err(|e| AppError::validation(format!("Invalid image: {e}")))?;

    let mut buffer = Vec::new();
    {
        let mut cursor = Cursor::new(&mut buffer);
        let rgb_img = img.to_rgb8();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
        rgb_img
            .write_with_encoder(encoder)
            .map_err(|e| AppError::internal(format!("Failed to compress image: {e}")))?;
    }

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_validation() {
        assert!(validate_folder("menu").is_ok());
        assert!(validate_folder("gallery").is_ok());
        assert!(validate_folder("gallery/abc123").is_ok());
        assert!(validate_folder("attic").is_err());
        assert!(validate_folder("menu/extra").is_err());
        assert!(validate_folder("gallery/a/b").is_err());
        assert!(validate_folder("gallery/../user").is_err());
    }

    #[test]
    fn sanitizes_names() {
        assert_eq!(sanitize_name("Beer Garden (1)"), "Beer-Garden-1");
        assert_eq!(sanitize_name("côte.de.boeuf"), "c-te-de-boeuf");
        assert_eq!(sanitize_name("???"), "image");
    }

    #[test]
    fn resolve_refuses_traversal() {
        let storage = MediaStorage::new(PathBuf::from("/tmp/uploads"), "http://localhost:3000");
        assert!(storage.resolve("menu/a.jpg").is_ok());
        assert!(storage.resolve("../etc/passwd").is_err());
        assert!(storage.resolve("menu/../../etc").is_err());
        assert!(storage.resolve("").is_err());
    }

    #[test]
    fn public_urls() {
        let storage = MediaStorage::new(PathBuf::from("/tmp/uploads"), "http://localhost:3000/");
        assert_eq!(
            storage.public_url("menu/1700000000000_burger.jpg"),
            "http://localhost:3000/media/menu/1700000000000_burger.jpg"
        );
    }
}
