use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::debug;

use super::hasher::digest_reader;
use crate::config::StorageConfig;
use crate::errors::{AppError, AppResult};

/// Extension given to every stored image, whatever its real encoding
pub const IMAGE_EXTENSION: &str = "jpg";

/// Result of writing an upload into the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub file_name: String,
    /// `false` when a file with the same content already existed
    pub created: bool,
}

#[derive(Debug, Clone)]
pub struct ImageStore {
    image_dir: PathBuf,
    default_image: String,
}

impl ImageStore {
    pub fn new(image_dir: PathBuf, default_image: impl Into<String>) -> Self {
        Self {
            image_dir,
            default_image: default_image.into(),
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.image_dir.clone(), config.default_image.clone())
    }

    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }

    pub fn default_image_path(&self) -> PathBuf {
        self.image_dir.join(&self.default_image)
    }

    pub async fn ensure_storage_dir(&self) -> Result<(), std::io::Error> {
        if !fs::try_exists(&self.image_dir).await? {
            fs::create_dir_all(&self.image_dir).await?;
        }
        Ok(())
    }

    /// File name for a given content digest
    pub fn file_name_for(digest: &str) -> String {
        format!("{}.{}", digest, IMAGE_EXTENSION)
    }

    /// Write `data` under its content-derived name, overwriting any file of
    /// the same name.
    pub async fn put(&self, data: &[u8]) -> Result<StoredImage, std::io::Error> {
        self.ensure_storage_dir().await?;

        let digest = digest_reader(data).await?;
        let file_name = Self::file_name_for(&digest);
        let file_path = self.image_dir.join(&file_name);

        let created = !fs::try_exists(&file_path).await?;
        fs::write(&file_path, data).await?;

        debug!(
            "Stored image {} ({} bytes, new file: {})",
            file_name,
            data.len(),
            created
        );

        Ok(StoredImage { file_name, created })
    }

    /// Path to serve for `file_name`.
    ///
    /// Names must end in `.jpg` and be a single plain path component. A
    /// well-formed name with no file behind it resolves to the default
    /// placeholder instead.
    pub async fn resolve(&self, file_name: &str) -> AppResult<PathBuf> {
        validate_file_name(file_name)?;

        // A name the file system refuses to look up counts as absent
        let file_path = self.image_dir.join(file_name);
        match fs::try_exists(&file_path).await {
            Ok(true) => return Ok(file_path),
            Ok(false) => debug!("Image not found: {}", file_path.display()),
            Err(e) => debug!("Image lookup failed for {}: {}", file_path.display(), e),
        }

        let fallback = self.default_image_path();
        if fs::try_exists(&fallback).await? {
            Ok(fallback)
        } else {
            Err(AppError::not_found("Image", file_name))
        }
    }

    /// Bytes to serve for `file_name`, with the same fallback as [`Self::resolve`]
    pub async fn read(&self, file_name: &str) -> AppResult<Vec<u8>> {
        let path = self.resolve(file_name).await?;
        Ok(fs::read(path).await?)
    }

    /// Delete a stored image; a file that is already gone is not an error
    pub async fn remove(&self, file_name: &str) -> Result<(), std::io::Error> {
        match fs::remove_file(self.image_dir.join(file_name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

fn validate_file_name(file_name: &str) -> AppResult<()> {
    if !file_name.ends_with(&format!(".{}", IMAGE_EXTENSION)) {
        return Err(AppError::validation("Image path does not end with .jpg"));
    }

    let mut components = Path::new(file_name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(AppError::validation("Invalid image file name")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_assets::digest_bytes;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> ImageStore {
        ImageStore::new(dir.path().join("images"), "default.jpg")
    }

    #[tokio::test]
    async fn identical_bytes_share_a_file() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        let first = store.put(b"same bytes").await.unwrap();
        let second = store.put(b"same bytes").await.unwrap();

        assert_eq!(first.file_name, second.file_name);
        assert_eq!(
            first.file_name,
            format!("{}.jpg", digest_bytes(b"same bytes"))
        );
        assert!(first.created);
        assert!(!second.created);

        let on_disk = std::fs::read(store.image_dir().join(&first.file_name)).unwrap();
        assert_eq!(on_disk, b"same bytes");
    }

    #[tokio::test]
    async fn different_bytes_get_different_names() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        let a = store.put(b"one").await.unwrap();
        let b = store.put(b"two").await.unwrap();
        assert_ne!(a.file_name, b.file_name);
    }

    #[tokio::test]
    async fn missing_image_falls_back_to_default() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.ensure_storage_dir().await.unwrap();
        std::fs::write(store.default_image_path(), b"placeholder").unwrap();

        let path = store.resolve("0123abcd.jpg").await.unwrap();
        assert_eq!(path, store.default_image_path());
        assert_eq!(store.read("0123abcd.jpg").await.unwrap(), b"placeholder");
    }

    #[tokio::test]
    async fn unreadable_names_fall_back_to_default() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.ensure_storage_dir().await.unwrap();
        std::fs::write(store.default_image_path(), b"placeholder").unwrap();

        let too_long = format!("{}.jpg", "a".repeat(300));
        for name in [too_long.as_str(), "a\0b.jpg"] {
            assert_eq!(store.resolve(name).await.unwrap(), store.default_image_path());
            assert_eq!(store.read(name).await.unwrap(), b"placeholder");
        }
    }

    #[test]
    fn bundled_placeholder_is_a_complete_jpeg() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("images/default.jpg");
        let bytes = std::fs::read(path).unwrap();

        assert!(bytes.len() > 4);
        assert_eq!(&bytes[..3], &[0xFF, 0xD8, 0xFF]);
        assert_eq!(&bytes[bytes.len() - 2..], &[0xFF, 0xD9]);
    }

    #[tokio::test]
    async fn existing_image_is_served_directly() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let stored = store.put(b"pixels").await.unwrap();

        assert_eq!(store.read(&stored.file_name).await.unwrap(), b"pixels");
    }

    #[tokio::test]
    async fn non_jpg_names_are_rejected_even_if_present() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.ensure_storage_dir().await.unwrap();
        std::fs::write(store.image_dir().join("photo.png"), b"png").unwrap();

        let err = store.resolve("photo.png").await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn traversal_names_are_rejected() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        for name in ["../secret.jpg", "nested/file.jpg", "/etc/passwd.jpg"] {
            let err = store.resolve(name).await.unwrap_err();
            assert!(
                matches!(err, AppError::Validation { .. }),
                "{name} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn missing_default_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.ensure_storage_dir().await.unwrap();

        let err = store.resolve("absent.jpg").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn remove_tolerates_missing_files() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let stored = store.put(b"short lived").await.unwrap();

        store.remove(&stored.file_name).await.unwrap();
        assert!(!store.image_dir().join(&stored.file_name).exists());
        store.remove(&stored.file_name).await.unwrap();
    }
}
