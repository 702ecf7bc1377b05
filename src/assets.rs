//! Uploaded image files served under `/attached_assets`.

use std::path::{Path, PathBuf};

use chrono::Utc;
use rand::Rng;
use serde::Serialize;
use thiserror::Error;
use tokio::fs;
use utoipa::ToSchema;

pub const PUBLIC_PREFIX: &str = "/attached_assets";
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Only image files are allowed")]
    NotAnImage,

    #[error("File exceeds the 5 MB limit")]
    TooLarge,

    #[error("Invalid image URL: {0}")]
    InvalidUrl(String),

    #[error("Image file not found")]
    Missing,

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Products,
    Categories,
}

impl AssetKind {
    pub fn dir(&self) -> &'static str {
        match self {
            AssetKind::Products => "products",
            AssetKind::Categories => "categories",
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StoredAsset {
    pub url: String,
    pub filename: String,
}

pub struct AssetStore {
    root: PathBuf,
}

impl AssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes an uploaded image as `image-<millis>-<rand><ext>` under the
    /// directory for `kind`.
    pub async fn save(
        &self,
        kind: AssetKind,
        original_name: Option<&str>,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<StoredAsset, AssetError> {
        if !content_type.is_some_and(|ct| ct.starts_with("image/")) {
            return Err(AssetError::NotAnImage);
        }
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(AssetError::TooLarge);
        }

        let dir = self.root.join(kind.dir());
        fs::create_dir_all(&dir).await.map_err(|source| AssetError::Io {
            path: dir.clone(),
            source,
        })?;

        let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
        let filename = format!(
            "image-{}-{}{}",
            Utc::now().timestamp_millis(),
            suffix,
            extension_of(original_name)
        );
        let path = dir.join(&filename);
        fs::write(&path, bytes)
            .await
            .map_err(|source| AssetError::Io { path, source })?;

        tracing::info!(kind = kind.dir(), %filename, size = bytes.len(), "image stored");
        Ok(StoredAsset {
            url: format!("{PUBLIC_PREFIX}/{}/{}", kind.dir(), filename),
            filename,
        })
    }

    /// Removes the file behind a public asset URL.
    pub async fn delete_url(&self, url: &str) -> Result<(), AssetError> {
        let path = self.resolve(url)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), "image deleted");
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(AssetError::Missing),
            Err(source) => Err(AssetError::Io { path, source }),
        }
    }

    /// Deletes every local file referenced by `urls`, logging failures.
    /// URLs outside `/attached_assets/` are ignored.
    pub async fn delete_best_effort<'a>(&self, urls: impl IntoIterator<Item = &'a str>) {
        for url in urls {
            if !url.starts_with(PUBLIC_PREFIX) {
                continue;
            }
            match self.delete_url(url).await {
                Ok(()) | Err(AssetError::Missing) => {}
                Err(err) => tracing::warn!(error = %err, %url, "image cleanup failed"),
            }
        }
    }

    /// Maps `/attached_assets/<dir>/<file>` onto the asset root.
    fn resolve(&self, url: &str) -> Result<PathBuf, AssetError> {
        let invalid = || AssetError::InvalidUrl(url.to_string());
        let rest = url
            .strip_prefix(PUBLIC_PREFIX)
            .and_then(|r| r.strip_prefix('/'))
            .ok_or_else(invalid)?;

        let mut segments = rest.rsplit('/');
        let filename = segments.next().filter(|s| is_safe_segment(s)).ok_or_else(invalid)?;
        let dir = segments.next().filter(|s| is_safe_segment(s)).ok_or_else(invalid)?;
        Ok(self.root.join(dir).join(filename))
    }
}

fn is_safe_segment(segment: &str) -> bool {
    !segment.is_empty()
        && !segment.starts_with('.')
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
}

fn extension_of(original_name: Option<&str>) -> String {
    original_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default()
}
