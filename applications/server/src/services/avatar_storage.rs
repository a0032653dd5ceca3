/// Avatar storage service - manages uploaded images on disk
use crate::error::{Result, ServerError};
use roster_core::ImageType;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

/// URL prefix under which stored avatars are served
pub const PUBLIC_PREFIX: &str = "/uploads";

#[derive(Debug, Clone)]
pub struct AvatarStorage {
    base_path: PathBuf,
}

impl AvatarStorage {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Initialize the upload directory
    pub async fn initialize(&self) -> Result<()> {
        fs::create_dir_all(&self.base_path).await?;
        Ok(())
    }

    /// Store an uploaded image and return its public path (`/uploads/<file>`).
    ///
    /// The bytes go to a temporary name first and are renamed into place, so
    /// a half-written file is never visible under the public name.
    pub async fn store(&self, image_type: ImageType, data: &[u8]) -> Result<String> {
        let id = Uuid::new_v4();
        let filename = format!("avatar-{}.{}", id, image_type.extension());
        let partial = self.base_path.join(format!(".{filename}.part"));
        let path = self.base_path.join(&filename);

        fs::create_dir_all(&self.base_path).await?;
        fs::write(&partial, data).await?;
        if let Err(e) = fs::rename(&partial, &path).await {
            let _ = fs::remove_file(&partial).await;
            return Err(e.into());
        }

        tracing::debug!(file = %filename, size = data.len(), "Stored avatar");
        Ok(format!("{PUBLIC_PREFIX}/{filename}"))
    }

    /// Map a public avatar path back to a file inside the upload directory.
    ///
    /// Returns `None` for external URLs and for anything that is not a single
    /// plain file name under the prefix.
    pub fn resolve(&self, public_path: &str) -> Option<PathBuf> {
        let name = public_path.strip_prefix(PUBLIC_PREFIX)?.strip_prefix('/')?;
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(file)), None) => Some(self.base_path.join(file)),
            _ => None,
        }
    }

    /// Whether `public_path` refers to a file this storage manages
    pub fn is_local(&self, public_path: &str) -> bool {
        self.resolve(public_path).is_some()
    }

    /// Delete a stored avatar. Returns `false` when there was nothing to remove.
    pub async fn remove(&self, public_path: &str) -> Result<bool> {
        let Some(path) = self.resolve(public_path) else {
            return Ok(false);
        };

        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ServerError::Io(e)),
        }
    }

    /// Best-effort removal used after a request has already been answered
    /// or failed for another reason
    pub async fn discard(&self, public_path: &str) {
        if let Err(e) = self.remove(public_path).await {
            tracing::warn!(path = %public_path, error = %e, "Failed to remove avatar file");
        }
    }
}
