use std::path::PathBuf;

use anyhow::Context as _;
use uuid::Uuid;

use crate::domain::repository::MediaStore;
use crate::error::ApiError;

/// Recipe images live under this directory of the media root.
pub const RECIPE_IMAGE_DIR: &str = "recipes/images";

/// Writes uploads below a media root on the local filesystem.
#[derive(Clone)]
pub struct FsMediaStore {
    pub root: PathBuf,
}

impl FsMediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl MediaStore for FsMediaStore {
    async fn save_recipe_image(&self, extension: &str, bytes: &[u8]) -> Result<String, ApiError> {
        let dir = self.root.join(RECIPE_IMAGE_DIR);
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("create media dir {}", dir.display()))?;
        let file_name = format!("{}.{extension}", Uuid::new_v4());
        tokio::fs::write(dir.join(&file_name), bytes)
            .await
            .context("write recipe image")?;
        Ok(format!("{RECIPE_IMAGE_DIR}/{file_name}"))
    }

    async fn remove_recipe_image(&self, path: &str) -> Result<(), ApiError> {
        let Some(file_name) = path
            .strip_prefix(RECIPE_IMAGE_DIR)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|name| !name.is_empty() && !name.contains(['/', '\\']) && *name != "..")
        else {
            return Err(anyhow::anyhow!("refusing to remove {path:?} outside {RECIPE_IMAGE_DIR}").into());
        };
        match tokio::fs::remove_file(self.root.join(RECIPE_IMAGE_DIR).join(file_name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(anyhow::Error::new(e).context("remove recipe image").into()),
        }
    }
}

/// Public URL for a path relative to the media root.
pub fn media_url(path: &str) -> String {
    format!("/media/{path}")
}
