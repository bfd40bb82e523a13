use std::io;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// URL prefix under which the upload root is served.
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

/// Subdirectory for journal entry images.
pub const JOURNAL_CATEGORY: &str = "journal";

/// Saves and removes uploaded images under a single root directory.
///
/// Files are stored by their client-supplied name; saving a second file with
/// the same name overwrites the first. The value persisted in the database is
/// the public URL path (`/uploads/journal/pod.jpg`), which maps back onto the
/// root directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes `bytes` to `<root>/[category/]file_name`, creating directories as
    /// needed, and returns the public path of the stored file.
    pub async fn save(
        &self,
        category: Option<&str>,
        file_name: &str,
        bytes: &[u8],
    ) -> io::Result<String> {
        let relative = match category {
            Some(category) => format!("{category}/{file_name}"),
            None => file_name.to_string(),
        };
        let path = self.resolve(&relative)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, bytes).await?;

        tracing::debug!(path = %path.display(), bytes = bytes.len(), "Saved upload.");
        Ok(format!("{UPLOADS_URL_PREFIX}/{relative}"))
    }

    /// Removes the file behind a public path returned by [`FileStore::save`].
    pub async fn delete(&self, public_path: &str) -> io::Result<()> {
        let relative = public_path
            .strip_prefix(UPLOADS_URL_PREFIX)
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("not an upload path: {public_path}"),
                )
            })?;
        let path = self.resolve(relative)?;
        fs::remove_file(&path).await?;

        tracing::debug!(path = %path.display(), "Deleted upload.");
        Ok(())
    }

    /// Like [`FileStore::delete`], but a failure is only logged. File removal is
    /// a side effect of a database change and never fails the request.
    pub async fn delete_logged(&self, public_path: &str) {
        if let Err(e) = self.delete(public_path).await {
            tracing::warn!(path = public_path, error = %e, "Failed to delete image file.");
        }
    }

    fn resolve(&self, relative: &str) -> io::Result<PathBuf> {
        let relative = Path::new(relative);
        if relative.components().all(|c| matches!(c, Component::Normal(_))) {
            Ok(self.root.join(relative))
        } else {
            Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("path escapes the upload directory: {}", relative.display()),
            ))
        }
    }
}
