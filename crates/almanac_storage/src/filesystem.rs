//! Filesystem-backed report storage.

use almanac_error::{AlmanacResult, StorageError, StorageErrorKind};
use std::path::{Path, PathBuf};

/// Writes step outputs, error files and the combined document.
///
/// # Layout
///
/// ```text
/// output/
/// ├── market_structure.md
/// ├── marketplace_dynamics.md
/// ├── worker_journey.error.md       (failed step)
/// └── final_multi_step_analysis.md
/// ```
///
/// Every write goes to a temp file first and is renamed into place, so a
/// crash never leaves a half-written report behind.
#[derive(Debug, Clone)]
pub struct ReportStorage {
    root: PathBuf,
}

impl ReportStorage {
    /// Opens storage rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    #[tracing::instrument(skip(root))]
    pub async fn new(root: impl Into<PathBuf>) -> AlmanacResult<Self> {
        let root = root.into();

        tokio::fs::create_dir_all(&root).await.map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                root.display(),
                e
            )))
        })?;

        tracing::debug!(path = %root.display(), "Opened report storage");
        Ok(Self { root })
    }

    /// Output root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path a step's output is written to.
    pub fn step_path(&self, output_file: &str) -> PathBuf {
        self.root.join(output_file)
    }

    /// Path a step's failure record is written to.
    pub fn error_path(&self, step: &str) -> PathBuf {
        self.root.join(format!("{}.error.md", step))
    }

    /// Persists a step's output verbatim.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not a plain file name or the write fails.
    #[tracing::instrument(skip(self, content), fields(size = content.len()))]
    pub async fn write_step(&self, output_file: &str, content: &str) -> AlmanacResult<PathBuf> {
        Self::check_name(output_file)?;
        let path = self.step_path(output_file);
        self.write_atomic(&path, content).await?;
        tracing::info!(path = %path.display(), "Saved step output");
        Ok(path)
    }

    /// Persists a step failure as `<step>.error.md`.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not a plain file name or the write fails.
    #[tracing::instrument(skip(self, message))]
    pub async fn write_error(&self, step: &str, message: &str) -> AlmanacResult<PathBuf> {
        Self::check_name(step)?;
        let path = self.error_path(step);
        let content = format!("# Error in {}\n\n{}\n", step, message);
        self.write_atomic(&path, &content).await?;
        tracing::info!(path = %path.display(), "Saved step error");
        Ok(path)
    }

    /// Persists the combined document.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not a plain file name or the write fails.
    #[tracing::instrument(skip(self, content), fields(size = content.len()))]
    pub async fn write_document(&self, file_name: &str, content: &str) -> AlmanacResult<PathBuf> {
        Self::check_name(file_name)?;
        let path = self.root.join(file_name);
        self.write_atomic(&path, content).await?;
        tracing::info!(path = %path.display(), "Saved combined document");
        Ok(path)
    }

    /// Reads a previously written file back.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid or the file cannot be read.
    pub async fn read(&self, file_name: &str) -> AlmanacResult<String> {
        Self::check_name(file_name)?;
        let path = self.root.join(file_name);
        let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileRead(format!("{}: {}", path.display(), e)))
        })?;
        Ok(content)
    }

    async fn write_atomic(&self, path: &Path, content: &str) -> AlmanacResult<()> {
        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, content).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;

        tokio::fs::rename(&temp_path, path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            )))
        })?;
        Ok(())
    }

    fn check_name(name: &str) -> AlmanacResult<()> {
        let plain = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\']);
        if plain {
            Ok(())
        } else {
            Err(StorageError::new(StorageErrorKind::InvalidPath(name.to_string())).into())
        }
    }
}
