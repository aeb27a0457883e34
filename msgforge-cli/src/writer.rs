//! Output file writer with dry-run support.

use std::path::{Path, PathBuf};

use crate::error::{CliResult, WriteError};

/// The result of a write operation.
#[derive(Debug, Clone)]
pub enum WriteResult {
    /// File was written to disk.
    Written {
        /// Destination path.
        path: PathBuf,
        /// Bytes written.
        bytes: usize,
    },

    /// Dry run: nothing touched disk.
    DryRun {
        /// Destination path.
        path: PathBuf,
        /// The content that would have been written.
        content: String,
    },

    /// The file already holds exactly this content.
    Unchanged {
        /// Destination path.
        path: PathBuf,
    },
}

/// Writer for generated output files.
#[derive(Debug)]
pub struct FileWriter {
    dry_run: bool,
}

impl FileWriter {
    /// Create a writer; `dry_run` previews without touching disk.
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Write content to a path, creating parent directories as needed.
    ///
    /// An up-to-date file is left untouched so watchers and build systems
    /// do not see spurious changes.
    pub fn write(&self, path: &Path, content: &str) -> CliResult<WriteResult> {
        if self.dry_run {
            return Ok(WriteResult::DryRun {
                path: path.to_path_buf(),
                content: content.to_string(),
            });
        }

        if let Ok(existing) = std::fs::read_to_string(path) {
            if existing == content {
                return Ok(WriteResult::Unchanged {
                    path: path.to_path_buf(),
                });
            }
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| WriteError::CreateDir {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        std::fs::write(path, content).map_err(|e| WriteError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(WriteResult::Written {
            path: path.to_path_buf(),
            bytes: content.len(),
        })
    }
}
