//! Input file scanner.
//!
//! Recursively discovers `.msg` schema documents and (optionally) `.rs`
//! sources, respecting `.gitignore` patterns and a custom glob filter.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use msgforge_compiler::SourceKind;

use crate::error::{CliResult, ScanError};

/// A discovered input file with its content.
#[derive(Debug, Clone)]
pub struct InputFile {
    /// Absolute path to the file.
    pub path: PathBuf,

    /// Path relative to the scan root.
    pub relative_path: PathBuf,

    /// Which front end handles it.
    pub kind: SourceKind,

    /// File content.
    pub content: String,
}

/// Scanner for discovering input files.
#[derive(Debug)]
pub struct InputScanner {
    /// Root directory to scan.
    root: PathBuf,

    /// Whether to include `.rs` sources.
    scan_rust: bool,

    /// Whether to respect .gitignore files.
    respect_gitignore: bool,

    /// Optional glob filter pattern.
    filter: Option<glob::Pattern>,
}

impl InputScanner {
    /// Create a new scanner for the given root directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            scan_rust: true,
            respect_gitignore: true,
            filter: None,
        }
    }

    /// Set whether `.rs` sources are scanned.
    pub fn with_rust(mut self, scan_rust: bool) -> Self {
        self.scan_rust = scan_rust;
        self
    }

    /// Set whether to respect .gitignore files.
    pub fn with_gitignore(mut self, respect: bool) -> Self {
        self.respect_gitignore = respect;
        self
    }

    /// Set a glob filter pattern; only matching files are included.
    pub fn with_filter(mut self, pattern: &str) -> Result<Self, ScanError> {
        let glob_pattern = glob::Pattern::new(pattern)
            .map_err(|e| ScanError::invalid_pattern(pattern, e.to_string()))?;
        self.filter = Some(glob_pattern);
        Ok(self)
    }

    /// Scan the directory and return all discovered input files.
    pub fn scan(&self) -> CliResult<Vec<InputFile>> {
        if !self.root.exists() {
            return Err(ScanError::not_found(self.root.clone()).into());
        }

        let mut files = Vec::new();

        let walker = WalkBuilder::new(&self.root)
            .git_ignore(self.respect_gitignore)
            .git_global(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .hidden(false)
            .build();

        for entry in walker {
            let entry = entry.map_err(ScanError::Walk)?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            let kind = match path.extension().and_then(|e| e.to_str()) {
                Some(extension) => match SourceKind::from_extension(extension) {
                    Some(SourceKind::Rust) if !self.scan_rust => continue,
                    Some(kind) => kind,
                    None => continue,
                },
                None => continue,
            };

            if let Some(ref pattern) = self.filter {
                let relative = self.relative_path(path);
                if !pattern.matches_path(&relative) {
                    continue;
                }
            }

            let content = std::fs::read_to_string(path).map_err(|e| ScanError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

            files.push(InputFile {
                path: path.to_path_buf(),
                relative_path: self.relative_path(path),
                kind,
                content,
            });
        }

        if files.is_empty() {
            return Err(ScanError::no_input_files(self.root.clone()).into());
        }

        // Stable order: discovery must not depend on walk order.
        files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        Ok(files)
    }

    /// Scan without failing on empty results.
    pub fn scan_allow_empty(&self) -> CliResult<Vec<InputFile>> {
        match self.scan() {
            Ok(files) => Ok(files),
            Err(crate::error::CliError::Scan(ScanError::NoInputFiles { .. })) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// Get the relative path from root.
    fn relative_path(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root).unwrap_or(path).to_path_buf()
    }

    /// Get the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}
