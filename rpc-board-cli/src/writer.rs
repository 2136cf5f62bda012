//! Emitting board artifacts.
//!
//! The tree artifact is parsed back before it leaves the process, so a file
//! on disk always loads into the tree that was built. The starter
//! configuration is parsed back the same way and never clobbers an existing
//! file unless forced.

use crate::commands::BuildReport;
use crate::config::ConfigManager;
use crate::error::{CliError, CliResult, WriteError};
use rpc_board::TreeData;
use std::path::{Path, PathBuf};

/// What happened to an emitted artifact.
#[derive(Debug, PartialEq, Eq)]
pub enum Emitted {
    /// The artifact is on disk.
    Written { path: PathBuf, bytes: usize },
    /// Preview mode: the artifact was checked but not written.
    Preview { path: PathBuf, content: String },
}

impl Emitted {
    pub fn path(&self) -> &Path {
        match self {
            Emitted::Written { path, .. } | Emitted::Preview { path, .. } => path,
        }
    }
}

/// Writes verified tree artifacts and configuration files.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArtifactWriter {
    preview: bool,
}

impl ArtifactWriter {
    /// A writer that touches the filesystem.
    pub fn new() -> Self {
        Self { preview: false }
    }

    /// A writer that only reports what it would write.
    pub fn preview() -> Self {
        Self { preview: true }
    }

    /// Emit the tree artifact of `report` at `path`.
    ///
    /// Fails with [`CliError::Validation`] if the JSON does not load back
    /// into the built tree.
    #[tracing::instrument(skip(self, report), fields(path = %path.display()))]
    pub fn emit_tree(&self, path: &Path, report: &BuildReport) -> CliResult<Emitted> {
        let reloaded = TreeData::from_json(&report.json)?;
        if reloaded != report.tree {
            return Err(CliError::Validation(format!(
                "tree artifact for {} does not reload into the built tree",
                path.display()
            )));
        }
        self.emit(path, &report.json)
    }

    /// Emit the commented starter configuration at `path`.
    ///
    /// An existing file is only replaced when `force` is set.
    pub fn write_config(&self, path: &Path, force: bool) -> CliResult<Emitted> {
        if path.exists() && !force {
            return Err(CliError::Validation(format!(
                "Configuration file already exists: {} (use --force to overwrite)",
                path.display()
            )));
        }
        let content = ConfigManager::default_config_content();
        ConfigManager::parse(path, content)?;
        self.emit(path, content)
    }

    fn emit(&self, path: &Path, content: &str) -> CliResult<Emitted> {
        if self.preview {
            return Ok(Emitted::Preview {
                path: path.to_path_buf(),
                content: content.to_string(),
            });
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| WriteError::CreateDir {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| WriteError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        tracing::debug!(path = %path.display(), bytes = content.len(), "artifact written");

        Ok(Emitted::Written {
            path: path.to_path_buf(),
            bytes: content.len(),
        })
    }
}

/// Read a UTF-8 input file.
pub fn read_input(path: &Path) -> CliResult<String> {
    std::fs::read_to_string(path).map_err(|e| {
        WriteError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        }
        .into()
    })
}
