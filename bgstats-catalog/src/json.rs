//! JSON loading and saving of export files.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::types::{Export, Player};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("JSON parse error in {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("I/O error writing {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to serialize export: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// One loaded input file.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// File name without directories, used in prompts.
    pub name: String,
    pub path: PathBuf,
    pub export: Export,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, export: Export) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { name, path, export }
    }

    pub fn owner(&self) -> Option<&Player> {
        self.export.owner()
    }

    /// Human-readable label: `name (owner - N plays)`.
    pub fn label(&self) -> String {
        let owner = self.owner().map(|p| p.display_name()).unwrap_or("unknown owner");
        format!(
            "{} ({} - {} plays)",
            self.name,
            owner,
            self.export.plays.len()
        )
    }
}

/// Parse a single export file.
pub fn load_export(path: &Path) -> Result<Export, ExportError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ExportError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    serde_json::from_str(&contents).map_err(|e| ExportError::Parse {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load every input file, in order. The first failure aborts the whole load.
pub fn load_source_files<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<SourceFile>, ExportError> {
    paths
        .iter()
        .map(|p| {
            let path = p.as_ref();
            let export = load_export(path)?;
            log::debug!(
                "Loaded {} ({} plays, {} players)",
                path.display(),
                export.plays.len(),
                export.players.len()
            );
            Ok(SourceFile::new(path, export))
        })
        .collect()
}

/// Write an export as pretty-printed JSON.
///
/// The document is written to a temporary sibling file and renamed into place.
pub fn save_export(path: &Path, export: &Export) -> Result<(), ExportError> {
    let serialized = serde_json::to_string_pretty(export)?;
    let write_err = |e: std::io::Error| ExportError::Write {
        path: path.display().to_string(),
        source: e,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, serialized).map_err(write_err)?;
    std::fs::rename(&tmp, path).map_err(write_err)?;

    Ok(())
}
