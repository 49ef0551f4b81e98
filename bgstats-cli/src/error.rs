use thiserror::Error;

use bgstats_catalog::ExportError;
use bgstats_merge::MergeError;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Loading or writing an export failed
    #[error("{0}")]
    Export(#[from] ExportError),

    /// The merge itself failed
    #[error("Merge failed: {0}")]
    Merge(#[from] MergeError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Catch-all for other errors
    #[error("{0}")]
    Other(String),
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
