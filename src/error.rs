//! Errors raised while disabling a rule.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::CONFIG_CANDIDATES;

/// Failure of the disable-rule command.
///
/// The `Display` text is what the user sees in the editor.
#[derive(Debug, Error)]
pub enum DisableError {
    /// None of the candidate configuration files exist in the workspace root.
    #[error("Could not find {} in workspace.", CONFIG_CANDIDATES.join(" or "))]
    ConfigNotFound { root: PathBuf },

    /// A JSON configuration without a detectable `"rules": {` header.
    #[error("Could not find 'rules' section in {}.", .path.display())]
    RulesSectionNotFound { path: PathBuf },

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} cannot be expressed as a file URI.", .path.display())]
    InvalidPath { path: PathBuf },

    /// The client answered `workspace/applyEdit` with `applied: false`.
    #[error(
        "The editor rejected the edit to {}: {}",
        .path.display(),
        .reason.as_deref().unwrap_or("no reason given")
    )]
    EditRejected {
        path: PathBuf,
        reason: Option<String>,
    },

    #[error("Editor request failed: {0}")]
    Client(#[from] tower_lsp::jsonrpc::Error),
}
