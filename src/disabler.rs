//! The disable-rule command.
//!
//! [`RuleDisabler`] finds the workspace's ESLint configuration, computes where
//! the new `off` entry belongs and asks a [`DocumentEditor`] to splice it in.
//! Both the filesystem and the editor are injected so the command can run
//! against in-memory fakes.

use std::path::Path;

use tower_lsp::async_trait;
use tower_lsp::lsp_types::Position;
use tracing::{debug, info};

use crate::config::{ConfigFormat, ConfigLocator, ServerSettings};
use crate::error::DisableError;
use crate::insertion::{plan_insertion, Insertion};

/// Editing capabilities the disabler needs from the client.
#[async_trait]
pub trait DocumentEditor: Send + Sync {
    /// Current text of the document at `path`.
    async fn open(&self, path: &Path) -> Result<String, DisableError>;

    /// Indentation the editor uses for `path`, or `fallback` when it cannot say.
    async fn indentation(&self, path: &Path, fallback: ServerSettings) -> ServerSettings;

    /// Insert `text` at `position` as one atomic edit.
    async fn insert(&self, path: &Path, position: Position, text: &str)
        -> Result<(), DisableError>;

    /// Show the document, optionally placing the cursor at `cursor`.
    async fn reveal(&self, path: &Path, cursor: Option<Position>) -> Result<(), DisableError>;
}

/// Appends `<rule>: off` entries to ESLint configuration files.
pub struct RuleDisabler<'a> {
    locator: &'a dyn ConfigLocator,
    editor: &'a dyn DocumentEditor,
    settings: ServerSettings,
}

impl<'a> RuleDisabler<'a> {
    /// Create a disabler over the given capabilities.
    pub fn new(
        locator: &'a dyn ConfigLocator,
        editor: &'a dyn DocumentEditor,
        settings: ServerSettings,
    ) -> Self {
        Self {
            locator,
            editor,
            settings,
        }
    }

    /// Disable `rule_id` in the ESLint configuration under `root`.
    ///
    /// On success returns the insertion that was applied.
    pub async fn disable(&self, root: &Path, rule_id: &str) -> Result<Insertion, DisableError> {
        let path = self
            .locator
            .locate(root)
            .ok_or_else(|| DisableError::ConfigNotFound {
                root: root.to_path_buf(),
            })?;
        let format = ConfigFormat::from_path(&path);
        debug!("Disabling {} in {} ({:?})", rule_id, path.display(), format);

        let text = self.editor.open(&path).await?;
        let indent = self.editor.indentation(&path, self.settings).await.indent_unit();

        let Some(insertion) = plan_insertion(&text, format, rule_id, &indent) else {
            self.editor.reveal(&path, None).await?;
            return Err(DisableError::RulesSectionNotFound { path });
        };

        self.editor
            .insert(&path, insertion.position, &insertion.text)
            .await?;
        self.editor.reveal(&path, Some(insertion.cursor)).await?;

        info!(
            "Disabled {} in {} at line {}",
            rule_id,
            path.display(),
            insertion.cursor.line + 1
        );
        Ok(insertion)
    }
}
