//! ESLint configuration discovery and server settings.
//!
//! The disable command edits the first ESLint configuration file it finds in
//! the workspace root. Only these filenames are recognized, in this order:
//!
//! ```text
//! .eslintrc.yaml
//! .eslintrc.yml
//! .eslintrc.json
//! ```
//!
//! Indentation comes from the client's `editor` configuration for the file
//! being edited. Server settings act as the fallback; they arrive through
//! `initializationOptions` and `workspace/didChangeConfiguration`, either at
//! the top level or nested under an `eslintDisable` key:
//!
//! ```json
//! { "eslintDisable": { "insertSpaces": false, "tabSize": 2 } }
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

/// Candidate configuration filenames, highest priority first.
pub const CONFIG_CANDIDATES: [&str; 3] = [".eslintrc.yaml", ".eslintrc.yml", ".eslintrc.json"];

/// Key under which clients may nest the settings object.
const SETTINGS_SECTION: &str = "eslintDisable";

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

/// Finds the ESLint configuration file of a workspace.
pub trait ConfigLocator: Send + Sync {
    /// Whether a file exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Return the first candidate under `root` that exists.
    fn locate(&self, root: &Path) -> Option<PathBuf> {
        CONFIG_CANDIDATES
            .iter()
            .map(|name| root.join(name))
            .find(|candidate| self.exists(candidate))
    }
}

/// [`ConfigLocator`] backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsConfigLocator;

impl ConfigLocator for FsConfigLocator {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// The two configuration dialects that can be edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// Brace-delimited `.eslintrc.json`.
    Json,
    /// Indentation-based `.eslintrc.yaml` / `.eslintrc.yml`.
    Yaml,
}

impl ConfigFormat {
    /// Classify a configuration file by its extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => ConfigFormat::Json,
            _ => ConfigFormat::Yaml,
        }
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Indentation used for inserted lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerSettings {
    /// Indent with spaces instead of a tab.
    pub insert_spaces: bool,

    /// Number of spaces per indentation level when `insert_spaces` is set.
    pub tab_size: u32,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            insert_spaces: true,
            tab_size: 4,
        }
    }
}

/// The indentation keys a client payload may carry, each optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IndentKeys {
    insert_spaces: Option<bool>,
    tab_size: Option<u32>,
}

impl ServerSettings {
    /// Overlay the indentation keys found in a client JSON value.
    ///
    /// Keys are read from a nested `eslintDisable` object when present,
    /// otherwise from the top level (which is also the shape of the
    /// `editor` configuration section). Returns `None` when the value carries
    /// neither key, e.g. `null` or a payload for another extension, so the
    /// caller keeps what it has.
    pub fn overlay(&self, value: &Value) -> Result<Option<Self>> {
        let section = value
            .get(SETTINGS_SECTION)
            .filter(|section| section.is_object())
            .unwrap_or(value);
        if !section.is_object() {
            return Ok(None);
        }

        let keys: IndentKeys = serde_json::from_value(section.clone())
            .context("parsing eslint-disable settings")?;
        if keys.insert_spaces.is_none() && keys.tab_size.is_none() {
            return Ok(None);
        }

        Ok(Some(Self {
            insert_spaces: keys.insert_spaces.unwrap_or(self.insert_spaces),
            tab_size: keys.tab_size.unwrap_or(self.tab_size),
        }))
    }

    /// One level of indentation.
    pub fn indent_unit(&self) -> String {
        if self.insert_spaces {
            " ".repeat(self.tab_size.max(1) as usize)
        } else {
            "\t".to_string()
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
