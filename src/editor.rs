//! [`DocumentEditor`] over an LSP client connection.

use std::collections::HashMap;
use std::path::Path;

use dashmap::DashMap;
use serde_json::Value;
use tower_lsp::async_trait;
use tower_lsp::lsp_types::*;
use tower_lsp::Client;
use tracing::{debug, warn};

use crate::config::ServerSettings;
use crate::disabler::DocumentEditor;
use crate::error::DisableError;

/// Configuration section holding the client's indentation options.
const EDITOR_SECTION: &str = "editor";

/// Document state stored for each open file.
#[derive(Debug)]
pub struct DocumentState {
    pub content: String,
    pub version: i32,
}

/// Edits documents through `workspace/applyEdit` and `window/showDocument`.
///
/// Text is read from the client's buffer when the document is open,
/// otherwise from disk. Edits to a buffer carry the version that was read so
/// the client refuses them if the buffer moved on in between.
pub struct LspEditor<'a> {
    client: &'a Client,
    documents: &'a DashMap<Url, DocumentState>,
    read_versions: DashMap<Url, i32>,
}

impl<'a> LspEditor<'a> {
    pub fn new(client: &'a Client, documents: &'a DashMap<Url, DocumentState>) -> Self {
        Self {
            client,
            documents,
            read_versions: DashMap::new(),
        }
    }
}

fn file_uri(path: &Path) -> Result<Url, DisableError> {
    Url::from_file_path(path).map_err(|()| DisableError::InvalidPath {
        path: path.to_path_buf(),
    })
}

/// A single insertion, versioned when the text came from an open buffer.
fn insert_edit(uri: Url, version: Option<i32>, position: Position, text: &str) -> WorkspaceEdit {
    let edit = TextEdit {
        range: Range::new(position, position),
        new_text: text.to_string(),
    };

    match version {
        Some(version) => WorkspaceEdit {
            document_changes: Some(DocumentChanges::Edits(vec![TextDocumentEdit {
                text_document: OptionalVersionedTextDocumentIdentifier {
                    uri,
                    version: Some(version),
                },
                edits: vec![OneOf::Left(edit)],
            }])),
            ..Default::default()
        },
        None => WorkspaceEdit {
            changes: Some(HashMap::from([(uri, vec![edit])])),
            ..Default::default()
        },
    }
}

fn edit_outcome(path: &Path, response: ApplyWorkspaceEditResponse) -> Result<(), DisableError> {
    if response.applied {
        Ok(())
    } else {
        Err(DisableError::EditRejected {
            path: path.to_path_buf(),
            reason: response.failure_reason,
        })
    }
}

/// Indentation from a `workspace/configuration` answer for the `editor` section.
fn editor_indentation(values: &[Value], fallback: ServerSettings) -> ServerSettings {
    let Some(editor) = values.first() else {
        return fallback;
    };

    match fallback.overlay(editor) {
        Ok(Some(settings)) => settings,
        Ok(None) => fallback,
        Err(err) => {
            warn!("Ignoring editor indentation: {:#}", err);
            fallback
        }
    }
}

#[async_trait]
impl DocumentEditor for LspEditor<'_> {
    async fn open(&self, path: &Path) -> Result<String, DisableError> {
        let uri = file_uri(path)?;

        let buffered = self
            .documents
            .get(&uri)
            .map(|doc| (doc.content.clone(), doc.version));
        if let Some((content, version)) = buffered {
            debug!("Using open buffer for {} (version {})", uri, version);
            self.read_versions.insert(uri, version);
            return Ok(content);
        }

        tokio::fs::read_to_string(path)
            .await
            .map_err(|source| DisableError::Read {
                path: path.to_path_buf(),
                source,
            })
    }

    async fn indentation(&self, path: &Path, fallback: ServerSettings) -> ServerSettings {
        let item = ConfigurationItem {
            scope_uri: file_uri(path).ok(),
            section: Some(EDITOR_SECTION.to_string()),
        };

        match self.client.configuration(vec![item]).await {
            Ok(values) => editor_indentation(&values, fallback),
            Err(err) => {
                debug!("Editor configuration unavailable, using settings: {}", err);
                fallback
            }
        }
    }

    async fn insert(
        &self,
        path: &Path,
        position: Position,
        text: &str,
    ) -> Result<(), DisableError> {
        let uri = file_uri(path)?;
        let version = self.read_versions.get(&uri).map(|version| *version);
        let edit = insert_edit(uri, version, position, text);

        let response = self.client.apply_edit(edit).await?;
        edit_outcome(path, response)
    }

    async fn reveal(&self, path: &Path, cursor: Option<Position>) -> Result<(), DisableError> {
        let params = ShowDocumentParams {
            uri: file_uri(path)?,
            external: Some(false),
            take_focus: Some(true),
            selection: cursor.map(|position| Range::new(position, position)),
        };

        // Older clients lack window/showDocument; the edit already landed.
        match self.client.show_document(params).await {
            Ok(true) => {}
            Ok(false) => warn!("Client declined to show {}", path.display()),
            Err(err) => warn!("Could not show {}: {}", path.display(), err),
        }
        Ok(())
    }
}
