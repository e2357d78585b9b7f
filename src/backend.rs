//! LSP Backend implementation for the ESLint rule-disabling server.

use std::path::PathBuf;

use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::RwLock;
use tower_lsp::jsonrpc::{Error, Result};
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};
use tracing::{debug, info, warn};

use crate::capabilities::server_capabilities;
use crate::config::{FsConfigLocator, ServerSettings};
use crate::disabler::RuleDisabler;
use crate::editor::{DocumentState, LspEditor};
use crate::handlers::{CodeActionHandler, DISABLE_RULE_COMMAND};

/// The main LSP backend.
pub struct Backend {
    /// LSP client for sending notifications/requests back to the editor.
    client: Client,

    /// Open documents tracked by the server.
    documents: DashMap<Url, DocumentState>,

    /// Workspace folder paths; the first one holds the ESLint config.
    workspace_folders: RwLock<Vec<PathBuf>>,

    /// Fallback indentation when the editor does not report its own.
    settings: RwLock<ServerSettings>,

    /// Code action handler.
    code_action_handler: CodeActionHandler,

    locator: FsConfigLocator,
}

impl Backend {
    /// Create a new backend.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            documents: DashMap::new(),
            workspace_folders: RwLock::new(Vec::new()),
            settings: RwLock::new(ServerSettings::default()),
            code_action_handler: CodeActionHandler::new(),
            locator: FsConfigLocator,
        }
    }

    /// Overlay indentation keys from a client JSON value.
    ///
    /// Payloads without those keys (including `null`, which pull-model
    /// clients send on every change) leave the current settings untouched.
    async fn update_settings(&self, value: &Value) {
        let mut settings = self.settings.write().await;
        match settings.overlay(value) {
            Ok(Some(updated)) => {
                debug!("Settings updated: {:?}", updated);
                *settings = updated;
            }
            Ok(None) => debug!("No indentation settings in configuration payload"),
            Err(err) => warn!("Ignoring invalid settings: {:#}", err),
        }
    }

    /// Run the disable command for `rule_id` against the first workspace folder.
    async fn disable_rule(&self, rule_id: &str) {
        let Some(root) = self.workspace_folders.read().await.first().cloned() else {
            warn!("No workspace folder open; cannot disable {}", rule_id);
            return;
        };
        let settings = *self.settings.read().await;

        let editor = LspEditor::new(&self.client, &self.documents);
        let disabler = RuleDisabler::new(&self.locator, &editor, settings);

        if let Err(err) = disabler.disable(&root, rule_id).await {
            warn!("Disabling {} failed: {}", rule_id, err);
            self.client.show_message(MessageType::ERROR, err).await;
        }
    }
}

/// Paths of the workspace folders announced at initialization.
fn initial_folders(params: &InitializeParams) -> Vec<PathBuf> {
    if let Some(folders) = &params.workspace_folders {
        return folders
            .iter()
            .filter_map(|folder| folder.uri.to_file_path().ok())
            .collect();
    }

    #[allow(deprecated)]
    let root = params.root_uri.as_ref();
    root.and_then(|uri| uri.to_file_path().ok())
        .into_iter()
        .collect()
}

/// The rule id argument of a disable command.
fn rule_argument(arguments: &[Value]) -> Result<&str> {
    arguments
        .first()
        .and_then(Value::as_str)
        .ok_or_else(|| Error::invalid_params("expected a rule id string as the first argument"))
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        info!("ESLint disable server initializing");

        *self.workspace_folders.write().await = initial_folders(&params);
        if let Some(options) = &params.initialization_options {
            self.update_settings(options).await;
        }

        Ok(InitializeResult {
            capabilities: server_capabilities(),
            server_info: Some(ServerInfo {
                name: "eslint-disable-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _params: InitializedParams) {
        info!("ESLint disable server initialized");

        self.client
            .log_message(MessageType::INFO, "ESLint disable server ready")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        info!("ESLint disable server shutting down");
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        debug!("Document opened: {}", params.text_document.uri);

        self.documents.insert(
            params.text_document.uri,
            DocumentState {
                content: params.text_document.text,
                version: params.text_document.version,
            },
        );
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        debug!("Document changed: {}", params.text_document.uri);

        if let Some(mut doc) = self.documents.get_mut(&params.text_document.uri) {
            // Apply changes (we use full sync, so take the last change)
            if let Some(change) = params.content_changes.into_iter().last() {
                doc.content = change.text;
                doc.version = params.text_document.version;
            }
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        debug!("Document closed: {}", params.text_document.uri);

        self.documents.remove(&params.text_document.uri);
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        self.update_settings(&params.settings).await;
    }

    async fn did_change_workspace_folders(&self, params: DidChangeWorkspaceFoldersParams) {
        let to_paths = |folders: Vec<WorkspaceFolder>| -> Vec<PathBuf> {
            folders
                .into_iter()
                .filter_map(|folder| folder.uri.to_file_path().ok())
                .collect()
        };
        let removed = to_paths(params.event.removed);
        let added = to_paths(params.event.added);

        let mut folders = self.workspace_folders.write().await;
        folders.retain(|path| !removed.contains(path));
        folders.extend(added);
        debug!("Workspace folders: {:?}", *folders);
    }

    async fn code_action(&self, params: CodeActionParams) -> Result<Option<CodeActionResponse>> {
        let actions = self
            .code_action_handler
            .actions(&params.text_document.uri, &params.context.diagnostics);

        if actions.is_empty() {
            Ok(None)
        } else {
            Ok(Some(actions))
        }
    }

    async fn execute_command(&self, params: ExecuteCommandParams) -> Result<Option<Value>> {
        if params.command != DISABLE_RULE_COMMAND {
            warn!("Unknown command: {}", params.command);
            return Err(Error::method_not_found());
        }

        let rule_id = rule_argument(&params.arguments)?;
        self.disable_rule(rule_id).await;
        Ok(None)
    }
}
