//! LSP Server capabilities configuration.

use tower_lsp::lsp_types::*;

use crate::handlers::DISABLE_RULE_COMMAND;

/// Returns the server capabilities.
pub fn server_capabilities() -> ServerCapabilities {
    ServerCapabilities {
        // Full text sync so open configuration buffers can be read
        text_document_sync: Some(TextDocumentSyncCapability::Options(
            TextDocumentSyncOptions {
                open_close: Some(true),
                change: Some(TextDocumentSyncKind::FULL),
                will_save: Some(false),
                will_save_wait_until: Some(false),
                save: None,
            },
        )),

        // Quick fixes only; the edit itself happens in executeCommand
        code_action_provider: Some(CodeActionProviderCapability::Options(CodeActionOptions {
            code_action_kinds: Some(vec![CodeActionKind::QUICKFIX]),
            work_done_progress_options: WorkDoneProgressOptions::default(),
            resolve_provider: Some(false),
        })),

        execute_command_provider: Some(ExecuteCommandOptions {
            commands: vec![DISABLE_RULE_COMMAND.to_string()],
            work_done_progress_options: WorkDoneProgressOptions::default(),
        }),

        workspace: Some(WorkspaceServerCapabilities {
            workspace_folders: Some(WorkspaceFoldersServerCapabilities {
                supported: Some(true),
                change_notifications: Some(OneOf::Left(true)),
            }),
            file_operations: None,
        }),

        ..Default::default()
    }
}
