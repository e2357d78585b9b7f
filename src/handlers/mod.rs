//! LSP handlers for various features.

mod code_action;

pub use code_action::{
    rule_id, CodeActionHandler, DISABLE_RULE_COMMAND, ESLINT_SOURCE, SCRIPT_EXTENSIONS,
};
