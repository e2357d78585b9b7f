//! ESLint Disable LSP - a language server that disables ESLint rules project-wide.
//!
//! For every ESLint diagnostic the server offers a "Disable `<rule>`
//! project-wide" quick fix. Accepting it appends `<rule>: off` to the
//! `.eslintrc.yaml`, `.eslintrc.yml` or `.eslintrc.json` in the first
//! workspace folder and moves the cursor to the new line.
//!
//! # Usage
//!
//! ```rust,no_run
//! use eslint_disable_lsp::config::ConfigFormat;
//! use eslint_disable_lsp::insertion::plan_insertion;
//!
//! let text = "root: true\nrules:\n  semi: error\n";
//! let insertion = plan_insertion(text, ConfigFormat::Yaml, "no-console", "  ").unwrap();
//! assert_eq!(insertion.text, "  no-console: off\n");
//! ```

pub mod backend;
pub mod capabilities;
pub mod config;
pub mod disabler;
pub mod editor;
pub mod error;
pub mod handlers;
pub mod insertion;

pub use backend::Backend;
pub use config::{ConfigFormat, ConfigLocator, FsConfigLocator, ServerSettings};
pub use disabler::{DocumentEditor, RuleDisabler};
pub use error::DisableError;
pub use handlers::CodeActionHandler;
pub use insertion::Insertion;
