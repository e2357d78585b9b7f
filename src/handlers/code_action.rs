//! Code action provider for disabling ESLint rules.

use std::path::Path;

use serde_json::Value;
use tower_lsp::lsp_types::*;

/// Diagnostic source tag set by ESLint.
pub const ESLINT_SOURCE: &str = "eslint";

/// Command executed when a disable action is accepted.
pub const DISABLE_RULE_COMMAND: &str = "extension.disableEslintRule";

/// Extensions of documents that receive disable actions.
pub const SCRIPT_EXTENSIONS: [&str; 8] = ["ts", "tsx", "jsm", "mjs", "cjs", "jsx", "html", "vue"];

/// Handler for code action requests.
#[derive(Debug, Default)]
pub struct CodeActionHandler;

impl CodeActionHandler {
    /// Create a new code action handler.
    pub fn new() -> Self {
        Self
    }

    /// Whether disable actions are offered for the document at `uri`.
    pub fn applies_to(&self, uri: &Url) -> bool {
        Path::new(uri.path())
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| SCRIPT_EXTENSIONS.contains(&ext))
    }

    /// Provide one disable action per eligible diagnostic, in input order.
    pub fn actions(&self, uri: &Url, diagnostics: &[Diagnostic]) -> CodeActionResponse {
        if !self.applies_to(uri) {
            return Vec::new();
        }

        diagnostics
            .iter()
            .filter_map(|diagnostic| {
                let rule_id = rule_id(diagnostic)?;
                Some(disable_action(diagnostic, rule_id))
            })
            .collect()
    }
}

/// Extract the ESLint rule id from a diagnostic.
///
/// The code must be structured: a value paired with a `codeDescription`.
/// A bare `code` without a description is ignored.
pub fn rule_id(diagnostic: &Diagnostic) -> Option<String> {
    if diagnostic.source.as_deref() != Some(ESLINT_SOURCE) {
        return None;
    }
    diagnostic.code_description.as_ref()?;

    let rule_id = match diagnostic.code.as_ref()? {
        NumberOrString::String(s) => s.clone(),
        NumberOrString::Number(n) => n.to_string(),
    };

    if rule_id.is_empty() {
        None
    } else {
        Some(rule_id)
    }
}

/// Build the "Disable <rule> project-wide" quick fix.
fn disable_action(diagnostic: &Diagnostic, rule_id: String) -> CodeActionOrCommand {
    let title = format!("Disable {} project-wide", rule_id);

    CodeActionOrCommand::CodeAction(CodeAction {
        title: title.clone(),
        kind: Some(CodeActionKind::QUICKFIX),
        diagnostics: Some(vec![diagnostic.clone()]),
        command: Some(Command {
            title,
            command: DISABLE_RULE_COMMAND.to_string(),
            arguments: Some(vec![Value::String(rule_id)]),
        }),
        is_preferred: Some(false),
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri() -> Url {
        Url::parse("file:///work/src/app.tsx").unwrap()
    }

    fn eslint_diagnostic(rule: &str) -> Diagnostic {
        Diagnostic {
            range: Range::new(Position::new(3, 4), Position::new(3, 9)),
            severity: Some(DiagnosticSeverity::WARNING),
            code: Some(NumberOrString::String(rule.to_string())),
            code_description: Some(CodeDescription {
                href: Url::parse(&format!("https://eslint.org/docs/rules/{}", rule)).unwrap(),
            }),
            source: Some(ESLINT_SOURCE.to_string()),
            message: format!("violates {}", rule),
            ..Default::default()
        }
    }

    fn unwrap_action(action: &CodeActionOrCommand) -> &CodeAction {
        match action {
            CodeActionOrCommand::CodeAction(action) => action,
            CodeActionOrCommand::Command(_) => panic!("expected a code action"),
        }
    }

    #[test]
    fn test_eligible_diagnostic_produces_disable_action() {
        let handler = CodeActionHandler::new();
        let diagnostic = eslint_diagnostic("no-console");
        let actions = handler.actions(&uri(), std::slice::from_ref(&diagnostic));

        assert_eq!(actions.len(), 1);
        let action = unwrap_action(&actions[0]);
        assert_eq!(action.title, "Disable no-console project-wide");
        assert_eq!(action.kind, Some(CodeActionKind::QUICKFIX));
        assert_eq!(action.is_preferred, Some(false));
        assert_eq!(action.diagnostics, Some(vec![diagnostic]));
        assert!(action.edit.is_none());

        let command = action.command.as_ref().unwrap();
        assert_eq!(command.command, DISABLE_RULE_COMMAND);
        assert_eq!(
            command.arguments,
            Some(vec![Value::String("no-console".to_string())])
        );
    }

    #[test]
    fn test_other_sources_are_skipped() {
        let handler = CodeActionHandler::new();
        let mut tsc = eslint_diagnostic("2322");
        tsc.source = Some("ts".to_string());
        let mut unsourced = eslint_diagnostic("semi");
        unsourced.source = None;

        assert!(handler.actions(&uri(), &[tsc, unsourced]).is_empty());
    }

    #[test]
    fn test_bare_codes_are_skipped() {
        let handler = CodeActionHandler::new();
        let mut bare = eslint_diagnostic("semi");
        bare.code_description = None;
        let mut missing = eslint_diagnostic("semi");
        missing.code = None;

        assert!(handler.actions(&uri(), &[bare, missing]).is_empty());
    }

    #[test]
    fn test_numeric_structured_code_is_stringified() {
        let mut diagnostic = eslint_diagnostic("x");
        diagnostic.code = Some(NumberOrString::Number(42));
        assert_eq!(rule_id(&diagnostic), Some("42".to_string()));
    }

    #[test]
    fn test_empty_rule_id_is_skipped() {
        let mut diagnostic = eslint_diagnostic("x");
        diagnostic.code = Some(NumberOrString::String(String::new()));
        assert_eq!(rule_id(&diagnostic), None);
    }

    #[test]
    fn test_order_preserved_without_dedup() {
        let handler = CodeActionHandler::new();
        let mut foreign = eslint_diagnostic("x");
        foreign.source = Some("stylelint".to_string());
        let diagnostics = vec![
            eslint_diagnostic("react/jsx-key"),
            foreign,
            eslint_diagnostic("semi"),
            eslint_diagnostic("react/jsx-key"),
        ];

        let titles: Vec<_> = handler
            .actions(&uri(), &diagnostics)
            .iter()
            .map(|a| unwrap_action(a).title.clone())
            .collect();

        assert_eq!(
            titles,
            vec![
                "Disable react/jsx-key project-wide",
                "Disable semi project-wide",
                "Disable react/jsx-key project-wide",
            ]
        );
    }

    #[test]
    fn test_only_script_and_markup_documents() {
        let handler = CodeActionHandler::new();
        for path in ["a.ts", "a.mjs", "a.cjs", "a.vue", "a.html", "dir.v1/a.jsx"] {
            let uri = Url::parse(&format!("file:///work/{}", path)).unwrap();
            assert!(handler.applies_to(&uri), "{} should apply", path);
        }
        for path in ["a.rs", "a.json", "Makefile", "a.ts.bak"] {
            let uri = Url::parse(&format!("file:///work/{}", path)).unwrap();
            assert!(!handler.applies_to(&uri), "{} should not apply", path);
            assert!(handler
                .actions(&uri, &[eslint_diagnostic("semi")])
                .is_empty());
        }
    }
}
