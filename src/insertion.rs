//! Insertion-point search for ESLint configuration files.
//!
//! This is a line-oriented heuristic, not a YAML or JSON parser. The rules
//! header is found with a regex and new entries are spliced in as whole lines.
//! In YAML files a namespaced rule (`react/jsx-key`) is placed after the last
//! existing line that mentions the same namespace so plugin rules stay grouped.
//!
//! JSON insertions never repair trailing commas: the new entry always ends in
//! `,` and relies on another entry following it.

use std::sync::OnceLock;

use regex::Regex;
use tower_lsp::lsp_types::Position;

use crate::config::ConfigFormat;

/// Matches a YAML `rules:` key at line start or a JSON `"rules": {` header.
const RULES_HEADER: &str = r#"^rules:\s*|\s*"rules":\s*\{\s*"#;

fn rules_header() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(RULES_HEADER).expect("rules header pattern is valid"))
}

/// A single text insertion into a configuration document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
    /// Where `text` is inserted, in the document before the edit.
    pub position: Position,

    /// The inserted text, including line endings.
    pub text: String,

    /// Start of the new rule's line in the document after the edit.
    pub cursor: Position,
}

/// Namespace of a rule id: everything before the first `/`.
pub fn rule_namespace(rule_id: &str) -> Option<&str> {
    rule_id.split_once('/').map(|(namespace, _)| namespace)
}

/// Index of the first line that looks like a rules section header.
pub fn find_rules_section(lines: &[&str]) -> Option<usize> {
    lines.iter().position(|line| rules_header().is_match(line))
}

/// Line after which a rule should be inserted in a YAML document.
///
/// Without a namespace, or when no line from `header` onwards mentions
/// `<namespace>/`, this is the header itself.
fn yaml_anchor(lines: &[&str], header: usize, rule_id: &str) -> usize {
    let Some(namespace) = rule_namespace(rule_id) else {
        return header;
    };

    let needle = format!("{}/", namespace);
    lines
        .iter()
        .enumerate()
        .skip(header)
        .filter(|(_, line)| line.contains(&needle))
        .map(|(idx, _)| idx)
        .last()
        .unwrap_or(header)
}

/// `\r\n` for documents that already use CRLF, `\n` otherwise.
fn line_ending(text: &str) -> &'static str {
    if text.contains("\r\n") {
        "\r\n"
    } else {
        "\n"
    }
}

/// Position just past the last character of the document.
fn end_of_document(lines: &[&str]) -> Position {
    let last = lines.len().saturating_sub(1);
    let width = lines.last().map_or(0, |line| line.encode_utf16().count());
    Position::new(last as u32, width as u32)
}

/// Insert `line` (already terminated) at the start of line `after + 1`.
///
/// When that line does not exist the document's final line has no
/// terminator, so the entry is appended behind a fresh line break instead.
fn insert_line_after(lines: &[&str], after: usize, line: String, newline: &str) -> Insertion {
    let target = Position::new((after + 1) as u32, 0);

    if after + 1 < lines.len() {
        Insertion {
            position: target,
            text: line,
            cursor: target,
        }
    } else {
        Insertion {
            position: end_of_document(lines),
            text: format!("{}{}", newline, line),
            cursor: target,
        }
    }
}

/// Compute the insertion that disables `rule_id` in `text`.
///
/// Returns `None` only for a JSON document without a rules header; creating
/// the section is supported for YAML alone.
pub fn plan_insertion(
    text: &str,
    format: ConfigFormat,
    rule_id: &str,
    indent: &str,
) -> Option<Insertion> {
    let lines: Vec<&str> = text.split('\n').collect();
    let newline = line_ending(text);
    let header = find_rules_section(&lines);

    match format {
        ConfigFormat::Json => {
            let header = header?;
            let entry = format!("{indent}{indent}\"{rule_id}\": \"off\",{newline}");
            Some(insert_line_after(&lines, header, entry, newline))
        }
        ConfigFormat::Yaml => match header {
            Some(header) => {
                let anchor = yaml_anchor(&lines, header, rule_id);
                let entry = format!("{indent}{rule_id}: off{newline}");
                Some(insert_line_after(&lines, anchor, entry, newline))
            }
            None => Some(Insertion {
                position: end_of_document(&lines),
                text: format!("{newline}rules:{newline}{indent}{rule_id}: off{newline}"),
                cursor: Position::new(lines.len() as u32, 0),
            }),
        },
    }
}
