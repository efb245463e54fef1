//! Token namespace imports for rewritten files
//!
//! Fixes that introduce `Space.*` / `Size.*` references must leave the file
//! compiling, so the runner asks here for edits that bring those namespaces
//! into scope. An existing declaration for the token module is extended in
//! place; otherwise a new declaration lands after the last import.

use std::collections::BTreeSet;
use std::path::Path;

use regex::Regex;

use crate::ast::Span;
use crate::tree::{SourceUnit, TextEdit};

/// Module specifier fragment that identifies the design-token module.
pub const TOKEN_MODULE_MARKER: &str = "token.const.1tier";

pub struct ImportManager {
    named_import: Regex,
    import_line: Regex,
}

impl ImportManager {
    pub fn new() -> Self {
        Self {
            named_import: Regex::new(
                r#"import\s+(?:type\s+)?\{([^}]*)\}\s*from\s*["']([^"']+)["']"#,
            )
            .unwrap(),
            import_line: Regex::new(r"(?m)^[ \t]*import\b[^\n]*").unwrap(),
        }
    }

    /// Edits that guarantee `required` namespaces are imported from the token
    /// module. Empty when everything is already in scope.
    pub fn ensure_tokens(&self, unit: &SourceUnit, required: &BTreeSet<String>) -> Vec<TextEdit> {
        if required.is_empty() {
            return Vec::new();
        }
        let text = unit.text();

        for caps in self.named_import.captures_iter(&text) {
            let specifier = caps.get(2).map(|m| m.as_str()).unwrap_or("");
            if !specifier.contains(TOKEN_MODULE_MARKER) {
                continue;
            }
            let inside = caps.get(1).unwrap();
            let existing = parse_named_list(inside.as_str());
            let missing: Vec<&str> = required
                .iter()
                .map(String::as_str)
                .filter(|t| !existing.contains(t))
                .collect();
            if missing.is_empty() {
                return Vec::new();
            }
            let joined = missing.join(", ");
            let trimmed = inside.as_str().trim_end();
            if trimmed.is_empty() {
                let span = Span::new(
                    char_at(&text, inside.start()),
                    char_at(&text, inside.end()),
                );
                return vec![TextEdit::replace(span, format!(" {} ", joined))];
            }
            let anchor = char_at(&text, inside.start() + trimmed.len());
            let lead = if trimmed.ends_with(',') { " " } else { ", " };
            return vec![TextEdit::insert(anchor, format!("{}{}", lead, joined))];
        }

        let joined = required
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        let declaration = format!(
            "import {{ {} }} from \"{}\";\n",
            joined,
            token_module_path(unit.path())
        );
        vec![TextEdit::insert(self.insertion_point(&text), declaration)]
    }

    /// Char index of the line following the last import, or the top of the
    /// file when there are none.
    fn insertion_point(&self, text: &str) -> usize {
        let line_end = self.import_line.find_iter(text).map(|m| m.end()).max();
        let named_end = self.named_import.find_iter(text).map(|m| m.end()).max();
        let end = match (line_end, named_end) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        match end {
            Some(end) => {
                let next = text[end..]
                    .find('\n')
                    .map(|i| end + i + 1)
                    .unwrap_or(text.len());
                char_at(text, next)
            }
            None => 0,
        }
    }
}

impl Default for ImportManager {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_named_list(inside: &str) -> BTreeSet<&str> {
    inside
        .split(',')
        .filter_map(|piece| {
            let piece = piece.trim();
            let piece = piece.strip_prefix("type ").map(str::trim).unwrap_or(piece);
            piece.split_whitespace().next()
        })
        .collect()
}

/// Relative specifier for the token module, mirroring how deep the file sits
/// under its `src/` root.
fn token_module_path(path: &Path) -> String {
    let text = path.to_string_lossy().replace('\\', "/");
    let depth = text
        .split("/src/")
        .nth(1)
        .map(|rest| rest.matches('/').count())
        .unwrap_or(0);
    format!(
        "{}design-system/token/token.const.1tier",
        "../".repeat(depth)
    )
}

fn char_at(text: &str, byte: usize) -> usize {
    text[..byte].chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags() -> Vec<String> {
        vec!["Frame".to_string()]
    }

    fn required(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn apply(source: &str, path: &str, names: &[&str]) -> String {
        let mut unit = SourceUnit::parse(source, path, &tags()).unwrap();
        let manager = ImportManager::new();
        let edits = manager.ensure_tokens(&unit, &required(names));
        unit.queue_edits(edits);
        unit.commit_edits().unwrap();
        unit.text()
    }

    #[test]
    fn extends_the_existing_token_import() {
        let out = apply(
            "import { Space } from \"../token/token.const.1tier\";\n\nconst v = <Frame p={Space.n16} />;\n",
            "app/src/View.tsx",
            &["Size", "Space"],
        );
        assert!(out.starts_with("import { Space, Size } from \"../token/token.const.1tier\";"));
    }

    #[test]
    fn present_names_produce_no_edits() {
        let unit = SourceUnit::parse(
            "import { Size, Space } from \"@ds/token.const.1tier\";\nconst v = <Frame />;\n",
            "app/src/View.tsx",
            &tags(),
        )
        .unwrap();
        let manager = ImportManager::new();
        assert!(manager.ensure_tokens(&unit, &required(&["Space"])).is_empty());
    }

    #[test]
    fn new_declaration_lands_after_the_last_import() {
        let out = apply(
            "import React from \"react\";\nimport { Frame } from \"@ds/Frame\";\n\nconst v = <Frame />;\n",
            "app/src/panels/View.tsx",
            &["Space"],
        );
        assert!(out.contains(
            "import { Frame } from \"@ds/Frame\";\nimport { Space } from \"../design-system/token/token.const.1tier\";\n"
        ));
    }

    #[test]
    fn files_without_imports_get_one_at_the_top() {
        let out = apply("const v = <Frame />;\n", "app/src/View.tsx", &["Space"]);
        assert!(out.starts_with(
            "import { Space } from \"design-system/token/token.const.1tier\";\nconst v ="
        ));
    }

    #[test]
    fn multiline_named_lists_extend_in_place() {
        let out = apply(
            "import {\n  Space,\n} from \"~/token/token.const.1tier\";\nconst v = <Frame />;\n",
            "app/src/View.tsx",
            &["Size"],
        );
        assert!(out.contains("import {\n  Space, Size\n} from \"~/token/token.const.1tier\";"));
    }

    #[test]
    fn aliased_names_still_count_as_imported() {
        let unit = SourceUnit::parse(
            "import { Space as Sp } from \"x/token.const.1tier\";\nconst v = <Frame />;\n",
            "app/src/View.tsx",
            &tags(),
        )
        .unwrap();
        let manager = ImportManager::new();
        assert!(manager.ensure_tokens(&unit, &required(&["Space"])).is_empty());
    }

    #[test]
    fn empty_named_lists_are_filled() {
        let out = apply(
            "import {} from \"x/token.const.1tier\";\nconst v = <Frame />;\n",
            "app/src/View.tsx",
            &["Size", "Space"],
        );
        assert!(out.starts_with("import { Size, Space } from \"x/token.const.1tier\";"));
    }
}
