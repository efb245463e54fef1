//! Patch planning for fixable findings
//!
//! Each plan is a set of span edits against the current parse; nothing is
//! mutated here. A finding whose fix cannot be planned safely (an `override`
//! holding something other than an object literal) yields an error, and the
//! runner reports it as detected-but-unfixed rather than risking a corrupt
//! attribute.

use std::collections::BTreeSet;

use crate::ast::{AttrInit, Attribute, ElementInvocation, Span};
use crate::error::{LintError, Result};
use crate::extractor;
use crate::rules::{canonical_border_entry, redundant_override_keys};
use crate::tokens::{token_namespace, SIZE_CONSTRAINT_PROPS};
use crate::tree::{SourceUnit, TextEdit};
use crate::types::{Finding, RuleId};

/// Planned edits for one finding, plus the token namespaces the inserted
/// text references so the import manager can bring them into scope.
#[derive(Debug)]
pub struct Patch {
    pub edits: Vec<TextEdit>,
    pub required_imports: Vec<String>,
}

pub fn plan(finding: &Finding, unit: &SourceUnit) -> Result<Patch> {
    let file = unit.path().display().to_string();
    let index = finding
        .element
        .ok_or_else(|| LintError::patch(&file, finding.line, "file-level findings have no fix"))?;
    let element = unit
        .element(index)
        .ok_or_else(|| LintError::patch(&file, finding.line, "element is gone from the tree"))?;

    match finding.rule {
        RuleId::TokenizableStyle => plan_tokenizable(finding, unit, element, &file),
        RuleId::BorderShorthand => plan_border(unit, element, &file, finding.line),
        RuleId::SizeConstraints => plan_size(unit, element, &file, finding.line),
        RuleId::RedundantOverride => plan_redundant(unit, element, &file, finding.line),
        _ => Err(LintError::patch(&file, finding.line, "rule has no mechanical fix")),
    }
}

fn plan_tokenizable(
    finding: &Finding,
    unit: &SourceUnit,
    element: &ElementInvocation,
    file: &str,
) -> Result<Patch> {
    let style_attr = element
        .attr("style")
        .ok_or_else(|| LintError::patch(file, finding.line, "style attribute is gone"))?;
    let style_obj = style_attr.init.object().ok_or_else(|| {
        LintError::patch(file, finding.line, "style initializer is not an object literal")
    })?;

    let converted: BTreeSet<&str> = finding.conversions.iter().map(|c| c.css_prop.as_str()).collect();
    let converted_indices: Vec<usize> = style_obj
        .entries
        .iter()
        .enumerate()
        .filter(|(_, e)| !e.spread && converted.contains(e.name.as_str()))
        .map(|(i, _)| i)
        .collect();
    if converted_indices.is_empty() {
        return Err(LintError::patch(file, finding.line, "no convertible style entries remain"));
    }

    let mut edits = Vec::new();
    if converted_indices.len() == style_obj.entries.len() {
        edits.push(unit.remove_attribute_edit(style_attr));
    } else {
        edits.extend(unit.remove_object_entries_edit(style_obj, &converted_indices));
    }

    let entries_text = finding
        .conversions
        .iter()
        .map(|c| format!("{}: {}", c.override_prop, c.token_value))
        .collect::<Vec<_>>()
        .join(", ");
    edits.push(override_edit(unit, element, &entries_text, file, finding.line)?);

    let required_imports = finding
        .conversions
        .iter()
        .filter_map(|c| token_namespace(&c.token_value))
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    Ok(Patch { edits, required_imports })
}

fn plan_border(
    unit: &SourceUnit,
    element: &ElementInvocation,
    file: &str,
    line: usize,
) -> Result<Patch> {
    let style_attr = element
        .attr("style")
        .ok_or_else(|| LintError::patch(file, line, "style attribute is gone"))?;
    let style_obj = style_attr
        .init
        .object()
        .ok_or_else(|| LintError::patch(file, line, "style initializer is not an object literal"))?;
    let (entry_index, key) = canonical_border_entry(style_obj)
        .ok_or_else(|| LintError::patch(file, line, "canonical border entry is gone"))?;

    let mut edits = Vec::new();
    if style_obj.entries.len() == 1 {
        edits.push(unit.remove_attribute_edit(style_attr));
    } else {
        edits.push(unit.remove_object_entry_edit(style_obj, entry_index));
    }

    let attr_text = if key == "border" {
        "border".to_string()
    } else {
        format!("border=\"{}\"", key.trim_start_matches("border").to_lowercase())
    };
    edits.push(unit.insert_attribute_edit(element, &attr_text));

    Ok(Patch { edits, required_imports: Vec::new() })
}

fn plan_size(
    unit: &SourceUnit,
    element: &ElementInvocation,
    file: &str,
    line: usize,
) -> Result<Patch> {
    let size_attrs: Vec<&Attribute> = element
        .attrs
        .iter()
        .filter(|a| SIZE_CONSTRAINT_PROPS.contains(&a.name.as_str()))
        .collect();
    if size_attrs.is_empty() {
        return Err(LintError::patch(file, line, "no size-constraint attributes remain"));
    }

    let entries_text = size_attrs
        .iter()
        .map(|a| format!("{}: {}", a.name, initializer_text(unit, a)))
        .collect::<Vec<_>>()
        .join(", ");

    let mut edits = vec![override_edit(unit, element, &entries_text, file, line)?];
    for attr in size_attrs {
        edits.push(unit.remove_attribute_edit(attr));
    }

    Ok(Patch { edits, required_imports: Vec::new() })
}

fn plan_redundant(
    unit: &SourceUnit,
    element: &ElementInvocation,
    file: &str,
    line: usize,
) -> Result<Patch> {
    let props = extractor::extract(element);
    let keys = redundant_override_keys(&props);
    if keys.is_empty() {
        return Err(LintError::patch(file, line, "no redundant override entries remain"));
    }

    let attr = element
        .attr("override")
        .ok_or_else(|| LintError::patch(file, line, "override attribute is gone"))?;
    let obj = attr
        .init
        .object()
        .ok_or_else(|| LintError::patch(file, line, "override initializer is not an object literal"))?;

    let indices: Vec<usize> = obj
        .entries
        .iter()
        .enumerate()
        .filter(|(_, e)| !e.spread && keys.contains(&e.name))
        .map(|(i, _)| i)
        .collect();

    let mut edits = Vec::new();
    if indices.len() == obj.entries.len() {
        edits.push(unit.remove_attribute_edit(attr));
    } else {
        edits.extend(unit.remove_object_entries_edit(obj, &indices));
    }

    Ok(Patch { edits, required_imports: Vec::new() })
}

/// Appends entries to the element's override object, or synthesizes the
/// attribute when it does not exist. Refuses non-object initializers.
fn override_edit(
    unit: &SourceUnit,
    element: &ElementInvocation,
    entries_text: &str,
    file: &str,
    line: usize,
) -> Result<TextEdit> {
    match element.attr("override") {
        None => Ok(unit.insert_attribute_edit(
            element,
            &format!("override={{{{ {} }}}}", entries_text),
        )),
        Some(attr) => match attr.init.object() {
            Some(obj) => Ok(unit.append_object_entries_edit(obj, entries_text)),
            None => Err(LintError::patch(
                file,
                line,
                "override initializer is not an object literal",
            )),
        },
    }
}

/// Raw initializer text: string literals keep their quotes, expressions
/// lose only the outer braces.
fn initializer_text(unit: &SourceUnit, attr: &Attribute) -> String {
    match &attr.init {
        AttrInit::None => "true".to_string(),
        AttrInit::Str { span, .. } => unit.text_of(*span),
        AttrInit::Expr { span, .. } => {
            let inner = Span::new(span.start + 1, span.end.saturating_sub(1));
            unit.text_of(inner).trim().to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::FrameStyleResolver;
    use crate::rules::RuleEngine;
    use crate::simulator;
    use crate::tokens::TokenTables;
    use crate::types::RuleId;

    fn tags() -> Vec<String> {
        vec!["Frame".to_string(), "Section".to_string()]
    }

    fn analyze(unit: &SourceUnit) -> Vec<Finding> {
        let tables = TokenTables::new();
        let engine = RuleEngine::new(&tables);
        let resolver = FrameStyleResolver::new();
        let mut findings = Vec::new();
        for (index, element) in unit.elements().iter().enumerate() {
            let props = extractor::extract(element);
            let snapshot = simulator::simulate(&props, &resolver);
            findings.extend(engine.check(index, element, &props, &snapshot));
        }
        findings
    }

    fn fix_source(source: &str) -> String {
        let mut unit = SourceUnit::parse(source, "test.tsx", &tags()).unwrap();
        let mut edits = Vec::new();
        for finding in analyze(&unit) {
            if finding.fixable {
                let patch = plan(&finding, &unit).unwrap();
                edits.extend(patch.edits);
            }
        }
        unit.queue_edits(edits);
        unit.commit_edits().unwrap();
        unit.text()
    }

    #[test]
    fn tokenizable_fix_creates_override() {
        let fixed = fix_source(r#"<Frame style={{ padding: "16px" }} />"#);
        assert_eq!(fixed, r#"<Frame override={{ p: Space.n16 }} />"#);
    }

    #[test]
    fn rerunning_after_fix_reports_nothing() {
        let fixed = fix_source(r#"<Frame style={{ padding: "16px", gap: "8px" }} />"#);
        let unit = SourceUnit::parse(&fixed, "test.tsx", &tags()).unwrap();
        let findings = analyze(&unit);
        assert!(findings
            .iter()
            .all(|f| f.rule != RuleId::TokenizableStyle && f.rule != RuleId::StyleUsage));
    }

    #[test]
    fn merges_into_existing_override() {
        let fixed = fix_source(r#"<Frame override={{ a: 1 }} style={{ padding: "16px" }} />"#);
        assert_eq!(fixed, r#"<Frame override={{ a: 1, p: Space.n16 }} />"#);
    }

    #[test]
    fn unrelated_attributes_survive_byte_for_byte() {
        let fixed =
            fix_source(r#"<Frame a={fn(1)} b="x" style={{ padding: "16px" }} />"#);
        assert_eq!(fixed, r#"<Frame a={fn(1)} b="x" override={{ p: Space.n16 }} />"#);
    }

    #[test]
    fn partial_conversion_keeps_unconvertible_entries() {
        let fixed = fix_source(r#"<Frame style={{ padding: "16px", color: "red" }} />"#);
        assert_eq!(
            fixed,
            r#"<Frame style={{ color: "red" }} override={{ p: Space.n16 }} />"#
        );
    }

    #[test]
    fn trailing_entry_runs_are_removed_in_one_edit() {
        let fixed =
            fix_source(r#"<Frame style={{ color: "red", padding: "16px", gap: "8px" }} />"#);
        assert_eq!(
            fixed,
            r#"<Frame style={{ color: "red" }} override={{ p: Space.n16, gap: Space.n8 }} />"#
        );
    }

    #[test]
    fn border_fix_is_a_bare_prop() {
        let fixed = fix_source(r#"<Frame style={{ border: "1px solid var(--border-color)" }} />"#);
        assert_eq!(fixed, r#"<Frame border />"#);
    }

    #[test]
    fn directional_border_keeps_other_entries() {
        let fixed = fix_source(
            r#"<Frame style={{ borderTop: "1px solid var(--border-color)", color: "red" }} />"#,
        );
        assert_eq!(fixed, r#"<Frame style={{ color: "red" }} border="top" />"#);
    }

    #[test]
    fn size_constraints_move_into_new_override() {
        let fixed = fix_source(r#"<Frame minWidth={100} maxWidth={200} />"#);
        assert_eq!(fixed, r#"<Frame override={{ minWidth: 100, maxWidth: 200 }} />"#);
    }

    #[test]
    fn size_constraints_merge_and_keep_value_text() {
        let fixed = fix_source(r#"<Frame maxWidth="100%" override={{ p: Space.n16 }} />"#);
        assert_eq!(fixed, r#"<Frame override={{ p: Space.n16, maxWidth: "100%" }} />"#);
    }

    #[test]
    fn expression_values_lose_only_outer_braces() {
        let fixed = fix_source(r#"<Section minHeight={rows * 32} />"#);
        assert_eq!(fixed, r#"<Section override={{ minHeight: rows * 32 }} />"#);
    }

    #[test]
    fn opaque_override_refuses_the_merge() {
        let unit =
            SourceUnit::parse(r#"<Frame minWidth={100} override={overrides} />"#, "test.tsx", &tags())
                .unwrap();
        let findings = analyze(&unit);
        let finding = findings
            .iter()
            .find(|f| f.rule == RuleId::SizeConstraints)
            .unwrap();
        assert!(plan(finding, &unit).is_err());
    }

    #[test]
    fn redundant_override_entries_are_removed() {
        let fixed = fix_source(
            r#"<Frame layout={Layout.Stack.Content.Default} override={{ gap: 12, p: 40 }} />"#,
        );
        assert_eq!(
            fixed,
            r#"<Frame layout={Layout.Stack.Content.Default} override={{ p: 40 }} />"#
        );
    }

    #[test]
    fn emptied_override_is_dropped_entirely() {
        let fixed = fix_source(
            r#"<Frame layout={Layout.Stack.Content.Default} override={{ gap: 12 }} />"#,
        );
        assert_eq!(fixed, r#"<Frame layout={Layout.Stack.Content.Default} />"#);
    }

    #[test]
    fn tokenizable_patch_names_required_imports() {
        let unit = SourceUnit::parse(
            r#"<Frame style={{ padding: "16px", width: "240px" }} />"#,
            "test.tsx",
            &tags(),
        )
        .unwrap();
        let findings = analyze(&unit);
        let finding = findings
            .iter()
            .find(|f| f.rule == RuleId::TokenizableStyle)
            .unwrap();
        let patch = plan(finding, &unit).unwrap();
        assert_eq!(patch.required_imports, vec!["Size", "Space"]);
    }
}
