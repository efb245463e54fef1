//! Rule engine: pure detectors over prop bags and style snapshots
//!
//! Every rule is side-effect free; fixes are planned elsewhere from the
//! findings. At most one mechanical-fix finding is produced per element per
//! pass (tokenizable beats border beats size beats redundant-override), so
//! a fix never stacks two rewrites on the same element in one run. A later
//! run picks up whatever the winning rule masked.

use crate::ast::{ElementInvocation, ObjectLiteral};
use crate::extractor;
use crate::presets;
use crate::tokens::{override_mapping, TokenTables, SIZE_CONSTRAINT_PROPS};
use crate::types::{ComputedStyleSnapshot, Conversion, Finding, PropBag, PropValue, RuleId};

/// The only border literal the shorthand rule recognizes. Everything else is
/// left for a human to judge.
pub(crate) const CANONICAL_BORDER: &str = "1px solid var(--border-color)";

const BORDER_KEYS: &[&str] = &["border", "borderTop", "borderBottom", "borderLeft", "borderRight"];

pub struct RuleEngine<'a> {
    tables: &'a TokenTables,
}

impl<'a> RuleEngine<'a> {
    pub fn new(tables: &'a TokenTables) -> Self {
        Self { tables }
    }

    /// Runs the full rule set against one element.
    pub fn check(
        &self,
        index: usize,
        element: &ElementInvocation,
        props: &PropBag,
        snapshot: &ComputedStyleSnapshot,
    ) -> Vec<Finding> {
        let mut findings = Vec::new();
        let mut claimed = false;

        if element.tag == "Frame" {
            if let Some(style) = extractor::inline_style(element) {
                let entries = extractor::style_entries(style);

                let conversions = self.tokenizable_conversions(&entries);
                if !conversions.is_empty() {
                    findings.push(tokenizable_finding(index, element, conversions));
                    claimed = true;
                } else if let Some((_, key)) = canonical_border_entry(style) {
                    findings.push(border_finding(index, element, key));
                    claimed = true;
                } else {
                    findings.push(Finding::manual(
                        RuleId::StyleUsage,
                        index,
                        element.line,
                        element.column,
                        &element.tag,
                        "Frame component should use semantic props instead of style prop",
                    ));
                }

                let has_background_entry = entries
                    .iter()
                    .any(|(name, _)| name == "background" || name == "backgroundColor");
                if has_background_entry && !props.contains("surface") {
                    findings.push(Finding::manual(
                        RuleId::HardcodedBackground,
                        index,
                        element.line,
                        element.column,
                        &element.tag,
                        "Hardcoded background color; use the surface prop instead",
                    ));
                }
            }

            if snapshot.has_background && !snapshot.has_padding {
                findings.push(Finding::manual(
                    RuleId::SurfaceWithoutPadding,
                    index,
                    element.line,
                    element.column,
                    &element.tag,
                    "Frame has a background surface but no padding",
                ));
            }
            if snapshot.has_border && !snapshot.has_radius && snapshot.is_floating {
                findings.push(Finding::manual(
                    RuleId::FloatingFlatSurface,
                    index,
                    element.line,
                    element.column,
                    &element.tag,
                    "Floating Frame has a border but no corner radius",
                ));
            }
        }

        if !claimed {
            if let Some(finding) = self.size_constraints(index, element) {
                findings.push(finding);
                claimed = true;
            }
        }

        if !claimed && element.tag == "Frame" {
            if let Some(finding) = self.redundant_override(index, element, props) {
                findings.push(finding);
            }
        }

        findings
    }

    /// Size-constraint props written directly on the element. Applies to
    /// every scanned tag; also runs standalone for the migration tool.
    pub fn size_constraints(&self, index: usize, element: &ElementInvocation) -> Option<Finding> {
        let names: Vec<&str> = element
            .attrs
            .iter()
            .filter(|a| SIZE_CONSTRAINT_PROPS.contains(&a.name.as_str()))
            .map(|a| a.name.as_str())
            .collect();
        if names.is_empty() {
            return None;
        }

        let joined = names.join(", ");
        Some(
            Finding::fixable(
                RuleId::SizeConstraints,
                index,
                element.line,
                element.column,
                &element.tag,
                format!("{} → override", joined),
            )
            .with_before_after(
                format!("{}={{...}}", joined),
                format!("override={{{{ {}: ... }}}}", joined),
            ),
        )
    }

    fn redundant_override(
        &self,
        index: usize,
        element: &ElementInvocation,
        props: &PropBag,
    ) -> Option<Finding> {
        let keys = redundant_override_keys(props);
        if keys.is_empty() {
            return None;
        }
        Some(Finding::fixable(
            RuleId::RedundantOverride,
            index,
            element.line,
            element.column,
            &element.tag,
            format!(
                "Remove redundant override props already in layout preset: {}",
                keys.join(", ")
            ),
        ))
    }

    fn tokenizable_conversions(&self, entries: &[(String, String)]) -> Vec<Conversion> {
        let mut conversions = Vec::new();
        for (name, value) in entries {
            if let Some((override_prop, dimension)) = override_mapping(name) {
                if let Some(token) = self.tables.resolve(dimension, value) {
                    conversions.push(Conversion {
                        css_prop: name.clone(),
                        css_value: value.clone(),
                        override_prop: override_prop.to_string(),
                        token_value: token,
                    });
                }
            }
        }
        conversions
    }
}

/// Override entries whose value matches the layout preset they sit on top
/// of. Shared with the fixer so detection and rewrite agree.
pub(crate) fn redundant_override_keys(props: &PropBag) -> Vec<String> {
    let reference = match props.get("layout") {
        Some(PropValue::Str(s)) => s.clone(),
        Some(PropValue::Expr(e)) => e.clone(),
        _ => return Vec::new(),
    };
    let preset = match presets::resolve_layout(&reference) {
        Some(p) => p,
        None => return Vec::new(),
    };
    let entries = match props.get("override").and_then(|v| v.as_object()) {
        Some(entries) => entries,
        None => return Vec::new(),
    };

    entries
        .iter()
        .filter(|(name, value)| {
            preset
                .props
                .get(name)
                .is_some_and(|preset_value| values_equal(preset_value, value))
        })
        .map(|(name, _)| name.clone())
        .collect()
}

/// First style entry holding the canonical border literal under a border
/// key, in source order. Returns the entry index and key name; shared with
/// the fixer so detection and rewrite agree on the target.
pub(crate) fn canonical_border_entry(obj: &ObjectLiteral) -> Option<(usize, String)> {
    obj.entries.iter().enumerate().find_map(|(i, e)| {
        if !e.spread
            && BORDER_KEYS.contains(&e.name.as_str())
            && e.value.as_str() == Some(CANONICAL_BORDER)
        {
            Some((i, e.name.clone()))
        } else {
            None
        }
    })
}

/// Numbers and their token spellings compare equal (`16` vs `Space.n16`);
/// anything else must match structurally.
fn values_equal(preset: &PropValue, written: &PropValue) -> bool {
    if preset == written {
        return true;
    }
    match (preset, written) {
        (PropValue::Num(n), PropValue::Expr(e)) | (PropValue::Expr(e), PropValue::Num(n)) => {
            n.fract() == 0.0
                && (*e == format!("Space.n{}", *n as i64) || *e == format!("Size.n{}", *n as i64))
        }
        _ => false,
    }
}

fn tokenizable_finding(
    index: usize,
    element: &ElementInvocation,
    conversions: Vec<Conversion>,
) -> Finding {
    let listed = conversions
        .iter()
        .map(|c| {
            format!(
                "{}: \"{}\" → {}: {}",
                c.css_prop, c.css_value, c.override_prop, c.token_value
            )
        })
        .collect::<Vec<_>>()
        .join(", ");
    let mut finding = Finding::fixable(
        RuleId::TokenizableStyle,
        index,
        element.line,
        element.column,
        &element.tag,
        listed,
    );
    finding.conversions = conversions;
    finding
}

fn border_finding(index: usize, element: &ElementInvocation, key: String) -> Finding {
    let replacement = if key == "border" {
        "border".to_string()
    } else {
        let direction = key.trim_start_matches("border").to_lowercase();
        format!("border=\"{}\"", direction)
    };
    Finding::fixable(
        RuleId::BorderShorthand,
        index,
        element.line,
        element.column,
        &element.tag,
        format!("style={{{{ {}: \"...\" }}}} → {}", key, replacement),
    )
}
