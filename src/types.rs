//! Core data types shared across the framelint pipeline

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// A statically extracted attribute or object-literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Bool(bool),
    Str(String),
    Num(f64),
    /// Raw source text of an expression that is not statically evaluated
    /// (member access, ternaries, calls).
    Expr(String),
    /// Parsed object literal, entry order preserved.
    Object(Vec<(String, PropValue)>),
}

impl PropValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_num(&self) -> Option<f64> {
        match self {
            PropValue::Num(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&[(String, PropValue)]> {
        match self {
            PropValue::Object(entries) => Some(entries),
            _ => None,
        }
    }

    /// CSS-record rendering: strings lose their quotes, numbers trim
    /// integral fractions, expressions keep their raw text.
    pub fn as_css_text(&self) -> String {
        match self {
            PropValue::Str(s) => s.clone(),
            PropValue::Num(n) => {
                if n.fract() == 0.0 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
            PropValue::Bool(b) => b.to_string(),
            PropValue::Expr(raw) => raw.clone(),
            PropValue::Object(_) => "[object]".to_string(),
        }
    }

    /// Source-level rendering, used when comparing override entries against
    /// preset values and when echoing values back into messages.
    pub fn render(&self) -> String {
        match self {
            PropValue::Bool(b) => b.to_string(),
            PropValue::Str(s) => format!("\"{}\"", s),
            PropValue::Num(n) => {
                if n.fract() == 0.0 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
            PropValue::Expr(text) => text.clone(),
            PropValue::Object(_) => "[object]".to_string(),
        }
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

/// Flattened `name -> value` view of one element's attributes.
///
/// Later insertions override earlier ones, which gives duplicate JSX
/// attributes their last-one-wins semantics for free.
#[derive(Debug, Clone, Default)]
pub struct PropBag {
    entries: HashMap<String, PropValue>,
}

impl PropBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: PropValue) {
        self.entries.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn contains_any(&self, names: &[&str]) -> bool {
        names.iter().any(|n| self.entries.contains_key(*n))
    }

    pub fn remove(&mut self, name: &str) -> Option<PropValue> {
        self.entries.remove(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PropValue)> {
        self.entries.iter()
    }

    /// Merge `other` on top of `self`: every entry in `other` wins.
    pub fn overlay(&mut self, other: &PropBag) {
        for (name, value) in other.iter() {
            self.entries.insert(name.clone(), value.clone());
        }
    }
}

/// Raw CSS-like record produced by the style-resolution oracle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedStyle {
    pub classes: Vec<String>,
    pub style: BTreeMap<String, String>,
}

impl ResolvedStyle {
    pub fn has_class(&self, name: &str) -> bool {
        self.classes.iter().any(|c| c == name)
    }

    pub fn has_class_prefix(&self, prefix: &str) -> bool {
        self.classes.iter().any(|c| c.starts_with(prefix))
    }

    pub fn has_style_key(&self, key: &str) -> bool {
        self.style.contains_key(key)
    }

    pub fn has_style_prefix(&self, prefix: &str) -> bool {
        self.style.keys().any(|k| k.starts_with(prefix))
    }
}

/// Simulated visual flags for one element. Never persisted; recomputed per
/// element per run.
#[derive(Debug, Clone, Default)]
pub struct ComputedStyleSnapshot {
    pub has_background: bool,
    pub has_padding: bool,
    pub has_border: bool,
    pub has_radius: bool,
    pub is_floating: bool,
    pub resolved: ResolvedStyle,
    /// True when the oracle failed and the flags came from prop presence
    /// alone. Logged, not currently surfaced in report output.
    pub degraded: bool,
}

/// Identifies which detector produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleId {
    SurfaceWithoutPadding,
    FloatingFlatSurface,
    HardcodedBackground,
    TokenizableStyle,
    BorderShorthand,
    #[serde(rename = "size-constraints-to-override")]
    SizeConstraints,
    RedundantOverride,
    StyleUsage,
    ParseFailure,
}

impl RuleId {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleId::SurfaceWithoutPadding => "surface-without-padding",
            RuleId::FloatingFlatSurface => "floating-flat-surface",
            RuleId::HardcodedBackground => "hardcoded-background",
            RuleId::TokenizableStyle => "tokenizable-style",
            RuleId::BorderShorthand => "border-shorthand",
            RuleId::SizeConstraints => "size-constraints-to-override",
            RuleId::RedundantOverride => "redundant-override",
            RuleId::StyleUsage => "style-usage",
            RuleId::ParseFailure => "parse-failure",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One inline-style key that can be migrated to a token-valued override entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversion {
    pub css_prop: String,
    pub css_value: String,
    pub override_prop: String,
    pub token_value: String,
}

/// A detected rule violation, fixable or not.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    pub rule: RuleId,
    pub line: usize,
    pub column: usize,
    pub tag: String,
    pub fixable: bool,
    /// Set by the runner once the patch for this finding has been applied.
    pub fixed: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conversions: Vec<Conversion>,
    /// Index into the source unit's element list; `None` for file-level
    /// findings such as scan failures.
    #[serde(skip)]
    pub element: Option<usize>,
}

impl Finding {
    pub fn manual(
        rule: RuleId,
        element: usize,
        line: usize,
        column: usize,
        tag: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule,
            line,
            column,
            tag: tag.into(),
            fixable: false,
            fixed: false,
            message: message.into(),
            before: None,
            after: None,
            conversions: Vec::new(),
            element: Some(element),
        }
    }

    pub fn fixable(
        rule: RuleId,
        element: usize,
        line: usize,
        column: usize,
        tag: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            fixable: true,
            ..Self::manual(rule, element, line, column, tag, message)
        }
    }

    pub fn file_level(rule: RuleId, line: usize, message: impl Into<String>) -> Self {
        Self {
            rule,
            line,
            column: 1,
            tag: String::new(),
            fixable: false,
            fixed: false,
            message: message.into(),
            before: None,
            after: None,
            conversions: Vec::new(),
            element: None,
        }
    }

    pub fn with_before_after(mut self, before: impl Into<String>, after: impl Into<String>) -> Self {
        self.before = Some(before.into());
        self.after = Some(after.into());
        self
    }
}
