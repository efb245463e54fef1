//! Syntax nodes for parsed element invocations
//!
//! Every node carries char-index spans into its source unit so the fixer can
//! edit precisely and everything outside an edit survives byte-for-byte.

use crate::types::PropValue;

/// Half-open char range `[start, end)` into the owning source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// One `key: value` entry (or spread) inside an object literal.
#[derive(Debug, Clone)]
pub struct ObjectProperty {
    /// Entry key; for spreads this is the raw `...expr` text and never
    /// matches a lookup by name.
    pub name: String,
    pub spread: bool,
    pub value: PropValue,
    /// Span of the value expression, trimmed.
    pub value_span: Span,
    /// Span of the whole entry, key through value, without delimiters.
    pub span: Span,
}

/// A `{ ... }` object literal with entry spans preserved.
#[derive(Debug, Clone)]
pub struct ObjectLiteral {
    /// Span including both braces.
    pub span: Span,
    pub entries: Vec<ObjectProperty>,
}

impl ObjectLiteral {
    pub fn get(&self, name: &str) -> Option<&ObjectProperty> {
        self.entries.iter().find(|e| !e.spread && e.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of named (non-spread) entries.
    pub fn named_len(&self) -> usize {
        self.entries.iter().filter(|e| !e.spread).count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Attribute initializer shapes the extractor understands.
#[derive(Debug, Clone)]
pub enum AttrInit {
    /// Bare attribute, implicit `true`.
    None,
    /// `="..."` or `='...'`; span covers the quotes.
    Str { span: Span, value: String },
    /// `={ ... }`; span covers the outer braces. `object` is set when the
    /// inner expression is itself an object literal.
    Expr {
        span: Span,
        value: PropValue,
        object: Option<ObjectLiteral>,
    },
}

impl AttrInit {
    pub fn object(&self) -> Option<&ObjectLiteral> {
        match self {
            AttrInit::Expr { object, .. } => object.as_ref(),
            _ => None,
        }
    }

    /// Extracted value: `true` for bare attributes, the parsed literal for
    /// everything else.
    pub fn value(&self) -> PropValue {
        match self {
            AttrInit::None => PropValue::Bool(true),
            AttrInit::Str { value, .. } => PropValue::Str(value.clone()),
            AttrInit::Expr { value, .. } => value.clone(),
        }
    }
}

/// One attribute of an element invocation.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: String,
    pub name_span: Span,
    /// Name through end of initializer, excluding leading whitespace.
    pub span: Span,
    /// Where the whitespace run before this attribute begins; removal deletes
    /// from here so no stray gap is left behind.
    pub leading_ws_start: usize,
    pub init: AttrInit,
}

impl Attribute {
    pub fn is_bare(&self) -> bool {
        matches!(self.init, AttrInit::None)
    }

    /// Span to delete when removing this attribute entirely.
    pub fn removal_span(&self) -> Span {
        Span::new(self.leading_ws_start, self.span.end)
    }
}

/// One parsed instantiation of a target component tag.
#[derive(Debug, Clone)]
pub struct ElementInvocation {
    pub tag: String,
    /// `<` through the closing `>` or `/>`.
    pub span: Span,
    pub line: usize,
    pub column: usize,
    pub self_closing: bool,
    pub attrs: Vec<Attribute>,
    /// Position where a synthesized attribute is inserted: after the last
    /// attribute, or after the tag name when there are none.
    pub insert_pos: usize,
}

impl ElementInvocation {
    pub fn attr(&self, name: &str) -> Option<&Attribute> {
        // Last occurrence wins, matching duplicate-attribute semantics.
        self.attrs.iter().rev().find(|a| a.name == name)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }
}
