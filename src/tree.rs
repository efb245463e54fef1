//! Source units: parsed files plus a span-based edit queue
//!
//! This is the write side of the tree adapter. Fixes are queued as
//! [`TextEdit`]s against the current buffer and applied in one batch;
//! every char outside the queued spans survives verbatim, which is what
//! makes the rewrites round-trip safe.

use crate::ast::{Attribute, ElementInvocation, ObjectLiteral, Span};
use crate::error::{LintError, Result};
use crate::parser::parse_elements;
use std::fs;
use std::path::{Path, PathBuf};

/// One primitive edit: replace `span` with `replacement`. An insertion is an
/// empty span; a deletion an empty replacement.
#[derive(Debug, Clone)]
pub struct TextEdit {
    pub span: Span,
    pub replacement: String,
}

impl TextEdit {
    pub fn replace(span: Span, replacement: impl Into<String>) -> Self {
        Self {
            span,
            replacement: replacement.into(),
        }
    }

    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self {
            span: Span::new(at, at),
            replacement: text.into(),
        }
    }

    pub fn delete(span: Span) -> Self {
        Self {
            span,
            replacement: String::new(),
        }
    }
}

/// One parsed file, its target elements, and any pending edits.
pub struct SourceUnit {
    path: PathBuf,
    tags: Vec<String>,
    chars: Vec<char>,
    elements: Vec<ElementInvocation>,
    edits: Vec<TextEdit>,
    dirty: bool,
}

impl SourceUnit {
    pub fn parse(text: &str, path: impl Into<PathBuf>, tags: &[String]) -> Result<Self> {
        let path = path.into();
        let chars: Vec<char> = text.chars().collect();
        let display = path.display().to_string();
        let elements = parse_elements(&chars, &display, tags)?;
        Ok(Self {
            path,
            tags: tags.to_vec(),
            chars,
            elements,
            edits: Vec::new(),
            dirty: false,
        })
    }

    pub fn from_file(path: impl Into<PathBuf>, tags: &[String]) -> Result<Self> {
        let path = path.into();
        let text = fs::read_to_string(&path)?;
        Self::parse(&text, path, tags)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn elements(&self) -> &[ElementInvocation] {
        &self.elements
    }

    pub fn element(&self, index: usize) -> Option<&ElementInvocation> {
        self.elements.get(index)
    }

    /// Current buffer contents.
    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn text_of(&self, span: Span) -> String {
        self.chars[span.start.min(self.chars.len())..span.end.min(self.chars.len())]
            .iter()
            .collect()
    }

    /// First line of an element's source text, for report context.
    pub fn element_first_line(&self, element: &ElementInvocation) -> String {
        let text = self.text_of(element.span);
        text.lines().next().unwrap_or_default().to_string()
    }

    pub fn queue_edit(&mut self, edit: TextEdit) {
        self.edits.push(edit);
    }

    pub fn queue_edits(&mut self, edits: impl IntoIterator<Item = TextEdit>) {
        self.edits.extend(edits);
    }

    pub fn has_pending_edits(&self) -> bool {
        !self.edits.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Applies every queued edit back-to-front and re-parses the buffer so
    /// spans are fresh for any later pass. Overlapping edits are refused
    /// wholesale rather than applied partially.
    pub fn commit_edits(&mut self) -> Result<usize> {
        if self.edits.is_empty() {
            return Ok(0);
        }
        let mut edits = std::mem::take(&mut self.edits);
        edits.sort_by(|a, b| {
            b.span
                .start
                .cmp(&a.span.start)
                .then(b.span.end.cmp(&a.span.end))
        });
        for pair in edits.windows(2) {
            // Sorted descending by start; the later edit must end at or
            // before the earlier edit starts.
            if pair[1].span.end > pair[0].span.start {
                return Err(LintError::edit_conflict(
                    self.path.display().to_string(),
                    format!(
                        "overlapping edits at {}..{} and {}..{}",
                        pair[1].span.start, pair[1].span.end, pair[0].span.start, pair[0].span.end
                    ),
                ));
            }
        }
        let applied = edits.len();
        for edit in &edits {
            let start = edit.span.start.min(self.chars.len());
            let end = edit.span.end.min(self.chars.len());
            self.chars.splice(start..end, edit.replacement.chars());
        }
        let display = self.path.display().to_string();
        self.elements = parse_elements(&self.chars, &display, &self.tags)?;
        self.dirty = true;
        Ok(applied)
    }

    /// Persists the buffer when edits have been committed since the last save.
    pub fn save(&mut self) -> Result<()> {
        if self.dirty {
            fs::write(&self.path, self.text())?;
            self.dirty = false;
        }
        Ok(())
    }

    // Edit constructors. These only build edits; nothing changes until
    // commit_edits runs.

    /// Removes an attribute together with its leading whitespace.
    pub fn remove_attribute_edit(&self, attr: &Attribute) -> TextEdit {
        TextEdit::delete(attr.removal_span())
    }

    /// Inserts a new attribute at the element's insertion point.
    /// `text` is the full attribute source, e.g. `override={{ p: Space.n16 }}`.
    pub fn insert_attribute_edit(&self, element: &ElementInvocation, text: &str) -> TextEdit {
        TextEdit::insert(element.insert_pos, format!(" {}", text))
    }

    /// Appends `entries_text` (one or more comma-joined `key: value` pairs)
    /// to an object literal, after its last entry.
    pub fn append_object_entries_edit(&self, obj: &ObjectLiteral, entries_text: &str) -> TextEdit {
        match obj.entries.last() {
            Some(last) => TextEdit::insert(last.span.end, format!(", {}", entries_text)),
            None => TextEdit::insert(obj.span.start + 1, format!(" {} ", entries_text)),
        }
    }

    /// Removes one entry from an object literal, consuming the delimiter
    /// that separated it from its neighbor.
    pub fn remove_object_entry_edit(&self, obj: &ObjectLiteral, index: usize) -> TextEdit {
        self.remove_entry_run(obj, index, index)
    }

    /// Removes a set of entries. Adjacent indices collapse into one edit so
    /// each delimiter is deleted exactly once and edits never overlap.
    pub fn remove_object_entries_edit(&self, obj: &ObjectLiteral, indices: &[usize]) -> Vec<TextEdit> {
        let mut sorted: Vec<usize> = indices.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        let mut edits = Vec::new();
        let mut i = 0;
        while i < sorted.len() {
            let first = sorted[i];
            let mut last = first;
            while i + 1 < sorted.len() && sorted[i + 1] == last + 1 {
                i += 1;
                last = sorted[i];
            }
            edits.push(self.remove_entry_run(obj, first, last));
            i += 1;
        }
        edits
    }

    fn remove_entry_run(&self, obj: &ObjectLiteral, first: usize, last: usize) -> TextEdit {
        if last + 1 < obj.entries.len() {
            // Delete up to the next entry's start: comma and gap included.
            let next = &obj.entries[last + 1];
            TextEdit::delete(Span::new(obj.entries[first].span.start, next.span.start))
        } else if first > 0 {
            // Trailing run: delete back through the preceding comma.
            let prev = &obj.entries[first - 1];
            TextEdit::delete(Span::new(prev.span.end, obj.entries[last].span.end))
        } else {
            // Every entry: empty the braces.
            TextEdit::delete(Span::new(obj.span.start + 1, obj.span.end - 1))
        }
    }
}
