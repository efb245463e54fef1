//! Element parser for the TSX/TS subset the lint rules care about
//!
//! Walks a whole file with the scanner, skipping strings, template literals
//! and comments, and parses the opening form of every target-tag invocation
//! into [`ElementInvocation`] nodes with precise spans. Everything else in
//! the file is left untouched and unmodeled.

use crate::ast::*;
use crate::error::Result;
use crate::lexer::Scanner;
use crate::types::PropValue;

pub struct Parser<'a> {
    scanner: Scanner<'a>,
    input: &'a [char],
    tags: &'a [String],
}

/// Parses all target-tag invocations out of `input`.
pub fn parse_elements(
    input: &[char],
    file: &str,
    tags: &[String],
) -> Result<Vec<ElementInvocation>> {
    Parser::new(input, file, tags).parse()
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a [char], file: &'a str, tags: &'a [String]) -> Self {
        Self {
            scanner: Scanner::new(input, file),
            input,
            tags,
        }
    }

    pub fn parse(&mut self) -> Result<Vec<ElementInvocation>> {
        let mut elements = Vec::new();
        while let Some(c) = self.scanner.peek() {
            match c {
                '"' | '\'' => {
                    self.scanner.advance();
                    self.scanner.skip_string(c)?;
                }
                '`' => {
                    self.scanner.advance();
                    self.scanner.skip_template()?;
                }
                '/' if self.scanner.peek_at(1) == Some('/') => {
                    self.scanner.skip_line_comment();
                }
                '/' if self.scanner.peek_at(1) == Some('*') => {
                    self.scanner.advance();
                    self.scanner.skip_block_comment()?;
                }
                '<' => {
                    if let Some(element) = self.try_parse_element()? {
                        elements.push(element);
                    }
                }
                _ => {
                    self.scanner.advance();
                }
            }
        }
        Ok(elements)
    }

    /// Called with `<` current. Returns a parsed element when the tag is one
    /// of the targets; otherwise consumes as little as safely possible.
    fn try_parse_element(&mut self) -> Result<Option<ElementInvocation>> {
        // An identifier char or '.' right before '<' means a generic
        // parameter list or member access, not JSX.
        if let Some(p) = self.scanner.prev() {
            if p.is_alphanumeric() || p == '_' || p == '$' || p == '.' {
                self.scanner.advance();
                return Ok(None);
            }
        }

        let start = self.scanner.position();
        let line = self.scanner.line();
        let column = self.scanner.column();
        self.scanner.advance(); // '<'

        match self.scanner.peek() {
            Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
            _ => return Ok(None), // closing tag, fragment, comparison
        }

        let tag = self.scanner.read_identifier();
        if !self.tags.iter().any(|t| t == &tag) {
            return Ok(None);
        }

        let element = self.parse_attributes(tag, start, line, column)?;
        Ok(Some(element))
    }

    fn parse_attributes(
        &mut self,
        tag: String,
        start: usize,
        line: usize,
        column: usize,
    ) -> Result<ElementInvocation> {
        let tag_end = self.scanner.position();
        let mut attrs = Vec::new();
        let mut insert_pos = tag_end;
        let self_closing;

        loop {
            let ws_start = self.scanner.position();
            self.scanner.eat_whitespace();
            match self.scanner.peek() {
                None => {
                    return Err(self
                        .scanner
                        .error(format!("unterminated <{} ...> element", tag)));
                }
                Some('>') => {
                    self.scanner.advance();
                    self_closing = false;
                    break;
                }
                Some('/') if self.scanner.peek_at(1) == Some('>') => {
                    self.scanner.advance();
                    self.scanner.advance();
                    self_closing = true;
                    break;
                }
                Some('{') => {
                    // Spread attribute; kept opaque, not extracted.
                    self.skip_braced_region()?;
                    insert_pos = self.scanner.position();
                }
                Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {
                    let attr = self.parse_attribute(ws_start)?;
                    insert_pos = attr.span.end;
                    attrs.push(attr);
                }
                Some(c) => {
                    return Err(self
                        .scanner
                        .error(format!("unexpected '{}' inside <{} ...>", c, tag)));
                }
            }
        }

        Ok(ElementInvocation {
            tag,
            span: Span::new(start, self.scanner.position()),
            line,
            column,
            self_closing,
            attrs,
            insert_pos,
        })
    }

    fn parse_attribute(&mut self, leading_ws_start: usize) -> Result<Attribute> {
        let name_start = self.scanner.position();
        let name = self.scanner.read_attribute_name();
        let name_span = Span::new(name_start, self.scanner.position());

        // Look past whitespace for '=' without consuming, so a bare
        // attribute leaves the next attribute's leading whitespace alone.
        let mut off = 0;
        while matches!(self.scanner.peek_at(off), Some(c) if c.is_whitespace()) {
            off += 1;
        }
        if self.scanner.peek_at(off) != Some('=') {
            return Ok(Attribute {
                name,
                name_span,
                span: name_span,
                leading_ws_start,
                init: AttrInit::None,
            });
        }
        for _ in 0..=off {
            self.scanner.advance();
        }
        self.scanner.eat_whitespace();

        let init = match self.scanner.peek() {
            Some(q @ ('"' | '\'')) => {
                let (span, value) = self.read_string_literal(q)?;
                AttrInit::Str { span, value }
            }
            Some('{') => self.parse_jsx_expression()?,
            Some(c) => {
                return Err(self
                    .scanner
                    .error(format!("unexpected '{}' after '{}='", c, name)));
            }
            None => return Err(self.scanner.error("unexpected end of file in attribute")),
        };

        let end = match &init {
            AttrInit::None => name_span.end,
            AttrInit::Str { span, .. } => span.end,
            AttrInit::Expr { span, .. } => span.end,
        };

        Ok(Attribute {
            name,
            name_span,
            span: Span::new(name_start, end),
            leading_ws_start,
            init,
        })
    }

    /// Called with the opening quote current.
    fn read_string_literal(&mut self, quote: char) -> Result<(Span, String)> {
        let start = self.scanner.position();
        self.scanner.advance();
        let mut value = String::new();
        loop {
            match self.scanner.advance() {
                None => return Err(self.scanner.error("unterminated string literal")),
                Some('\\') => match self.scanner.advance() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some(c) => value.push(c),
                    None => return Err(self.scanner.error("unterminated escape sequence")),
                },
                Some(c) if c == quote => break,
                Some(c) => value.push(c),
            }
        }
        Ok((Span::new(start, self.scanner.position()), value))
    }

    /// Called with the opening `{` of a JSX expression current.
    fn parse_jsx_expression(&mut self) -> Result<AttrInit> {
        let open = self.scanner.position();
        self.scanner.advance();
        self.scanner.eat_whitespace();

        if self.scanner.peek() == Some('{') {
            let object = self.parse_object_literal()?;
            self.scanner.eat_whitespace();
            if self.scanner.peek() == Some('}') {
                self.scanner.advance();
                let span = Span::new(open, self.scanner.position());
                let value = PropValue::Object(
                    object
                        .entries
                        .iter()
                        .filter(|e| !e.spread)
                        .map(|e| (e.name.clone(), e.value.clone()))
                        .collect(),
                );
                return Ok(AttrInit::Expr {
                    span,
                    value,
                    object: Some(object),
                });
            }
            // Something trails the object (casts, chained calls); treat the
            // whole expression as opaque text.
            self.read_balanced_until(&['}'])?;
            self.scanner.advance(); // '}'
            let span = Span::new(open, self.scanner.position());
            let raw = self.text(Span::new(open + 1, span.end - 1));
            return Ok(AttrInit::Expr {
                span,
                value: PropValue::Expr(raw.trim().to_string()),
                object: None,
            });
        }

        let (_, raw) = self.read_balanced_until(&['}'])?;
        if self.scanner.peek() != Some('}') {
            return Err(self.scanner.error("unterminated JSX expression"));
        }
        self.scanner.advance();
        let span = Span::new(open, self.scanner.position());
        Ok(AttrInit::Expr {
            span,
            value: classify_expr(&raw),
            object: None,
        })
    }

    /// Called with the opening `{` of an object literal current.
    fn parse_object_literal(&mut self) -> Result<ObjectLiteral> {
        let start = self.scanner.position();
        self.scanner.advance();
        let mut entries = Vec::new();

        loop {
            self.scanner.eat_whitespace();
            match self.scanner.peek() {
                None => return Err(self.scanner.error("unterminated object literal")),
                Some('}') => {
                    self.scanner.advance();
                    break;
                }
                Some(',') => {
                    self.scanner.advance();
                }
                Some('/') if self.scanner.peek_at(1) == Some('/') => {
                    self.scanner.skip_line_comment();
                }
                Some('/') if self.scanner.peek_at(1) == Some('*') => {
                    self.scanner.advance();
                    self.scanner.skip_block_comment()?;
                }
                Some(_) => {
                    entries.push(self.parse_object_entry()?);
                }
            }
        }

        Ok(ObjectLiteral {
            span: Span::new(start, self.scanner.position()),
            entries,
        })
    }

    fn parse_object_entry(&mut self) -> Result<ObjectProperty> {
        let entry_start = self.scanner.position();

        // Spread entry: consumed as opaque text.
        if self.scanner.peek() == Some('.')
            && self.scanner.peek_at(1) == Some('.')
            && self.scanner.peek_at(2) == Some('.')
        {
            let (value_span, raw) = self.read_balanced_until(&[',', '}'])?;
            return Ok(ObjectProperty {
                name: raw.clone(),
                spread: true,
                value: PropValue::Expr(raw),
                value_span,
                span: Span::new(entry_start, value_span.end),
            });
        }

        let name = match self.scanner.peek() {
            Some(q @ ('"' | '\'')) => self.read_string_literal(q)?.1,
            Some('[') => {
                // Computed key; kept raw so it never collides with lookups.
                let key_start = self.scanner.position();
                self.read_bracketed_region()?;
                self.text(Span::new(key_start, self.scanner.position()))
            }
            _ => {
                let mut key = String::new();
                while let Some(c) = self.scanner.peek() {
                    if c.is_alphanumeric() || c == '_' || c == '$' {
                        key.push(c);
                        self.scanner.advance();
                    } else {
                        break;
                    }
                }
                if key.is_empty() {
                    return Err(self.scanner.error("expected object key"));
                }
                key
            }
        };
        let name_end = self.scanner.position();

        self.scanner.eat_whitespace();
        if self.scanner.peek() != Some(':') {
            // Shorthand entry `{ foo }`.
            return Ok(ObjectProperty {
                value: PropValue::Expr(name.clone()),
                value_span: Span::new(entry_start, name_end),
                span: Span::new(entry_start, name_end),
                name,
                spread: false,
            });
        }
        self.scanner.advance();
        self.scanner.eat_whitespace();

        if self.scanner.peek() == Some('{') {
            let nested = self.parse_object_literal()?;
            let value = PropValue::Object(
                nested
                    .entries
                    .iter()
                    .filter(|e| !e.spread)
                    .map(|e| (e.name.clone(), e.value.clone()))
                    .collect(),
            );
            return Ok(ObjectProperty {
                name,
                spread: false,
                value,
                value_span: nested.span,
                span: Span::new(entry_start, nested.span.end),
            });
        }

        let (value_span, raw) = self.read_balanced_until(&[',', '}'])?;
        Ok(ObjectProperty {
            name,
            spread: false,
            value: classify_expr(&raw),
            value_span,
            span: Span::new(entry_start, value_span.end),
        })
    }

    /// Scans forward until one of `terminators` appears at nesting depth
    /// zero, without consuming it. Returns the trimmed span and text.
    fn read_balanced_until(&mut self, terminators: &[char]) -> Result<(Span, String)> {
        let start = self.scanner.position();
        let mut depth = 0usize;
        loop {
            match self.scanner.peek() {
                None => return Err(self.scanner.error("unexpected end of file in expression")),
                Some(c) if depth == 0 && terminators.contains(&c) => break,
                Some('{' | '[' | '(') => {
                    depth += 1;
                    self.scanner.advance();
                }
                Some('}' | ']' | ')') => {
                    if depth == 0 {
                        return Err(self.scanner.error("unbalanced bracket in expression"));
                    }
                    depth -= 1;
                    self.scanner.advance();
                }
                Some(q @ ('"' | '\'')) => {
                    self.scanner.advance();
                    self.scanner.skip_string(q)?;
                }
                Some('`') => {
                    self.scanner.advance();
                    self.scanner.skip_template()?;
                }
                Some('/') if self.scanner.peek_at(1) == Some('/') => {
                    self.scanner.skip_line_comment();
                }
                Some('/') if self.scanner.peek_at(1) == Some('*') => {
                    self.scanner.advance();
                    self.scanner.skip_block_comment()?;
                }
                Some(_) => {
                    self.scanner.advance();
                }
            }
        }
        let end = self.scanner.position();
        let raw_span = Span::new(start, end);
        let raw = self.text(raw_span);
        let trimmed = raw.trim();
        let lead = raw.chars().take_while(|c| c.is_whitespace()).count();
        let span = Span::new(start + lead, start + lead + trimmed.chars().count());
        Ok((span, trimmed.to_string()))
    }

    /// Consumes a `{ ... }` region opaquely (spread attributes).
    fn skip_braced_region(&mut self) -> Result<()> {
        self.scanner.advance(); // '{'
        let mut depth = 1usize;
        loop {
            match self.scanner.advance() {
                None => return Err(self.scanner.error("unterminated braced expression")),
                Some('{') => depth += 1,
                Some('}') => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                Some(q @ ('"' | '\'')) => self.scanner.skip_string(q)?,
                Some('`') => self.scanner.skip_template()?,
                Some('/') if self.scanner.peek() == Some('/') => self.scanner.skip_line_comment(),
                Some('/') if self.scanner.peek() == Some('*') => {
                    self.scanner.skip_block_comment()?;
                }
                Some(_) => {}
            }
        }
    }

    /// Consumes a `[ ... ]` region opaquely (computed keys).
    fn read_bracketed_region(&mut self) -> Result<()> {
        self.scanner.advance(); // '['
        let mut depth = 1usize;
        loop {
            match self.scanner.advance() {
                None => return Err(self.scanner.error("unterminated computed key")),
                Some('[') => depth += 1,
                Some(']') => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                Some(q @ ('"' | '\'')) => self.scanner.skip_string(q)?,
                Some('`') => self.scanner.skip_template()?,
                Some(_) => {}
            }
        }
    }

    fn text(&self, span: Span) -> String {
        self.input[span.start..span.end].iter().collect()
    }
}

/// Classifies a raw JSX-expression text as a literal where possible.
fn classify_expr(raw: &str) -> PropValue {
    let t = raw.trim();
    match t {
        "true" => return PropValue::Bool(true),
        "false" => return PropValue::Bool(false),
        _ => {}
    }
    if let Some(inner) = as_string_literal(t) {
        return PropValue::Str(inner);
    }
    if t.starts_with(|c: char| c.is_ascii_digit() || c == '-' || c == '.' || c == '+') {
        if let Ok(n) = t.parse::<f64>() {
            if n.is_finite() {
                return PropValue::Num(n);
            }
        }
    }
    PropValue::Expr(t.to_string())
}

/// Returns the inner text when `t` is exactly one quoted string literal.
fn as_string_literal(t: &str) -> Option<String> {
    let mut chars = t.chars();
    let quote = chars.next()?;
    if quote != '"' && quote != '\'' {
        return None;
    }
    let mut value = String::new();
    let mut closed = false;
    while let Some(c) = chars.next() {
        if closed {
            return None; // trailing content after the closing quote
        }
        match c {
            '\\' => match chars.next() {
                Some('n') => value.push('\n'),
                Some('t') => value.push('\t'),
                Some(e) => value.push(e),
                None => return None,
            },
            c if c == quote => closed = true,
            c => value.push(c),
        }
    }
    closed.then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Vec<ElementInvocation> {
        let input: Vec<char> = source.chars().collect();
        let tags = vec!["Frame".to_string(), "Section".to_string()];
        parse_elements(&input, "test.tsx", &tags).unwrap()
    }

    #[test]
    fn finds_self_closing_and_paired_elements() {
        let elements = parse("export const X = () => (\n  <Frame fill>\n    <Section p={16} />\n  </Frame>\n);\n");
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].tag, "Frame");
        assert_eq!(elements[0].line, 2);
        assert!(!elements[0].self_closing);
        assert_eq!(elements[1].tag, "Section");
        assert!(elements[1].self_closing);
    }

    #[test]
    fn ignores_strings_comments_and_templates() {
        let source = r#"
const a = "<Frame fill />";
// <Frame p={1} />
/* <Frame p={2} /> */
const b = `<Frame ${x} />`;
"#;
        assert!(parse(source).is_empty());
    }

    #[test]
    fn ignores_generics_and_other_tags() {
        let source = "const xs: Array<Frame> = [];\nconst el = <div className=\"x\" />;\n";
        assert!(parse(source).is_empty());
    }

    #[test]
    fn extracts_attribute_shapes() {
        let elements = parse(r#"<Frame fill surface="panel" p={16} grow={true} layout={Layout.Row.Header.Default} label={'hi'} />"#);
        let el = &elements[0];
        assert!(el.attr("fill").unwrap().is_bare());
        assert_eq!(
            el.attr("surface").unwrap().init.value(),
            PropValue::Str("panel".into())
        );
        assert_eq!(el.attr("p").unwrap().init.value(), PropValue::Num(16.0));
        assert_eq!(el.attr("grow").unwrap().init.value(), PropValue::Bool(true));
        assert_eq!(
            el.attr("layout").unwrap().init.value(),
            PropValue::Expr("Layout.Row.Header.Default".into())
        );
        assert_eq!(
            el.attr("label").unwrap().init.value(),
            PropValue::Str("hi".into())
        );
    }

    #[test]
    fn parses_object_literals_with_spans() {
        let source = r#"<Frame style={{ padding: "16px", gap: 8, border: "1px solid var(--border-color)" }} />"#;
        let elements = parse(source);
        let style = elements[0].attr("style").unwrap();
        let obj = style.init.object().expect("style should parse as object");
        assert_eq!(obj.entries.len(), 3);
        assert_eq!(obj.get("padding").unwrap().value, PropValue::Str("16px".into()));
        assert_eq!(obj.get("gap").unwrap().value, PropValue::Num(8.0));

        let chars: Vec<char> = source.chars().collect();
        let padding = obj.get("padding").unwrap();
        let text: String = chars[padding.span.start..padding.span.end].iter().collect();
        assert_eq!(text, "padding: \"16px\"");
    }

    #[test]
    fn tolerates_spreads_shorthand_and_trailing_commas() {
        let elements =
            parse("<Frame {...rest} override={{ ...base, minWidth, maxWidth: 200, }} />");
        let el = &elements[0];
        assert_eq!(el.attrs.len(), 1); // spread attribute is not extracted
        let obj = el.attr("override").unwrap().init.object().unwrap();
        assert_eq!(obj.entries.len(), 3);
        assert!(obj.entries[0].spread);
        assert_eq!(obj.get("minWidth").unwrap().value, PropValue::Expr("minWidth".into()));
        assert_eq!(obj.get("maxWidth").unwrap().value, PropValue::Num(200.0));
        assert_eq!(obj.named_len(), 2);
    }

    #[test]
    fn nested_objects_and_expressions() {
        let elements = parse(
            "<Frame override={{ inset: { top: 1 }, w: cond ? 100 : 200 }} style={styles.card} />",
        );
        let el = &elements[0];
        let obj = el.attr("override").unwrap().init.object().unwrap();
        assert!(matches!(obj.get("inset").unwrap().value, PropValue::Object(_)));
        assert_eq!(
            obj.get("w").unwrap().value,
            PropValue::Expr("cond ? 100 : 200".into())
        );
        // A non-object style initializer stays an opaque expression.
        assert!(el.attr("style").unwrap().init.object().is_none());
    }

    #[test]
    fn duplicate_attributes_last_one_wins() {
        let elements = parse("<Frame p={8} p={16} />");
        assert_eq!(
            elements[0].attr("p").unwrap().init.value(),
            PropValue::Num(16.0)
        );
    }

    #[test]
    fn unterminated_element_is_an_error() {
        let input: Vec<char> = "<Frame fill".chars().collect();
        let tags = vec!["Frame".to_string()];
        assert!(parse_elements(&input, "test.tsx", &tags).is_err());
    }

    #[test]
    fn insert_pos_lands_after_last_attribute() {
        let source = "<Frame a={1} b=\"x\" />";
        let elements = parse(source);
        let el = &elements[0];
        let chars: Vec<char> = source.chars().collect();
        let before: String = chars[..el.insert_pos].iter().collect();
        assert!(before.ends_with("b=\"x\""));
    }
}
