//! Flattens an element invocation's attributes into a `PropBag`

use crate::ast::{ElementInvocation, ObjectLiteral};
use crate::types::PropBag;

/// Extracts every attribute into a name -> value map. Bare attributes become
/// `true`, literals keep their values, everything else degrades to raw
/// expression text. Later duplicates override earlier ones.
pub fn extract(element: &ElementInvocation) -> PropBag {
    let mut bag = PropBag::new();
    for attr in &element.attrs {
        bag.insert(attr.name.clone(), attr.init.value());
    }
    bag
}

/// The element's inline `style` object, when its initializer is an object
/// literal. A non-literal initializer (`style={styles.card}`) yields `None`
/// and is never analyzed or rewritten.
pub fn inline_style(element: &ElementInvocation) -> Option<&ObjectLiteral> {
    element.attr("style").and_then(|a| a.init.object())
}

/// Stringified view of a style object's named entries, in source order.
/// Numbers are rendered bare ("16"), strings lose their quotes; anything
/// else keeps its raw expression text.
pub fn style_entries(obj: &ObjectLiteral) -> Vec<(String, String)> {
    obj.entries
        .iter()
        .filter(|e| !e.spread)
        .map(|e| (e.name.clone(), e.value.as_css_text()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_elements;
    use crate::types::PropValue;

    fn first_element(source: &str) -> ElementInvocation {
        let input: Vec<char> = source.chars().collect();
        let tags = vec!["Frame".to_string()];
        parse_elements(&input, "test.tsx", &tags)
            .unwrap()
            .into_iter()
            .next()
            .unwrap()
    }

    #[test]
    fn extracts_literals_and_expressions() {
        let el = first_element(
            r#"<Frame fill surface="panel" p={16} active={false} w={width} layout={Layout.Stack.Content.Default} />"#,
        );
        let bag = extract(&el);
        assert_eq!(bag.get("fill"), Some(&PropValue::Bool(true)));
        assert_eq!(bag.get("surface"), Some(&PropValue::Str("panel".into())));
        assert_eq!(bag.get("p"), Some(&PropValue::Num(16.0)));
        assert_eq!(bag.get("active"), Some(&PropValue::Bool(false)));
        assert_eq!(bag.get("w"), Some(&PropValue::Expr("width".into())));
        assert_eq!(
            bag.get("layout"),
            Some(&PropValue::Expr("Layout.Stack.Content.Default".into()))
        );
    }

    #[test]
    fn override_objects_flatten_into_entries() {
        let el = first_element("<Frame override={{ p: Space.n16, maxWidth: 480 }} />");
        let bag = extract(&el);
        let entries = bag.get("override").and_then(|v| v.as_object()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, "p");
        assert_eq!(entries[0].1, PropValue::Expr("Space.n16".into()));
        assert_eq!(entries[1].1, PropValue::Num(480.0));
    }

    #[test]
    fn inline_style_requires_an_object_literal() {
        let el = first_element(r#"<Frame style={{ padding: "16px" }} />"#);
        assert!(inline_style(&el).is_some());

        let el = first_element("<Frame style={styles.card} />");
        assert!(inline_style(&el).is_none());
    }

    #[test]
    fn style_entries_stringify_source_values() {
        let el = first_element(
            r#"<Frame style={{ padding: "16px", gap: 8, opacity: 0.5, width: size }} />"#,
        );
        let obj = inline_style(&el).unwrap();
        let entries = style_entries(obj);
        assert_eq!(
            entries,
            vec![
                ("padding".to_string(), "16px".to_string()),
                ("gap".to_string(), "8".to_string()),
                ("opacity".to_string(), "0.5".to_string()),
                ("width".to_string(), "size".to_string()),
            ]
        );
    }
}
