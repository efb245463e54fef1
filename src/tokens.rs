//! Token tables: injective CSS-literal to design-token lookups with a
//! structural `var(--prefix-nNN)` fallback

use regex::Regex;
use std::collections::HashMap;

/// Pixel steps on the spacing scale. Tokens are named `Space.n{step}`.
pub const SPACE_SCALE: &[u32] = &[
    0, 1, 2, 4, 6, 8, 10, 12, 14, 16, 18, 20, 22, 24, 26, 28, 30, 32, 36, 40, 44, 48, 56, 64, 72,
    80, 88, 96, 112, 128, 144, 160,
];

/// Pixel steps on the sizing scale. Tokens are named `Size.n{step}`.
pub const SIZE_SCALE: &[u32] = &[
    0, 16, 20, 24, 28, 32, 36, 40, 44, 48, 56, 64, 80, 96, 112, 128, 144, 160, 192, 224, 240, 280,
    320, 360, 400, 480, 560, 640,
];

/// Direct size-constraint props migrated into the override map.
pub const SIZE_CONSTRAINT_PROPS: &[&str] = &["minWidth", "minHeight", "maxWidth", "maxHeight"];

/// Semantic padding props recognized by the style simulator.
pub const PADDING_PROPS: &[&str] = &["p", "px", "py", "pt", "pb", "pl", "pr"];

/// The design dimension a CSS prop tokenizes against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenDimension {
    Spacing,
    Sizing,
}

impl TokenDimension {
    /// CSS variable prefix used by the structural fallback.
    pub fn var_prefix(&self) -> &'static str {
        match self {
            TokenDimension::Spacing => "space",
            TokenDimension::Sizing => "size",
        }
    }

    /// Token namespace emitted into source code.
    pub fn namespace(&self) -> &'static str {
        match self {
            TokenDimension::Spacing => "Space",
            TokenDimension::Sizing => "Size",
        }
    }
}

/// Maps an inline-style CSS prop to its override prop and token dimension.
/// Props outside this table are never tokenized.
pub fn override_mapping(css_prop: &str) -> Option<(&'static str, TokenDimension)> {
    use TokenDimension::*;
    match css_prop {
        "padding" => Some(("p", Spacing)),
        "paddingTop" => Some(("pt", Spacing)),
        "paddingBottom" => Some(("pb", Spacing)),
        "paddingLeft" => Some(("pl", Spacing)),
        "paddingRight" => Some(("pr", Spacing)),
        "gap" => Some(("gap", Spacing)),
        "width" => Some(("w", Sizing)),
        "height" => Some(("h", Sizing)),
        "minWidth" => Some(("minWidth", Sizing)),
        "minHeight" => Some(("minHeight", Sizing)),
        "maxWidth" => Some(("maxWidth", Sizing)),
        "maxHeight" => Some(("maxHeight", Sizing)),
        _ => None,
    }
}

/// Namespace of a token identifier (`"Space.n16"` -> `"Space"`), used to
/// decide which named imports a fix must ensure.
pub fn token_namespace(token: &str) -> Option<&str> {
    let ns = token.split('.').next()?;
    match ns {
        "Space" | "Size" => Some(ns),
        _ => None,
    }
}

/// One immutable literal -> token map plus its structural fallback pattern.
#[derive(Debug)]
pub struct TokenTable {
    dimension: TokenDimension,
    entries: HashMap<String, String>,
    // Anchored so a suffix with any non-digit (var(--space-n1-2)) is rejected.
    var_pattern: Regex,
}

impl TokenTable {
    fn new(dimension: TokenDimension, entries: HashMap<String, String>) -> Self {
        let pattern = format!(r"^var\(--{}-n(\d+)\)$", dimension.var_prefix());
        Self {
            dimension,
            entries,
            var_pattern: Regex::new(&pattern).unwrap(),
        }
    }

    fn spacing() -> Self {
        let mut entries = HashMap::new();
        for step in SPACE_SCALE {
            entries.insert(format!("{}px", step), format!("Space.n{}", step));
        }
        Self::new(TokenDimension::Spacing, entries)
    }

    fn sizing() -> Self {
        let mut entries = HashMap::new();
        for step in SIZE_SCALE {
            entries.insert(format!("{}px", step), format!("Size.n{}", step));
        }
        entries.insert("100%".to_string(), "Size.full".to_string());
        entries.insert("fit-content".to_string(), "Size.fit".to_string());
        entries.insert("min-content".to_string(), "Size.min".to_string());
        entries.insert("max-content".to_string(), "Size.max".to_string());
        entries.insert("auto".to_string(), "Size.auto".to_string());
        Self::new(TokenDimension::Sizing, entries)
    }

    pub fn dimension(&self) -> TokenDimension {
        self.dimension
    }

    /// Total lookup: exact entry, then the `var(--prefix-nNN)` fallback, then
    /// a bare-number retry (React treats numeric style values as pixels).
    pub fn resolve(&self, literal: &str) -> Option<String> {
        let literal = literal.trim();
        if let Some(token) = self.entries.get(literal) {
            return Some(token.clone());
        }
        if let Some(caps) = self.var_pattern.captures(literal) {
            return Some(format!("{}.n{}", self.dimension.namespace(), &caps[1]));
        }
        if !literal.is_empty() && literal.bytes().all(|b| b.is_ascii_digit()) {
            return self.entries.get(&format!("{}px", literal)).cloned();
        }
        None
    }

    /// True when no two distinct literals map to the same token.
    pub fn is_injective(&self) -> bool {
        let mut seen = HashMap::new();
        for (literal, token) in &self.entries {
            if let Some(previous) = seen.insert(token.clone(), literal.clone()) {
                if &previous != literal {
                    return false;
                }
            }
        }
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Both dimension tables, built once per run and shared read-only.
#[derive(Debug)]
pub struct TokenTables {
    spacing: TokenTable,
    sizing: TokenTable,
}

impl TokenTables {
    pub fn new() -> Self {
        Self {
            spacing: TokenTable::spacing(),
            sizing: TokenTable::sizing(),
        }
    }

    pub fn table(&self, dimension: TokenDimension) -> &TokenTable {
        match dimension {
            TokenDimension::Spacing => &self.spacing,
            TokenDimension::Sizing => &self.sizing,
        }
    }

    pub fn resolve(&self, dimension: TokenDimension, literal: &str) -> Option<String> {
        self.table(dimension).resolve(literal)
    }
}

impl Default for TokenTables {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_are_injective() {
        let tables = TokenTables::new();
        assert!(tables.table(TokenDimension::Spacing).is_injective());
        assert!(tables.table(TokenDimension::Sizing).is_injective());
    }

    #[test]
    fn exact_lookup() {
        let tables = TokenTables::new();
        assert_eq!(
            tables.resolve(TokenDimension::Spacing, "16px"),
            Some("Space.n16".to_string())
        );
        assert_eq!(tables.resolve(TokenDimension::Spacing, "17px"), None);
        assert_eq!(
            tables.resolve(TokenDimension::Sizing, "100%"),
            Some("Size.full".to_string())
        );
        assert_eq!(
            tables.resolve(TokenDimension::Sizing, "fit-content"),
            Some("Size.fit".to_string())
        );
    }

    #[test]
    fn var_pattern_fallback() {
        let tables = TokenTables::new();
        assert_eq!(
            tables.resolve(TokenDimension::Spacing, "var(--space-n12)"),
            Some("Space.n12".to_string())
        );
        // Any all-digit suffix resolves, even off-scale ones.
        assert_eq!(
            tables.resolve(TokenDimension::Spacing, "var(--space-n999)"),
            Some("Space.n999".to_string())
        );
        // A non-digit in the suffix is malformed.
        assert_eq!(tables.resolve(TokenDimension::Spacing, "var(--space-n1-2)"), None);
        assert_eq!(tables.resolve(TokenDimension::Spacing, "var(--space-nx)"), None);
        // Prefixes do not cross dimensions.
        assert_eq!(tables.resolve(TokenDimension::Sizing, "var(--space-n12)"), None);
        assert_eq!(
            tables.resolve(TokenDimension::Sizing, "var(--size-n240)"),
            Some("Size.n240".to_string())
        );
    }

    #[test]
    fn bare_numbers_resolve_as_pixels() {
        let tables = TokenTables::new();
        assert_eq!(
            tables.resolve(TokenDimension::Spacing, "16"),
            Some("Space.n16".to_string())
        );
        assert_eq!(tables.resolve(TokenDimension::Spacing, "17"), None);
        assert_eq!(tables.resolve(TokenDimension::Spacing, "1.5"), None);
    }

    #[test]
    fn override_mapping_covers_known_props() {
        assert_eq!(override_mapping("padding"), Some(("p", TokenDimension::Spacing)));
        assert_eq!(override_mapping("paddingLeft"), Some(("pl", TokenDimension::Spacing)));
        assert_eq!(override_mapping("width"), Some(("w", TokenDimension::Sizing)));
        assert_eq!(override_mapping("maxWidth"), Some(("maxWidth", TokenDimension::Sizing)));
        assert_eq!(override_mapping("margin"), None);
        assert_eq!(override_mapping("background"), None);
    }

    #[test]
    fn token_namespaces() {
        assert_eq!(token_namespace("Space.n16"), Some("Space"));
        assert_eq!(token_namespace("Size.full"), Some("Size"));
        assert_eq!(token_namespace("Layout.Stack"), None);
    }
}
