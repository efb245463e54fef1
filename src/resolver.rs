//! Style resolution oracle
//!
//! `StyleResolver` is the seam between the simulator and the design system's
//! runtime resolution rules; the analyzer only ever consumes it as a pure
//! function. `FrameStyleResolver` is the production implementation and
//! mirrors the runtime: semantic props become utility classes and a CSS-like
//! record. Tests inject their own resolver where that is more convenient.
//!
//! Falsy scalar values (0, empty string) drop their entry instead of
//! emitting one; that is runtime behavior, not an accident here.

use crate::error::{LintError, Result};
use crate::types::{PropBag, PropValue, ResolvedStyle};
use regex::Regex;
use std::collections::BTreeMap;

pub trait StyleResolver {
    /// Resolves a merged prop set to classes and a raw style record.
    /// Fails when a value cannot be statically evaluated; the simulator
    /// degrades on failure instead of propagating.
    fn resolve(&self, props: &PropBag) -> Result<ResolvedStyle>;
}

#[derive(Clone, Copy)]
enum Axis {
    Width,
    Height,
}

pub struct FrameStyleResolver {
    unit_pattern: Regex,
    fixed_pattern: Regex,
}

impl FrameStyleResolver {
    pub fn new() -> Self {
        Self {
            unit_pattern: Regex::new(r"^-?\d*\.?\d+(px|rem|em|%|vw|vh)$").unwrap(),
            fixed_pattern: Regex::new(r"^-?\d*\.?\d+(px|rem|em)$").unwrap(),
        }
    }

    fn space(&self, v: &PropValue) -> Result<Option<String>> {
        match v {
            PropValue::Num(n) if *n == 0.0 => Ok(None),
            PropValue::Num(n) => Ok(Some(fmt_px(*n))),
            PropValue::Str(s) if s.is_empty() => Ok(None),
            PropValue::Str(s) if s.starts_with("space.") => Ok(Some(css_var(s))),
            PropValue::Str(s) => Ok(Some(s.clone())),
            PropValue::Expr(e) => match space_token(e) {
                Some(0) => Ok(None),
                Some(n) => Ok(Some(format!("{}px", n))),
                None => Err(unresolvable("spacing", e)),
            },
            _ => Err(unresolvable("spacing", &v.render())),
        }
    }

    fn sizing(&self, v: &PropValue, axis: Axis) -> Result<Option<String>> {
        match v {
            PropValue::Num(n) if *n == 0.0 => Ok(None),
            PropValue::Num(n) => Ok(Some(fmt_px(*n))),
            PropValue::Str(s) if s.is_empty() => Ok(None),
            PropValue::Str(s) => Ok(self.sizing_str(s, axis)),
            PropValue::Expr(e) => match sizing_token(e) {
                Some(canonical) => Ok(self.sizing_str(&canonical, axis)),
                None => Err(unresolvable("sizing", e)),
            },
            _ => Err(unresolvable("sizing", &v.render())),
        }
    }

    fn sizing_str(&self, s: &str, axis: Axis) -> Option<String> {
        match s {
            "size.full" => return Some("100%".to_string()),
            "size.screen" => {
                return Some(match axis {
                    Axis::Width => "100vw".to_string(),
                    Axis::Height => "100vh".to_string(),
                })
            }
            "size.min" => return Some("min-content".to_string()),
            "size.max" => return Some("max-content".to_string()),
            "size.fit" => return Some("fit-content".to_string()),
            "size.auto" => return Some("auto".to_string()),
            _ => {}
        }
        if s.starts_with("size.") || s.starts_with("container.") {
            return Some(css_var(s));
        }
        if matches!(
            s,
            "auto" | "fit-content" | "min-content" | "max-content" | "100%" | "50%" | "33%" | "66%"
        ) {
            return Some(s.to_string());
        }
        if self.unit_pattern.is_match(s) {
            return Some(s.to_string());
        }
        // Anything else is quietly dropped, as the runtime does.
        None
    }

    fn radius(&self, v: &PropValue) -> Result<Option<String>> {
        match v {
            PropValue::Num(n) if *n == 0.0 => Ok(None),
            PropValue::Num(n) => Ok(Some(fmt_px(*n))),
            PropValue::Str(s) if s.is_empty() => Ok(None),
            PropValue::Str(s) if s.starts_with("radius.") => Ok(Some(css_var(s))),
            PropValue::Str(s) => Ok(Some(s.clone())),
            _ => Err(unresolvable("radius", &v.render())),
        }
    }

    fn opacity(&self, v: &PropValue) -> Result<Option<String>> {
        match v {
            PropValue::Num(n) => Ok(Some(fmt_num(*n))),
            PropValue::Str(s) if s.starts_with("opacity.") => Ok(Some(css_var(s))),
            PropValue::Str(s) => Ok(Some(s.clone())),
            PropValue::Expr(e) => match opacity_token(e) {
                Some(value) => Ok(Some(fmt_num(value))),
                None => Err(unresolvable("opacity", e)),
            },
            _ => Err(unresolvable("opacity", &v.render())),
        }
    }

    fn is_fixed_dimension(&self, v: &PropValue) -> bool {
        match v {
            PropValue::Num(_) => true,
            PropValue::Str(s) => {
                if s.starts_with("size.n") || s.starts_with("container.n") {
                    return true;
                }
                if matches!(
                    s.as_str(),
                    "size.full" | "size.screen" | "size.auto" | "size.min" | "size.max" | "size.fit"
                ) {
                    return false;
                }
                self.fixed_pattern.is_match(s)
            }
            PropValue::Expr(e) => space_token_like(e, "Size.n").is_some(),
            _ => false,
        }
    }
}

impl Default for FrameStyleResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleResolver for FrameStyleResolver {
    fn resolve(&self, props: &PropBag) -> Result<ResolvedStyle> {
        let mut classes: Vec<String> = Vec::new();
        let mut style: BTreeMap<String, String> = BTreeMap::new();

        // Base layout classes.
        if flag(props, "grid")? {
            classes.push("grid".into());
        } else {
            classes.push("flex".into());
        }
        if flag(props, "fill")? {
            classes.push("fill".into());
        }
        if flag(props, "row")? {
            classes.push("hbox".into());
        } else {
            classes.push("vbox".into());
        }
        if flag(props, "pack")? {
            classes.push("pack".into());
        }
        if let Some(PropValue::Str(wrap)) = props.get("wrap") {
            match wrap.as_str() {
                "wrap" | "nowrap" | "wrap-reverse" => classes.push(wrap.clone()),
                _ => {}
            }
        }
        if let Some(v) = props.get("align") {
            match v {
                PropValue::Str(s) => classes.push(format!("items-{}", s)),
                _ => return Err(unresolvable("align", &v.render())),
            }
        }
        if let Some(v) = props.get("justify") {
            match v {
                PropValue::Str(s) => classes.push(format!("justify-{}", s)),
                _ => return Err(unresolvable("justify", &v.render())),
            }
        }
        match props.get("flex") {
            Some(PropValue::Bool(true)) => classes.push("flex-1".into()),
            Some(PropValue::Bool(false)) => classes.push("flex-none".into()),
            _ => {}
        }

        // Full/screen sizing classes.
        if let Some(w) = props.get("w") {
            if sizing_keyword(w) == Some("size.full") {
                classes.push("w-full".into());
            } else if sizing_keyword(w) == Some("size.screen") {
                classes.push("w-screen".into());
            }
        }
        if let Some(h) = props.get("h") {
            if sizing_keyword(h) == Some("size.full") {
                classes.push("h-full".into());
            } else if sizing_keyword(h) == Some("size.screen") {
                classes.push("h-screen".into());
            }
        }

        // Radius classes only when the scalar r prop is absent.
        if !props.contains("r") {
            match props.get("rounded") {
                Some(PropValue::Bool(true)) => classes.push("r-md".into()),
                Some(PropValue::Bool(false)) => classes.push("r-none".into()),
                Some(PropValue::Str(s)) if s == "none" => classes.push("r-none".into()),
                Some(PropValue::Str(s)) => classes.push(format!("r-{}", s)),
                Some(v) => return Err(unresolvable("rounded", &v.render())),
                None => {}
            }
        }

        if let Some(v) = props.get("surface") {
            match v {
                PropValue::Str(s) => classes.push(format!("surface-{}", s)),
                _ => return Err(unresolvable("surface", &v.render())),
            }
        }

        match props.get("clip") {
            Some(PropValue::Bool(true)) => classes.push("overflow-clip".into()),
            Some(PropValue::Bool(false)) => classes.push("overflow-visible".into()),
            _ => {}
        }
        if let Some(PropValue::Str(cursor)) = props.get("cursor") {
            classes.push(format!("cursor-{}", cursor));
        }
        if let Some(PropValue::Str(shadow)) = props.get("shadow") {
            classes.push(format!("shadow-{}", shadow));
        }

        // Padding, with py/px as axis fallbacks.
        let resolved = |name: &str| -> Result<Option<String>> {
            match props.get(name) {
                Some(v) => self.space(v),
                None => Ok(None),
            }
        };
        set(&mut style, "padding", resolved("p")?);
        set(&mut style, "paddingTop", or(resolved("pt")?, resolved("py")?));
        set(&mut style, "paddingBottom", or(resolved("pb")?, resolved("py")?));
        set(&mut style, "paddingLeft", or(resolved("pl")?, resolved("px")?));
        set(&mut style, "paddingRight", or(resolved("pr")?, resolved("px")?));
        set(&mut style, "gap", resolved("gap")?);

        // Sizing.
        for (prop, key, axis) in [
            ("w", "width", Axis::Width),
            ("h", "height", Axis::Height),
            ("minWidth", "minWidth", Axis::Width),
            ("minHeight", "minHeight", Axis::Height),
            ("maxWidth", "maxWidth", Axis::Width),
            ("maxHeight", "maxHeight", Axis::Height),
        ] {
            if let Some(v) = props.get(prop) {
                set(&mut style, key, self.sizing(v, axis)?);
            }
        }

        if let Some(v) = props.get("r") {
            set(&mut style, "borderRadius", self.radius(v)?);
        }
        if let Some(v) = props.get("opacity") {
            set(&mut style, "opacity", self.opacity(v)?);
        }

        if let Some(PropValue::Str(cols)) = props.get("columns") {
            style.insert("gridTemplateColumns".into(), cols.clone());
        }

        // Scroll containers must be allowed to shrink.
        match props.get("scroll") {
            Some(PropValue::Bool(true)) => {
                classes.push("overflow-auto".into());
                if !props.contains("minWidth") {
                    style.insert("minWidth".into(), "0".into());
                }
                if !props.contains("minHeight") {
                    style.insert("minHeight".into(), "0".into());
                }
            }
            Some(PropValue::Str(s)) if s == "x" => {
                classes.push("overflow-x-auto".into());
                classes.push("overflow-y-hidden".into());
                if !props.contains("minWidth") {
                    style.insert("minWidth".into(), "0".into());
                }
            }
            Some(PropValue::Str(s)) if s == "y" => {
                classes.push("overflow-y-auto".into());
                classes.push("overflow-x-hidden".into());
                if !props.contains("minHeight") {
                    style.insert("minHeight".into(), "0".into());
                }
            }
            _ => {}
        }

        // Fixed geometry resists compression.
        match props.get("shrink") {
            Some(PropValue::Bool(true)) => {
                style.insert("flexShrink".into(), "1".into());
            }
            Some(PropValue::Bool(false)) => {
                style.insert("flexShrink".into(), "0".into());
            }
            Some(PropValue::Num(n)) => {
                style.insert("flexShrink".into(), fmt_num(*n));
            }
            _ => {
                let fixed_w = props.get("w").is_some_and(|v| self.is_fixed_dimension(v));
                let fixed_h = props.get("h").is_some_and(|v| self.is_fixed_dimension(v));
                if fixed_w || fixed_h {
                    style.insert("flexShrink".into(), "0".into());
                }
            }
        }

        Ok(ResolvedStyle { classes, style })
    }
}

/// JS-style truthiness for boolean-ish props. Expressions cannot be
/// evaluated and fail resolution.
fn flag(props: &PropBag, name: &str) -> Result<bool> {
    match props.get(name) {
        None => Ok(false),
        Some(PropValue::Bool(b)) => Ok(*b),
        Some(PropValue::Str(s)) => Ok(!s.is_empty()),
        Some(PropValue::Num(n)) => Ok(*n != 0.0),
        Some(v) => Err(unresolvable(name, &v.render())),
    }
}

fn unresolvable(what: &str, value: &str) -> LintError {
    LintError::simulation(format!("cannot evaluate {} value `{}`", what, value))
}

fn css_var(token: &str) -> String {
    format!("var(--{})", token.replacen('.', "-", 1))
}

fn fmt_px(n: f64) -> String {
    format!("{}px", fmt_num(n))
}

fn fmt_num(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

fn or(a: Option<String>, b: Option<String>) -> Option<String> {
    a.or(b)
}

fn set(style: &mut BTreeMap<String, String>, key: &str, value: Option<String>) {
    if let Some(v) = value {
        style.insert(key.to_string(), v);
    }
}

/// `Space.n16` -> 16. The token constants are plain pixel numbers.
fn space_token(expr: &str) -> Option<u32> {
    space_token_like(expr, "Space.n")
}

fn space_token_like(expr: &str, prefix: &str) -> Option<u32> {
    expr.strip_prefix(prefix)?.parse().ok()
}

/// Canonical string form of a sizing token member reference.
fn sizing_token(expr: &str) -> Option<String> {
    if let Some(n) = space_token_like(expr, "Size.n") {
        return Some(format!("{}px", n));
    }
    match expr {
        "Size.full" => Some("size.full".to_string()),
        "Size.screen" => Some("size.screen".to_string()),
        "Size.min" => Some("size.min".to_string()),
        "Size.max" => Some("size.max".to_string()),
        "Size.fit" => Some("size.fit".to_string()),
        "Size.auto" => Some("size.auto".to_string()),
        _ => None,
    }
}

/// Keyword form of a sizing value for the w-full/h-screen class checks.
fn sizing_keyword(v: &PropValue) -> Option<&'static str> {
    let s = match v {
        PropValue::Str(s) => s.as_str(),
        PropValue::Expr(e) => match e.as_str() {
            "Size.full" => "size.full",
            "Size.screen" => "size.screen",
            _ => return None,
        },
        _ => return None,
    };
    match s {
        "size.full" => Some("size.full"),
        "size.screen" => Some("size.screen"),
        _ => None,
    }
}

/// `Opacity.n50` -> 0.5.
fn opacity_token(expr: &str) -> Option<f64> {
    space_token_like(expr, "Opacity.n").map(|n| n as f64 / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(bag: &PropBag) -> ResolvedStyle {
        FrameStyleResolver::new().resolve(bag).unwrap()
    }

    fn bag(entries: &[(&str, PropValue)]) -> PropBag {
        let mut b = PropBag::new();
        for (k, v) in entries {
            b.insert(*k, v.clone());
        }
        b
    }

    #[test]
    fn defaults_to_flex_column() {
        let r = resolve(&PropBag::new());
        assert_eq!(r.classes, vec!["flex", "vbox"]);
        assert!(r.style.is_empty());
    }

    #[test]
    fn padding_with_axis_fallbacks() {
        let r = resolve(&bag(&[
            ("p", PropValue::Num(40.0)),
            ("px", PropValue::Num(16.0)),
            ("pt", PropValue::Num(8.0)),
        ]));
        assert_eq!(r.style.get("padding").unwrap(), "40px");
        assert_eq!(r.style.get("paddingLeft").unwrap(), "16px");
        assert_eq!(r.style.get("paddingRight").unwrap(), "16px");
        assert_eq!(r.style.get("paddingTop").unwrap(), "8px");
        assert!(!r.style.contains_key("paddingBottom"));
    }

    #[test]
    fn token_references_evaluate_to_pixels() {
        let r = resolve(&bag(&[("p", PropValue::Expr("Space.n16".into()))]));
        assert_eq!(r.style.get("padding").unwrap(), "16px");
    }

    #[test]
    fn zero_values_drop_their_entry() {
        let r = resolve(&bag(&[
            ("p", PropValue::Num(0.0)),
            ("gap", PropValue::Expr("Space.n0".into())),
        ]));
        assert!(r.style.is_empty());
    }

    #[test]
    fn sizing_tokens_and_classes() {
        let r = resolve(&bag(&[
            ("w", PropValue::Expr("Size.full".into())),
            ("h", PropValue::Expr("Size.screen".into())),
            ("maxWidth", PropValue::Num(480.0)),
        ]));
        assert!(r.has_class("w-full"));
        assert!(r.has_class("h-screen"));
        assert_eq!(r.style.get("width").unwrap(), "100%");
        assert_eq!(r.style.get("height").unwrap(), "100vh");
        assert_eq!(r.style.get("maxWidth").unwrap(), "480px");
    }

    #[test]
    fn surface_and_radius_classes() {
        let r = resolve(&bag(&[
            ("surface", PropValue::Str("panel".into())),
            ("rounded", PropValue::Bool(true)),
        ]));
        assert!(r.has_class("surface-panel"));
        assert!(r.has_class("r-md"));

        let r = resolve(&bag(&[
            ("rounded", PropValue::Bool(true)),
            ("r", PropValue::Num(8.0)),
        ]));
        assert!(!r.has_class_prefix("r-"));
        assert_eq!(r.style.get("borderRadius").unwrap(), "8px");
    }

    #[test]
    fn scroll_enables_shrink_safety() {
        let r = resolve(&bag(&[("scroll", PropValue::Bool(true))]));
        assert!(r.has_class("overflow-auto"));
        assert_eq!(r.style.get("minWidth").unwrap(), "0");
        assert_eq!(r.style.get("minHeight").unwrap(), "0");
    }

    #[test]
    fn fixed_geometry_resists_compression() {
        let r = resolve(&bag(&[("w", PropValue::Num(240.0))]));
        assert_eq!(r.style.get("flexShrink").unwrap(), "0");

        let r = resolve(&bag(&[("w", PropValue::Expr("Size.full".into()))]));
        assert!(!r.style.contains_key("flexShrink"));
    }

    #[test]
    fn unresolvable_expressions_fail() {
        let resolver = FrameStyleResolver::new();
        assert!(resolver
            .resolve(&bag(&[("p", PropValue::Expr("theme.pad".into()))]))
            .is_err());
        assert!(resolver
            .resolve(&bag(&[("align", PropValue::Expr("alignment".into()))]))
            .is_err());
        assert!(resolver
            .resolve(&bag(&[("row", PropValue::Expr("isRow".into()))]))
            .is_err());
    }

    #[test]
    fn unknown_props_are_ignored() {
        let r = resolve(&bag(&[
            ("onClick", PropValue::Expr("handleClick".into())),
            ("className", PropValue::Str("extra".into())),
        ]));
        assert_eq!(r.classes, vec!["flex", "vbox"]);
    }
}
