//! Static style simulation
//!
//! Replays the runtime's three merge layers for one element without
//! rendering anything: preset props, then explicit props, then `override`
//! entries, resolved through a `StyleResolver`, with preset and inline
//! `style` records layered onto the result. The output is a
//! `ComputedStyleSnapshot` of coarse visual flags for the rule engine.
//!
//! When resolution fails (a prop value only known at runtime), the
//! simulator degrades to prop-presence flags instead of aborting the file.

use crate::presets;
use crate::resolver::StyleResolver;
use crate::tokens::PADDING_PROPS;
use crate::types::{ComputedStyleSnapshot, PropBag, PropValue, ResolvedStyle};

/// Simulates the computed style of one element from its flattened props.
pub fn simulate(props: &PropBag, resolver: &dyn StyleResolver) -> ComputedStyleSnapshot {
    let layers = merge_layers(props);
    let inline = inline_style_record(props);

    if layers.opaque_override {
        log::warn!("override value is not an object literal, falling back to prop presence");
        return degraded_snapshot(&layers, &inline);
    }

    match resolver.resolve(&layers.merged) {
        Ok(mut resolved) => {
            for (key, value) in layers.preset_style.iter().chain(inline.iter()) {
                resolved.style.insert(key.clone(), value.clone());
            }
            snapshot(&layers.merged, resolved, false)
        }
        Err(err) => {
            log::warn!("style simulation failed ({}), falling back to prop presence", err);
            degraded_snapshot(&layers, &inline)
        }
    }
}

struct Layers {
    /// preset < explicit < override, with `layout`/`style`/`override`
    /// themselves consumed.
    merged: PropBag,
    preset_style: Vec<(String, String)>,
    /// `override` was present but not an object literal.
    opaque_override: bool,
}

fn merge_layers(props: &PropBag) -> Layers {
    let mut merged = PropBag::new();
    let mut preset_style = Vec::new();

    if let Some(reference) = props.get("layout") {
        let text = match reference {
            PropValue::Str(s) => Some(s.as_str()),
            PropValue::Expr(e) => Some(e.as_str()),
            _ => None,
        };
        match text.and_then(presets::resolve_layout) {
            Some(preset) => {
                merged.overlay(&preset.props);
                preset_style = preset.style;
            }
            None => {
                log::debug!("unknown layout reference `{}`, ignoring", reference.render());
            }
        }
    }

    for (name, value) in props.iter() {
        if matches!(name.as_str(), "layout" | "style" | "override") {
            continue;
        }
        merged.insert(name.clone(), value.clone());
    }

    let mut opaque_override = false;
    if let Some(value) = props.get("override") {
        match value.as_object() {
            Some(entries) => {
                for (name, entry) in entries {
                    merged.insert(name.clone(), entry.clone());
                }
            }
            None => opaque_override = true,
        }
    }

    Layers { merged, preset_style, opaque_override }
}

fn inline_style_record(props: &PropBag) -> Vec<(String, String)> {
    match props.get("style").and_then(|v| v.as_object()) {
        Some(entries) => entries
            .iter()
            .map(|(name, value)| (name.clone(), value.as_css_text()))
            .collect(),
        None => Vec::new(),
    }
}

fn snapshot(merged: &PropBag, resolved: ResolvedStyle, degraded: bool) -> ComputedStyleSnapshot {
    let has_padding = merged.contains_any(PADDING_PROPS) || resolved.has_style_prefix("padding");
    let has_background = merged.contains("surface")
        || resolved.has_class_prefix("surface-")
        || resolved.has_style_key("background")
        || resolved.has_style_key("backgroundColor");
    let has_border = merged.contains("border") || has_border_style(&resolved);
    let has_radius = merged.contains_any(&["rounded", "r"])
        || resolved.has_class_prefix("r-")
        || resolved.has_style_key("borderRadius");
    // Degraded runs cannot tell floating from constrained, so they never
    // claim floating.
    let is_floating = !degraded
        && (resolved.has_style_key("maxWidth") || resolved.has_style_prefix("margin"))
        && !merged.contains("fill");

    ComputedStyleSnapshot {
        has_background,
        has_padding,
        has_border,
        has_radius,
        is_floating,
        resolved,
        degraded,
    }
}

fn degraded_snapshot(layers: &Layers, inline: &[(String, String)]) -> ComputedStyleSnapshot {
    let mut resolved = ResolvedStyle::default();
    for (key, value) in layers.preset_style.iter().chain(inline.iter()) {
        resolved.style.insert(key.clone(), value.clone());
    }
    snapshot(&layers.merged, resolved, true)
}

fn has_border_style(resolved: &ResolvedStyle) -> bool {
    resolved
        .style
        .keys()
        .any(|k| k.starts_with("border") && k != "borderRadius")
}
