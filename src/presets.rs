//! Layout preset resolution
//!
//! Mirrors the design system's preset catalogue: a `layout` prop referencing
//! a preset resolves to the prop set that preset stands for. Unknown
//! references resolve to nothing and are silently ignored by the simulator.

use crate::types::{PropBag, PropValue};

/// Prop set contributed by a layout preset, plus any raw style entries the
/// preset pins (sticky positioning).
#[derive(Debug, Clone, Default)]
pub struct PresetProps {
    pub props: PropBag,
    pub style: Vec<(String, String)>,
}

/// Resolves a `layout` reference. Accepts both the member path written in
/// source (`Layout.Row.Header.Default`) and the underlying token string
/// (`"row.header"`).
pub fn resolve_layout(reference: &str) -> Option<PresetProps> {
    let token = token_of(reference)?;
    preset_for(token)
}

fn token_of(reference: &str) -> Option<&str> {
    match reference.strip_prefix("Layout.") {
        Some(path) => Some(match path {
            "Stack.Section.Default" => "stack.section",
            "Stack.Section.Tight" => "stack.section.tight",
            "Stack.Content.Default" => "stack.content",
            "Stack.Content.Tight" => "stack.content.tight",
            "Stack.Content.Loose" => "stack.content.loose",
            "Stack.Content.None" => "stack.content.none",
            "Stack.Content.Scroll" => "stack.content.scroll",
            "Stack.List.Default" => "stack.list",
            "Stack.List.Dense" => "stack.list.dense",
            "Stack.Form.Default" => "stack.form",
            "Stack.Form.Center" => "stack.form.center",
            "Row.Header.Default" => "row.header",
            "Row.Header.Sticky" => "row.header.sticky",
            "Row.Toolbar.Default" => "row.toolbar",
            "Row.Toolbar.Compact" => "row.toolbar.compact",
            "Row.Toolbar.Sticky" => "row.toolbar.sticky",
            "Row.Item.Default" => "row.item",
            "Row.Item.Tight" => "row.item.tight",
            "Row.Item.Compact" => "row.item.compact",
            "Row.LabelValue.Default" => "row.labelvalue",
            "Row.Meta.Default" => "row.meta",
            "Row.Actions.Default" => "row.actions",
            "Row.Actions.Between" => "row.actions.between",
            "Row.Actions.Center" => "row.actions.center",
            "Row.AppContainer.Default" => "row.appcontainer",
            "Wrap.Chips.Default" => "wrap.chips",
            "Wrap.Chips.Loose" => "wrap.chips.loose",
            "Wrap.Filters.Default" => "wrap.filters",
            "Wrap.Actions.Default" => "wrap.actions",
            "Grid.Cards.Default" => "grid.cards",
            "Grid.Cards.Compact" => "grid.cards.compact",
            "Grid.Cards.Scroll" => "grid.cards.scroll",
            "Grid.Gallery.Default" => "grid.gallery",
            "Grid.Dashboard.Default" => "grid.dashboard",
            "Slots.Media.Default" => "slots.media",
            "Slots.Media.Tight" => "slots.media.tight",
            "Slots.KeyValue.Default" => "slots.keyvalue",
            "Center.Default" => "center",
            "Center.Padded" => "center.padded",
            _ => return None,
        }),
        // Already a token string; validity is checked by preset_for.
        None => Some(reference),
    }
}

fn preset_for(token: &str) -> Option<PresetProps> {
    let p = Preset::new();
    let preset = match token {
        "stack.section" => p.align("start").gap(16).pad(40),
        "stack.section.tight" => p.align("start").gap(12).pad(24),
        "stack.content" => p.align("start").gap(12),
        "stack.content.tight" => p.align("start").gap(8),
        "stack.content.loose" => p.align("start").gap(16),
        "stack.content.none" => p.align("start").gap(0),
        "stack.content.scroll" => p.align("start").gap(12).scroll().min_h(0),
        "stack.list" => p.align("start").gap(8),
        "stack.list.dense" => p.align("start").gap(4),
        "stack.form" => p.align("start").gap(20),
        "stack.form.center" => p.align("center").gap(16),
        "row.header" => p.row().align("center").justify("between").gap(12).px(16).h(44).clip(),
        "row.header.sticky" => p.row().align("center").gap(12).h(44).clip().sticky(),
        "row.toolbar" => p.row().align("center").justify("between").gap(12).h(40).clip(),
        "row.toolbar.compact" => p.row().align("center").justify("between").gap(8).h(36).clip(),
        "row.toolbar.sticky" => {
            p.row().align("center").justify("between").gap(12).h(44).clip().sticky()
        }
        "row.item" => p.row().align("center").justify("start").gap(12),
        "row.item.tight" => p.row().align("center").justify("start").gap(8),
        "row.item.compact" => p.row().align("center").justify("start").gap(4),
        "row.labelvalue" => p.row().align("center").justify("between").gap(12),
        "row.meta" => p.row().align("baseline").justify("start").gap(8).clip(),
        "row.actions" => p.row().align("center").justify("end").gap(8),
        "row.actions.between" => p.row().align("center").justify("between").gap(8),
        "row.actions.center" => p.row().align("center").justify("center").gap(8),
        "row.appcontainer" => p.row().align("stretch").gap(0).max_w("100%"),
        "wrap.chips" => p.row().wrap().align("center").justify("start").gap(8),
        "wrap.chips.loose" => p.row().wrap().align("center").justify("start").gap(12),
        "wrap.filters" => p.row().wrap().align("center").justify("start").gap(12),
        "wrap.actions" => p.row().wrap().align("center").justify("end").gap(8),
        "grid.cards" => p.grid().align("start").gap(12).columns(COLUMNS_240),
        "grid.cards.compact" => p.grid().align("start").gap(8).columns(COLUMNS_192),
        "grid.cards.scroll" => p.grid().align("start").gap(12).scroll().min_h(0).columns(COLUMNS_240),
        "grid.gallery" => p.grid().align("start").gap(8).columns(COLUMNS_128),
        "grid.dashboard" => p.grid().align("start").gap(12).columns(COLUMNS_240),
        "slots.media" => p.row().align("start").justify("start").gap(12),
        "slots.media.tight" => p.row().align("start").justify("start").gap(8),
        "slots.keyvalue" => p.grid().align("start").gap(8).columns("var(--kv-key-w, auto) 1fr"),
        "center" => p.align("center").justify("center").gap(12),
        "center.padded" => p.align("center").justify("center").gap(12).pad(24),
        _ => return None,
    };
    Some(preset.done())
}

const COLUMNS_240: &str = "repeat(auto-fit, minmax(var(--size-n240, 240px), 1fr))";
const COLUMNS_192: &str = "repeat(auto-fit, minmax(var(--size-n192, 192px), 1fr))";
const COLUMNS_128: &str = "repeat(auto-fit, minmax(var(--size-n128, 128px), 1fr))";

struct Preset(PresetProps);

impl Preset {
    fn new() -> Self {
        Self(PresetProps::default())
    }

    fn flag(mut self, name: &str) -> Self {
        self.0.props.insert(name, PropValue::Bool(true));
        self
    }

    fn str_prop(mut self, name: &str, value: &str) -> Self {
        self.0.props.insert(name, PropValue::Str(value.to_string()));
        self
    }

    fn num_prop(mut self, name: &str, value: u32) -> Self {
        self.0.props.insert(name, PropValue::Num(value as f64));
        self
    }

    fn row(self) -> Self {
        self.flag("row")
    }

    fn grid(self) -> Self {
        self.flag("grid")
    }

    fn wrap(self) -> Self {
        self.str_prop("wrap", "wrap")
    }

    fn clip(self) -> Self {
        self.flag("clip")
    }

    fn scroll(self) -> Self {
        self.flag("scroll")
    }

    fn align(self, v: &str) -> Self {
        self.str_prop("align", v)
    }

    fn justify(self, v: &str) -> Self {
        self.str_prop("justify", v)
    }

    fn gap(self, px: u32) -> Self {
        self.num_prop("gap", px)
    }

    fn pad(self, px: u32) -> Self {
        self.num_prop("p", px)
    }

    fn px(self, px: u32) -> Self {
        self.num_prop("px", px)
    }

    fn h(self, px: u32) -> Self {
        self.num_prop("h", px)
    }

    fn min_h(self, px: u32) -> Self {
        self.num_prop("minHeight", px)
    }

    fn max_w(self, v: &str) -> Self {
        self.str_prop("maxWidth", v)
    }

    fn columns(self, v: &str) -> Self {
        self.str_prop("columns", v)
    }

    fn sticky(mut self) -> Self {
        self.0.style.push(("position".to_string(), "sticky".to_string()));
        self.0.style.push(("top".to_string(), "0".to_string()));
        self.0.style.push(("zIndex".to_string(), "10".to_string()));
        self
    }

    fn done(self) -> PresetProps {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_member_paths_and_token_strings() {
        let by_path = resolve_layout("Layout.Row.Header.Default").unwrap();
        let by_token = resolve_layout("row.header").unwrap();
        for props in [&by_path, &by_token] {
            assert_eq!(props.props.get("row"), Some(&PropValue::Bool(true)));
            assert_eq!(props.props.get("px"), Some(&PropValue::Num(16.0)));
            assert_eq!(props.props.get("h"), Some(&PropValue::Num(44.0)));
            assert_eq!(props.props.get("clip"), Some(&PropValue::Bool(true)));
        }
    }

    #[test]
    fn section_preset_carries_padding() {
        let props = resolve_layout("Layout.Stack.Section.Default").unwrap();
        assert_eq!(props.props.get("p"), Some(&PropValue::Num(40.0)));
        assert_eq!(props.props.get("gap"), Some(&PropValue::Num(16.0)));
    }

    #[test]
    fn sticky_presets_pin_position() {
        let props = resolve_layout("Layout.Row.Toolbar.Sticky").unwrap();
        assert!(props
            .style
            .iter()
            .any(|(k, v)| k == "position" && v == "sticky"));
    }

    #[test]
    fn unknown_references_resolve_to_nothing() {
        assert!(resolve_layout("Layout.Stack.Unknown.Default").is_none());
        assert!(resolve_layout("stack.unknown").is_none());
        assert!(resolve_layout("someVariable").is_none());
    }

    #[test]
    fn every_cataloged_path_resolves() {
        for path in [
            "Layout.Stack.Section.Default",
            "Layout.Stack.Content.Scroll",
            "Layout.Row.Header.Sticky",
            "Layout.Row.AppContainer.Default",
            "Layout.Wrap.Chips.Loose",
            "Layout.Grid.Cards.Compact",
            "Layout.Slots.KeyValue.Default",
            "Layout.Center.Padded",
        ] {
            assert!(resolve_layout(path).is_some(), "{path} failed to resolve");
        }
    }
}
