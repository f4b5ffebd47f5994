use domlens_core::StyleSnapshot;

use crate::document::{ElementData, NodeId, PageDocument};

/// Tags rendered inline by the UA stylesheet.
const INLINE_TAGS: &[&str] = &[
    "a", "span", "b", "i", "u", "em", "strong", "code", "small", "label", "img", "button",
    "input", "sub", "sup",
];

/// Tags that generate no box at all.
const HIDDEN_TAGS: &[&str] = &["head", "meta", "link", "title", "script", "style", "noscript"];

pub fn default_display(tag: &str) -> &'static str {
    if HIDDEN_TAGS.contains(&tag) {
        "none"
    } else if INLINE_TAGS.contains(&tag) {
        "inline"
    } else {
        "block"
    }
}

/// Parses a `style` attribute into declarations. Last declaration of a
/// property wins, matching the cascade within a single attribute.
pub fn parse_style_attr(raw: &str) -> Vec<(String, String)> {
    let mut out: Vec<(String, String)> = Vec::new();
    for decl in raw.split(';') {
        let Some((name, value)) = decl.split_once(':') else {
            continue;
        };
        let name = name.trim().to_ascii_lowercase();
        let value = value.trim().to_string();
        if name.is_empty() {
            continue;
        }
        if let Some(entry) = out.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = value;
        } else {
            out.push((name, value));
        }
    }
    out
}

/// Computed-style snapshot for one element: UA defaults overridden by the
/// element's live inline declarations. Evaluated at snapshot time, so
/// runtime style mutations (highlight paint included) are visible.
pub fn computed_style(doc: &PageDocument, id: NodeId) -> StyleSnapshot {
    let defaults = StyleSnapshot::default();
    let Some(data) = doc.element(id) else {
        return defaults;
    };
    StyleSnapshot {
        background_color: background_of(data).unwrap_or(defaults.background_color),
        color: data
            .style_prop("color")
            .map(str::to_string)
            .unwrap_or(defaults.color),
        font_size: data
            .style_prop("font-size")
            .map(str::to_string)
            .unwrap_or(defaults.font_size),
        display: data
            .style_prop("display")
            .unwrap_or(default_display(&data.tag))
            .to_string(),
        position: data
            .style_prop("position")
            .map(str::to_string)
            .unwrap_or(defaults.position),
    }
}

fn background_of(data: &ElementData) -> Option<String> {
    data.style_prop("background-color")
        .or_else(|| data.style_prop("background"))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_style_attr() {
        let decls = parse_style_attr("color: red; font-size: 12px;");
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0], ("color".to_string(), "red".to_string()));
    }

    #[test]
    fn test_parse_style_attr_last_wins() {
        let decls = parse_style_attr("color: red; color: blue");
        assert_eq!(decls, vec![("color".to_string(), "blue".to_string())]);
    }

    #[test]
    fn test_default_display() {
        assert_eq!(default_display("div"), "block");
        assert_eq!(default_display("span"), "inline");
        assert_eq!(default_display("script"), "none");
    }

    #[test]
    fn test_computed_style_override() {
        let mut doc = PageDocument::default();
        let mut data = ElementData::new("div");
        data.style = parse_style_attr("color: rgb(10, 20, 30); position: fixed");
        let id = doc.create_element(data);

        let styles = computed_style(&doc, id);
        assert_eq!(styles.color, "rgb(10, 20, 30)");
        assert_eq!(styles.position, "fixed");
        assert_eq!(styles.display, "block");
        assert_eq!(styles.font_size, "16px");
    }
}
