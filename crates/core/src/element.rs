use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fixed set of computed-style fields captured with every element snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleSnapshot {
    pub background_color: String,
    pub color: String,
    pub font_size: String,
    pub display: String,
    pub position: String,
}

impl Default for StyleSnapshot {
    fn default() -> Self {
        Self {
            background_color: "rgba(0, 0, 0, 0)".to_string(),
            color: "rgb(0, 0, 0)".to_string(),
            font_size: "16px".to_string(),
            display: "block".to_string(),
            position: "static".to_string(),
        }
    }
}

/// Element geometry at capture time. Mirrors the DOMRect JSON shape;
/// never updated after the snapshot is taken.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct BoundingRect {
    pub x: f64,
    pub y: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            top: y,
            right: x + width,
            bottom: y + height,
            left: x,
            width,
            height,
        }
    }
}

/// Serialized structure of a single DOM element, including its full
/// recursive subtree. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementInfo {
    pub tag_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub classes: Vec<String>,
    /// Every attribute except the `data-` prefixed ones.
    pub attributes: BTreeMap<String, String>,
    /// Only the `data-` prefixed attributes.
    pub data_attributes: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inner_text: Option<String>,
    #[serde(rename = "innerHTML")]
    pub inner_html: String,
    pub styles: StyleSnapshot,
    pub children: Vec<ElementInfo>,
    pub rect: BoundingRect,
}

impl ElementInfo {
    /// Total number of elements in this subtree, the root included.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(ElementInfo::subtree_len).sum::<usize>()
    }
}

/// A captured selection: the clicked element plus its immediate parent.
/// The parent is serialized recursively too, so the selected subtree
/// appears a second time inside `parent.children`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionSnapshot {
    pub element: ElementInfo,
    pub parent: Option<ElementInfo>,
}
