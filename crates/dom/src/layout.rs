use domlens_core::BoundingRect;

use crate::document::{NodeId, NodeKind, PageDocument};
use crate::style::default_display;

/// Fixed text metrics for the synthetic layout pass.
const LINE_HEIGHT: f64 = 18.0;
const CHAR_WIDTH: f64 = 8.0;

/// Per-node geometry produced by [`compute_layout`]. Rects are only valid
/// for the document state they were computed against; capture re-runs the
/// pass so snapshots see click-time geometry.
#[derive(Debug, Clone)]
pub struct Layout {
    rects: Vec<BoundingRect>,
}

impl Layout {
    pub fn rect(&self, id: NodeId) -> BoundingRect {
        self.rects.get(id.0).copied().unwrap_or_default()
    }
}

/// Deterministic block/inline flow against a fixed viewport width: block
/// boxes span the available width and stack vertically, inline boxes sit
/// on shared rows and advance by text width. No wrapping, margins or
/// nested formatting contexts, just stable geometry.
pub fn compute_layout(doc: &PageDocument, viewport_width: f64) -> Layout {
    let mut layout = Layout {
        rects: vec![BoundingRect::default(); doc.len()],
    };
    if let Some(root) = doc.root() {
        layout_element(doc, root, 0.0, 0.0, viewport_width, &mut layout);
    }
    layout
}

fn display_of(doc: &PageDocument, id: NodeId) -> String {
    match doc.element(id) {
        Some(data) => data
            .style_prop("display")
            .unwrap_or(default_display(&data.tag))
            .to_string(),
        None => "inline".to_string(),
    }
}

/// Lays out one element, returning its `(width, height)`.
fn layout_element(
    doc: &PageDocument,
    id: NodeId,
    x: f64,
    y: f64,
    avail: f64,
    layout: &mut Layout,
) -> (f64, f64) {
    let display = display_of(doc, id);
    if display == "none" {
        layout.rects[id.0] = BoundingRect::default();
        return (0.0, 0.0);
    }
    if display.starts_with("inline") {
        return layout_inline(doc, id, x, y, avail, layout);
    }
    layout_block(doc, id, x, y, avail, layout)
}

fn layout_inline(
    doc: &PageDocument,
    id: NodeId,
    x: f64,
    y: f64,
    avail: f64,
    layout: &mut Layout,
) -> (f64, f64) {
    let mut cursor_x = x;
    for &child in doc.children(id) {
        match &doc.node(child).map(|n| &n.kind) {
            Some(NodeKind::Text(t)) => cursor_x += text_width(t),
            Some(NodeKind::Element(_)) => {
                let (w, _) = layout_element(doc, child, cursor_x, y, avail, layout);
                cursor_x += w;
            }
            None => {}
        }
    }
    let width = cursor_x - x;
    let height = if width > 0.0 { LINE_HEIGHT } else { 0.0 };
    layout.rects[id.0] = BoundingRect::new(x, y, width, height);
    (width, height)
}

fn layout_block(
    doc: &PageDocument,
    id: NodeId,
    x: f64,
    y: f64,
    avail: f64,
    layout: &mut Layout,
) -> (f64, f64) {
    let mut cursor_y = y;
    let mut inline_x = x;
    let mut in_row = false;

    for &child in doc.children(id) {
        match &doc.node(child).map(|n| &n.kind) {
            Some(NodeKind::Text(t)) => {
                let w = text_width(t);
                if w > 0.0 {
                    inline_x += w;
                    in_row = true;
                }
            }
            Some(NodeKind::Element(_)) => {
                let display = display_of(doc, child);
                if display == "none" {
                    layout_element(doc, child, 0.0, 0.0, avail, layout);
                } else if display.starts_with("inline") {
                    let (w, _) = layout_element(doc, child, inline_x, cursor_y, avail, layout);
                    inline_x += w;
                    in_row = true;
                } else {
                    if in_row {
                        cursor_y += LINE_HEIGHT;
                        inline_x = x;
                        in_row = false;
                    }
                    let (_, h) = layout_element(doc, child, x, cursor_y, avail, layout);
                    cursor_y += h;
                }
            }
            None => {}
        }
    }
    if in_row {
        cursor_y += LINE_HEIGHT;
    }

    let height = cursor_y - y;
    layout.rects[id.0] = BoundingRect::new(x, y, avail, height);
    (avail, height)
}

fn text_width(text: &str) -> f64 {
    let collapsed: usize = text.split_whitespace().map(str::len).sum();
    collapsed as f64 * CHAR_WIDTH
}
