use std::collections::BTreeMap;

use domlens_core::{ElementInfo, SelectionSnapshot};

use crate::document::{NodeId, PageDocument};
use crate::layout::Layout;
use crate::style::computed_style;

/// Serializes one element and its entire subtree. Synchronous and total
/// for any valid element id; recursion terminates because the tree does.
pub fn snapshot_element(doc: &PageDocument, id: NodeId, layout: &Layout) -> ElementInfo {
    let data = doc
        .element(id)
        .expect("snapshot_element called on a non-element node");

    let mut attributes = BTreeMap::new();
    let mut data_attributes = BTreeMap::new();
    for (name, value) in &data.attrs {
        if name.starts_with("data-") {
            data_attributes.insert(name.clone(), value.clone());
        } else {
            attributes.insert(name.clone(), value.clone());
        }
    }

    let children = doc
        .child_elements(id)
        .into_iter()
        .map(|child| snapshot_element(doc, child, layout))
        .collect();

    ElementInfo {
        tag_name: data.tag.clone(),
        id: data.id().map(str::to_string),
        classes: data.class_list().iter().map(|c| c.to_string()).collect(),
        attributes,
        data_attributes,
        href: non_empty(data.attr("href")),
        src: non_empty(data.attr("src")),
        text_content: non_empty(Some(doc.text_content(id).trim())),
        inner_text: non_empty(Some(doc.inner_text(id).trim())),
        inner_html: doc.inner_html(id),
        styles: computed_style(doc, id),
        children,
        rect: layout.rect(id),
    }
}

/// The clicked element plus its immediate parent, each serialized in full.
/// The parent's subtree necessarily duplicates the selected element.
pub fn snapshot_selection(doc: &PageDocument, id: NodeId, layout: &Layout) -> SelectionSnapshot {
    SelectionSnapshot {
        element: snapshot_element(doc, id, layout),
        parent: doc
            .parent_element(id)
            .map(|parent| snapshot_element(doc, parent, layout)),
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}
