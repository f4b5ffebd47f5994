use domlens_core::ElementInfo;

use crate::state::PanelState;

const NA: &str = "N/A";

/// Renders the panel as text lines: header, toggle control, then two
/// detail blocks (selected element, parent) each followed by an
/// expandable subtree keyed by structural paths.
pub fn render(state: &PanelState) -> Vec<String> {
    let mut out = Vec::new();
    out.push("DomLens".to_string());

    let label = if state.is_highlighting {
        "Selecting..."
    } else {
        "Enable Highlight Selector"
    };
    out.push(format!("[ {} ]", label));
    out.push(String::new());

    let Some(selection) = &state.selection else {
        out.push("No element selected.".to_string());
        return out;
    };

    out.push("Selected Elements".to_string());
    render_details(&selection.element, "Selected Element", "element", state, &mut out);
    if let Some(parent) = &selection.parent {
        render_details(parent, "Parent Element", "parent", state, &mut out);
    }
    out
}

fn render_details(
    info: &ElementInfo,
    title: &str,
    path: &str,
    state: &PanelState,
    out: &mut Vec<String>,
) {
    out.push(format!("--- {} ---", title));
    out.push(format!("Tag Name:   {}", or_na(Some(&info.tag_name))));
    out.push(format!("ID:         {}", or_na(info.id.as_deref())));
    out.push(format!("Href:       {}", or_na(info.href.as_deref())));
    out.push(format!("Inner Text: {}", or_na(info.text_content.as_deref())));
    if info.data_attributes.is_empty() {
        out.push(format!("Data Attributes: {}", NA));
    } else {
        out.push("Data Attributes:".to_string());
        for (key, value) in &info.data_attributes {
            out.push(format!("  {}: {}", key, value));
        }
    }
    render_tree(info, path, 0, state, out);
    out.push(String::new());
}

fn render_tree(
    info: &ElementInfo,
    path: &str,
    depth: usize,
    state: &PanelState,
    out: &mut Vec<String>,
) {
    let marker = if info.children.is_empty() {
        ' '
    } else if state.is_expanded(path) {
        'v'
    } else {
        '>'
    };
    let id_part = info
        .id
        .as_deref()
        .map(|id| format!(" #{}", id))
        .unwrap_or_default();
    out.push(format!("{}{} {}{}", "  ".repeat(depth), marker, info.tag_name, id_part));

    if !state.is_expanded(path) {
        return;
    }
    let indent = "  ".repeat(depth + 1);
    if let Some(id) = &info.id {
        out.push(format!("{}id=\"{}\"", indent, id));
    }
    if let Some(href) = &info.href {
        out.push(format!("{}href=\"{}\"", indent, href));
    }
    for (key, value) in &info.data_attributes {
        out.push(format!("{}{}=\"{}\"", indent, key, value));
    }
    for (index, child) in info.children.iter().enumerate() {
        let child_path = format!("{}.{}", path, index);
        render_tree(child, &child_path, depth + 1, state, out);
    }
}

fn or_na(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => NA,
    }
}
