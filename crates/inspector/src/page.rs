use tracing::debug;

use domlens_core::config::PageConfig;
use domlens_dom::{compute_layout, ElementData, Layout, NodeId, PageDocument};

/// DOM id of the injected panel host container.
pub const PANEL_HOST_ID: &str = "domlens-panel";
/// DOM id of the floating handle that re-opens a collapsed panel.
pub const PANEL_TOGGLE_ID: &str = "domlens-toggle";

/// One inspected page: the parsed document, its URL, and the injected
/// panel chrome. Owned exclusively by the inspector context.
#[derive(Debug)]
pub struct Page {
    doc: PageDocument,
    url: String,
    viewport_width: f64,
    panel_width: f64,
    panel_open: bool,
}

impl Page {
    pub fn new(doc: PageDocument, url: &str, config: &PageConfig) -> Self {
        Self {
            doc,
            url: url.to_string(),
            viewport_width: config.viewport_width,
            panel_width: config.panel_width,
            panel_open: false,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn document(&self) -> &PageDocument {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut PageDocument {
        &mut self.doc
    }

    /// Geometry for the current document state.
    pub fn layout(&self) -> Layout {
        compute_layout(&self.doc, self.viewport_width)
    }

    pub fn panel_mounted(&self) -> bool {
        self.doc.element_by_id(PANEL_HOST_ID).is_some()
    }

    pub fn panel_open(&self) -> bool {
        self.panel_open
    }

    /// Injects the panel host and its toggle handle into `<body>`.
    /// A second mount is a no-op, not an error.
    pub fn mount_panel(&mut self) {
        if self.panel_mounted() {
            debug!("panel host already present, skipping mount");
            return;
        }
        let Some(body) = self.doc.body() else {
            debug!("document has no body, skipping panel mount");
            return;
        };

        let mut host = ElementData::new("aside");
        host.attrs.push(("id".to_string(), PANEL_HOST_ID.to_string()));
        host.set_style_prop("position", "fixed");
        host.set_style_prop("top", "0");
        host.set_style_prop("right", &format!("-{}px", self.panel_width));
        host.set_style_prop("width", &format!("{}px", self.panel_width));
        host.set_style_prop("height", "100vh");
        host.set_style_prop("background-color", "white");
        host.set_style_prop("z-index", "2147483647");
        let host = self.doc.create_element(host);
        self.doc.append_child(body, host);

        let mut toggle = ElementData::new("button");
        toggle
            .attrs
            .push(("id".to_string(), PANEL_TOGGLE_ID.to_string()));
        toggle.set_style_prop("position", "fixed");
        toggle.set_style_prop("top", "50%");
        toggle.set_style_prop("right", "0");
        toggle.set_style_prop("z-index", "2147483648");
        toggle.set_style_prop("display", "block");
        let toggle = self.doc.create_element(toggle);
        self.doc.append_child(body, toggle);
    }

    /// Slides the panel host in or out and shows/hides the toggle handle.
    pub fn set_panel_open(&mut self, open: bool) {
        let right = if open {
            "0".to_string()
        } else {
            format!("-{}px", self.panel_width)
        };
        if let Some(host) = self.doc.element_by_id(PANEL_HOST_ID) {
            if let Some(data) = self.doc.element_mut(host) {
                data.set_style_prop("right", &right);
            }
        }
        if let Some(toggle) = self.doc.element_by_id(PANEL_TOGGLE_ID) {
            if let Some(data) = self.doc.element_mut(toggle) {
                data.set_style_prop("display", if open { "none" } else { "block" });
            }
        }
        self.panel_open = open;
    }

    pub fn toggle_panel(&mut self) {
        self.set_panel_open(!self.panel_open);
    }

    /// Whether `id` is the panel host itself or lives inside it.
    pub fn is_panel_element(&self, id: NodeId) -> bool {
        self.doc.is_or_within_id(id, PANEL_HOST_ID)
    }
}
