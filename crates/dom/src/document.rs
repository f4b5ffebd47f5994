use std::fmt;

/// Index of a node in a [`PageDocument`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone)]
pub struct ElementData {
    /// Lower-cased tag name.
    pub tag: String,
    /// Attributes as parsed, in document order.
    pub attrs: Vec<(String, String)>,
    /// Live inline style declarations. Seeded from the `style` attribute;
    /// mutated at runtime by highlight paint. An empty value means the
    /// property is unset.
    pub style: Vec<(String, String)>,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
            style: Vec::new(),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// The `id` attribute, `None` when absent or empty.
    pub fn id(&self) -> Option<&str> {
        self.attr("id").filter(|v| !v.is_empty())
    }

    /// Class names in class-list order.
    pub fn class_list(&self) -> Vec<&str> {
        self.attr("class")
            .map(|c| c.split_whitespace().collect())
            .unwrap_or_default()
    }

    pub fn style_prop(&self, name: &str) -> Option<&str> {
        self.style
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    }

    /// Sets an inline style property, replacing any previous declaration.
    /// Setting the empty string clears the property (destructive: the
    /// previous value is not recoverable).
    pub fn set_style_prop(&mut self, name: &str, value: &str) {
        if let Some(entry) = self.style.iter_mut().find(|(n, _)| n == name) {
            entry.1 = value.to_string();
        } else {
            self.style.push((name.to_string(), value.to_string()));
        }
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// An owned DOM tree. Parsed once from HTML and owned by a single context;
/// nodes are addressed by arena index so the tree is `Send` and cheap to
/// traverse without borrow gymnastics.
#[derive(Debug, Clone, Default)]
pub struct PageDocument {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl PageDocument {
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match self.node(id)?.kind {
            NodeKind::Element(ref data) => Some(data),
            NodeKind::Text(_) => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match self.nodes.get_mut(id.0)?.kind {
            NodeKind::Element(ref mut data) => Some(data),
            NodeKind::Text(_) => None,
        }
    }

    pub fn create_element(&mut self, data: ElementData) -> NodeId {
        self.push_node(NodeKind::Element(data))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push_node(NodeKind::Text(text.to_string()))
    }

    fn push_node(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: None,
            children: Vec::new(),
        });
        if self.root.is_none() {
            self.root = Some(id);
        }
        id
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].children.retain(|&c| c != child);
        self.nodes[child.0].parent = None;
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    /// The nearest ancestor that is an element. Parents are always elements
    /// in practice (text nodes have no children), so this is one hop.
    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        let mut cur = self.parent(id);
        while let Some(p) = cur {
            if self.element(p).is_some() {
                return Some(p);
            }
            cur = self.parent(p);
        }
        None
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn child_elements(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|&c| self.element(c).is_some())
            .collect()
    }

    /// Depth-first pre-order walk over element nodes, starting at `from`.
    pub fn descendant_elements(&self, from: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            if self.element(id).is_some() {
                out.push(id);
            }
            for &child in self.children(id).iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    /// First element (in document order) whose `id` attribute equals `value`.
    pub fn element_by_id(&self, value: &str) -> Option<NodeId> {
        let root = self.root?;
        self.descendant_elements(root)
            .into_iter()
            .find(|&id| self.element(id).and_then(ElementData::id) == Some(value))
    }

    /// Whether `id` is the node with DOM id `dom_id` or a descendant of it.
    /// The `closest('#…')` check used to keep panel chrome out of capture.
    pub fn is_or_within_id(&self, id: NodeId, dom_id: &str) -> bool {
        let mut cur = Some(id);
        while let Some(n) = cur {
            if self.element(n).and_then(ElementData::id) == Some(dom_id) {
                return true;
            }
            cur = self.parent(n);
        }
        false
    }

    pub fn body(&self) -> Option<NodeId> {
        let root = self.root?;
        self.descendant_elements(root)
            .into_iter()
            .find(|&id| self.element(id).map(|e| e.tag == "body").unwrap_or(false))
    }

    /// Concatenated text of every descendant text node, untrimmed.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match &self.nodes[id.0].kind {
            NodeKind::Text(t) => out.push_str(t),
            NodeKind::Element(_) => {
                for &child in self.children(id) {
                    self.collect_text(child, out);
                }
            }
        }
    }

    /// Rendered-text approximation: descendant text with whitespace runs
    /// collapsed to single spaces.
    pub fn inner_text(&self, id: NodeId) -> String {
        self.text_content(id)
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Markup of the node's children, in document order.
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(id) {
            self.write_html(child, &mut out);
        }
        out
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        match &self.nodes[id.0].kind {
            NodeKind::Text(t) => out.push_str(t),
            NodeKind::Element(data) => {
                out.push('<');
                out.push_str(&data.tag);
                for (name, value) in &data.attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(value);
                    out.push('"');
                }
                out.push('>');
                for &child in self.children(id) {
                    self.write_html(child, out);
                }
                out.push_str("</");
                out.push_str(&data.tag);
                out.push('>');
            }
        }
    }
}
