use domlens_core::{Error, Result};

use crate::document::{NodeId, PageDocument};

/// A single compound selector: optional tag plus any number of `#id` /
/// `.class` qualifiers. Combinators are deliberately out of scope; the
/// REPL addresses one node at a time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimpleSelector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl SimpleSelector {
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(Error::Selector("empty selector".to_string()));
        }
        if input.chars().any(|c| c.is_whitespace() || c == '>' || c == ',') {
            return Err(Error::Selector(format!(
                "unsupported selector '{input}': only tag, #id and .class forms are recognized"
            )));
        }

        let mut sel = SimpleSelector::default();
        let mut rest = input;
        if !rest.starts_with(['#', '.']) {
            let end = rest.find(['#', '.']).unwrap_or(rest.len());
            sel.tag = Some(rest[..end].to_ascii_lowercase());
            rest = &rest[end..];
        }
        while !rest.is_empty() {
            let marker = rest.as_bytes()[0];
            let body = &rest[1..];
            let end = body.find(['#', '.']).unwrap_or(body.len());
            let name = &body[..end];
            if name.is_empty() {
                return Err(Error::Selector(format!("dangling qualifier in '{input}'")));
            }
            match marker {
                b'#' => sel.id = Some(name.to_string()),
                b'.' => sel.classes.push(name.to_string()),
                _ => unreachable!(),
            }
            rest = &body[end..];
        }
        Ok(sel)
    }

    pub fn matches(&self, doc: &PageDocument, id: NodeId) -> bool {
        let Some(data) = doc.element(id) else {
            return false;
        };
        if let Some(tag) = &self.tag {
            if data.tag != *tag {
                return false;
            }
        }
        if let Some(want) = &self.id {
            if data.id() != Some(want.as_str()) {
                return false;
            }
        }
        let classes = data.class_list();
        self.classes.iter().all(|c| classes.contains(&c.as_str()))
    }
}

/// First match in depth-first document order.
pub fn query(doc: &PageDocument, selector: &str) -> Result<Option<NodeId>> {
    let sel = SimpleSelector::parse(selector)?;
    let Some(root) = doc.root() else {
        return Ok(None);
    };
    Ok(doc
        .descendant_elements(root)
        .into_iter()
        .find(|&id| sel.matches(doc, id)))
}

pub fn query_all(doc: &PageDocument, selector: &str) -> Result<Vec<NodeId>> {
    let sel = SimpleSelector::parse(selector)?;
    let Some(root) = doc.root() else {
        return Ok(Vec::new());
    };
    Ok(doc
        .descendant_elements(root)
        .into_iter()
        .filter(|&id| sel.matches(doc, id))
        .collect())
}
