use scraper::{ElementRef, Html};

use crate::document::{ElementData, NodeId, PageDocument};
use crate::style::parse_style_attr;

/// Parses HTML into an owned [`PageDocument`].
///
/// `scraper::Html` is not `Send`, so the parse tree is kept in a tight
/// scope and every node is copied out into the arena before returning.
pub fn parse_document(html: &str) -> PageDocument {
    let mut doc = PageDocument::default();
    {
        let parsed = Html::parse_document(html);
        convert_element(&mut doc, parsed.root_element());
    }
    doc
}

fn convert_element(doc: &mut PageDocument, el_ref: ElementRef<'_>) -> NodeId {
    let el = el_ref.value();
    let mut data = ElementData::new(el.name());
    data.attrs = el
        .attrs()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();
    if let Some(style) = el.attr("style") {
        data.style = parse_style_attr(style);
    }
    let id = doc.create_element(data);

    for child in el_ref.children() {
        if let Some(child_el) = ElementRef::wrap(child) {
            let child_id = convert_element(doc, child_el);
            doc.append_child(id, child_id);
        } else if let scraper::Node::Text(text) = child.value() {
            let text_id = doc.create_text(text);
            doc.append_child(id, text_id);
        }
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_preserves_structure() {
        let doc = parse_document(
            r#"<html><body><div id="a" class="x y"><span>one</span><span>two</span></div></body></html>"#,
        );
        let div = doc.element_by_id("a").unwrap();
        let data = doc.element(div).unwrap();
        assert_eq!(data.tag, "div");
        assert_eq!(data.class_list(), vec!["x", "y"]);

        let spans = doc.child_elements(div);
        assert_eq!(spans.len(), 2);
        assert_eq!(doc.inner_text(spans[0]), "one");
        assert_eq!(doc.inner_text(spans[1]), "two");
        assert_eq!(doc.inner_text(div), "onetwo");
    }

    #[test]
    fn test_parse_seeds_inline_style() {
        let doc = parse_document(r#"<html><body><p id="p" style="color: red">t</p></body></html>"#);
        let p = doc.element_by_id("p").unwrap();
        assert_eq!(doc.element(p).unwrap().style_prop("color"), Some("red"));
    }

    #[test]
    fn test_parse_fragment_grows_body() {
        // html5ever wraps bare fragments in html/body
        let doc = parse_document("<div>hi</div>");
        let body = doc.body().unwrap();
        assert_eq!(doc.child_elements(body).len(), 1);
    }

    #[test]
    fn test_parse_keeps_attribute_values() {
        let doc = parse_document(
            r#"<html><body><a id="l" href="/docs" data-track="nav">docs</a></body></html>"#,
        );
        let a = doc.element_by_id("l").unwrap();
        let data = doc.element(a).unwrap();
        assert_eq!(data.attr("href"), Some("/docs"));
        assert_eq!(data.attr("data-track"), Some("nav"));
    }
}
