use tracing::trace;

use domlens_core::SelectionSnapshot;
use domlens_dom::{snapshot_selection, NodeId};

use crate::events::{DispatchOutcome, EventType, PageEvent, SUPPRESSED_EVENTS};
use crate::page::Page;

/// Translucent fill painted on the hovered element.
pub const HIGHLIGHT_BACKGROUND: &str = "rgba(255, 192, 203, 0.2)";
/// Outline painted on the hovered element.
pub const HIGHLIGHT_OUTLINE: &str = "2px solid pink";

/// Capture-phase listener logic for one page. `is_highlighting` is set by
/// coordinator instructions only; the single local write is the one-shot
/// reset performed by a successful capture.
#[derive(Debug, Default)]
pub struct HighlightController {
    is_highlighting: bool,
    listeners_attached: bool,
}

impl HighlightController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_highlighting(&self) -> bool {
        self.is_highlighting
    }

    pub fn listeners_attached(&self) -> bool {
        self.listeners_attached
    }

    /// Applies a coordinator toggle: attaches the listener set when
    /// enabling, detaches it when disabling.
    pub fn set_highlighting(&mut self, next: bool) {
        self.is_highlighting = next;
        self.listeners_attached = next;
        trace!(is_highlighting = next, "highlight toggled");
    }

    /// Runs the capture-phase handlers for one event. Returns what the
    /// host page should do with the event, plus the selection if this
    /// event completed a capture.
    pub fn handle_event(
        &mut self,
        page: &mut Page,
        event: PageEvent,
    ) -> (DispatchOutcome, Option<SelectionSnapshot>) {
        if !self.listeners_attached {
            return (DispatchOutcome::default(), None);
        }

        match event.event_type {
            EventType::MouseOver => {
                if self.is_highlighting && !page.is_panel_element(event.target) {
                    apply_highlight(page, event.target);
                }
                (DispatchOutcome::default(), None)
            }
            EventType::MouseOut => {
                if self.is_highlighting && !page.is_panel_element(event.target) {
                    remove_highlight(page, event.target);
                }
                (DispatchOutcome::default(), None)
            }
            EventType::Click => {
                let suppress = self.suppression_outcome(event.event_type);
                if !self.is_highlighting || page.is_panel_element(event.target) {
                    return (suppress, None);
                }
                let snapshot = self.capture(page, event.target);
                (DispatchOutcome::suppressed(), Some(snapshot))
            }
            _ => (self.suppression_outcome(event.event_type), None),
        }
    }

    /// One-shot capture: serialize, drop out of inspection mode locally,
    /// unpaint the target.
    fn capture(&mut self, page: &mut Page, target: NodeId) -> SelectionSnapshot {
        let layout = page.layout();
        let snapshot = snapshot_selection(page.document(), target, &layout);
        self.is_highlighting = false;
        remove_highlight(page, target);
        snapshot
    }

    fn suppression_outcome(&self, event_type: EventType) -> DispatchOutcome {
        if self.is_highlighting && SUPPRESSED_EVENTS.contains(&event_type) {
            DispatchOutcome::suppressed()
        } else {
            DispatchOutcome::default()
        }
    }
}

fn apply_highlight(page: &mut Page, target: NodeId) {
    if let Some(data) = page.document_mut().element_mut(target) {
        data.set_style_prop("background-color", HIGHLIGHT_BACKGROUND);
        data.set_style_prop("outline", HIGHLIGHT_OUTLINE);
    }
}

/// Clears both paint properties to empty strings. Destructive: any inline
/// values that existed before the hover are not restored.
fn remove_highlight(page: &mut Page, target: NodeId) {
    if let Some(data) = page.document_mut().element_mut(target) {
        data.set_style_prop("background-color", "");
        data.set_style_prop("outline", "");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domlens_core::config::PageConfig;
    use domlens_dom::parse_document;

    const HTML: &str = r#"<html><body>
        <div id="x" class="a b"><span class="inner">text</span></div>
        <form id="f"><input id="field"></form>
    </body></html>"#;

    fn setup() -> (Page, HighlightController) {
        let doc = parse_document(HTML);
        let mut page = Page::new(doc, "https://github.com/", &PageConfig::default());
        page.mount_panel();
        (page, HighlightController::new())
    }

    fn style_of<'p>(page: &'p Page, dom_id: &str, prop: &str) -> Option<&'p str> {
        let node = page.document().element_by_id(dom_id).unwrap();
        page.document().element(node).unwrap().style_prop(prop)
    }

    #[test]
    fn test_hover_click_scenario() {
        let (mut page, mut ctl) = setup();
        ctl.set_highlighting(true);
        let target = page.document().element_by_id("x").unwrap();

        let (outcome, captured) =
            ctl.handle_event(&mut page, PageEvent::new(EventType::MouseOver, target));
        assert!(!outcome.default_prevented);
        assert!(captured.is_none());
        assert_eq!(
            style_of(&page, "x", "background-color"),
            Some(HIGHLIGHT_BACKGROUND)
        );
        assert_eq!(style_of(&page, "x", "outline"), Some(HIGHLIGHT_OUTLINE));

        let (outcome, captured) =
            ctl.handle_event(&mut page, PageEvent::new(EventType::Click, target));
        assert!(outcome.default_prevented);
        assert!(outcome.propagation_stopped);
        let snapshot = captured.unwrap();
        assert_eq!(snapshot.element.id.as_deref(), Some("x"));
        assert_eq!(snapshot.element.classes, vec!["a", "b"]);
        assert_eq!(snapshot.parent.as_ref().unwrap().tag_name, "body");

        // paint reverted, one-shot mode exited
        assert!(!ctl.is_highlighting());
        assert_eq!(style_of(&page, "x", "background-color"), None);
        assert_eq!(style_of(&page, "x", "outline"), None);
    }

    #[test]
    fn test_mouse_out_reverts_paint() {
        let (mut page, mut ctl) = setup();
        ctl.set_highlighting(true);
        let target = page.document().element_by_id("x").unwrap();

        ctl.handle_event(&mut page, PageEvent::new(EventType::MouseOver, target));
        ctl.handle_event(&mut page, PageEvent::new(EventType::MouseOut, target));
        assert_eq!(style_of(&page, "x", "background-color"), None);
    }

    #[test]
    fn test_panel_exclusion() {
        let (mut page, mut ctl) = setup();
        ctl.set_highlighting(true);
        let host = page
            .document()
            .element_by_id(crate::page::PANEL_HOST_ID)
            .unwrap();

        let (_, captured) =
            ctl.handle_event(&mut page, PageEvent::new(EventType::MouseOver, host));
        assert!(captured.is_none());
        let data = page.document().element(host).unwrap();
        assert_ne!(data.style_prop("background-color"), Some(HIGHLIGHT_BACKGROUND));

        // clicking panel chrome never captures
        let (_, captured) = ctl.handle_event(&mut page, PageEvent::new(EventType::Click, host));
        assert!(captured.is_none());
        assert!(ctl.is_highlighting());
    }

    #[test]
    fn test_suppression_only_while_highlighting() {
        let (mut page, mut ctl) = setup();
        let field = page.document().element_by_id("field").unwrap();

        for &event_type in SUPPRESSED_EVENTS {
            let (outcome, _) = ctl.handle_event(&mut page, PageEvent::new(event_type, field));
            assert!(!outcome.default_prevented, "{} leaked", event_type.name());
        }

        ctl.set_highlighting(true);
        for &event_type in SUPPRESSED_EVENTS {
            let (outcome, _) = ctl.handle_event(&mut page, PageEvent::new(event_type, field));
            assert!(outcome.default_prevented, "{} not suppressed", event_type.name());
            assert!(outcome.propagation_stopped);
        }

        // hover paint events are not in the suppressed set
        let (outcome, _) = ctl.handle_event(&mut page, PageEvent::new(EventType::MouseOver, field));
        assert!(!outcome.default_prevented);
    }

    #[test]
    fn test_detached_listeners_ignore_everything() {
        let (mut page, mut ctl) = setup();
        let target = page.document().element_by_id("x").unwrap();

        let (outcome, captured) =
            ctl.handle_event(&mut page, PageEvent::new(EventType::Click, target));
        assert_eq!(outcome, DispatchOutcome::default());
        assert!(captured.is_none());
        assert_eq!(style_of(&page, "x", "background-color"), None);
    }
}
