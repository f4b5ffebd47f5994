use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use domlens_core::{Config, CoordinatorRequest, Envelope, InspectorCommand, Result, WindowMessage};
use domlens_dom::{query, NodeId};

use crate::events::{DispatchOutcome, EventEnvelope};
use crate::highlight::HighlightController;
use crate::page::Page;

/// Requests from the page driver (the simulated user): dispatch a DOM
/// event, or resolve a selector against the live document.
#[derive(Debug)]
pub enum DriverRequest {
    Dispatch(EventEnvelope),
    Resolve {
        selector: String,
        reply: oneshot::Sender<Result<Option<NodeId>>>,
    },
}

/// The page-embedded inspector context. Owns the page and the highlight
/// controller; everything else reaches it through channels.
pub struct InspectorContext {
    page: Page,
    controller: HighlightController,
    allowed: bool,
    coordinator_tx: mpsc::Sender<Envelope>,
    panel_tx: mpsc::Sender<WindowMessage>,
}

impl InspectorContext {
    /// Builds the context for one page. The allow-list decides everything:
    /// on a permitted page the panel chrome is injected; anywhere else no
    /// listeners attach and every incoming message is ignored.
    pub fn new(
        mut page: Page,
        config: &Config,
        coordinator_tx: mpsc::Sender<Envelope>,
        panel_tx: mpsc::Sender<WindowMessage>,
    ) -> Self {
        let allowed = config.is_allowed_url(page.url());
        if allowed {
            page.mount_panel();
        } else {
            debug!(url = page.url(), "page not in allow-list, inspector inactive");
        }
        Self {
            page,
            controller: HighlightController::new(),
            allowed,
            coordinator_tx,
            panel_tx,
        }
    }

    pub async fn run(
        mut self,
        mut commands: mpsc::Receiver<InspectorCommand>,
        mut driver: mpsc::Receiver<DriverRequest>,
        mut window_rx: mpsc::Receiver<WindowMessage>,
    ) {
        loop {
            tokio::select! {
                Some(command) = commands.recv() => self.handle_command(command).await,
                Some(request) = driver.recv() => self.handle_driver(request).await,
                Some(message) = window_rx.recv() => self.handle_window_message(message),
                else => break,
            }
        }
        debug!("inspector context stopped");
    }

    async fn handle_command(&mut self, command: InspectorCommand) {
        if !self.allowed {
            return;
        }
        match command {
            InspectorCommand::ToggleHighlight { is_highlighting } => {
                self.controller.set_highlighting(is_highlighting);
            }
            InspectorCommand::ToggleSidebar => {
                self.page.toggle_panel();
            }
            InspectorCommand::UpdateSelectedElements { selected_elements } => {
                let push = WindowMessage::UpdateSelectedElements { selected_elements };
                if self.panel_tx.send(push).await.is_err() {
                    warn!("panel frame gone, relay dropped");
                }
            }
        }
    }

    async fn handle_driver(&mut self, request: DriverRequest) {
        match request {
            DriverRequest::Dispatch(envelope) => self.handle_page_event(envelope).await,
            DriverRequest::Resolve { selector, reply } => {
                let result = query(self.page.document(), &selector);
                let _ = reply.send(result);
            }
        }
    }

    async fn handle_page_event(&mut self, envelope: EventEnvelope) {
        if !self.allowed {
            if let Some(reply) = envelope.outcome {
                let _ = reply.send(DispatchOutcome::default());
            }
            return;
        }

        let (outcome, captured) = self.controller.handle_event(&mut self.page, envelope.event);

        if let Some(snapshot) = captured {
            // Report to the coordinator and push straight into the panel;
            // the two sends are independent, neither is retried.
            let report = Envelope::notify(CoordinatorRequest::AddSelectedElement {
                element: snapshot.clone(),
            });
            if self.coordinator_tx.send(report).await.is_err() {
                warn!("coordinator unavailable, selection report dropped");
            }
            let push = WindowMessage::UpdateSelectedElements {
                selected_elements: snapshot,
            };
            if self.panel_tx.send(push).await.is_err() {
                warn!("panel frame gone, selection push dropped");
            }
        }

        if let Some(reply) = envelope.outcome {
            let _ = reply.send(outcome);
        }
    }

    fn handle_window_message(&mut self, message: WindowMessage) {
        if !self.allowed {
            return;
        }
        match message {
            WindowMessage::CloseSidebar => {
                self.page.set_panel_open(false);
            }
            WindowMessage::UpdateSelectedElements { .. } => {
                // outbound-only on this side of the channel
                debug!("ignoring selection push on the page-local channel");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventType, PageEvent};
    use domlens_core::config::PageConfig;
    use domlens_dom::parse_document;
    use tokio::time::{timeout, Duration};

    const HTML: &str = r#"<html><body><div id="x" class="a b">hello</div></body></html>"#;

    struct Harness {
        commands: mpsc::Sender<InspectorCommand>,
        driver: mpsc::Sender<DriverRequest>,
        #[allow(dead_code)]
        window_tx: mpsc::Sender<WindowMessage>,
        coordinator_rx: mpsc::Receiver<Envelope>,
        panel_rx: mpsc::Receiver<WindowMessage>,
    }

    fn spawn(url: &str) -> Harness {
        let config = Config {
            allowed_urls: vec!["https://github.com/".to_string()],
            ..Config::default()
        };
        let page = Page::new(parse_document(HTML), url, &PageConfig::default());
        let (coordinator_tx, coordinator_rx) = mpsc::channel(8);
        let (panel_tx, panel_rx) = mpsc::channel(8);
        let (commands_tx, commands_rx) = mpsc::channel(8);
        let (driver_tx, driver_rx) = mpsc::channel(8);
        let (window_tx, window_rx) = mpsc::channel(8);

        let context = InspectorContext::new(page, &config, coordinator_tx, panel_tx);
        tokio::spawn(context.run(commands_rx, driver_rx, window_rx));

        Harness {
            commands: commands_tx,
            driver: driver_tx,
            window_tx,
            coordinator_rx,
            panel_rx,
        }
    }

    async fn resolve(harness: &Harness, selector: &str) -> NodeId {
        let (reply, rx) = oneshot::channel();
        harness
            .driver
            .send(DriverRequest::Resolve {
                selector: selector.to_string(),
                reply,
            })
            .await
            .unwrap();
        rx.await.unwrap().unwrap().unwrap()
    }

    #[tokio::test]
    async fn test_capture_reports_and_pushes() {
        let mut harness = spawn("https://github.com/rust-lang/rust");
        harness
            .commands
            .send(InspectorCommand::ToggleHighlight {
                is_highlighting: true,
            })
            .await
            .unwrap();

        let target = resolve(&harness, "#x").await;
        let (envelope, outcome_rx) = EventEnvelope::call(PageEvent::new(EventType::Click, target));
        harness
            .driver
            .send(DriverRequest::Dispatch(envelope))
            .await
            .unwrap();

        let outcome = outcome_rx.await.unwrap();
        assert!(outcome.default_prevented);

        let report = timeout(Duration::from_secs(1), harness.coordinator_rx.recv())
            .await
            .unwrap()
            .unwrap();
        match report.request {
            CoordinatorRequest::AddSelectedElement { element } => {
                assert_eq!(element.element.id.as_deref(), Some("x"));
            }
            other => panic!("unexpected report: {other:?}"),
        }

        let push = timeout(Duration::from_secs(1), harness.panel_rx.recv())
            .await
            .unwrap()
            .unwrap();
        match push {
            WindowMessage::UpdateSelectedElements { selected_elements } => {
                assert_eq!(selected_elements.element.classes, vec!["a", "b"]);
            }
            other => panic!("unexpected push: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_disallowed_page_handles_nothing() {
        let mut harness = spawn("https://example.com/");
        harness
            .commands
            .send(InspectorCommand::ToggleHighlight {
                is_highlighting: true,
            })
            .await
            .unwrap();

        let target = resolve(&harness, "#x").await;
        let (envelope, outcome_rx) = EventEnvelope::call(PageEvent::new(EventType::Click, target));
        harness
            .driver
            .send(DriverRequest::Dispatch(envelope))
            .await
            .unwrap();

        // the event passes through untouched and nothing is reported
        let outcome = outcome_rx.await.unwrap();
        assert_eq!(outcome, DispatchOutcome::default());
        assert!(harness.coordinator_rx.try_recv().is_err());
        assert!(harness.panel_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_relay_forwards_to_panel() {
        let mut harness = spawn("https://github.com/");
        let target = resolve(&harness, "#x").await;

        // capture once to obtain a snapshot for the relay
        harness
            .commands
            .send(InspectorCommand::ToggleHighlight {
                is_highlighting: true,
            })
            .await
            .unwrap();
        let (envelope, outcome_rx) = EventEnvelope::call(PageEvent::new(EventType::Click, target));
        harness
            .driver
            .send(DriverRequest::Dispatch(envelope))
            .await
            .unwrap();
        outcome_rx.await.unwrap();
        harness.coordinator_rx.recv().await.unwrap();
        let first = harness.panel_rx.recv().await.unwrap();

        let WindowMessage::UpdateSelectedElements { selected_elements } = first else {
            panic!("expected selection push");
        };
        harness
            .commands
            .send(InspectorCommand::UpdateSelectedElements {
                selected_elements: selected_elements.clone(),
            })
            .await
            .unwrap();

        let relayed = timeout(Duration::from_secs(1), harness.panel_rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            relayed,
            WindowMessage::UpdateSelectedElements { selected_elements }
        );
    }
}
