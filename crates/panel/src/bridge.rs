use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use domlens_core::{CoordinatorReply, CoordinatorRequest, Envelope, WindowMessage};

use crate::render::render;
use crate::state::PanelState;

/// Local UI actions on the panel. These never touch the page document
/// directly; anything that must is sent over a channel.
#[derive(Debug)]
pub enum PanelAction {
    /// Flip inspection mode (the toggle button).
    ToggleInspection,
    /// Expand or collapse one tree node by its structural path.
    ToggleExpand { path: String },
    /// Ask the page context to collapse the panel host.
    ClosePanel,
    /// Render the current panel contents.
    Render { reply: oneshot::Sender<Vec<String>> },
}

/// The panel context: holds UI state, receives pushes from the page-local
/// channel, and sends user intent back through the coordinator.
pub struct PanelBridge {
    state: PanelState,
    coordinator_tx: mpsc::Sender<Envelope>,
    window_tx: mpsc::Sender<WindowMessage>,
}

impl PanelBridge {
    pub fn new(coordinator_tx: mpsc::Sender<Envelope>, window_tx: mpsc::Sender<WindowMessage>) -> Self {
        Self {
            state: PanelState::new(),
            coordinator_tx,
            window_tx,
        }
    }

    pub async fn run(
        mut self,
        mut pushes: mpsc::Receiver<WindowMessage>,
        mut actions: mpsc::Receiver<PanelAction>,
    ) {
        self.init().await;
        loop {
            tokio::select! {
                Some(message) = pushes.recv() => self.handle_push(message),
                Some(action) = actions.recv() => self.handle_action(action).await,
                else => break,
            }
        }
        debug!("panel context stopped");
    }

    /// Fetches the canonical state to initialize a freshly opened panel.
    async fn init(&mut self) {
        let (envelope, reply) = Envelope::call(CoordinatorRequest::GetState);
        if self.coordinator_tx.send(envelope).await.is_err() {
            warn!("coordinator unavailable, panel starts empty");
            return;
        }
        match reply.await {
            Ok(CoordinatorReply::State {
                is_highlighting,
                selection,
            }) => self.state.apply_init(is_highlighting, selection),
            Ok(other) => warn!(?other, "unexpected reply to getState"),
            Err(_) => warn!("getState reply dropped, panel starts empty"),
        }
    }

    fn handle_push(&mut self, message: WindowMessage) {
        match message {
            WindowMessage::UpdateSelectedElements { selected_elements } => {
                self.state.apply_selection(selected_elements);
            }
            WindowMessage::CloseSidebar => {
                // panel-originated; nothing to do on the receiving side
                debug!("ignoring closeSidebar on the panel side");
            }
        }
    }

    async fn handle_action(&mut self, action: PanelAction) {
        match action {
            PanelAction::ToggleInspection => {
                let is_highlighting = self.state.toggle_inspection();
                let request = CoordinatorRequest::SetHighlightState { is_highlighting };
                if self.coordinator_tx.send(Envelope::notify(request)).await.is_err() {
                    warn!("coordinator unavailable, toggle dropped");
                }
            }
            PanelAction::ToggleExpand { path } => {
                self.state.toggle_expanded(&path);
            }
            PanelAction::ClosePanel => {
                if self.window_tx.send(WindowMessage::CloseSidebar).await.is_err() {
                    warn!("page context gone, close dropped");
                }
            }
            PanelAction::Render { reply } => {
                let _ = reply.send(render(&self.state));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domlens_core::SelectionSnapshot;
    use domlens_dom::{compute_layout, parse_document, snapshot_selection};
    use tokio::time::{timeout, Duration};

    fn sample_selection() -> SelectionSnapshot {
        let doc = parse_document(r#"<html><body><div id="x">hi</div></body></html>"#);
        let layout = compute_layout(&doc, 1280.0);
        snapshot_selection(&doc, doc.element_by_id("x").unwrap(), &layout)
    }

    struct Harness {
        pushes: mpsc::Sender<WindowMessage>,
        actions: mpsc::Sender<PanelAction>,
        coordinator_rx: mpsc::Receiver<Envelope>,
        window_rx: mpsc::Receiver<WindowMessage>,
    }

    /// Spawns a bridge plus a stub coordinator that answers the initial
    /// getState with the given state.
    fn spawn(initial: (bool, Option<SelectionSnapshot>)) -> Harness {
        let (coordinator_tx, mut coordinator_rx) = mpsc::channel::<Envelope>(8);
        let (window_tx, window_rx) = mpsc::channel(8);
        let (pushes_tx, pushes_rx) = mpsc::channel(8);
        let (actions_tx, actions_rx) = mpsc::channel(8);

        let bridge = PanelBridge::new(coordinator_tx, window_tx);
        tokio::spawn(bridge.run(pushes_rx, actions_rx));

        let (answer_tx, answer_rx) = mpsc::channel(8);
        tokio::spawn(async move {
            // answer exactly the init getState, then forward the rest
            if let Some(envelope) = coordinator_rx.recv().await {
                assert_eq!(envelope.request, CoordinatorRequest::GetState);
                if let Some(reply) = envelope.reply {
                    let _ = reply.send(CoordinatorReply::State {
                        is_highlighting: initial.0,
                        selection: initial.1,
                    });
                }
            }
            while let Some(envelope) = coordinator_rx.recv().await {
                let _ = answer_tx.send(envelope).await;
            }
        });

        Harness {
            pushes: pushes_tx,
            actions: actions_tx,
            coordinator_rx: answer_rx,
            window_rx,
        }
    }

    async fn rendered(harness: &Harness) -> String {
        let (reply, rx) = oneshot::channel();
        harness
            .actions
            .send(PanelAction::Render { reply })
            .await
            .unwrap();
        timeout(Duration::from_secs(1), rx)
            .await
            .unwrap()
            .unwrap()
            .join("\n")
    }

    #[tokio::test]
    async fn test_init_from_coordinator_state() {
        let harness = spawn((true, Some(sample_selection())));
        let text = rendered(&harness).await;
        assert!(text.contains("[ Selecting... ]"));
        assert!(text.contains("--- Selected Element ---"));
    }

    #[tokio::test]
    async fn test_selection_push_renders_and_stops_highlighting() {
        let harness = spawn((true, None));
        harness
            .pushes
            .send(WindowMessage::UpdateSelectedElements {
                selected_elements: sample_selection(),
            })
            .await
            .unwrap();

        let text = rendered(&harness).await;
        assert!(text.contains("[ Enable Highlight Selector ]"));
        assert!(text.contains("ID:         x"));
    }

    #[tokio::test]
    async fn test_toggle_sends_request_and_clears_optimistically() {
        let mut harness = spawn((false, Some(sample_selection())));
        // wait until init is applied
        assert!(rendered(&harness).await.contains("--- Selected Element ---"));

        harness.actions.send(PanelAction::ToggleInspection).await.unwrap();

        let envelope = timeout(Duration::from_secs(1), harness.coordinator_rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            envelope.request,
            CoordinatorRequest::SetHighlightState {
                is_highlighting: true
            }
        );

        let text = rendered(&harness).await;
        assert!(text.contains("No element selected."));
        assert!(text.contains("[ Selecting... ]"));
    }

    #[tokio::test]
    async fn test_close_goes_over_the_page_local_channel() {
        let mut harness = spawn((false, None));
        harness.actions.send(PanelAction::ClosePanel).await.unwrap();
        let message = timeout(Duration::from_secs(1), harness.window_rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(message, WindowMessage::CloseSidebar);
        // the close is page-local: the coordinator never hears about it
        assert!(harness.coordinator_rx.try_recv().is_err());
    }
}
