use tokio::sync::{broadcast, mpsc};
use tracing::{debug, warn};

use domlens_core::{
    CoordinatorReply, CoordinatorRequest, Envelope, InspectorCommand, LoginSignal,
};
use domlens_storage::{CredentialStore, KEY_AUTH_TOKEN, KEY_USER_ID};

use crate::session::InspectionSession;

/// The background coordinator context: owns the inspection session, routes
/// between the panel and the active page context, and handles the external
/// login handshake. Everything happens inside its single message loop.
pub struct Coordinator {
    session: InspectionSession,
    store: CredentialStore,
    inspector_tx: mpsc::Sender<InspectorCommand>,
    login_tx: broadcast::Sender<LoginSignal>,
}

impl Coordinator {
    pub fn new(store: CredentialStore, inspector_tx: mpsc::Sender<InspectorCommand>) -> Self {
        let (login_tx, _) = broadcast::channel(8);
        Self {
            session: InspectionSession::new(),
            store,
            inspector_tx,
            login_tx,
        }
    }

    /// Subscribes to the internal login broadcast (the signal the popup
    /// waits on to leave its loading state).
    pub fn login_signals(&self) -> broadcast::Receiver<LoginSignal> {
        self.login_tx.subscribe()
    }

    pub async fn run(mut self, mut requests: mpsc::Receiver<Envelope>) {
        while let Some(envelope) = requests.recv().await {
            self.handle(envelope).await;
        }
        debug!("coordinator context stopped");
    }

    async fn handle(&mut self, envelope: Envelope) {
        let Envelope { request, reply } = envelope;
        match request {
            CoordinatorRequest::GetState => {
                respond(
                    reply,
                    CoordinatorReply::State {
                        is_highlighting: self.session.is_highlighting(),
                        selection: self.session.selection().cloned(),
                    },
                );
            }
            CoordinatorRequest::SetHighlightState { is_highlighting } => {
                self.session.set_highlighting(is_highlighting);
                self.forward(InspectorCommand::ToggleHighlight { is_highlighting })
                    .await;
                respond(reply, CoordinatorReply::Ack { success: true });
            }
            CoordinatorRequest::AddSelectedElement { element } => {
                self.session.add_selection(element);
                self.forward(InspectorCommand::ToggleHighlight {
                    is_highlighting: false,
                })
                .await;
                respond(reply, CoordinatorReply::Ack { success: true });
            }
            CoordinatorRequest::GetAuthToken => {
                // async read: the caller awaits this reply rather than
                // assuming synchronous completion
                let token = match self.store.get(KEY_AUTH_TOKEN) {
                    Ok(token) => token,
                    Err(e) => {
                        warn!(error = %e, "Auth token read failed");
                        None
                    }
                };
                respond(reply, CoordinatorReply::AuthToken { token });
            }
            CoordinatorRequest::LoginSucceeded { user_id } => {
                match self.store.set(KEY_USER_ID, &user_id) {
                    Ok(()) => {
                        let _ = self.login_tx.send(LoginSignal { user_id });
                        respond(reply, CoordinatorReply::Ack { success: true });
                    }
                    Err(e) => {
                        warn!(error = %e, "Persisting user id failed");
                        respond(reply, CoordinatorReply::Ack { success: false });
                    }
                }
            }
        }
    }

    async fn forward(&self, command: InspectorCommand) {
        if self.inspector_tx.send(command).await.is_err() {
            warn!("page context gone, instruction dropped");
        }
    }
}

fn respond(reply: Option<tokio::sync::oneshot::Sender<CoordinatorReply>>, value: CoordinatorReply) {
    if let Some(tx) = reply {
        // a vanished caller is not an error: delivery is at-most-once
        let _ = tx.send(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domlens_core::Paths;
    use domlens_dom::{compute_layout, parse_document, snapshot_selection};
    use domlens_core::SelectionSnapshot;
    use tempfile::TempDir;
    use tokio::time::{timeout, Duration};

    struct Harness {
        requests: mpsc::Sender<Envelope>,
        inspector_rx: mpsc::Receiver<InspectorCommand>,
        login_rx: broadcast::Receiver<LoginSignal>,
        _dir: TempDir,
    }

    fn spawn() -> Harness {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(Paths::with_base(dir.path().to_path_buf()));
        let (inspector_tx, inspector_rx) = mpsc::channel(8);
        let (requests_tx, requests_rx) = mpsc::channel(8);
        let coordinator = Coordinator::new(store, inspector_tx);
        let login_rx = coordinator.login_signals();
        tokio::spawn(coordinator.run(requests_rx));
        Harness {
            requests: requests_tx,
            inspector_rx,
            login_rx,
            _dir: dir,
        }
    }

    async fn call(harness: &Harness, request: CoordinatorRequest) -> CoordinatorReply {
        let (envelope, rx) = Envelope::call(request);
        harness.requests.send(envelope).await.unwrap();
        timeout(Duration::from_secs(1), rx).await.unwrap().unwrap()
    }

    fn sample_selection() -> SelectionSnapshot {
        let doc = parse_document(r#"<html><body><div id="x">hi</div></body></html>"#);
        let layout = compute_layout(&doc, 1280.0);
        snapshot_selection(&doc, doc.element_by_id("x").unwrap(), &layout)
    }

    #[tokio::test]
    async fn test_toggle_then_capture_state_machine() {
        let mut harness = spawn();

        let reply = call(
            &harness,
            CoordinatorRequest::SetHighlightState {
                is_highlighting: true,
            },
        )
        .await;
        assert_eq!(reply, CoordinatorReply::Ack { success: true });
        assert_eq!(
            harness.inspector_rx.recv().await.unwrap(),
            InspectorCommand::ToggleHighlight {
                is_highlighting: true
            }
        );

        let reply = call(
            &harness,
            CoordinatorRequest::AddSelectedElement {
                element: sample_selection(),
            },
        )
        .await;
        assert_eq!(reply, CoordinatorReply::Ack { success: true });
        assert_eq!(
            harness.inspector_rx.recv().await.unwrap(),
            InspectorCommand::ToggleHighlight {
                is_highlighting: false
            }
        );

        match call(&harness, CoordinatorRequest::GetState).await {
            CoordinatorReply::State {
                is_highlighting,
                selection,
            } => {
                assert!(!is_highlighting);
                assert_eq!(selection.unwrap().element.id.as_deref(), Some("x"));
            }
            other => panic!("unexpected reply: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_state_before_any_capture() {
        let harness = spawn();
        match call(&harness, CoordinatorRequest::GetState).await {
            CoordinatorReply::State {
                is_highlighting,
                selection,
            } => {
                assert!(!is_highlighting);
                assert!(selection.is_none());
            }
            other => panic!("unexpected reply: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_auth_token_empty_store_resolves_none() {
        let harness = spawn();
        let reply = call(&harness, CoordinatorRequest::GetAuthToken).await;
        assert_eq!(reply, CoordinatorReply::AuthToken { token: None });
    }

    #[tokio::test]
    async fn test_login_persists_and_broadcasts() {
        let mut harness = spawn();
        let reply = call(
            &harness,
            CoordinatorRequest::LoginSucceeded {
                user_id: "abc123".to_string(),
            },
        )
        .await;
        assert_eq!(reply, CoordinatorReply::Ack { success: true });

        let signal = timeout(Duration::from_secs(1), harness.login_rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(signal.user_id, "abc123");

        let store = CredentialStore::new(Paths::with_base(harness._dir.path().to_path_buf()));
        assert_eq!(store.get(KEY_USER_ID).unwrap().as_deref(), Some("abc123"));

        let reply = call(&harness, CoordinatorRequest::GetAuthToken).await;
        // userId and authToken are separate entries
        assert_eq!(reply, CoordinatorReply::AuthToken { token: None });
    }

    #[tokio::test]
    async fn test_fire_and_forget_requests_are_accepted() {
        let mut harness = spawn();
        harness
            .requests
            .send(Envelope::notify(CoordinatorRequest::SetHighlightState {
                is_highlighting: true,
            }))
            .await
            .unwrap();
        assert_eq!(
            harness.inspector_rx.recv().await.unwrap(),
            InspectorCommand::ToggleHighlight {
                is_highlighting: true
            }
        );
    }
}
