use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::element::SelectionSnapshot;

/// Requests handled by the coordinator context. Closed set: an unknown
/// action cannot be constructed, let alone silently dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum CoordinatorRequest {
    GetState,
    #[serde(rename_all = "camelCase")]
    SetHighlightState { is_highlighting: bool },
    AddSelectedElement { element: SelectionSnapshot },
    GetAuthToken,
    /// External cross-origin login signal. Keeps the original wire tag.
    #[serde(rename = "LOGIN_SUCCESS", rename_all = "camelCase")]
    LoginSucceeded { user_id: String },
}

/// Replies sent back over the envelope's oneshot channel. Untagged: each
/// reply is a bare object keyed by its fields, as on the original wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CoordinatorReply {
    #[serde(rename_all = "camelCase")]
    State {
        is_highlighting: bool,
        selection: Option<SelectionSnapshot>,
    },
    Ack { success: bool },
    AuthToken { token: Option<String> },
}

/// Instructions the coordinator forwards to the active page context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum InspectorCommand {
    #[serde(rename_all = "camelCase")]
    ToggleHighlight { is_highlighting: bool },
    ToggleSidebar,
    #[serde(rename_all = "camelCase")]
    UpdateSelectedElements { selected_elements: SelectionSnapshot },
}

/// Page-local channel between the inspector and the embedded panel frame.
/// Not part of the runtime bus; carries no origin restriction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum WindowMessage {
    #[serde(rename_all = "camelCase")]
    UpdateSelectedElements { selected_elements: SelectionSnapshot },
    CloseSidebar,
}

/// Internal broadcast emitted after a successful external login, so the
/// popup can leave its loading state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginSignal {
    pub user_id: String,
}

/// A request plus an optional reply channel. Fire-and-forget senders leave
/// `reply` empty; callers that need the response await the oneshot.
#[derive(Debug)]
pub struct Envelope {
    pub request: CoordinatorRequest,
    pub reply: Option<oneshot::Sender<CoordinatorReply>>,
}

impl Envelope {
    pub fn notify(request: CoordinatorRequest) -> Self {
        Self { request, reply: None }
    }

    pub fn call(request: CoordinatorRequest) -> (Self, oneshot::Receiver<CoordinatorReply>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                request,
                reply: Some(tx),
            },
            rx,
        )
    }
}
