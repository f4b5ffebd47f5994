use tokio::sync::oneshot;

use domlens_dom::NodeId;

/// DOM event kinds the inspector listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    MouseOver,
    MouseOut,
    Click,
    DblClick,
    MouseDown,
    MouseUp,
    TouchStart,
    TouchEnd,
    KeyDown,
    KeyUp,
    KeyPress,
    Submit,
    Change,
    Input,
}

impl EventType {
    pub fn name(&self) -> &'static str {
        match self {
            EventType::MouseOver => "mouseover",
            EventType::MouseOut => "mouseout",
            EventType::Click => "click",
            EventType::DblClick => "dblclick",
            EventType::MouseDown => "mousedown",
            EventType::MouseUp => "mouseup",
            EventType::TouchStart => "touchstart",
            EventType::TouchEnd => "touchend",
            EventType::KeyDown => "keydown",
            EventType::KeyUp => "keyup",
            EventType::KeyPress => "keypress",
            EventType::Submit => "submit",
            EventType::Change => "change",
            EventType::Input => "input",
        }
    }
}

/// Events whose default action and propagation are suppressed while
/// inspection mode is active, so the host page never reacts to the
/// user's inspection gestures.
pub const SUPPRESSED_EVENTS: &[EventType] = &[
    EventType::Click,
    EventType::DblClick,
    EventType::MouseDown,
    EventType::MouseUp,
    EventType::TouchStart,
    EventType::TouchEnd,
    EventType::KeyDown,
    EventType::KeyUp,
    EventType::KeyPress,
    EventType::Submit,
    EventType::Change,
    EventType::Input,
];

/// A single dispatched DOM event targeting one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageEvent {
    pub event_type: EventType,
    pub target: NodeId,
}

impl PageEvent {
    pub fn new(event_type: EventType, target: NodeId) -> Self {
        Self { event_type, target }
    }
}

/// What the host page should do with the event after capture-phase
/// handling: honour `preventDefault` / `stopPropagation` or proceed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub default_prevented: bool,
    pub propagation_stopped: bool,
}

impl DispatchOutcome {
    pub fn suppressed() -> Self {
        Self {
            default_prevented: true,
            propagation_stopped: true,
        }
    }
}

/// An event plus an optional channel for the dispatch outcome. The page
/// driver awaits the outcome when it needs to decide whether to run the
/// default action; synthetic background events fire and forget.
#[derive(Debug)]
pub struct EventEnvelope {
    pub event: PageEvent,
    pub outcome: Option<oneshot::Sender<DispatchOutcome>>,
}

impl EventEnvelope {
    pub fn notify(event: PageEvent) -> Self {
        Self {
            event,
            outcome: None,
        }
    }

    pub fn call(event: PageEvent) -> (Self, oneshot::Receiver<DispatchOutcome>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                event,
                outcome: Some(tx),
            },
            rx,
        )
    }
}
