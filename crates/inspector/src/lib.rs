pub mod context;
pub mod events;
pub mod highlight;
pub mod page;

pub use context::{DriverRequest, InspectorContext};
pub use events::{DispatchOutcome, EventEnvelope, EventType, PageEvent, SUPPRESSED_EVENTS};
pub use highlight::{HighlightController, HIGHLIGHT_BACKGROUND, HIGHLIGHT_OUTLINE};
pub use page::{Page, PANEL_HOST_ID, PANEL_TOGGLE_ID};
