pub mod bridge;
pub mod render;
pub mod state;

pub use bridge::{PanelAction, PanelBridge};
pub use render::render;
pub use state::PanelState;
