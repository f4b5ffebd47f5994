pub mod config;
pub mod element;
pub mod error;
pub mod message;
pub mod paths;

pub use config::Config;
pub use element::{BoundingRect, ElementInfo, SelectionSnapshot, StyleSnapshot};
pub use error::{Error, Result};
pub use message::{
    CoordinatorReply, CoordinatorRequest, Envelope, InspectorCommand, LoginSignal, WindowMessage,
};
pub use paths::Paths;
