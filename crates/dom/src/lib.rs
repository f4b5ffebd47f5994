pub mod document;
pub mod layout;
pub mod parse;
pub mod select;
pub mod snapshot;
pub mod style;

pub use document::{ElementData, Node, NodeId, NodeKind, PageDocument};
pub use layout::{compute_layout, Layout};
pub use parse::parse_document;
pub use select::{query, query_all, SimpleSelector};
pub use snapshot::{snapshot_element, snapshot_selection};
