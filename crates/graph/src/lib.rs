pub mod positions;
pub mod store;

pub use positions::NodePositions;
pub use store::{ComponentView, GraphError, GraphStore};
