pub mod geometry;
pub mod ids;

pub use geometry::{BoundingBox, Point3};
pub use ids::{ComponentId, NodeId};
