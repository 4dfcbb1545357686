mod circle;
mod force_directed;
mod random;
mod sequence;

pub use circle::CircleLayout;
pub use force_directed::ForceDirectedLayout;
pub use random::RandomLayout;
pub use sequence::SequenceLayout;
