pub mod algorithm;
pub mod algorithms;
pub mod config;
pub mod factory;
pub mod progress;
pub mod scheduler;

pub use algorithm::{bounding_box, CancelFlag, Layout};
pub use algorithms::{CircleLayout, ForceDirectedLayout, RandomLayout, SequenceLayout};
pub use config::{CircleConfig, ConfigError, ForceDirectedConfig, LayoutConfig, LayoutKind};
pub use factory::{DefaultLayoutFactory, LayoutFactory};
pub use progress::{ProgressSink, ProgressUpdate, INDETERMINATE};
pub use scheduler::{LayoutMetrics, LayoutScheduler};
