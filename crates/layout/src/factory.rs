use std::collections::HashMap;
use std::sync::Arc;

use tangle_core::ComponentId;
use tangle_graph::{ComponentView, NodePositions};

use crate::algorithm::{CancelFlag, Layout};
use crate::algorithms::{CircleLayout, ForceDirectedLayout, RandomLayout, SequenceLayout};
use crate::config::{LayoutConfig, LayoutKind};
use crate::progress::ProgressSink;

/// Constructs the positioning algorithm bound to a component.
///
/// Ownership of the returned instance transfers to the caller (the
/// scheduler). Implementations may assume `component` identifies a component
/// known to the graph model; violating that precondition is a caller
/// programming error, not a runtime condition this trait reports.
pub trait LayoutFactory: Send + Sync {
    fn create(&self, component: ComponentId) -> Box<dyn Layout>;
}

/// Factory wiring algorithms to component topology views and the shared
/// position store, selecting the algorithm kind from [`LayoutConfig`].
pub struct DefaultLayoutFactory {
    views: HashMap<ComponentId, Arc<ComponentView>>,
    positions: Arc<NodePositions>,
    config: LayoutConfig,
    progress: ProgressSink,
}

impl DefaultLayoutFactory {
    pub fn new(
        views: impl IntoIterator<Item = Arc<ComponentView>>,
        positions: Arc<NodePositions>,
        config: LayoutConfig,
        progress: ProgressSink,
    ) -> Self {
        Self {
            views: views.into_iter().map(|v| (v.id(), v)).collect(),
            positions,
            config,
            progress,
        }
    }

    /// Per-component seed stream derived from the configured base seed.
    fn seed_for(&self, component: ComponentId) -> u64 {
        self.config
            .seed
            .wrapping_add((component.0 as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }
}

impl LayoutFactory for DefaultLayoutFactory {
    /// # Panics
    ///
    /// Panics if `component` is unknown to the graph model this factory was
    /// built from.
    fn create(&self, component: ComponentId) -> Box<dyn Layout> {
        let view = Arc::clone(
            self.views
                .get(&component)
                .expect("layout factory invoked with unknown ComponentId"),
        );
        let cancel = CancelFlag::new();

        match self.config.algorithm {
            LayoutKind::Circle => Box::new(CircleLayout::new(
                view,
                Arc::clone(&self.positions),
                cancel,
                self.config.circle.clone(),
                self.progress.clone(),
            )),
            LayoutKind::Random => Box::new(RandomLayout::new(
                view,
                Arc::clone(&self.positions),
                cancel,
                self.seed_for(component),
                self.config.scatter_extent,
                self.progress.clone(),
            )),
            LayoutKind::ForceDirected => {
                let scatter = RandomLayout::new(
                    Arc::clone(&view),
                    Arc::clone(&self.positions),
                    cancel.clone(),
                    self.seed_for(component),
                    self.config.scatter_extent,
                    self.progress.clone(),
                );
                let refine = ForceDirectedLayout::new(
                    view,
                    Arc::clone(&self.positions),
                    cancel.clone(),
                    self.config.force_directed.clone(),
                    self.progress.clone(),
                );
                Box::new(SequenceLayout::new(
                    cancel,
                    vec![Box::new(scatter), Box::new(refine)],
                ))
            }
        }
    }
}
