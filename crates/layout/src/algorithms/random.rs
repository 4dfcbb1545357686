use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tangle_core::Point3;
use tangle_graph::{ComponentView, NodePositions};

use crate::algorithm::{CancelFlag, Layout};
use crate::progress::{ProgressSink, INDETERMINATE};

/// One-shot seeded scatter of a component's nodes inside a cube.
///
/// Deterministic for a given seed, which keeps layouts reproducible across
/// runs and makes this suitable as the scatter stage in front of
/// force-directed refinement. Cancellation is polled per node.
pub struct RandomLayout {
    view: Arc<ComponentView>,
    positions: Arc<NodePositions>,
    cancel: CancelFlag,
    seed: u64,
    extent: f32,
    progress: ProgressSink,
}

impl RandomLayout {
    pub fn new(
        view: Arc<ComponentView>,
        positions: Arc<NodePositions>,
        cancel: CancelFlag,
        seed: u64,
        extent: f32,
        progress: ProgressSink,
    ) -> Self {
        Self { view, positions, cancel, seed, extent, progress }
    }
}

impl Layout for RandomLayout {
    fn cancel_flag(&self) -> &CancelFlag {
        &self.cancel
    }

    fn step(&mut self) {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let half = self.extent / 2.0;

        for &node in self.view.nodes() {
            if self.cancel.is_cancelled() {
                return;
            }
            self.positions.set(
                node,
                Point3::new(
                    rng.gen_range(-half..=half),
                    rng.gen_range(-half..=half),
                    rng.gen_range(-half..=half),
                ),
            );
        }

        self.progress.emit(self.view.id(), 100);
        self.progress.emit(self.view.id(), INDETERMINATE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tangle_core::NodeId;
    use tangle_graph::GraphStore;

    fn isolated_view(n: u32) -> Arc<ComponentView> {
        let mut g = GraphStore::with_nodes(n);
        for i in 1..n {
            g.add_edge(NodeId(0), NodeId(i));
        }
        g.components().remove(0)
    }

    fn scatter(seed: u64, extent: f32) -> Vec<Point3> {
        let view = isolated_view(8);
        let positions = Arc::new(NodePositions::new(8));
        let mut layout = RandomLayout::new(
            view,
            Arc::clone(&positions),
            CancelFlag::new(),
            seed,
            extent,
            ProgressSink::disabled(),
        );
        layout.execute();
        (0..8).map(|i| positions.get(NodeId(i))).collect()
    }

    #[test]
    fn same_seed_is_deterministic() {
        assert_eq!(scatter(7, 10.0), scatter(7, 10.0));
    }

    #[test]
    fn different_seeds_differ() {
        assert_ne!(scatter(7, 10.0), scatter(8, 10.0));
    }

    #[test]
    fn positions_stay_inside_the_extent() {
        for p in scatter(3, 4.0) {
            for c in [p.x, p.y, p.z] {
                assert!((-2.0..=2.0).contains(&c), "coordinate {c} out of extent");
            }
        }
    }
}
