use std::f32::consts::TAU;
use std::sync::Arc;

use tangle_core::Point3;
use tangle_graph::{ComponentView, NodePositions};

use crate::algorithm::{CancelFlag, Layout};
use crate::config::CircleConfig;
use crate::progress::{ProgressSink, INDETERMINATE};

/// One-shot placement of a component's nodes on a circle in the XY plane.
///
/// The radius is chosen so adjacent nodes sit roughly `spacing` apart along
/// the circumference. Cancellation is polled per node.
pub struct CircleLayout {
    view: Arc<ComponentView>,
    positions: Arc<NodePositions>,
    cancel: CancelFlag,
    config: CircleConfig,
    progress: ProgressSink,
}

impl CircleLayout {
    pub fn new(
        view: Arc<ComponentView>,
        positions: Arc<NodePositions>,
        cancel: CancelFlag,
        config: CircleConfig,
        progress: ProgressSink,
    ) -> Self {
        Self { view, positions, cancel, config, progress }
    }
}

impl Layout for CircleLayout {
    fn cancel_flag(&self) -> &CancelFlag {
        &self.cancel
    }

    fn step(&mut self) {
        let nodes = self.view.nodes();
        let n = nodes.len();

        if n == 1 {
            self.positions.set(nodes[0], Point3::ZERO);
        } else {
            let radius = self.config.spacing * n as f32 / TAU;
            for (i, &node) in nodes.iter().enumerate() {
                if self.cancel.is_cancelled() {
                    return;
                }
                let angle = TAU * i as f32 / n as f32;
                self.positions
                    .set(node, Point3::new(radius * angle.cos(), radius * angle.sin(), 0.0));
            }
        }

        self.progress.emit(self.view.id(), 100);
        self.progress.emit(self.view.id(), INDETERMINATE);
    }
}
