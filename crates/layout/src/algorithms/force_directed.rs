use std::sync::Arc;

use rayon::prelude::*;
use tangle_core::Point3;
use tangle_graph::{ComponentView, NodePositions};

use crate::algorithm::{CancelFlag, Layout};
use crate::config::ForceDirectedConfig;
use crate::progress::{ProgressSink, INDETERMINATE};

/// Iterative spring/repulsion refinement of one component's positions.
///
/// Each `execute()` runs a bounded number of inner iterations. Every
/// iteration accumulates, per node, pairwise repulsion against all other
/// nodes of the component plus spring attraction along edges, then applies
/// the displacement capped by the current temperature. The temperature
/// decays multiplicatively, so displacement shrinks monotonically and the
/// component converges once the largest displacement drops below the
/// configured threshold.
///
/// Expects scattered input positions: a fully coincident component produces
/// no net forces and converges immediately. The default factory chains a
/// seeded scatter in front of this algorithm for that reason.
///
/// Cancellation is polled once per inner iteration, so cancellation latency
/// is bounded by a single iteration over the component.
pub struct ForceDirectedLayout {
    view: Arc<ComponentView>,
    positions: Arc<NodePositions>,
    cancel: CancelFlag,
    config: ForceDirectedConfig,
    progress: ProgressSink,
    temperature: f32,
    converged: bool,
}

impl ForceDirectedLayout {
    pub fn new(
        view: Arc<ComponentView>,
        positions: Arc<NodePositions>,
        cancel: CancelFlag,
        config: ForceDirectedConfig,
        progress: ProgressSink,
    ) -> Self {
        let temperature = config.initial_temperature;
        Self {
            view,
            positions,
            cancel,
            config,
            progress,
            temperature,
            converged: false,
        }
    }

    /// Progress estimate from how far the temperature has decayed toward
    /// the convergence threshold, on a log scale.
    fn percent(&self) -> i32 {
        let initial = self.config.initial_temperature.max(1e-6);
        let threshold = self.config.convergence_threshold.max(1e-6);
        if threshold >= initial {
            return INDETERMINATE;
        }
        let fraction = (initial.ln() - self.temperature.max(threshold).ln())
            / (initial.ln() - threshold.ln());
        (fraction.clamp(0.0, 1.0) * 100.0) as i32
    }
}

impl Layout for ForceDirectedLayout {
    fn cancel_flag(&self) -> &CancelFlag {
        &self.cancel
    }

    fn iterative(&self) -> bool {
        true
    }

    fn should_pause(&self) -> bool {
        self.converged
    }

    fn step(&mut self) {
        if self.converged {
            return;
        }

        let nodes = self.view.nodes();
        let n = nodes.len();
        if n <= 1 {
            self.converged = true;
            self.progress.emit(self.view.id(), 100);
            self.progress.emit(self.view.id(), INDETERMINATE);
            return;
        }

        let cfg = self.config.clone();
        let view = Arc::clone(&self.view);
        let positions = Arc::clone(&self.positions);

        for _ in 0..cfg.iterations_per_execute {
            if self.cancel.is_cancelled() {
                return;
            }

            let temperature = self.temperature;
            let current: Vec<Point3> = nodes.iter().map(|&node| positions.get(node)).collect();

            let displacements: Vec<Point3> = (0..n)
                .into_par_iter()
                .map(|i| {
                    let node = view.nodes()[i];
                    let own = current[i];
                    let mut force = Point3::ZERO;

                    // Pairwise repulsion against every other node.
                    for (j, &other) in current.iter().enumerate() {
                        if i == j {
                            continue;
                        }
                        let delta = own - other;
                        let dist_sq = delta.length_squared().max(1e-4);
                        force += delta * (cfg.repulsion / dist_sq);
                    }

                    // Spring attraction along edges.
                    for &neighbor in view.neighbors(node) {
                        let delta = positions.get(neighbor) - own;
                        let dist = delta.length().max(1e-4);
                        let stretch = dist - cfg.spring_length;
                        force += delta * (cfg.spring_strength * stretch / dist);
                    }

                    force.clamped(temperature)
                })
                .collect();

            let mut moved: f32 = 0.0;
            for (i, &node) in nodes.iter().enumerate() {
                positions.set(node, current[i] + displacements[i]);
                moved = moved.max(displacements[i].length());
            }

            self.temperature *= cfg.cooling;

            if moved < cfg.convergence_threshold {
                self.converged = true;
                break;
            }
        }

        let percent = if self.converged { 100 } else { self.percent() };
        self.progress.emit(self.view.id(), percent);
        self.progress.emit(self.view.id(), INDETERMINATE);
    }
}
