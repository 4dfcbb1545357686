//! The positioning-algorithm contract shared by all layout variants.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tangle_core::BoundingBox;
use tangle_graph::{ComponentView, NodePositions};

/// Cooperative cancellation flag shared between an algorithm and the
/// scheduler.
///
/// Setting the flag only requests cancellation; actual cessation depends on
/// the running algorithm polling it inside its work loop. Clones share the
/// same underlying flag, which lets the scheduler cancel an in-flight
/// `execute()` without locking the instance, and lets composite layouts
/// share one flag with their children.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent, callable from any thread.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn clear(&self) {
        self.0.store(false, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// A positioning algorithm bound to exactly one graph component.
///
/// The scheduler's worker thread is the sole caller of [`Layout::execute`];
/// the foreground thread only ever uses the control surface (cancellation).
///
/// Contract for implementors:
///
/// - [`Layout::step`] performs one bounded unit of work and must poll
///   [`Layout::cancel_flag`] at fine enough granularity that cancellation
///   takes effect within a bounded latency. On cancellation it returns
///   leaving positions valid but possibly incomplete; there is no rollback.
///   An implementation that never polls the flag will hang `pause_and_wait`
///   and `stop` — bounding iteration cost is the algorithm author's
///   responsibility, not something the scheduler can enforce.
/// - [`Layout::iterative`] is a fixed classification: true if repeated
///   `execute()` calls are semantically required to approach a result. It
///   governs whether the scheduler may terminate on its own.
/// - [`Layout::should_pause`] is a dynamic hint that the instance currently
///   has no useful work (converged, or finished for a one-shot). It decides
///   per-sweep skipping and pause entry, never termination, and it never
///   destroys the instance.
pub trait Layout: Send {
    /// The cancellation flag this instance polls.
    fn cancel_flag(&self) -> &CancelFlag;

    /// Perform one bounded unit of work.
    fn step(&mut self);

    fn iterative(&self) -> bool {
        false
    }

    fn should_pause(&self) -> bool {
        false
    }

    /// Clear the cancellation flag, then perform one unit of work.
    fn execute(&mut self) {
        self.cancel_flag().clear();
        self.step();
    }

    /// Request cooperative cancellation of an in-flight `execute()`.
    fn cancel(&self) {
        self.cancel_flag().cancel();
    }
}

/// Axis-aligned bounding box of a component's current node positions, or
/// `None` for an empty component.
///
/// Stateless utility for view-fitting; the scheduler itself never calls it.
/// While a computation is live the result may mix positions from different
/// iterations.
pub fn bounding_box(view: &ComponentView, positions: &NodePositions) -> Option<BoundingBox> {
    let mut nodes = view.nodes().iter();
    let first = nodes.next()?;
    let mut bb = BoundingBox::at(positions.get(*first));
    for &node in nodes {
        bb.expand_to_include(positions.get(node));
    }
    Some(bb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tangle_core::{NodeId, Point3};
    use tangle_graph::GraphStore;

    struct Probe {
        cancel: CancelFlag,
        cancelled_at_entry: bool,
    }

    impl Layout for Probe {
        fn cancel_flag(&self) -> &CancelFlag {
            &self.cancel
        }

        fn step(&mut self) {
            self.cancelled_at_entry = self.cancel.is_cancelled();
        }
    }

    #[test]
    fn cancel_flag_is_shared_across_clones() {
        let flag = CancelFlag::new();
        let clone = flag.clone();

        assert!(!flag.is_cancelled());
        clone.cancel();
        assert!(flag.is_cancelled());
        flag.clear();
        assert!(!clone.is_cancelled());
    }

    #[test]
    fn execute_clears_stale_cancellation() {
        let mut probe = Probe {
            cancel: CancelFlag::new(),
            cancelled_at_entry: true,
        };
        probe.cancel();

        probe.execute();
        assert!(!probe.cancelled_at_entry);
        assert!(!probe.cancel_flag().is_cancelled());
    }

    #[test]
    fn bounding_box_of_component() {
        let mut g = GraphStore::with_nodes(3);
        g.add_edge(NodeId(0), NodeId(1));
        g.add_edge(NodeId(1), NodeId(2));
        let view = g.components().remove(0);

        let positions = NodePositions::new(3);
        positions.set(NodeId(0), Point3::new(-1.0, 0.0, 0.0));
        positions.set(NodeId(1), Point3::new(0.0, 2.0, 0.0));
        positions.set(NodeId(2), Point3::new(3.0, 0.0, -1.0));

        let bb = bounding_box(&view, &positions).expect("non-empty component");
        assert_eq!(bb.min(), Point3::new(-1.0, 0.0, -1.0));
        assert_eq!(bb.max(), Point3::new(3.0, 2.0, 0.0));
    }
}
