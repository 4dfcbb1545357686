use std::sync::atomic::{AtomicU32, Ordering};

use tangle_core::{NodeId, Point3};

/// One node position stored as raw f32 bit patterns.
#[derive(Debug)]
struct AtomicPoint {
    x: AtomicU32,
    y: AtomicU32,
    z: AtomicU32,
}

impl AtomicPoint {
    fn zero() -> Self {
        Self {
            x: AtomicU32::new(0.0f32.to_bits()),
            y: AtomicU32::new(0.0f32.to_bits()),
            z: AtomicU32::new(0.0f32.to_bits()),
        }
    }
}

/// Shared position store, keyed by `NodeId`.
///
/// This is a lend-don't-lock resource: the layout worker writes into it with
/// relaxed per-coordinate atomic stores and never takes a lock, and any
/// concurrent reader (typically a renderer) gets individually-valid floats
/// but may observe a position whose coordinates come from different
/// iterations. There is no atomicity guarantee across coordinates or across
/// nodes; readers that need a consistent snapshot must pause the scheduler
/// first.
#[derive(Debug)]
pub struct NodePositions {
    slots: Vec<AtomicPoint>,
}

impl NodePositions {
    /// Create a store for nodes `0..node_count`, all at the origin.
    pub fn new(node_count: usize) -> Self {
        Self {
            slots: (0..node_count).map(|_| AtomicPoint::zero()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Read a node's position. May be torn while a computation is live.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not covered by this store; binding an algorithm
    /// to nodes outside the store is a caller programming error.
    pub fn get(&self, node: NodeId) -> Point3 {
        let slot = &self.slots[node.index()];
        Point3::new(
            f32::from_bits(slot.x.load(Ordering::Relaxed)),
            f32::from_bits(slot.y.load(Ordering::Relaxed)),
            f32::from_bits(slot.z.load(Ordering::Relaxed)),
        )
    }

    /// Write a node's position. See [`NodePositions::get`] for panics.
    pub fn set(&self, node: NodeId, position: Point3) {
        let slot = &self.slots[node.index()];
        slot.x.store(position.x.to_bits(), Ordering::Relaxed);
        slot.y.store(position.y.to_bits(), Ordering::Relaxed);
        slot.z.store(position.z.to_bits(), Ordering::Relaxed);
    }
}
