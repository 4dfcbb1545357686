//! Progress plumbing from algorithms to a UI progress indicator.

use std::sync::mpsc::{channel, Receiver, Sender};

use tangle_core::ComponentId;

/// Percentage value meaning "indeterminate / work unit finished".
pub const INDETERMINATE: i32 = -1;

/// A progress report emitted by an algorithm. `percent` is in `[0, 100]`,
/// or [`INDETERMINATE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub component: ComponentId,
    pub percent: i32,
}

/// Cloneable sink that algorithms emit progress into.
///
/// Progress is emitted by algorithms, never synthesized by the scheduler. A
/// disabled sink drops updates, and a sink whose receiver has gone away is
/// silently ignored — progress must never be able to fail or block a
/// computation.
#[derive(Debug, Clone, Default)]
pub struct ProgressSink {
    tx: Option<Sender<ProgressUpdate>>,
}

impl ProgressSink {
    /// A sink that discards every update.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// A connected sink plus the receiving end for the UI thread.
    pub fn channel() -> (Self, Receiver<ProgressUpdate>) {
        let (tx, rx) = channel();
        (Self { tx: Some(tx) }, rx)
    }

    pub fn emit(&self, component: ComponentId, percent: i32) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(ProgressUpdate { component, percent });
        }
    }
}
