use crate::algorithm::{CancelFlag, Layout};

/// Chains sub-layouts into one algorithm, e.g. a one-shot scatter followed
/// by iterative refinement.
///
/// The first unit of work runs every child once, in order. Later units only
/// run iterative children that still report useful work. All children must
/// be constructed with this sequence's `CancelFlag`, so one store cancels
/// the whole chain; the sequence invokes `step()` on children rather than
/// `execute()`, so a cancellation arriving mid-chain also stops the
/// children that come after it.
pub struct SequenceLayout {
    cancel: CancelFlag,
    children: Vec<Box<dyn Layout>>,
    first_pass_done: bool,
}

impl SequenceLayout {
    pub fn new(cancel: CancelFlag, children: Vec<Box<dyn Layout>>) -> Self {
        Self {
            cancel,
            children,
            first_pass_done: false,
        }
    }
}

impl Layout for SequenceLayout {
    fn cancel_flag(&self) -> &CancelFlag {
        &self.cancel
    }

    fn iterative(&self) -> bool {
        self.children.iter().any(|c| c.iterative())
    }

    fn should_pause(&self) -> bool {
        // A sequence without iterative children never claims to pause; like
        // other one-shots it relies on natural scheduler termination.
        self.first_pass_done
            && self.children.iter().any(|c| c.iterative())
            && self
                .children
                .iter()
                .filter(|c| c.iterative())
                .all(|c| c.should_pause())
    }

    fn step(&mut self) {
        if !self.first_pass_done {
            for child in &mut self.children {
                if self.cancel.is_cancelled() {
                    return;
                }
                child.step();
            }
            self.first_pass_done = true;
            return;
        }

        for child in &mut self.children {
            if self.cancel.is_cancelled() {
                return;
            }
            if child.iterative() && !child.should_pause() {
                child.step();
            }
        }
    }
}
