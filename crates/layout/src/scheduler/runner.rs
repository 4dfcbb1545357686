use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex, RwLock};
use std::thread::JoinHandle;
use std::time::Instant;

use tangle_core::ComponentId;
use tracing::{debug, info, warn};

use super::metrics::LayoutMetrics;
use crate::algorithm::{CancelFlag, Layout};
use crate::factory::LayoutFactory;

/// One bound algorithm plus a clone of its cancellation flag.
///
/// The flag clone lets controllers cancel an in-flight `execute()` without
/// touching the algorithm mutex, which only the worker thread ever locks.
struct LayoutSlot {
    cancel: CancelFlag,
    algorithm: Mutex<Box<dyn Layout>>,
}

#[derive(Default)]
struct SchedulerState {
    layouts: HashMap<ComponentId, Arc<LayoutSlot>>,
    pause_requested: bool,
    is_paused: bool,
    stop_requested: bool,
    /// Worker has exited and destroyed all instances. Terminal.
    stopped: bool,
    worker_started: bool,
    /// Bumped by `resume`; a parked worker waits for it to change so
    /// spurious wakeups cannot fake a resume.
    resume_epoch: u64,
}

struct Shared {
    state: Mutex<SchedulerState>,
    /// Signalled by the worker once it has fully quiesced.
    paused_signal: Condvar,
    /// Signalled by controllers to wake a parked worker.
    resume_signal: Condvar,
}

/// Schedules every bound layout algorithm on one background worker thread.
///
/// The worker repeatedly sweeps all bound algorithms, invoking each one
/// `execute()` at a time, and observes pause/stop requests only at sweep
/// boundaries. All control operations are called from the foreground thread;
/// none of them blocks except [`LayoutScheduler::pause_and_wait`], whose
/// latency is bounded by the cooperative-cancellation latency of the
/// algorithms in flight.
///
/// State machine: `Idle` (no worker yet) → `Running` → `Paused` ⇄ `Running`
/// → `Stopped`. `Stopped` is terminal — reached through [`stop`] or by
/// natural loop exit once no bound algorithm is iterative — and a stopped
/// scheduler cannot be restarted. A converged iterative workload does *not*
/// stop the scheduler: the worker parks in `Paused`, keeping the thread
/// available for `resume` or newly added components.
///
/// [`stop`]: LayoutScheduler::stop
pub struct LayoutScheduler {
    factory: Box<dyn LayoutFactory>,
    shared: Arc<Shared>,
    metrics: Arc<RwLock<LayoutMetrics>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl LayoutScheduler {
    pub fn new(factory: Box<dyn LayoutFactory>) -> Self {
        Self {
            factory,
            shared: Arc::new(Shared {
                state: Mutex::new(SchedulerState::default()),
                paused_signal: Condvar::new(),
                resume_signal: Condvar::new(),
            }),
            metrics: Arc::new(RwLock::new(LayoutMetrics::default())),
            worker: Mutex::new(None),
        }
    }

    /// Bind an algorithm to `component` and make sure the worker is running.
    ///
    /// A no-op if the component is already bound (at most one instance per
    /// component can ever exist) or if the scheduler has stopped. The worker
    /// thread is started on the first add; adding to a scheduler whose
    /// worker is parked in `Paused` reuses that worker rather than starting
    /// a second one.
    pub fn add(&self, component: ComponentId) {
        let mut spawn = false;
        {
            let mut state = self.shared.state.lock().unwrap();
            if state.stop_requested || state.stopped {
                warn!(%component, "add ignored: scheduler already stopped");
                return;
            }
            if state.layouts.contains_key(&component) {
                debug!(%component, "add ignored: component already bound");
                return;
            }

            let algorithm = self.factory.create(component);
            let slot = Arc::new(LayoutSlot {
                cancel: algorithm.cancel_flag().clone(),
                algorithm: Mutex::new(algorithm),
            });
            state.layouts.insert(component, slot);
            debug!(%component, "component bound");

            if !state.worker_started {
                state.worker_started = true;
                spawn = true;
            }
        }

        if spawn {
            let shared = Arc::clone(&self.shared);
            let metrics = Arc::clone(&self.metrics);
            let handle = std::thread::Builder::new()
                .name("layout-worker".into())
                .spawn(move || worker_loop(&shared, &metrics))
                .expect("failed to spawn layout worker thread");
            *self.worker.lock().unwrap() = Some(handle);
            info!("layout worker spawned");
        }
    }

    /// Unbind and destroy the algorithm for `component`.
    ///
    /// If the scheduler is running, it is first driven through the
    /// fully-paused barrier and resumed afterwards — the worker must
    /// provably not be iterating the component map while the instance is
    /// destroyed.
    pub fn remove(&self, component: ComponentId) {
        let resume_after = {
            let state = self.shared.state.lock().unwrap();
            state.worker_started && !state.stopped && !state.is_paused
        };

        if resume_after {
            self.pause_and_wait();
        }

        {
            let mut state = self.shared.state.lock().unwrap();
            if state.layouts.remove(&component).is_some() {
                debug!(%component, "component unbound");
            }
        }

        if resume_after {
            self.resume();
        }
    }

    /// Request a pause and cancel all in-flight work. Never blocks; the
    /// worker observes the request at its next sweep boundary.
    pub fn pause(&self) {
        let mut state = self.shared.state.lock().unwrap();
        if state.stopped {
            return;
        }
        state.pause_requested = true;
        for slot in state.layouts.values() {
            slot.cancel.cancel();
        }
        debug!("pause requested");
    }

    /// As [`LayoutScheduler::pause`], but blocks until the worker has
    /// finished its current sweep and parked.
    ///
    /// Immediately after this returns, [`LayoutScheduler::is_paused`] is
    /// true (unless the scheduler has stopped meanwhile) and the worker is
    /// provably not executing or iterating anything. Returns immediately if
    /// the worker has never been started.
    pub fn pause_and_wait(&self) {
        let mut state = self.shared.state.lock().unwrap();
        if state.stopped {
            return;
        }
        state.pause_requested = true;
        for slot in state.layouts.values() {
            slot.cancel.cancel();
        }
        if !state.worker_started {
            return;
        }
        while !state.is_paused && !state.stopped {
            state = self.shared.paused_signal.wait(state).unwrap();
        }
    }

    /// Clear the pause state and wake the worker. Safe to call while
    /// already running.
    pub fn resume(&self) {
        {
            let mut state = self.shared.state.lock().unwrap();
            state.pause_requested = false;
            state.is_paused = false;
            state.resume_epoch += 1;
            debug!("resume");
        }
        self.shared.resume_signal.notify_all();
    }

    /// Request termination: cancel all in-flight work and wake a parked
    /// worker so it can observe the stop flag. Idempotent. The worker is
    /// joined on drop, which is only safe because drop stops first.
    pub fn stop(&self) {
        {
            let mut state = self.shared.state.lock().unwrap();
            if !state.stop_requested {
                state.stop_requested = true;
                state.pause_requested = false;
                for slot in state.layouts.values() {
                    slot.cancel.cancel();
                }
                info!("stop requested");
            }
        }
        self.shared.resume_signal.notify_all();
    }

    pub fn is_paused(&self) -> bool {
        self.shared.state.lock().unwrap().is_paused
    }

    /// True once the scheduler has terminated, via [`LayoutScheduler::stop`]
    /// or natural loop exit.
    pub fn is_stopped(&self) -> bool {
        let state = self.shared.state.lock().unwrap();
        state.stopped || (state.stop_requested && !state.worker_started)
    }

    /// Currently bound components, in id order.
    pub fn components(&self) -> Vec<ComponentId> {
        let state = self.shared.state.lock().unwrap();
        let mut ids: Vec<ComponentId> = state.layouts.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Snapshot of the current scheduler metrics.
    pub fn metrics(&self) -> LayoutMetrics {
        self.metrics.read().unwrap().clone()
    }

    /// Handle to the metrics for external reads without cloning.
    pub fn metrics_handle(&self) -> Arc<RwLock<LayoutMetrics>> {
        Arc::clone(&self.metrics)
    }
}

impl Drop for LayoutScheduler {
    fn drop(&mut self) {
        self.stop();
        if let Some(handle) = self.worker.lock().unwrap().take() {
            let _ = handle.join();
        }
    }
}

fn all_should_pause(layouts: &HashMap<ComponentId, Arc<LayoutSlot>>) -> bool {
    layouts
        .values()
        .all(|slot| slot.algorithm.lock().unwrap().should_pause())
}

fn any_iterative(layouts: &HashMap<ComponentId, Arc<LayoutSlot>>) -> bool {
    layouts
        .values()
        .any(|slot| slot.algorithm.lock().unwrap().iterative())
}

/// The worker loop; sole body run on the worker thread, and the sole caller
/// of any algorithm's `execute()`.
fn worker_loop(shared: &Arc<Shared>, metrics: &Arc<RwLock<LayoutMetrics>>) {
    debug!("layout worker running");

    loop {
        // Snapshot the slots so the sweep runs without the scheduler mutex:
        // control operations stay non-blocking while an execute is in
        // flight.
        let slots: Vec<(ComponentId, Arc<LayoutSlot>)> = {
            let state = shared.state.lock().unwrap();
            state
                .layouts
                .iter()
                .map(|(&id, slot)| (id, Arc::clone(slot)))
                .collect()
        };

        let sweep_start = Instant::now();
        for (component, slot) in slots {
            let mut algorithm = slot.algorithm.lock().unwrap();
            if algorithm.should_pause() {
                continue;
            }
            let start = Instant::now();
            algorithm.execute();
            drop(algorithm);

            if let Ok(mut m) = metrics.write() {
                m.record_execution(component, start.elapsed());
            }
        }
        if let Ok(mut m) = metrics.write() {
            m.record_sweep(sweep_start.elapsed());
        }
        // The snapshot has been consumed: while parked below the worker
        // holds no slot references, so a remove() performed against a
        // parked scheduler destroys the instance immediately.

        let mut state = shared.state.lock().unwrap();

        if state.pause_requested || all_should_pause(&state.layouts) {
            state.is_paused = true;
            shared.paused_signal.notify_all();
            debug!("layout worker parked");

            let epoch = state.resume_epoch;
            while !state.stop_requested && state.resume_epoch == epoch {
                state = shared.resume_signal.wait(state).unwrap();
            }
            debug!("layout worker woken");
        }

        // Termination: unconditionally on stop, or naturally once nothing
        // iterative remains bound. The test is the static iterative()
        // classification, not the dynamic should_pause() hint — a converged
        // iterative workload parks above instead of ever reaching here.
        if state.stop_requested || !any_iterative(&state.layouts) {
            let reason = if state.stop_requested {
                "stop requested"
            } else {
                "no iterative algorithms bound"
            };
            state.layouts.clear();
            state.stopped = true;
            drop(state);
            shared.paused_signal.notify_all();
            shared.resume_signal.notify_all();
            info!(reason, "layout worker exited");
            return;
        }
    }
}
