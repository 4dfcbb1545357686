use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tangle_core::ComponentId;

/// Scheduler operational metrics exposed to UIs and diagnostics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LayoutMetrics {
    /// Completed sweeps of the worker loop.
    pub sweeps: u64,
    /// Total `execute()` calls per component.
    pub executions: HashMap<ComponentId, u64>,
    /// Rolling average `execute()` duration per component.
    pub avg_execute_duration: HashMap<ComponentId, Duration>,
    /// When the last sweep finished.
    pub last_sweep: Option<DateTime<Utc>>,
    /// How long the last sweep took.
    pub last_sweep_duration: Duration,
}

impl LayoutMetrics {
    /// Record one `execute()` call.
    pub fn record_execution(&mut self, component: ComponentId, duration: Duration) {
        *self.executions.entry(component).or_default() += 1;

        let count = self.executions[&component];
        let prev_avg = self
            .avg_execute_duration
            .get(&component)
            .copied()
            .unwrap_or_default();

        // Incremental mean: new_avg = prev_avg + (duration - prev_avg) / count
        let new_avg = if count == 1 {
            duration
        } else {
            let prev_nanos = prev_avg.as_nanos() as f64;
            let cur_nanos = duration.as_nanos() as f64;
            let avg_nanos = prev_nanos + (cur_nanos - prev_nanos) / count as f64;
            Duration::from_nanos(avg_nanos as u64)
        };

        self.avg_execute_duration.insert(component, new_avg);
    }

    /// Record the completion of one sweep.
    pub fn record_sweep(&mut self, duration: Duration) {
        self.sweeps += 1;
        self.last_sweep = Some(Utc::now());
        self.last_sweep_duration = duration;
    }
}
