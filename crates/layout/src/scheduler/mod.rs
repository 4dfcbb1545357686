//! Cooperative layout scheduler.
//!
//! One background worker thread sweeps every bound algorithm one
//! `execute()` at a time while the foreground thread drives the control
//! surface (`add`/`remove`/`pause`/`pause_and_wait`/`resume`/`stop`).
//! Pause and stop transitions are observed only at sweep boundaries;
//! in-flight work is interrupted through cooperative cancellation.

pub mod metrics;
pub mod runner;

pub use metrics::LayoutMetrics;
pub use runner::LayoutScheduler;
