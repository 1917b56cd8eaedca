//! Progress notification port
//!
//! Defines the side channels the use cases report through. Neither is
//! required for correctness.

use std::sync::Arc;
use toolbench_domain::{BenchmarkRunRecord, StrategyKind};

/// Line-oriented logger callback, invoked synchronously.
pub type LogSink = Arc<dyn Fn(&str) + Send + Sync>;

/// Callback for progress updates during a benchmark
///
/// Implementations live in the presentation layer.
pub trait BenchmarkProgress: Send + Sync {
    /// Called before a cell runs. `index` is 1-based.
    fn on_cell_start(
        &self,
        index: usize,
        total: usize,
        model: &str,
        strategy: StrategyKind,
        preset: &str,
        iteration: u32,
    );

    /// Called after a cell's record has been appended
    fn on_cell_complete(&self, record: &BenchmarkRunRecord);

    /// Called once when enumeration ends
    fn on_finished(&self, _completed: usize, _cancelled: bool) {}
}

/// No-op progress notifier
pub struct NoProgress;

impl BenchmarkProgress for NoProgress {
    fn on_cell_start(&self, _: usize, _: usize, _: &str, _: StrategyKind, _: &str, _: u32) {}
    fn on_cell_complete(&self, _record: &BenchmarkRunRecord) {}
}
