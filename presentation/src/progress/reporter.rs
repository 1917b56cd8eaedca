//! Progress reporting for benchmark execution

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use toolbench_application::{BenchmarkProgress, LogSink};
use toolbench_domain::{BenchmarkRunRecord, StrategyKind};

/// Reports benchmark progress with a progress bar on stderr
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    pub fn new(total_cells: usize) -> Self {
        let bar = ProgressBar::new(total_cells as u64);
        bar.set_style(Self::bar_style());
        bar.set_prefix("Benchmark");
        Self { bar }
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )
        .map(|style| style.progress_chars("=>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
    }

    /// Log sink that prints above the bar instead of tearing it
    pub fn log_sink(&self) -> LogSink {
        let bar = self.bar.clone();
        Arc::new(move |line: &str| bar.println(format!("{}", line.dimmed())))
    }
}

impl BenchmarkProgress for ProgressReporter {
    fn on_cell_start(
        &self,
        _index: usize,
        _total: usize,
        model: &str,
        strategy: StrategyKind,
        preset: &str,
        iteration: u32,
    ) {
        self.bar
            .set_message(format!("{} {} {} #{}", model, strategy, preset, iteration));
    }

    fn on_cell_complete(&self, record: &BenchmarkRunRecord) {
        if !record.success {
            self.bar.println(format!(
                "  {} {} {} {} #{}",
                "x".red(),
                record.model,
                record.strategy,
                record.preset,
                record.iteration
            ));
        }
        self.bar.inc(1);
    }

    fn on_finished(&self, completed: usize, cancelled: bool) {
        if cancelled {
            self.bar.abandon_with_message(format!(
                "{} after {} cell(s)",
                "cancelled".yellow(),
                completed
            ));
        } else {
            self.bar.finish_with_message(format!("{}", "complete!".green()));
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl BenchmarkProgress for SimpleProgress {
    fn on_cell_start(
        &self,
        index: usize,
        total: usize,
        model: &str,
        strategy: StrategyKind,
        preset: &str,
        iteration: u32,
    ) {
        eprintln!(
            "{} [{}/{}] {} {} {} #{}",
            "->".cyan(),
            index,
            total,
            model,
            strategy,
            preset,
            iteration
        );
    }

    fn on_cell_complete(&self, record: &BenchmarkRunRecord) {
        if record.success {
            eprintln!("  {} {} ms", "v".green(), record.duration_ms);
        } else {
            eprintln!(
                "  {} {}",
                "x".red(),
                record.error.as_deref().unwrap_or("failed")
            );
        }
    }
}

/// Log sink writing each line to stderr
pub fn stderr_log_sink() -> LogSink {
    Arc::new(|line: &str| eprintln!("{}", line.dimmed()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(success: bool) -> BenchmarkRunRecord {
        BenchmarkRunRecord {
            model: "m".to_string(),
            strategy: StrategyKind::StructuredJson,
            preset: "stats".to_string(),
            iteration: 1,
            success,
            duration_ms: 5,
            attempts: 1,
            tool_calls: 0,
            repaired_calls: 0,
            error: None,
        }
    }

    #[test]
    fn test_reporter_advances_per_cell() {
        let reporter = ProgressReporter::new(3);
        reporter.bar.set_draw_target(indicatif::ProgressDrawTarget::hidden());
        reporter.on_cell_start(1, 3, "m", StrategyKind::StructuredJson, "stats", 1);
        reporter.on_cell_complete(&record(true));
        reporter.on_cell_complete(&record(false));
        assert_eq!(reporter.bar.position(), 2);
        reporter.on_finished(2, true);
        assert!(reporter.bar.is_finished());
    }

    #[test]
    fn test_log_sink_does_not_panic_when_hidden() {
        let reporter = ProgressReporter::new(1);
        reporter.bar.set_draw_target(indicatif::ProgressDrawTarget::hidden());
        let sink = reporter.log_sink();
        sink("[1/1] model=m strategy=structured-json preset=stats iteration=1");
    }
}
