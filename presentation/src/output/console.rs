//! Console output formatter for run results and benchmark reports

use colored::Colorize;
use serde::Serialize;
use toolbench_application::RunStrategyOutput;
use toolbench_domain::{BenchmarkReport, RunnerTraceStep, ToolCallRecord};

const RULE_WIDTH: usize = 72;

/// Formats results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format a single strategy run
    pub fn format_run(output: &RunStrategyOutput, with_trace: bool) -> String {
        let result = &output.result;
        let mut text = String::new();

        text.push_str(&Self::header("toolbench run"));
        text.push('\n');
        text.push_str(&format!(
            "{} {}   {} {}\n",
            "Strategy:".cyan().bold(),
            result.strategy,
            "Attempts:".cyan().bold(),
            output.attempts
        ));

        if !result.tool_calls.is_empty() {
            text.push_str(&Self::section_header("Tool Calls"));
            for (i, call) in result.tool_calls.iter().enumerate() {
                text.push_str(&Self::tool_call_line(i + 1, call));
            }
        }

        if with_trace && !result.trace.is_empty() {
            text.push_str(&Self::section_header("Trace"));
            for step in &result.trace {
                text.push_str(&Self::trace_line(step));
            }
        }

        text.push_str(&Self::section_header("Answer"));
        text.push('\n');
        text.push_str(&result.final_text);
        text.push('\n');
        text.push_str(&Self::footer());
        text
    }

    /// Format a benchmark report as tables
    pub fn format_report(report: &BenchmarkReport) -> String {
        let mut text = String::new();
        text.push_str(&Self::header("toolbench benchmark"));
        text.push('\n');

        let failures = report.records.iter().filter(|r| !r.success).count();
        text.push_str(&format!(
            "{} {}   {} {}\n",
            "Runs:".cyan().bold(),
            report.records.len(),
            "Failures:".cyan().bold(),
            failures
        ));
        if report.cancelled {
            text.push_str(&format!(
                "{}\n",
                "Cancelled before every cell ran; results are partial.".yellow()
            ));
        }

        text.push_str(&Self::section_header("Aggregates"));
        text.push_str(&format!(
            "{}\n",
            format!(
                "{:<24} {:<20} {:>5} {:>8} {:>9} {:>8} {:>8} {:>6} {:>6} {:>6}",
                "model", "strategy", "runs", "success", "avg ms", "p50 ms", "p95 ms", "tools",
                "repair", "tries"
            )
            .bold()
        ));
        for agg in &report.aggregates {
            text.push_str(&format!(
                "{:<24} {:<20} {:>5} {:>7.1}% {:>9.0} {:>8} {:>8} {:>6.2} {:>6.2} {:>6.2}\n",
                agg.model,
                agg.strategy.as_str(),
                agg.runs,
                agg.success_rate * 100.0,
                agg.avg_duration_ms,
                agg.median_duration_ms,
                agg.p95_duration_ms,
                agg.avg_tool_calls,
                agg.avg_repaired_calls,
                agg.avg_attempts
            ));
        }

        if !report.comparisons.is_empty() {
            text.push_str(&Self::section_header("Comparison vs. best strategy per model"));
            text.push_str(&format!(
                "{}\n",
                format!(
                    "{:<24} {:<20} {:>8} {:>10} {:>10} {:>8}",
                    "model", "strategy", "success", "Δ pts", "Δ ms", "Δ tools"
                )
                .bold()
            ));
            for cmp in &report.comparisons {
                let line = format!(
                    "{:<24} {:<20} {:>7.1}% {:>10.2} {:>+10.0} {:>+8.2}",
                    cmp.model,
                    cmp.strategy.as_str(),
                    cmp.success_rate * 100.0,
                    cmp.delta_success_rate,
                    cmp.delta_duration_ms,
                    cmp.delta_tool_calls
                );
                if cmp.is_baseline() {
                    text.push_str(&format!("{} {}\n", line.green(), "(baseline)".dimmed()));
                } else {
                    text.push_str(&format!("{}\n", line));
                }
            }
        }

        if failures > 0 {
            text.push_str(&Self::section_header("Failures"));
            for record in report.records.iter().filter(|r| !r.success) {
                text.push_str(&format!(
                    "  {} {} {} {} #{}: {}\n",
                    "x".red(),
                    record.model,
                    record.strategy,
                    record.preset,
                    record.iteration,
                    record.error.as_deref().unwrap_or("Unknown")
                ));
            }
        }

        text.push_str(&Self::footer());
        text
    }

    /// Format any serializable result as pretty JSON
    pub fn format_json<T: Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }

    fn tool_call_line(index: usize, call: &ToolCallRecord) -> String {
        let repaired = if call.repaired {
            format!(" {}", "(repaired)".yellow())
        } else {
            String::new()
        };
        format!(
            "  {}. {} {} -> {}{}\n",
            index,
            call.tool_name.bold(),
            serde_json::Value::Object(call.args.clone()),
            call.result_text(),
            repaired
        )
    }

    fn trace_line(step: &RunnerTraceStep) -> String {
        format!(
            "  {} {}\n",
            format!("[{}]", step.kind).dimmed(),
            Self::indent(&step.detail, "    ").trim_start()
        )
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(RULE_WIDTH);
        format!("{}\n{:^72}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("{}\n", "=".repeat(RULE_WIDTH).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
