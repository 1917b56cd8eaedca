//! Benchmark statistics: aggregation, percentiles and per-model comparison.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::entities::{BenchmarkAggregate, BenchmarkComparison, BenchmarkRunRecord};

/// Nearest-rank percentile over `values`.
///
/// Sorts a copy ascending and picks index `ceil(n·q) - 1`, clamped into
/// range. Returns 0 for an empty slice.
pub fn percentile(values: &[u64], q: f64) -> u64 {
    if values.is_empty() {
        return 0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let rank = (sorted.len() as f64 * q).ceil() as i64 - 1;
    let index = rank.clamp(0, sorted.len() as i64 - 1) as usize;
    sorted[index]
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}

/// Group records by (model, strategy) and summarize each group.
///
/// Rows come back sorted by strategy name, then model.
pub fn aggregate(records: &[BenchmarkRunRecord]) -> Vec<BenchmarkAggregate> {
    let mut groups: BTreeMap<(&str, &str), Vec<&BenchmarkRunRecord>> = BTreeMap::new();
    for record in records {
        groups
            .entry((record.strategy.as_str(), record.model.as_str()))
            .or_default()
            .push(record);
    }

    groups
        .into_values()
        .map(|group| {
            let first = group[0];
            let runs = group.len();
            let successes = group.iter().filter(|r| r.success).count();
            let durations: Vec<u64> = group.iter().map(|r| r.duration_ms).collect();
            let total_calls: usize = group.iter().map(|r| r.tool_calls).sum();
            let total_repaired: usize = group.iter().map(|r| r.repaired_calls).sum();
            let used_tools = group.iter().filter(|r| r.tool_calls > 0).count();

            BenchmarkAggregate {
                model: first.model.clone(),
                strategy: first.strategy,
                runs,
                successes,
                failures: runs - successes,
                success_rate: ratio(successes, runs),
                error_rate: ratio(runs - successes, runs),
                avg_duration_ms: mean(durations.iter().map(|&d| d as f64)).round(),
                median_duration_ms: percentile(&durations, 0.5),
                p95_duration_ms: percentile(&durations, 0.95),
                avg_tool_calls: round_to(mean(group.iter().map(|r| r.tool_calls as f64)), 2),
                avg_repaired_calls: round_to(mean(group.iter().map(|r| r.repaired_calls as f64)), 2),
                repair_rate: round_to(ratio(total_repaired, total_calls), 2),
                tool_use_rate: round_to(ratio(used_tools, runs), 2),
                avg_attempts: round_to(mean(group.iter().map(|r| r.attempts as f64)), 2),
            }
        })
        .collect()
}

/// Ranking used to pick a model's baseline: success rate descending, then
/// average duration, then average attempts, then strategy name.
fn rank(a: &BenchmarkAggregate, b: &BenchmarkAggregate) -> Ordering {
    b.success_rate
        .total_cmp(&a.success_rate)
        .then_with(|| a.avg_duration_ms.total_cmp(&b.avg_duration_ms))
        .then_with(|| a.avg_attempts.total_cmp(&b.avg_attempts))
        .then_with(|| a.strategy.as_str().cmp(b.strategy.as_str()))
}

/// Compare every strategy of a model against that model's best strategy.
///
/// Output is sorted by model, then ascending success-rate delta, so the
/// baseline row leads each model.
pub fn compare(aggregates: &[BenchmarkAggregate]) -> Vec<BenchmarkComparison> {
    let mut by_model: BTreeMap<&str, Vec<&BenchmarkAggregate>> = BTreeMap::new();
    for row in aggregates {
        by_model.entry(row.model.as_str()).or_default().push(row);
    }

    let mut comparisons = Vec::with_capacity(aggregates.len());
    for mut rows in by_model.into_values() {
        rows.sort_by(|a, b| rank(a, b));
        let baseline = rows[0];
        for row in rows {
            comparisons.push(BenchmarkComparison {
                model: row.model.clone(),
                strategy: row.strategy,
                baseline_strategy: baseline.strategy,
                success_rate: row.success_rate,
                delta_success_rate: round_to((baseline.success_rate - row.success_rate) * 100.0, 2),
                delta_duration_ms: row.avg_duration_ms - baseline.avg_duration_ms,
                delta_tool_calls: round_to(row.avg_tool_calls - baseline.avg_tool_calls, 2),
            });
        }
    }

    comparisons.sort_by(|a, b| {
        a.model
            .cmp(&b.model)
            .then_with(|| a.delta_success_rate.total_cmp(&b.delta_success_rate))
    });
    comparisons
}
