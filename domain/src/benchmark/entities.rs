//! Benchmark records, derived statistics and the configuration matrix.

use serde::{Deserialize, Serialize};

use crate::strategy::StrategyKind;

/// A named benchmark prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    pub id: String,
    pub prompt: String,
}

impl Preset {
    pub fn new(id: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
        }
    }
}

/// One configuration cell of a benchmark run.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkCell<'a> {
    pub model: &'a str,
    pub strategy: StrategyKind,
    pub preset: &'a Preset,
    /// 1-based
    pub iteration: u32,
}

/// The cross product `models × strategies × presets × iterations`.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkMatrix {
    pub models: Vec<String>,
    pub strategies: Vec<StrategyKind>,
    pub presets: Vec<Preset>,
    pub iterations: u32,
}

impl BenchmarkMatrix {
    /// Number of cells.
    pub fn len(&self) -> usize {
        self.models.len() * self.strategies.len() * self.presets.len() * self.iterations as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cells in enumeration order: models outer, then strategies, then
    /// presets, then the iteration counter.
    pub fn cells(&self) -> impl Iterator<Item = BenchmarkCell<'_>> {
        self.models.iter().flat_map(move |model| {
            self.strategies.iter().flat_map(move |&strategy| {
                self.presets.iter().flat_map(move |preset| {
                    (1..=self.iterations).map(move |iteration| BenchmarkCell {
                        model: model.as_str(),
                        strategy,
                        preset,
                        iteration,
                    })
                })
            })
        })
    }
}

/// One row per executed cell. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkRunRecord {
    pub model: String,
    pub strategy: StrategyKind,
    pub preset: String,
    pub iteration: u32,
    pub success: bool,
    pub duration_ms: u64,
    pub attempts: u32,
    pub tool_calls: usize,
    pub repaired_calls: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Summary of all records sharing a (model, strategy) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkAggregate {
    pub model: String,
    pub strategy: StrategyKind,
    pub runs: usize,
    pub successes: usize,
    pub failures: usize,
    pub success_rate: f64,
    pub error_rate: f64,
    pub avg_duration_ms: f64,
    pub median_duration_ms: u64,
    pub p95_duration_ms: u64,
    pub avg_tool_calls: f64,
    pub avg_repaired_calls: f64,
    pub repair_rate: f64,
    pub tool_use_rate: f64,
    pub avg_attempts: f64,
}

/// A (model, strategy) row expressed against the best strategy for that model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkComparison {
    pub model: String,
    pub strategy: StrategyKind,
    pub baseline_strategy: StrategyKind,
    pub success_rate: f64,
    /// `(baseline - row) × 100`, percentage points
    pub delta_success_rate: f64,
    pub delta_duration_ms: f64,
    pub delta_tool_calls: f64,
}

impl BenchmarkComparison {
    pub fn is_baseline(&self) -> bool {
        self.strategy == self.baseline_strategy
    }
}

/// Everything a benchmark run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkReport {
    pub records: Vec<BenchmarkRunRecord>,
    pub aggregates: Vec<BenchmarkAggregate>,
    pub comparisons: Vec<BenchmarkComparison>,
    /// Set when enumeration stopped early; `records` holds what ran.
    #[serde(default)]
    pub cancelled: bool,
}

impl BenchmarkReport {
    /// Derive aggregates and comparisons from raw records.
    pub fn from_records(records: Vec<BenchmarkRunRecord>, cancelled: bool) -> Self {
        let aggregates = super::stats::aggregate(&records);
        let comparisons = super::stats::compare(&aggregates);
        Self {
            records,
            aggregates,
            comparisons,
            cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> BenchmarkMatrix {
        BenchmarkMatrix {
            models: vec!["m1".to_string(), "m2".to_string()],
            strategies: vec![StrategyKind::StructuredJson, StrategyKind::HybridRepair],
            presets: vec![Preset::new("stats", "p1"), Preset::new("chat", "p2"), Preset::new("time", "p3")],
            iterations: 2,
        }
    }

    #[test]
    fn test_cell_count_is_cross_product() {
        let matrix = matrix();
        assert_eq!(matrix.len(), 2 * 2 * 3 * 2);
        assert_eq!(matrix.cells().count(), matrix.len());
    }

    #[test]
    fn test_cell_order_is_nested() {
        let matrix = matrix();
        let cells: Vec<_> = matrix.cells().collect();
        assert_eq!(cells[0].model, "m1");
        assert_eq!(cells[0].strategy, StrategyKind::StructuredJson);
        assert_eq!(cells[0].preset.id, "stats");
        assert_eq!(cells[0].iteration, 1);
        assert_eq!(cells[1].iteration, 2);
        assert_eq!(cells[2].preset.id, "chat");
        assert_eq!(cells[6].strategy, StrategyKind::HybridRepair);
        assert_eq!(cells[12].model, "m2");
    }

    #[test]
    fn test_empty_dimension_yields_no_cells() {
        let mut matrix = matrix();
        matrix.iterations = 0;
        assert!(matrix.is_empty());
        assert_eq!(matrix.cells().count(), 0);
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let record = BenchmarkRunRecord {
            model: "m".to_string(),
            strategy: StrategyKind::SingleToolRouter,
            preset: "stats".to_string(),
            iteration: 1,
            success: false,
            duration_ms: 12,
            attempts: 2,
            tool_calls: 0,
            repaired_calls: 0,
            error: Some("boom".to_string()),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["durationMs"], 12);
        assert_eq!(value["repairedCalls"], 0);
        assert_eq!(value["strategy"], "single-tool-router");
        assert_eq!(value["error"], "boom");
    }
}
