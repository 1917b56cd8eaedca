//! Benchmark domain
//!
//! Raw [`BenchmarkRunRecord`]s are reduced into per-(model, strategy)
//! [`BenchmarkAggregate`]s, which are then ranked per model into
//! [`BenchmarkComparison`]s. All of it is pure and recomputed from scratch
//! for each report.

pub mod entities;
pub mod stats;

pub use entities::{
    BenchmarkAggregate, BenchmarkCell, BenchmarkComparison, BenchmarkMatrix, BenchmarkReport,
    BenchmarkRunRecord, Preset,
};
pub use stats::{aggregate, compare, percentile, round_to};
