//! Run Benchmark use case
//!
//! Drives the strategy-run path once per cell of
//! `models × strategies × presets × iterations`, strictly sequentially and in
//! enumeration order, then reduces the records into aggregates and
//! comparisons. A failing cell becomes a `success = false` record and never
//! stops the enumeration. Cancellation is checked between cells only.

use crate::config::ExecutionParams;
use crate::ports::model_gateway::ModelGateway;
use crate::ports::progress::{BenchmarkProgress, NoProgress};
use crate::use_cases::run_strategy::{RunStrategyInput, RunStrategyUseCase};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use toolbench_domain::{BenchmarkMatrix, BenchmarkReport, BenchmarkRunRecord};
use tracing::{info, warn};

/// Input for the RunBenchmark use case
#[derive(Debug, Clone)]
pub struct RunBenchmarkInput {
    pub matrix: BenchmarkMatrix,
    pub params: ExecutionParams,
}

impl RunBenchmarkInput {
    pub fn new(matrix: BenchmarkMatrix) -> Self {
        Self {
            matrix,
            params: ExecutionParams::default(),
        }
    }

    pub fn with_params(mut self, params: ExecutionParams) -> Self {
        self.params = params;
        self
    }
}

/// Use case for running a benchmark over a configuration matrix
pub struct RunBenchmarkUseCase<G: ModelGateway + 'static> {
    runner: RunStrategyUseCase<G>,
}

impl<G: ModelGateway + 'static> RunBenchmarkUseCase<G> {
    pub fn new(runner: RunStrategyUseCase<G>) -> Self {
        Self { runner }
    }

    /// Execute with no progress reporting and no cancellation
    pub async fn execute(&self, input: RunBenchmarkInput) -> BenchmarkReport {
        self.execute_with_progress(input, &NoProgress, &CancellationToken::new())
            .await
    }

    /// Execute with progress callbacks, stopping early once `cancel` fires
    pub async fn execute_with_progress(
        &self,
        input: RunBenchmarkInput,
        progress: &dyn BenchmarkProgress,
        cancel: &CancellationToken,
    ) -> BenchmarkReport {
        let total = input.matrix.len();
        let failed_attempts = input.params.max_attempts().max(1);
        let mut records = Vec::with_capacity(total);
        let mut cancelled = false;

        info!(cells = total, "Starting benchmark");

        for (offset, cell) in input.matrix.cells().enumerate() {
            if cancel.is_cancelled() {
                info!(completed = records.len(), "Benchmark cancelled");
                cancelled = true;
                break;
            }

            let index = offset + 1;
            self.runner.log_line(&format!(
                "[{}/{}] model={} strategy={} preset={} iteration={}",
                index, total, cell.model, cell.strategy, cell.preset.id, cell.iteration
            ));
            progress.on_cell_start(
                index,
                total,
                cell.model,
                cell.strategy,
                &cell.preset.id,
                cell.iteration,
            );

            let run_input = RunStrategyInput::new(cell.strategy, cell.model, cell.preset.prompt.clone())
                .with_params(input.params.clone());
            let started = Instant::now();
            let outcome = self.runner.execute(&run_input).await;
            let duration_ms = started.elapsed().as_millis() as u64;

            let record = match outcome {
                Ok(output) => BenchmarkRunRecord {
                    model: cell.model.to_string(),
                    strategy: cell.strategy,
                    preset: cell.preset.id.clone(),
                    iteration: cell.iteration,
                    success: true,
                    duration_ms,
                    attempts: output.attempts,
                    tool_calls: output.result.tool_calls.len(),
                    repaired_calls: output.result.repaired_calls(),
                    error: None,
                },
                Err(error) => {
                    warn!(
                        model = cell.model,
                        strategy = %cell.strategy,
                        preset = %cell.preset.id,
                        error = %error,
                        "Benchmark cell failed"
                    );
                    BenchmarkRunRecord {
                        model: cell.model.to_string(),
                        strategy: cell.strategy,
                        preset: cell.preset.id.clone(),
                        iteration: cell.iteration,
                        success: false,
                        duration_ms,
                        attempts: failed_attempts,
                        tool_calls: 0,
                        repaired_calls: 0,
                        error: Some(error.to_string()),
                    }
                }
            };

            progress.on_cell_complete(&record);
            records.push(record);
        }

        progress.on_finished(records.len(), cancelled);
        BenchmarkReport::from_records(records, cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::model_gateway::GatewayError;
    use crate::testing::{ScriptedGateway, registry, text};
    use std::sync::{Arc, Mutex};
    use toolbench_domain::{ModelResult, Preset, StrategyKind};

    fn respond(text_value: &str) -> Result<ModelResult, GatewayError> {
        text(&format!(r#"{{"action": "respond", "response": "{}"}}"#, text_value))
    }

    fn matrix(models: &[&str], presets: usize, iterations: u32) -> BenchmarkMatrix {
        BenchmarkMatrix {
            models: models.iter().map(|m| m.to_string()).collect(),
            strategies: vec![StrategyKind::StructuredJson],
            presets: (0..presets)
                .map(|i| Preset::new(format!("p{}", i), format!("prompt {}", i)))
                .collect(),
            iterations,
        }
    }

    fn benchmark(gateway: ScriptedGateway) -> (Arc<ScriptedGateway>, RunBenchmarkUseCase<ScriptedGateway>) {
        let gateway = Arc::new(gateway);
        let runner = RunStrategyUseCase::new(gateway.clone(), Arc::new(registry()));
        (gateway, RunBenchmarkUseCase::new(runner))
    }

    #[tokio::test]
    async fn test_record_count_and_order() {
        let responses = (0..8).map(|i| respond(&format!("r{}", i))).collect();
        let (_, use_case) = benchmark(ScriptedGateway::new(responses));
        let report = use_case
            .execute(RunBenchmarkInput::new(matrix(&["a", "b"], 2, 2)))
            .await;

        assert_eq!(report.records.len(), 2 * 2 * 2);
        assert!(!report.cancelled);
        let keys: Vec<_> = report
            .records
            .iter()
            .map(|r| (r.model.as_str(), r.preset.as_str(), r.iteration))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("a", "p0", 1),
                ("a", "p0", 2),
                ("a", "p1", 1),
                ("a", "p1", 2),
                ("b", "p0", 1),
                ("b", "p0", 2),
                ("b", "p1", 1),
                ("b", "p1", 2),
            ]
        );
        assert!(report.records.iter().all(|r| r.success && r.attempts == 1));
        assert_eq!(report.aggregates.len(), 2);
        assert_eq!(report.comparisons.len(), 2);
    }

    #[tokio::test]
    async fn test_failed_cell_is_recorded_and_enumeration_continues() {
        let (_, use_case) = benchmark(ScriptedGateway::new(vec![
            Err(GatewayError::request_failed("boom 1")),
            Err(GatewayError::request_failed("boom 2")),
            respond("fine"),
        ]));
        let input = RunBenchmarkInput::new(matrix(&["a"], 1, 2))
            .with_params(ExecutionParams::default().with_max_retries(1));
        let report = use_case.execute(input).await;

        assert_eq!(report.records.len(), 2);
        let failed = &report.records[0];
        assert!(!failed.success);
        assert_eq!(failed.attempts, 2);
        assert!(failed.error.as_deref().unwrap().contains("boom 2"));
        assert!(report.records[1].success);
        assert_eq!(report.aggregates[0].success_rate, 0.5);
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let (gateway, use_case) = benchmark(ScriptedGateway::new(vec![respond("x")]));
        let cancel = CancellationToken::new();
        cancel.cancel();
        let report = use_case
            .execute_with_progress(RunBenchmarkInput::new(matrix(&["a"], 1, 3)), &NoProgress, &cancel)
            .await;
        assert!(report.cancelled);
        assert!(report.records.is_empty());
        assert_eq!(gateway.call_count(), 0);
    }

    struct CancelAfterFirst {
        cancel: CancellationToken,
        started: Mutex<Vec<usize>>,
        finished: Mutex<Option<(usize, bool)>>,
    }

    impl BenchmarkProgress for CancelAfterFirst {
        fn on_cell_start(&self, index: usize, _: usize, _: &str, _: StrategyKind, _: &str, _: u32) {
            self.started.lock().unwrap().push(index);
        }

        fn on_cell_complete(&self, _record: &BenchmarkRunRecord) {
            self.cancel.cancel();
        }

        fn on_finished(&self, completed: usize, cancelled: bool) {
            *self.finished.lock().unwrap() = Some((completed, cancelled));
        }
    }

    #[tokio::test]
    async fn test_cancellation_between_cells_keeps_completed_records() {
        let (_, use_case) = benchmark(ScriptedGateway::new(vec![respond("1"), respond("2")]));
        let cancel = CancellationToken::new();
        let progress = CancelAfterFirst {
            cancel: cancel.clone(),
            started: Mutex::new(Vec::new()),
            finished: Mutex::new(None),
        };
        let report = use_case
            .execute_with_progress(RunBenchmarkInput::new(matrix(&["a"], 1, 3)), &progress, &cancel)
            .await;

        assert!(report.cancelled);
        assert_eq!(report.records.len(), 1);
        assert_eq!(*progress.started.lock().unwrap(), vec![1]);
        assert_eq!(*progress.finished.lock().unwrap(), Some((1, true)));
    }

    #[tokio::test]
    async fn test_log_sink_sees_cell_start() {
        let lines = Arc::new(Mutex::new(Vec::<String>::new()));
        let captured = lines.clone();
        let gateway = Arc::new(ScriptedGateway::new(vec![respond("x")]));
        let runner = RunStrategyUseCase::new(gateway, Arc::new(registry())).with_log_sink(Arc::new(
            move |line: &str| captured.lock().unwrap().push(line.to_string()),
        ));
        let use_case = RunBenchmarkUseCase::new(runner);
        use_case
            .execute(RunBenchmarkInput::new(matrix(&["a"], 1, 1)))
            .await;

        let lines = lines.lock().unwrap();
        assert_eq!(
            lines[0],
            "[1/1] model=a strategy=structured-json preset=p0 iteration=1"
        );
        assert_eq!(lines[1], "[a] structured-json attempt 1/2");
    }
}
