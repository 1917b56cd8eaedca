//! CLI entrypoint for toolbench
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::io::IsTerminal;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use toolbench_application::{
    BenchmarkProgress, ExecutionParams, NoProgress, RetryingGateway, RunBenchmarkInput,
    RunBenchmarkUseCase, RunStrategyInput, RunStrategyUseCase,
};
use toolbench_domain::{BenchmarkMatrix, StrategyKind, ToolRegistry};
use toolbench_infrastructure::presets::preset_ids;
use toolbench_infrastructure::{
    ConfigLoader, ConfigSources, FileConfig, GeminiGateway, builtin_presets, default_registry,
    resolve_api_key_from_env, resolve_presets,
};
use toolbench_presentation::{
    BenchArgs, Cli, Command, ConsoleFormatter, OutputFormat, ProgressReporter, RunArgs,
    SimpleProgress, stderr_log_sink,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

type Gateway = RetryingGateway<GeminiGateway>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting toolbench");

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())?
    };

    if cli.show_config {
        if !cli.no_config {
            for line in ConfigLoader::describe_sources(&ConfigSources::discover(cli.config.as_deref())) {
                println!("{}", line);
            }
            println!();
        }
        println!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    let Some(command) = cli.command else {
        bail!("No command given. Use `toolbench run <PROMPT>` or `toolbench bench`.");
    };

    if let Command::Bench(args) = &command {
        if args.list_presets {
            for preset in builtin_presets() {
                println!("{:<12} {}", preset.id, preset.prompt);
            }
            return Ok(());
        }
    }

    // === Dependency Injection ===
    let api_key = resolve_api_key_from_env(config.gateway.api_key.as_deref())
        .context("No API key found: set gateway.api_key, GEMINI_API_KEY or GOOGLE_API_KEY")?;
    let gateway = Arc::new(RetryingGateway::new(
        GeminiGateway::from_config(&config.gateway, api_key)?,
        config.transport.to_retry_policy(),
    ));
    let registry = Arc::new(default_registry()?);

    let mut params = config.to_execution_params();
    params.generation = cli.generation.apply(params.generation);

    match command {
        Command::Run(args) => run(cli.output, cli.quiet, &config, params, gateway, registry, args).await,
        Command::Bench(args) => {
            bench(cli.output, cli.quiet, &config, params, gateway, registry, args).await
        }
    }
}

async fn run(
    output: OutputFormat,
    quiet: bool,
    config: &FileConfig,
    mut params: ExecutionParams,
    gateway: Arc<Gateway>,
    registry: Arc<ToolRegistry>,
    args: RunArgs,
) -> Result<()> {
    if let Some(max_retries) = args.max_retries {
        params.max_retries = max_retries;
    }
    if args.repair_model.is_some() {
        params.repair_model = args.repair_model;
    }

    let strategy = args.strategy.unwrap_or(config.run.strategy);
    let model = args.model.unwrap_or_else(|| config.run.model.clone());

    let mut use_case = RunStrategyUseCase::new(gateway, registry);
    if !quiet {
        use_case = use_case.with_log_sink(stderr_log_sink());
    }

    let input = RunStrategyInput::new(strategy, model, args.prompt).with_params(params);
    let result = use_case.execute(&input).await?;

    let text = match output {
        OutputFormat::Table => ConsoleFormatter::format_run(&result, args.trace),
        OutputFormat::Json => ConsoleFormatter::format_json(&result),
    };
    println!("{}", text);

    Ok(())
}

async fn bench(
    output: OutputFormat,
    quiet: bool,
    config: &FileConfig,
    mut params: ExecutionParams,
    gateway: Arc<Gateway>,
    registry: Arc<ToolRegistry>,
    args: BenchArgs,
) -> Result<()> {
    if let Some(max_retries) = args.max_retries {
        params.max_retries = max_retries;
    }

    let matrix = build_matrix(config, &args)?;
    if matrix.is_empty() {
        bail!("Benchmark matrix is empty");
    }
    info!(cells = matrix.len(), "Benchmark matrix built");

    // Cancellation is only observed between cells
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted; stopping after the current cell");
            on_signal.cancel();
        }
    });

    let total = matrix.len();
    let mut runner = RunStrategyUseCase::new(gateway, registry);
    let progress: Box<dyn BenchmarkProgress> = if quiet {
        Box::new(NoProgress)
    } else if std::io::stderr().is_terminal() {
        let reporter = ProgressReporter::new(total);
        runner = runner.with_log_sink(reporter.log_sink());
        Box::new(reporter)
    } else {
        runner = runner.with_log_sink(stderr_log_sink());
        Box::new(SimpleProgress)
    };

    let use_case = RunBenchmarkUseCase::new(runner);
    let input = RunBenchmarkInput::new(matrix).with_params(params);
    let report = use_case
        .execute_with_progress(input, progress.as_ref(), &cancel)
        .await;

    let text = match output {
        OutputFormat::Table => ConsoleFormatter::format_report(&report),
        OutputFormat::Json => ConsoleFormatter::format_json(&report),
    };
    println!("{}", text);

    Ok(())
}

/// Command-line lists win over `[benchmark]`; empty everywhere falls back
/// to the run model, every strategy and every preset.
fn build_matrix(config: &FileConfig, args: &BenchArgs) -> Result<BenchmarkMatrix> {
    let models = if !args.model.is_empty() {
        args.model.clone()
    } else if !config.benchmark.models.is_empty() {
        config.benchmark.models.clone()
    } else {
        vec![config.run.model.clone()]
    };

    let strategies = if !args.strategy.is_empty() {
        args.strategy.clone()
    } else if !config.benchmark.strategies.is_empty() {
        config.benchmark.strategies.clone()
    } else {
        StrategyKind::ALL.to_vec()
    };

    let preset_ids_requested = if args.preset.is_empty() {
        &config.benchmark.presets
    } else {
        &args.preset
    };
    let presets = resolve_presets(preset_ids_requested).map_err(|unknown| {
        anyhow::anyhow!(
            "Unknown preset: {} (available: {})",
            unknown,
            preset_ids().join(", ")
        )
    })?;

    let iterations = args.iterations.unwrap_or(config.benchmark.iterations);
    if iterations == 0 {
        bail!("Iterations must be at least 1");
    }

    Ok(BenchmarkMatrix {
        models,
        strategies,
        presets,
        iterations,
    })
}
