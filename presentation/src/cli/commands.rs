//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use toolbench_domain::{GenerationOptions, StrategyKind};

/// Output format for run results and benchmark reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable console output
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
}

/// CLI arguments for toolbench
#[derive(Parser, Debug)]
#[command(name = "toolbench")]
#[command(author, version, about = "Compare tool-calling strategies against an LLM")]
#[command(long_about = r#"
toolbench runs a prompt through one of three tool-calling strategies, or
benchmarks every combination of models, strategies and preset prompts.

Strategies:
  structured-json      The model answers with a JSON intent; tools run locally
  single-tool-router   One native "dispatch_tool" function routes every call
  hybrid-repair        Native per-tool calling with schema-guided argument repair

Configuration files are loaded from (in priority order):
1. TOOLBENCH_* environment variables (e.g. TOOLBENCH_RUN__MODEL)
2. --config <path>        Explicit config file
3. ./toolbench.toml       Project-level config
4. ~/.config/toolbench/config.toml   Global config

Example:
  toolbench run "What is the mean of 3, 5 and 10?"
  toolbench run -s single-tool-router "Convert 30C to Fahrenheit"
  toolbench bench -m gemini-2.5-flash -m gemini-2.5-pro -p stats -n 5
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output format
    #[arg(short, long, value_enum, global = true, default_value = "table")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress and attempt log lines
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration sources and the merged configuration, then exit
    #[arg(long, global = true)]
    pub show_config: bool,

    #[command(flatten)]
    pub generation: GenerationArgs,
}

/// Generation shaping flags, passed through to the gateway
#[derive(Args, Debug, Clone, Default)]
pub struct GenerationArgs {
    /// Request extended reasoning
    #[arg(long, global = true)]
    pub thinking: bool,

    /// Reasoning token budget
    #[arg(long, value_name = "TOKENS", global = true, allow_negative_numbers = true)]
    pub thinking_budget: Option<i64>,

    /// Return reasoning summaries (recorded in the trace)
    #[arg(long, global = true)]
    pub include_thoughts: bool,
}

impl GenerationArgs {
    /// Overlay flags on top of configured options; flags only ever switch
    /// things on.
    pub fn apply(&self, mut base: GenerationOptions) -> GenerationOptions {
        base.thinking |= self.thinking;
        base.include_thoughts |= self.include_thoughts;
        if self.thinking_budget.is_some() {
            base.thinking_budget = self.thinking_budget;
        }
        base
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one prompt through one strategy
    Run(RunArgs),
    /// Benchmark models × strategies × presets
    Bench(BenchArgs),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// The prompt to send
    pub prompt: String,

    /// Strategy (structured-json, single-tool-router, hybrid-repair)
    #[arg(short, long, value_name = "STRATEGY")]
    pub strategy: Option<StrategyKind>,

    /// Model id
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Extra attempts after a failed one
    #[arg(long, value_name = "N")]
    pub max_retries: Option<u32>,

    /// Model used for argument repair exchanges
    #[arg(long, value_name = "MODEL")]
    pub repair_model: Option<String>,

    /// Print the execution trace after the answer
    #[arg(long)]
    pub trace: bool,
}

#[derive(Args, Debug)]
pub struct BenchArgs {
    /// Models to benchmark (can be specified multiple times)
    #[arg(short, long, value_name = "MODEL")]
    pub model: Vec<String>,

    /// Strategies to benchmark (can be specified multiple times)
    #[arg(short, long, value_name = "STRATEGY")]
    pub strategy: Vec<StrategyKind>,

    /// Preset ids to run (can be specified multiple times)
    #[arg(short, long, value_name = "PRESET")]
    pub preset: Vec<String>,

    /// Iterations per (model, strategy, preset)
    #[arg(short = 'n', long, value_name = "N")]
    pub iterations: Option<u32>,

    /// Extra attempts after a failed one
    #[arg(long, value_name = "N")]
    pub max_retries: Option<u32>,

    /// List built-in presets and exit
    #[arg(long)]
    pub list_presets: bool,
}
