use std::path::PathBuf;

use clap::{Parser, Subcommand};
use logforge::{analyze_fast, analyze_flex, config, report, Analysis, AnalyzerConfig};

#[derive(Parser, Debug)]
#[command(name = "logforge-cli", version)]
#[command(about = "Analyze inference-serving benchmark logs", long_about = None)]
struct Cli {
    /// Print the aggregate report as JSON instead of the human block
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a fixed-batching ("fast") benchmark log
    Fast {
        /// Path to the benchmark log file
        #[arg(long)]
        input: PathBuf,
        /// Number of parallel execution lanes in the analyzed run
        #[arg(long)]
        gpu: usize,
        /// Characters-per-token ratio for approximating context lengths
        #[arg(long, default_value_t = config::DEFAULT_CHARS_PER_TOKEN)]
        chars_per_token: f64,
    },
    /// Analyze a continuous-batching ("flex") benchmark log
    Flex {
        /// Path to the benchmark log file
        #[arg(long)]
        input: PathBuf,
        /// Number of parallel execution lanes in the analyzed run
        #[arg(long)]
        gpu: usize,
        /// Keep every Nth batch-size sample
        #[arg(long, default_value_t = config::DEFAULT_STRIDE)]
        stride: usize,
        /// Arrival-time file, one millisecond value per request id
        #[arg(long, default_value = config::DEFAULT_ARRIVAL_FILE)]
        arrival: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    logforge::logging::init_logging_from_env();
    let cli = Cli::parse();

    let (analysis, cfg) = match cli.command {
        Commands::Fast {
            input,
            gpu,
            chars_per_token,
        } => {
            let cfg = AnalyzerConfig::new(input, gpu).with_chars_per_token(chars_per_token);
            (analyze_fast(&cfg)?, cfg)
        }
        Commands::Flex {
            input,
            gpu,
            stride,
            arrival,
        } => {
            let cfg = AnalyzerConfig::new(input, gpu)
                .with_stride(stride)
                .with_arrival_path(arrival);
            (analyze_flex(&cfg)?, cfg)
        }
    };

    emit(&analysis, &cfg, cli.json)?;
    Ok(())
}

fn emit(analysis: &Analysis, cfg: &AnalyzerConfig, json: bool) -> anyhow::Result<()> {
    let paths = report::write_csvs(&cfg.output_dir(), cfg.num_gpu, analysis)?;
    tracing::info!(
        kernel = %paths.kernel.display(),
        latency = %paths.latency.display(),
        "per-record CSVs written"
    );
    report::print_summary(&analysis.report, json)?;
    Ok(())
}
