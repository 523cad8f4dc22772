//! CLI for the MEV sandwich attack dashboard.

use clap::{Parser, Subcommand, ValueEnum};
use mev_inspector_dashboard::config::{
    DEFAULT_LOG_PATH, DEFAULT_REFRESH_INTERVAL_SECS, DEFAULT_TOP_BOTS,
};
use mev_inspector_dashboard::export::write_csv;
use mev_inspector_dashboard::{
    DashboardConfig, JsonRenderer, OutputFormat, RefreshLoop, SummaryRenderer, TerminalRenderer,
    TokioSleeper,
};
use mev_inspector_telemetry::{init_logging, serve_metrics, LogFormat, Metrics};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "mev-inspector")]
#[command(about = "Live dashboard for sandwich attacks recorded by the MEV detector")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Terminal,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Terminal => OutputFormat::Terminal,
            Format::Json => OutputFormat::Json,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum LogStyle {
    Json,
    Pretty,
}

impl From<LogStyle> for LogFormat {
    fn from(style: LogStyle) -> Self {
        match style {
            LogStyle::Json => LogFormat::Json,
            LogStyle::Pretty => LogFormat::Pretty,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Refresh the dashboard until interrupted
    Watch {
        /// Event log written by the detector
        #[arg(long, env = "OUTPUT_FILE", default_value = DEFAULT_LOG_PATH)]
        log_path: PathBuf,

        /// Refresh interval in seconds
        #[arg(long, default_value_t = DEFAULT_REFRESH_INTERVAL_SECS)]
        refresh_interval_seconds: u64,

        /// Number of bots on the leaderboard
        #[arg(long, default_value_t = DEFAULT_TOP_BOTS)]
        top_n: usize,

        /// Output format
        #[arg(long, value_enum, default_value = "terminal")]
        format: Format,

        /// Draw on the main screen instead of the alternate screen
        #[arg(long, default_value = "false")]
        no_alternate_screen: bool,

        /// Log level
        #[arg(long)]
        log_level: Option<String>,

        /// Log line format, written to stderr
        #[arg(long, value_enum, default_value = "json")]
        log_format: LogStyle,

        /// Metrics bind address, e.g. 0.0.0.0:9090
        #[arg(long)]
        metrics_bind_address: Option<String>,

        /// Append a JSON snapshot of every refresh to this file
        #[arg(long)]
        snapshot_output_path: Option<PathBuf>,
    },
    /// Print the dashboard once and exit
    Summary {
        /// Event log written by the detector
        #[arg(long, env = "OUTPUT_FILE", default_value = DEFAULT_LOG_PATH)]
        log_path: PathBuf,

        /// Number of bots on the leaderboard
        #[arg(long, default_value_t = DEFAULT_TOP_BOTS)]
        top_n: usize,

        /// Output format
        #[arg(long, value_enum, default_value = "terminal")]
        format: Format,

        /// Log level
        #[arg(long)]
        log_level: Option<String>,

        /// Log line format, written to stderr
        #[arg(long, value_enum, default_value = "json")]
        log_format: LogStyle,

        /// Export the latest attacks table as CSV
        #[arg(long)]
        csv_output: Option<PathBuf>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Watch {
            log_path,
            refresh_interval_seconds,
            top_n,
            format,
            no_alternate_screen,
            log_level,
            log_format,
            metrics_bind_address,
            snapshot_output_path,
        } => {
            init_logging(log_level.as_deref(), log_format.into())?;
            let config = DashboardConfig {
                log_path,
                refresh_interval_secs: refresh_interval_seconds,
                top_n,
                format: format.into(),
                alternate_screen: !no_alternate_screen,
                metrics_bind_address,
                snapshot_output_path,
            };
            run_dashboard(config).await?;
        }
        Commands::Summary {
            log_path,
            top_n,
            format,
            log_level,
            log_format,
            csv_output,
        } => {
            init_logging(log_level.as_deref(), log_format.into())?;
            let config = DashboardConfig {
                log_path,
                top_n,
                format: format.into(),
                alternate_screen: false,
                ..DashboardConfig::default()
            };
            print_summary(&config, csv_output)?;
        }
    }

    Ok(())
}

fn build_renderer(config: &DashboardConfig) -> anyhow::Result<Box<dyn SummaryRenderer>> {
    let renderer: Box<dyn SummaryRenderer> = match config.format {
        OutputFormat::Terminal => Box::new(TerminalRenderer::stdout(config.alternate_screen)?),
        OutputFormat::Json => Box::new(JsonRenderer::stdout()),
    };
    Ok(renderer)
}

async fn run_dashboard(config: DashboardConfig) -> anyhow::Result<()> {
    info!("Starting MEV inspector dashboard");
    info!("Configuration loaded: {:?}", config);

    let mut refresh = RefreshLoop::from_config(&config, build_renderer(&config)?, TokioSleeper);

    if let Some(addr) = &config.metrics_bind_address {
        let metrics = Metrics::new()?;
        serve_metrics(addr, metrics.clone()).await?;
        refresh = refresh.with_metrics(metrics);
    }

    tokio::select! {
        result = refresh.run() => {
            result?;
        }
        signal = tokio::signal::ctrl_c() => {
            signal?;
            info!("Shutdown signal received");
        }
    }

    Ok(())
}

fn print_summary(config: &DashboardConfig, csv_output: Option<PathBuf>) -> anyhow::Result<()> {
    let mut refresh = RefreshLoop::from_config(config, build_renderer(config)?, TokioSleeper);
    let report = refresh.tick()?;

    if let Some(path) = csv_output {
        write_csv(&report.summary.latest_records, &path)?;
    }

    Ok(())
}
