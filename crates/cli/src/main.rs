//! Spot instance advisor CLI
//!
//! Recommends cost-efficient spot instance types by combining instance
//! metadata with historical spot market pricing, ranking candidates by
//! relative discount and price stability.

mod client;
mod commands;
mod config;
mod output;

use advisor_lib::AnalysisConfig;
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use output::OutputFormat;

const DEFAULT_API_URL: &str = "http://localhost:8080";
const DEFAULT_REGION: &str = "cn-hangzhou";

/// Spot instance advisor CLI
#[derive(Parser)]
#[command(name = "spot-advisor")]
#[command(author, version, about = "Advisor for cost-efficient spot instance types", long_about = None)]
pub struct Cli {
    /// Pricing API endpoint URL (can also be set via SPOT_API_URL env var)
    #[arg(long, env = "SPOT_API_URL")]
    pub api_url: Option<String>,

    /// Region whose spot market is analyzed
    #[arg(long, env = "SPOT_REGION")]
    pub region: Option<String>,

    /// Output format
    #[arg(long, short)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output
    #[arg(long, short)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank spot prices for eligible instance types
    Advise(AdviseArgs),

    /// List eligible instance types without fetching prices
    Types(FilterArgs),
}

#[derive(Args)]
pub struct FilterArgs {
    /// Minimum core count
    #[arg(long, default_value_t = 1)]
    pub min_cores: u32,

    /// Maximum core count
    #[arg(long, default_value_t = 32)]
    pub max_cores: u32,

    /// Minimum memory in GB
    #[arg(long, default_value_t = 2.0)]
    pub min_memory: f64,

    /// Maximum memory in GB
    #[arg(long, default_value_t = 64.0)]
    pub max_memory: f64,

    /// Comma-separated instance family substrings (e.g. ecs.n1,ecs.n2)
    #[arg(long, default_value = "")]
    pub family: String,

    /// CPU architecture filter: x86_64 or arm64 (blank = no filter)
    #[arg(long, default_value = "")]
    pub arch: String,
}

#[derive(Args)]
pub struct AdviseArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Discount cutoff separating favorable from unfavorable records
    #[arg(long, default_value_t = 2.0)]
    pub cutoff: f64,

    /// Maximum number of ranked records to output
    #[arg(long, default_value_t = 20)]
    pub limit: i64,

    /// Price history window in days
    #[arg(long, default_value_t = 7)]
    pub lookback_days: i64,
}

impl FilterArgs {
    fn apply(&self, config: &mut AnalysisConfig) {
        config.min_cores = self.min_cores;
        config.max_cores = self.max_cores;
        config.min_memory_gb = self.min_memory;
        config.max_memory_gb = self.max_memory;
        config.families = self.family.split(',').map(str::to_string).collect();
        config.arch = self.arch.clone();
    }
}

impl From<&AdviseArgs> for AnalysisConfig {
    fn from(args: &AdviseArgs) -> Self {
        let mut config = AnalysisConfig {
            discount_cutoff: args.cutoff,
            result_limit: args.limit,
            lookback_days: args.lookback_days,
            ..Default::default()
        };
        args.filter.apply(&mut config);
        config
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let file_config = config::Config::load().unwrap_or_else(|error| {
        warn!(error = %error, "Ignoring unreadable config file");
        config::Config::default()
    });

    let api_url = cli
        .api_url
        .or(file_config.api_url.clone())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let region = cli
        .region
        .or(file_config.default_region.clone())
        .unwrap_or_else(|| DEFAULT_REGION.to_string());
    let format = cli
        .format
        .or_else(|| file_config.output_format())
        .unwrap_or_default();

    if let Err(error) = run(cli.command, &api_url, &region, format).await {
        match format {
            OutputFormat::Json => {
                println!(
                    "{:#}",
                    serde_json::json!({ "error": format!("{error:#}") })
                );
            }
            OutputFormat::Table => output::print_error(&format!("{error:#}")),
        }
        std::process::exit(1);
    }
}

async fn run(command: Commands, api_url: &str, region: &str, format: OutputFormat) -> Result<()> {
    let client = client::PricingApiClient::new(api_url, region)?;

    match command {
        Commands::Advise(args) => {
            let config = AnalysisConfig::from(&args);
            commands::advise::run(client, config, format).await
        }
        Commands::Types(args) => {
            let mut config = AnalysisConfig::default();
            args.apply(&mut config);
            commands::types::run(client, config, format).await
        }
    }
}

/// Route tracing output to stderr so stdout carries only command output
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
