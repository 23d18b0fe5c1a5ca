use std::process::ExitCode;

use clap::Parser;
use logpruner::{
    cluster::HttpClusterClient,
    config::{ConfigError, PrunerConfig},
    observability, prune,
};

/// CLI arguments for the index pruner.
#[derive(Parser, Debug)]
#[command(version, about = "Retention pruner for date-suffixed search indices", long_about = None)]
struct Args {
    /// Path to a TOML config file. Without it, configuration is read from
    /// the ES_URL, ES_USERNAME, ES_PASSWORD, DRY_RUN and
    /// INDEX_AGE_LIMIT_DAYS environment variables.
    #[arg(short, long)]
    config: Option<String>,

    /// Force a dry run regardless of the configured value.
    #[arg(long)]
    dry_run: bool,

    /// Override the configured retention window, in days.
    #[arg(long)]
    age_limit_days: Option<u32>,
}

fn load_config(args: &Args) -> Result<PrunerConfig, ConfigError> {
    match &args.config {
        Some(path) => PrunerConfig::from_file(path),
        None => PrunerConfig::from_env(),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let mut config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    // --dry-run can force dry-run on, never off.
    if args.dry_run {
        config.retention.dry_run = true;
    }
    if let Some(days) = args.age_limit_days {
        config.retention.age_limit_days = days;
    }

    observability::init_tracing(&config.logging);

    let cluster = match HttpClusterClient::from_config(&config.cluster) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match prune::run_prune(&cluster, &config.retention).await {
        Ok(result) => {
            print!("{}", prune::render_summary(&result));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Prune run failed: {e}");
            ExitCode::FAILURE
        }
    }
}
