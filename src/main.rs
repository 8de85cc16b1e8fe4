//! ethscription-scout - command line entry point
//!
//! Every command prints its result as JSON on stdout; logs go to stderr.

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use ethscription_scout::aggregate::aggregate;
use ethscription_scout::api::EthscriptionsClient;
use ethscription_scout::collector::PaginatedCollector;
use ethscription_scout::config::Config;
use ethscription_scout::error::{AppError, ValidationError};
use ethscription_scout::logging::init_tracing;
use ethscription_scout::models::ScanRange;
use ethscription_scout::payload::{MintPlan, TransferPlan};
use ethscription_scout::scanner::{AvailabilityScanner, ScanSettings};
use ethscription_scout::shutdown::{ctrl_c, until_interrupted};

/// ethscription-scout - find free ethscription ids and plan mints and transfers
#[derive(Parser, Debug)]
#[command(name = "ethscription-scout")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a YAML configuration file; the environment is used otherwise
    #[arg(short, long, env = "ETHSCRIPTION_SCOUT_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List ids in `start..=end` whose content is not inscribed yet
    Scan { start: u64, end: u64 },

    /// Group the mint tokens held by an owner
    Tokens { owner: String },

    /// Scan a range and plan mint transactions for the first free ids
    MintPlan {
        start: u64,
        end: u64,
        /// Number of ids to mint
        #[arg(long)]
        count: usize,
        /// Nonce of the first transaction
        #[arg(long, default_value_t = 0)]
        nonce: u64,
        /// Recipient of the mints; defaults to RECEIVER_ADDRESS, then the signer
        #[arg(long)]
        to: Option<String>,
    },

    /// Plan one batched transfer out of an owner's token group
    TransferPlan {
        owner: String,
        #[arg(long)]
        protocol: String,
        #[arg(long)]
        tick: String,
        /// Number of tokens to move
        #[arg(long)]
        count: usize,
        /// Recipient address
        #[arg(long)]
        to: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = load_config(&args)?;
    config.validate()?;

    init_tracing(&config.logging)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        network = ?config.network,
        api = %config.api_base_url(),
        "Starting ethscription-scout"
    );

    until_interrupted(run(args.command, &config), ctrl_c())
        .await
        .map_err(Into::into)
}

async fn run(command: Command, config: &Config) -> Result<(), AppError> {
    let client = EthscriptionsClient::from_config(config)?;

    match command {
        Command::Scan { start, end } => {
            let scanner = AvailabilityScanner::new(
                client,
                config.scription_template()?,
                ScanSettings::from(config),
            )?;
            let available = scanner.scan(ScanRange::new(start, end)?).await?;
            print_json(&available)
        }
        Command::Tokens { owner } => {
            let records = PaginatedCollector::from_config(client, config)
                .collect(&owner)
                .await?;
            print_json(&aggregate(&records))
        }
        Command::MintPlan {
            start,
            end,
            count,
            nonce,
            to,
        } => {
            let template = config.scription_template()?;
            let scanner =
                AvailabilityScanner::new(client, template.clone(), ScanSettings::from(config))?;
            let available = scanner.scan(ScanRange::new(start, end)?).await?;
            let to = to.or_else(|| config.mint.receiver_address.clone());
            print_json(&MintPlan::new(&template, &available, count, nonce, to)?)
        }
        Command::TransferPlan {
            owner,
            protocol,
            tick,
            count,
            to,
        } => {
            let records = PaginatedCollector::from_config(client, config)
                .collect(&owner)
                .await?;
            // An owner holding none of the tick has zero selectable tokens
            let group = aggregate(&records)
                .into_iter()
                .find(|g| g.matches(&protocol, &tick))
                .ok_or(ValidationError::InvalidCount {
                    count,
                    available: 0,
                })?;
            let plan =
                TransferPlan::new(&group, count, to)?.with_explorer_links(config.network);
            info!(ids = ?plan.ids, to = %plan.to, "Planned transfer");
            print_json(&plan)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::Internal(format!("Failed to encode output: {}", e)))?;
    println!("{}", json);
    Ok(())
}

/// Load configuration from file or environment
fn load_config(args: &Args) -> anyhow::Result<Config> {
    match &args.config {
        Some(path) => {
            // Use eprintln! since tracing is not yet initialized
            eprintln!("Loading configuration from file: {}", path);
            Config::from_file(path).map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
        }
        None => Config::from_env().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e)),
    }
}
