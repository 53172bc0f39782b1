//! # Procura CLI Library
//!
//! Application shell around `procura-core`: configuration, logging, editing
//! state and the command layer. The `procura` binary is a thin wrapper that
//! parses arguments and prints what [`run`] returns.
//!
//! ## Module Organization
//! ```text
//! procura_cli/
//! ├── lib.rs            ◄─── You are here (CLI definition & dispatch)
//! ├── config.rs         ◄─── AppConfig: defaults → procura.toml → env
//! ├── error.rs          ◄─── API error type for commands
//! ├── rates.rs          ◄─── Live + fallback rate resolution
//! ├── state/
//! │   ├── mod.rs        ◄─── State type exports
//! │   ├── registry.rs   ◄─── Composition registry (Arc<Mutex>)
//! │   └── quotation.rs  ◄─── Open quotation (Arc<Mutex>)
//! └── commands/
//!     ├── mod.rs        ◄─── Command exports
//!     ├── kit.rs        ◄─── Recipe edits & kit evaluation
//!     ├── quotation.rs  ◄─── Quotation line edits
//!     └── shipment.rs   ◄─── Container allocation
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod rates;
pub mod state;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use procura_core::{CompositeProduct, CompositionRegistry, InventorySnapshot};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::info;
use tracing_subscriber::EnvFilter;

use commands::quotation::QuotationDocument;
use config::AppConfig;
use error::ApiError;
use state::RegistryState;

// =============================================================================
// Command Line
// =============================================================================

/// Kit availability, quotation totals and container allocation.
#[derive(Debug, Parser)]
#[command(name = "procura", version, about)]
pub struct Cli {
    /// Config file (defaults to procura.toml in the platform config dir)
    #[arg(long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Evaluate kit availability and cost
    Kit {
        /// JSON array of composite products
        #[arg(long, value_hint = clap::ValueHint::FilePath)]
        recipes: PathBuf,
        /// JSON stock/cost snapshot: {"stock": {...}, "costs": {...}}
        #[arg(long, value_hint = clap::ValueHint::FilePath)]
        snapshot: Option<PathBuf>,
        /// Only evaluate this composite
        #[arg(long)]
        sku: Option<String>,
        /// Also report component shortfall for this many kits (needs --sku)
        #[arg(long, requires = "sku")]
        target: Option<u64>,
    },
    /// Compute quotation totals and allocate them to containers
    Quote {
        /// JSON quotation document
        #[arg(long, value_hint = clap::ValueHint::FilePath)]
        input: PathBuf,
        /// Container code (overrides the document and config)
        #[arg(long)]
        container: Option<String>,
    },
    /// Allocate an explicit cargo volume and weight
    Ship {
        /// Total volume in m³
        #[arg(long)]
        volume: f64,
        /// Total weight in kg
        #[arg(long, default_value_t = 0.0)]
        weight: f64,
        /// Container code
        #[arg(long)]
        container: Option<String>,
    },
    /// List the container catalog
    Containers,
}

// =============================================================================
// Entry Points
// =============================================================================

/// Initializes the tracing subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=procura=trace` - Show trace for procura crates only
/// - Default: `info,procura=debug`
///
/// Logs go to stderr so stdout carries only JSON.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,procura=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads config and executes one command, returning its JSON result.
pub fn run(cli: Cli) -> Result<Value, ApiError> {
    let config = AppConfig::load(cli.config)?;
    info!(
        container = %config.shipment.default_container,
        base = %config.currency.base,
        secondary = %config.currency.secondary,
        "Configuration loaded"
    );
    execute(&config, cli.command)
}

/// Executes one command against an already loaded config.
pub fn execute(config: &AppConfig, command: Command) -> Result<Value, ApiError> {
    match command {
        Command::Kit {
            recipes,
            snapshot,
            sku,
            target,
        } => {
            let composites: Vec<CompositeProduct> = read_json(&recipes)?;
            let registry = RegistryState::from_registry(CompositionRegistry::from_composites(composites)?);
            let snapshot: InventorySnapshot = match snapshot {
                Some(path) => read_json(&path)?,
                None => InventorySnapshot::default(),
            };

            match sku {
                Some(sku) => {
                    let report = commands::kit::evaluate_composite(&registry, &sku, &snapshot)?;
                    let shortfall = target
                        .map(|t| commands::kit::composite_shortfall(&registry, &sku, &snapshot, t))
                        .transpose()?;
                    Ok(json!({ "report": report, "shortfall": shortfall }))
                }
                None => Ok(json!(commands::kit::evaluate_all(&registry, &snapshot))),
            }
        }
        Command::Quote { input, container } => {
            let document: QuotationDocument = read_json(&input)?;
            let container = container.or_else(|| document.container.clone());
            let quotation = commands::quotation::open_quotation(config, document)?;
            let allocation = commands::shipment::allocate_quotation(config, &quotation, container.as_deref())?;
            Ok(json!({
                "quotation": commands::quotation::get_quotation(&quotation),
                "allocation": allocation,
            }))
        }
        Command::Ship {
            volume,
            weight,
            container,
        } => Ok(json!(commands::shipment::allocate_shipment(
            config,
            volume,
            weight,
            container.as_deref()
        )?)),
        Command::Containers => Ok(json!(commands::shipment::list_containers())),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ApiError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}
