//! Command handlers

use crate::cli::{Cli, Commands};
use crate::config::TollConfig;
use crate::error::{Error, Result};
use crate::layout::FileLayout;
use crate::ledger::{Ledger, TransactionLog};
use crate::output;
use crate::processor::TollProcessor;
use crate::registry::VehicleRegistry;
use crate::types::PaymentMethod;

/// Execute CLI command
pub fn execute(cli: Cli) -> Result<()> {
    let layout = FileLayout::new(&cli.base_dir);
    layout.bootstrap()?;

    match &cli.command {
        Commands::Charge { identifier, method } => {
            cmd_charge(&cli, &layout, identifier, (*method).into())
        }
        Commands::Vehicles => cmd_vehicles(&cli, &layout),
        Commands::Balance { identifier } => cmd_balance(&cli, &layout, identifier),
        Commands::Topup { identifier, amount } => cmd_topup(&cli, &layout, identifier, *amount),
        Commands::Config => cmd_config(&cli, &layout),
    }
}

/// Load the registry, surfacing load problems through the ledger's error
/// log. An unreadable source degrades to an empty registry rather than
/// failing the lane.
fn load_registry(layout: &FileLayout, ledger: &Ledger) -> Result<VehicleRegistry> {
    let load = VehicleRegistry::load(&layout.registry_file());
    if let Some(ref message) = load.source_error {
        ledger.record_error(message)?;
    }
    if load.skipped_rows > 0 {
        ledger.record_error(&format!(
            "skipped {} malformed row(s) in {}",
            load.skipped_rows,
            layout.registry_file().display()
        ))?;
    }
    Ok(load.registry)
}

fn cmd_charge(
    cli: &Cli,
    layout: &FileLayout,
    identifier: &str,
    method: PaymentMethod,
) -> Result<()> {
    let ledger = Ledger::open(&layout.transaction_log(), &layout.error_log())?;
    let config = TollConfig::load(&layout.config_file());
    let mut registry = load_registry(layout, &ledger)?;

    let mut processor = TollProcessor::new(&mut registry, &config, &ledger);
    let result = processor.process(identifier, method)?;

    if result.is_accepted() {
        registry.save(&layout.registry_file())?;
    }

    output::output_transaction(cli.format, identifier, &result)
}

fn cmd_vehicles(cli: &Cli, layout: &FileLayout) -> Result<()> {
    let ledger = Ledger::open(&layout.transaction_log(), &layout.error_log())?;
    let registry = load_registry(layout, &ledger)?;
    output::output_vehicles(cli.format, &registry.vehicles_sorted())
}

fn cmd_balance(cli: &Cli, layout: &FileLayout, identifier: &str) -> Result<()> {
    let ledger = Ledger::open(&layout.transaction_log(), &layout.error_log())?;
    let registry = load_registry(layout, &ledger)?;
    let vehicle = registry
        .lookup(identifier)
        .ok_or_else(|| Error::VehicleNotFound(identifier.to_string()))?;
    output::output_vehicle(cli.format, vehicle)
}

fn cmd_topup(cli: &Cli, layout: &FileLayout, identifier: &str, amount: f64) -> Result<()> {
    if amount <= 0.0 {
        return Err(Error::InvalidAmount(format!(
            "top-up amount must be positive, got {}",
            amount
        )));
    }

    let ledger = Ledger::open(&layout.transaction_log(), &layout.error_log())?;
    let mut registry = load_registry(layout, &ledger)?;

    registry
        .top_up(identifier, amount)
        .ok_or_else(|| Error::VehicleNotFound(identifier.to_string()))?;
    registry.save(&layout.registry_file())?;

    let vehicle = registry
        .lookup(identifier)
        .ok_or_else(|| Error::VehicleNotFound(identifier.to_string()))?;
    output::output_vehicle(cli.format, vehicle)
}

fn cmd_config(cli: &Cli, layout: &FileLayout) -> Result<()> {
    let config = TollConfig::load(&layout.config_file());
    output::output_config(cli.format, &config)
}
