//! CLI definition using clap

use crate::layout::DEFAULT_BASE_DIR;
use crate::types::PaymentMethod;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for results
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Identifier provenance as given on the command line
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum IdentifierSource {
    /// Direct RFID tag read
    #[default]
    Rfid,
    /// Externally-performed plate recognition result
    Anpr,
}

impl std::fmt::Display for IdentifierSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdentifierSource::Rfid => write!(f, "rfid"),
            IdentifierSource::Anpr => write!(f, "anpr"),
        }
    }
}

impl From<IdentifierSource> for PaymentMethod {
    fn from(source: IdentifierSource) -> Self {
        match source {
            IdentifierSource::Rfid => PaymentMethod::Rfid,
            IdentifierSource::Anpr => PaymentMethod::AnprBilling,
        }
    }
}

#[derive(Parser)]
#[command(name = "tollgate")]
#[command(version)]
#[command(about = "Toll transaction processing for RFID and ANPR lanes")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Base directory for config, registry and logs
    #[arg(long, global = true, default_value = DEFAULT_BASE_DIR)]
    pub base_dir: PathBuf,

    /// Output format (table, json)
    #[arg(long, short = 'f', global = true, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Process one toll transaction for an identified vehicle
    Charge {
        /// RFID tag or recognized plate text
        identifier: String,

        /// How the identifier was obtained (rfid, anpr)
        #[arg(long, value_enum, default_value_t = IdentifierSource::Rfid)]
        method: IdentifierSource,
    },

    /// List registered vehicles
    Vehicles,

    /// Show one vehicle's balance
    Balance {
        /// RFID tag or plate text
        identifier: String,
    },

    /// Credit a vehicle's balance
    Topup {
        /// RFID tag or plate text
        identifier: String,

        /// Amount to credit
        amount: f64,
    },

    /// Show the effective configuration
    Config,
}
