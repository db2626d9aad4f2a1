//! Tollgate Library
//!
//! Toll transaction processing: vehicle registry lookup, rate resolution
//! by vehicle class, balance charging with insufficient-funds handling,
//! and durable, ordered transaction/error logging. Identity capture
//! (RFID hardware, plate recognition) lives outside this crate; callers
//! hand the processor an identifier string and its provenance.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod layout;
pub mod ledger;
pub mod output;
pub mod processor;
pub mod registry;
pub mod types;

pub use config::{TollConfig, TollRateTable, FALLBACK_RATE};
pub use error::{Error, Result};
pub use layout::FileLayout;
pub use ledger::{Ledger, TransactionLog};
pub use processor::TollProcessor;
pub use registry::{ChargeError, VehicleRegistry};
pub use types::{PaymentMethod, TransactionRecord, TransactionResult, Vehicle, VehicleClass};
