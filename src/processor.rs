//! Toll transaction processor
//!
//! Orchestrates one transaction attempt: resolve the vehicle, resolve the
//! rate for its class, attempt the charge, and append exactly one ledger
//! record (success or failure) before returning the outcome to lane
//! control. The processor holds no state of its own; it borrows the
//! registry, configuration and ledger injected at construction.

use crate::config::TollConfig;
use crate::error::Result;
use crate::ledger::{Ledger, TransactionLog};
use crate::registry::{ChargeError, VehicleRegistry};
use crate::types::{PaymentMethod, TransactionRecord, TransactionResult};
use chrono::Utc;

pub struct TollProcessor<'a, L: TransactionLog = Ledger> {
    registry: &'a mut VehicleRegistry,
    config: &'a TollConfig,
    ledger: &'a L,
}

impl<'a, L: TransactionLog> TollProcessor<'a, L> {
    pub fn new(
        registry: &'a mut VehicleRegistry,
        config: &'a TollConfig,
        ledger: &'a L,
    ) -> Self {
        Self {
            registry,
            config,
            ledger,
        }
    }

    /// Run one transaction attempt to its terminal logged state.
    ///
    /// Unregistered and insufficient-funds outcomes are recoverable and
    /// returned as typed results; only a ledger write failure propagates
    /// as an error, and it leaves every balance unchanged. The matching
    /// record is durably appended before this returns.
    pub fn process(
        &mut self,
        identifier: &str,
        method: PaymentMethod,
    ) -> Result<TransactionResult> {
        let class = match self.registry.lookup(identifier) {
            Some(vehicle) => vehicle.class,
            None => {
                self.ledger
                    .record_error(&format!("unregistered vehicle: {}", identifier))?;
                return Ok(TransactionResult::RejectedUnregistered);
            }
        };

        let rate = self.config.rate_for(class);

        match self.registry.charge(identifier, rate) {
            Ok(balance_remaining) => {
                let record = TransactionRecord {
                    timestamp: Utc::now(),
                    vehicle_id: identifier.to_string(),
                    payment_method: method,
                    amount: rate,
                    balance_remaining,
                };
                if let Err(e) = self.ledger.record_transaction(&record) {
                    // A balance may only stay decreased once its charge
                    // is durably logged; undo the decrement.
                    self.registry.top_up(identifier, rate);
                    return Err(e);
                }
                Ok(TransactionResult::Accepted {
                    amount: rate,
                    balance_remaining,
                })
            }
            Err(ChargeError::InsufficientFunds { balance, required }) => {
                self.ledger.record_error(&format!(
                    "insufficient balance for {} ({}): have {:.2}, need {:.2}",
                    identifier,
                    method.label(),
                    balance,
                    required
                ))?;
                Ok(TransactionResult::RejectedInsufficientFunds { balance, required })
            }
            // Unreachable while the registry is exclusively borrowed, but
            // the vehicle must still leave a trace if it ever happens.
            Err(ChargeError::NotFound(_)) => {
                self.ledger
                    .record_error(&format!("unregistered vehicle: {}", identifier))?;
                Ok(TransactionResult::RejectedUnregistered)
            }
        }
    }
}
