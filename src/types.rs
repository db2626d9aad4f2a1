//! Core types for toll transaction processing

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Vehicle class used for rate resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleClass {
    Car,
    Truck,
    Bus,
    /// Any class string the registry source does not recognize.
    /// Billed at the fallback rate rather than rejected.
    Unknown,
}

impl VehicleClass {
    /// Parse a registry `type` column value. Unrecognized values map to
    /// `Unknown` so a bad class never blocks a lane.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "car" => VehicleClass::Car,
            "truck" => VehicleClass::Truck,
            "bus" => VehicleClass::Bus,
            _ => VehicleClass::Unknown,
        }
    }

    /// Label used in the registry CSV and display output
    pub fn label(&self) -> &'static str {
        match self {
            VehicleClass::Car => "car",
            VehicleClass::Truck => "truck",
            VehicleClass::Bus => "bus",
            VehicleClass::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for VehicleClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// How the vehicle identifier reached the processor.
///
/// The processor is agnostic to provenance; the method is recorded in the
/// ledger so billing can distinguish tag reads from plate recognition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    Rfid,
    AnprBilling,
}

impl PaymentMethod {
    /// Label written to the transaction log
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Rfid => "rfid",
            PaymentMethod::AnprBilling => "anpr-billing",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One registered vehicle account
#[derive(Debug, Clone, Serialize)]
pub struct Vehicle {
    /// License plate text, unique within the registry
    pub plate: String,
    /// RFID tag, unique primary identifier
    pub rfid_tag: String,
    /// Class used for rate resolution
    pub class: VehicleClass,
    /// Prepaid balance. Decreased only by a charge that has already been
    /// durably logged, increased only by an explicit top-up.
    pub balance: f64,
}

impl Vehicle {
    pub fn new(plate: String, rfid_tag: String, class: VehicleClass, balance: f64) -> Self {
        Self {
            plate,
            rfid_tag,
            class,
            balance,
        }
    }
}

/// One durable row in the transaction log. Immutable once written.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionRecord {
    pub timestamp: DateTime<Utc>,
    /// The identifier as supplied by the lane, RFID tag or plate text
    pub vehicle_id: String,
    pub payment_method: PaymentMethod,
    pub amount: f64,
    pub balance_remaining: f64,
}

/// Outcome of a single transaction attempt, returned to lane control.
///
/// All three variants are valid lane results; rejections are recoverable
/// outcomes, not errors.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum TransactionResult {
    Accepted {
        amount: f64,
        balance_remaining: f64,
    },
    RejectedUnregistered,
    RejectedInsufficientFunds {
        balance: f64,
        required: f64,
    },
}

impl TransactionResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, TransactionResult::Accepted { .. })
    }
}
