//! Vehicle registry: identifier lookup and balance mutation
//!
//! Loaded once at startup from a CSV source with header
//! `plate,rfid,balance,type`. Vehicles are keyed by RFID tag with the
//! plate kept as a secondary lookup key. The registry exclusively owns
//! all vehicle records for the process lifetime; `charge` is the single
//! synchronization point for balance mutation.

use crate::types::{Vehicle, VehicleClass};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// Typed rejection from [`VehicleRegistry::charge`]. Both variants are
/// recoverable business outcomes, not process errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChargeError {
    #[error("vehicle not registered: {0}")]
    NotFound(String),

    #[error("insufficient balance: have {balance:.2}, need {required:.2}")]
    InsufficientFunds { balance: f64, required: f64 },
}

/// Result of loading the registry from disk.
///
/// A load only hard-fails when the source is entirely unreadable, and even
/// then the caller gets a usable (empty, degraded) registry plus the error
/// to surface through collaborator logging.
#[derive(Debug)]
pub struct RegistryLoad {
    pub registry: VehicleRegistry,
    /// Malformed rows skipped during the load
    pub skipped_rows: usize,
    /// Set when the source could not be opened at all
    pub source_error: Option<String>,
}

/// In-memory vehicle registry
#[derive(Debug, Default)]
pub struct VehicleRegistry {
    /// Keyed by RFID tag
    vehicles: HashMap<String, Vehicle>,
    /// plate -> rfid secondary index
    plate_index: HashMap<String, String>,
}

impl VehicleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the registry from a CSV file
    pub fn load(path: &Path) -> RegistryLoad {
        match File::open(path) {
            Ok(file) => {
                let (registry, skipped_rows) = Self::from_reader(file);
                RegistryLoad {
                    registry,
                    skipped_rows,
                    source_error: None,
                }
            }
            Err(e) => RegistryLoad {
                registry: Self::new(),
                skipped_rows: 0,
                source_error: Some(format!(
                    "could not open registered vehicles file {}: {}",
                    path.display(),
                    e
                )),
            },
        }
    }

    /// Parse `plate,rfid,balance,type` rows. Malformed rows (missing
    /// field, empty key, non-numeric or negative balance) are skipped and
    /// counted; they never fail the load.
    pub fn from_reader<R: Read>(reader: R) -> (Self, usize) {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut registry = Self::new();
        let mut skipped = 0;

        for result in csv_reader.records() {
            let Ok(record) = result else {
                skipped += 1;
                continue;
            };
            match parse_row(&record) {
                Some(vehicle) => registry.insert(vehicle),
                None => skipped += 1,
            }
        }

        (registry, skipped)
    }

    /// Insert or replace a vehicle. Duplicate RFID keys keep the last
    /// inserted record as canonical.
    pub fn insert(&mut self, vehicle: Vehicle) {
        if let Some(previous) = self.vehicles.get(&vehicle.rfid_tag) {
            self.plate_index.remove(&previous.plate);
        }
        self.plate_index
            .insert(vehicle.plate.clone(), vehicle.rfid_tag.clone());
        self.vehicles.insert(vehicle.rfid_tag.clone(), vehicle);
    }

    /// Resolve an identifier: RFID key first, then plate
    pub fn lookup(&self, identifier: &str) -> Option<&Vehicle> {
        if let Some(vehicle) = self.vehicles.get(identifier) {
            return Some(vehicle);
        }
        self.plate_index
            .get(identifier)
            .and_then(|rfid| self.vehicles.get(rfid))
    }

    /// Atomically charge a vehicle: the balance is decreased only if it
    /// covers the amount, otherwise nothing is mutated. Exclusive access
    /// through `&mut self` makes the read-check-write sequence atomic.
    pub fn charge(&mut self, identifier: &str, amount: f64) -> Result<f64, ChargeError> {
        let rfid = self
            .resolve_key(identifier)
            .ok_or_else(|| ChargeError::NotFound(identifier.to_string()))?;
        let vehicle = self
            .vehicles
            .get_mut(&rfid)
            .ok_or_else(|| ChargeError::NotFound(identifier.to_string()))?;

        if vehicle.balance < amount {
            return Err(ChargeError::InsufficientFunds {
                balance: vehicle.balance,
                required: amount,
            });
        }

        vehicle.balance -= amount;
        Ok(vehicle.balance)
    }

    /// Credit a balance, returning the new balance. Part of the registry
    /// contract; not reachable from detection logic.
    pub fn top_up(&mut self, identifier: &str, amount: f64) -> Option<f64> {
        let rfid = self.resolve_key(identifier)?;
        let vehicle = self.vehicles.get_mut(&rfid)?;
        vehicle.balance += amount;
        Some(vehicle.balance)
    }

    /// Write the registry back in its CSV source form
    pub fn save(&self, path: &Path) -> crate::error::Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(["plate", "rfid", "balance", "type"])?;
        for vehicle in self.vehicles_sorted() {
            let balance = vehicle.balance.to_string();
            writer.write_record([
                vehicle.plate.as_str(),
                vehicle.rfid_tag.as_str(),
                balance.as_str(),
                vehicle.class.label(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }

    /// All vehicles, sorted by plate for stable output
    pub fn vehicles_sorted(&self) -> Vec<&Vehicle> {
        let mut vehicles: Vec<_> = self.vehicles.values().collect();
        vehicles.sort_by(|a, b| a.plate.cmp(&b.plate));
        vehicles
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    fn resolve_key(&self, identifier: &str) -> Option<String> {
        if self.vehicles.contains_key(identifier) {
            return Some(identifier.to_string());
        }
        self.plate_index.get(identifier).cloned()
    }
}

fn parse_row(record: &csv::StringRecord) -> Option<Vehicle> {
    let plate = record.get(0)?;
    let rfid = record.get(1)?;
    let balance: f64 = record.get(2)?.parse().ok()?;
    let class = VehicleClass::parse(record.get(3)?);

    if plate.is_empty() || rfid.is_empty() || balance < 0.0 {
        return None;
    }

    Some(Vehicle::new(
        plate.to_string(),
        rfid.to_string(),
        class,
        balance,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_CSV: &str = "\
plate,rfid,balance,type
ABC123,RF1,100.0,car
XYZ789,RF2,20.0,truck
BUS001,RF3,500.0,bus
";

    fn test_registry() -> VehicleRegistry {
        let (registry, skipped) = VehicleRegistry::from_reader(TEST_CSV.as_bytes());
        assert_eq!(skipped, 0);
        registry
    }

    #[test]
    fn test_load_counts() {
        let registry = test_registry();
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_lookup_by_rfid_and_plate() {
        let registry = test_registry();
        assert_eq!(registry.lookup("RF1").unwrap().plate, "ABC123");
        assert_eq!(registry.lookup("ABC123").unwrap().rfid_tag, "RF1");
        assert!(registry.lookup("UNKNOWN123").is_none());
    }

    #[test]
    fn test_malformed_rows_skipped() {
        let csv = "\
plate,rfid,balance,type
ABC123,RF1,100.0,car
BADROW,RF9,not-a-number,car
,RF8,50.0,car
XYZ789,RF2,20.0,truck
";
        let (registry, skipped) = VehicleRegistry::from_reader(csv.as_bytes());
        assert_eq!(registry.len(), 2);
        assert_eq!(skipped, 2);
    }

    #[test]
    fn test_negative_balance_row_skipped() {
        let csv = "plate,rfid,balance,type\nABC123,RF1,-10.0,car\n";
        let (registry, skipped) = VehicleRegistry::from_reader(csv.as_bytes());
        assert!(registry.is_empty());
        assert_eq!(skipped, 1);
    }

    #[test]
    fn test_unrecognized_class_becomes_unknown() {
        let csv = "plate,rfid,balance,type\nABC123,RF1,100.0,hovercraft\n";
        let (registry, _) = VehicleRegistry::from_reader(csv.as_bytes());
        assert_eq!(registry.lookup("RF1").unwrap().class, VehicleClass::Unknown);
    }

    #[test]
    fn test_duplicate_rfid_last_row_wins() {
        let csv = "\
plate,rfid,balance,type
OLD111,RF1,10.0,car
NEW222,RF1,90.0,truck
";
        let (registry, _) = VehicleRegistry::from_reader(csv.as_bytes());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("RF1").unwrap().plate, "NEW222");
        // Stale plate no longer resolves
        assert!(registry.lookup("OLD111").is_none());
        assert_eq!(registry.lookup("NEW222").unwrap().rfid_tag, "RF1");
    }

    #[test]
    fn test_load_idempotent() {
        let (first, _) = VehicleRegistry::from_reader(TEST_CSV.as_bytes());
        let (second, _) = VehicleRegistry::from_reader(TEST_CSV.as_bytes());
        assert_eq!(first.len(), second.len());
        for vehicle in first.vehicles_sorted() {
            let other = second.lookup(&vehicle.rfid_tag).unwrap();
            assert_eq!(other.plate, vehicle.plate);
            assert_eq!(other.balance, vehicle.balance);
            assert_eq!(other.class, vehicle.class);
        }
    }

    #[test]
    fn test_charge_success() {
        let mut registry = test_registry();
        let balance = registry.charge("RF1", 50.0).unwrap();
        assert_eq!(balance, 50.0);
        assert_eq!(registry.lookup("RF1").unwrap().balance, 50.0);
    }

    #[test]
    fn test_charge_by_plate() {
        let mut registry = test_registry();
        let balance = registry.charge("ABC123", 25.0).unwrap();
        assert_eq!(balance, 75.0);
    }

    #[test]
    fn test_charge_exact_balance() {
        let mut registry = test_registry();
        let balance = registry.charge("RF2", 20.0).unwrap();
        assert_eq!(balance, 0.0);
    }

    #[test]
    fn test_charge_insufficient_leaves_balance_untouched() {
        let mut registry = test_registry();
        let err = registry.charge("RF2", 100.0).unwrap_err();
        assert_eq!(
            err,
            ChargeError::InsufficientFunds {
                balance: 20.0,
                required: 100.0
            }
        );
        assert_eq!(registry.lookup("RF2").unwrap().balance, 20.0);
    }

    #[test]
    fn test_charge_not_found() {
        let mut registry = test_registry();
        let err = registry.charge("UNKNOWN123", 50.0).unwrap_err();
        assert_eq!(err, ChargeError::NotFound("UNKNOWN123".to_string()));
    }

    #[test]
    fn test_top_up() {
        let mut registry = test_registry();
        assert_eq!(registry.top_up("RF2", 30.0), Some(50.0));
        assert_eq!(registry.top_up("UNKNOWN123", 30.0), None);
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registered_vehicles.csv");

        let mut registry = test_registry();
        registry.charge("RF1", 50.0).unwrap();
        registry.save(&path).unwrap();

        let loaded = VehicleRegistry::load(&path);
        assert!(loaded.source_error.is_none());
        assert_eq!(loaded.registry.len(), 3);
        assert_eq!(loaded.registry.lookup("RF1").unwrap().balance, 50.0);
        assert_eq!(
            loaded.registry.lookup("RF3").unwrap().class,
            VehicleClass::Bus
        );
    }

    #[test]
    fn test_load_missing_file_degrades_to_empty() {
        let load = VehicleRegistry::load(Path::new("/nonexistent/vehicles.csv"));
        assert!(load.registry.is_empty());
        assert!(load.source_error.is_some());
    }
}
