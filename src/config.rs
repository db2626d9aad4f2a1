//! Configuration store for toll rates and device parameters
//!
//! Config stored as `key=value` lines at `<base>/config/config.txt`.
//! A missing or unreadable source is not an error: the store synthesizes
//! the documented defaults and writes them out so the rate table is
//! always usable, including on first run.

use crate::types::VehicleClass;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Rate applied when a vehicle's class has no entry in the rate table
/// (the `unknown` class). Degraded billing is preferable to a stalled
/// toll lane, so this is a charge, not a rejection.
pub const FALLBACK_RATE: f64 = 50.0;

/// Toll rates by vehicle class
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TollRateTable {
    pub car: f64,
    pub truck: f64,
    pub bus: f64,
}

impl Default for TollRateTable {
    fn default() -> Self {
        Self {
            car: 50.0,
            truck: 100.0,
            bus: 75.0,
        }
    }
}

impl TollRateTable {
    /// Resolve the rate for a vehicle class. `Unknown` resolves to
    /// [`FALLBACK_RATE`].
    pub fn rate_for(&self, class: VehicleClass) -> f64 {
        match class {
            VehicleClass::Car => self.car,
            VehicleClass::Truck => self.truck,
            VehicleClass::Bus => self.bus,
            VehicleClass::Unknown => FALLBACK_RATE,
        }
    }
}

/// Camera parameters. Irrelevant to transaction processing but kept so
/// config files shared with the imaging collaborator round-trip intact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CameraSettings {
    pub resolution_width: u32,
    pub resolution_height: u32,
    pub fps: u32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            resolution_width: 1920,
            resolution_height: 1080,
            fps: 30,
        }
    }
}

/// System configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TollConfig {
    pub rates: TollRateTable,
    pub camera: CameraSettings,
}

impl TollConfig {
    /// Load config from a `key=value` file, or synthesize and persist the
    /// defaults when the file is missing or unreadable.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => Self::parse(&content),
            Err(_) => {
                let config = Self::default();
                // First run: persist the defaults. An unwritable config
                // dir still yields a usable in-memory rate table.
                if let Err(e) = config.save(path) {
                    eprintln!("Warning: could not persist default config: {}", e);
                }
                config
            }
        }
    }

    /// Parse `key=value` lines. `#` comments and blank lines are ignored,
    /// unrecognized keys are ignored, and a malformed or non-positive
    /// value fails only that one assignment.
    pub fn parse(content: &str) -> Self {
        let mut config = Self::default();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let (key, value) = (key.trim(), value.trim());

            match key {
                "toll_rate_car" => assign_rate(&mut config.rates.car, value),
                "toll_rate_truck" => assign_rate(&mut config.rates.truck, value),
                "toll_rate_bus" => assign_rate(&mut config.rates.bus, value),
                "camera_resolution_width" => {
                    assign_dimension(&mut config.camera.resolution_width, value)
                }
                "camera_resolution_height" => {
                    assign_dimension(&mut config.camera.resolution_height, value)
                }
                "camera_fps" => assign_dimension(&mut config.camera.fps, value),
                _ => {}
            }
        }

        config
    }

    /// Write the canonical commented `key=value` form
    pub fn save(&self, path: &Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = format!(
            "# Toll Rates\n\
             toll_rate_car={}\n\
             toll_rate_truck={}\n\
             toll_rate_bus={}\n\
             \n\
             # Camera Settings\n\
             camera_resolution_width={}\n\
             camera_resolution_height={}\n\
             camera_fps={}\n",
            self.rates.car,
            self.rates.truck,
            self.rates.bus,
            self.camera.resolution_width,
            self.camera.resolution_height,
            self.camera.fps,
        );
        fs::write(path, content)?;
        Ok(())
    }

    /// Resolve the rate for a vehicle class
    pub fn rate_for(&self, class: VehicleClass) -> f64 {
        self.rates.rate_for(class)
    }
}

fn assign_rate(slot: &mut f64, value: &str) {
    if let Ok(rate) = value.parse::<f64>() {
        if rate > 0.0 {
            *slot = rate;
        }
    }
}

fn assign_dimension(slot: &mut u32, value: &str) {
    if let Ok(n) = value.parse::<u32>() {
        if n > 0 {
            *slot = n;
        }
    }
}

impl std::fmt::Display for TollConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Tollgate Configuration")?;
        writeln!(f, "======================")?;
        writeln!(f)?;
        writeln!(f, "Rate (car):    {:.2}", self.rates.car)?;
        writeln!(f, "Rate (truck):  {:.2}", self.rates.truck)?;
        writeln!(f, "Rate (bus):    {:.2}", self.rates.bus)?;
        writeln!(f, "Rate fallback: {:.2}", FALLBACK_RATE)?;
        writeln!(f)?;
        writeln!(
            f,
            "Camera:        {}x{} @ {} fps",
            self.camera.resolution_width, self.camera.resolution_height, self.camera.fps
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_CONFIG: &str = "\
# Toll Rates
toll_rate_car=40.0
toll_rate_truck=120.0
toll_rate_bus=80.0

# Camera Settings
camera_resolution_width=1280
camera_resolution_height=720
camera_fps=25
";

    #[test]
    fn test_parse_full_config() {
        let config = TollConfig::parse(TEST_CONFIG);
        assert_eq!(config.rates.car, 40.0);
        assert_eq!(config.rates.truck, 120.0);
        assert_eq!(config.rates.bus, 80.0);
        assert_eq!(config.camera.resolution_width, 1280);
        assert_eq!(config.camera.fps, 25);
    }

    #[test]
    fn test_parse_empty_yields_defaults() {
        let config = TollConfig::parse("");
        assert_eq!(config, TollConfig::default());
        assert_eq!(config.rates.car, 50.0);
        assert_eq!(config.rates.truck, 100.0);
        assert_eq!(config.rates.bus, 75.0);
    }

    #[test]
    fn test_malformed_value_skips_single_assignment() {
        let config = TollConfig::parse("toll_rate_car=abc\ntoll_rate_truck=120.0\n");
        assert_eq!(config.rates.car, 50.0);
        assert_eq!(config.rates.truck, 120.0);
    }

    #[test]
    fn test_non_positive_rate_rejected() {
        let config = TollConfig::parse("toll_rate_car=-5.0\ntoll_rate_bus=0\n");
        assert_eq!(config.rates.car, 50.0);
        assert_eq!(config.rates.bus, 75.0);
    }

    #[test]
    fn test_unrecognized_keys_ignored() {
        let config = TollConfig::parse("lane_count=4\ntoll_rate_car=60.0\n");
        assert_eq!(config.rates.car, 60.0);
    }

    #[test]
    fn test_parse_idempotent() {
        let first = TollConfig::parse(TEST_CONFIG);
        let second = TollConfig::parse(TEST_CONFIG);
        assert_eq!(first, second);
    }

    #[test]
    fn test_save_parse_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.txt");

        let mut config = TollConfig::default();
        config.rates.truck = 150.0;
        config.camera.fps = 60;
        config.save(&path).unwrap();

        let reloaded = TollConfig::load(&path);
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_load_absent_synthesizes_and_persists_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config").join("config.txt");

        let config = TollConfig::load(&path);
        assert_eq!(config, TollConfig::default());
        assert!(path.exists());

        // Second load reads the persisted file and agrees
        let again = TollConfig::load(&path);
        assert_eq!(again, config);
    }

    #[test]
    fn test_rate_fallback_for_unknown_class() {
        let config = TollConfig::default();
        assert_eq!(config.rate_for(VehicleClass::Unknown), FALLBACK_RATE);
        assert_eq!(config.rate_for(VehicleClass::Car), 50.0);
    }
}
