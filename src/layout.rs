//! Base directory layout for runtime files
//!
//! All persistent state lives under one base directory:
//! `config/` for the config file and vehicle registry, `logs/` for the
//! transaction and error logs.

use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Default base directory, relative to the working directory
pub const DEFAULT_BASE_DIR: &str = "ai_toll_system";

/// Resolves paths for config, registry and log files under a base dir
#[derive(Debug, Clone)]
pub struct FileLayout {
    base: PathBuf,
}

impl FileLayout {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Create the directory structure if it does not exist yet
    pub fn bootstrap(&self) -> Result<()> {
        fs::create_dir_all(self.base.join("config"))?;
        fs::create_dir_all(self.base.join("logs"))?;
        Ok(())
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn config_file(&self) -> PathBuf {
        self.base.join("config").join("config.txt")
    }

    pub fn registry_file(&self) -> PathBuf {
        self.base.join("config").join("registered_vehicles.csv")
    }

    pub fn transaction_log(&self) -> PathBuf {
        self.base.join("logs").join("transaction_log.csv")
    }

    pub fn error_log(&self) -> PathBuf {
        self.base.join("logs").join("error_log.txt")
    }
}

impl Default for FileLayout {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_DIR)
    }
}
