//! Error types for tollgate

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Log storage could not be opened. Fatal at startup, since the
    /// durability guarantee cannot be met without it.
    #[error("Log storage unavailable: {0}")]
    PersistenceUnavailable(String),

    #[error("Vehicle not found: {0}")]
    VehicleNotFound(String),
}

pub type Result<T> = std::result::Result<T, Error>;
