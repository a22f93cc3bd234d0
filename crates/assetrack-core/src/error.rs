//! Error types for assetrack

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    #[error("Location not found: {0}")]
    LocationNotFound(String),

    #[error("Shipment not found: {0}")]
    ShipmentNotFound(String),

    #[error("Central file not found: {0}")]
    CentralFileNotFound(String),

    #[error("Select a specific location to sync")]
    NoLocationSelected,

    #[error("No master CSV files available for sync")]
    NoCentralFiles,

    #[error("Nothing to export for {0}")]
    NothingToExport(String),

    #[error("CSV must have header and at least one data row")]
    CsvTooShort,

    #[error("Map at least one field to import")]
    EmptyMapping,

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Invalid sync status: {0}")]
    InvalidSyncStatus(String),

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Location {0} cannot be deleted")]
    ProtectedLocation(String),

    #[error("No conflict for {0}")]
    UnknownConflict(String),

    #[error("Inventory changed since sync began: {0}")]
    StaleSession(String),

    #[error("Store not initialized. Run 'assetrack init' first.")]
    NotInitialized,

    #[error("Store already initialized at {0}")]
    AlreadyInitialized(String),

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Warning-class errors leave state untouched and only need user attention
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Error::NoLocationSelected | Error::NoCentralFiles | Error::NothingToExport(_)
        )
    }

    pub(crate) fn invalid(field: &str, value: impl Into<String>) -> Self {
        Error::InvalidValue {
            field: field.to_string(),
            value: value.into(),
        }
    }
}
