//! assetrack-core: Core library for the assetrack inventory
//!
//! Assets, locations, shipments and audits held in memory by an
//! [`Inventory`], CSV import and export, and a sync workflow that merges
//! uploaded master ("central") CSV files into one location with per-item
//! conflict resolution.

pub mod asset;
pub mod audit;
pub mod central;
pub mod config;
pub mod csv;
pub mod error;
pub mod export;
pub mod id;
pub mod import;
pub mod inventory;
pub mod location;
pub mod report;
pub mod shipment;
pub mod store;
pub mod sync;

pub use asset::{Asset, AssetInput, AssetStatus, StockLevel, SyncStatus};
pub use audit::AuditRecord;
pub use central::{CentralFile, CentralRecord, SkipReason, SkippedRow};
pub use config::{AutoSyncSchedule, Config, ConflictStrategy, DateFormat, FieldKey, FieldLabels};
pub use error::Error;
pub use export::Snapshot;
pub use id::{IdKind, generate_id};
pub use import::{ImportMapping, ImportReport};
pub use inventory::{DisplaySettings, Inventory, InventoryData};
pub use location::{Location, LocationInput, Scope};
pub use report::Summary;
pub use shipment::{Shipment, ShipmentInput, ShipmentStatus};
pub use store::Store;
pub use sync::{
    Conflict, JoinKey, MergePlan, MergeSummary, Resolution, SessionState, SyncDirection,
    SyncOutcome, SyncRecord, SyncReport, SyncSession,
};

/// Result type for assetrack operations
pub type Result<T> = std::result::Result<T, Error>;
