//! Configuration for assetrack
//!
//! Stored in .assetrack/config.toml

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// assetrack configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Currency symbol used in global view
    pub currency_symbol: String,

    /// Date format used in global view
    pub date_format: DateFormat,

    /// Export filename pattern
    /// Available variables: {date}, {location}
    pub export_pattern: String,

    /// Auto-sync schedule (recorded, not acted on)
    pub auto_sync_schedule: AutoSyncSchedule,

    /// Default side chosen for every sync conflict
    pub conflict_strategy: ConflictStrategy,

    /// Number of sync history entries shown
    pub history_display_limit: usize,

    /// Column labels used for CSV export and header matching
    #[serde(default)]
    pub labels: FieldLabels,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
            date_format: DateFormat::MonthDayYear,
            export_pattern: "assets_export_{location}_{date}".to_string(),
            auto_sync_schedule: AutoSyncSchedule::None,
            conflict_strategy: ConflictStrategy::Central,
            history_display_limit: 20,
            labels: FieldLabels::default(),
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> crate::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config =
            toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))?;
        Ok(config)
    }

    /// Save config to a TOML file
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Generate a default config file with comments
    pub fn default_with_comments() -> String {
        r#"# assetrack configuration

# Currency symbol for the global view (locations carry their own)
currency_symbol = "$"

# Date format for the global view: "MM/DD/YYYY", "DD/MM/YYYY" or "YYYY-MM-DD"
date_format = "MM/DD/YYYY"

# Export filename pattern
# Variables: {date}, {location}
export_pattern = "assets_export_{location}_{date}"

# Auto-sync schedule: none, hourly, daily, weekly
auto_sync_schedule = "none"

# Default resolution for sync conflicts: central or local
conflict_strategy = "central"

# Sync history entries shown by `assetrack history`
history_display_limit = 20

[labels]
sku = "SKU"
item_name = "Item Name"
starting_quantity = "Starting Quantity"
current_quantity = "Current Quantity"
unit_price = "Unit Price"
total_value = "Total Value"
location = "Location"
status = "Status"
sync_status = "Sync Status"
"#
        .to_string()
    }
}

/// Date display formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DateFormat {
    #[default]
    #[serde(rename = "MM/DD/YYYY")]
    MonthDayYear,
    #[serde(rename = "DD/MM/YYYY")]
    DayMonthYear,
    #[serde(rename = "YYYY-MM-DD")]
    Iso,
}

impl DateFormat {
    fn strftime(self) -> &'static str {
        match self {
            DateFormat::MonthDayYear => "%m/%d/%Y",
            DateFormat::DayMonthYear => "%d/%m/%Y",
            DateFormat::Iso => "%Y-%m-%d",
        }
    }

    pub fn format(self, date: &DateTime<Utc>) -> String {
        date.format(self.strftime()).to_string()
    }
}

impl std::str::FromStr for DateFormat {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "MM/DD/YYYY" => Ok(DateFormat::MonthDayYear),
            "DD/MM/YYYY" => Ok(DateFormat::DayMonthYear),
            "YYYY-MM-DD" => Ok(DateFormat::Iso),
            _ => Err(crate::Error::invalid("date_format", s)),
        }
    }
}

impl std::fmt::Display for DateFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateFormat::MonthDayYear => write!(f, "MM/DD/YYYY"),
            DateFormat::DayMonthYear => write!(f, "DD/MM/YYYY"),
            DateFormat::Iso => write!(f, "YYYY-MM-DD"),
        }
    }
}

/// Which side wins a sync conflict unless the user picks otherwise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConflictStrategy {
    #[default]
    Central,
    Local,
}

impl std::str::FromStr for ConflictStrategy {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "central" => Ok(ConflictStrategy::Central),
            "local" => Ok(ConflictStrategy::Local),
            _ => Err(crate::Error::invalid("conflict_strategy", s)),
        }
    }
}

impl std::fmt::Display for ConflictStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConflictStrategy::Central => write!(f, "central"),
            ConflictStrategy::Local => write!(f, "local"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AutoSyncSchedule {
    #[default]
    None,
    Hourly,
    Daily,
    Weekly,
}

impl std::str::FromStr for AutoSyncSchedule {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(AutoSyncSchedule::None),
            "hourly" => Ok(AutoSyncSchedule::Hourly),
            "daily" => Ok(AutoSyncSchedule::Daily),
            "weekly" => Ok(AutoSyncSchedule::Weekly),
            _ => Err(crate::Error::invalid("auto_sync_schedule", s)),
        }
    }
}

impl std::fmt::Display for AutoSyncSchedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AutoSyncSchedule::None => write!(f, "none"),
            AutoSyncSchedule::Hourly => write!(f, "hourly"),
            AutoSyncSchedule::Daily => write!(f, "daily"),
            AutoSyncSchedule::Weekly => write!(f, "weekly"),
        }
    }
}

/// Asset fields that appear as CSV columns
///
/// Serializes as its canonical column key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKey {
    Sku,
    ItemName,
    StartingQuantity,
    CurrentQuantity,
    UnitPrice,
    TotalValue,
    Location,
    Status,
    SyncStatus,
}

impl FieldKey {
    pub const ALL: [FieldKey; 9] = [
        FieldKey::Sku,
        FieldKey::ItemName,
        FieldKey::StartingQuantity,
        FieldKey::CurrentQuantity,
        FieldKey::UnitPrice,
        FieldKey::TotalValue,
        FieldKey::Location,
        FieldKey::Status,
        FieldKey::SyncStatus,
    ];

    /// Column order used for asset CSV export
    pub const EXPORT_ORDER: [FieldKey; 8] = [
        FieldKey::Sku,
        FieldKey::ItemName,
        FieldKey::StartingQuantity,
        FieldKey::CurrentQuantity,
        FieldKey::UnitPrice,
        FieldKey::TotalValue,
        FieldKey::Location,
        FieldKey::Status,
    ];

    /// Canonical camelCase column key
    pub fn key(self) -> &'static str {
        match self {
            FieldKey::Sku => "sku",
            FieldKey::ItemName => "itemName",
            FieldKey::StartingQuantity => "startingQuantity",
            FieldKey::CurrentQuantity => "currentQuantity",
            FieldKey::UnitPrice => "unitPrice",
            FieldKey::TotalValue => "totalValue",
            FieldKey::Location => "location",
            FieldKey::Status => "status",
            FieldKey::SyncStatus => "syncStatus",
        }
    }

    /// snake_case name, as used in config.toml
    pub fn snake(self) -> &'static str {
        match self {
            FieldKey::Sku => "sku",
            FieldKey::ItemName => "item_name",
            FieldKey::StartingQuantity => "starting_quantity",
            FieldKey::CurrentQuantity => "current_quantity",
            FieldKey::UnitPrice => "unit_price",
            FieldKey::TotalValue => "total_value",
            FieldKey::Location => "location",
            FieldKey::Status => "status",
            FieldKey::SyncStatus => "sync_status",
        }
    }

    pub fn default_label(self) -> &'static str {
        match self {
            FieldKey::Sku => "SKU",
            FieldKey::ItemName => "Item Name",
            FieldKey::StartingQuantity => "Starting Quantity",
            FieldKey::CurrentQuantity => "Current Quantity",
            FieldKey::UnitPrice => "Unit Price",
            FieldKey::TotalValue => "Total Value",
            FieldKey::Location => "Location",
            FieldKey::Status => "Status",
            FieldKey::SyncStatus => "Sync Status",
        }
    }
}

impl std::str::FromStr for FieldKey {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldKey::ALL
            .into_iter()
            .find(|f| f.key().eq_ignore_ascii_case(s) || f.snake().eq_ignore_ascii_case(s))
            .ok_or_else(|| crate::Error::invalid("field", s))
    }
}

impl std::fmt::Display for FieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.snake())
    }
}

/// Editable column labels, one per field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldLabels {
    pub sku: String,
    pub item_name: String,
    pub starting_quantity: String,
    pub current_quantity: String,
    pub unit_price: String,
    pub total_value: String,
    pub location: String,
    pub status: String,
    pub sync_status: String,
}

impl Default for FieldLabels {
    fn default() -> Self {
        Self {
            sku: FieldKey::Sku.default_label().to_string(),
            item_name: FieldKey::ItemName.default_label().to_string(),
            starting_quantity: FieldKey::StartingQuantity.default_label().to_string(),
            current_quantity: FieldKey::CurrentQuantity.default_label().to_string(),
            unit_price: FieldKey::UnitPrice.default_label().to_string(),
            total_value: FieldKey::TotalValue.default_label().to_string(),
            location: FieldKey::Location.default_label().to_string(),
            status: FieldKey::Status.default_label().to_string(),
            sync_status: FieldKey::SyncStatus.default_label().to_string(),
        }
    }
}

impl FieldLabels {
    fn slot_mut(&mut self, field: FieldKey) -> &mut String {
        match field {
            FieldKey::Sku => &mut self.sku,
            FieldKey::ItemName => &mut self.item_name,
            FieldKey::StartingQuantity => &mut self.starting_quantity,
            FieldKey::CurrentQuantity => &mut self.current_quantity,
            FieldKey::UnitPrice => &mut self.unit_price,
            FieldKey::TotalValue => &mut self.total_value,
            FieldKey::Location => &mut self.location,
            FieldKey::Status => &mut self.status,
            FieldKey::SyncStatus => &mut self.sync_status,
        }
    }

    pub fn get(&self, field: FieldKey) -> &str {
        match field {
            FieldKey::Sku => &self.sku,
            FieldKey::ItemName => &self.item_name,
            FieldKey::StartingQuantity => &self.starting_quantity,
            FieldKey::CurrentQuantity => &self.current_quantity,
            FieldKey::UnitPrice => &self.unit_price,
            FieldKey::TotalValue => &self.total_value,
            FieldKey::Location => &self.location,
            FieldKey::Status => &self.status,
            FieldKey::SyncStatus => &self.sync_status,
        }
    }

    /// Set a label. Blank input is ignored and the current label kept.
    pub fn set(&mut self, field: FieldKey, label: &str) -> bool {
        let label = label.trim();
        if label.is_empty() {
            return false;
        }
        *self.slot_mut(field) = label.to_string();
        true
    }

    pub fn reset(&mut self, field: FieldKey) {
        *self.slot_mut(field) = field.default_label().to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_default_with_comments_parses_to_default() {
        let parsed: Config = toml::from_str(&Config::default_with_comments()).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.conflict_strategy = ConflictStrategy::Local;
        config.date_format = DateFormat::Iso;
        config.labels.set(FieldKey::ItemName, "Product");
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Config::load(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn test_date_formats() {
        let date = Utc.with_ymd_and_hms(2024, 3, 7, 12, 0, 0).unwrap();
        assert_eq!(DateFormat::MonthDayYear.format(&date), "03/07/2024");
        assert_eq!(DateFormat::DayMonthYear.format(&date), "07/03/2024");
        assert_eq!(DateFormat::Iso.format(&date), "2024-03-07");
    }

    #[test]
    fn test_blank_label_is_ignored() {
        let mut labels = FieldLabels::default();
        assert!(!labels.set(FieldKey::Status, "   "));
        assert_eq!(labels.get(FieldKey::Status), "Status");

        assert!(labels.set(FieldKey::Status, " State "));
        assert_eq!(labels.get(FieldKey::Status), "State");

        labels.reset(FieldKey::Status);
        assert_eq!(labels.get(FieldKey::Status), "Status");
    }

    #[test]
    fn test_field_key_parse() {
        assert_eq!("itemName".parse::<FieldKey>().unwrap(), FieldKey::ItemName);
        assert_eq!("unit_price".parse::<FieldKey>().unwrap(), FieldKey::UnitPrice);
        assert!("colour".parse::<FieldKey>().is_err());
    }

    #[test]
    fn test_field_key_serializes_as_column_key() {
        for field in FieldKey::ALL {
            let json = serde_json::to_value(field).unwrap();
            assert_eq!(json, serde_json::Value::String(field.key().to_string()));
        }
    }
}
