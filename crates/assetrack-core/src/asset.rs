//! Asset data model
//!
//! Quantity, unit price and total value are private so the total can only
//! change together with the two values it is derived from.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Asset lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AssetStatus {
    #[default]
    Active,
    Inactive,
    Maintenance,
    Retired,
}

impl AssetStatus {
    pub const ALL: [AssetStatus; 4] = [
        AssetStatus::Active,
        AssetStatus::Inactive,
        AssetStatus::Maintenance,
        AssetStatus::Retired,
    ];
}

impl std::str::FromStr for AssetStatus {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(AssetStatus::Active),
            "inactive" => Ok(AssetStatus::Inactive),
            "maintenance" => Ok(AssetStatus::Maintenance),
            "retired" => Ok(AssetStatus::Retired),
            _ => Err(crate::Error::InvalidStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetStatus::Active => write!(f, "active"),
            AssetStatus::Inactive => write!(f, "inactive"),
            AssetStatus::Maintenance => write!(f, "maintenance"),
            AssetStatus::Retired => write!(f, "retired"),
        }
    }
}

/// Whether an asset's last known state matches the central file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    Synced,
    #[default]
    Pending,
    Conflict,
    Never,
}

impl std::str::FromStr for SyncStatus {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "synced" => Ok(SyncStatus::Synced),
            "pending" => Ok(SyncStatus::Pending),
            "conflict" => Ok(SyncStatus::Conflict),
            "never" => Ok(SyncStatus::Never),
            _ => Err(crate::Error::InvalidSyncStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncStatus::Synced => write!(f, "synced"),
            SyncStatus::Pending => write!(f, "pending"),
            SyncStatus::Conflict => write!(f, "conflict"),
            SyncStatus::Never => write!(f, "never"),
        }
    }
}

/// The fields a central file can disagree on
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockLevel {
    pub current_quantity: u32,
    pub unit_price: Decimal,
    pub status: AssetStatus,
}

/// Form fields for creating or editing an asset
#[derive(Debug, Clone, Default)]
pub struct AssetInput {
    pub sku: Option<String>,
    pub item_name: String,
    pub starting_quantity: Option<u32>,
    pub current_quantity: u32,
    pub unit_price: Decimal,
    /// Location name as typed; resolved to an id by the inventory
    pub location: String,
    pub status: AssetStatus,
}

impl From<&Asset> for AssetInput {
    fn from(asset: &Asset) -> Self {
        Self {
            sku: asset.sku.clone(),
            item_name: asset.item_name.clone(),
            starting_quantity: Some(asset.starting_quantity),
            current_quantity: asset.current_quantity,
            unit_price: asset.unit_price,
            location: asset.location.clone(),
            status: asset.status,
        }
    }
}

/// Inventory asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// Unique identifier (ast-xxxxxxxx)
    pub id: String,

    /// Stable product code, when the source data has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,

    pub item_name: String,

    pub starting_quantity: u32,

    current_quantity: u32,

    unit_price: Decimal,

    total_value: Decimal,

    /// Owning location id
    pub location_id: String,

    /// Owning location display name
    pub location: String,

    pub status: AssetStatus,

    pub sync_status: SyncStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync_date: Option<DateTime<Utc>>,

    pub date_added: DateTime<Utc>,
}

impl Asset {
    /// Create an asset with zero stock at the given location
    pub fn new(id: String, item_name: String, location_id: String, location: String) -> Self {
        Self {
            id,
            sku: None,
            item_name,
            starting_quantity: 0,
            current_quantity: 0,
            unit_price: Decimal::ZERO,
            total_value: Decimal::ZERO,
            location_id,
            location,
            status: AssetStatus::Active,
            sync_status: SyncStatus::Pending,
            last_sync_date: None,
            date_added: Utc::now(),
        }
    }

    pub fn current_quantity(&self) -> u32 {
        self.current_quantity
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    pub fn total_value(&self) -> Decimal {
        self.total_value
    }

    pub fn stock_level(&self) -> StockLevel {
        StockLevel {
            current_quantity: self.current_quantity,
            unit_price: self.unit_price,
            status: self.status,
        }
    }

    pub fn set_quantity(&mut self, quantity: u32) {
        self.current_quantity = quantity;
        self.recompute_total();
    }

    /// Set the unit price; negative prices are rejected
    pub fn set_unit_price(&mut self, price: Decimal) -> crate::Result<()> {
        if price < Decimal::ZERO {
            return Err(crate::Error::invalid("unit_price", price.to_string()));
        }
        self.unit_price = price;
        self.recompute_total();
        Ok(())
    }

    /// Overwrite quantity, price and status from a central record
    pub(crate) fn apply_stock_level(&mut self, level: &StockLevel, synced_at: DateTime<Utc>) {
        self.current_quantity = level.current_quantity;
        self.unit_price = level.unit_price;
        self.status = level.status;
        self.recompute_total();
        self.mark_synced(synced_at);
    }

    /// Bring the stored total back in line after deserializing
    pub(crate) fn recompute_total(&mut self) {
        self.total_value = Decimal::from(self.current_quantity) * self.unit_price;
    }

    pub fn mark_synced(&mut self, at: DateTime<Utc>) {
        self.sync_status = SyncStatus::Synced;
        self.last_sync_date = Some(at);
    }

    pub fn mark_pending(&mut self) {
        self.sync_status = SyncStatus::Pending;
    }
}

impl std::fmt::Display for Asset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {} x{} @ {} ({})",
            self.id,
            self.status,
            self.item_name,
            self.current_quantity,
            self.unit_price,
            self.location
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn widget() -> Asset {
        Asset::new(
            "ast-test0001".to_string(),
            "Widget".to_string(),
            "hq".to_string(),
            "Headquarters".to_string(),
        )
    }

    #[test]
    fn test_total_follows_quantity_and_price() {
        let mut asset = widget();
        asset.set_quantity(4);
        asset.set_unit_price(Decimal::from_str("2.50").unwrap()).unwrap();
        assert_eq!(asset.total_value(), Decimal::from_str("10.00").unwrap());

        asset.set_quantity(3);
        assert_eq!(asset.total_value(), Decimal::from_str("7.50").unwrap());
    }

    #[test]
    fn test_negative_price_rejected() {
        let mut asset = widget();
        let err = asset.set_unit_price(Decimal::from(-1)).unwrap_err();
        assert!(matches!(err, crate::Error::InvalidValue { .. }));
        assert_eq!(asset.unit_price(), Decimal::ZERO);
    }

    #[test]
    fn test_apply_stock_level_marks_synced() {
        let mut asset = widget();
        let now = Utc::now();
        asset.apply_stock_level(
            &StockLevel {
                current_quantity: 7,
                unit_price: Decimal::from(3),
                status: AssetStatus::Maintenance,
            },
            now,
        );
        assert_eq!(asset.current_quantity(), 7);
        assert_eq!(asset.total_value(), Decimal::from(21));
        assert_eq!(asset.status, AssetStatus::Maintenance);
        assert_eq!(asset.sync_status, SyncStatus::Synced);
        assert_eq!(asset.last_sync_date, Some(now));
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("Retired".parse::<AssetStatus>().unwrap(), AssetStatus::Retired);
        assert!("broken".parse::<AssetStatus>().is_err());
        assert_eq!("never".parse::<SyncStatus>().unwrap(), SyncStatus::Never);
    }
}
