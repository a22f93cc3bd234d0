//! Shipments between locations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ShipmentStatus {
    #[default]
    Pending,
    InTransit,
    Delivered,
    Delayed,
}

impl ShipmentStatus {
    pub fn is_active(&self) -> bool {
        !matches!(self, ShipmentStatus::Delivered)
    }
}

impl std::str::FromStr for ShipmentStatus {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(ShipmentStatus::Pending),
            "in-transit" | "in_transit" | "intransit" => Ok(ShipmentStatus::InTransit),
            "delivered" => Ok(ShipmentStatus::Delivered),
            "delayed" => Ok(ShipmentStatus::Delayed),
            _ => Err(crate::Error::InvalidStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShipmentStatus::Pending => write!(f, "pending"),
            ShipmentStatus::InTransit => write!(f, "in-transit"),
            ShipmentStatus::Delivered => write!(f, "delivered"),
            ShipmentStatus::Delayed => write!(f, "delayed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipment {
    pub id: String,
    pub tracking_number: String,
    pub asset_id: String,
    pub from_location: String,
    pub to_location: String,
    pub from_location_id: String,
    pub to_location_id: String,
    pub status: ShipmentStatus,
    pub date: DateTime<Utc>,
}

impl Shipment {
    /// Whether either end of the shipment is the given location
    pub fn touches(&self, location_id: &str) -> bool {
        self.from_location_id == location_id || self.to_location_id == location_id
    }
}

/// Shipment form fields; locations are names, resolved by the inventory
#[derive(Debug, Clone)]
pub struct ShipmentInput {
    pub tracking_number: String,
    pub asset_id: String,
    pub from_location: String,
    pub to_location: String,
    pub status: ShipmentStatus,
}
