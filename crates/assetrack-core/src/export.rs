//! CSV export, export filenames and the full backup document

use crate::asset::Asset;
use crate::config::{Config, FieldKey};
use crate::csv::{self, Row};
use crate::inventory::{Inventory, InventoryData};
use crate::location::Scope;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An asset as a CSV row keyed by canonical field key
pub(crate) fn asset_row(asset: &Asset) -> Row {
    FieldKey::EXPORT_ORDER
        .iter()
        .map(|field| (field.key().to_string(), field_value(asset, *field)))
        .collect()
}

fn field_value(asset: &Asset, field: FieldKey) -> String {
    match field {
        FieldKey::Sku => asset.sku.clone().unwrap_or_default(),
        FieldKey::ItemName => asset.item_name.clone(),
        FieldKey::StartingQuantity => asset.starting_quantity.to_string(),
        FieldKey::CurrentQuantity => asset.current_quantity().to_string(),
        FieldKey::UnitPrice => asset.unit_price().to_string(),
        FieldKey::TotalValue => asset.total_value().to_string(),
        FieldKey::Location => asset.location.clone(),
        FieldKey::Status => asset.status.to_string(),
        FieldKey::SyncStatus => asset.sync_status.to_string(),
    }
}

/// Substitute every `{date}` and `{location}` in a filename pattern
pub fn expand_pattern(pattern: &str, location: &str, date: DateTime<Utc>) -> String {
    pattern
        .replace("{date}", &date.format("%Y-%m-%d").to_string())
        .replace("{location}", location)
}

/// Full backup document
///
/// The inventory collections sit at the top level next to the settings,
/// which include the field labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(flatten)]
    pub data: InventoryData,
    #[serde(default)]
    pub settings: Config,
    pub export_date: DateTime<Utc>,
}

impl Inventory {
    /// CSV of the scope's assets with the configured column labels
    pub fn export_csv(&self, scope: &Scope) -> Result<String> {
        let assets = self.assets_in(scope);
        if assets.is_empty() {
            return Err(Error::NothingToExport(self.scope_name(scope)));
        }
        let rows: Vec<Row> = assets.into_iter().map(asset_row).collect();
        tracing::info!(scope = %scope, rows = rows.len(), "exporting assets");
        Ok(csv::serialize(
            &rows,
            &FieldKey::EXPORT_ORDER,
            &self.config().labels,
        ))
    }

    /// Filename from the configured pattern, e.g. `assets_export_global_2024-05-01.csv`
    pub fn export_filename(&self, scope: &Scope, extension: &str, at: DateTime<Utc>) -> String {
        let stem = expand_pattern(&self.config().export_pattern, &self.scope_name(scope), at);
        format!("{}.{}", stem, extension)
    }

    /// Location name for a scope, `global` for everything
    pub fn scope_name(&self, scope: &Scope) -> String {
        match scope.location_id() {
            Some(id) => self
                .location(id)
                .map(|l| l.name.clone())
                .unwrap_or_else(|| id.to_string()),
            None => "global".to_string(),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            data: self.data().clone(),
            settings: self.config().clone(),
            export_date: Utc::now(),
        }
    }

    /// Rebuild an inventory from a backup document
    pub fn restore(snapshot: Snapshot) -> Self {
        tracing::info!(
            assets = snapshot.data.assets.len(),
            exported = %snapshot.export_date,
            "restoring backup"
        );
        Inventory::from_parts(snapshot.settings, snapshot.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::AssetInput;
    use crate::config::FieldLabels;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    fn stocked() -> Inventory {
        let mut inv = Inventory::default();
        inv.add_asset(
            AssetInput {
                sku: Some("D-1".to_string()),
                item_name: "Desk, oak".to_string(),
                starting_quantity: Some(5),
                current_quantity: 3,
                unit_price: Decimal::new(12050, 2),
                ..Default::default()
            },
            &Scope::Location("europe".to_string()),
        )
        .unwrap();
        inv
    }

    #[test]
    fn test_export_csv_columns_and_quoting() {
        let inv = stocked();
        let text = inv.export_csv(&Scope::Global).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "SKU,Item Name,Starting Quantity,Current Quantity,Unit Price,Total Value,Location,Status",
                "D-1,\"Desk, oak\",5,3,120.50,361.50,Europe Office,active",
            ]
        );
    }

    #[test]
    fn test_export_uses_live_labels() {
        let mut inv = stocked();
        inv.config_mut().labels.set(FieldKey::ItemName, "Product");
        let text = inv.export_csv(&Scope::Global).unwrap();
        assert!(text.starts_with("SKU,Product,"));

        inv.config_mut().labels = FieldLabels::default();
        let text = inv.export_csv(&Scope::Global).unwrap();
        assert!(text.starts_with("SKU,Item Name,"));
    }

    #[test]
    fn test_export_empty_scope_is_warning() {
        let inv = stocked();
        let err = inv
            .export_csv(&Scope::Location("asia".to_string()))
            .unwrap_err();
        assert!(err.is_warning());
    }

    #[test]
    fn test_filename_replaces_every_placeholder() {
        let mut inv = Inventory::default();
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

        assert_eq!(
            inv.export_filename(&Scope::Global, "csv", at),
            "assets_export_global_2024-05-01.csv"
        );

        inv.config_mut().export_pattern = "{location}/{date}_{location}_{date}".to_string();
        assert_eq!(
            inv.export_filename(&Scope::Location("asia".to_string()), "json", at),
            "Asia Pacific/2024-05-01_Asia Pacific_2024-05-01.json"
        );
    }

    #[test]
    fn test_snapshot_restore() {
        let mut inv = stocked();
        inv.config_mut().labels.set(FieldKey::Status, "State");
        inv.upload_central("m.csv", "itemName,currentQuantity\nDesk,1", None, None)
            .unwrap();

        let json = serde_json::to_string(&inv.snapshot()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["assets"].is_array());
        assert!(value["central_files"].is_array());
        assert_eq!(value["settings"]["labels"]["status"], "State");

        let restored = Inventory::restore(serde_json::from_str(&json).unwrap());
        assert_eq!(restored.data(), inv.data());
        assert_eq!(restored.config(), inv.config());
        assert_eq!(restored.assets()[0].total_value(), Decimal::new(36150, 2));
    }
}
