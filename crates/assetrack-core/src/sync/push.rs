//! Push a location's assets up as a new central file

use super::{SyncDirection, SyncOutcome, SyncRecord};
use crate::central::CentralFile;
use crate::config::FieldKey;
use crate::csv::CsvTable;
use crate::export::asset_row;
use crate::id::{IdKind, generate_id};
use crate::inventory::Inventory;
use crate::location::Scope;
use crate::{Error, Result};
use chrono::Utc;

impl Inventory {
    /// Snapshot the scope's assets into a new central file
    ///
    /// Columns use canonical field keys so the file syncs back regardless
    /// of label settings. Every pushed asset is marked synced.
    pub fn push_to_central(&mut self, scope: &Scope, version: Option<String>) -> Result<SyncRecord> {
        let location_id = scope.location_id().ok_or(Error::NoLocationSelected)?;
        let location = self
            .location(location_id)
            .ok_or_else(|| Error::LocationNotFound(location_id.to_string()))?
            .clone();

        let rows: Vec<_> = self.assets_in(scope).into_iter().map(asset_row).collect();
        if rows.is_empty() {
            return Err(Error::NothingToExport(location.name));
        }

        let now = Utc::now();
        let file = CentralFile {
            id: generate_id(IdKind::CentralFile),
            filename: format!("{}_push_{}.csv", location.id, now.format("%Y-%m-%d")),
            version: version
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| format!("v{}", self.central_files().len() + 1)),
            upload_date: now,
            row_count: rows.len(),
            description: Some(format!("Pushed from {}", location.name)),
            table: CsvTable {
                headers: FieldKey::EXPORT_ORDER
                    .iter()
                    .map(|f| f.key().to_string())
                    .collect(),
                rows,
            },
        };
        let items_affected = file.row_count;
        tracing::info!(file = %file.id, location = %location.name, rows = items_affected, "pushing to central");
        self.push_central(file);

        for asset in self
            .assets_mut()
            .iter_mut()
            .filter(|a| a.location_id == location.id)
        {
            asset.mark_synced(now);
        }

        let record = SyncRecord {
            id: generate_id(IdKind::SyncRecord),
            date: now,
            location: location.name,
            direction: SyncDirection::Push,
            outcome: SyncOutcome::Success,
            items_affected,
            conflicts: 0,
        };
        self.history_mut().record(record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{AssetInput, SyncStatus};
    use rust_decimal::Decimal;

    #[test]
    fn test_push_creates_file_and_history() {
        let mut inv = Inventory::default();
        let scope = Scope::Location("europe".to_string());
        inv.add_asset(
            AssetInput {
                item_name: "Desk".to_string(),
                current_quantity: 2,
                unit_price: Decimal::from(120),
                ..Default::default()
            },
            &scope,
        )
        .unwrap();

        let record = inv.push_to_central(&scope, None).unwrap();
        assert_eq!(record.direction, SyncDirection::Push);
        assert_eq!(record.items_affected, 1);
        assert_eq!(record.location, "Europe Office");

        let file = inv.latest_central_file().unwrap();
        assert_eq!(file.version, "v1");
        assert_eq!(file.rows()[0]["itemName"], "Desk");
        assert_eq!(file.rows()[0]["totalValue"], "240");
        assert_eq!(inv.assets()[0].sync_status, SyncStatus::Synced);
        assert_eq!(inv.history().len(), 1);
    }

    #[test]
    fn test_push_empty_location_changes_nothing() {
        let mut inv = Inventory::default();
        let err = inv
            .push_to_central(&Scope::Location("asia".to_string()), None)
            .unwrap_err();
        assert!(err.is_warning());
        assert!(inv.central_files().is_empty());
        assert!(inv.history().is_empty());

        let err = inv.push_to_central(&Scope::Global, None).unwrap_err();
        assert!(matches!(err, Error::NoLocationSelected));
    }
}
