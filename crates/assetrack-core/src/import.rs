//! Bulk asset import from an arbitrary CSV

use crate::asset::{AssetInput, AssetStatus};
use crate::central::{parse_price, parse_quantity};
use crate::config::FieldKey;
use crate::csv::{CsvTable, Row};
use crate::inventory::Inventory;
use crate::location::Scope;
use crate::{Error, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Fields an import can fill, in auto-mapping order
pub const IMPORT_FIELDS: [FieldKey; 7] = [
    FieldKey::Sku,
    FieldKey::ItemName,
    FieldKey::StartingQuantity,
    FieldKey::CurrentQuantity,
    FieldKey::UnitPrice,
    FieldKey::Location,
    FieldKey::Status,
];

fn keywords(field: FieldKey) -> &'static [&'static str] {
    match field {
        FieldKey::Sku => &["sku", "code"],
        FieldKey::ItemName => &["name", "item", "product", "asset"],
        FieldKey::StartingQuantity => &["starting", "initial", "start"],
        FieldKey::CurrentQuantity => &["current", "quantity", "qty", "stock"],
        FieldKey::UnitPrice => &["price", "cost", "unit"],
        FieldKey::Location => &["location", "site", "office"],
        FieldKey::Status => &["status", "state", "condition"],
        FieldKey::TotalValue | FieldKey::SyncStatus => &[],
    }
}

/// Which CSV header feeds each asset field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportMapping {
    columns: BTreeMap<FieldKey, String>,
}

impl ImportMapping {
    /// Guess a mapping from header keywords
    ///
    /// Fields are visited in [`IMPORT_FIELDS`] order and each takes the first
    /// header containing one of its keywords that no earlier field claimed.
    pub fn auto(headers: &[String]) -> Self {
        let mut mapping = Self::default();
        for field in IMPORT_FIELDS {
            let found = headers.iter().find(|header| {
                let lower = header.to_lowercase();
                !mapping.columns.values().any(|claimed| claimed == *header)
                    && keywords(field).iter().any(|k| lower.contains(k))
            });
            if let Some(header) = found {
                mapping.columns.insert(field, header.clone());
            }
        }
        tracing::debug!(?mapping, "auto-mapped import columns");
        mapping
    }

    pub fn set(&mut self, field: FieldKey, header: impl Into<String>) {
        self.columns.insert(field, header.into());
    }

    pub fn remove(&mut self, field: FieldKey) {
        self.columns.remove(&field);
    }

    pub fn get(&self, field: FieldKey) -> Option<&str> {
        self.columns.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &str)> {
        self.columns.iter().map(|(f, h)| (*f, h.as_str()))
    }

    fn value<'r>(&self, row: &'r Row, field: FieldKey) -> Option<&'r str> {
        let header = self.columns.get(&field)?;
        row.get(header).map(|v| v.trim())
    }

    /// Convert one row, or `None` when a required field is missing
    fn to_input(&self, row: &Row) -> Option<AssetInput> {
        let item_name = self.value(row, FieldKey::ItemName).filter(|v| !v.is_empty())?;
        let location = self.value(row, FieldKey::Location).filter(|v| !v.is_empty())?;
        let quantity = self.value(row, FieldKey::CurrentQuantity)?;
        let price = self.value(row, FieldKey::UnitPrice)?;

        let current_quantity = parse_quantity(quantity).unwrap_or(0);
        Some(AssetInput {
            sku: self
                .value(row, FieldKey::Sku)
                .filter(|v| !v.is_empty())
                .map(str::to_string),
            item_name: item_name.to_string(),
            starting_quantity: self
                .value(row, FieldKey::StartingQuantity)
                .map(|v| parse_quantity(v).unwrap_or(0)),
            current_quantity,
            unit_price: parse_price(price).unwrap_or(Decimal::ZERO),
            location: location.to_string(),
            status: self
                .value(row, FieldKey::Status)
                .and_then(|v| v.parse().ok())
                .unwrap_or(AssetStatus::Active),
        })
    }
}

/// Outcome of one import batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub imported: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

impl Inventory {
    /// Add one asset per valid row; invalid rows are counted and reported
    pub fn import(
        &mut self,
        table: &CsvTable,
        mapping: &ImportMapping,
        scope: &Scope,
    ) -> Result<ImportReport> {
        if mapping.is_empty() {
            return Err(Error::EmptyMapping);
        }

        let mut report = ImportReport::default();
        for (index, row) in table.rows.iter().enumerate() {
            let n = index + 1;
            let Some(input) = mapping.to_input(row) else {
                tracing::debug!(row = n, "import row missing required fields");
                report.failed += 1;
                report.errors.push(format!("Row {}: Missing required fields", n));
                continue;
            };
            match self.add_asset(input, scope) {
                Ok(_) => report.imported += 1,
                Err(e) => {
                    report.failed += 1;
                    report.errors.push(format!("Row {}: {}", n, e));
                }
            }
        }

        tracing::info!(
            imported = report.imported,
            failed = report.failed,
            "import finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::SyncStatus;
    use crate::csv;
    use pretty_assertions::assert_eq;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_auto_mapping_by_keyword() {
        let mapping = ImportMapping::auto(&headers(&[
            "Product",
            "Initial Qty",
            "Qty On Hand",
            "Cost",
            "Site",
            "Condition",
            "Notes",
        ]));

        assert_eq!(mapping.get(FieldKey::ItemName), Some("Product"));
        assert_eq!(mapping.get(FieldKey::StartingQuantity), Some("Initial Qty"));
        assert_eq!(mapping.get(FieldKey::CurrentQuantity), Some("Qty On Hand"));
        assert_eq!(mapping.get(FieldKey::UnitPrice), Some("Cost"));
        assert_eq!(mapping.get(FieldKey::Location), Some("Site"));
        assert_eq!(mapping.get(FieldKey::Status), Some("Condition"));
        assert_eq!(mapping.get(FieldKey::Sku), None);
    }

    #[test]
    fn test_auto_mapping_does_not_reuse_headers() {
        let mapping = ImportMapping::auto(&headers(&[
            "Item Name",
            "Starting Quantity",
            "Current Quantity",
            "Unit Price",
        ]));
        assert_eq!(mapping.get(FieldKey::StartingQuantity), Some("Starting Quantity"));
        assert_eq!(mapping.get(FieldKey::CurrentQuantity), Some("Current Quantity"));
        assert_eq!(mapping.get(FieldKey::UnitPrice), Some("Unit Price"));
    }

    #[test]
    fn test_empty_mapping_is_error() {
        let mut inv = Inventory::default();
        let table = csv::parse("a,b\n1,2").unwrap();
        let err = inv
            .import(&table, &ImportMapping::default(), &Scope::Global)
            .unwrap_err();
        assert!(matches!(err, Error::EmptyMapping));
    }

    #[test]
    fn test_import_counts_failures() {
        let mut inv = Inventory::default();
        let table = csv::parse(
            "name,qty,price,location,status\n\
             Widget,5,2.5,Europe Office,retired\n\
             ,3,1,Headquarters,active\n\
             Bolt,abc,x,Asia Pacific,lost\n\
             Nut,1,1,,active",
        )
        .unwrap();
        let mapping = ImportMapping::auto(&table.headers);

        let report = inv.import(&table, &mapping, &Scope::Global).unwrap();
        assert_eq!(report.imported, 2);
        assert_eq!(report.failed, 2);
        assert_eq!(
            report.errors,
            vec![
                "Row 2: Missing required fields".to_string(),
                "Row 4: Missing required fields".to_string(),
            ]
        );

        let widget = &inv.assets()[0];
        assert_eq!(widget.location_id, "europe");
        assert_eq!(widget.status, AssetStatus::Retired);
        assert_eq!(widget.starting_quantity, 5);
        assert_eq!(widget.sync_status, SyncStatus::Pending);
        assert!(widget.last_sync_date.is_none());

        let bolt = &inv.assets()[1];
        assert_eq!(bolt.current_quantity(), 0);
        assert_eq!(bolt.unit_price(), Decimal::ZERO);
        assert_eq!(bolt.status, AssetStatus::Active);
    }

    #[test]
    fn test_import_into_scope() {
        let mut inv = Inventory::default();
        let table = csv::parse("item,quantity,price,office\nDesk,2,100,Headquarters").unwrap();
        let mapping = ImportMapping::auto(&table.headers);

        inv.import(&table, &mapping, &Scope::Location("asia".to_string()))
            .unwrap();
        assert_eq!(inv.assets()[0].location_id, "asia");
        assert_eq!(inv.assets()[0].location, "Asia Pacific");
    }

    #[test]
    fn test_mapping_and_report_as_json() {
        let mut inv = Inventory::default();
        let table = csv::parse("item,quantity,price,office\nDesk,2,100,Headquarters\n,1,1,Asia")
            .unwrap();
        let mapping = ImportMapping::auto(&table.headers);
        let report = inv.import(&table, &mapping, &Scope::Global).unwrap();

        let json = serde_json::json!({ "mapping": mapping, "report": report });
        assert_eq!(
            json,
            serde_json::json!({
                "mapping": {
                    "columns": {
                        "itemName": "item",
                        "currentQuantity": "quantity",
                        "unitPrice": "price",
                        "location": "office",
                    }
                },
                "report": {
                    "imported": 1,
                    "failed": 1,
                    "errors": ["Row 2: Missing required fields"],
                }
            })
        );
    }
}
