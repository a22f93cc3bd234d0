//! Conflict detection between a central file and a location's assets

use super::{JoinKey, find_local};
use crate::asset::{Asset, StockLevel};
use crate::central::{CentralFile, CentralRecord, ColumnMap, SkipReason, SkippedRow};
use crate::config::{FieldKey, FieldLabels};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// A matched pair that disagrees on quantity, price or status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    pub key: JoinKey,
    pub item_name: String,
    pub asset_id: String,
    pub local: StockLevel,
    pub central: CentralRecord,
}

impl Conflict {
    /// Fields whose values differ, in display order
    pub fn differing_fields(&self) -> Vec<FieldKey> {
        let central = &self.central.level;
        let mut fields = Vec::new();
        if self.local.current_quantity != central.current_quantity {
            fields.push(FieldKey::CurrentQuantity);
        }
        if self.local.unit_price != central.unit_price {
            fields.push(FieldKey::UnitPrice);
        }
        if self.local.status != central.status {
            fields.push(FieldKey::Status);
        }
        fields
    }
}

/// Central rows ready for detection, plus the rows that were left out
#[derive(Debug, Clone, Default)]
pub struct PreparedRows {
    pub records: Vec<CentralRecord>,
    pub skipped: Vec<SkippedRow>,
}

/// Type a central file's rows for a sync into `location`
///
/// `assets` must already be limited to the sync location. A row that repeats
/// the join key of an earlier row, or matches the same local asset as an
/// earlier row, is skipped. Rows naming another location are kept; they never
/// match a local asset.
pub fn prepare_records(
    file: &CentralFile,
    labels: &FieldLabels,
    location: &str,
    assets: &[&Asset],
) -> PreparedRows {
    let columns = ColumnMap::resolve(&file.table.headers, labels);
    let mut prepared = PreparedRows::default();
    let mut seen = HashSet::new();
    let mut claimed: HashMap<&str, JoinKey> = HashMap::new();

    for (index, raw) in file.rows().iter().enumerate() {
        let record = match CentralRecord::from_row(index + 1, raw, &columns) {
            Ok(record) => record,
            Err(skipped) => {
                tracing::warn!(row = skipped.row, reason = %skipped.reason, "skipping central row");
                prepared.skipped.push(skipped);
                continue;
            }
        };

        let key = JoinKey::for_record(&record, location);
        if !seen.insert(key.clone()) {
            tracing::warn!(row = record.row, %key, "skipping duplicate central row");
            prepared.skipped.push(SkippedRow {
                row: record.row,
                item_name: Some(record.item_name),
                reason: SkipReason::DuplicateKey(key.to_string()),
            });
            continue;
        }

        if let Some(local) = find_local(assets, &record) {
            if let Some(first) = claimed.get(local.id.as_str()) {
                tracing::warn!(
                    row = record.row,
                    asset = %local.id,
                    "skipping central row for an asset already matched"
                );
                prepared.skipped.push(SkippedRow {
                    row: record.row,
                    item_name: Some(record.item_name),
                    reason: SkipReason::DuplicateKey(first.to_string()),
                });
                continue;
            }
            claimed.insert(&local.id, key);
        }

        prepared.records.push(record);
    }

    prepared
}

/// One conflict per matched pair that differs, in central row order
///
/// Rows without a local match are not conflicts; they become inserts.
pub fn detect_conflicts(records: &[CentralRecord], assets: &[&Asset], location: &str) -> Vec<Conflict> {
    records
        .iter()
        .filter_map(|record| {
            let local = find_local(assets, record)?;
            let level = local.stock_level();
            if level == record.level {
                return None;
            }
            Some(Conflict {
                key: JoinKey::for_record(record, location),
                item_name: record.item_name.clone(),
                asset_id: local.id.clone(),
                local: level,
                central: record.clone(),
            })
        })
        .collect()
}
