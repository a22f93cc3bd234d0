//! Staged merge of central rows into the asset list

use super::{Conflict, JoinKey, Resolution, ResolutionStore, find_local};
use crate::asset::{Asset, StockLevel};
use crate::central::CentralRecord;
use crate::id::{IdKind, generate_id};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;

/// One staged change to the asset list
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "action")]
pub enum Change {
    /// Overwrite stock level from the central row and mark synced
    Update {
        asset_id: String,
        item_name: String,
        sku: Option<String>,
        level: StockLevel,
    },
    /// New asset for a row with no local match
    Insert { asset: Asset },
    /// Conflict resolved in favour of the local value
    KeepLocal { asset_id: String, item_name: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeSummary {
    pub updated: usize,
    pub inserted: usize,
    pub kept_local: usize,
}

/// Changes computed without touching the inventory
///
/// Conflict rows come first, in conflict order, then every other row in
/// central order. Nothing is written until [`MergePlan::commit`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergePlan {
    changes: Vec<Change>,
    synced_at: DateTime<Utc>,
}

impl MergePlan {
    pub fn build(
        records: &[CentralRecord],
        conflicts: &[Conflict],
        resolutions: &ResolutionStore,
        assets: &[&Asset],
        location_id: &str,
        location_name: &str,
        now: DateTime<Utc>,
    ) -> Self {
        let mut changes = Vec::with_capacity(records.len());

        for conflict in conflicts {
            let change = match resolutions.get(&conflict.key) {
                Resolution::Central => Change::Update {
                    asset_id: conflict.asset_id.clone(),
                    item_name: conflict.central.item_name.clone(),
                    sku: conflict.central.sku.clone(),
                    level: conflict.central.level.clone(),
                },
                Resolution::Local => Change::KeepLocal {
                    asset_id: conflict.asset_id.clone(),
                    item_name: conflict.item_name.clone(),
                },
            };
            changes.push(change);
        }

        let conflicted: HashSet<&JoinKey> = conflicts.iter().map(|c| &c.key).collect();
        for record in records {
            if conflicted.contains(&JoinKey::for_record(record, location_name)) {
                continue;
            }

            let change = match find_local(assets, record) {
                Some(local) => Change::Update {
                    asset_id: local.id.clone(),
                    item_name: record.item_name.clone(),
                    sku: record.sku.clone(),
                    level: record.level.clone(),
                },
                None => Change::Insert {
                    asset: new_asset(record, location_id, location_name, now),
                },
            };
            changes.push(change);
        }

        Self {
            changes,
            synced_at: now,
        }
    }

    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    /// Counts the plan would produce if committed
    pub fn summary(&self) -> MergeSummary {
        let mut summary = MergeSummary::default();
        for change in &self.changes {
            match change {
                Change::Update { .. } => summary.updated += 1,
                Change::Insert { .. } => summary.inserted += 1,
                Change::KeepLocal { .. } => summary.kept_local += 1,
            }
        }
        summary
    }

    /// Validate against `assets`, then apply every change
    ///
    /// If any asset the plan refers to is gone, nothing is written.
    pub fn commit(self, assets: &mut Vec<Asset>) -> Result<MergeSummary> {
        for change in &self.changes {
            let asset_id = match change {
                Change::Update { asset_id, .. } | Change::KeepLocal { asset_id, .. } => asset_id,
                Change::Insert { .. } => continue,
            };
            if !assets.iter().any(|a| &a.id == asset_id) {
                return Err(Error::StaleSession(format!(
                    "asset {} no longer exists",
                    asset_id
                )));
            }
        }

        let summary = self.summary();
        for change in self.changes {
            match change {
                Change::Update {
                    asset_id,
                    sku,
                    level,
                    ..
                } => {
                    if let Some(asset) = assets.iter_mut().find(|a| a.id == asset_id) {
                        asset.apply_stock_level(&level, self.synced_at);
                        if asset.sku.is_none() {
                            asset.sku = sku;
                        }
                        tracing::debug!(asset = %asset.id, "updated from central");
                    }
                }
                Change::Insert { asset } => {
                    tracing::debug!(asset = %asset.id, item = %asset.item_name, "inserted from central");
                    assets.push(asset);
                }
                Change::KeepLocal { asset_id, .. } => {
                    tracing::debug!(asset = %asset_id, "kept local value");
                }
            }
        }

        Ok(summary)
    }
}

fn new_asset(
    record: &CentralRecord,
    location_id: &str,
    location_name: &str,
    now: DateTime<Utc>,
) -> Asset {
    let mut asset = Asset::new(
        generate_id(IdKind::Asset),
        record.item_name.clone(),
        location_id.to_string(),
        location_name.to_string(),
    );
    asset.sku = record.sku.clone();
    asset.starting_quantity = record
        .starting_quantity
        .unwrap_or(record.level.current_quantity);
    asset.date_added = now;
    asset.apply_stock_level(&record.level, now);
    asset
}

#[cfg(test)]
mod tests {
    use super::super::detect::detect_conflicts;
    use super::super::test_support::{asset, record};
    use super::*;
    use crate::asset::SyncStatus;
    use crate::config::ConflictStrategy;
    use rust_decimal::Decimal;

    fn plan_for(
        assets: &[Asset],
        records: &[CentralRecord],
        strategy: ConflictStrategy,
    ) -> MergePlan {
        let refs: Vec<&Asset> = assets.iter().collect();
        let conflicts = detect_conflicts(records, &refs, "Headquarters");
        let resolutions = ResolutionStore::seeded(&conflicts, strategy);
        MergePlan::build(
            records,
            &conflicts,
            &resolutions,
            &refs,
            "hq",
            "Headquarters",
            Utc::now(),
        )
    }

    #[test]
    fn test_central_resolution_updates_and_recomputes() {
        let mut assets = vec![asset("ast-1", "Widget", 5, 2)];
        let plan = plan_for(&assets, &[record(1, "Widget", 7, 2)], ConflictStrategy::Central);

        let summary = plan.commit(&mut assets).unwrap();
        assert_eq!(summary, MergeSummary { updated: 1, inserted: 0, kept_local: 0 });
        assert_eq!(assets[0].current_quantity(), 7);
        assert_eq!(assets[0].total_value(), Decimal::from(14));
        assert_eq!(assets[0].sync_status, SyncStatus::Synced);
        assert!(assets[0].last_sync_date.is_some());
    }

    #[test]
    fn test_local_resolution_leaves_asset_untouched() {
        let mut assets = vec![asset("ast-1", "Widget", 5, 2)];
        let before = assets[0].clone();
        let plan = plan_for(&assets, &[record(1, "Widget", 7, 2)], ConflictStrategy::Local);

        let summary = plan.commit(&mut assets).unwrap();
        assert_eq!(summary.kept_local, 1);
        assert_eq!(summary.updated + summary.inserted, 0);
        assert_eq!(assets[0], before);
    }

    #[test]
    fn test_unmatched_row_is_inserted_synced() {
        let mut assets = vec![asset("ast-1", "Widget", 5, 2)];
        let plan = plan_for(
            &assets,
            &[record(1, "Widget", 5, 2), record(2, "Gadget", 4, 3)],
            ConflictStrategy::Central,
        );

        let summary = plan.commit(&mut assets).unwrap();
        assert_eq!(summary, MergeSummary { updated: 1, inserted: 1, kept_local: 0 });
        assert_eq!(assets.len(), 2);

        let gadget = &assets[1];
        assert_eq!(gadget.item_name, "Gadget");
        assert_eq!(gadget.location_id, "hq");
        assert_eq!(gadget.starting_quantity, 4);
        assert_eq!(gadget.total_value(), Decimal::from(12));
        assert_eq!(gadget.sync_status, SyncStatus::Synced);
        assert!(gadget.id.starts_with("ast-"));
    }

    #[test]
    fn test_row_for_another_location_is_inserted_here() {
        let mut assets = vec![asset("ast-1", "Widget", 5, 2)];
        let mut row = record(1, "Widget", 9, 3);
        row.location = Some("Europe Office".to_string());
        let plan = plan_for(&assets, &[row], ConflictStrategy::Central);

        let summary = plan.commit(&mut assets).unwrap();
        assert_eq!(summary, MergeSummary { updated: 0, inserted: 1, kept_local: 0 });
        assert_eq!(assets[0].current_quantity(), 5);
        assert_eq!(assets[1].location_id, "hq");
        assert_eq!(assets[1].location, "Headquarters");
        assert_eq!(assets[1].current_quantity(), 9);
    }

    #[test]
    fn test_update_adopts_central_sku() {
        let mut assets = vec![asset("ast-1", "Widget", 5, 2)];
        let mut row = record(1, "Widget", 5, 2);
        row.sku = Some("W-1".to_string());
        let plan = plan_for(&assets, &[row], ConflictStrategy::Central);

        plan.commit(&mut assets).unwrap();
        assert_eq!(assets[0].sku.as_deref(), Some("W-1"));
    }

    #[test]
    fn test_missing_asset_fails_without_changes() {
        let assets = vec![asset("ast-1", "Widget", 5, 2), asset("ast-2", "Gadget", 1, 1)];
        let plan = plan_for(
            &assets,
            &[record(1, "Widget", 9, 2), record(2, "Gadget", 1, 1), record(3, "Bolt", 1, 1)],
            ConflictStrategy::Central,
        );

        let mut current = vec![assets[0].clone()];
        let before = current.clone();
        let err = plan.commit(&mut current).unwrap_err();
        assert!(matches!(err, Error::StaleSession(_)));
        assert_eq!(current, before);
    }
}
