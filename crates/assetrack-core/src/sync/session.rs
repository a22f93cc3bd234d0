//! One sync from a central file into a location

use super::detect::{detect_conflicts, prepare_records};
use super::{
    Conflict, JoinKey, MergePlan, MergeSummary, Resolution, ResolutionStore, SyncDirection,
    SyncOutcome, SyncRecord,
};
use crate::central::{CentralRecord, SkippedRow};
use crate::id::{IdKind, generate_id};
use crate::inventory::Inventory;
use crate::location::Scope;
use crate::{Error, Result};
use chrono::Utc;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Nothing to resolve; apply straight away
    NoConflicts,
    /// Conflicts await a resolution choice
    ResolutionPending,
}

/// What an applied sync did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub record: SyncRecord,
    pub summary: MergeSummary,
    pub skipped: Vec<SkippedRow>,
}

/// A sync in progress
///
/// Holds the typed central rows, the detected conflicts and the user's
/// choices. Dropping or cancelling the session records nothing.
#[derive(Debug, Clone)]
pub struct SyncSession {
    file_id: String,
    file_version: String,
    location_id: String,
    location_name: String,
    row_count: usize,
    records: Vec<CentralRecord>,
    skipped: Vec<SkippedRow>,
    conflicts: Vec<Conflict>,
    resolutions: ResolutionStore,
}

impl SyncSession {
    /// Detect conflicts between a central file and the scope's location
    pub fn begin(inventory: &Inventory, file_id: &str, scope: &Scope) -> Result<Self> {
        let location_id = scope.location_id().ok_or(Error::NoLocationSelected)?;
        let location = inventory
            .location(location_id)
            .ok_or_else(|| Error::LocationNotFound(location_id.to_string()))?;
        let file = inventory
            .central_file(file_id)
            .ok_or_else(|| Error::CentralFileNotFound(file_id.to_string()))?;

        let config = inventory.config();
        let assets = inventory.assets_in(scope);
        let prepared = prepare_records(file, &config.labels, &location.name, &assets);
        let conflicts = detect_conflicts(&prepared.records, &assets, &location.name);
        let resolutions = ResolutionStore::seeded(&conflicts, config.conflict_strategy);

        tracing::info!(
            file = %file.id,
            version = %file.version,
            location = %location.name,
            rows = prepared.records.len(),
            skipped = prepared.skipped.len(),
            conflicts = conflicts.len(),
            "sync started"
        );

        Ok(Self {
            file_id: file.id.clone(),
            file_version: file.version.clone(),
            location_id: location.id.clone(),
            location_name: location.name.clone(),
            row_count: file.rows().len(),
            records: prepared.records,
            skipped: prepared.skipped,
            conflicts,
            resolutions,
        })
    }

    pub fn state(&self) -> SessionState {
        if self.conflicts.is_empty() {
            SessionState::NoConflicts
        } else {
            SessionState::ResolutionPending
        }
    }

    pub fn file_id(&self) -> &str {
        &self.file_id
    }

    pub fn file_version(&self) -> &str {
        &self.file_version
    }

    pub fn location_name(&self) -> &str {
        &self.location_name
    }

    pub fn records(&self) -> &[CentralRecord] {
        &self.records
    }

    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    pub fn skipped(&self) -> &[SkippedRow] {
        &self.skipped
    }

    pub fn resolution(&self, key: &JoinKey) -> Resolution {
        self.resolutions.get(key)
    }

    pub fn resolve_key(&mut self, key: &JoinKey, resolution: Resolution) -> Result<()> {
        self.resolutions.choose(key, resolution)
    }

    /// Resolve the conflict named by a SKU, item name or local asset id
    pub fn resolve(&mut self, reference: &str, resolution: Resolution) -> Result<()> {
        let key = self
            .conflicts
            .iter()
            .find(|c| c.key.matches_ref(reference) || c.asset_id == reference)
            .map(|c| c.key.clone())
            .ok_or_else(|| Error::UnknownConflict(reference.to_string()))?;
        self.resolutions.choose(&key, resolution)
    }

    pub fn resolve_all(&mut self, resolution: Resolution) {
        self.resolutions.set_all(resolution);
    }

    /// The merge `apply` would commit against the inventory as it is now
    pub fn plan(&self, inventory: &Inventory) -> MergePlan {
        let assets = inventory.assets_in(&Scope::Location(self.location_id.clone()));
        MergePlan::build(
            &self.records,
            &self.conflicts,
            &self.resolutions,
            &assets,
            &self.location_id,
            &self.location_name,
            Utc::now(),
        )
    }

    /// Commit the merge and append a history record
    ///
    /// Items affected counts every data row of the central file.
    ///
    /// Fails with [`Error::StaleSession`] and changes nothing if a
    /// conflicting asset was deleted or edited after `begin`.
    pub fn apply(self, inventory: &mut Inventory) -> Result<SyncReport> {
        self.check_fresh(inventory)?;

        let plan = self.plan(inventory);
        let summary = plan.commit(inventory.assets_mut())?;

        let outcome = if self.skipped.is_empty() {
            SyncOutcome::Success
        } else {
            SyncOutcome::Partial
        };
        let record = SyncRecord {
            id: generate_id(IdKind::SyncRecord),
            date: Utc::now(),
            location: self.location_name.clone(),
            direction: SyncDirection::Pull,
            outcome,
            items_affected: self.row_count,
            conflicts: summary.kept_local,
        };
        inventory.history_mut().record(record.clone());

        Ok(SyncReport {
            record,
            summary,
            skipped: self.skipped,
        })
    }

    /// Discard the session and its choices
    pub fn cancel(self) {
        tracing::info!(file = %self.file_id, location = %self.location_name, "sync cancelled");
    }

    fn check_fresh(&self, inventory: &Inventory) -> Result<()> {
        if inventory.location(&self.location_id).is_none() {
            return Err(Error::StaleSession(format!(
                "location {} no longer exists",
                self.location_id
            )));
        }
        for conflict in &self.conflicts {
            let asset = inventory.asset(&conflict.asset_id).map_err(|_| {
                Error::StaleSession(format!("asset {} no longer exists", conflict.asset_id))
            })?;
            if asset.stock_level() != conflict.local {
                return Err(Error::StaleSession(format!(
                    "asset {} changed",
                    conflict.asset_id
                )));
            }
        }
        Ok(())
    }
}

impl Inventory {
    /// Begin a sync from the most recently uploaded central file
    pub fn sync_latest(&self, scope: &Scope) -> Result<SyncSession> {
        if scope.location_id().is_none() {
            return Err(Error::NoLocationSelected);
        }
        let latest = self.latest_central_file().ok_or(Error::NoCentralFiles)?;
        SyncSession::begin(self, &latest.id, scope)
    }

    /// Begin a sync from a specific central file
    pub fn sync_from(&self, file_id: &str, scope: &Scope) -> Result<SyncSession> {
        SyncSession::begin(self, file_id, scope)
    }
}
