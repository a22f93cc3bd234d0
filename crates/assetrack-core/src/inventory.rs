//! The inventory: single owner of every collection
//!
//! All mutation goes through `&mut Inventory`. Nothing here touches the
//! filesystem; see [`crate::store`] for the on-disk working copy.

use crate::asset::{Asset, AssetInput};
use crate::audit::{self, AuditRecord};
use crate::central::CentralFile;
use crate::config::{Config, DateFormat};
use crate::csv;
use crate::id::{IdKind, generate_id};
use crate::location::{HQ_ID, HQ_NAME, Location, LocationInput, Scope};
use crate::shipment::{Shipment, ShipmentInput};
use crate::sync::{SyncHistory, SyncRecord};
use crate::{Error, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Every collection the inventory holds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryData {
    #[serde(default)]
    pub assets: Vec<Asset>,
    #[serde(default = "Location::defaults")]
    pub locations: Vec<Location>,
    #[serde(default)]
    pub shipments: Vec<Shipment>,
    #[serde(default)]
    pub audits: Vec<AuditRecord>,
    #[serde(default)]
    pub central_files: Vec<CentralFile>,
    #[serde(default)]
    pub sync_history: SyncHistory,
}

impl Default for InventoryData {
    fn default() -> Self {
        Self {
            assets: Vec::new(),
            locations: Location::defaults(),
            shipments: Vec::new(),
            audits: Vec::new(),
            central_files: Vec::new(),
            sync_history: SyncHistory::default(),
        }
    }
}

/// Currency and date format in effect for a scope
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplaySettings {
    pub currency: String,
    pub date_format: DateFormat,
}

#[derive(Debug, Clone, Default)]
pub struct Inventory {
    config: Config,
    data: InventoryData,
}

impl Inventory {
    /// Empty inventory with the default locations
    pub fn new(config: Config) -> Self {
        Self {
            config,
            data: InventoryData::default(),
        }
    }

    /// Rebuild from loaded parts; stored totals are recomputed
    pub fn from_parts(config: Config, mut data: InventoryData) -> Self {
        for asset in &mut data.assets {
            asset.recompute_total();
        }
        Self { config, data }
    }

    pub fn into_parts(self) -> (Config, InventoryData) {
        (self.config, self.data)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn data(&self) -> &InventoryData {
        &self.data
    }

    // === Assets ===

    pub fn assets(&self) -> &[Asset] {
        &self.data.assets
    }

    /// Assets visible in a scope; global sees all
    pub fn assets_in(&self, scope: &Scope) -> Vec<&Asset> {
        self.data
            .assets
            .iter()
            .filter(|a| scope.includes(&a.location_id))
            .collect()
    }

    pub fn asset(&self, id: &str) -> Result<&Asset> {
        self.data
            .assets
            .iter()
            .find(|a| a.id == id)
            .ok_or_else(|| Error::AssetNotFound(id.to_string()))
    }

    fn asset_mut(&mut self, id: &str) -> Result<&mut Asset> {
        self.data
            .assets
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| Error::AssetNotFound(id.to_string()))
    }

    pub(crate) fn assets_mut(&mut self) -> &mut Vec<Asset> {
        &mut self.data.assets
    }

    /// Add an asset
    ///
    /// The location is the scope's when one is selected, otherwise the
    /// location named in the input, falling back to headquarters.
    pub fn add_asset(&mut self, input: AssetInput, scope: &Scope) -> Result<&Asset> {
        let (location_id, location_name) = self.placement(&input.location, scope);
        let mut asset = Asset::new(
            generate_id(IdKind::Asset),
            String::new(),
            location_id,
            location_name,
        );
        fill_asset(&mut asset, input)?;

        tracing::info!(id = %asset.id, item = %asset.item_name, location = %asset.location, "asset added");
        self.data.assets.push(asset);
        let last = self.data.assets.len() - 1;
        Ok(&self.data.assets[last])
    }

    /// Replace an asset's form fields; the asset is marked pending sync
    pub fn update_asset(&mut self, id: &str, input: AssetInput, scope: &Scope) -> Result<&Asset> {
        let (location_id, location_name) = self.placement(&input.location, scope);
        let asset = self.asset_mut(id)?;

        let mut updated = asset.clone();
        updated.location_id = location_id;
        updated.location = location_name;
        fill_asset(&mut updated, input)?;
        updated.mark_pending();
        *asset = updated;

        tracing::info!(id = %asset.id, item = %asset.item_name, "asset updated");
        Ok(asset)
    }

    pub fn delete_asset(&mut self, id: &str) -> Result<Asset> {
        let index = self
            .data
            .assets
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| Error::AssetNotFound(id.to_string()))?;
        let asset = self.data.assets.remove(index);
        tracing::info!(id = %asset.id, item = %asset.item_name, "asset deleted");
        Ok(asset)
    }

    /// Location id and name for a new asset; headquarters when the scope or
    /// name points nowhere
    fn placement(&self, location_name: &str, scope: &Scope) -> (String, String) {
        let id = scope
            .location_id()
            .unwrap_or_else(|| self.location_id_for(location_name));
        match self.location(id) {
            Some(location) => (location.id.clone(), location.name.clone()),
            None => (HQ_ID.to_string(), HQ_NAME.to_string()),
        }
    }

    // === Audits ===

    /// Record a physical count for an asset
    ///
    /// A count that differs from the system quantity replaces it and marks
    /// the asset pending sync.
    pub fn complete_audit(
        &mut self,
        asset_id: &str,
        physical_count: u32,
        notes: &str,
        auditor: &str,
    ) -> Result<AuditRecord> {
        let asset = self.asset_mut(asset_id)?;
        let system_count = asset.current_quantity();
        let record = AuditRecord {
            id: generate_id(IdKind::Audit),
            asset_id: asset.id.clone(),
            asset_name: asset.item_name.clone(),
            system_count,
            physical_count,
            discrepancy: audit::discrepancy(system_count, physical_count),
            notes: notes.to_string(),
            date: Utc::now(),
            auditor: auditor.to_string(),
            location: asset.location.clone(),
        };

        if record.has_discrepancy() {
            asset.set_quantity(physical_count);
            asset.mark_pending();
            tracing::info!(
                asset = %record.asset_id,
                discrepancy = record.discrepancy,
                "audit adjusted quantity"
            );
        }

        self.data.audits.push(record.clone());
        Ok(record)
    }

    pub fn audits_in(&self, scope: &Scope) -> Vec<&AuditRecord> {
        match scope.location_id().and_then(|id| self.location(id)) {
            Some(location) => self
                .data
                .audits
                .iter()
                .filter(|a| a.location == location.name)
                .collect(),
            None => self.data.audits.iter().collect(),
        }
    }

    // === Locations ===

    pub fn locations(&self) -> &[Location] {
        &self.data.locations
    }

    pub fn location(&self, id: &str) -> Option<&Location> {
        self.data.locations.iter().find(|l| l.id == id)
    }

    pub fn location_by_name(&self, name: &str) -> Option<&Location> {
        self.data.locations.iter().find(|l| l.name == name)
    }

    /// Location id for a display name, headquarters when unknown
    pub fn location_id_for(&self, name: &str) -> &str {
        self.location_by_name(name)
            .map(|l| l.id.as_str())
            .unwrap_or(HQ_ID)
    }

    /// Find a location by id or by name, ignoring case
    pub fn resolve_location(&self, reference: &str) -> Result<&Location> {
        self.data
            .locations
            .iter()
            .find(|l| l.id == reference)
            .or_else(|| {
                self.data
                    .locations
                    .iter()
                    .find(|l| l.name.eq_ignore_ascii_case(reference))
            })
            .ok_or_else(|| Error::LocationNotFound(reference.to_string()))
    }

    pub fn add_location(&mut self, input: LocationInput) -> Result<&Location> {
        let name = required("name", &input.name)?;
        let location = Location {
            id: generate_id(IdKind::Location),
            name,
            currency: input.currency,
            date_format: input.date_format,
            timezone: input.timezone,
            users: Vec::new(),
        };
        tracing::info!(id = %location.id, name = %location.name, "location added");
        self.data.locations.push(location);
        let last = self.data.locations.len() - 1;
        Ok(&self.data.locations[last])
    }

    /// Edit a location; a new name is carried to its assets and shipments
    pub fn update_location(&mut self, id: &str, input: LocationInput) -> Result<&Location> {
        let name = required("name", &input.name)?;
        let index = self
            .data
            .locations
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| Error::LocationNotFound(id.to_string()))?;

        let location = &mut self.data.locations[index];
        let renamed = location.name != name;
        location.name = name.clone();
        location.currency = input.currency;
        location.date_format = input.date_format;
        location.timezone = input.timezone;

        if renamed {
            for asset in self.data.assets.iter_mut().filter(|a| a.location_id == id) {
                asset.location = name.clone();
            }
            for shipment in &mut self.data.shipments {
                if shipment.from_location_id == id {
                    shipment.from_location = name.clone();
                }
                if shipment.to_location_id == id {
                    shipment.to_location = name.clone();
                }
            }
        }

        tracing::info!(id, name = %name, renamed, "location updated");
        Ok(&self.data.locations[index])
    }

    /// Delete a location, moving its assets to headquarters
    pub fn delete_location(&mut self, id: &str) -> Result<Location> {
        if id == HQ_ID {
            return Err(Error::ProtectedLocation(HQ_NAME.to_string()));
        }
        let index = self
            .data
            .locations
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| Error::LocationNotFound(id.to_string()))?;

        let hq_name = self
            .location(HQ_ID)
            .map(|l| l.name.clone())
            .unwrap_or_else(|| HQ_NAME.to_string());
        let mut moved = 0;
        for asset in self.data.assets.iter_mut().filter(|a| a.location_id == id) {
            asset.location_id = HQ_ID.to_string();
            asset.location = hq_name.clone();
            moved += 1;
        }

        let location = self.data.locations.remove(index);
        tracing::info!(id, name = %location.name, moved, "location deleted");
        Ok(location)
    }

    /// Currency and date format for a scope: the location's own, or global
    pub fn display_settings(&self, scope: &Scope) -> DisplaySettings {
        match scope.location_id().and_then(|id| self.location(id)) {
            Some(location) => DisplaySettings {
                currency: location.currency.clone(),
                date_format: location.date_format,
            },
            None => DisplaySettings {
                currency: self.config.currency_symbol.clone(),
                date_format: self.config.date_format,
            },
        }
    }

    // === Shipments ===

    pub fn shipments(&self) -> &[Shipment] {
        &self.data.shipments
    }

    /// Shipments leaving or arriving at the scope's location
    pub fn shipments_in(&self, scope: &Scope) -> Vec<&Shipment> {
        match scope.location_id() {
            Some(id) => self.data.shipments.iter().filter(|s| s.touches(id)).collect(),
            None => self.data.shipments.iter().collect(),
        }
    }

    /// Record a shipment; the origin is the scope's location when one is selected
    pub fn record_shipment(&mut self, input: ShipmentInput, scope: &Scope) -> Result<&Shipment> {
        let tracking_number = required("tracking_number", &input.tracking_number)?;
        self.asset(&input.asset_id)?;

        let from_location_id = match scope.location_id() {
            Some(id) => id.to_string(),
            None => self.location_id_for(&input.from_location).to_string(),
        };
        let to_location_id = self.location_id_for(&input.to_location).to_string();

        let shipment = Shipment {
            id: generate_id(IdKind::Shipment),
            tracking_number,
            asset_id: input.asset_id,
            from_location: input.from_location,
            to_location: input.to_location,
            from_location_id,
            to_location_id,
            status: input.status,
            date: Utc::now(),
        };
        tracing::info!(id = %shipment.id, tracking = %shipment.tracking_number, "shipment recorded");
        self.data.shipments.push(shipment);
        let last = self.data.shipments.len() - 1;
        Ok(&self.data.shipments[last])
    }

    pub fn delete_shipment(&mut self, id: &str) -> Result<Shipment> {
        let index = self
            .data
            .shipments
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| Error::ShipmentNotFound(id.to_string()))?;
        Ok(self.data.shipments.remove(index))
    }

    // === Central files ===

    pub fn central_files(&self) -> &[CentralFile] {
        &self.data.central_files
    }

    pub fn central_file(&self, id: &str) -> Option<&CentralFile> {
        self.data.central_files.iter().find(|f| f.id == id)
    }

    /// The most recently uploaded file
    pub fn latest_central_file(&self) -> Option<&CentralFile> {
        self.data.central_files.last()
    }

    /// Parse and store a master CSV
    ///
    /// Text that does not parse stores nothing. The version defaults to
    /// `v{n}` where n counts the file being added.
    pub fn upload_central(
        &mut self,
        filename: &str,
        text: &str,
        version: Option<String>,
        description: Option<String>,
    ) -> Result<&CentralFile> {
        let table = csv::parse(text)?;
        let file = CentralFile {
            id: generate_id(IdKind::CentralFile),
            filename: filename.to_string(),
            version: version
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| format!("v{}", self.data.central_files.len() + 1)),
            upload_date: Utc::now(),
            row_count: table.rows.len(),
            description: description.filter(|d| !d.trim().is_empty()),
            table,
        };
        tracing::info!(
            id = %file.id,
            filename = %file.filename,
            version = %file.version,
            rows = file.row_count,
            "central file uploaded"
        );
        self.data.central_files.push(file);
        let last = self.data.central_files.len() - 1;
        Ok(&self.data.central_files[last])
    }

    pub(crate) fn push_central(&mut self, file: CentralFile) {
        self.data.central_files.push(file);
    }

    /// Filename and CSV text of a stored file, with its original headers
    pub fn download_central(&self, id: &str) -> Result<(String, String)> {
        let file = self
            .central_file(id)
            .ok_or_else(|| Error::CentralFileNotFound(id.to_string()))?;
        Ok((file.filename.clone(), csv::serialize_table(&file.table)))
    }

    pub fn delete_central(&mut self, id: &str) -> Result<CentralFile> {
        let index = self
            .data
            .central_files
            .iter()
            .position(|f| f.id == id)
            .ok_or_else(|| Error::CentralFileNotFound(id.to_string()))?;
        let file = self.data.central_files.remove(index);
        tracing::info!(id = %file.id, filename = %file.filename, "central file deleted");
        Ok(file)
    }

    // === History ===

    pub fn history(&self) -> &SyncHistory {
        &self.data.sync_history
    }

    pub(crate) fn history_mut(&mut self) -> &mut SyncHistory {
        &mut self.data.sync_history
    }

    /// History for display, bounded by the configured limit
    pub fn recent_history(&self) -> Vec<&SyncRecord> {
        self.data
            .sync_history
            .recent(self.config.history_display_limit)
    }

    /// Remove assets, shipments, audits, central files and history
    ///
    /// Locations and settings are kept.
    pub fn clear_all(&mut self) {
        self.data.assets.clear();
        self.data.shipments.clear();
        self.data.audits.clear();
        self.data.central_files.clear();
        self.data.sync_history.clear();
        tracing::warn!("all inventory data cleared");
    }
}

fn required(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::invalid(field, value));
    }
    Ok(value.to_string())
}

fn fill_asset(asset: &mut Asset, input: AssetInput) -> Result<()> {
    asset.item_name = required("item_name", &input.item_name)?;
    asset.set_unit_price(input.unit_price)?;
    asset.sku = input.sku.filter(|s| !s.trim().is_empty());
    asset.starting_quantity = input.starting_quantity.unwrap_or(input.current_quantity);
    asset.set_quantity(input.current_quantity);
    asset.status = input.status;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{AssetStatus, SyncStatus};
    use crate::shipment::ShipmentStatus;
    use rust_decimal::Decimal;

    fn widget_input(location: &str) -> AssetInput {
        AssetInput {
            item_name: "Widget".to_string(),
            current_quantity: 4,
            unit_price: Decimal::new(250, 2),
            location: location.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_add_asset_uses_scope_location() {
        let mut inv = Inventory::default();
        let scope = Scope::Location("europe".to_string());
        let asset = inv.add_asset(widget_input("Headquarters"), &scope).unwrap();

        assert_eq!(asset.location_id, "europe");
        assert_eq!(asset.location, "Europe Office");
        assert_eq!(asset.starting_quantity, 4);
        assert_eq!(asset.total_value(), Decimal::from(10));
        assert_eq!(asset.sync_status, SyncStatus::Pending);
    }

    #[test]
    fn test_add_asset_global_resolves_name_or_hq() {
        let mut inv = Inventory::default();
        let id = inv
            .add_asset(widget_input("Asia Pacific"), &Scope::Global)
            .unwrap()
            .location_id
            .clone();
        assert_eq!(id, "asia");

        let asset = inv.add_asset(widget_input("Mars Base"), &Scope::Global).unwrap();
        assert_eq!(asset.location_id, HQ_ID);
        assert_eq!(asset.location, HQ_NAME);
    }

    #[test]
    fn test_add_asset_unknown_scope_falls_back_to_hq() {
        let mut inv = Inventory::default();
        let scope = Scope::Location("moon".to_string());
        let asset = inv.add_asset(widget_input("Europe Office"), &scope).unwrap();

        assert_eq!(asset.location_id, HQ_ID);
        assert_eq!(asset.location, HQ_NAME);
    }

    #[test]
    fn test_add_asset_rejects_blank_name() {
        let mut inv = Inventory::default();
        let mut input = widget_input("Headquarters");
        input.item_name = "  ".to_string();
        assert!(inv.add_asset(input, &Scope::Global).is_err());
        assert!(inv.assets().is_empty());
    }

    #[test]
    fn test_update_asset_marks_pending() {
        let mut inv = Inventory::default();
        let id = inv
            .add_asset(widget_input("Headquarters"), &Scope::Global)
            .unwrap()
            .id
            .clone();
        inv.assets_mut()[0].mark_synced(Utc::now());

        let mut input = AssetInput::from(inv.asset(&id).unwrap());
        input.current_quantity = 10;
        input.status = AssetStatus::Maintenance;
        let asset = inv.update_asset(&id, input, &Scope::Global).unwrap();

        assert_eq!(asset.current_quantity(), 10);
        assert_eq!(asset.total_value(), Decimal::from(25));
        assert_eq!(asset.status, AssetStatus::Maintenance);
        assert_eq!(asset.sync_status, SyncStatus::Pending);
    }

    #[test]
    fn test_delete_location_moves_assets_to_hq() {
        let mut inv = Inventory::default();
        let scope = Scope::Location("europe".to_string());
        inv.add_asset(widget_input(""), &scope).unwrap();
        inv.add_asset(widget_input(""), &scope).unwrap();
        inv.add_asset(widget_input("Asia Pacific"), &Scope::Global).unwrap();

        inv.delete_location("europe").unwrap();

        assert!(inv.location("europe").is_none());
        let at_hq: Vec<_> = inv.assets().iter().filter(|a| a.location_id == HQ_ID).collect();
        assert_eq!(at_hq.len(), 2);
        assert!(at_hq.iter().all(|a| a.location == HQ_NAME));
        assert_eq!(inv.assets_in(&Scope::Location("asia".to_string())).len(), 1);
    }

    #[test]
    fn test_hq_cannot_be_deleted() {
        let mut inv = Inventory::default();
        let err = inv.delete_location(HQ_ID).unwrap_err();
        assert!(matches!(err, Error::ProtectedLocation(_)));
        assert_eq!(inv.locations().len(), 3);
    }

    #[test]
    fn test_rename_location_propagates() {
        let mut inv = Inventory::default();
        inv.add_asset(widget_input(""), &Scope::Location("asia".to_string()))
            .unwrap();

        inv.update_location(
            "asia",
            LocationInput {
                name: "Tokyo".to_string(),
                currency: "¥".to_string(),
                date_format: DateFormat::Iso,
                timezone: "JST".to_string(),
            },
        )
        .unwrap();

        assert_eq!(inv.assets()[0].location, "Tokyo");
        assert_eq!(inv.location_id_for("Tokyo"), "asia");
    }

    #[test]
    fn test_audit_discrepancy_adjusts_quantity() {
        let mut inv = Inventory::default();
        let id = inv
            .add_asset(widget_input("Headquarters"), &Scope::Global)
            .unwrap()
            .id
            .clone();
        inv.assets_mut()[0].mark_synced(Utc::now());

        let record = inv.complete_audit(&id, 3, "one missing", "System User").unwrap();
        assert_eq!(record.system_count, 4);
        assert_eq!(record.discrepancy, -1);

        let asset = inv.asset(&id).unwrap();
        assert_eq!(asset.current_quantity(), 3);
        assert_eq!(asset.total_value(), Decimal::new(750, 2));
        assert_eq!(asset.sync_status, SyncStatus::Pending);
        assert_eq!(inv.audits_in(&Scope::Global).len(), 1);
    }

    #[test]
    fn test_audit_without_discrepancy_keeps_sync_status() {
        let mut inv = Inventory::default();
        let id = inv
            .add_asset(widget_input("Headquarters"), &Scope::Global)
            .unwrap()
            .id
            .clone();
        inv.assets_mut()[0].mark_synced(Utc::now());

        inv.complete_audit(&id, 4, "", "System User").unwrap();
        assert_eq!(inv.asset(&id).unwrap().sync_status, SyncStatus::Synced);
    }

    #[test]
    fn test_shipments_filter_by_either_end() {
        let mut inv = Inventory::default();
        let asset_id = inv
            .add_asset(widget_input("Headquarters"), &Scope::Global)
            .unwrap()
            .id
            .clone();

        inv.record_shipment(
            ShipmentInput {
                tracking_number: "TRK-1".to_string(),
                asset_id: asset_id.clone(),
                from_location: "Headquarters".to_string(),
                to_location: "Europe Office".to_string(),
                status: ShipmentStatus::InTransit,
            },
            &Scope::Global,
        )
        .unwrap();

        assert_eq!(inv.shipments_in(&Scope::Location("europe".to_string())).len(), 1);
        assert_eq!(inv.shipments_in(&Scope::Location(HQ_ID.to_string())).len(), 1);
        assert!(inv.shipments_in(&Scope::Location("asia".to_string())).is_empty());
    }

    #[test]
    fn test_upload_central_versions_and_rejects_bad_text() {
        let mut inv = Inventory::default();
        assert!(matches!(
            inv.upload_central("empty.csv", "itemName\n", None, None),
            Err(Error::CsvTooShort)
        ));
        assert!(inv.central_files().is_empty());

        let text = "itemName,currentQuantity\nWidget,5";
        let first = inv.upload_central("a.csv", text, None, None).unwrap();
        assert_eq!(first.version, "v1");
        assert_eq!(first.row_count, 1);
        let second = inv
            .upload_central("b.csv", text, Some("spring".to_string()), None)
            .unwrap();
        assert_eq!(second.version, "spring");

        let latest = inv.latest_central_file().unwrap().id.clone();
        let (filename, body) = inv.download_central(&latest).unwrap();
        assert_eq!(filename, "b.csv");
        assert_eq!(body, text);
    }

    #[test]
    fn test_clear_all_keeps_locations_and_settings() {
        let mut inv = Inventory::default();
        inv.config_mut().currency_symbol = "£".to_string();
        inv.add_asset(widget_input("Headquarters"), &Scope::Global).unwrap();
        inv.upload_central("a.csv", "itemName\nWidget", None, None).unwrap();

        inv.clear_all();

        assert!(inv.assets().is_empty());
        assert!(inv.central_files().is_empty());
        assert_eq!(inv.locations().len(), 3);
        assert_eq!(inv.config().currency_symbol, "£");
    }

    #[test]
    fn test_display_settings() {
        let inv = Inventory::default();
        let europe = inv.display_settings(&Scope::Location("europe".to_string()));
        assert_eq!(europe.currency, "€");
        assert_eq!(europe.date_format, DateFormat::DayMonthYear);

        let global = inv.display_settings(&Scope::Global);
        assert_eq!(global.currency, "$");
    }
}
