//! Terminal tables for list output

use assetrack_core::{
    Asset, CentralFile, DisplaySettings, FieldKey, FieldLabels, Location, Shipment, SyncOutcome,
    SyncRecord,
};
use rust_decimal::Decimal;
use tabled::settings::Style;
use tabled::{Table, Tabled};

pub fn money(settings: &DisplaySettings, value: Decimal) -> String {
    format!("{}{:.2}", settings.currency, value)
}

fn render<T: Tabled>(rows: Vec<T>) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

#[derive(Tabled)]
struct AssetRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "SKU")]
    sku: String,
    #[tabled(rename = "Item")]
    item: String,
    #[tabled(rename = "Qty")]
    quantity: u32,
    #[tabled(rename = "Unit")]
    unit_price: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Sync")]
    sync: String,
}

pub fn assets(assets: &[&Asset], settings: &DisplaySettings) -> String {
    let rows = assets
        .iter()
        .map(|a| AssetRow {
            id: a.id.clone(),
            sku: a.sku.clone().unwrap_or_default(),
            item: a.item_name.clone(),
            quantity: a.current_quantity(),
            unit_price: money(settings, a.unit_price()),
            total: money(settings, a.total_value()),
            location: a.location.clone(),
            status: a.status.to_string(),
            sync: a.sync_status.to_string(),
        })
        .collect();
    render::<AssetRow>(rows)
}

#[derive(Tabled)]
struct LocationRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Currency")]
    currency: String,
    #[tabled(rename = "Dates")]
    date_format: String,
    #[tabled(rename = "TZ")]
    timezone: String,
    #[tabled(rename = "Assets")]
    assets: usize,
}

pub fn locations(locations: &[Location], asset_counts: impl Fn(&str) -> usize) -> String {
    let rows = locations
        .iter()
        .map(|l| LocationRow {
            id: l.id.clone(),
            name: l.name.clone(),
            currency: l.currency.clone(),
            date_format: l.date_format.to_string(),
            timezone: l.timezone.clone(),
            assets: asset_counts(&l.id),
        })
        .collect();
    render::<LocationRow>(rows)
}

#[derive(Tabled)]
struct ShipmentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Tracking")]
    tracking: String,
    #[tabled(rename = "Asset")]
    asset: String,
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "To")]
    to: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Date")]
    date: String,
}

pub fn shipments(shipments: &[&Shipment], settings: &DisplaySettings) -> String {
    let rows = shipments
        .iter()
        .map(|s| ShipmentRow {
            id: s.id.clone(),
            tracking: s.tracking_number.clone(),
            asset: s.asset_id.clone(),
            from: s.from_location.clone(),
            to: s.to_location.clone(),
            status: s.status.to_string(),
            date: settings.date_format.format(&s.date),
        })
        .collect();
    render::<ShipmentRow>(rows)
}

#[derive(Tabled)]
struct CentralRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "File")]
    filename: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Rows")]
    rows: usize,
    #[tabled(rename = "Uploaded")]
    uploaded: String,
    #[tabled(rename = "Description")]
    description: String,
}

pub fn central_files(files: &[CentralFile], settings: &DisplaySettings) -> String {
    let rows = files
        .iter()
        .rev()
        .map(|f| CentralRow {
            id: f.id.clone(),
            filename: f.filename.clone(),
            version: f.version.clone(),
            rows: f.row_count,
            uploaded: settings.date_format.format(&f.upload_date),
            description: f.description.clone().unwrap_or_default(),
        })
        .collect();
    render::<CentralRow>(rows)
}

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Direction")]
    direction: String,
    #[tabled(rename = "Outcome")]
    outcome: String,
    #[tabled(rename = "Items")]
    items: usize,
    #[tabled(rename = "Conflicts")]
    conflicts: usize,
}

pub fn history(records: &[&SyncRecord], settings: &DisplaySettings) -> String {
    let rows = records
        .iter()
        .map(|r| HistoryRow {
            date: format!(
                "{} {}",
                settings.date_format.format(&r.date),
                r.date.format("%H:%M")
            ),
            location: r.location.clone(),
            direction: r.direction.to_string(),
            outcome: match r.outcome {
                SyncOutcome::Success => r.outcome.to_string(),
                _ => format!("{} !", r.outcome),
            },
            items: r.items_affected,
            conflicts: r.conflicts,
        })
        .collect();
    render::<HistoryRow>(rows)
}

#[derive(Tabled)]
struct LabelRow {
    #[tabled(rename = "Field")]
    field: &'static str,
    #[tabled(rename = "Key")]
    key: &'static str,
    #[tabled(rename = "Label")]
    label: String,
}

pub fn labels(labels: &FieldLabels) -> String {
    let rows = FieldKey::ALL
        .into_iter()
        .map(|f| LabelRow {
            field: f.snake(),
            key: f.key(),
            label: labels.get(f).to_string(),
        })
        .collect();
    render::<LabelRow>(rows)
}
