//! CLI command implementations

use crate::table;
use anyhow::{Result, anyhow, bail};
use assetrack_core::import::IMPORT_FIELDS;
use assetrack_core::{
    AssetInput, AssetStatus, Config, Conflict, FieldKey, ImportMapping, Inventory, LocationInput,
    Resolution, Scope, SessionState, ShipmentInput, Snapshot, Store, SyncSession, SyncStatus, csv,
};
use colored::Colorize;
use rust_decimal::Decimal;
use std::io::Write;

/// Flags shared by every command
pub struct Context {
    pub json: bool,
    pub location: Option<String>,
}

impl Context {
    /// Resolve `--location` against the inventory's locations
    fn scope(&self, inventory: &Inventory) -> Result<Scope> {
        match self.location.as_deref() {
            None => Ok(Scope::Global),
            Some(reference) if reference.is_empty() || reference.eq_ignore_ascii_case("global") => {
                Ok(Scope::Global)
            }
            Some(reference) => Ok(Scope::Location(
                inventory.resolve_location(reference)?.id.clone(),
            )),
        }
    }
}

/// Errors that leave state untouched and are reported as warnings
pub fn is_warning(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<assetrack_core::Error>()
        .is_some_and(|e| e.is_warning())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

pub fn init(ctx: &Context) -> Result<()> {
    let store = Store::init()?;
    if ctx.json {
        println!("{}", serde_json::to_string(store.inventory().locations())?);
    } else {
        println!(
            "{} Initialized assetrack in {}",
            "✓".green(),
            store.store_dir().display()
        );
        for location in store.inventory().locations() {
            println!("  {} {}", location.id.cyan(), location.name);
        }
    }
    Ok(())
}

// === Assets ===

/// Asset fields given on the command line; unset fields are left alone
pub struct AssetArgs {
    pub name: Option<String>,
    pub quantity: Option<u32>,
    pub starting: Option<u32>,
    pub price: Option<String>,
    pub sku: Option<String>,
    pub at: Option<String>,
    pub status: Option<String>,
}

impl AssetArgs {
    fn apply_to(self, input: &mut AssetInput) -> Result<()> {
        if let Some(name) = self.name {
            input.item_name = name;
        }
        if let Some(quantity) = self.quantity {
            input.current_quantity = quantity;
        }
        if let Some(starting) = self.starting {
            input.starting_quantity = Some(starting);
        }
        if let Some(price) = self.price {
            input.unit_price = price
                .trim()
                .parse::<Decimal>()
                .map_err(|_| anyhow!("Invalid price: {}", price))?;
        }
        if let Some(sku) = self.sku {
            let sku = sku.trim().to_string();
            input.sku = (!sku.is_empty()).then_some(sku);
        }
        if let Some(at) = self.at {
            input.location = at;
        }
        if let Some(status) = self.status {
            input.status = status.parse()?;
        }
        Ok(())
    }
}

pub fn asset_add(ctx: &Context, args: AssetArgs) -> Result<()> {
    let mut store = Store::open()?;
    let scope = ctx.scope(store.inventory())?;

    let mut input = AssetInput::default();
    args.apply_to(&mut input)?;
    let asset = store.inventory_mut().add_asset(input, &scope)?.clone();
    store.save()?;

    if ctx.json {
        println!("{}", serde_json::to_string(&asset)?);
    } else {
        let settings = store.inventory().display_settings(&scope);
        println!("{} Added asset: {}", "✓".green(), asset.id.cyan());
        println!("  {} at {}", asset.item_name, asset.location);
        println!(
            "  {} x {} = {}",
            asset.current_quantity(),
            table::money(&settings, asset.unit_price()),
            table::money(&settings, asset.total_value())
        );
    }
    Ok(())
}

pub fn asset_list(
    ctx: &Context,
    status: Option<String>,
    sync_status: Option<String>,
) -> Result<()> {
    let store = Store::open()?;
    let inventory = store.inventory();
    let scope = ctx.scope(inventory)?;
    let mut assets = inventory.assets_in(&scope);

    if let Some(ref s) = status {
        let status: AssetStatus = s.parse()?;
        assets.retain(|a| a.status == status);
    }
    if let Some(ref s) = sync_status {
        let sync: SyncStatus = s.parse()?;
        assets.retain(|a| a.sync_status == sync);
    }

    if ctx.json {
        println!("{}", serde_json::to_string(&assets)?);
    } else if assets.is_empty() {
        println!("No assets found in {}", inventory.scope_name(&scope));
    } else {
        let settings = inventory.display_settings(&scope);
        let total: Decimal = assets.iter().map(|a| a.total_value()).sum();
        println!("{}", table::assets(&assets, &settings));
        println!(
            "{} assets, total value {}",
            assets.len(),
            table::money(&settings, total).bold()
        );
    }
    Ok(())
}

pub fn asset_show(ctx: &Context, id: &str) -> Result<()> {
    let store = Store::open()?;
    let inventory = store.inventory();
    let asset = inventory.asset(id)?;
    let audits: Vec<_> = inventory
        .data()
        .audits
        .iter()
        .filter(|a| a.asset_id == asset.id)
        .collect();

    if ctx.json {
        let value = serde_json::json!({ "asset": asset, "audits": audits });
        println!("{}", serde_json::to_string(&value)?);
        return Ok(());
    }

    let settings = inventory.display_settings(&Scope::Location(asset.location_id.clone()));
    println!("{} {}", asset.id.cyan(), asset.item_name.bold());
    if let Some(ref sku) = asset.sku {
        println!("SKU: {}", sku);
    }
    println!("Location: {}", asset.location);
    println!("Status: {}", asset.status);
    println!(
        "Quantity: {} (started at {})",
        asset.current_quantity(),
        asset.starting_quantity
    );
    println!("Unit price: {}", table::money(&settings, asset.unit_price()));
    println!("Total value: {}", table::money(&settings, asset.total_value()));
    println!("Added: {}", settings.date_format.format(&asset.date_added));
    match asset.last_sync_date {
        Some(ref date) => println!(
            "Sync: {} ({})",
            asset.sync_status,
            settings.date_format.format(date)
        ),
        None => println!("Sync: {}", asset.sync_status),
    }

    if !audits.is_empty() {
        println!();
        println!("{}", "Audits:".bold());
        for audit in audits {
            let discrepancy = match audit.discrepancy {
                0 => "0".green(),
                d => format!("{:+}", d).red(),
            };
            println!(
                "  {} {} counted {} (system {}) {}",
                settings.date_format.format(&audit.date),
                audit.auditor,
                audit.physical_count,
                audit.system_count,
                discrepancy
            );
        }
    }
    Ok(())
}

pub fn asset_update(ctx: &Context, id: &str, args: AssetArgs) -> Result<()> {
    let mut store = Store::open()?;
    let mut input = AssetInput::from(store.inventory().asset(id)?);
    args.apply_to(&mut input)?;

    // The asset stays where it is unless --at names another location
    let asset = store
        .inventory_mut()
        .update_asset(id, input, &Scope::Global)?
        .clone();
    store.save()?;

    if ctx.json {
        println!("{}", serde_json::to_string(&asset)?);
    } else {
        println!("{} Updated asset: {}", "✓".green(), asset.id.cyan());
    }
    Ok(())
}

pub fn asset_delete(ctx: &Context, id: &str) -> Result<()> {
    let mut store = Store::open()?;
    let asset = store.inventory_mut().delete_asset(id)?;
    store.save()?;

    if ctx.json {
        println!("{}", serde_json::to_string(&asset)?);
    } else {
        println!(
            "{} Deleted asset: {} ({})",
            "✓".green(),
            asset.id.cyan(),
            asset.item_name
        );
    }
    Ok(())
}

// === Locations ===

pub fn location_add(
    ctx: &Context,
    name: &str,
    currency: &str,
    date_format: &str,
    timezone: &str,
) -> Result<()> {
    let mut store = Store::open()?;
    let location = store
        .inventory_mut()
        .add_location(LocationInput {
            name: name.to_string(),
            currency: currency.to_string(),
            date_format: date_format.parse()?,
            timezone: timezone.to_string(),
        })?
        .clone();
    store.save()?;

    if ctx.json {
        println!("{}", serde_json::to_string(&location)?);
    } else {
        println!(
            "{} Added location: {} ({})",
            "✓".green(),
            location.name,
            location.id.cyan()
        );
    }
    Ok(())
}

pub fn location_list(ctx: &Context) -> Result<()> {
    let store = Store::open()?;
    let inventory = store.inventory();

    if ctx.json {
        println!("{}", serde_json::to_string(inventory.locations())?);
    } else {
        let counts = |id: &str| {
            inventory
                .assets()
                .iter()
                .filter(|a| a.location_id == id)
                .count()
        };
        println!("{}", table::locations(inventory.locations(), counts));
    }
    Ok(())
}

pub fn location_update(
    ctx: &Context,
    reference: &str,
    name: Option<String>,
    currency: Option<String>,
    date_format: Option<String>,
    timezone: Option<String>,
) -> Result<()> {
    let mut store = Store::open()?;
    let current = store.inventory().resolve_location(reference)?.clone();

    let input = LocationInput {
        name: name.unwrap_or(current.name),
        currency: currency.unwrap_or(current.currency),
        date_format: match date_format {
            Some(f) => f.parse()?,
            None => current.date_format,
        },
        timezone: timezone.unwrap_or(current.timezone),
    };
    let location = store
        .inventory_mut()
        .update_location(&current.id, input)?
        .clone();
    store.save()?;

    if ctx.json {
        println!("{}", serde_json::to_string(&location)?);
    } else {
        println!(
            "{} Updated location: {} ({})",
            "✓".green(),
            location.name,
            location.id.cyan()
        );
    }
    Ok(())
}

pub fn location_delete(ctx: &Context, reference: &str) -> Result<()> {
    let mut store = Store::open()?;
    let id = store.inventory().resolve_location(reference)?.id.clone();
    let location = store.inventory_mut().delete_location(&id)?;
    store.save()?;

    if ctx.json {
        println!("{}", serde_json::to_string(&location)?);
    } else {
        println!("{} Deleted location: {}", "✓".green(), location.name);
        println!("  Its assets now belong to Headquarters");
    }
    Ok(())
}

// === Shipments ===

pub fn shipment_add(
    ctx: &Context,
    tracking: &str,
    asset_id: &str,
    from: &str,
    to: &str,
    status: &str,
) -> Result<()> {
    let mut store = Store::open()?;
    let scope = ctx.scope(store.inventory())?;
    let from = match scope.location_id().and_then(|id| store.inventory().location(id)) {
        Some(location) => location.name.clone(),
        None => from.to_string(),
    };

    let shipment = store
        .inventory_mut()
        .record_shipment(
            ShipmentInput {
                tracking_number: tracking.to_string(),
                asset_id: asset_id.to_string(),
                from_location: from,
                to_location: to.to_string(),
                status: status.parse()?,
            },
            &scope,
        )?
        .clone();
    store.save()?;

    if ctx.json {
        println!("{}", serde_json::to_string(&shipment)?);
    } else {
        println!(
            "{} Recorded shipment {}: {} -> {}",
            "✓".green(),
            shipment.tracking_number.cyan(),
            shipment.from_location,
            shipment.to_location
        );
    }
    Ok(())
}

pub fn shipment_list(ctx: &Context) -> Result<()> {
    let store = Store::open()?;
    let inventory = store.inventory();
    let scope = ctx.scope(inventory)?;
    let shipments = inventory.shipments_in(&scope);

    if ctx.json {
        println!("{}", serde_json::to_string(&shipments)?);
    } else if shipments.is_empty() {
        println!("No shipments found");
    } else {
        let settings = inventory.display_settings(&scope);
        println!("{}", table::shipments(&shipments, &settings));
    }
    Ok(())
}

pub fn shipment_delete(ctx: &Context, id: &str) -> Result<()> {
    let mut store = Store::open()?;
    let shipment = store.inventory_mut().delete_shipment(id)?;
    store.save()?;

    if ctx.json {
        println!("{}", serde_json::to_string(&shipment)?);
    } else {
        println!(
            "{} Deleted shipment: {}",
            "✓".green(),
            shipment.tracking_number
        );
    }
    Ok(())
}

// === Audits ===

pub fn audit(ctx: &Context, asset_id: &str, count: u32, notes: &str, auditor: &str) -> Result<()> {
    let mut store = Store::open()?;
    let record = store
        .inventory_mut()
        .complete_audit(asset_id, count, notes, auditor)?;
    store.save()?;

    if ctx.json {
        println!("{}", serde_json::to_string(&record)?);
    } else if record.has_discrepancy() {
        println!(
            "{} Audit recorded for {}: counted {}, system had {} ({})",
            "!".yellow(),
            record.asset_name,
            record.physical_count,
            record.system_count,
            format!("{:+}", record.discrepancy).red()
        );
        println!("  Quantity updated; asset is pending sync");
    } else {
        println!(
            "{} Audit recorded for {}: count matches ({})",
            "✓".green(),
            record.asset_name,
            record.physical_count
        );
    }
    Ok(())
}

// === Import / export ===

/// Apply `field=header` overrides on top of the guessed mapping
fn apply_overrides(
    mapping: &mut ImportMapping,
    overrides: &[String],
    headers: &[String],
) -> Result<()> {
    for entry in overrides {
        let (field, header) = entry
            .split_once('=')
            .ok_or_else(|| anyhow!("Expected FIELD=HEADER, got: {}", entry))?;
        let field: FieldKey = field.trim().parse()?;
        if !IMPORT_FIELDS.contains(&field) {
            bail!("Field {} cannot be imported", field);
        }

        let header = header.trim();
        if header.is_empty() {
            mapping.remove(field);
        } else if headers.iter().any(|h| h == header) {
            mapping.set(field, header);
        } else {
            bail!("No column named '{}' in file", header);
        }
    }
    Ok(())
}

pub fn import(ctx: &Context, path: &str, overrides: &[String]) -> Result<()> {
    let mut store = Store::open()?;
    let scope = ctx.scope(store.inventory())?;

    let content = std::fs::read_to_string(path)?;
    let table = csv::parse(&content)?;
    let mut mapping = ImportMapping::auto(&table.headers);
    apply_overrides(&mut mapping, overrides, &table.headers)?;

    let report = store.inventory_mut().import(&table, &mapping, &scope)?;
    store.save()?;

    if ctx.json {
        let value = serde_json::json!({ "mapping": mapping, "report": report });
        println!("{}", serde_json::to_string(&value)?);
        return Ok(());
    }

    println!("{}", "Column mapping:".bold());
    for field in IMPORT_FIELDS {
        match mapping.get(field) {
            Some(header) => println!("  {:<18} <- {}", field.key(), header),
            None => println!("  {:<18} {}", field.key(), "(unmapped)".dimmed()),
        }
    }
    println!();
    println!(
        "{} Imported {} assets from {}",
        "✓".green(),
        report.imported,
        path
    );
    if report.failed > 0 {
        println!("{} {} rows failed:", "!".yellow(), report.failed);
        for error in &report.errors {
            println!("  {}", error);
        }
    }
    Ok(())
}

pub fn export(ctx: &Context, output: Option<String>, stdout: bool) -> Result<()> {
    let store = Store::open()?;
    let inventory = store.inventory();
    let scope = ctx.scope(inventory)?;
    let text = inventory.export_csv(&scope)?;

    if stdout {
        print!("{}", text);
        return Ok(());
    }

    let path = output.unwrap_or_else(|| inventory.export_filename(&scope, "csv", chrono::Utc::now()));
    std::fs::write(&path, text)?;

    if ctx.json {
        println!("{}", serde_json::json!({ "path": path }));
    } else {
        println!("{} Exported {} to {}", "✓".green(), inventory.scope_name(&scope), path);
    }
    Ok(())
}

pub fn backup(ctx: &Context, output: Option<String>) -> Result<()> {
    let store = Store::open()?;
    let inventory = store.inventory();
    let snapshot = inventory.snapshot();

    let path = output.unwrap_or_else(|| {
        inventory.export_filename(&Scope::Global, "json", snapshot.export_date)
    });
    std::fs::write(&path, serde_json::to_string_pretty(&snapshot)?)?;

    if ctx.json {
        println!("{}", serde_json::json!({ "path": path }));
    } else {
        println!("{} Backup written to {}", "✓".green(), path);
        println!(
            "  {} assets, {} locations, {} central files",
            snapshot.data.assets.len(),
            snapshot.data.locations.len(),
            snapshot.data.central_files.len()
        );
    }
    Ok(())
}

pub fn restore(ctx: &Context, path: &str, force: bool) -> Result<()> {
    let mut store = Store::open()?;
    let content = std::fs::read_to_string(path)?;
    let snapshot: Snapshot = serde_json::from_str(&content)
        .map_err(|e| anyhow!("Not a valid backup file: {}", e))?;

    if !force {
        println!(
            "{}",
            "This will replace all assets, locations, shipments and settings.".red()
        );
        println!(
            "Backup from {} holds {} assets.",
            snapshot.export_date.format("%Y-%m-%d %H:%M"),
            snapshot.data.assets.len()
        );
        if !confirm("Continue?")? {
            println!("Aborted");
            return Ok(());
        }
    }

    store.replace(Inventory::restore(snapshot));
    store.save()?;

    if ctx.json {
        println!("{}", serde_json::to_string(store.inventory().data())?);
    } else {
        println!("{} Restored from {}", "✓".green(), path);
    }
    Ok(())
}

// === Central files ===

pub fn central_upload(
    ctx: &Context,
    path: &str,
    version: Option<String>,
    description: Option<String>,
) -> Result<()> {
    let mut store = Store::open()?;
    let content = std::fs::read_to_string(path)?;
    let filename = std::path::Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string());

    let file = store
        .inventory_mut()
        .upload_central(&filename, &content, version, description)?;
    let (id, version, rows) = (file.id.clone(), file.version.clone(), file.row_count);
    store.save()?;

    if ctx.json {
        println!(
            "{}",
            serde_json::json!({ "id": id, "filename": filename, "version": version, "rows": rows })
        );
    } else {
        println!(
            "{} Uploaded {} as {} ({} rows)",
            "✓".green(),
            filename,
            version.bold(),
            rows
        );
        println!("  ID: {}", id.cyan());
    }
    Ok(())
}

pub fn central_list(ctx: &Context) -> Result<()> {
    let store = Store::open()?;
    let inventory = store.inventory();
    let files = inventory.central_files();

    if ctx.json {
        let summaries: Vec<_> = files
            .iter()
            .map(|f| {
                serde_json::json!({
                    "id": f.id,
                    "filename": f.filename,
                    "version": f.version,
                    "upload_date": f.upload_date,
                    "row_count": f.row_count,
                    "description": f.description,
                })
            })
            .collect();
        println!("{}", serde_json::to_string(&summaries)?);
    } else if files.is_empty() {
        println!("No master CSV files uploaded");
    } else {
        let settings = inventory.display_settings(&ctx.scope(inventory)?);
        println!("{}", table::central_files(files, &settings));
    }
    Ok(())
}

pub fn central_download(ctx: &Context, id: &str, output: Option<String>) -> Result<()> {
    let store = Store::open()?;
    let (filename, text) = store.inventory().download_central(id)?;
    let path = output.unwrap_or(filename);
    std::fs::write(&path, text)?;

    if ctx.json {
        println!("{}", serde_json::json!({ "path": path }));
    } else {
        println!("{} Wrote {}", "✓".green(), path);
    }
    Ok(())
}

pub fn central_delete(ctx: &Context, id: &str) -> Result<()> {
    let mut store = Store::open()?;
    let file = store.inventory_mut().delete_central(id)?;
    store.save()?;

    if ctx.json {
        println!("{}", serde_json::json!({ "id": file.id, "filename": file.filename }));
    } else {
        println!(
            "{} Deleted central file: {} ({})",
            "✓".green(),
            file.filename,
            file.version
        );
    }
    Ok(())
}

// === Sync ===

pub struct SyncArgs {
    pub file: Option<String>,
    pub strategy: Option<String>,
    pub keep_local: Vec<String>,
    pub take_central: Vec<String>,
    pub interactive: bool,
    pub dry_run: bool,
}

fn print_conflict(conflict: &Conflict, index: usize, total: usize, session: &SyncSession) {
    println!(
        "{} {} ({})",
        format!("[{}/{}]", index + 1, total).dimmed(),
        conflict.item_name.bold(),
        conflict.key
    );
    let central = &conflict.central.level;
    for field in conflict.differing_fields() {
        let (local, remote) = match field {
            FieldKey::CurrentQuantity => (
                conflict.local.current_quantity.to_string(),
                central.current_quantity.to_string(),
            ),
            FieldKey::UnitPrice => (
                conflict.local.unit_price.to_string(),
                central.unit_price.to_string(),
            ),
            _ => (conflict.local.status.to_string(), central.status.to_string()),
        };
        println!(
            "    {:<16} local {}  central {}",
            field.key(),
            local.yellow(),
            remote.cyan()
        );
    }
    println!("    resolution: {}", session.resolution(&conflict.key));
}

/// Ask for each conflict; an empty answer keeps the current choice
fn resolve_interactively(session: &mut SyncSession) -> Result<()> {
    let conflicts = session.conflicts().to_vec();
    let total = conflicts.len();
    for (index, conflict) in conflicts.iter().enumerate() {
        print_conflict(conflict, index, total, session);
        loop {
            print!("    keep [l]ocal or take [c]entral? ");
            std::io::stdout().flush()?;

            let mut input = String::new();
            std::io::stdin().read_line(&mut input)?;
            let answer = input.trim();
            if answer.is_empty() {
                break;
            }
            match answer.parse::<Resolution>() {
                Ok(resolution) => {
                    session.resolve_key(&conflict.key, resolution)?;
                    break;
                }
                Err(_) => println!("    {}", "answer l or c".yellow()),
            }
        }
    }
    Ok(())
}

pub fn sync(ctx: &Context, args: SyncArgs) -> Result<()> {
    let mut store = Store::open()?;
    let scope = ctx.scope(store.inventory())?;

    let mut session = match args.file {
        Some(ref id) => store.inventory().sync_from(id, &scope)?,
        None => store.inventory().sync_latest(&scope)?,
    };

    if let Some(ref strategy) = args.strategy {
        let strategy: assetrack_core::ConflictStrategy = strategy.parse()?;
        session.resolve_all(strategy.into());
    }
    for reference in &args.keep_local {
        session.resolve(reference, Resolution::Local)?;
    }
    for reference in &args.take_central {
        session.resolve(reference, Resolution::Central)?;
    }

    if !ctx.json {
        println!(
            "Syncing {} from {} ({})",
            session.location_name().bold(),
            session.file_version().bold(),
            session.file_id().dimmed()
        );
        println!(
            "  {} rows, {} skipped, {} conflicts",
            session.records().len(),
            session.skipped().len(),
            session.conflicts().len()
        );
        for skipped in session.skipped() {
            println!(
                "  {} row {}: {}",
                "!".yellow(),
                skipped.row,
                skipped.reason
            );
        }
    }

    if session.state() == SessionState::ResolutionPending {
        if args.interactive && !ctx.json {
            println!();
            resolve_interactively(&mut session)?;
        } else if !ctx.json {
            let total = session.conflicts().len();
            for (index, conflict) in session.conflicts().iter().enumerate() {
                print_conflict(conflict, index, total, &session);
            }
        }
    }

    if args.dry_run {
        let plan = session.plan(store.inventory());
        let summary = plan.summary();
        if ctx.json {
            println!("{}", serde_json::to_string(&plan)?);
        } else {
            println!();
            println!(
                "{} would update {}, insert {}, keep {} local",
                "Dry run:".bold(),
                summary.updated,
                summary.inserted,
                summary.kept_local
            );
        }
        session.cancel();
        return Ok(());
    }

    let report = session.apply(store.inventory_mut())?;
    store.save()?;

    if ctx.json {
        println!("{}", serde_json::to_string(&report)?);
    } else {
        println!();
        println!(
            "{} Sync {}: {} updated, {} inserted, {} kept local",
            "✓".green(),
            report.record.outcome,
            report.summary.updated,
            report.summary.inserted,
            report.summary.kept_local
        );
    }
    Ok(())
}

pub fn push(ctx: &Context, version: Option<String>) -> Result<()> {
    let mut store = Store::open()?;
    let scope = ctx.scope(store.inventory())?;
    let record = store.inventory_mut().push_to_central(&scope, version)?;
    store.save()?;

    if ctx.json {
        println!("{}", serde_json::to_string(&record)?);
    } else {
        let latest = store.inventory().latest_central_file();
        println!(
            "{} Pushed {} assets from {}",
            "✓".green(),
            record.items_affected,
            record.location
        );
        if let Some(file) = latest {
            println!("  Central file {} ({})", file.version.bold(), file.id.cyan());
        }
    }
    Ok(())
}

pub fn history(ctx: &Context) -> Result<()> {
    let store = Store::open()?;
    let inventory = store.inventory();
    let records = inventory.recent_history();

    if ctx.json {
        println!("{}", serde_json::to_string(&records)?);
    } else if records.is_empty() {
        println!("No sync history");
    } else {
        let settings = inventory.display_settings(&ctx.scope(inventory)?);
        println!("{}", table::history(&records, &settings));
    }
    Ok(())
}

// === Dashboard ===

pub fn summary(ctx: &Context) -> Result<()> {
    let store = Store::open()?;
    let inventory = store.inventory();
    let scope = ctx.scope(inventory)?;
    let summary = inventory.summary(&scope);
    let statuses = inventory.status_counts(&scope);
    let distribution = inventory.location_distribution(&scope);

    if ctx.json {
        let statuses: serde_json::Map<_, _> = statuses
            .iter()
            .map(|(s, n)| (s.to_string(), serde_json::json!(n)))
            .collect();
        let value = serde_json::json!({
            "summary": summary,
            "status_counts": statuses,
            "locations": distribution,
        });
        println!("{}", serde_json::to_string(&value)?);
        return Ok(());
    }

    let settings = inventory.display_settings(&scope);
    println!("{}", inventory.scope_name(&scope).bold());
    println!("  Total assets:      {}", summary.total_assets);
    println!("  Active assets:     {}", summary.active_assets);
    println!("  Active shipments:  {}", summary.active_shipments);
    println!(
        "  Total value:       {}",
        table::money(&settings, summary.total_value).bold()
    );
    println!();
    println!("{}", "By status:".bold());
    for (status, count) in statuses {
        println!("  {:<12} {}", status.to_string(), count);
    }
    if !distribution.is_empty() {
        println!();
        println!("{}", "By location:".bold());
        for (location, count) in distribution {
            println!("  {:<20} {}", location, count);
        }
    }
    Ok(())
}

pub fn clear(ctx: &Context, force: bool) -> Result<()> {
    let mut store = Store::open()?;

    if !force {
        println!(
            "{}",
            "This deletes every asset, shipment, audit, central file and sync record.".red()
        );
        println!("Locations and settings are kept. This cannot be undone.");
        if !confirm("Continue?")? || !confirm("Really delete everything?")? {
            println!("Aborted");
            return Ok(());
        }
    }

    store.inventory_mut().clear_all();
    store.save()?;

    if ctx.json {
        println!("{}", serde_json::json!({ "cleared": true }));
    } else {
        println!("{} All inventory data cleared", "✓".green());
    }
    Ok(())
}

// === Config ===

/// Show current configuration
pub fn config_show(ctx: &Context) -> Result<()> {
    let store = Store::open()?;
    let config = store.inventory().config();

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(config)?);
    } else {
        println!("{}", "Current configuration:".bold());
        println!();
        println!("currency_symbol = \"{}\"", config.currency_symbol);
        println!("date_format = \"{}\"", config.date_format);
        println!("export_pattern = \"{}\"", config.export_pattern);
        println!("auto_sync_schedule = \"{}\"", config.auto_sync_schedule);
        println!("conflict_strategy = \"{}\"", config.conflict_strategy);
        println!("history_display_limit = {}", config.history_display_limit);
        println!();
        println!("[labels]");
        for field in FieldKey::ALL {
            println!("{} = \"{}\"", field.snake(), config.labels.get(field));
        }
    }
    Ok(())
}

/// Reset configuration to defaults
pub fn config_reset() -> Result<()> {
    let store = Store::open()?;
    std::fs::write(store.config_path(), Config::default_with_comments())?;

    println!("{} Configuration reset to defaults", "✓".green());
    Ok(())
}

/// Get a specific config value
pub fn config_get(ctx: &Context, key: &str) -> Result<()> {
    let store = Store::open()?;
    let config_json = serde_json::to_value(store.inventory().config())?;

    let mut value = &config_json;
    for part in key.split('.') {
        value = value
            .get(part)
            .ok_or_else(|| anyhow!("Config key not found: {}", key))?;
    }

    if ctx.json {
        println!("{}", serde_json::to_string(value)?);
    } else {
        match value {
            serde_json::Value::String(s) => println!("{}", s),
            serde_json::Value::Number(n) => println!("{}", n),
            _ => println!("{}", serde_json::to_string_pretty(value)?),
        }
    }
    Ok(())
}

/// Set a config value
pub fn config_set(key: &str, value: &str) -> Result<()> {
    let mut store = Store::open()?;
    let config = store.inventory_mut().config_mut();

    match key {
        "currency_symbol" => {
            if value.trim().is_empty() {
                bail!("Currency symbol cannot be empty");
            }
            config.currency_symbol = value.trim().to_string();
        }
        "date_format" => config.date_format = value.parse()?,
        "export_pattern" => {
            if value.trim().is_empty() {
                bail!("Export pattern cannot be empty");
            }
            config.export_pattern = value.trim().to_string();
        }
        "auto_sync_schedule" => config.auto_sync_schedule = value.parse()?,
        "conflict_strategy" => config.conflict_strategy = value.parse()?,
        "history_display_limit" => {
            config.history_display_limit = value
                .parse()
                .map_err(|_| anyhow!("Invalid integer value: {}", value))?;
        }
        _ => match key.strip_prefix("labels.") {
            Some(field) => {
                let field: FieldKey = field.parse()?;
                if !config.labels.set(field, value) {
                    bail!("Label for {} cannot be blank", field);
                }
            }
            None => bail!("Unknown config key: {}", key),
        },
    }

    store.save()?;
    println!("{} Set {} = {}", "✓".green(), key, value);
    Ok(())
}

/// Show CSV column labels
pub fn config_labels(ctx: &Context) -> Result<()> {
    let store = Store::open()?;
    let labels = &store.inventory().config().labels;

    if ctx.json {
        println!("{}", serde_json::to_string(labels)?);
    } else {
        println!("{}", table::labels(labels));
    }
    Ok(())
}

/// Reset one label, or all of them
pub fn config_reset_labels(field: Option<String>) -> Result<()> {
    let mut store = Store::open()?;
    let labels = &mut store.inventory_mut().config_mut().labels;

    match field {
        Some(ref name) => {
            let field: FieldKey = name.parse()?;
            labels.reset(field);
            println!(
                "{} Reset label {} to \"{}\"",
                "✓".green(),
                field,
                field.default_label()
            );
        }
        None => {
            for field in FieldKey::ALL {
                labels.reset(field);
            }
            println!("{} Reset all labels to defaults", "✓".green());
        }
    }

    store.save()?;
    Ok(())
}
