//! assetrack - Multi-location asset inventory
//!
//! State lives in .assetrack/ as a config file plus one JSON document.

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

mod commands;
mod table;

use commands::Context;

#[derive(Parser)]
#[command(name = "assetrack")]
#[command(about = "Multi-location asset inventory with central CSV sync")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Active location (id or name); omit or use "global" for all locations
    #[arg(long, short = 'l', global = true, env = "ASSETRACK_LOCATION")]
    location: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new inventory in the current directory
    Init,

    /// Manage assets
    Asset {
        #[command(subcommand)]
        command: AssetCommands,
    },

    /// Manage locations
    Location {
        #[command(subcommand)]
        command: LocationCommands,
    },

    /// Manage shipments
    Shipment {
        #[command(subcommand)]
        command: ShipmentCommands,
    },

    /// Record a physical count for an asset
    Audit {
        /// Asset ID
        asset_id: String,

        /// Counted quantity
        #[arg(short, long)]
        count: u32,

        /// Notes
        #[arg(short, long, default_value = "")]
        notes: String,

        /// Who counted
        #[arg(long, default_value = "System User")]
        auditor: String,
    },

    /// Import assets from a CSV file
    Import {
        /// Path to the CSV file
        path: String,

        /// Column mapping overrides, e.g. --map itemName="Product Name"
        #[arg(long = "map", value_name = "FIELD=HEADER")]
        mappings: Vec<String>,
    },

    /// Export assets of the active location to CSV
    Export {
        /// Output path (defaults to the configured filename pattern)
        #[arg(short, long)]
        output: Option<String>,

        /// Write to stdout instead of a file
        #[arg(long)]
        stdout: bool,
    },

    /// Write a full JSON backup
    Backup {
        /// Output path (defaults to the configured filename pattern)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Replace all data with a JSON backup
    Restore {
        /// Path to the backup file
        path: String,

        /// Skip confirmation
        #[arg(long)]
        force: bool,
    },

    /// Manage master (central) CSV files
    Central {
        #[command(subcommand)]
        command: CentralCommands,
    },

    /// Pull a central file into the active location
    Sync {
        /// Central file ID (defaults to the latest upload)
        #[arg(short, long)]
        file: Option<String>,

        /// Default side for every conflict (central, local)
        #[arg(short, long)]
        strategy: Option<String>,

        /// Keep the local value for these items (SKU, item name or asset ID)
        #[arg(long, value_name = "ITEM")]
        keep_local: Vec<String>,

        /// Take the central value for these items (SKU, item name or asset ID)
        #[arg(long, value_name = "ITEM")]
        take_central: Vec<String>,

        /// Ask for each conflict
        #[arg(short, long)]
        interactive: bool,

        /// Show what would change without applying
        #[arg(long)]
        dry_run: bool,
    },

    /// Push the active location's assets as a new central file
    Push {
        /// Version label
        #[arg(long = "label")]
        version: Option<String>,
    },

    /// Show recent sync history
    History,

    /// Show dashboard figures for the active location
    Summary,

    /// Delete all assets, shipments, audits, central files and history
    Clear {
        /// Skip confirmation
        #[arg(long)]
        force: bool,
    },

    /// Show or edit configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum AssetCommands {
    /// Add an asset
    Add {
        /// Item name
        name: String,

        /// Current quantity
        #[arg(short, long, default_value = "0")]
        quantity: u32,

        /// Starting quantity (defaults to the current quantity)
        #[arg(long)]
        starting: Option<u32>,

        /// Unit price
        #[arg(short, long, default_value = "0")]
        price: String,

        /// Product code
        #[arg(long)]
        sku: Option<String>,

        /// Location name, used when no active location is set
        #[arg(long, default_value = "Headquarters")]
        at: String,

        /// Status (active, inactive, maintenance, retired)
        #[arg(long, default_value = "active")]
        status: String,
    },

    /// List assets
    List {
        /// Filter by status
        #[arg(short, long)]
        status: Option<String>,

        /// Filter by sync status
        #[arg(long)]
        sync_status: Option<String>,
    },

    /// Show asset details
    Show {
        /// Asset ID
        id: String,
    },

    /// Update an asset
    Update {
        /// Asset ID
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(short, long)]
        quantity: Option<u32>,

        #[arg(long)]
        starting: Option<u32>,

        #[arg(short, long)]
        price: Option<String>,

        #[arg(long)]
        sku: Option<String>,

        /// Move to another location (name)
        #[arg(long)]
        at: Option<String>,

        #[arg(long)]
        status: Option<String>,
    },

    /// Delete an asset
    Delete {
        /// Asset ID
        id: String,
    },
}

#[derive(Subcommand)]
enum LocationCommands {
    /// Add a location
    Add {
        /// Display name
        name: String,

        /// Currency symbol
        #[arg(long, default_value = "$")]
        currency: String,

        /// Date format (MM/DD/YYYY, DD/MM/YYYY, YYYY-MM-DD)
        #[arg(long, default_value = "MM/DD/YYYY")]
        date_format: String,

        /// Timezone label
        #[arg(long, default_value = "UTC")]
        timezone: String,
    },

    /// List locations
    List,

    /// Update a location
    Update {
        /// Location ID or name
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        currency: Option<String>,

        #[arg(long)]
        date_format: Option<String>,

        #[arg(long)]
        timezone: Option<String>,
    },

    /// Delete a location; its assets move to Headquarters
    Delete {
        /// Location ID or name
        id: String,
    },
}

#[derive(Subcommand)]
enum ShipmentCommands {
    /// Record a shipment
    Add {
        /// Tracking number
        tracking: String,

        /// Asset ID
        #[arg(short, long)]
        asset: String,

        /// Origin location name (ignored when an active location is set)
        #[arg(long, default_value = "Headquarters")]
        from: String,

        /// Destination location name
        #[arg(long)]
        to: String,

        /// Status (pending, in-transit, delivered, delayed)
        #[arg(long, default_value = "pending")]
        status: String,
    },

    /// List shipments touching the active location
    List,

    /// Delete a shipment
    Delete {
        /// Shipment ID
        id: String,
    },
}

#[derive(Subcommand)]
enum CentralCommands {
    /// Upload a master CSV
    Upload {
        /// Path to the CSV file
        path: String,

        /// Version label (defaults to v{n})
        #[arg(long = "label")]
        version: Option<String>,

        /// Description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// List uploaded files
    List,

    /// Write an uploaded file back out as CSV
    Download {
        /// Central file ID
        id: String,

        /// Output path (defaults to the original filename)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Delete an uploaded file
    Delete {
        /// Central file ID
        id: String,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Reset to default configuration
    Reset,
    /// Get a specific config value
    Get {
        /// Config key (e.g., "conflict_strategy", "labels.item_name")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// Show CSV column labels
    Labels,
    /// Reset column labels to defaults
    ResetLabels {
        /// Single field to reset (e.g., "item_name"); all when omitted
        field: Option<String>,
    },
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Err(e) if commands::is_warning(&e) => {
            eprintln!("{} {}", "!".yellow(), e.to_string().yellow());
            Ok(())
        }
        result => result,
    }
}

fn run(cli: Cli) -> Result<()> {
    let ctx = Context {
        json: cli.json,
        location: cli.location,
    };

    match cli.command {
        Commands::Init => commands::init(&ctx),
        Commands::Asset { command } => match command {
            AssetCommands::Add {
                name,
                quantity,
                starting,
                price,
                sku,
                at,
                status,
            } => commands::asset_add(
                &ctx,
                commands::AssetArgs {
                    name: Some(name),
                    quantity: Some(quantity),
                    starting,
                    price: Some(price),
                    sku,
                    at: Some(at),
                    status: Some(status),
                },
            ),
            AssetCommands::List {
                status,
                sync_status,
            } => commands::asset_list(&ctx, status, sync_status),
            AssetCommands::Show { id } => commands::asset_show(&ctx, &id),
            AssetCommands::Update {
                id,
                name,
                quantity,
                starting,
                price,
                sku,
                at,
                status,
            } => commands::asset_update(
                &ctx,
                &id,
                commands::AssetArgs {
                    name,
                    quantity,
                    starting,
                    price,
                    sku,
                    at,
                    status,
                },
            ),
            AssetCommands::Delete { id } => commands::asset_delete(&ctx, &id),
        },
        Commands::Location { command } => match command {
            LocationCommands::Add {
                name,
                currency,
                date_format,
                timezone,
            } => commands::location_add(&ctx, &name, &currency, &date_format, &timezone),
            LocationCommands::List => commands::location_list(&ctx),
            LocationCommands::Update {
                id,
                name,
                currency,
                date_format,
                timezone,
            } => commands::location_update(&ctx, &id, name, currency, date_format, timezone),
            LocationCommands::Delete { id } => commands::location_delete(&ctx, &id),
        },
        Commands::Shipment { command } => match command {
            ShipmentCommands::Add {
                tracking,
                asset,
                from,
                to,
                status,
            } => commands::shipment_add(&ctx, &tracking, &asset, &from, &to, &status),
            ShipmentCommands::List => commands::shipment_list(&ctx),
            ShipmentCommands::Delete { id } => commands::shipment_delete(&ctx, &id),
        },
        Commands::Audit {
            asset_id,
            count,
            notes,
            auditor,
        } => commands::audit(&ctx, &asset_id, count, &notes, &auditor),
        Commands::Import { path, mappings } => commands::import(&ctx, &path, &mappings),
        Commands::Export { output, stdout } => commands::export(&ctx, output, stdout),
        Commands::Backup { output } => commands::backup(&ctx, output),
        Commands::Restore { path, force } => commands::restore(&ctx, &path, force),
        Commands::Central { command } => match command {
            CentralCommands::Upload {
                path,
                version,
                description,
            } => commands::central_upload(&ctx, &path, version, description),
            CentralCommands::List => commands::central_list(&ctx),
            CentralCommands::Download { id, output } => {
                commands::central_download(&ctx, &id, output)
            }
            CentralCommands::Delete { id } => commands::central_delete(&ctx, &id),
        },
        Commands::Sync {
            file,
            strategy,
            keep_local,
            take_central,
            interactive,
            dry_run,
        } => commands::sync(
            &ctx,
            commands::SyncArgs {
                file,
                strategy,
                keep_local,
                take_central,
                interactive,
                dry_run,
            },
        ),
        Commands::Push { version } => commands::push(&ctx, version),
        Commands::History => commands::history(&ctx),
        Commands::Summary => commands::summary(&ctx),
        Commands::Clear { force } => commands::clear(&ctx, force),
        Commands::Config { command } => match command {
            Some(ConfigCommands::Show) | None => commands::config_show(&ctx),
            Some(ConfigCommands::Reset) => commands::config_reset(),
            Some(ConfigCommands::Get { key }) => commands::config_get(&ctx, &key),
            Some(ConfigCommands::Set { key, value }) => commands::config_set(&key, &value),
            Some(ConfigCommands::Labels) => commands::config_labels(&ctx),
            Some(ConfigCommands::ResetLabels { field }) => commands::config_reset_labels(field),
        },
    }
}
