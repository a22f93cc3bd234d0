//! On-disk working copy for the CLI
//!
//! `.assetrack/config.toml` holds settings, `.assetrack/inventory.json`
//! holds the collections. Both are read whole and written whole.

use crate::config::Config;
use crate::inventory::{Inventory, InventoryData};
use crate::{Error, Result};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const ASSETRACK_DIR: &str = ".assetrack";
const INVENTORY_FILE: &str = "inventory.json";
const CONFIG_FILE: &str = "config.toml";

/// A loaded inventory plus where it came from
pub struct Store {
    root: PathBuf,
    inventory: Inventory,
}

impl Store {
    /// Find and open the store for the current directory
    pub fn open() -> Result<Self> {
        let root = Self::find_root(&std::env::current_dir()?)?;
        Self::load(root)
    }

    /// Open the store rooted at `dir` or one of its parents
    pub fn open_in(dir: &Path) -> Result<Self> {
        let root = Self::find_root(dir)?;
        Self::load(root)
    }

    /// Initialize a new store in the current directory
    pub fn init() -> Result<Self> {
        Self::init_in(&std::env::current_dir()?)
    }

    /// Initialize a new store in `dir` with the default locations
    pub fn init_in(dir: &Path) -> Result<Self> {
        let store_dir = dir.join(ASSETRACK_DIR);
        if store_dir.exists() {
            return Err(Error::AlreadyInitialized(store_dir.display().to_string()));
        }

        fs::create_dir_all(&store_dir)?;
        fs::write(store_dir.join(CONFIG_FILE), Config::default_with_comments())?;

        let store = Self {
            root: dir.to_path_buf(),
            inventory: Inventory::new(Config::default()),
        };
        store.write_inventory()?;
        tracing::info!(path = %store_dir.display(), "store initialized");
        Ok(store)
    }

    /// Find the directory containing .assetrack, starting at `start`
    fn find_root(start: &Path) -> Result<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            if current.join(ASSETRACK_DIR).exists() {
                return Ok(current);
            }
            if !current.pop() {
                return Err(Error::NotInitialized);
            }
        }
    }

    fn load(root: PathBuf) -> Result<Self> {
        let dir = root.join(ASSETRACK_DIR);
        let config = Config::load(&dir.join(CONFIG_FILE))?;

        let path = dir.join(INVENTORY_FILE);
        let data = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str::<InventoryData>(&content)?
        } else {
            InventoryData::default()
        };
        tracing::debug!(path = %path.display(), assets = data.assets.len(), "store loaded");

        Ok(Self {
            root,
            inventory: Inventory::from_parts(config, data),
        })
    }

    /// Path to the .assetrack directory
    pub fn store_dir(&self) -> PathBuf {
        self.root.join(ASSETRACK_DIR)
    }

    pub fn config_path(&self) -> PathBuf {
        self.store_dir().join(CONFIG_FILE)
    }

    pub fn inventory_path(&self) -> PathBuf {
        self.store_dir().join(INVENTORY_FILE)
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    /// Swap in a whole inventory, e.g. from a restored backup
    pub fn replace(&mut self, inventory: Inventory) {
        self.inventory = inventory;
    }

    /// Write config and inventory back to disk
    pub fn save(&self) -> Result<()> {
        self.inventory.config().save(&self.config_path())?;
        self.write_inventory()
    }

    fn write_inventory(&self) -> Result<()> {
        let file = fs::File::create(self.inventory_path())?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self.inventory.data())?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::AssetInput;
    use crate::location::Scope;
    use rust_decimal::Decimal;

    #[test]
    fn test_init_then_open() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::init_in(dir.path()).unwrap();
        assert!(store.config_path().exists());
        assert!(store.inventory_path().exists());

        let opened = Store::open_in(dir.path()).unwrap();
        assert_eq!(opened.inventory().locations().len(), 3);
        assert_eq!(opened.inventory().config(), &Config::default());
    }

    #[test]
    fn test_init_twice_fails() {
        let dir = tempfile::tempdir().unwrap();
        Store::init_in(dir.path()).unwrap();
        assert!(matches!(
            Store::init_in(dir.path()),
            Err(Error::AlreadyInitialized(_))
        ));
    }

    #[test]
    fn test_open_from_subdirectory() {
        let dir = tempfile::tempdir().unwrap();
        Store::init_in(dir.path()).unwrap();
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        let store = Store::open_in(&nested).unwrap();
        assert_eq!(store.store_dir(), dir.path().join(ASSETRACK_DIR));
    }

    #[test]
    fn test_open_uninitialized_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(Store::open_in(dir.path()), Err(Error::NotInitialized)));
    }

    #[test]
    fn test_save_persists_changes() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = Store::init_in(dir.path()).unwrap();
        store
            .inventory_mut()
            .add_asset(
                AssetInput {
                    item_name: "Desk".to_string(),
                    current_quantity: 2,
                    unit_price: Decimal::from(75),
                    location: "Headquarters".to_string(),
                    ..Default::default()
                },
                &Scope::Global,
            )
            .unwrap();
        store.inventory_mut().config_mut().history_display_limit = 5;
        store.save().unwrap();

        let reopened = Store::open_in(dir.path()).unwrap();
        let inv = reopened.inventory();
        assert_eq!(inv.assets().len(), 1);
        assert_eq!(inv.assets()[0].total_value(), Decimal::from(150));
        assert_eq!(inv.config().history_display_limit, 5);
    }
}
