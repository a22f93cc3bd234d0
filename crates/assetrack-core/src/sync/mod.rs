//! Central CSV synchronisation
//!
//! A sync pulls one central file into one location:
//!
//! 1. rows are typed and de-duplicated ([`detect::prepare_records`])
//! 2. matched rows that disagree with the local asset become conflicts
//! 3. each conflict gets a [`Resolution`], seeded from the configured strategy
//! 4. a [`MergePlan`] is staged and committed in one step
//! 5. the attempt is appended to the [`SyncHistory`]
//!
//! [`SyncSession`] drives the steps; it is consumed by `apply` or `cancel`.

pub mod detect;
pub mod history;
pub mod merge;
mod push;
pub mod resolution;
pub mod session;

pub use detect::{Conflict, detect_conflicts};
pub use history::{SyncDirection, SyncHistory, SyncOutcome, SyncRecord};
pub use merge::{MergePlan, MergeSummary};
pub use resolution::{Resolution, ResolutionStore};
pub use session::{SessionState, SyncReport, SyncSession};

use crate::asset::Asset;
use crate::central::CentralRecord;
use serde::Serialize;

/// How a central row is matched to a local asset
///
/// SKU when the row carries one, otherwise item name plus location name. The
/// location is the row's own, or the sync location when the row leaves it
/// blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinKey {
    Sku(String),
    NameLocation { item_name: String, location: String },
}

impl JoinKey {
    pub fn for_record(record: &CentralRecord, location: &str) -> Self {
        match &record.sku {
            Some(sku) => JoinKey::Sku(sku.clone()),
            None => JoinKey::NameLocation {
                item_name: record.item_name.clone(),
                location: record.location.as_deref().unwrap_or(location).to_string(),
            },
        }
    }

    /// Whether a user-typed reference (SKU or item name) names this key
    pub fn matches_ref(&self, reference: &str) -> bool {
        match self {
            JoinKey::Sku(sku) => sku == reference,
            JoinKey::NameLocation { item_name, .. } => item_name == reference,
        }
    }
}

impl std::fmt::Display for JoinKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JoinKey::Sku(sku) => write!(f, "sku {}", sku),
            JoinKey::NameLocation { item_name, location } => {
                write!(f, "{} @ {}", item_name, location)
            }
        }
    }
}

/// Find the local asset a central record refers to
///
/// `assets` must already be limited to the sync location. A row naming
/// another location matches nothing. A SKU match wins; otherwise item names
/// are compared, but never across two different SKUs.
pub fn find_local<'a>(assets: &[&'a Asset], record: &CentralRecord) -> Option<&'a Asset> {
    let mut candidates = assets.iter().copied().filter(|a| same_location(a, record));

    if let Some(sku) = &record.sku
        && let Some(asset) = candidates.clone().find(|a| a.sku.as_ref() == Some(sku))
    {
        return Some(asset);
    }

    candidates.find(|a| a.item_name == record.item_name && (a.sku.is_none() || record.sku.is_none()))
}

fn same_location(asset: &Asset, record: &CentralRecord) -> bool {
    record
        .location
        .as_deref()
        .is_none_or(|location| location == asset.location)
}
