//! Physical stock audits

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of counting one asset on the shelf
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: String,
    pub asset_id: String,
    pub asset_name: String,
    pub system_count: u32,
    pub physical_count: u32,
    /// physical - system
    pub discrepancy: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
    pub date: DateTime<Utc>,
    pub auditor: String,
    pub location: String,
}

impl AuditRecord {
    pub fn has_discrepancy(&self) -> bool {
        self.discrepancy != 0
    }
}

pub(crate) fn discrepancy(system_count: u32, physical_count: u32) -> i64 {
    i64::from(physical_count) - i64::from(system_count)
}
