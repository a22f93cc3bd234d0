//! Append-only sync history

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncDirection {
    Pull,
    Push,
}

impl std::fmt::Display for SyncDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncDirection::Pull => write!(f, "pull"),
            SyncDirection::Push => write!(f, "push"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncOutcome {
    Success,
    Failed,
    Partial,
}

impl std::fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncOutcome::Success => write!(f, "success"),
            SyncOutcome::Failed => write!(f, "failed"),
            SyncOutcome::Partial => write!(f, "partial"),
        }
    }
}

/// One completed sync attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncRecord {
    pub id: String,
    pub date: DateTime<Utc>,
    /// Location display name
    pub location: String,
    pub direction: SyncDirection,
    pub outcome: SyncOutcome,
    pub items_affected: usize,
    /// Conflicts that kept the local value
    pub conflicts: usize,
}

/// Sync records in the order they happened
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SyncHistory {
    records: Vec<SyncRecord>,
}

impl SyncHistory {
    pub fn record(&mut self, record: SyncRecord) {
        tracing::info!(
            id = %record.id,
            location = %record.location,
            direction = %record.direction,
            outcome = %record.outcome,
            items = record.items_affected,
            conflicts = record.conflicts,
            "sync recorded"
        );
        self.records.push(record);
    }

    /// At most `limit` records, newest first
    pub fn recent(&self, limit: usize) -> Vec<&SyncRecord> {
        self.records.iter().rev().take(limit).collect()
    }

    pub fn all(&self) -> &[SyncRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(n: usize) -> SyncRecord {
        SyncRecord {
            id: format!("syn-{:08}", n),
            date: Utc::now(),
            location: "Headquarters".to_string(),
            direction: SyncDirection::Pull,
            outcome: SyncOutcome::Success,
            items_affected: n,
            conflicts: 0,
        }
    }

    #[test]
    fn test_recent_is_newest_first_and_bounded() {
        let mut history = SyncHistory::default();
        for n in 0..25 {
            history.record(entry(n));
        }

        let recent = history.recent(20);
        assert_eq!(recent.len(), 20);
        assert_eq!(recent[0].items_affected, 24);
        assert_eq!(recent[19].items_affected, 5);
        assert_eq!(history.len(), 25);
    }

    #[test]
    fn test_serializes_as_list() {
        let mut history = SyncHistory::default();
        history.record(entry(1));
        let json = serde_json::to_value(&history).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["direction"], "pull");

        let back: SyncHistory = serde_json::from_value(json).unwrap();
        assert_eq!(back, history);
    }
}
