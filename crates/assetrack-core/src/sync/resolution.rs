//! Per-conflict resolution choices

use super::{Conflict, JoinKey};
use crate::config::ConflictStrategy;
use crate::{Error, Result};
use serde::Serialize;
use std::collections::BTreeMap;

/// Which side wins one conflict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    Local,
    Central,
}

impl From<ConflictStrategy> for Resolution {
    fn from(strategy: ConflictStrategy) -> Self {
        match strategy {
            ConflictStrategy::Central => Resolution::Central,
            ConflictStrategy::Local => Resolution::Local,
        }
    }
}

impl std::str::FromStr for Resolution {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "local" | "l" => Ok(Resolution::Local),
            "central" | "c" => Ok(Resolution::Central),
            _ => Err(Error::invalid("resolution", s)),
        }
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resolution::Local => write!(f, "local"),
            Resolution::Central => write!(f, "central"),
        }
    }
}

/// Choices for one session, keyed by join key
///
/// Every conflict is seeded with the strategy default, so a lookup for a
/// seeded key always has an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionStore {
    default: Resolution,
    choices: BTreeMap<JoinKey, Resolution>,
}

impl ResolutionStore {
    pub fn seeded(conflicts: &[Conflict], strategy: ConflictStrategy) -> Self {
        let default = Resolution::from(strategy);
        let choices = conflicts.iter().map(|c| (c.key.clone(), default)).collect();
        Self { default, choices }
    }

    /// Override the choice for one conflict
    pub fn choose(&mut self, key: &JoinKey, resolution: Resolution) -> Result<()> {
        match self.choices.get_mut(key) {
            Some(choice) => {
                *choice = resolution;
                Ok(())
            }
            None => Err(Error::UnknownConflict(key.to_string())),
        }
    }

    /// Apply the same choice to every conflict
    pub fn set_all(&mut self, resolution: Resolution) {
        for choice in self.choices.values_mut() {
            *choice = resolution;
        }
    }

    /// Choice for a key; keys outside the conflict set get the default
    pub fn get(&self, key: &JoinKey) -> Resolution {
        self.choices.get(key).copied().unwrap_or(self.default)
    }

    pub fn default_resolution(&self) -> Resolution {
        self.default
    }

    pub fn len(&self) -> usize {
        self.choices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&JoinKey, Resolution)> {
        self.choices.iter().map(|(k, r)| (k, *r))
    }
}

#[cfg(test)]
mod tests {
    use super::super::detect::detect_conflicts;
    use super::super::test_support::{asset, record};
    use super::*;

    fn conflicts() -> Vec<Conflict> {
        let a = asset("ast-1", "Widget", 5, 2);
        let b = asset("ast-2", "Gadget", 1, 1);
        let assets = vec![&a, &b];
        detect_conflicts(
            &[record(1, "Widget", 7, 2), record(2, "Gadget", 3, 1)],
            &assets,
            "Headquarters",
        )
    }

    #[test]
    fn test_seeded_from_strategy() {
        let conflicts = conflicts();
        let store = ResolutionStore::seeded(&conflicts, ConflictStrategy::Local);
        assert_eq!(store.len(), 2);
        assert!(store.iter().all(|(_, r)| r == Resolution::Local));
    }

    #[test]
    fn test_choose_overrides_one_key() {
        let conflicts = conflicts();
        let mut store = ResolutionStore::seeded(&conflicts, ConflictStrategy::Central);
        store.choose(&conflicts[1].key, Resolution::Local).unwrap();

        assert_eq!(store.get(&conflicts[0].key), Resolution::Central);
        assert_eq!(store.get(&conflicts[1].key), Resolution::Local);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let mut store = ResolutionStore::seeded(&conflicts(), ConflictStrategy::Central);
        let key = JoinKey::Sku("missing".to_string());
        let err = store.choose(&key, Resolution::Local).unwrap_err();
        assert!(matches!(err, Error::UnknownConflict(_)));
    }

    #[test]
    fn test_set_all() {
        let conflicts = conflicts();
        let mut store = ResolutionStore::seeded(&conflicts, ConflictStrategy::Central);
        store.set_all(Resolution::Local);
        assert_eq!(store.get(&conflicts[0].key), Resolution::Local);
        assert_eq!(store.get(&conflicts[1].key), Resolution::Local);
    }

    #[test]
    fn test_parse_resolution() {
        assert_eq!("L".parse::<Resolution>().unwrap(), Resolution::Local);
        assert_eq!("central".parse::<Resolution>().unwrap(), Resolution::Central);
        assert!("both".parse::<Resolution>().is_err());
    }
}
