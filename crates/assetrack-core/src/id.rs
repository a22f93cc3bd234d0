//! ID generation for inventory records
//!
//! Hash-based short IDs so records created on different machines don't
//! collide when backups are merged by hand.
//! Format: <kind>-xxxxxxxx (8 lowercase alphanumeric chars)

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Record kinds that carry generated IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Asset,
    Location,
    Shipment,
    Audit,
    CentralFile,
    SyncRecord,
}

impl IdKind {
    pub fn prefix(self) -> &'static str {
        match self {
            IdKind::Asset => "ast",
            IdKind::Location => "loc",
            IdKind::Shipment => "shp",
            IdKind::Audit => "aud",
            IdKind::CentralFile => "csv",
            IdKind::SyncRecord => "syn",
        }
    }
}

/// Generate a unique record ID
///
/// UUID + timestamp hash, encoded as Crockford base32 lowercase.
pub fn generate_id(kind: IdKind) -> String {
    let uuid = Uuid::new_v4();
    let timestamp = chrono::Utc::now().timestamp_nanos_opt().unwrap_or(0);

    let mut hasher = Sha256::new();
    hasher.update(uuid.as_bytes());
    hasher.update(timestamp.to_le_bytes());

    let hash = hasher.finalize();

    // 5 bytes = 40 bits = exactly 8 base32 chars
    let encoded = base32::encode(base32::Alphabet::Crockford, &hash[..5]).to_lowercase();

    format!("{}-{}", kind.prefix(), encoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_id() {
        let id = generate_id(IdKind::Asset);
        assert!(id.starts_with("ast-"));
        assert_eq!(id.len(), 12);
    }

    #[test]
    fn test_ids_are_unique() {
        let a = generate_id(IdKind::Shipment);
        let b = generate_id(IdKind::Shipment);
        assert_ne!(a, b);
    }
}
