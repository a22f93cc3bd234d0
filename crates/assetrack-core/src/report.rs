//! Dashboard figures and simple breakdowns

use crate::asset::AssetStatus;
use crate::inventory::Inventory;
use crate::location::Scope;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_assets: usize,
    /// Shipments not yet delivered
    pub active_shipments: usize,
    pub active_assets: usize,
    pub total_value: Decimal,
    pub currency: String,
}

impl Inventory {
    pub fn summary(&self, scope: &Scope) -> Summary {
        let assets = self.assets_in(scope);
        Summary {
            total_assets: assets.len(),
            active_shipments: self
                .shipments_in(scope)
                .iter()
                .filter(|s| s.status.is_active())
                .count(),
            active_assets: assets
                .iter()
                .filter(|a| a.status == AssetStatus::Active)
                .count(),
            total_value: assets.iter().map(|a| a.total_value()).sum(),
            currency: self.display_settings(scope).currency,
        }
    }

    /// Asset count per status, statuses with no assets left out
    pub fn status_counts(&self, scope: &Scope) -> Vec<(AssetStatus, usize)> {
        let assets = self.assets_in(scope);
        AssetStatus::ALL
            .into_iter()
            .map(|status| (status, assets.iter().filter(|a| a.status == status).count()))
            .filter(|(_, count)| *count > 0)
            .collect()
    }

    /// Asset count per location name
    pub fn location_distribution(&self, scope: &Scope) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for asset in self.assets_in(scope) {
            *counts.entry(asset.location.clone()).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::AssetInput;
    use crate::shipment::{ShipmentInput, ShipmentStatus};

    fn add(inv: &mut Inventory, name: &str, qty: u32, price: i64, location: &str, status: AssetStatus) -> String {
        inv.add_asset(
            AssetInput {
                item_name: name.to_string(),
                current_quantity: qty,
                unit_price: Decimal::from(price),
                location: location.to_string(),
                status,
                ..Default::default()
            },
            &Scope::Global,
        )
        .unwrap()
        .id
        .clone()
    }

    #[test]
    fn test_summary_for_scope() {
        let mut inv = Inventory::default();
        let desk = add(&mut inv, "Desk", 2, 100, "Headquarters", AssetStatus::Active);
        add(&mut inv, "Lamp", 4, 10, "Headquarters", AssetStatus::Retired);
        add(&mut inv, "Chair", 1, 50, "Europe Office", AssetStatus::Active);

        for (tracking, status) in [("T1", ShipmentStatus::InTransit), ("T2", ShipmentStatus::Delivered)] {
            inv.record_shipment(
                ShipmentInput {
                    tracking_number: tracking.to_string(),
                    asset_id: desk.clone(),
                    from_location: "Headquarters".to_string(),
                    to_location: "Asia Pacific".to_string(),
                    status,
                },
                &Scope::Global,
            )
            .unwrap();
        }

        let hq = inv.summary(&Scope::Location("hq".to_string()));
        assert_eq!(hq.total_assets, 2);
        assert_eq!(hq.active_assets, 1);
        assert_eq!(hq.active_shipments, 1);
        assert_eq!(hq.total_value, Decimal::from(240));
        assert_eq!(hq.currency, "$");

        let all = inv.summary(&Scope::Global);
        assert_eq!(all.total_assets, 3);
        assert_eq!(all.total_value, Decimal::from(290));
    }

    #[test]
    fn test_breakdowns() {
        let mut inv = Inventory::default();
        add(&mut inv, "Desk", 1, 1, "Headquarters", AssetStatus::Active);
        add(&mut inv, "Lamp", 1, 1, "Headquarters", AssetStatus::Maintenance);
        add(&mut inv, "Chair", 1, 1, "Europe Office", AssetStatus::Active);

        assert_eq!(
            inv.status_counts(&Scope::Global),
            vec![(AssetStatus::Active, 2), (AssetStatus::Maintenance, 1)]
        );

        let distribution = inv.location_distribution(&Scope::Global);
        assert_eq!(distribution["Headquarters"], 2);
        assert_eq!(distribution["Europe Office"], 1);
        assert!(inv.location_distribution(&Scope::Location("asia".to_string())).is_empty());
    }
}
