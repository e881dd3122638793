use serde::{Deserialize, Serialize};

use crate::entities::card::Card;
use crate::entities::debt::Debt;
use crate::entities::purchase::Purchase;

/// In-memory view of every record the engine computes over.
///
/// Callers load it from the record store in one piece and hand it to the
/// compute crate together with "today"; computations never read anything
/// else and never write back. A stale snapshot simply yields stale numbers
/// until the caller re-reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub cards: Vec<Card>,
    #[serde(default)]
    pub purchases: Vec<Purchase>,
    #[serde(default)]
    pub debts: Vec<Debt>,
}

impl Snapshot {
    /// Looks up a card by id.
    pub fn card(&self, id: i32) -> Option<&Card> {
        self.cards.iter().find(|card| card.id == id)
    }

    /// All purchases made on the given card.
    pub fn purchases_on(&self, card_id: i32) -> impl Iterator<Item = &Purchase> {
        self.purchases
            .iter()
            .filter(move |purchase| purchase.card_id == card_id)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    use super::*;
    use crate::entities::card::{CardBrand, CycleConfig};
    use crate::entities::purchase::PurchaseKind;

    fn sample() -> Snapshot {
        Snapshot {
            cards: vec![Card {
                id: 1,
                name: "Cartão Principal".to_string(),
                brand: CardBrand::Visa,
                last4: "1234".to_string(),
                expiry: "12/26".to_string(),
                cycle: CycleConfig::new(14, 5).unwrap(),
            }],
            purchases: vec![
                Purchase {
                    id: 10,
                    card_id: 1,
                    description: "Uber Viagem".to_string(),
                    amount: Decimal::new(2250, 2),
                    posted_at: Utc.with_ymd_and_hms(2024, 7, 20, 18, 0, 0).unwrap(),
                    category: None,
                    kind: PurchaseKind::SinglePayment,
                },
                Purchase {
                    id: 11,
                    card_id: 2,
                    description: "Netflix".to_string(),
                    amount: Decimal::new(3990, 2),
                    posted_at: Utc.with_ymd_and_hms(2024, 5, 5, 0, 0, 0).unwrap(),
                    category: None,
                    kind: PurchaseKind::SinglePayment,
                },
            ],
            debts: Vec::new(),
        }
    }

    #[test]
    fn test_card_lookup() {
        let snapshot = sample();
        assert_eq!(snapshot.card(1).map(|c| c.name.as_str()), Some("Cartão Principal"));
        assert!(snapshot.card(99).is_none());
    }

    #[test]
    fn test_purchases_on_filters_by_card() {
        let snapshot = sample();
        let ids: Vec<i32> = snapshot.purchases_on(1).map(|p| p.id).collect();
        assert_eq!(ids, vec![10]);
    }

    #[test]
    fn test_snapshot_round_trips_as_json() {
        let snapshot = sample();
        let json = serde_json::to_string(&snapshot).expect("serialize");
        let back: Snapshot = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, snapshot);
    }
}
