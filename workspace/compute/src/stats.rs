//! Dashboard aggregations layered on top of the projector: invoice
//! composition, per-cycle history and category spending.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use model::entities::card::Card;
use model::entities::debt::Debt;
use model::entities::purchase::{Category, Purchase, PurchaseKind};

use crate::cycle::{CycleCalendar, calendars_by_card};
use crate::debts::summarize_debts;
use crate::error::{ComputeError, Result};
use crate::invoice::{RejectedPurchase, billed_in_period, open_period_for};

/// Open-invoice money split by how it bills, plus unpaid receivables.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InvoiceComposition {
    /// Single payments posted inside an open period.
    pub spot_total: Decimal,
    /// Installment shares billing into an open period.
    pub installment_total: Decimal,
    /// Unpaid debts, carried next to the invoice figures.
    pub receivable_total: Decimal,
    #[serde(skip)]
    pub rejected: Vec<RejectedPurchase>,
}

/// One statement period of a card's history and the money that billed into
/// it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CyclePoint {
    pub closing_year: i32,
    pub closing_month: u32,
    pub total: Decimal,
}

/// Per-cycle history of one card.
#[derive(Debug, Clone, Default)]
pub struct CycleHistory {
    /// Oldest period first; the last entry is the open one.
    pub points: Vec<CyclePoint>,
    pub rejected: Vec<RejectedPurchase>,
}

/// Splits the open invoice into its spot and installment portions and
/// attaches the receivables total.
#[instrument(skip(cards, purchases, debts), fields(num_cards = cards.len(), num_purchases = purchases.len(), today = %today))]
pub fn invoice_composition(
    cards: &[Card],
    purchases: &[Purchase],
    debts: &[Debt],
    today: DateTime<Utc>,
) -> InvoiceComposition {
    let (calendars, invalid_cards) = calendars_by_card(cards);
    let mut composition = InvoiceComposition {
        receivable_total: summarize_debts(debts).receivable_total,
        ..Default::default()
    };

    for purchase in purchases {
        let Some(calendar) = calendars.get(&purchase.card_id) else {
            let error = match invalid_cards.get(&purchase.card_id) {
                Some(error) => error.clone(),
                None => ComputeError::UnknownCard {
                    purchase_id: purchase.id,
                    card_id: purchase.card_id,
                },
            };
            warn!(purchase_id = purchase.id, %error, "skipping purchase");
            composition.rejected.push(RejectedPurchase {
                purchase_id: purchase.id,
                error,
            });
            continue;
        };

        let period = open_period_for(calendar, today);
        match billed_in_period(calendar, &period, purchase) {
            Ok(value) if value.is_zero() => {}
            Ok(value) => match purchase.kind {
                PurchaseKind::SinglePayment => composition.spot_total += value,
                PurchaseKind::Installments(_) => composition.installment_total += value,
            },
            Err(error) => {
                warn!(purchase_id = purchase.id, %error, "skipping purchase");
                composition.rejected.push(RejectedPurchase {
                    purchase_id: purchase.id,
                    error,
                });
            }
        }
    }

    composition
}

/// Rebuilds the invoice totals of one card for the open period and the
/// `cycles_back` periods before it, oldest first.
///
/// Unlike the projector this walks past periods, so installment purchases
/// land in the periods their numbers actually billed into rather than being
/// counted at their posted month.
#[instrument(skip(card, purchases), fields(card_id = card.id, num_purchases = purchases.len(), today = %today))]
pub fn invoice_history(
    card: &Card,
    purchases: &[Purchase],
    today: DateTime<Utc>,
    cycles_back: u32,
) -> Result<CycleHistory> {
    let calendar = CycleCalendar::new(&card.cycle)?;
    let open = open_period_for(&calendar, today);

    let mut history = CycleHistory::default();
    let on_card: Vec<&Purchase> = purchases
        .iter()
        .filter(|purchase| purchase.card_id == card.id)
        .collect();

    for delta in -(cycles_back as i32)..=0 {
        let period = calendar.shift(&open, delta);
        let mut total = Decimal::ZERO;

        for &purchase in &on_card {
            match billed_in_period(&calendar, &period, purchase) {
                Ok(value) => total += value,
                // Report each malformed record once, on the oldest period.
                Err(error) if delta == -(cycles_back as i32) => {
                    warn!(purchase_id = purchase.id, %error, "skipping purchase");
                    history.rejected.push(RejectedPurchase {
                        purchase_id: purchase.id,
                        error,
                    });
                }
                Err(_) => {}
            }
        }

        history.points.push(CyclePoint {
            closing_year: period.closing_year(),
            closing_month: period.closing_month(),
            total,
        });
    }

    debug!(points = history.points.len(), "history rebuilt");
    Ok(history)
}

/// Spending per category over the raw purchase list. `None` groups the
/// purchases the categorizer has not labeled yet.
pub fn spending_by_category(purchases: &[Purchase]) -> HashMap<Option<Category>, Decimal> {
    let mut totals: HashMap<Option<Category>, Decimal> = HashMap::new();
    for purchase in purchases {
        *totals.entry(purchase.category).or_default() += purchase.amount;
    }
    totals
}
