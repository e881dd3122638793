//! Projection of the currently open invoice across a snapshot of cards and
//! purchases.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use model::entities::card::Card;
use model::entities::purchase::{Purchase, PurchaseKind};

use crate::cycle::{CycleCalendar, StatementPeriod, calendars_by_card};
use crate::error::{ComputeError, Result};
use crate::installment::{InstallmentSchedule, installment_value};

/// A purchase left out of an aggregate because its record failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedPurchase {
    pub purchase_id: i32,
    pub error: ComputeError,
}

/// Open-invoice totals across a snapshot.
///
/// `rejected` lists the purchases that were skipped instead of counted; one
/// malformed record never poisons the rest of the batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InvoiceProjection {
    /// Total billed into each card's open period, keyed by card id.
    pub per_card: HashMap<i32, Decimal>,
    pub grand_total: Decimal,
    #[serde(skip)]
    pub rejected: Vec<RejectedPurchase>,
}

/// The statement period that is still collecting purchases today (or closed
/// today).
pub fn open_period_for(calendar: &CycleCalendar, today: DateTime<Utc>) -> StatementPeriod {
    calendar.period_containing(today)
}

/// Money `purchase` bills into `period` on its card's calendar: the full
/// amount for a single payment posted inside the period, one installment
/// share for a plan whose number lands there, zero otherwise.
pub(crate) fn billed_in_period(
    calendar: &CycleCalendar,
    period: &StatementPeriod,
    purchase: &Purchase,
) -> Result<Decimal> {
    match &purchase.kind {
        PurchaseKind::SinglePayment => {
            if period.contains(purchase.posted_at.date_naive()) {
                Ok(purchase.amount)
            } else {
                Ok(Decimal::ZERO)
            }
        }
        PurchaseKind::Installments(plan) => {
            plan.validate()?;
            let schedule = InstallmentSchedule::new(*calendar, purchase.posted_at, plan.total);
            Ok(match schedule.installment_in(period) {
                Some(k) => installment_value(purchase.amount, plan.total, k),
                None => Decimal::ZERO,
            })
        }
    }
}

/// Computes each card's currently open statement period and sums the money
/// billing into it.
///
/// Single payments count when their posted UTC date lies after the previous
/// closing and on or before the current one; installment purchases
/// contribute the one share whose period matches, if any. Each purchase
/// contributes at most once per call.
#[instrument(skip(cards, purchases), fields(num_cards = cards.len(), num_purchases = purchases.len(), today = %today))]
pub fn project_open_invoice(
    cards: &[Card],
    purchases: &[Purchase],
    today: DateTime<Utc>,
) -> InvoiceProjection {
    let (calendars, invalid_cards) = calendars_by_card(cards);

    let mut open_periods: HashMap<i32, StatementPeriod> = HashMap::new();
    let mut projection = InvoiceProjection::default();

    for (card_id, calendar) in &calendars {
        let period = open_period_for(calendar, today);
        debug!(
            card_id,
            start = %period.start(),
            closing = %period.closing(),
            "resolved open period"
        );
        open_periods.insert(*card_id, period);
        projection.per_card.insert(*card_id, Decimal::ZERO);
    }

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
            projection.rejected.push(RejectedPurchase {
                purchase_id: purchase.id,
                error,
            });
            continue;
        };

        let period = &open_periods[&purchase.card_id];
        match billed_in_period(calendar, period, purchase) {
            Ok(value) => {
                if !value.is_zero() {
                    *projection.per_card.entry(purchase.card_id).or_default() += value;
                    projection.grand_total += value;
                }
            }
            Err(error) => {
                warn!(purchase_id = purchase.id, %error, "skipping purchase");
                projection.rejected.push(RejectedPurchase {
                    purchase_id: purchase.id,
                    error,
                });
            }
        }
    }

    debug!(grand_total = %projection.grand_total, rejected = projection.rejected.len(), "projection finished");
    projection
}
