//! Reconciliation of stored installment indices against elapsed due dates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use model::entities::card::Card;
use model::entities::purchase::{Purchase, PurchaseKind};

use crate::cycle::{CycleCalendar, calendars_by_card};
use crate::error::ComputeError;
use crate::installment::InstallmentSchedule;
use crate::invoice::RejectedPurchase;

/// A proposed correction of a purchase's stored installment index. The
/// caller persists it (or not); the engine never writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexProposal {
    pub purchase_id: i32,
    pub current: u32,
    pub proposed: u32,
}

/// Outcome of one reconciliation pass over a snapshot.
#[derive(Debug, Clone, Default)]
pub struct ReconcileReport {
    /// Purchases whose recomputed index differs from the stored one.
    pub proposals: Vec<IndexProposal>,
    pub rejected: Vec<RejectedPurchase>,
}

/// How many installments of a plan should count as billed by `today`.
///
/// Counts the due dates elapsed since the first statement, capped at the
/// plan length, and never returns less than the stored index: a stale
/// "today" can leave the index where it is but cannot move it back. That
/// also makes concurrent reconciliation passes idempotent.
pub fn advanced_index(
    calendar: &CycleCalendar,
    posted_at: DateTime<Utc>,
    total: u32,
    current: u32,
    today: DateTime<Utc>,
) -> u32 {
    let schedule = InstallmentSchedule::new(*calendar, posted_at, total);
    let today = today.date_naive();

    // Due dates are monotone in the installment number.
    let mut elapsed = 0;
    for k in 1..=total {
        if calendar.due_date(&schedule.period_of(k)) <= today {
            elapsed = k;
        } else {
            break;
        }
    }

    current.max(elapsed)
}

/// Recomputes the current index of every installment purchase and reports
/// the ones that moved.
#[instrument(skip(cards, purchases), fields(num_cards = cards.len(), num_purchases = purchases.len(), today = %today))]
pub fn reconcile(cards: &[Card], purchases: &[Purchase], today: DateTime<Utc>) -> ReconcileReport {
    let (calendars, invalid_cards) = calendars_by_card(cards);
    let mut report = ReconcileReport::default();

    for purchase in purchases {
        let PurchaseKind::Installments(plan) = &purchase.kind else {
            continue;
        };

        let Some(calendar) = calendars.get(&purchase.card_id) else {
            let error = match invalid_cards.get(&purchase.card_id) {
                Some(error) => error.clone(),
                None => ComputeError::UnknownCard {
                    purchase_id: purchase.id,
                    card_id: purchase.card_id,
                },
            };
            warn!(purchase_id = purchase.id, %error, "skipping purchase");
            report.rejected.push(RejectedPurchase {
                purchase_id: purchase.id,
                error,
            });
            continue;
        };

        if let Err(error) = plan.validate() {
            warn!(purchase_id = purchase.id, %error, "skipping purchase");
            report.rejected.push(RejectedPurchase {
                purchase_id: purchase.id,
                error: error.into(),
            });
            continue;
        }

        let proposed = advanced_index(calendar, purchase.posted_at, plan.total, plan.current, today);
        if proposed != plan.current {
            debug!(
                purchase_id = purchase.id,
                current = plan.current,
                proposed,
                "installment index advanced"
            );
            report.proposals.push(IndexProposal {
                purchase_id: purchase.id,
                current: plan.current,
                proposed,
            });
        }
    }

    report
}
