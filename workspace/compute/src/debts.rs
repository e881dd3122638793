//! Receivables over the debt records: what other people still owe the user.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, instrument};

use model::entities::debt::Debt;

/// Unpaid debts, in total and grouped by debtor.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DebtSummary {
    pub receivable_total: Decimal,
    pub per_person: HashMap<String, Decimal>,
}

/// Sums every unpaid debt. Settled records stay out of both figures.
#[instrument(skip(debts), fields(num_debts = debts.len()))]
pub fn summarize_debts(debts: &[Debt]) -> DebtSummary {
    let mut summary = DebtSummary::default();

    for debt in debts.iter().filter(|debt| !debt.paid) {
        summary.receivable_total += debt.amount;
        *summary.per_person.entry(debt.person.clone()).or_default() += debt.amount;
    }

    debug!(receivable_total = %summary.receivable_total, "debts summarized");
    summary
}
