//! Pure billing-cycle computations over a snapshot of cards, purchases and
//! debts.
//!
//! Every function here is referentially transparent given `(snapshot,
//! today)`: no I/O, no caching, no shared mutable state. The only mutation
//! the engine ever suggests is the reconciler's proposed index updates,
//! which the caller may persist. Instants are interpreted on the UTC
//! calendar throughout; see [`cycle`] for the rule.

pub mod cycle;
pub mod debts;
pub mod error;
pub mod installment;
pub mod invoice;
pub mod outstanding;
pub mod reconcile;
pub mod stats;
pub mod testing;

pub use cycle::{CycleCalendar, StatementPeriod};
pub use debts::{DebtSummary, summarize_debts};
pub use error::{ComputeError, Result};
pub use installment::InstallmentSchedule;
pub use invoice::{InvoiceProjection, RejectedPurchase, project_open_invoice};
pub use outstanding::{OutstandingBalance, remaining_balance};
pub use reconcile::{IndexProposal, ReconcileReport, reconcile};

use chrono::{DateTime, Utc};

use model::Snapshot;

/// Everything the dashboard needs from one pass over a snapshot.
#[derive(Debug, Clone, Default)]
pub struct SnapshotReport {
    pub invoice: InvoiceProjection,
    pub outstanding: OutstandingBalance,
    pub reconcile: ReconcileReport,
    pub debts: DebtSummary,
}

/// Runs the projector, the outstanding-balance calculator, the reconciler
/// and the receivables summary over one snapshot.
///
/// This function uses the provided instant as "today", or the current
/// instant if none is provided.
pub fn compute_snapshot(snapshot: &Snapshot, today: Option<DateTime<Utc>>) -> SnapshotReport {
    let today = today.unwrap_or_else(Utc::now);

    SnapshotReport {
        invoice: project_open_invoice(&snapshot.cards, &snapshot.purchases, today),
        outstanding: remaining_balance(&snapshot.purchases),
        reconcile: reconcile(&snapshot.cards, &snapshot.purchases, today),
        debts: summarize_debts(&snapshot.debts),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScenarioStatement;
    use rust_decimal::Decimal;

    /// One pass over the statement scenario feeds all four dashboard
    /// figures consistently.
    #[test]
    fn test_compute_snapshot_over_scenario() {
        let scenario = ScenarioStatement::new();
        let report = compute_snapshot(&scenario.snapshot(), Some(scenario.today()));

        assert_eq!(report.invoice.grand_total, Decimal::new(88455, 2));
        assert_eq!(report.outstanding.total, Decimal::new(28000, 2));
        assert_eq!(report.debts.receivable_total, Decimal::new(20500, 2));
        assert!(report.reconcile.proposals.is_empty());
        assert!(report.invoice.rejected.is_empty());
    }

    /// An empty snapshot produces all-zero figures rather than failing.
    #[test]
    fn test_compute_snapshot_on_empty_snapshot() {
        let report = compute_snapshot(&Snapshot::default(), None);

        assert!(report.invoice.per_card.is_empty());
        assert_eq!(report.invoice.grand_total, Decimal::ZERO);
        assert_eq!(report.outstanding.total, Decimal::ZERO);
        assert_eq!(report.debts.receivable_total, Decimal::ZERO);
    }
}
