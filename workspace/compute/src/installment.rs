//! Allocation of installment plans onto statement periods.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::cycle::{CycleCalendar, StatementPeriod};

/// Maps the installments of one purchase onto the statement periods that
/// bill them: installment 1 bills in the period containing the posted date,
/// installment `k` in the period `k - 1` months later.
///
/// The schedule is a pure function of `(calendar, posted date, total)` and
/// is rebuilt on demand.
#[derive(Debug, Clone, Copy)]
pub struct InstallmentSchedule {
    calendar: CycleCalendar,
    first: StatementPeriod,
    total: u32,
}

impl InstallmentSchedule {
    pub fn new(calendar: CycleCalendar, posted_at: DateTime<Utc>, total: u32) -> Self {
        let first = calendar.period_containing(posted_at);
        Self {
            calendar,
            first,
            total,
        }
    }

    /// The period billing installment 1.
    pub fn first_period(&self) -> StatementPeriod {
        self.first
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    /// The period billing installment `k` (1-based).
    pub fn period_of(&self, k: u32) -> StatementPeriod {
        debug_assert!((1..=self.total).contains(&k));
        self.calendar.shift(&self.first, k as i32 - 1)
    }

    /// Which installment, if any, bills in `period`.
    ///
    /// Closed form of scanning `period_of` over the whole plan: the month
    /// distance from the first period is the zero-based installment index.
    pub fn installment_in(&self, period: &StatementPeriod) -> Option<u32> {
        let k = CycleCalendar::months_between(&self.first, period) + 1;
        if (1..=self.total as i32).contains(&k) {
            Some(k as u32)
        } else {
            None
        }
    }
}

/// Splits `amount` into `total` per-statement charges.
///
/// Each charge is the even share rounded to cents; whatever rounding leaves
/// over lands on the last installment, so the charges always sum back to
/// `amount` exactly.
pub fn installment_values(amount: Decimal, total: u32) -> Vec<Decimal> {
    let total = total.max(1);
    let share = (amount / Decimal::from(total)).round_dp(2);

    let mut values = vec![share; total as usize];
    values[total as usize - 1] = amount - share * Decimal::from(total - 1);
    values
}

/// The charge billed for installment `k` under the same split.
pub fn installment_value(amount: Decimal, total: u32, k: u32) -> Decimal {
    let values = installment_values(amount, total);
    values[(k as usize).clamp(1, values.len()) - 1]
}
