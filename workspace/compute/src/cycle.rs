//! Statement-period date arithmetic.
//!
//! Everything in this module works on UTC calendar dates: instants are
//! collapsed with `date_naive` before any comparison, so a purchase can
//! never drift across a closing boundary because of the wall clock it was
//! recorded under. This is the one time-representation rule of the crate.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use model::entities::card::{Card, CycleConfig};

use crate::error::{ComputeError, Result};

/// Returns the number of days in the given month using chrono.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = month_after(year, month);

    // The day before the first of the next month is the last day of this one.
    let first_of_next = NaiveDate::from_ymd_opt(next_year, next_month, 1).unwrap();
    first_of_next.pred_opt().unwrap().day()
}

fn month_after(year: i32, month: u32) -> (i32, u32) {
    if month == 12 { (year + 1, 1) } else { (year, month + 1) }
}

fn month_before(year: i32, month: u32) -> (i32, u32) {
    if month == 1 { (year - 1, 12) } else { (year, month - 1) }
}

/// One statement period of a card: every purchase dated after the previous
/// closing and on or before `closing` bills together.
///
/// Periods are derived on demand, never stored. Their identity is the
/// closing month, so equality and ordering deliberately ignore the concrete
/// dates.
#[derive(Debug, Clone, Copy)]
pub struct StatementPeriod {
    start: NaiveDate,
    closing: NaiveDate,
}

impl StatementPeriod {
    /// First day billed into this period.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Closing date; the last day billed into this period.
    pub fn closing(&self) -> NaiveDate {
        self.closing
    }

    pub fn closing_year(&self) -> i32 {
        self.closing.year()
    }

    pub fn closing_month(&self) -> u32 {
        self.closing.month()
    }

    /// True when the UTC calendar date falls inside this period.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.closing
    }
}

impl PartialEq for StatementPeriod {
    fn eq(&self, other: &Self) -> bool {
        (self.closing_year(), self.closing_month())
            == (other.closing_year(), other.closing_month())
    }
}

impl Eq for StatementPeriod {}

impl Ord for StatementPeriod {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.closing_year(), self.closing_month())
            .cmp(&(other.closing_year(), other.closing_month()))
    }
}

impl PartialOrd for StatementPeriod {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Pure date arithmetic for one card's billing cycle. Every other component
/// of the crate is built on top of this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleCalendar {
    closing_day: u32,
    due_day: u32,
}

impl CycleCalendar {
    /// Builds a calendar from a card's cycle configuration, rejecting day
    /// numbers outside 1..=31.
    pub fn new(config: &CycleConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            closing_day: config.closing_day,
            due_day: config.due_day,
        })
    }

    /// The concrete closing date within `(year, month)`, clamped to the
    /// month's length.
    fn closing_date_in(&self, year: i32, month: u32) -> NaiveDate {
        let day = self.closing_day.min(days_in_month(year, month));
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    /// The period whose closing falls in `(year, month)`. Its start is the
    /// day after the previous month's closing.
    fn period_closing_in(&self, year: i32, month: u32) -> StatementPeriod {
        let closing = self.closing_date_in(year, month);
        let (prev_year, prev_month) = month_before(year, month);
        let start = self.closing_date_in(prev_year, prev_month).succ_opt().unwrap();
        StatementPeriod { start, closing }
    }

    /// Statement period containing the given instant.
    pub fn period_containing(&self, instant: DateTime<Utc>) -> StatementPeriod {
        self.period_for_date(instant.date_naive())
    }

    /// Statement period containing the given UTC calendar date: on or before
    /// this month's (clamped) closing day it closes this month, after it the
    /// next, rolling December into January.
    pub fn period_for_date(&self, date: NaiveDate) -> StatementPeriod {
        let closing_this_month = self.closing_date_in(date.year(), date.month());
        if date <= closing_this_month {
            self.period_closing_in(date.year(), date.month())
        } else {
            let (year, month) = month_after(date.year(), date.month());
            self.period_closing_in(year, month)
        }
    }

    /// The period `delta_months` after (negative: before) the given one,
    /// reclamped to this calendar's closing day.
    pub fn shift(&self, period: &StatementPeriod, delta_months: i32) -> StatementPeriod {
        let index =
            period.closing_year() * 12 + period.closing_month() as i32 - 1 + delta_months;
        let year = index.div_euclid(12);
        let month = index.rem_euclid(12) as u32 + 1;
        self.period_closing_in(year, month)
    }

    /// Signed number of calendar months from `a`'s closing to `b`'s.
    pub fn months_between(a: &StatementPeriod, b: &StatementPeriod) -> i32 {
        (b.closing_year() * 12 + b.closing_month() as i32)
            - (a.closing_year() * 12 + a.closing_month() as i32)
    }

    /// Payment due date of a statement.
    ///
    /// When the due day does not come after the closing day, payment is owed
    /// in the month after the closing month; otherwise in the closing month
    /// itself. Clamped to month length like every other concrete date.
    pub fn due_date(&self, period: &StatementPeriod) -> NaiveDate {
        let (year, month) = if self.due_day <= self.closing_day {
            month_after(period.closing_year(), period.closing_month())
        } else {
            (period.closing_year(), period.closing_month())
        };
        let day = self.due_day.min(days_in_month(year, month));
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }
}

/// Resolves the calendar of every card in the snapshot, splitting off the
/// cards whose configuration fails validation so callers can report their
/// purchases instead of aborting.
pub(crate) fn calendars_by_card(
    cards: &[Card],
) -> (HashMap<i32, CycleCalendar>, HashMap<i32, ComputeError>) {
    let mut calendars = HashMap::new();
    let mut invalid = HashMap::new();

    for card in cards {
        match CycleCalendar::new(&card.cycle) {
            Ok(calendar) => {
                calendars.insert(card.id, calendar);
            }
            Err(error) => {
                invalid.insert(card.id, error);
            }
        }
    }

    (calendars, invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn calendar(closing_day: u32, due_day: u32) -> CycleCalendar {
        CycleCalendar::new(&CycleConfig::new(closing_day, due_day).unwrap()).unwrap()
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 1), 31);
        assert_eq!(days_in_month(2024, 2), 29); // leap year
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2024, 4), 30);
        assert_eq!(days_in_month(2024, 12), 31);
    }

    #[test]
    fn test_purchase_before_closing_belongs_to_current_period() {
        // Posted 2024-07-10 with closing day 14: still inside the period
        // closing 2024-07-14.
        let cal = calendar(14, 5);
        let period = cal.period_for_date(date(2024, 7, 10));
        assert_eq!(period.closing(), date(2024, 7, 14));
        assert_eq!(period.start(), date(2024, 6, 15));
    }

    #[test]
    fn test_purchase_after_closing_rolls_into_next_period() {
        let cal = calendar(14, 5);
        let period = cal.period_for_date(date(2024, 7, 20));
        assert_eq!(period.closing(), date(2024, 8, 14));
        assert_eq!(period.start(), date(2024, 7, 15));
    }

    #[test]
    fn test_closing_day_on_the_day_itself_still_counts() {
        let cal = calendar(14, 5);
        let period = cal.period_for_date(date(2024, 7, 14));
        assert_eq!(period.closing(), date(2024, 7, 14));
    }

    #[test]
    fn test_december_rolls_into_january() {
        let cal = calendar(14, 5);
        let period = cal.period_for_date(date(2024, 12, 20));
        assert_eq!(period.closing(), date(2025, 1, 14));
        assert_eq!(period.start(), date(2024, 12, 15));
    }

    #[test]
    fn test_closing_day_clamps_in_february() {
        let cal = calendar(31, 10);

        // Non-leap year: closing clamps to Feb 28 and a purchase on the 28th
        // belongs to the period closing that day.
        let period = cal.period_for_date(date(2023, 2, 28));
        assert_eq!(period.closing(), date(2023, 2, 28));
        assert_eq!(period.start(), date(2023, 2, 1));

        // Leap year clamps to Feb 29 instead.
        let leap = cal.period_for_date(date(2024, 2, 28));
        assert_eq!(leap.closing(), date(2024, 2, 29));
    }

    #[test]
    fn test_period_containing_uses_the_utc_date() {
        let cal = calendar(14, 5);
        // 23:59 UTC on the closing day is still inside the closing period.
        let instant = Utc.with_ymd_and_hms(2024, 7, 14, 23, 59, 59).unwrap();
        assert_eq!(cal.period_containing(instant).closing(), date(2024, 7, 14));

        // One second later the next period has started.
        let instant = Utc.with_ymd_and_hms(2024, 7, 15, 0, 0, 0).unwrap();
        assert_eq!(cal.period_containing(instant).closing(), date(2024, 8, 14));
    }

    #[test]
    fn test_periods_are_total_and_disjoint() {
        // Sweep a full leap year for awkward closing days: every date lands
        // in exactly one period, and consecutive dates never go backwards.
        for closing_day in [1, 14, 28, 29, 30, 31] {
            let cal = calendar(closing_day, 5);
            let mut day = date(2024, 1, 1);
            let end = date(2024, 12, 31);
            let mut previous = cal.period_for_date(day);

            while day <= end {
                let period = cal.period_for_date(day);
                assert!(
                    period.contains(day),
                    "day {day} not inside its own period (closing day {closing_day})"
                );
                assert!(
                    period >= previous,
                    "period went backwards at {day} (closing day {closing_day})"
                );
                previous = period;
                day = day.succ_opt().unwrap();
            }
        }
    }

    #[test]
    fn test_consecutive_periods_tile_the_calendar() {
        let cal = calendar(31, 10);
        let january = cal.period_for_date(date(2023, 1, 15));
        let february = cal.shift(&january, 1);
        let march = cal.shift(&january, 2);

        // Feb period starts the day after Jan 31 and closes on the clamped
        // Feb 28; March picks up on Mar 1 and recovers the 31st.
        assert_eq!(february.start(), date(2023, 2, 1));
        assert_eq!(february.closing(), date(2023, 2, 28));
        assert_eq!(march.start(), date(2023, 3, 1));
        assert_eq!(march.closing(), date(2023, 3, 31));
    }

    #[test]
    fn test_shift_and_months_between_round_trip() {
        let cal = calendar(14, 5);
        let base = cal.period_for_date(date(2024, 7, 10));

        for delta in -24..=24 {
            let shifted = cal.shift(&base, delta);
            assert_eq!(CycleCalendar::months_between(&base, &shifted), delta);
        }
        assert_eq!(cal.shift(&base, 0), base);
    }

    #[test]
    fn test_period_identity_is_the_closing_month() {
        let cal = calendar(14, 5);
        let a = cal.period_for_date(date(2024, 7, 1));
        let b = cal.period_for_date(date(2024, 7, 14));
        assert_eq!(a, b);

        let c = cal.period_for_date(date(2024, 7, 15));
        assert_ne!(a, c);
        assert!(a < c);
    }

    #[test]
    fn test_due_date_lands_in_the_month_after_closing() {
        // Due day 5 comes before closing day 14, so payment for the period
        // closing Aug 14 is owed Sep 5.
        let cal = calendar(14, 5);
        let period = cal.period_for_date(date(2024, 8, 1));
        assert_eq!(cal.due_date(&period), date(2024, 9, 5));
    }

    #[test]
    fn test_due_date_lands_in_the_closing_month() {
        // Due day 25 comes after closing day 14, so payment is owed in the
        // closing month itself.
        let cal = calendar(14, 25);
        let period = cal.period_for_date(date(2024, 8, 1));
        assert_eq!(cal.due_date(&period), date(2024, 8, 25));
    }

    #[test]
    fn test_due_date_clamps_to_month_length() {
        let cal = calendar(28, 31);
        let period = cal.period_for_date(date(2023, 2, 10));
        // Due day 31 in February clamps to the 28th.
        assert_eq!(period.closing(), date(2023, 2, 28));
        assert_eq!(cal.due_date(&period), date(2023, 2, 28));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = CycleConfig {
            closing_day: 0,
            due_day: 5,
        };
        assert!(CycleCalendar::new(&config).is_err());
    }
}
