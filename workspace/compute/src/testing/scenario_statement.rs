//! A realistic three-card snapshot exercising the whole engine at once:
//! spot purchases on both sides of their closings, two installment plans in
//! flight and a mix of paid and unpaid debts.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use model::Snapshot;

use super::{AssertResult, TestScenario, TestScenarioBuilder, at_noon, card, debt, installments, spot};

pub struct ScenarioStatement {}

impl ScenarioStatement {
    pub fn new() -> Self {
        Self {}
    }

    /// The instant the expectations below are computed for.
    pub fn today(&self) -> DateTime<Utc> {
        at_noon(2024, 7, 21)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            // Closing day 14 / due 5, closing 25 / due 10, closing 5 / due 15.
            cards: vec![card(1, 14, 5), card(2, 25, 10), card(3, 5, 15)],
            purchases: vec![
                // Card 1, open period Jul 15 - Aug 14.
                spot(1, 1, 4590, (2024, 7, 20)),  // in the open period
                spot(2, 1, 2250, (2024, 7, 20)),  // in the open period
                spot(4, 1, 5500, (2024, 7, 18)),  // in the open period
                spot(7, 1, 2190, (2024, 7, 10)),  // closed with the Jul 14 statement
                spot(9, 1, 25000, (2024, 6, 25)), // closed with the Jul 14 statement
                // Third of five 90.00 shares lands in the open period.
                installments(10, 1, 45000, (2024, 5, 30), 3, 5),
                // Card 2, open period Jun 26 - Jul 25.
                installments(3, 2, 15000, (2024, 7, 19), 1, 3), // first 50.00 share
                spot(6, 2, 32040, (2024, 7, 14)),               // in the open period
                spot(8, 2, 18000, (2024, 6, 28)),               // after Jun 25: still open
                // Card 3, open period Jul 6 - Aug 5.
                spot(5, 3, 12075, (2024, 7, 15)), // in the open period
                spot(11, 3, 3990, (2024, 5, 5)),  // closed with the May 5 statement
            ],
            debts: vec![
                debt(1, "João Silva", 15000, false),
                debt(2, "Maria Oliveira", 5500, false),
                debt(3, "Carlos Pereira", 25000, true),
            ],
        }
    }
}

impl TestScenarioBuilder for ScenarioStatement {
    fn get_scenario(&self) -> TestScenario {
        let assert_result: AssertResult = vec![
            // 45.90 + 22.50 + 55.00 + 90.00
            (1, Decimal::new(21340, 2)),
            // 50.00 + 320.40 + 180.00
            (2, Decimal::new(55040, 2)),
            (3, Decimal::new(12075, 2)),
        ];

        (self.snapshot(), self.today(), assert_result)
    }
}
