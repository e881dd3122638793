//! Reusable fixtures and scenarios for exercising the engine.

pub mod scenario_statement;

pub use scenario_statement::ScenarioStatement;

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;

use model::Snapshot;
use model::entities::card::{Card, CardBrand, CycleConfig};
use model::entities::debt::Debt;
use model::entities::purchase::{InstallmentPlan, Purchase, PurchaseKind};

use crate::cycle::CycleCalendar;
use crate::invoice::project_open_invoice;

/// Noon UTC on the given day; keeps fixtures clear of day boundaries.
pub fn at_noon(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

pub fn calendar(closing_day: u32, due_day: u32) -> CycleCalendar {
    CycleCalendar::new(&CycleConfig::new(closing_day, due_day).unwrap()).unwrap()
}

pub fn card(id: i32, closing_day: u32, due_day: u32) -> Card {
    Card {
        id,
        name: format!("Card {id}"),
        brand: CardBrand::Visa,
        last4: "0000".to_string(),
        expiry: "12/29".to_string(),
        cycle: CycleConfig {
            closing_day,
            due_day,
        },
    }
}

/// A single-payment purchase posted at noon UTC, amount in cents.
pub fn spot(id: i32, card_id: i32, cents: i64, posted: (i32, u32, u32)) -> Purchase {
    Purchase {
        id,
        card_id,
        description: format!("Purchase {id}"),
        amount: Decimal::new(cents, 2),
        posted_at: at_noon(posted.0, posted.1, posted.2),
        category: None,
        kind: PurchaseKind::SinglePayment,
    }
}

/// An installment purchase posted at noon UTC, amount in cents.
pub fn installments(
    id: i32,
    card_id: i32,
    cents: i64,
    posted: (i32, u32, u32),
    current: u32,
    total: u32,
) -> Purchase {
    Purchase {
        kind: PurchaseKind::Installments(InstallmentPlan::new(current, total)),
        ..spot(id, card_id, cents, posted)
    }
}

pub fn debt(id: i32, person: &str, cents: i64, paid: bool) -> Debt {
    Debt {
        id,
        person: person.to_string(),
        amount: Decimal::new(cents, 2),
        reason: format!("Debt {id}"),
        paid,
        incurred_at: at_noon(2024, 7, 1),
    }
}

/// Type representing the expected result of a test scenario
/// in the schema (card_id, expected open-invoice total).
pub type AssertResult = Vec<(i32, Decimal)>;

/// Prepared test scenario.
pub type TestScenario = (Snapshot, DateTime<Utc>, AssertResult);

/// Trait for building test scenarios.
pub trait TestScenarioBuilder {
    fn get_scenario(&self) -> TestScenario;
}

/// Projects the scenario's open invoice and checks every expected per-card
/// total.
pub fn run_and_assert_scenario(builder: &dyn TestScenarioBuilder) {
    let (snapshot, today, assert_result) = builder.get_scenario();

    let projection = project_open_invoice(&snapshot.cards, &snapshot.purchases, today);
    for (card_id, expected) in assert_result {
        let actual = projection.per_card.get(&card_id).copied().unwrap_or_default();
        assert_eq!(actual, expected, "card {card_id}");
    }
}
