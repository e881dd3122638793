use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The payment network a card belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardBrand {
    Visa,
    Mastercard,
    Amex,
    Elo,
}

/// Error raised when a cycle configuration carries an impossible day number.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleConfigError {
    /// The statement closing day is outside 1..=31.
    #[error("closing day {0} is not a valid day of month (1..=31)")]
    ClosingDay(u32),

    /// The payment due day is outside 1..=31.
    #[error("due day {0} is not a valid day of month (1..=31)")]
    DueDay(u32),
}

/// Billing-cycle configuration of a card: the day of month its statement
/// closes and the day of month payment is due.
///
/// Both are plain day numbers in 1..=31. A day that exceeds the length of a
/// concrete month (31 in February, say) is still valid configuration; it
/// clamps to the month's last day whenever a concrete date is built from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleConfig {
    pub closing_day: u32,
    pub due_day: u32,
}

impl CycleConfig {
    /// Creates a validated cycle configuration.
    pub fn new(closing_day: u32, due_day: u32) -> Result<Self, CycleConfigError> {
        let config = Self {
            closing_day,
            due_day,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks both day numbers against the 1..=31 range.
    ///
    /// Snapshots arrive from external storage, so a record can bypass
    /// [`CycleConfig::new`]; computations re-run this before trusting it.
    pub fn validate(&self) -> Result<(), CycleConfigError> {
        if !(1..=31).contains(&self.closing_day) {
            return Err(CycleConfigError::ClosingDay(self.closing_day));
        }
        if !(1..=31).contains(&self.due_day) {
            return Err(CycleConfigError::DueDay(self.due_day));
        }
        Ok(())
    }
}

/// Represents a credit card with its billing-cycle configuration.
/// Corresponds to the card records the tracker stores per user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: i32,
    pub name: String,
    pub brand: CardBrand,
    /// Last four digits of the card number, display only.
    pub last4: String,
    /// Expiry in "MM/YY" form, display only.
    pub expiry: String,
    #[serde(flatten)]
    pub cycle: CycleConfig,
}
