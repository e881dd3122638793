use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Money someone else owes the user, tracked alongside card spending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debt {
    pub id: i32,
    /// Who owes the money.
    pub person: String,
    pub amount: Decimal,
    pub reason: String,
    /// Settled debts stay in the record set but drop out of receivables.
    pub paid: bool,
    pub incurred_at: DateTime<Utc>,
}
