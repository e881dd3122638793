use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Spending category of a purchase, set by hand or by the external
/// categorizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Food,
    Transport,
    Leisure,
    Bills,
    Other,
}

/// Error raised when an installment plan fails validation.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallmentPlanError {
    /// A plan must have at least one installment.
    #[error("installment total {0} must be at least 1")]
    TotalOutOfRange(u32),

    /// The current installment index must stay within the plan.
    #[error("current installment {current} is outside 1..={total}")]
    CurrentOutOfRange { current: u32, total: u32 },
}

/// Progress of a purchase split across consecutive statements: which
/// installment bills next and how many exist in total.
///
/// Both indices are 1-based; `current == total` means the plan is fully
/// billed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentPlan {
    pub current: u32,
    pub total: u32,
}

impl InstallmentPlan {
    pub fn new(current: u32, total: u32) -> Self {
        Self { current, total }
    }

    /// Checks the invariant `1 <= current <= total`.
    ///
    /// Plans come straight from external storage and can be malformed;
    /// aggregate computations call this per record and skip offenders
    /// rather than aborting the batch.
    pub fn validate(&self) -> Result<(), InstallmentPlanError> {
        if self.total < 1 {
            return Err(InstallmentPlanError::TotalOutOfRange(self.total));
        }
        if self.current < 1 || self.current > self.total {
            return Err(InstallmentPlanError::CurrentOutOfRange {
                current: self.current,
                total: self.total,
            });
        }
        Ok(())
    }
}

/// Whether a purchase bills once or across consecutive statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PurchaseKind {
    SinglePayment,
    Installments(InstallmentPlan),
}

impl PurchaseKind {
    /// The installment plan, if this purchase carries one.
    pub fn plan(&self) -> Option<&InstallmentPlan> {
        match self {
            PurchaseKind::Installments(plan) => Some(plan),
            PurchaseKind::SinglePayment => None,
        }
    }
}

impl Default for PurchaseKind {
    fn default() -> Self {
        PurchaseKind::SinglePayment
    }
}

/// A single card purchase as stored by the tracker.
/// Corresponds to the transaction records the record store keeps per user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    pub id: i32,
    /// The card this purchase was made on.
    pub card_id: i32,
    pub description: String,
    /// Full purchase value. For installment purchases this is the whole
    /// amount, not the per-statement share.
    pub amount: Decimal,
    /// The instant the purchase posted, as reported by the store.
    pub posted_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default)]
    pub kind: PurchaseKind,
}
