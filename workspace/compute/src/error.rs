use thiserror::Error;

use model::entities::card::CycleConfigError;
use model::entities::purchase::InstallmentPlanError;

/// Error types for the compute crate
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComputeError {
    /// A card's cycle configuration is unusable.
    #[error("cycle configuration error: {0}")]
    Config(#[from] CycleConfigError),

    /// A purchase carries an installment plan that fails validation.
    #[error("installment plan error: {0}")]
    Plan(#[from] InstallmentPlanError),

    /// A purchase references a card that is missing from the snapshot.
    #[error("purchase {purchase_id} references unknown card {card_id}")]
    UnknownCard { purchase_id: i32, card_id: i32 },
}

/// Type alias for Result with ComputeError
pub type Result<T> = std::result::Result<T, ComputeError>;
