//! This file serves as the root for all record-type modules.
//! We define the data models for the finance tracking application here.
//! The records mirror what the external store keeps per user; the compute
//! crate treats them as read-only snapshots.

pub mod card;
pub mod debt;
pub mod purchase;

pub mod prelude {
    //! A prelude module for easy importing of all record types.
    pub use super::card::{Card, CardBrand, CycleConfig, CycleConfigError};
    pub use super::debt::Debt;
    pub use super::purchase::{
        Category, InstallmentPlan, InstallmentPlanError, Purchase, PurchaseKind,
    };
}
