//! Future obligation across installment plans, independent of statement
//! alignment.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use model::entities::purchase::Purchase;

use crate::installment::installment_values;
use crate::invoice::RejectedPurchase;

/// Sum of every installment share that has not billed yet.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OutstandingBalance {
    pub total: Decimal,
    #[serde(skip)]
    pub rejected: Vec<RejectedPurchase>,
}

/// Adds up, over all installment purchases, the shares past the current
/// index. This answers "how much is still owed in the future", not "how
/// much bills next" — no statement periods are involved.
///
/// Uses the same remainder-to-last split as the projector, so a plan's
/// outstanding value plus its already-billed shares is the purchase amount
/// exactly.
#[instrument(skip(purchases), fields(num_purchases = purchases.len()))]
pub fn remaining_balance(purchases: &[Purchase]) -> OutstandingBalance {
    let mut balance = OutstandingBalance::default();

    for purchase in purchases {
        let Some(plan) = purchase.kind.plan() else {
            continue;
        };
        if let Err(error) = plan.validate() {
            warn!(purchase_id = purchase.id, %error, "skipping purchase");
            balance.rejected.push(RejectedPurchase {
                purchase_id: purchase.id,
                error: error.into(),
            });
            continue;
        }
        if plan.current == plan.total {
            continue;
        }

        let values = installment_values(purchase.amount, plan.total);
        let remaining: Decimal = values[plan.current as usize..].iter().copied().sum();
        balance.total += remaining;
    }

    debug!(total = %balance.total, rejected = balance.rejected.len(), "outstanding balance computed");
    balance
}
