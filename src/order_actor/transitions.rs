//! Order status state machine.
//!
//! ```text
//! PENDING_PAYMENT ──> PAID ──> SHIPPED ──> COMPLETED
//!        │
//!        └──────> CANCELLED
//! ```
//!
//! Only the four edges above are legal. Re-requesting the current status is a no-op,
//! and so is confirming payment for an order that has already moved past `PAID`:
//! gateways deliver callbacks at least once.

use serde::Serialize;

use super::OrderError;
use crate::domain::OrderStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TransitionOutcome {
    Applied { from: OrderStatus, to: OrderStatus },
    Unchanged { status: OrderStatus },
}

impl TransitionOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, TransitionOutcome::Applied { .. })
    }

    /// Status of the order after the request.
    pub fn status(&self) -> OrderStatus {
        match *self {
            TransitionOutcome::Applied { to, .. } => to,
            TransitionOutcome::Unchanged { status } => status,
        }
    }
}

impl OrderStatus {
    pub fn can_transition_to(self, target: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, target),
            (PendingPayment, Paid) | (PendingPayment, Cancelled) | (Paid, Shipped) | (Shipped, Completed)
        )
    }

    fn already_satisfies(self, target: OrderStatus) -> bool {
        self == target
            || (target == OrderStatus::Paid
                && matches!(self, OrderStatus::Shipped | OrderStatus::Completed))
    }
}

/// Decide what moving from `current` to `target` means, without touching any order.
pub fn plan_transition(
    current: OrderStatus,
    target: OrderStatus,
) -> Result<TransitionOutcome, OrderError> {
    if current.already_satisfies(target) {
        return Ok(TransitionOutcome::Unchanged { status: current });
    }
    if current.can_transition_to(target) {
        return Ok(TransitionOutcome::Applied {
            from: current,
            to: target,
        });
    }
    Err(OrderError::InvalidTransition {
        from: current,
        to: target,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use OrderStatus::*;

    const ALL: [OrderStatus; 5] = [PendingPayment, Paid, Shipped, Completed, Cancelled];

    #[test]
    fn exactly_four_edges_are_legal() {
        let legal: Vec<_> = ALL
            .iter()
            .flat_map(|&from| ALL.iter().map(move |&to| (from, to)))
            .filter(|&(from, to)| from.can_transition_to(to))
            .collect();
        assert_eq!(
            legal,
            vec![
                (PendingPayment, Paid),
                (PendingPayment, Cancelled),
                (Paid, Shipped),
                (Shipped, Completed),
            ]
        );
    }

    #[test]
    fn same_status_is_a_no_op() {
        for status in ALL {
            assert_eq!(
                plan_transition(status, status),
                Ok(TransitionOutcome::Unchanged { status })
            );
        }
    }

    #[test]
    fn payment_confirmation_after_payment_is_a_no_op() {
        for status in [Paid, Shipped, Completed] {
            let outcome = plan_transition(status, Paid).unwrap();
            assert!(!outcome.is_applied());
            assert_eq!(outcome.status(), status);
        }
    }

    #[test]
    fn cancelled_orders_are_never_resurrected() {
        for target in [PendingPayment, Paid, Shipped, Completed] {
            assert_eq!(
                plan_transition(Cancelled, target),
                Err(OrderError::InvalidTransition {
                    from: Cancelled,
                    to: target
                })
            );
        }
    }

    #[test]
    fn shipped_orders_cannot_be_cancelled() {
        assert!(matches!(
            plan_transition(Shipped, Cancelled),
            Err(OrderError::InvalidTransition { .. })
        ));
        assert!(matches!(
            plan_transition(PendingPayment, Shipped),
            Err(OrderError::InvalidTransition { .. })
        ));
    }
}
