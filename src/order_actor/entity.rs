use std::convert::Infallible;

use chrono::Utc;

use super::error::OrderError;
use super::transitions::{plan_transition, TransitionOutcome};
use crate::actor_framework::Entity;
use crate::domain::{money, Order, OrderCreate, OrderStatus, Shipment};

/// Mutations an order accepts once it exists. Everything goes through the state machine.
#[derive(Debug, Clone)]
pub enum OrderAction {
    Transition {
        target: OrderStatus,
        shipment: Option<Shipment>,
    },
}

impl OrderAction {
    pub fn to(target: OrderStatus) -> Self {
        OrderAction::Transition {
            target,
            shipment: None,
        }
    }
}

impl Entity for Order {
    const NAME: &'static str = "order";

    type Id = String;
    type CreateParams = OrderCreate;
    type UpdateParams = Infallible;
    type Action = OrderAction;
    type ActionResult = TransitionOutcome;
    type Error = OrderError;

    fn id(&self) -> &String {
        &self.id
    }

    /// Creates a new Order from validated, priced parameters.
    ///
    /// The total is computed here, once, and never recomputed. The order starts in
    /// `PENDING_PAYMENT`.
    fn from_create_params(id: String, params: OrderCreate) -> Result<Self, OrderError> {
        if params.items.is_empty() {
            return Err(OrderError::InvalidInput(
                "an order needs at least one item".to_string(),
            ));
        }

        let total = money::order_total(&params.items).ok_or_else(|| {
            OrderError::InvalidInput("order total is out of range".to_string())
        })?;
        let now = Utc::now();
        Ok(Self {
            id,
            user_id: params.user_id,
            items: params.items,
            total,
            address_id: params.address_id,
            status: OrderStatus::PendingPayment,
            shipment: None,
            created_at: now,
            updated_at: now,
        })
    }

    fn on_update(&mut self, update: Infallible) -> Result<(), OrderError> {
        match update {}
    }

    /// Orders are never physically removed; cancel them instead.
    fn on_delete(&self) -> Result<(), OrderError> {
        Err(OrderError::InvalidInput(format!(
            "order {} cannot be deleted",
            self.id
        )))
    }

    fn handle_action(&mut self, action: OrderAction) -> Result<TransitionOutcome, OrderError> {
        match action {
            OrderAction::Transition { target, shipment } => {
                let outcome = plan_transition(self.status, target)?;
                if let TransitionOutcome::Applied { to, .. } = outcome {
                    self.status = to;
                    self.updated_at = Utc::now();
                    if to == OrderStatus::Shipped {
                        self.shipment = shipment;
                    }
                }
                Ok(outcome)
            }
        }
    }

    fn action_mutated(outcome: &TransitionOutcome) -> bool {
        outcome.is_applied()
    }
}
