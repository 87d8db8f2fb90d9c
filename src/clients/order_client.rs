use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::actor_framework::ResourceClient;
use crate::domain::{money, NewOrder, Order, OrderStatus, PaymentIntent, Shipment};
use crate::order_actor::{builder, OrderAction, OrderError, TransitionOutcome};
use crate::payment::{PaymentGateway, PaymentRequest};
use crate::product_actor::PriceCatalog;

/// Client for interacting with the Order actor.
///
/// Pricing and payment initiation happen here, outside the actor, so the order
/// mailbox only ever sees ready-to-store orders and status transitions.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
    catalog: Arc<dyn PriceCatalog>,
    gateway: Arc<dyn PaymentGateway>,
    payment_subject: String,
}

impl_client_methods!(OrderClient, Order, OrderError, order);

fn require_id(order_id: &str) -> Result<(), OrderError> {
    if order_id.trim().is_empty() {
        return Err(OrderError::InvalidInput("order_id is required".to_string()));
    }
    Ok(())
}

impl OrderClient {
    pub fn new(
        inner: ResourceClient<Order>,
        catalog: Arc<dyn PriceCatalog>,
        gateway: Arc<dyn PaymentGateway>,
        payment_subject: impl Into<String>,
    ) -> Self {
        Self {
            inner,
            catalog,
            gateway,
            payment_subject: payment_subject.into(),
        }
    }

    #[instrument(skip(self, order), fields(user_id = %order.user_id))]
    pub async fn create_order(&self, order: NewOrder) -> Result<Order, OrderError> {
        let create = builder::build(self.catalog.as_ref(), order).await?;

        debug!("Sending request");
        let order = self.inner.create(create).await?;
        info!(order_id = %order.id, total = %order.total(), "Order created");
        Ok(order)
    }

    /// A user's orders, newest first.
    #[instrument(skip(self))]
    pub async fn list_orders(&self, user_id: &str) -> Result<Vec<Order>, OrderError> {
        debug!("Sending request");
        let owner = user_id.to_string();
        let mut orders = self.inner.list(move |o: &Order| o.user_id == owner).await?;
        orders.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(orders)
    }

    /// Open a payment for a `PENDING_PAYMENT` order. A fresh intent is produced on
    /// every call.
    #[instrument(skip(self))]
    pub async fn pay_order(&self, order_id: &str) -> Result<PaymentIntent, OrderError> {
        require_id(order_id)?;
        let order = self.get_order(order_id).await?;
        if order.status != OrderStatus::PendingPayment {
            return Err(OrderError::NotPayable {
                order_id: order.id,
                status: order.status,
            });
        }

        let amount_minor = money::to_minor_units(order.total()).ok_or_else(|| {
            OrderError::InvalidInput(format!("order total {} out of range", order.total()))
        })?;
        let request = PaymentRequest {
            order_id: order.id.clone(),
            amount_minor,
            subject: self.payment_subject.clone(),
        };
        let credentials = self.gateway.create_payment_intent(&request).await?;

        info!(amount_minor, provider = self.gateway.provider(), "Payment intent issued");
        Ok(PaymentIntent {
            order_id: order.id,
            provider: self.gateway.provider().to_string(),
            credentials,
        })
    }

    /// Move an order to `target` through the state machine.
    #[instrument(skip(self, shipment))]
    pub async fn transition(
        &self,
        order_id: &str,
        target: OrderStatus,
        shipment: Option<Shipment>,
    ) -> Result<TransitionOutcome, OrderError> {
        require_id(order_id)?;
        debug!("Sending request");
        let outcome = self
            .inner
            .perform_action(
                order_id.to_string(),
                OrderAction::Transition { target, shipment },
            )
            .await?;
        if let TransitionOutcome::Applied { from, to } = outcome {
            info!(%from, %to, "Order transitioned");
        }
        Ok(outcome)
    }

    pub async fn mark_paid(&self, order_id: &str) -> Result<TransitionOutcome, OrderError> {
        self.transition(order_id, OrderStatus::Paid, None).await
    }

    pub async fn cancel_order(&self, order_id: &str) -> Result<TransitionOutcome, OrderError> {
        self.transition(order_id, OrderStatus::Cancelled, None).await
    }

    pub async fn ship_order(
        &self,
        order_id: &str,
        shipment: Option<Shipment>,
    ) -> Result<TransitionOutcome, OrderError> {
        self.transition(order_id, OrderStatus::Shipped, shipment).await
    }

    pub async fn complete_order(&self, order_id: &str) -> Result<TransitionOutcome, OrderError> {
        self.transition(order_id, OrderStatus::Completed, None).await
    }
}
