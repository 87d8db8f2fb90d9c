//! # Mock Framework
//!
//! Utilities for testing clients in isolation.
//!
//! Use [`create_mock_client`] to get a client and a receiver.
//! Then use helpers like [`expect_create`] or [`expect_action`] to assert behavior.
//! [`ScriptedGateway`] stands in for a payment provider.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::actor_framework::{Entity, Envelope, Filter, ResourceClient, ResourceRequest, Response};
use crate::domain::CallbackResult;
use crate::payment::{GatewayError, PaymentGateway, PaymentRequest};

/// Creates a mock client and a receiver for asserting requests.
///
/// The client sends to a channel the test drains itself, so the test plays the actor:
/// it inspects each request and decides the reply.
pub fn create_mock_client<T: Entity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<Envelope<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Takes the next request the way the actor would, claiming it first.
async fn next_request<T: Entity>(
    receiver: &mut mpsc::Receiver<Envelope<T>>,
) -> Option<ResourceRequest<T>> {
    let envelope = receiver.recv().await?;
    envelope.ticket.claim().then_some(envelope.request)
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create<T: Entity>(
    receiver: &mut mpsc::Receiver<Envelope<T>>,
) -> Option<(T::CreateParams, Response<T, T::Error>)> {
    match next_request(receiver).await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get<T: Entity>(
    receiver: &mut mpsc::Receiver<Envelope<T>>,
) -> Option<(T::Id, Response<Option<T>, T::Error>)> {
    match next_request(receiver).await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Action request
pub async fn expect_action<T: Entity>(
    receiver: &mut mpsc::Receiver<Envelope<T>>,
) -> Option<(T::Id, T::Action, Response<T::ActionResult, T::Error>)> {
    match next_request(receiver).await {
        Some(ResourceRequest::Action {
            id,
            action,
            respond_to,
        }) => Some((id, action, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a List request
pub async fn expect_list<T: Entity>(
    receiver: &mut mpsc::Receiver<Envelope<T>>,
) -> Option<(Filter<T>, Response<Vec<T>, T::Error>)> {
    match next_request(receiver).await {
        Some(ResourceRequest::List { filter, respond_to }) => Some((filter, respond_to)),
        _ => None,
    }
}

#[derive(Deserialize)]
struct ScriptedCallback {
    order_id: String,
    success: bool,
}

/// In-memory payment provider. Records every intent request and can be switched off
/// to simulate an outage.
#[derive(Default)]
pub struct ScriptedGateway {
    down: AtomicBool,
    requests: Mutex<Vec<PaymentRequest>>,
}

impl ScriptedGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_available(&self, available: bool) {
        self.down.store(!available, Ordering::SeqCst);
    }

    pub fn requests(&self) -> Vec<PaymentRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl PaymentGateway for ScriptedGateway {
    fn provider(&self) -> &str {
        "scripted"
    }

    async fn create_payment_intent(
        &self,
        request: &PaymentRequest,
    ) -> Result<BTreeMap<String, String>, GatewayError> {
        if self.down.load(Ordering::SeqCst) {
            return Err(GatewayError::Unavailable("scripted outage".to_string()));
        }
        self.requests.lock().push(request.clone());
        Ok(BTreeMap::from([(
            "prepay_id".to_string(),
            format!("scripted_{}", request.order_id),
        )]))
    }

    fn parse_callback(&self, payload: &[u8]) -> Result<CallbackResult, GatewayError> {
        let parsed: ScriptedCallback = serde_json::from_slice(payload)
            .map_err(|e| GatewayError::MalformedCallback(e.to_string()))?;
        Ok(CallbackResult {
            order_id: parsed.order_id,
            success: parsed.success,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Product, ProductCreate};
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client::<Product>(10);

        let create_task = tokio::spawn(async move {
            client
                .create(ProductCreate::new("Onigiri", Decimal::new(450, 2), 10))
                .await
        });

        let (payload, responder) = expect_create(&mut receiver)
            .await
            .expect("Expected Create request");
        assert_eq!(payload.name, "Onigiri");
        let product = Product::from_create_params("prod_1".to_string(), payload).unwrap();
        responder.send(Ok(product.clone())).unwrap();

        let result = create_task.await.unwrap();
        assert_eq!(result, Ok(product));
    }

    #[tokio::test]
    async fn scripted_gateway_records_and_fails_on_demand() {
        let gateway = ScriptedGateway::new();
        let request = PaymentRequest {
            order_id: "ord_1".into(),
            amount_minor: 900,
            subject: "test".into(),
        };
        gateway.create_payment_intent(&request).await.unwrap();
        assert_eq!(gateway.requests(), vec![request.clone()]);

        gateway.set_available(false);
        assert!(matches!(
            gateway.create_payment_intent(&request).await,
            Err(GatewayError::Unavailable(_))
        ));
        assert_eq!(gateway.requests().len(), 1);
    }
}
