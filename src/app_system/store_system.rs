use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::{AppConfig, PaymentConfig};
use crate::actor_framework::{Entity, FrameworkError, ResourceActor, ResourceClient};
use crate::clients::{CartClient, OrderClient, ProductClient};
use crate::domain::{prefixed_id, CartItem, Order, Product};
use crate::order_actor::OrderTables;
use crate::payment::{wechat, GatewayError, PaymentGateway, PaymentReconciler, WeChatPayGateway};
use crate::product_actor::PriceCatalog;
use crate::storage::MemoryStore;

/// Pick the gateway adapter named by `PAYMENT_PROVIDER`.
pub fn build_gateway(config: &PaymentConfig) -> Result<Arc<dyn PaymentGateway>, GatewayError> {
    match config.provider.as_str() {
        wechat::PROVIDER => Ok(Arc::new(WeChatPayGateway::new(config.wechat.clone()))),
        other => Err(GatewayError::Unavailable(format!(
            "unknown payment provider: {other}"
        ))),
    }
}

fn bounded<T: Entity>(client: ResourceClient<T>, timeout: Option<Duration>) -> ResourceClient<T> {
    match timeout {
        Some(limit) => client.with_timeout(limit),
        None => client,
    }
}

/// The main application system that orchestrates all actors.
///
/// Responsible for starting up actors, wiring them together, and handling shutdown.
pub struct StoreSystem {
    pub product_client: ProductClient,
    pub cart_client: CartClient,
    pub order_client: OrderClient,
    pub reconciler: PaymentReconciler,
    handles: Vec<JoinHandle<()>>,
}

impl StoreSystem {
    pub fn new(config: &AppConfig) -> Result<Self, GatewayError> {
        let gateway = build_gateway(&config.payment)?;
        Ok(Self::with_parts(config, gateway, OrderTables::new()))
    }

    /// Start every actor with an explicit gateway and order store.
    pub fn with_parts(
        config: &AppConfig,
        gateway: Arc<dyn PaymentGateway>,
        order_store: OrderTables,
    ) -> Self {
        let capacity = config.mailbox_capacity;
        let timeout = config.request_timeout();
        if timeout.is_none() {
            warn!("Actor requests are unbounded (REQUEST_TIMEOUT_MS=0)");
        }

        // 1. Product catalog
        let (product_actor, product_resource_client) =
            ResourceActor::new(capacity, MemoryStore::<Product>::new(), || prefixed_id("prod_"));
        let product_client = ProductClient::new(bounded(product_resource_client, timeout));
        let product_handle = tokio::spawn(product_actor.run());
        let catalog: Arc<dyn PriceCatalog> = Arc::new(product_client.clone());

        // 2. Cart
        let (cart_actor, cart_resource_client) =
            ResourceActor::new(capacity, MemoryStore::<CartItem>::new(), || prefixed_id("cart_"));
        let cart_client = CartClient::new(bounded(cart_resource_client, timeout), catalog.clone());
        let cart_handle = tokio::spawn(cart_actor.run());

        // 3. Orders
        let (order_actor, order_resource_client) =
            ResourceActor::<Order, OrderTables>::new(capacity, order_store, || prefixed_id("ord_"));
        let order_client = OrderClient::new(
            bounded(order_resource_client, timeout),
            catalog,
            gateway.clone(),
            config.payment.subject.clone(),
        );
        let order_handle = tokio::spawn(order_actor.run());

        // 4. Payment callbacks
        let reconciler = PaymentReconciler::new(gateway, order_client.clone());

        info!(capacity, ?timeout, "Store system started");
        Self {
            product_client,
            cart_client,
            order_client,
            reconciler,
            handles: vec![product_handle, cart_handle, order_handle],
        }
    }

    /// Ask every actor to stop and wait for them to drain.
    pub async fn shutdown(self) -> Result<(), FrameworkError> {
        info!("Shutting down system...");
        self.order_client.shutdown().await?;
        self.cart_client.shutdown().await?;
        self.product_client.shutdown().await?;

        for handle in self.handles {
            handle.await.map_err(|e| {
                error!(error = %e, "Actor task failed");
                FrameworkError::TaskFailed(e.to_string())
            })?;
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
