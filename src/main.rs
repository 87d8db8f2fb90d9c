mod actor_framework;
mod app_system;
mod cart_actor;
mod clients;
mod domain;
mod error;
mod order_actor;
mod payment;
mod product_actor;
mod storage;

#[cfg(test)]
mod mock_framework;

use anyhow::Context;
use rust_decimal::Decimal;
use tracing::{error, info, warn, Instrument};

use crate::app_system::{setup_tracing, AppConfig, StoreSystem};
use crate::domain::{LineItem, NewOrder, ProductCreate, Shipment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let config = AppConfig::from_env();
    setup_tracing(&config.logging);

    info!(environment = %config.environment, "Starting convenience store core");

    let system = StoreSystem::new(&config).context("failed to start store system")?;

    let span = tracing::info_span!("catalog_setup");
    let product = async {
        info!("Creating demo product");
        system
            .product_client
            .create_product(ProductCreate::new("Onigiri", Decimal::new(450, 2), 10))
            .await
    }
    .instrument(span)
    .await?;

    let span = tracing::info_span!("order_processing", product_id = %product.id);
    let order_id = async {
        let order = system
            .order_client
            .create_order(NewOrder::new("u1", vec![LineItem::new(&product.id, 2)]))
            .await?;
        info!(order_id = %order.id, total = %order.total(), "Order placed");

        match system.order_client.pay_order(&order.id).await {
            Ok(intent) => info!(provider = %intent.provider, "Payment intent ready"),
            Err(e) if e.is_retryable() => warn!(error = %e, "Payment initiation failed"),
            Err(e) => return Err(e.into()),
        }
        anyhow::Ok(order.id)
    }
    .instrument(span)
    .await?;

    let span = tracing::info_span!("payment_callback", order_id = %order_id);
    async {
        let payload = serde_json::json!({ "order_id": order_id, "success": true }).to_string();
        let outcome = system.reconciler.handle_callback(payload.as_bytes()).await?;
        info!(?outcome, "Callback reconciled");

        let redelivered = system.reconciler.handle_callback(payload.as_bytes()).await?;
        info!(?redelivered, "Duplicate callback reconciled");

        system
            .order_client
            .ship_order(&order_id, Some(Shipment::new("SF Express", "SF0000000001")))
            .await?;
        if let Err(e) = system.order_client.cancel_order(&order_id).await {
            info!(error = %e, "Cancel after shipment refused");
        }
        system.order_client.complete_order(&order_id).await?;
        anyhow::Ok(())
    }
    .instrument(span)
    .await?;

    let order = system.order_client.get_order(&order_id).await?;
    info!(order = %serde_json::to_string(&order)?, "Final order state");

    if let Err(e) = system.shutdown().await {
        error!(error = %e, "Shutdown failed");
        return Err(e.into());
    }

    info!("Application completed successfully");
    Ok(())
}
