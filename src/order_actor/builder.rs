//! Turns a caller's [`NewOrder`] into a validated, priced [`OrderCreate`].
//!
//! Stock is not checked or reserved here; see
//! [`ProductClient::validate_inventory`](crate::clients::ProductClient::validate_inventory).

use tracing::{debug, instrument};

use super::OrderError;
use crate::domain::{money, LineItem, NewOrder, OrderCreate, OrderItem};
use crate::product_actor::PriceCatalog;

pub fn validate(order: &NewOrder) -> Result<(), OrderError> {
    if order.user_id.trim().is_empty() {
        return Err(OrderError::InvalidInput("user_id is required".to_string()));
    }
    if order.items.is_empty() {
        return Err(OrderError::InvalidInput(
            "an order needs at least one item".to_string(),
        ));
    }
    for (index, line) in order.items.iter().enumerate() {
        validate_line(index, line)?;
    }
    Ok(())
}

fn validate_line(index: usize, line: &LineItem) -> Result<(), OrderError> {
    if line.product_id.trim().is_empty() {
        return Err(OrderError::InvalidInput(format!(
            "item {index}: product_id is required"
        )));
    }
    if line.quantity <= 0 {
        return Err(OrderError::InvalidInput(format!(
            "item {index}: quantity must be positive, got {}",
            line.quantity
        )));
    }
    if let Some(price) = line.unit_price {
        if price.is_sign_negative() {
            return Err(OrderError::InvalidInput(format!(
                "item {index}: unit_price must be non-negative, got {price}"
            )));
        }
    }
    Ok(())
}

/// Validate the request and resolve every missing price from the catalog.
#[instrument(skip(catalog, order), fields(user_id = %order.user_id, lines = order.items.len()))]
pub async fn build(catalog: &dyn PriceCatalog, order: NewOrder) -> Result<OrderCreate, OrderError> {
    validate(&order)?;

    let mut items = Vec::with_capacity(order.items.len());
    for line in order.items {
        let unit_price = match line.unit_price {
            Some(price) => price,
            None => {
                let price = catalog.current_price(&line.product_id).await?;
                debug!(product_id = %line.product_id, %price, "Priced from catalog");
                price
            }
        };
        // Positive after validate().
        let quantity = line.quantity.unsigned_abs();
        items.push(OrderItem::new(line.product_id, quantity, unit_price));
    }

    if money::order_total(&items).is_none() {
        return Err(OrderError::InvalidInput(
            "order total is out of range".to_string(),
        ));
    }

    Ok(OrderCreate {
        user_id: order.user_id,
        items,
        address_id: order.address_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product_actor::ProductError;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use std::collections::HashMap;

    struct FixedCatalog(HashMap<String, Decimal>);

    #[async_trait]
    impl PriceCatalog for FixedCatalog {
        async fn current_price(&self, product_id: &str) -> Result<Decimal, ProductError> {
            self.0
                .get(product_id)
                .copied()
                .ok_or_else(|| ProductError::NotFound(product_id.to_string()))
        }
    }

    fn catalog() -> FixedCatalog {
        FixedCatalog(HashMap::from([
            ("p1".to_string(), Decimal::new(450, 2)),
            ("p2".to_string(), Decimal::new(199, 2)),
        ]))
    }

    #[tokio::test]
    async fn prices_missing_lines_from_catalog() {
        let create = build(
            &catalog(),
            NewOrder::new(
                "u1",
                vec![
                    LineItem::new("p1", 2),
                    LineItem::new("p2", 1).with_price(Decimal::new(150, 2)),
                ],
            )
            .with_address("addr_1"),
        )
        .await
        .unwrap();

        assert_eq!(
            create.items,
            vec![
                OrderItem::new("p1", 2, Decimal::new(450, 2)),
                OrderItem::new("p2", 1, Decimal::new(150, 2)),
            ]
        );
        assert_eq!(money::order_total(&create.items), Some(Decimal::new(1050, 2)));
        assert_eq!(create.address_id.as_deref(), Some("addr_1"));
    }

    #[tokio::test]
    async fn explicit_zero_price_is_allowed() {
        let create = build(
            &catalog(),
            NewOrder::new("u1", vec![LineItem::new("unlisted", 1).with_price(Decimal::ZERO)]),
        )
        .await
        .unwrap();
        assert_eq!(create.items[0].unit_price, Decimal::ZERO);
    }

    #[tokio::test]
    async fn out_of_range_totals_are_invalid_input() {
        let err = build(
            &catalog(),
            NewOrder::new("u1", vec![LineItem::new("p1", 2).with_price(Decimal::MAX)]),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, OrderError::InvalidInput(ref msg) if msg.contains("out of range")));

        let err = build(
            &catalog(),
            NewOrder::new(
                "u1",
                vec![
                    LineItem::new("p1", 1).with_price(Decimal::MAX),
                    LineItem::new("p2", 1),
                ],
            ),
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn unknown_product_without_price_is_not_found() {
        let err = build(&catalog(), NewOrder::new("u1", vec![LineItem::new("p9", 1)]))
            .await
            .unwrap_err();
        assert_eq!(err, OrderError::ProductNotFound("p9".into()));
    }

    #[tokio::test]
    async fn rejects_invalid_requests() {
        let cases = [
            NewOrder::new(" ", vec![LineItem::new("p1", 1)]),
            NewOrder::new("u1", vec![]),
            NewOrder::new("u1", vec![LineItem::new("p1", 0)]),
            NewOrder::new("u1", vec![LineItem::new("p1", -3)]),
            NewOrder::new("u1", vec![LineItem::new("", 1)]),
            NewOrder::new(
                "u1",
                vec![LineItem::new("p1", 1).with_price(Decimal::new(-1, 2))],
            ),
        ];
        for case in cases {
            let err = build(&catalog(), case.clone()).await.unwrap_err();
            assert!(
                matches!(err, OrderError::InvalidInput(_)),
                "{case:?} gave {err:?}"
            );
        }
    }
}
