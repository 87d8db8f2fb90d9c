//! Two-table order store.
//!
//! # Tables
//!
//! | Table | Key | Value |
//! |-------|-----|-------|
//! | `orders` | `order_id` | [`OrderRow`] header |
//! | `order_items` | `order_id` | [`OrderItemRow`]s in line order |
//!
//! Every `put` stages the header and all item rows in a [`Transaction`] and applies
//! them under one write lock. A failed row write drops the transaction, so readers
//! never see a header without its items.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use rust_decimal::Decimal;

use crate::domain::{Order, OrderItem, OrderStatus, Shipment};
use crate::storage::{FaultInjector, StorageError, Store};

const ORDERS_TABLE: &str = "orders";
const ORDER_ITEMS_TABLE: &str = "order_items";

#[derive(Debug, Clone)]
struct OrderRow {
    id: String,
    user_id: String,
    total: Decimal,
    address_id: Option<String>,
    status: OrderStatus,
    shipment: Option<Shipment>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<&Order> for OrderRow {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.clone(),
            user_id: order.user_id.clone(),
            total: order.total,
            address_id: order.address_id.clone(),
            status: order.status,
            shipment: order.shipment.clone(),
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
struct OrderItemRow {
    product_id: String,
    quantity: u32,
    unit_price: Decimal,
}

#[derive(Debug, Default)]
struct Tables {
    orders: HashMap<String, OrderRow>,
    order_items: HashMap<String, Vec<OrderItemRow>>,
}

impl Tables {
    fn assemble(&self, row: &OrderRow) -> Order {
        let items = self
            .order_items
            .get(&row.id)
            .map(|rows| {
                rows.iter()
                    .map(|r| OrderItem::new(r.product_id.clone(), r.quantity, r.unit_price))
                    .collect()
            })
            .unwrap_or_default();

        Order {
            id: row.id.clone(),
            user_id: row.user_id.clone(),
            items,
            total: row.total,
            address_id: row.address_id.clone(),
            status: row.status,
            shipment: row.shipment.clone(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Rows staged for one order. Nothing is visible until [`commit`](Self::commit).
struct Transaction<'a> {
    faults: &'a FaultInjector,
    order_id: String,
    header: Option<OrderRow>,
    items: Vec<OrderItemRow>,
}

impl<'a> Transaction<'a> {
    fn begin(faults: &'a FaultInjector, order_id: &str) -> Self {
        Self {
            faults,
            order_id: order_id.to_string(),
            header: None,
            items: Vec::new(),
        }
    }

    fn write_header(&mut self, row: OrderRow) -> Result<(), StorageError> {
        self.faults.before_write(ORDERS_TABLE)?;
        self.header = Some(row);
        Ok(())
    }

    fn write_item(&mut self, row: OrderItemRow) -> Result<(), StorageError> {
        self.faults.before_write(ORDER_ITEMS_TABLE)?;
        self.items.push(row);
        Ok(())
    }

    fn commit(self, tables: &mut Tables) {
        if let Some(header) = self.header {
            tables.orders.insert(self.order_id.clone(), header);
        }
        tables.order_items.insert(self.order_id, self.items);
    }
}

/// Shared handle to the order tables. Clones see the same data, which lets tests
/// inspect row counts while the order actor owns the store.
#[derive(Debug, Clone, Default)]
pub struct OrderTables {
    tables: Arc<RwLock<Tables>>,
    faults: FaultInjector,
}

impl OrderTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn faults(&self) -> &FaultInjector {
        &self.faults
    }

    pub fn order_count(&self) -> usize {
        self.tables.read().orders.len()
    }

    pub fn item_row_count(&self) -> usize {
        self.tables.read().order_items.values().map(Vec::len).sum()
    }
}

impl Store<Order> for OrderTables {
    fn get(&self, id: &String) -> Result<Option<Order>, StorageError> {
        let tables = self.tables.read();
        Ok(tables.orders.get(id).map(|row| tables.assemble(row)))
    }

    fn put(&mut self, order: &Order) -> Result<(), StorageError> {
        let mut tx = Transaction::begin(&self.faults, &order.id);
        tx.write_header(OrderRow::from(order))?;
        for item in &order.items {
            tx.write_item(OrderItemRow {
                product_id: item.product_id.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
            })?;
        }

        tx.commit(&mut self.tables.write());
        Ok(())
    }

    fn remove(&mut self, id: &String) -> Result<bool, StorageError> {
        let mut tables = self.tables.write();
        tables.order_items.remove(id);
        Ok(tables.orders.remove(id).is_some())
    }

    fn list(&self) -> Result<Vec<Order>, StorageError> {
        let tables = self.tables.read();
        Ok(tables.orders.values().map(|row| tables.assemble(row)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(id: &str, lines: usize) -> Order {
        let now = Utc::now();
        let items: Vec<_> = (0..lines)
            .map(|i| OrderItem::new(format!("p{i}"), 1, Decimal::new(100, 2)))
            .collect();
        Order {
            id: id.to_string(),
            user_id: "u1".into(),
            total: crate::domain::money::order_total(&items).unwrap(),
            items,
            address_id: None,
            status: OrderStatus::PendingPayment,
            shipment: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn round_trips_header_and_items() {
        let mut store = OrderTables::new();
        let original = order("ord_1", 3);
        store.put(&original).unwrap();

        assert_eq!(store.get(&"ord_1".to_string()).unwrap(), Some(original));
        assert_eq!(store.order_count(), 1);
        assert_eq!(store.item_row_count(), 3);
    }

    #[test]
    fn fault_between_header_and_items_writes_nothing() {
        let mut store = OrderTables::new();
        store.faults().fail_after_writes(2);

        let err = store.put(&order("ord_1", 3)).unwrap_err();
        assert!(matches!(
            err,
            StorageError::WriteFailed {
                table: ORDER_ITEMS_TABLE,
                ..
            }
        ));
        assert_eq!(store.order_count(), 0);
        assert_eq!(store.item_row_count(), 0);
        assert!(store.get(&"ord_1".to_string()).unwrap().is_none());
    }

    #[test]
    fn failed_rewrite_keeps_previous_version() {
        let mut store = OrderTables::new();
        let original = order("ord_1", 2);
        store.put(&original).unwrap();

        let mut paid = original.clone();
        paid.status = OrderStatus::Paid;
        store.faults().fail_after_writes(0);
        assert!(store.put(&paid).is_err());

        store.faults().clear();
        assert_eq!(store.get(&"ord_1".to_string()).unwrap(), Some(original));
    }

    #[test]
    fn clones_share_tables() {
        let mut store = OrderTables::new();
        let observer = store.clone();
        store.put(&order("ord_1", 1)).unwrap();
        assert_eq!(observer.order_count(), 1);
        assert_eq!(observer.list().unwrap().len(), 1);
    }
}
