//! Reference collections: orders and locations
//!
//! Seed data the ledger reads but never mutates. Orders back-reference
//! products by identity; locations are fully independent.

use crate::db::models::{Location, Order};
use crate::identity::ProductIdentity;
use crate::{Error, Result};
use chrono::NaiveDateTime;
use sqlx::{Row, SqlitePool};

const ORDER_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Insert or refresh an order record.
pub async fn insert_order(pool: &SqlitePool, order: &Order) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO orders (order_id, order_date, identity, quantity, status)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(order_id) DO UPDATE SET
            order_date = excluded.order_date,
            identity = excluded.identity,
            quantity = excluded.quantity,
            status = excluded.status
        "#,
    )
    .bind(&order.order_id)
    .bind(order.order_date.format(ORDER_DATE_FORMAT).to_string())
    .bind(order.identity.as_str())
    .bind(order.quantity)
    .bind(&order.status)
    .execute(pool)
    .await?;

    Ok(())
}

/// Load all order records, oldest order first.
pub async fn load_orders(pool: &SqlitePool) -> Result<Vec<Order>> {
    let rows = sqlx::query(
        "SELECT order_id, order_date, identity, quantity, status FROM orders ORDER BY order_date, order_id",
    )
    .fetch_all(pool)
    .await?;

    let mut orders = Vec::new();
    for row in rows {
        let date_str: String = row.try_get("order_date")?;
        let order_date = NaiveDateTime::parse_from_str(&date_str, ORDER_DATE_FORMAT)
            .map_err(|e| Error::InvalidInput(format!("malformed order date {:?}: {}", date_str, e)))?;

        let identity_str: String = row.try_get("identity")?;

        orders.push(Order {
            order_id: row.try_get("order_id")?,
            order_date,
            identity: ProductIdentity::try_from(identity_str)?,
            quantity: row.try_get("quantity")?,
            status: row.try_get("status")?,
        });
    }

    Ok(orders)
}

/// Insert or refresh a location record.
pub async fn insert_location(pool: &SqlitePool, location: &Location) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO locations (warehouse_id, name, address, capacity)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(warehouse_id) DO UPDATE SET
            name = excluded.name,
            address = excluded.address,
            capacity = excluded.capacity
        "#,
    )
    .bind(&location.warehouse_id)
    .bind(&location.name)
    .bind(&location.address)
    .bind(location.capacity)
    .execute(pool)
    .await?;

    Ok(())
}

/// Load all location records.
pub async fn load_locations(pool: &SqlitePool) -> Result<Vec<Location>> {
    let rows = sqlx::query(
        "SELECT warehouse_id, name, address, capacity FROM locations ORDER BY warehouse_id",
    )
    .fetch_all(pool)
    .await?;

    let mut locations = Vec::new();
    for row in rows {
        locations.push(Location {
            warehouse_id: row.try_get("warehouse_id")?,
            name: row.try_get("name")?,
            address: row.try_get("address")?,
            capacity: row.try_get("capacity")?,
        });
    }

    Ok(locations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");
        crate::db::init::create_orders_table(&pool).await.unwrap();
        crate::db::init::create_locations_table(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn order_round_trip_keeps_date_format() {
        let pool = test_pool().await;
        let order = Order {
            order_id: "ORD-1001".to_string(),
            order_date: NaiveDateTime::parse_from_str("2024-11-21 08:30:00", ORDER_DATE_FORMAT)
                .unwrap(),
            identity: ProductIdentity::derive("Juice", "Boost"),
            quantity: 12,
            status: "Shipped".to_string(),
        };

        insert_order(&pool, &order).await.unwrap();
        let orders = load_orders(&pool).await.unwrap();
        assert_eq!(orders, vec![order]);
    }

    #[tokio::test]
    async fn location_round_trip() {
        let pool = test_pool().await;
        let location = Location {
            warehouse_id: "WH-7".to_string(),
            name: "North Depot".to_string(),
            address: "12 Dock Rd".to_string(),
            capacity: 5000,
        };

        insert_location(&pool, &location).await.unwrap();
        let locations = load_locations(&pool).await.unwrap();
        assert_eq!(locations, vec![location]);
    }
}
