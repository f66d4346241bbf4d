//! Shared fixtures for the backend integration tests

#![allow(dead_code)]

use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use salon_backend::config::{DatabaseConfig, ServerConfig};
use salon_backend::services::{ProductService, SupplierService};
use salon_backend::{db, AppState, Config};
use shared::{ProductInput, PurchaseInput, PurchaseItemInput, SupplierInput};
use sqlx::SqlitePool;

pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// A fresh, migrated in-memory database
pub async fn test_pool() -> SqlitePool {
    db::connect(&DatabaseConfig::in_memory())
        .await
        .expect("in-memory database should open")
}

pub fn test_state(pool: SqlitePool) -> AppState {
    AppState {
        db: pool,
        config: Arc::new(Config {
            environment: "test".to_string(),
            log_format: "pretty".to_string(),
            server: ServerConfig::default(),
            database: DatabaseConfig::in_memory(),
        }),
    }
}

pub async fn seed_supplier(pool: &SqlitePool, name: &str) -> i64 {
    SupplierService::new(pool.clone())
        .create_supplier(SupplierInput {
            name: Some(name.to_string()),
            ..Default::default()
        })
        .await
        .expect("supplier should be created")
        .id
}

pub async fn seed_product(pool: &SqlitePool, name: &str, stock: i64, threshold: i64) -> i64 {
    ProductService::new(pool.clone())
        .create_product(ProductInput {
            name: Some(name.to_string()),
            category: Some("soin".to_string()),
            purchase_price: Some(dec("4.50")),
            stock_quantity: Some(stock),
            alert_threshold: Some(threshold),
            ..Default::default()
        })
        .await
        .expect("product should be created")
        .id
}

pub async fn stock_of(pool: &SqlitePool, product_id: i64) -> i64 {
    sqlx::query_scalar("SELECT stock_quantity FROM products WHERE id = ?")
        .bind(product_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

/// SQLite storage class of a product's stock column
pub async fn stock_type_of(pool: &SqlitePool, product_id: i64) -> String {
    sqlx::query_scalar("SELECT typeof(stock_quantity) FROM products WHERE id = ?")
        .bind(product_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn set_stock(pool: &SqlitePool, product_id: i64, stock: i64) {
    sqlx::query("UPDATE products SET stock_quantity = ? WHERE id = ?")
        .bind(stock)
        .bind(product_id)
        .execute(pool)
        .await
        .unwrap();
}

/// Make the database abort any purchase line inserted with `quantity`
pub async fn reject_lines_with_quantity(pool: &SqlitePool, quantity: i64) {
    sqlx::query(&format!(
        "CREATE TRIGGER reject_purchase_line BEFORE INSERT ON purchase_items \
         WHEN NEW.quantity = {quantity} \
         BEGIN SELECT RAISE(ABORT, 'purchase line rejected'); END"
    ))
    .execute(pool)
    .await
    .unwrap();
}

pub async fn count_rows(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}

pub fn line(product_id: i64, quantity: i64, unit_price: &str) -> PurchaseItemInput {
    PurchaseItemInput {
        product_id: Some(product_id),
        quantity: Some(quantity),
        unit_price: Some(dec(unit_price)),
    }
}

pub fn purchase(supplier_id: i64, date: &str, items: Vec<PurchaseItemInput>) -> PurchaseInput {
    PurchaseInput {
        supplier_id: Some(supplier_id),
        purchase_date: Some(date.to_string()),
        items: Some(items),
        ..Default::default()
    }
}
