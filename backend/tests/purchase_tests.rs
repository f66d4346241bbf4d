//! Purchase workflow tests
//!
//! Covers the stock effects of recording, editing and deleting purchases:
//! - totals are re-derived from the lines on every write
//! - create adds quantities, delete takes them back out
//! - update reverses the old lines before applying the new ones
//! - any rejected write leaves purchases, lines and stock untouched

mod common;

use common::*;
use proptest::prelude::*;
use salon_backend::services::{ProductService, PurchaseService};
use salon_backend::AppError;
use shared::{PaymentMethod, PurchaseInput};

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn test_create_purchase_increments_stock_and_derives_total() {
    let pool = test_pool().await;
    let supplier = seed_supplier(&pool, "Beauté Pro").await;
    let shampoo = seed_product(&pool, "Shampooing", 0, 5).await;
    let dye = seed_product(&pool, "Coloration 6.1", 3, 5).await;

    let service = PurchaseService::new(pool.clone());
    let created = service
        .create_purchase(purchase(
            supplier,
            "2024-03-15",
            vec![line(shampoo, 2, "10.50"), line(dye, 3, "4.25")],
        ))
        .await
        .unwrap();

    assert_eq!(created.purchase.total_amount, dec("33.75"));
    assert_eq!(created.purchase.supplier_name.as_deref(), Some("Beauté Pro"));
    assert_eq!(created.purchase.payment_method, PaymentMethod::Carte);
    assert_eq!(created.items.len(), 2);
    assert_eq!(created.items[0].subtotal, dec("21.00"));
    assert_eq!(created.items[0].product_name.as_deref(), Some("Shampooing"));
    assert_eq!(created.items[1].subtotal, dec("12.75"));

    assert_eq!(stock_of(&pool, shampoo).await, 2);
    assert_eq!(stock_of(&pool, dye).await, 6);
}

#[tokio::test]
async fn test_create_purchase_with_repeated_product_adds_every_line() {
    let pool = test_pool().await;
    let supplier = seed_supplier(&pool, "Beauté Pro").await;
    let product = seed_product(&pool, "Masque", 1, 5).await;

    PurchaseService::new(pool.clone())
        .create_purchase(purchase(
            supplier,
            "2024-03-15",
            vec![line(product, 2, "3.00"), line(product, 3, "2.00")],
        ))
        .await
        .unwrap();

    assert_eq!(stock_of(&pool, product).await, 6);
}

#[tokio::test]
async fn test_create_purchase_without_items_writes_nothing() {
    let pool = test_pool().await;
    let supplier = seed_supplier(&pool, "Beauté Pro").await;

    let err = PurchaseService::new(pool.clone())
        .create_purchase(purchase(supplier, "2024-03-15", vec![]))
        .await
        .unwrap_err();

    match err {
        AppError::Validation(fields) => assert!(fields.contains("items")),
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(count_rows(&pool, "purchases").await, 0);
    assert_eq!(count_rows(&pool, "purchase_items").await, 0);
}

#[tokio::test]
async fn test_create_purchase_collects_every_field_error() {
    let pool = test_pool().await;
    let product = seed_product(&pool, "Laque", 0, 5).await;

    let err = PurchaseService::new(pool.clone())
        .create_purchase(PurchaseInput {
            supplier_id: None,
            purchase_date: Some("15/03/2024".to_string()),
            payment_method: Some("bitcoin".to_string()),
            items: Some(vec![line(product, 0, "1.00"), line(product, 1, "-2.00")]),
            ..Default::default()
        })
        .await
        .unwrap_err();

    let AppError::Validation(fields) = err else {
        panic!("expected validation error");
    };
    for key in [
        "supplier_id",
        "purchase_date",
        "payment_method",
        "items.0.quantity",
        "items.1.unit_price",
    ] {
        assert!(fields.contains(key), "missing error for {key}");
    }
    assert_eq!(stock_of(&pool, product).await, 0);
}

#[tokio::test]
async fn test_create_purchase_unknown_supplier_is_not_found() {
    let pool = test_pool().await;
    let product = seed_product(&pool, "Laque", 0, 5).await;

    let err = PurchaseService::new(pool.clone())
        .create_purchase(purchase(999, "2024-03-15", vec![line(product, 1, "1.00")]))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(ref r) if r == "Supplier"));
    assert_eq!(count_rows(&pool, "purchases").await, 0);
    assert_eq!(stock_of(&pool, product).await, 0);
}

#[tokio::test]
async fn test_create_purchase_unknown_product_rolls_back_everything() {
    let pool = test_pool().await;
    let supplier = seed_supplier(&pool, "Beauté Pro").await;
    let product = seed_product(&pool, "Laque", 4, 5).await;

    let err = PurchaseService::new(pool.clone())
        .create_purchase(purchase(
            supplier,
            "2024-03-15",
            vec![line(product, 2, "1.00"), line(424242, 1, "1.00")],
        ))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(ref r) if r == "Product"));
    assert_eq!(count_rows(&pool, "purchases").await, 0);
    assert_eq!(count_rows(&pool, "purchase_items").await, 0);
    assert_eq!(stock_of(&pool, product).await, 4);
}

#[tokio::test]
async fn test_create_purchase_failing_midway_rolls_back_stock() {
    let pool = test_pool().await;
    let supplier = seed_supplier(&pool, "Beauté Pro").await;
    let a = seed_product(&pool, "Laque", 4, 5).await;
    let b = seed_product(&pool, "Gel", 0, 5).await;
    reject_lines_with_quantity(&pool, 13).await;

    let service = PurchaseService::new(pool.clone());
    // The first line has already been stocked when the second one fails
    let err = service
        .create_purchase(purchase(
            supplier,
            "2024-03-15",
            vec![line(a, 2, "1.00"), line(b, 13, "1.00")],
        ))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::DatabaseError(_)));
    assert_eq!(stock_of(&pool, a).await, 4);
    assert_eq!(stock_of(&pool, b).await, 0);
    assert_eq!(count_rows(&pool, "purchases").await, 0);
    assert_eq!(count_rows(&pool, "purchase_items").await, 0);

    // The connection is usable again afterwards
    service
        .create_purchase(purchase(supplier, "2024-03-16", vec![line(a, 1, "1.00")]))
        .await
        .unwrap();
    assert_eq!(stock_of(&pool, a).await, 5);
}

#[tokio::test]
async fn test_create_purchase_beyond_stock_limit_is_rejected() {
    let pool = test_pool().await;
    let supplier = seed_supplier(&pool, "Beauté Pro").await;
    let product = seed_product(&pool, "Laque", 1, 5).await;

    let err = PurchaseService::new(pool.clone())
        .create_purchase(purchase(supplier, "2024-03-15", vec![line(product, i64::MAX, "0")]))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(ref f) if f.contains("items")));
    assert_eq!(stock_of(&pool, product).await, 1);
    assert_eq!(stock_type_of(&pool, product).await, "integer");
    assert_eq!(count_rows(&pool, "purchases").await, 0);

    let products = ProductService::new(pool.clone()).list_products().await.unwrap();
    assert_eq!(products.len(), 1);
}

#[tokio::test]
async fn test_create_purchase_repeated_product_overflow_is_rejected() {
    let pool = test_pool().await;
    let supplier = seed_supplier(&pool, "Beauté Pro").await;
    let product = seed_product(&pool, "Laque", 0, 5).await;

    let err = PurchaseService::new(pool.clone())
        .create_purchase(purchase(
            supplier,
            "2024-03-15",
            vec![line(product, i64::MAX, "0"), line(product, 1, "0")],
        ))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(ref f) if f.contains("items")));
    assert_eq!(stock_of(&pool, product).await, 0);
    assert_eq!(count_rows(&pool, "purchases").await, 0);
}

// ============================================================================
// Update
// ============================================================================

#[tokio::test]
async fn test_update_purchase_reverses_then_reapplies() {
    let pool = test_pool().await;
    let supplier = seed_supplier(&pool, "Beauté Pro").await;
    let a = seed_product(&pool, "Shampooing", 0, 5).await;
    let b = seed_product(&pool, "Après-shampooing", 0, 5).await;

    let service = PurchaseService::new(pool.clone());
    let created = service
        .create_purchase(purchase(supplier, "2024-03-15", vec![line(a, 5, "2.00")]))
        .await
        .unwrap();
    assert_eq!(stock_of(&pool, a).await, 5);

    let updated = service
        .update_purchase(
            created.purchase.id,
            purchase(
                supplier,
                "2024-03-16",
                vec![line(a, 2, "2.00"), line(b, 4, "1.50")],
            ),
        )
        .await
        .unwrap();

    assert_eq!(stock_of(&pool, a).await, 2);
    assert_eq!(stock_of(&pool, b).await, 4);
    assert_eq!(updated.purchase.total_amount, dec("10.00"));
    assert_eq!(updated.purchase.purchase_date.to_string(), "2024-03-16");
    assert_eq!(updated.items.len(), 2);
    assert_eq!(count_rows(&pool, "purchase_items").await, 2);
}

#[tokio::test]
async fn test_update_missing_purchase_is_not_found_before_validation() {
    let pool = test_pool().await;

    let err = PurchaseService::new(pool.clone())
        .update_purchase(77, PurchaseInput::default())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(ref r) if r == "Purchase"));
}

#[tokio::test]
async fn test_rejected_update_leaves_prior_state() {
    let pool = test_pool().await;
    let supplier = seed_supplier(&pool, "Beauté Pro").await;
    let product = seed_product(&pool, "Shampooing", 0, 5).await;

    let service = PurchaseService::new(pool.clone());
    let created = service
        .create_purchase(purchase(supplier, "2024-03-15", vec![line(product, 5, "2.00")]))
        .await
        .unwrap();

    // Invalid payload
    let err = service
        .update_purchase(created.purchase.id, purchase(supplier, "2024-03-15", vec![]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // Valid payload pointing at a missing product
    let err = service
        .update_purchase(
            created.purchase.id,
            purchase(supplier, "2024-03-15", vec![line(9999, 1, "1.00")]),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(ref r) if r == "Product"));

    let current = service.get_purchase(created.purchase.id).await.unwrap();
    assert_eq!(current.items.len(), 1);
    assert_eq!(current.items[0].quantity, 5);
    assert_eq!(current.purchase.total_amount, dec("10.00"));
    assert_eq!(stock_of(&pool, product).await, 5);
}

#[tokio::test]
async fn test_update_purchase_increase_applies_net_difference() {
    let pool = test_pool().await;
    let supplier = seed_supplier(&pool, "Beauté Pro").await;
    let product = seed_product(&pool, "Shampooing", 0, 5).await;

    let service = PurchaseService::new(pool.clone());
    let created = service
        .create_purchase(purchase(supplier, "2024-03-15", vec![line(product, 3, "2.00")]))
        .await
        .unwrap();
    assert_eq!(stock_of(&pool, product).await, 3);

    let updated = service
        .update_purchase(
            created.purchase.id,
            purchase(supplier, "2024-03-15", vec![line(product, 5, "2.00")]),
        )
        .await
        .unwrap();

    // Net +2 on top of the original 3
    assert_eq!(stock_of(&pool, product).await, 5);
    assert_eq!(updated.items[0].quantity, 5);
    assert_eq!(updated.purchase.total_amount, dec("10.00"));
}

#[tokio::test]
async fn test_update_failing_midway_restores_prior_state() {
    let pool = test_pool().await;
    let supplier = seed_supplier(&pool, "Beauté Pro").await;
    let a = seed_product(&pool, "Shampooing", 0, 5).await;
    let b = seed_product(&pool, "Gel", 0, 5).await;

    let service = PurchaseService::new(pool.clone());
    let created = service
        .create_purchase(purchase(supplier, "2024-03-15", vec![line(a, 5, "2.00")]))
        .await
        .unwrap();
    reject_lines_with_quantity(&pool, 13).await;

    // Old lines are reverted and the first new line applied before the failure
    let err = service
        .update_purchase(
            created.purchase.id,
            purchase(supplier, "2024-03-20", vec![line(a, 2, "2.00"), line(b, 13, "1.00")]),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::DatabaseError(_)));

    let current = service.get_purchase(created.purchase.id).await.unwrap();
    assert_eq!(current.purchase.purchase_date.to_string(), "2024-03-15");
    assert_eq!(current.purchase.total_amount, dec("10.00"));
    assert_eq!(current.items.len(), 1);
    assert_eq!(current.items[0].quantity, 5);
    assert_eq!(count_rows(&pool, "purchase_items").await, 1);
    assert_eq!(stock_of(&pool, a).await, 5);
    assert_eq!(stock_of(&pool, b).await, 0);
}

#[tokio::test]
async fn test_update_beyond_stock_limit_restores_prior_state() {
    let pool = test_pool().await;
    let supplier = seed_supplier(&pool, "Beauté Pro").await;
    let product = seed_product(&pool, "Shampooing", 0, 5).await;

    let service = PurchaseService::new(pool.clone());
    let created = service
        .create_purchase(purchase(supplier, "2024-03-15", vec![line(product, 3, "2.00")]))
        .await
        .unwrap();
    set_stock(&pool, product, i64::MAX).await;

    let err = service
        .update_purchase(
            created.purchase.id,
            purchase(supplier, "2024-03-15", vec![line(product, 4, "2.00")]),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(ref f) if f.contains("items")));
    assert_eq!(stock_of(&pool, product).await, i64::MAX);
    assert_eq!(stock_type_of(&pool, product).await, "integer");
    let current = service.get_purchase(created.purchase.id).await.unwrap();
    assert_eq!(current.items[0].quantity, 3);
}

// ============================================================================
// Delete
// ============================================================================

#[tokio::test]
async fn test_delete_purchase_reverts_stock_and_cascades_items() {
    let pool = test_pool().await;
    let supplier = seed_supplier(&pool, "Beauté Pro").await;
    let product = seed_product(&pool, "Shampooing", 3, 5).await;

    let service = PurchaseService::new(pool.clone());
    let created = service
        .create_purchase(purchase(supplier, "2024-03-15", vec![line(product, 4, "2.00")]))
        .await
        .unwrap();
    assert_eq!(stock_of(&pool, product).await, 7);

    service.delete_purchase(created.purchase.id).await.unwrap();

    assert_eq!(stock_of(&pool, product).await, 3);
    assert_eq!(count_rows(&pool, "purchases").await, 0);
    assert_eq!(count_rows(&pool, "purchase_items").await, 0);

    let err = service.delete_purchase(created.purchase.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(ref r) if r == "Purchase"));
}

#[tokio::test]
async fn test_delete_purchase_may_drive_stock_negative() {
    let pool = test_pool().await;
    let supplier = seed_supplier(&pool, "Beauté Pro").await;
    let product = seed_product(&pool, "Shampooing", 0, 5).await;

    let service = PurchaseService::new(pool.clone());
    let created = service
        .create_purchase(purchase(supplier, "2024-03-15", vec![line(product, 5, "2.00")]))
        .await
        .unwrap();

    // Goods already used on clients
    sqlx::query("UPDATE products SET stock_quantity = 2 WHERE id = ?")
        .bind(product)
        .execute(&pool)
        .await
        .unwrap();

    service.delete_purchase(created.purchase.id).await.unwrap();

    assert_eq!(stock_of(&pool, product).await, -3);
}

// ============================================================================
// Reads
// ============================================================================

#[tokio::test]
async fn test_list_purchases_newest_first_with_item_counts() {
    let pool = test_pool().await;
    let supplier = seed_supplier(&pool, "Beauté Pro").await;
    let other = seed_supplier(&pool, "Coiff Distribution").await;
    let product = seed_product(&pool, "Shampooing", 0, 5).await;

    let service = PurchaseService::new(pool.clone());
    service
        .create_purchase(purchase(supplier, "2024-01-10", vec![line(product, 1, "2.00")]))
        .await
        .unwrap();
    service
        .create_purchase(purchase(
            other,
            "2024-02-10",
            vec![line(product, 1, "2.00"), line(product, 2, "2.00")],
        ))
        .await
        .unwrap();

    let all = service.list_purchases().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].purchase.purchase_date.to_string(), "2024-02-10");
    assert_eq!(all[0].items_count, 2);
    assert_eq!(all[1].items_count, 1);

    let by_supplier = service.list_by_supplier(supplier).await.unwrap();
    assert_eq!(by_supplier.len(), 1);
    assert_eq!(by_supplier[0].purchase.supplier_id, supplier);

    let err = service.list_by_supplier(555).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(ref r) if r == "Supplier"));
}

#[tokio::test]
async fn test_purchase_stats_totals_and_top_suppliers() {
    let pool = test_pool().await;
    let small = seed_supplier(&pool, "Petit Fournisseur").await;
    let big = seed_supplier(&pool, "Grand Fournisseur").await;
    let product = seed_product(&pool, "Shampooing", 0, 5).await;

    let service = PurchaseService::new(pool.clone());
    let today = chrono::Utc::now().date_naive().to_string();
    service
        .create_purchase(purchase(small, &today, vec![line(product, 1, "5.00")]))
        .await
        .unwrap();
    service
        .create_purchase(purchase(big, &today, vec![line(product, 10, "5.00")]))
        .await
        .unwrap();

    let stats = service.get_stats().await.unwrap();
    assert_eq!(stats.total_purchases, 2);
    assert_eq!(stats.total_spent, dec("55.00"));
    assert_eq!(stats.monthly.len(), 1);
    assert_eq!(stats.monthly[0].purchases_count, 2);
    assert_eq!(stats.top_suppliers[0].supplier_id, big);
    assert_eq!(stats.top_suppliers[0].total_spent, dec("50.00"));
}

#[tokio::test]
async fn test_get_missing_purchase_is_not_found() {
    let pool = test_pool().await;
    let err = PurchaseService::new(pool).get_purchase(1).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(ref r) if r == "Purchase"));
}

// ============================================================================
// Property Tests
// ============================================================================

mod property_tests {
    use super::*;
    use shared::money::from_cents;

    /// (product index, quantity, unit price in cents)
    fn lines_strategy() -> impl Strategy<Value = Vec<(usize, i64, i64)>> {
        prop::collection::vec((0usize..3, 1i64..50, 0i64..10_000), 1..6)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        /// Create adds exactly the per-product quantities, delete restores the
        /// starting stock, and the stored total is the sum of the subtotals.
        #[test]
        fn prop_create_then_delete_restores_stock(
            initial in prop::collection::vec(0i64..20, 3),
            lines in lines_strategy(),
        ) {
            tokio_test::block_on(async {
                let pool = test_pool().await;
                let supplier = seed_supplier(&pool, "Fournisseur").await;
                let mut products = Vec::new();
                for (i, stock) in initial.iter().enumerate() {
                    products.push(seed_product(&pool, &format!("Produit {i}"), *stock, 5).await);
                }

                let items = lines
                    .iter()
                    .map(|(idx, qty, cents)| line(products[*idx], *qty, &from_cents(*cents).to_string()))
                    .collect();

                let service = PurchaseService::new(pool.clone());
                let created = service
                    .create_purchase(purchase(supplier, "2024-06-01", items))
                    .await
                    .unwrap();

                let expected_total: i64 = lines.iter().map(|(_, q, c)| q * c).sum();
                assert_eq!(created.purchase.total_amount, from_cents(expected_total));

                for (i, product) in products.iter().enumerate() {
                    let added: i64 = lines.iter().filter(|(idx, _, _)| *idx == i).map(|(_, q, _)| q).sum();
                    assert_eq!(stock_of(&pool, *product).await, initial[i] + added);
                }

                service.delete_purchase(created.purchase.id).await.unwrap();

                for (i, product) in products.iter().enumerate() {
                    assert_eq!(stock_of(&pool, *product).await, initial[i]);
                }
            });
        }

        /// After any update, stock reflects only the new lines
        #[test]
        fn prop_update_matches_fresh_create(
            before in lines_strategy(),
            after in lines_strategy(),
        ) {
            tokio_test::block_on(async {
                let pool = test_pool().await;
                let supplier = seed_supplier(&pool, "Fournisseur").await;
                let mut products = Vec::new();
                for i in 0..3 {
                    products.push(seed_product(&pool, &format!("Produit {i}"), 0, 5).await);
                }

                let to_items = |lines: &[(usize, i64, i64)]| {
                    lines
                        .iter()
                        .map(|(idx, qty, cents)| line(products[*idx], *qty, &from_cents(*cents).to_string()))
                        .collect::<Vec<_>>()
                };

                let service = PurchaseService::new(pool.clone());
                let created = service
                    .create_purchase(purchase(supplier, "2024-06-01", to_items(&before)))
                    .await
                    .unwrap();
                service
                    .update_purchase(created.purchase.id, purchase(supplier, "2024-06-02", to_items(&after)))
                    .await
                    .unwrap();

                for (i, product) in products.iter().enumerate() {
                    let expected: i64 = after.iter().filter(|(idx, _, _)| *idx == i).map(|(_, q, _)| q).sum();
                    assert_eq!(stock_of(&pool, *product).await, expected);
                }
            });
        }
    }
}
