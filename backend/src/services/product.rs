//! Product service for the salon's stock of consumables and retail goods

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;
use shared::money::from_cents;
use shared::{
    adjustable_range, validate_product, validate_stock_adjustment, ProductCategory, ProductDraft,
    ProductInput, StockAdjustmentInput, StockStatus,
};
use sqlx::{FromRow, SqlitePool};

use crate::error::{AppError, AppResult};
use crate::services::{ensure_unreferenced, record_exists};

/// Product service for catalog and stock management
#[derive(Clone)]
pub struct ProductService {
    db: SqlitePool,
}

/// Product with its supplier name and derived stock status
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub category: ProductCategory,
    pub supplier_id: Option<i64>,
    pub supplier_name: Option<String>,
    pub purchase_price: Decimal,
    pub sale_price: Option<Decimal>,
    pub stock_quantity: i64,
    pub alert_threshold: i64,
    pub unit: String,
    pub notes: Option<String>,
    pub stock_status: StockStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// One entry of the stock adjustment ledger
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StockAdjustment {
    pub id: i64,
    pub product_id: i64,
    pub quantity_delta: i64,
    pub stock_after: i64,
    pub reason: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Row for product queries
#[derive(Debug, FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    category: ProductCategory,
    supplier_id: Option<i64>,
    supplier_name: Option<String>,
    purchase_price_cents: i64,
    sale_price_cents: Option<i64>,
    stock_quantity: i64,
    alert_threshold: i64,
    unit: String,
    notes: Option<String>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            category: row.category,
            supplier_id: row.supplier_id,
            supplier_name: row.supplier_name,
            purchase_price: from_cents(row.purchase_price_cents),
            sale_price: row.sale_price_cents.map(from_cents),
            stock_quantity: row.stock_quantity,
            alert_threshold: row.alert_threshold,
            unit: row.unit,
            notes: row.notes,
            stock_status: StockStatus::classify(row.stock_quantity, row.alert_threshold),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const PRODUCT_SELECT: &str = r#"
    SELECT p.id, p.name, p.category, p.supplier_id, s.name AS supplier_name,
           p.purchase_price_cents, p.sale_price_cents, p.stock_quantity,
           p.alert_threshold, p.unit, p.notes, p.created_at, p.updated_at
    FROM products p
    LEFT JOIN suppliers s ON s.id = p.supplier_id
"#;

impl ProductService {
    /// Create a new ProductService instance
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// List all products, newest first
    pub async fn list_products(&self) -> AppResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "{PRODUCT_SELECT} ORDER BY p.created_at DESC, p.id DESC"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Products at or below their alert threshold, emptiest first
    pub async fn list_low_stock(&self) -> AppResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "{PRODUCT_SELECT} WHERE p.stock_quantity <= p.alert_threshold \
             ORDER BY p.stock_quantity ASC, p.name ASC"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Get a product by ID
    pub async fn get_product(&self, product_id: i64) -> AppResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(&format!("{PRODUCT_SELECT} WHERE p.id = ?"))
            .bind(product_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("Product"))?;

        Ok(row.into())
    }

    /// Create a product
    pub async fn create_product(&self, input: ProductInput) -> AppResult<Product> {
        let draft = validate_product(input)?;
        self.ensure_supplier(&draft).await?;

        let product_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO products (name, category, supplier_id, purchase_price_cents,
                                  sale_price_cents, stock_quantity, alert_threshold, unit, notes)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&draft.name)
        .bind(draft.category)
        .bind(draft.supplier_id)
        .bind(draft.purchase_price_cents)
        .bind(draft.sale_price_cents)
        .bind(draft.stock_quantity)
        .bind(draft.alert_threshold)
        .bind(&draft.unit)
        .bind(&draft.notes)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(product_id, name = %draft.name, "Product created");

        self.get_product(product_id).await
    }

    /// Replace the editable fields of a product
    pub async fn update_product(&self, product_id: i64, input: ProductInput) -> AppResult<Product> {
        if !record_exists(&self.db, "products", product_id).await? {
            return Err(AppError::not_found("Product"));
        }

        let draft = validate_product(input)?;
        self.ensure_supplier(&draft).await?;

        sqlx::query(
            r#"
            UPDATE products
            SET name = ?, category = ?, supplier_id = ?, purchase_price_cents = ?,
                sale_price_cents = ?, stock_quantity = ?, alert_threshold = ?, unit = ?,
                notes = ?, updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            "#,
        )
        .bind(&draft.name)
        .bind(draft.category)
        .bind(draft.supplier_id)
        .bind(draft.purchase_price_cents)
        .bind(draft.sale_price_cents)
        .bind(draft.stock_quantity)
        .bind(draft.alert_threshold)
        .bind(&draft.unit)
        .bind(&draft.notes)
        .bind(product_id)
        .execute(&self.db)
        .await?;

        self.get_product(product_id).await
    }

    /// Delete a product that no purchase refers to
    pub async fn delete_product(&self, product_id: i64) -> AppResult<()> {
        if !record_exists(&self.db, "products", product_id).await? {
            return Err(AppError::not_found("Product"));
        }

        ensure_unreferenced(
            &self.db,
            "Product",
            "purchase_items",
            "product_id",
            product_id,
            "Ce produit figure dans des achats et ne peut pas être supprimé",
        )
        .await?;

        sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(product_id)
            .execute(&self.db)
            .await?;

        tracing::info!(product_id, "Product deleted");

        Ok(())
    }

    /// Apply a signed change to a product's stock and record it in the ledger
    ///
    /// The change and the non-negativity check are one statement, so two
    /// concurrent adjustments can never both pass against the same reading.
    pub async fn adjust_stock(
        &self,
        product_id: i64,
        input: StockAdjustmentInput,
    ) -> AppResult<Product> {
        let adjustment = validate_stock_adjustment(input)?;

        if !record_exists(&self.db, "products", product_id).await? {
            return Err(AppError::not_found("Product"));
        }

        let rejected = || {
            if adjustment.delta < 0 {
                AppError::field("stock", "Stock insuffisant pour cette opération")
            } else {
                AppError::field("stock", "Le stock dépasserait la limite autorisée")
            }
        };
        let range = adjustable_range(adjustment.delta).ok_or_else(rejected)?;

        let mut tx = self.db.begin().await?;

        // The range keeps the result non-negative and inside INTEGER
        let stock_after: i64 = sqlx::query_scalar(
            r#"
            UPDATE products
            SET stock_quantity = stock_quantity + ?, updated_at = CURRENT_TIMESTAMP
            WHERE id = ? AND stock_quantity BETWEEN ? AND ?
            RETURNING stock_quantity
            "#,
        )
        .bind(adjustment.delta)
        .bind(product_id)
        .bind(*range.start())
        .bind(*range.end())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(rejected)?;

        sqlx::query(
            r#"
            INSERT INTO stock_adjustments (product_id, quantity_delta, stock_after, reason)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(product_id)
        .bind(adjustment.delta)
        .bind(stock_after)
        .bind(&adjustment.reason)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            product_id,
            delta = adjustment.delta,
            stock_after,
            reason = adjustment.reason.as_deref().unwrap_or(""),
            "Stock adjusted"
        );

        self.get_product(product_id).await
    }

    /// Ledger of direct stock adjustments for a product, newest first
    pub async fn list_adjustments(&self, product_id: i64) -> AppResult<Vec<StockAdjustment>> {
        if !record_exists(&self.db, "products", product_id).await? {
            return Err(AppError::not_found("Product"));
        }

        let adjustments = sqlx::query_as::<_, StockAdjustment>(
            r#"
            SELECT id, product_id, quantity_delta, stock_after, reason, created_at
            FROM stock_adjustments
            WHERE product_id = ?
            ORDER BY id DESC
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.db)
        .await?;

        Ok(adjustments)
    }

    async fn ensure_supplier(&self, draft: &ProductDraft) -> AppResult<()> {
        if let Some(supplier_id) = draft.supplier_id {
            if !record_exists(&self.db, "suppliers", supplier_id).await? {
                return Err(AppError::not_found("Supplier"));
            }
        }
        Ok(())
    }
}
