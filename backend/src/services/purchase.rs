//! Purchase service: supplier purchases and their effect on product stock
//!
//! Every write here runs in one transaction. Creating a purchase adds each
//! line's quantity to its product; deleting it takes the quantities back out.
//! Updating is "reverse then reapply": the old lines' stock effect is undone
//! and the lines deleted before the new lines are written and applied, so the
//! old and new item lists are never diffed.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::money::from_cents;
use shared::{validate_purchase, PaymentMethod, PurchaseDraft, PurchaseInput, PurchaseLine};
use sqlx::{FromRow, SqliteConnection, SqlitePool};

use crate::error::{AppError, AppResult};
use crate::services::record_exists;

/// Purchase service for recording supplier purchases
#[derive(Clone)]
pub struct PurchaseService {
    db: SqlitePool,
}

/// Purchase header
#[derive(Debug, Clone, Serialize)]
pub struct Purchase {
    pub id: i64,
    pub supplier_id: i64,
    pub supplier_name: Option<String>,
    pub purchase_date: NaiveDate,
    pub total_amount: Decimal,
    pub payment_method: PaymentMethod,
    pub invoice_reference: Option<String>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Purchase line, with the product's name and unit for display
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseItem {
    pub id: i64,
    pub purchase_id: i64,
    pub product_id: i64,
    pub product_name: Option<String>,
    pub product_unit: Option<String>,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

/// Purchase with its lines
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseWithItems {
    #[serde(flatten)]
    pub purchase: Purchase,
    pub items: Vec<PurchaseItem>,
}

/// Purchase as shown in listings
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseSummary {
    #[serde(flatten)]
    pub purchase: Purchase,
    pub items_count: i64,
}

/// Purchase spending for one month
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyPurchases {
    /// `YYYY-MM`
    pub month: String,
    pub purchases_count: i64,
    pub monthly_spent: Decimal,
}

/// Spending with one supplier
#[derive(Debug, Clone, Serialize)]
pub struct SupplierSpending {
    pub supplier_id: i64,
    pub supplier_name: Option<String>,
    pub purchases_count: i64,
    pub total_spent: Decimal,
}

/// Aggregated purchase statistics
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseStats {
    pub total_purchases: i64,
    pub total_spent: Decimal,
    /// Last 12 months, newest first
    pub monthly: Vec<MonthlyPurchases>,
    /// Five biggest suppliers by amount spent
    pub top_suppliers: Vec<SupplierSpending>,
}

/// Row for purchase queries
#[derive(Debug, FromRow)]
struct PurchaseRow {
    id: i64,
    supplier_id: i64,
    supplier_name: Option<String>,
    purchase_date: NaiveDate,
    total_amount_cents: i64,
    payment_method: PaymentMethod,
    invoice_reference: Option<String>,
    notes: Option<String>,
    created_at: NaiveDateTime,
}

impl From<PurchaseRow> for Purchase {
    fn from(row: PurchaseRow) -> Self {
        Self {
            id: row.id,
            supplier_id: row.supplier_id,
            supplier_name: row.supplier_name,
            purchase_date: row.purchase_date,
            total_amount: from_cents(row.total_amount_cents),
            payment_method: row.payment_method,
            invoice_reference: row.invoice_reference,
            notes: row.notes,
            created_at: row.created_at,
        }
    }
}

/// Row for listing queries
#[derive(Debug, FromRow)]
struct PurchaseSummaryRow {
    #[sqlx(flatten)]
    purchase: PurchaseRow,
    items_count: i64,
}

/// Row for purchase line queries
#[derive(Debug, FromRow)]
struct PurchaseItemRow {
    id: i64,
    purchase_id: i64,
    product_id: i64,
    product_name: Option<String>,
    product_unit: Option<String>,
    quantity: i64,
    unit_price_cents: i64,
    subtotal_cents: i64,
}

impl From<PurchaseItemRow> for PurchaseItem {
    fn from(row: PurchaseItemRow) -> Self {
        Self {
            id: row.id,
            purchase_id: row.purchase_id,
            product_id: row.product_id,
            product_name: row.product_name,
            product_unit: row.product_unit,
            quantity: row.quantity,
            unit_price: from_cents(row.unit_price_cents),
            subtotal: from_cents(row.subtotal_cents),
        }
    }
}

const PURCHASE_SELECT: &str = r#"
    SELECT p.id, p.supplier_id, s.name AS supplier_name, p.purchase_date,
           p.total_amount_cents, p.payment_method, p.invoice_reference, p.notes, p.created_at
    FROM purchases p
    LEFT JOIN suppliers s ON s.id = p.supplier_id
"#;

const PURCHASE_SUMMARY_SELECT: &str = r#"
    SELECT p.id, p.supplier_id, s.name AS supplier_name, p.purchase_date,
           p.total_amount_cents, p.payment_method, p.invoice_reference, p.notes, p.created_at,
           (SELECT COUNT(*) FROM purchase_items pi WHERE pi.purchase_id = p.id) AS items_count
    FROM purchases p
    LEFT JOIN suppliers s ON s.id = p.supplier_id
"#;

impl PurchaseService {
    /// Create a new PurchaseService instance
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// List all purchases, most recent first
    pub async fn list_purchases(&self) -> AppResult<Vec<PurchaseSummary>> {
        let rows = sqlx::query_as::<_, PurchaseSummaryRow>(&format!(
            "{PURCHASE_SUMMARY_SELECT} ORDER BY p.purchase_date DESC, p.created_at DESC, p.id DESC"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Self::summary_from_row).collect())
    }

    /// List the purchases made from one supplier, most recent first
    pub async fn list_by_supplier(&self, supplier_id: i64) -> AppResult<Vec<PurchaseSummary>> {
        if !record_exists(&self.db, "suppliers", supplier_id).await? {
            return Err(AppError::not_found("Supplier"));
        }

        let rows = sqlx::query_as::<_, PurchaseSummaryRow>(&format!(
            "{PURCHASE_SUMMARY_SELECT} WHERE p.supplier_id = ? \
             ORDER BY p.purchase_date DESC, p.created_at DESC, p.id DESC"
        ))
        .bind(supplier_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Self::summary_from_row).collect())
    }

    /// Get a purchase with its lines
    pub async fn get_purchase(&self, purchase_id: i64) -> AppResult<PurchaseWithItems> {
        let row = sqlx::query_as::<_, PurchaseRow>(&format!("{PURCHASE_SELECT} WHERE p.id = ?"))
            .bind(purchase_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("Purchase"))?;

        let items = sqlx::query_as::<_, PurchaseItemRow>(
            r#"
            SELECT pi.id, pi.purchase_id, pi.product_id, pr.name AS product_name,
                   pr.unit AS product_unit, pi.quantity, pi.unit_price_cents, pi.subtotal_cents
            FROM purchase_items pi
            LEFT JOIN products pr ON pr.id = pi.product_id
            WHERE pi.purchase_id = ?
            ORDER BY pi.id
            "#,
        )
        .bind(purchase_id)
        .fetch_all(&self.db)
        .await?;

        Ok(PurchaseWithItems {
            purchase: row.into(),
            items: items.into_iter().map(PurchaseItem::from).collect(),
        })
    }

    /// Record a purchase and add its quantities to product stock
    pub async fn create_purchase(&self, input: PurchaseInput) -> AppResult<PurchaseWithItems> {
        let draft = validate_purchase(input)?;
        self.ensure_references(&draft).await?;

        let total_cents = draft.total_cents();

        let mut tx = self.db.begin().await?;

        let purchase_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO purchases (supplier_id, purchase_date, total_amount_cents,
                                   payment_method, invoice_reference, notes)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(draft.supplier_id)
        .bind(draft.purchase_date)
        .bind(total_cents)
        .bind(draft.payment_method)
        .bind(&draft.invoice_reference)
        .bind(&draft.notes)
        .fetch_one(&mut *tx)
        .await?;

        Self::apply_lines(&mut tx, purchase_id, &draft.items).await?;

        tx.commit().await?;

        tracing::info!(
            purchase_id,
            supplier_id = draft.supplier_id,
            lines = draft.items.len(),
            total = %from_cents(total_cents),
            "Purchase recorded"
        );

        self.get_purchase(purchase_id).await
    }

    /// Replace a purchase's header and lines, moving stock accordingly
    pub async fn update_purchase(
        &self,
        purchase_id: i64,
        input: PurchaseInput,
    ) -> AppResult<PurchaseWithItems> {
        if !record_exists(&self.db, "purchases", purchase_id).await? {
            return Err(AppError::not_found("Purchase"));
        }

        let draft = validate_purchase(input)?;
        self.ensure_references(&draft).await?;

        let total_cents = draft.total_cents();

        let mut tx = self.db.begin().await?;

        // Undo the stock effect of the current lines, then drop them
        Self::revert_lines(&mut tx, purchase_id).await?;

        sqlx::query("DELETE FROM purchase_items WHERE purchase_id = ?")
            .bind(purchase_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            UPDATE purchases
            SET supplier_id = ?, purchase_date = ?, total_amount_cents = ?,
                payment_method = ?, invoice_reference = ?, notes = ?
            WHERE id = ?
            "#,
        )
        .bind(draft.supplier_id)
        .bind(draft.purchase_date)
        .bind(total_cents)
        .bind(draft.payment_method)
        .bind(&draft.invoice_reference)
        .bind(&draft.notes)
        .bind(purchase_id)
        .execute(&mut *tx)
        .await?;

        Self::apply_lines(&mut tx, purchase_id, &draft.items).await?;

        tx.commit().await?;

        tracing::info!(
            purchase_id,
            lines = draft.items.len(),
            total = %from_cents(total_cents),
            "Purchase updated"
        );

        self.get_purchase(purchase_id).await
    }

    /// Delete a purchase and take its quantities back out of stock
    pub async fn delete_purchase(&self, purchase_id: i64) -> AppResult<()> {
        if !record_exists(&self.db, "purchases", purchase_id).await? {
            return Err(AppError::not_found("Purchase"));
        }

        let mut tx = self.db.begin().await?;

        Self::revert_lines(&mut tx, purchase_id).await?;

        // Lines go with the purchase (ON DELETE CASCADE)
        sqlx::query("DELETE FROM purchases WHERE id = ?")
            .bind(purchase_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(purchase_id, "Purchase deleted");

        Ok(())
    }

    /// Purchase totals, monthly spending and top suppliers
    pub async fn get_stats(&self) -> AppResult<PurchaseStats> {
        let (total_purchases, total_spent_cents) = sqlx::query_as::<_, (i64, i64)>(
            "SELECT COUNT(*), COALESCE(SUM(total_amount_cents), 0) FROM purchases",
        )
        .fetch_one(&self.db)
        .await?;

        let monthly = sqlx::query_as::<_, (String, i64, i64)>(
            r#"
            SELECT strftime('%Y-%m', purchase_date) AS month,
                   COUNT(*) AS purchases_count,
                   COALESCE(SUM(total_amount_cents), 0) AS monthly_spent
            FROM purchases
            WHERE purchase_date >= date('now', '-12 months')
            GROUP BY month
            ORDER BY month DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let top_suppliers = sqlx::query_as::<_, (i64, Option<String>, i64, i64)>(
            r#"
            SELECT p.supplier_id, s.name AS supplier_name,
                   COUNT(p.id) AS purchases_count,
                   COALESCE(SUM(p.total_amount_cents), 0) AS total_spent
            FROM purchases p
            LEFT JOIN suppliers s ON s.id = p.supplier_id
            GROUP BY p.supplier_id
            ORDER BY total_spent DESC, p.supplier_id
            LIMIT 5
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(PurchaseStats {
            total_purchases,
            total_spent: from_cents(total_spent_cents),
            monthly: monthly
                .into_iter()
                .map(|(month, purchases_count, spent)| MonthlyPurchases {
                    month,
                    purchases_count,
                    monthly_spent: from_cents(spent),
                })
                .collect(),
            top_suppliers: top_suppliers
                .into_iter()
                .map(|(supplier_id, supplier_name, purchases_count, spent)| SupplierSpending {
                    supplier_id,
                    supplier_name,
                    purchases_count,
                    total_spent: from_cents(spent),
                })
                .collect(),
        })
    }

    /// Check the supplier and every product exist before opening a transaction
    async fn ensure_references(&self, draft: &PurchaseDraft) -> AppResult<()> {
        if !record_exists(&self.db, "suppliers", draft.supplier_id).await? {
            return Err(AppError::not_found("Supplier"));
        }

        for product_id in draft.product_ids() {
            if !record_exists(&self.db, "products", product_id).await? {
                return Err(AppError::not_found("Product"));
            }
        }

        Ok(())
    }

    /// Insert the lines of a purchase and add their quantities to stock
    async fn apply_lines(
        conn: &mut SqliteConnection,
        purchase_id: i64,
        lines: &[PurchaseLine],
    ) -> AppResult<()> {
        for line in lines {
            sqlx::query(
                r#"
                INSERT INTO purchase_items (purchase_id, product_id, quantity,
                                            unit_price_cents, subtotal_cents)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(purchase_id)
            .bind(line.product_id)
            .bind(line.quantity)
            .bind(line.unit_price_cents)
            .bind(line.subtotal_cents())
            .execute(&mut *conn)
            .await?;

            // Quantities are positive, so the bound cannot underflow
            let result = sqlx::query(
                r#"
                UPDATE products
                SET stock_quantity = stock_quantity + ?, updated_at = CURRENT_TIMESTAMP
                WHERE id = ? AND stock_quantity <= ?
                "#,
            )
            .bind(line.quantity)
            .bind(line.product_id)
            .bind(i64::MAX - line.quantity)
            .execute(&mut *conn)
            .await?;

            // Either error drops the caller's transaction, which rolls back
            if result.rows_affected() == 0 {
                return Err(Self::stock_unchanged(conn, line.product_id).await?);
            }
        }

        Ok(())
    }

    /// Subtract the quantities of a purchase's current lines from stock
    async fn revert_lines(conn: &mut SqliteConnection, purchase_id: i64) -> AppResult<()> {
        let lines = sqlx::query_as::<_, (i64, i64)>(
            "SELECT product_id, quantity FROM purchase_items WHERE purchase_id = ? ORDER BY id",
        )
        .bind(purchase_id)
        .fetch_all(&mut *conn)
        .await?;

        for (product_id, quantity) in lines {
            let result = sqlx::query(
                r#"
                UPDATE products
                SET stock_quantity = stock_quantity - ?, updated_at = CURRENT_TIMESTAMP
                WHERE id = ? AND stock_quantity >= ?
                "#,
            )
            .bind(quantity)
            .bind(product_id)
            .bind(i64::MIN + quantity)
            .execute(&mut *conn)
            .await?;

            if result.rows_affected() == 0 {
                return Err(Self::stock_unchanged(conn, product_id).await?);
            }
        }

        Ok(())
    }

    /// Explain why a guarded stock update matched no row
    async fn stock_unchanged(conn: &mut SqliteConnection, product_id: i64) -> AppResult<AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM products WHERE id = ?)")
            .bind(product_id)
            .fetch_one(&mut *conn)
            .await?;

        Ok(if exists {
            AppError::field("items", "Le stock de ce produit dépasserait la limite autorisée")
        } else {
            AppError::not_found("Product")
        })
    }

    fn summary_from_row(row: PurchaseSummaryRow) -> PurchaseSummary {
        PurchaseSummary {
            purchase: row.purchase.into(),
            items_count: row.items_count,
        }
    }
}
