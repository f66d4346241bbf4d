//! Dashboard statistics built from paid and unpaid invoices

use rust_decimal::Decimal;
use serde::Serialize;
use shared::money::from_cents;
use sqlx::SqlitePool;

use crate::error::AppResult;

#[derive(Clone)]
pub struct StatsService {
    db: SqlitePool,
}

/// Headline figures for the dashboard
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub clients: i64,
    pub appointments: i64,
    /// Sum of paid invoices
    pub revenue: Decimal,
    /// Sum of unpaid invoices
    pub outstanding: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct DailyRevenue {
    /// `YYYY-MM-DD`
    pub day: String,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyRevenue {
    /// `YYYY-MM`
    pub month: String,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub summary: DashboardSummary,
    /// Last 30 days with paid invoices, newest first
    pub daily: Vec<DailyRevenue>,
    /// Last 12 months with paid invoices, newest first
    pub monthly: Vec<MonthlyRevenue>,
}

impl StatsService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Everything the dashboard shows, in one call
    pub async fn dashboard(&self) -> AppResult<DashboardStats> {
        Ok(DashboardStats {
            summary: self.summary().await?,
            daily: self.revenue_by_day().await?,
            monthly: self.revenue_by_month().await?,
        })
    }

    pub async fn summary(&self) -> AppResult<DashboardSummary> {
        let (clients, appointments, revenue, outstanding) =
            sqlx::query_as::<_, (i64, i64, i64, i64)>(
                r#"
                SELECT
                    (SELECT COUNT(*) FROM clients),
                    (SELECT COUNT(*) FROM appointments),
                    (SELECT COALESCE(SUM(total_cents), 0) FROM invoices WHERE status = 'paid'),
                    (SELECT COALESCE(SUM(total_cents), 0) FROM invoices WHERE status = 'unpaid')
                "#,
            )
            .fetch_one(&self.db)
            .await?;

        Ok(DashboardSummary {
            clients,
            appointments,
            revenue: from_cents(revenue),
            outstanding: from_cents(outstanding),
        })
    }

    pub async fn revenue_by_day(&self) -> AppResult<Vec<DailyRevenue>> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT date(issued_at) AS day, COALESCE(SUM(total_cents), 0) AS revenue
            FROM invoices
            WHERE status = 'paid'
            GROUP BY day
            ORDER BY day DESC
            LIMIT 30
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(day, revenue)| DailyRevenue {
                day,
                revenue: from_cents(revenue),
            })
            .collect())
    }

    pub async fn revenue_by_month(&self) -> AppResult<Vec<MonthlyRevenue>> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT strftime('%Y-%m', issued_at) AS month, COALESCE(SUM(total_cents), 0) AS revenue
            FROM invoices
            WHERE status = 'paid'
            GROUP BY month
            ORDER BY month DESC
            LIMIT 12
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(month, revenue)| MonthlyRevenue {
                month,
                revenue: from_cents(revenue),
            })
            .collect())
    }
}
