//! # Sale Ledger Repository
//!
//! Read access to the append-only sale ledger.
//!
//! ## Append-Only
//! There is deliberately no `insert` here: sale rows are written
//! exclusively by [`crate::committer::SaleCommitter`] inside the batch
//! transaction, and never updated or deleted afterwards. This module
//! is the read side: day listings and the profit summary the tracker
//! shows the shopkeeper.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use khata_core::PaymentMode;

/// A ledger row joined with the product it references.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleWithProduct {
    pub id: String,
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub total_amount_paise: i64,
    pub payment_mode: PaymentMode,
    pub created_at: DateTime<Utc>,
}

/// Aggregated totals for one day of trading.
///
/// Profit uses the product's recorded cost price:
/// `total_amount - cost_price * quantity`, summed per sale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub total_sales_paise: i64,
    pub total_items: i64,
    pub total_profit_paise: i64,
}

/// Repository for sale ledger reads.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Lists all sales for a calendar day (UTC), newest first.
    pub async fn list_for_day(&self, date: NaiveDate) -> DbResult<Vec<SaleWithProduct>> {
        let (start, end) = day_bounds(date);
        debug!(date = %date, "listing sales for day");

        let sales = sqlx::query_as::<_, SaleWithProduct>(
            r#"
            SELECT s.id, s.product_id, p.name AS product_name,
                   s.quantity, s.total_amount_paise, s.payment_mode, s.created_at
            FROM sales s
            JOIN products p ON p.id = s.product_id
            WHERE s.created_at >= ?1 AND s.created_at < ?2
            ORDER BY s.created_at DESC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Computes the day's totals: sales amount, items sold, and profit
    /// against recorded product cost.
    pub async fn daily_summary(&self, date: NaiveDate) -> DbResult<DaySummary> {
        let (start, end) = day_bounds(date);

        let (total_sales, total_items, total_profit): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COALESCE(SUM(s.total_amount_paise), 0),
                COALESCE(SUM(s.quantity), 0),
                COALESCE(SUM(s.total_amount_paise - p.cost_price_paise * s.quantity), 0)
            FROM sales s
            JOIN products p ON p.id = s.product_id
            WHERE s.created_at >= ?1 AND s.created_at < ?2
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(DaySummary {
            total_sales_paise: total_sales,
            total_items,
            total_profit_paise: total_profit,
        })
    }

    /// Counts all ledger rows (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// [start, end) UTC instants covering one calendar day.
fn day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));
    (start, start + Duration::days(1))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use khata_core::{LineItem, NewProduct, SaleBatchRequest};

    async fn seeded_db() -> (Database, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = db
            .products()
            .insert(&NewProduct {
                name: "Maggi Noodles".to_string(),
                category: "Grocery".to_string(),
                cost_price_paise: 900,
                selling_price_paise: 1200,
                stock: 50,
            })
            .await
            .unwrap();
        (db, product.id)
    }

    fn line(product_id: &str, quantity: i64, amount_paise: i64) -> LineItem {
        LineItem {
            product_name_raw: "maggi".to_string(),
            quantity,
            total_amount_paise: amount_paise,
            resolved_product_id: Some(product_id.to_string()),
        }
    }

    #[tokio::test]
    async fn test_list_and_summary_for_today() {
        let (db, product_id) = seeded_db().await;

        let request = SaleBatchRequest {
            items: vec![line(&product_id, 2, 2400), line(&product_id, 1, 1200)],
            payment_mode: PaymentMode::Cash,
            auto_adjust_stock: false,
        };
        db.committer().commit(&request).await.unwrap();

        let today = Utc::now().date_naive();
        let sales = db.sales().list_for_day(today).await.unwrap();
        assert_eq!(sales.len(), 2);
        assert_eq!(sales[0].product_name, "Maggi Noodles");

        let summary = db.sales().daily_summary(today).await.unwrap();
        assert_eq!(summary.total_sales_paise, 3600);
        assert_eq!(summary.total_items, 3);
        // cost 900/unit × 3 units = 2700; profit = 3600 - 2700
        assert_eq!(summary.total_profit_paise, 900);
    }

    #[tokio::test]
    async fn test_empty_day_summary_is_zero() {
        let (db, _) = seeded_db().await;

        let yesterday = Utc::now().date_naive() - Duration::days(1);
        let sales = db.sales().list_for_day(yesterday).await.unwrap();
        assert!(sales.is_empty());

        let summary = db.sales().daily_summary(yesterday).await.unwrap();
        assert_eq!(summary.total_sales_paise, 0);
        assert_eq!(summary.total_items, 0);
    }
}
