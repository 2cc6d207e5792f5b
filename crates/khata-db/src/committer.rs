//! # Sale Committer
//!
//! Executes one sale batch as a single atomic unit of work: conditionally
//! creates ad-hoc products, applies stock reconciliation, writes ledger
//! rows, decrements stock, and clamps any resulting negative stock to
//! zero.
//!
//! ## Commit Procedure
//! ```text
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  commit(request)                                                  │
//! │                                                                   │
//! │  validation gate (no storage touched)                             │
//! │    ├── empty batch / bad quantity ──► InvalidInput                │
//! │    └── any line amount ≤ 0 ─────────► InvalidPrice                │
//! │                                                                   │
//! │  BEGIN TRANSACTION                                                │
//! │    stock scan (authoritative, in-tx reads)                        │
//! │    └── shortfalls and no auto-adjust ──► StockConflict, ROLLBACK  │
//! │                                                                   │
//! │    per line item, in order:                                       │
//! │      1. unmatched ──► create ad-hoc product                       │
//! │      2. auto-adjust: raise stock to the requested quantity        │
//! │      3. insert Sale row                                           │
//! │      4. decrement stock                                           │
//! │      5. clamp negative stock to zero (backstop)                   │
//! │                                                                   │
//! │  COMMIT ── any failure anywhere ──► CommitFailed, ROLLBACK        │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why the stock reads happen in here
//! Matching and pricing run over a catalog snapshot taken whenever the
//! draft was built; that snapshot may be minutes old. The decrement must
//! be computed against current stock, so the committer re-reads every
//! touched product inside its own transaction and re-raises the
//! conflict if the snapshot went stale. The pure
//! [`khata_core::reconcile`] pass is advisory UX; this one is binding.
//!
//! The step-5 clamp is an invariant-restoring backstop (e.g. two lines
//! of one batch over-drawing the same product), not the concurrency
//! control - that is the transaction's job.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{SqliteConnection, SqlitePool};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use khata_core::validation::validate_quantity;
use khata_core::{
    LineItem, PaymentMode, SaleBatchRequest, StockShortfall, DEFAULT_CATEGORY,
    DEFAULT_COST_MARGIN_BPS, FALLBACK_PRODUCT_NAME,
};

// =============================================================================
// Result & Error Types
// =============================================================================

/// Successful commit of a whole batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitReceipt {
    /// Number of sales committed. Always equals the number of submitted
    /// line items - there are no partial batches.
    pub committed: usize,
}

/// The client-facing failure taxonomy for a batch submission.
///
/// `InvalidInput` and `InvalidPrice` are detected before the
/// transaction opens and never touch storage. `StockConflict` is not a
/// hard failure: the caller resolves it by aborting or resubmitting
/// with `auto_adjust_stock = true`. Everything that goes wrong inside
/// the transaction is normalized to a single `CommitFailed` for the
/// whole batch - never a partial list of per-item results.
#[derive(Debug, Error)]
pub enum CommitError {
    /// Malformed batch: no items, or a line with a non-positive
    /// quantity.
    #[error("invalid batch: {0}")]
    InvalidInput(String),

    /// A line resolved to a zero/absent price. The caller must supply
    /// a price and resubmit.
    #[error("line {line_index} ({product_name:?}) has no price")]
    InvalidPrice {
        line_index: usize,
        product_name: String,
    },

    /// Requested quantities exceed available stock and the caller did
    /// not authorize auto-adjustment. Nothing was mutated.
    #[error("stock conflict: {} line(s) exceed available stock", .conflicts.len())]
    StockConflict { conflicts: Vec<StockShortfall> },

    /// The transaction failed; the whole batch rolled back. Retry
    /// wholesale - this crate performs no automatic retry.
    #[error("commit failed: {0}")]
    CommitFailed(#[from] DbError),
}

// =============================================================================
// Sale Committer
// =============================================================================

/// Commits sale batches atomically against the catalog and the ledger.
#[derive(Debug, Clone)]
pub struct SaleCommitter {
    pool: SqlitePool,
}

impl SaleCommitter {
    /// Creates a new SaleCommitter.
    pub fn new(pool: SqlitePool) -> Self {
        SaleCommitter { pool }
    }

    /// Commits a batch: N sales and N stock mutations, or nothing.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let request = draft.into_request(PaymentMode::Cash, false);
    /// match db.committer().commit(&request).await {
    ///     Ok(receipt) => println!("saved {} sales", receipt.committed),
    ///     Err(CommitError::StockConflict { conflicts }) => {
    ///         // offer abort / auto-adjust to the caller
    ///     }
    ///     Err(e) => return Err(e.into()),
    /// }
    /// ```
    pub async fn commit(&self, request: &SaleBatchRequest) -> Result<CommitReceipt, CommitError> {
        // -------------------------------------------------------------
        // Validation gate: storage is untouched past this comment only
        // if every check passes.
        // -------------------------------------------------------------
        if request.items.is_empty() {
            return Err(CommitError::InvalidInput("batch has no items".to_string()));
        }

        for (line_index, item) in request.items.iter().enumerate() {
            if validate_quantity(item.quantity).is_err() {
                return Err(CommitError::InvalidInput(format!(
                    "line {} has invalid quantity {}",
                    line_index, item.quantity
                )));
            }
            if item.total_amount_paise <= 0 {
                return Err(CommitError::InvalidPrice {
                    line_index,
                    product_name: item.product_name_raw.clone(),
                });
            }
        }

        debug!(
            items = request.items.len(),
            auto_adjust = request.auto_adjust_stock,
            "committing sale batch"
        );

        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        // Authoritative stock scan. Only binding when the caller has
        // not authorized adjustment; with auto-adjust the mutation pass
        // raises stock per line instead.
        if !request.auto_adjust_stock {
            let conflicts = scan_shortfalls(&mut tx, &request.items).await?;
            if !conflicts.is_empty() {
                warn!(conflicts = conflicts.len(), "stock conflict, batch aborted");
                // Dropping the transaction rolls it back; nothing was
                // written anyway.
                return Err(CommitError::StockConflict { conflicts });
            }
        }

        let committed = apply_batch(&mut tx, request).await?;

        tx.commit().await.map_err(DbError::from)?;

        info!(
            committed,
            payment_mode = ?request.payment_mode,
            "sale batch committed"
        );

        Ok(CommitReceipt { committed })
    }
}

// =============================================================================
// In-Transaction Steps
// =============================================================================

/// Reads current stock for every resolved line and reports shortfalls.
async fn scan_shortfalls(
    tx: &mut SqliteConnection,
    items: &[LineItem],
) -> DbResult<Vec<StockShortfall>> {
    let mut conflicts = Vec::new();

    for (line_index, item) in items.iter().enumerate() {
        let Some(product_id) = item.resolved_product_id.as_deref() else {
            // Unmatched lines get an ad-hoc product with stock equal to
            // the requested quantity; nothing to conflict with.
            continue;
        };

        let row: Option<(String, i64)> =
            sqlx::query_as("SELECT name, stock FROM products WHERE id = ?1")
                .bind(product_id)
                .fetch_optional(&mut *tx)
                .await?;

        let (name, stock) = row.ok_or_else(|| DbError::not_found("Product", product_id))?;

        if stock < item.quantity {
            conflicts.push(StockShortfall {
                line_index,
                product_id: product_id.to_string(),
                product_name: name,
                available: stock,
                requested: item.quantity,
            });
        }
    }

    Ok(conflicts)
}

/// Runs steps 1-5 for every line, in submission order, on one
/// transaction. Any error unwinds the whole batch.
async fn apply_batch(tx: &mut SqliteConnection, request: &SaleBatchRequest) -> DbResult<usize> {
    let now = Utc::now();

    for item in &request.items {
        // Step 1: create an ad-hoc product for unmatched lines.
        let product_id = match item.resolved_product_id.as_deref() {
            Some(id) => {
                // Step 2: raise under-sized stock when authorized.
                if request.auto_adjust_stock {
                    raise_stock_to(tx, id, item.quantity).await?;
                }
                id.to_string()
            }
            None => create_adhoc_product(tx, item).await?,
        };

        // Step 3: append the ledger row.
        insert_sale(tx, &product_id, item, request.payment_mode, now).await?;

        // Step 4: decrement stock.
        let result = sqlx::query(
            "UPDATE products SET stock = stock - ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(&product_id)
        .bind(item.quantity)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product_id));
        }

        // Step 5: clamp. Restores the non-negative invariant if this
        // batch over-drew the product (e.g. two lines, one stock pool).
        sqlx::query("UPDATE products SET stock = 0 WHERE id = ?1 AND stock < 0")
            .bind(&product_id)
            .execute(&mut *tx)
            .await?;
    }

    Ok(request.items.len())
}

/// Inserts a catalog product for a line that matched nothing.
///
/// Cost is assumed at [`DEFAULT_COST_MARGIN_BPS`] of the unit price;
/// stock starts at the requested quantity so the decrement lands it at
/// exactly zero. A blank raw name gets [`FALLBACK_PRODUCT_NAME`]
/// rather than an unnamed catalog row.
async fn create_adhoc_product(tx: &mut SqliteConnection, item: &LineItem) -> DbResult<String> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now();
    let unit_price = item.unit_price();
    let cost_price = unit_price.apply_bps(DEFAULT_COST_MARGIN_BPS);

    let name = match item.product_name_raw.trim() {
        "" => FALLBACK_PRODUCT_NAME,
        trimmed => trimmed,
    };

    debug!(name = %name, "creating ad-hoc product");

    sqlx::query(
        r#"
        INSERT INTO products (
            id, name, category, cost_price_paise, selling_price_paise,
            stock, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
    )
    .bind(&id)
    .bind(name)
    .bind(DEFAULT_CATEGORY)
    .bind(cost_price.paise())
    .bind(unit_price.paise())
    .bind(item.quantity)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    Ok(id)
}

/// Raises stock to exactly the requested quantity when currently below
/// it. A no-op for adequately stocked products.
async fn raise_stock_to(tx: &mut SqliteConnection, product_id: &str, quantity: i64) -> DbResult<()> {
    let now = Utc::now();

    sqlx::query(
        "UPDATE products SET stock = ?2, updated_at = ?3 WHERE id = ?1 AND stock < ?2",
    )
    .bind(product_id)
    .bind(quantity)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    Ok(())
}

/// Appends one immutable ledger row.
async fn insert_sale(
    tx: &mut SqliteConnection,
    product_id: &str,
    item: &LineItem,
    payment_mode: PaymentMode,
    now: chrono::DateTime<Utc>,
) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO sales (id, product_id, quantity, total_amount_paise, payment_mode, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(product_id)
    .bind(item.quantity)
    .bind(item.total_amount_paise)
    .bind(payment_mode)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use khata_core::{reconcile, CandidateItem, NewProduct, SaleDraft};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_product(db: &Database, name: &str, selling_paise: i64, stock: i64) -> String {
        db.products()
            .insert(&NewProduct {
                name: name.to_string(),
                category: "Grocery".to_string(),
                cost_price_paise: selling_paise * 7 / 10,
                selling_price_paise: selling_paise,
                stock,
            })
            .await
            .unwrap()
            .id
    }

    fn matched_line(product_id: &str, quantity: i64, amount_paise: i64) -> LineItem {
        LineItem {
            product_name_raw: "item".to_string(),
            quantity,
            total_amount_paise: amount_paise,
            resolved_product_id: Some(product_id.to_string()),
        }
    }

    fn unmatched_line(name: &str, quantity: i64, amount_paise: i64) -> LineItem {
        LineItem {
            product_name_raw: name.to_string(),
            quantity,
            total_amount_paise: amount_paise,
            resolved_product_id: None,
        }
    }

    fn request(items: Vec<LineItem>, auto_adjust: bool) -> SaleBatchRequest {
        SaleBatchRequest {
            items,
            payment_mode: PaymentMode::Cash,
            auto_adjust_stock: auto_adjust,
        }
    }

    #[tokio::test]
    async fn test_happy_path_commits_all_and_decrements() {
        let db = test_db().await;
        let maggi = seed_product(&db, "Maggi Noodles", 1200, 10).await;
        let parle = seed_product(&db, "Parle-G", 500, 20).await;

        let receipt = db
            .committer()
            .commit(&request(
                vec![matched_line(&maggi, 3, 3600), matched_line(&parle, 5, 2500)],
                false,
            ))
            .await
            .unwrap();

        assert_eq!(receipt.committed, 2);
        assert_eq!(db.sales().count().await.unwrap(), 2);

        let maggi_after = db.products().get_by_id(&maggi).await.unwrap().unwrap();
        let parle_after = db.products().get_by_id(&parle).await.unwrap().unwrap();
        assert_eq!(maggi_after.stock, 7);
        assert_eq!(parle_after.stock, 15);
    }

    #[tokio::test]
    async fn test_empty_batch_is_invalid_input() {
        let db = test_db().await;
        let err = db.committer().commit(&request(vec![], false)).await.unwrap_err();
        assert!(matches!(err, CommitError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_nonpositive_quantity_is_invalid_input() {
        let db = test_db().await;
        let id = seed_product(&db, "Maggi Noodles", 1200, 10).await;

        let err = db
            .committer()
            .commit(&request(vec![matched_line(&id, 0, 1200)], false))
            .await
            .unwrap_err();

        assert!(matches!(err, CommitError::InvalidInput(_)));
        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_zero_price_rejected_before_any_mutation() {
        let db = test_db().await;
        let id = seed_product(&db, "Maggi Noodles", 1200, 10).await;

        let err = db
            .committer()
            .commit(&request(
                vec![matched_line(&id, 1, 1200), unmatched_line("Colgate", 1, 0)],
                false,
            ))
            .await
            .unwrap_err();

        match err {
            CommitError::InvalidPrice {
                line_index,
                product_name,
            } => {
                assert_eq!(line_index, 1);
                assert_eq!(product_name, "Colgate");
            }
            other => panic!("expected InvalidPrice, got {other:?}"),
        }

        // The valid first line must not have been applied either.
        assert_eq!(db.sales().count().await.unwrap(), 0);
        let product = db.products().get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(product.stock, 10);
    }

    #[tokio::test]
    async fn test_stock_conflict_then_auto_adjust_resubmission() {
        let db = test_db().await;
        // Catalog "Maggi" with stock 3, batch wants 5 for ₹60.
        let id = seed_product(&db, "Maggi", 1200, 3).await;
        let items = vec![matched_line(&id, 5, 6000)];

        let err = db
            .committer()
            .commit(&request(items.clone(), false))
            .await
            .unwrap_err();

        match err {
            CommitError::StockConflict { conflicts } => {
                assert_eq!(conflicts.len(), 1);
                assert_eq!(conflicts[0].available, 3);
                assert_eq!(conflicts[0].requested, 5);
                assert_eq!(conflicts[0].product_name, "Maggi");
            }
            other => panic!("expected StockConflict, got {other:?}"),
        }

        // No mutation on conflict.
        assert_eq!(db.sales().count().await.unwrap(), 0);
        assert_eq!(db.products().get_by_id(&id).await.unwrap().unwrap().stock, 3);

        // Resubmit with auto-adjust: stock raised to 5, then down to 0.
        let receipt = db.committer().commit(&request(items, true)).await.unwrap();
        assert_eq!(receipt.committed, 1);
        assert_eq!(db.products().get_by_id(&id).await.unwrap().unwrap().stock, 0);

        let today = Utc::now().date_naive();
        let sales = db.sales().list_for_day(today).await.unwrap();
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].quantity, 5);
        assert_eq!(sales[0].total_amount_paise, 6000);
    }

    #[tokio::test]
    async fn test_auto_adjust_is_noop_for_sufficient_stock() {
        let db = test_db().await;
        let id = seed_product(&db, "Parle-G", 500, 10).await;

        db.committer()
            .commit(&request(vec![matched_line(&id, 2, 1000)], true))
            .await
            .unwrap();

        // 10 - 2, not raised to 2 first.
        assert_eq!(db.products().get_by_id(&id).await.unwrap().unwrap().stock, 8);
    }

    #[tokio::test]
    async fn test_adhoc_product_created_with_margin_and_zero_net_stock() {
        let db = test_db().await;

        // ₹40 for 2 units of an unknown item.
        let receipt = db
            .committer()
            .commit(&request(vec![unmatched_line("New Item", 2, 4000)], false))
            .await
            .unwrap();
        assert_eq!(receipt.committed, 1);

        let catalog = db.products().list().await.unwrap();
        assert_eq!(catalog.len(), 1);
        let created = &catalog[0];

        assert_eq!(created.name, "New Item");
        assert_eq!(created.category, DEFAULT_CATEGORY);
        // Unit price ₹20; cost at 70% = ₹14.
        assert_eq!(created.selling_price_paise, 2000);
        assert_eq!(created.cost_price_paise, 1400);
        // Stock seeded at the sold quantity, so the decrement lands at 0.
        assert_eq!(created.stock, 0);

        let today = Utc::now().date_naive();
        let sales = db.sales().list_for_day(today).await.unwrap();
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].product_id, created.id);
    }

    #[tokio::test]
    async fn test_blank_name_adhoc_gets_fallback_name() {
        let db = test_db().await;

        // A whitespace-only name matches nothing and must not produce
        // an unnamed catalog row.
        let receipt = db
            .committer()
            .commit(&request(vec![unmatched_line("   ", 1, 1000)], false))
            .await
            .unwrap();
        assert_eq!(receipt.committed, 1);

        let catalog = db.products().list().await.unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].name, FALLBACK_PRODUCT_NAME);
    }

    #[tokio::test]
    async fn test_rollback_leaves_nothing_behind() {
        let db = test_db().await;
        let id = seed_product(&db, "Maggi Noodles", 1200, 10).await;

        // Second line references a product that does not exist; the
        // transaction must unwind the already-applied first line too.
        let err = db
            .committer()
            .commit(&request(
                vec![
                    matched_line(&id, 2, 2400),
                    matched_line("no-such-product", 1, 500),
                ],
                true,
            ))
            .await
            .unwrap_err();

        assert!(matches!(err, CommitError::CommitFailed(_)));
        assert_eq!(db.sales().count().await.unwrap(), 0);
        assert_eq!(db.products().get_by_id(&id).await.unwrap().unwrap().stock, 10);
    }

    #[tokio::test]
    async fn test_clamp_restores_nonnegative_stock() {
        let db = test_db().await;
        // Two lines draw 3 + 3 from a pool of 4. Each line individually
        // passes the scan, the batch over-draws, the clamp fixes it.
        let id = seed_product(&db, "Amul Milk", 600, 4).await;

        let receipt = db
            .committer()
            .commit(&request(
                vec![matched_line(&id, 3, 1800), matched_line(&id, 3, 1800)],
                false,
            ))
            .await
            .unwrap();

        assert_eq!(receipt.committed, 2);
        let stock = db.products().get_by_id(&id).await.unwrap().unwrap().stock;
        assert_eq!(stock, 0, "clamp must land on exactly zero, never negative");
    }

    #[tokio::test]
    async fn test_end_to_end_draft_reconcile_commit() {
        let db = test_db().await;
        seed_product(&db, "Maggi", 1200, 3).await;

        let catalog = db.products().list().await.unwrap();
        let candidates = vec![CandidateItem {
            product_id: None,
            product_name: "maggi".to_string(),
            quantity: 5,
            total_amount_paise: 6000,
        }];

        let draft = SaleDraft::from_candidates(candidates, &catalog).unwrap();
        assert!(draft.items()[0].matched());

        // Pre-flight warns the caller before submission.
        let report = reconcile(draft.items(), &catalog);
        assert!(report.requires_adjustment);

        // Caller authorizes adjustment and submits.
        let request = draft.into_request(PaymentMode::Upi, true);
        let receipt = db.committer().commit(&request).await.unwrap();
        assert_eq!(receipt.committed, 1);

        let today = Utc::now().date_naive();
        let sales = db.sales().list_for_day(today).await.unwrap();
        assert_eq!(sales[0].payment_mode, PaymentMode::Upi);
    }
}
