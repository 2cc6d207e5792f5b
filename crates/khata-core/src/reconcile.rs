//! # Stock Reconciler
//!
//! Decides whether a draft batch can be sold out of recorded stock, and
//! which lines are in conflict.
//!
//! ## Caller Workflow
//! ```text
//! reconcile(items, catalog)
//!      │
//!      ├── no conflicts ──► submit with auto_adjust_stock = false
//!      │
//!      └── conflicts ─────► show the shopkeeper the shortfalls
//!               │
//!               ├── abort: discard the draft, nothing mutated
//!               │
//!               └── proceed: resubmit with auto_adjust_stock = true
//!                   (commit raises stock to the requested quantity
//!                    before decrementing, per conflicting product)
//! ```
//!
//! The auto-adjust decision is global to the batch - there is no
//! per-line adjustment. This is an advisory pre-flight over a catalog
//! snapshot; the committer re-reads stock authoritatively inside its
//! transaction and re-raises the conflict if the snapshot went stale.

use serde::{Deserialize, Serialize};

use crate::types::{LineItem, Product};

/// One under-stocked line: the requested quantity exceeds what the
/// catalog records for the resolved product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockShortfall {
    /// Index of the line within the submitted batch.
    pub line_index: usize,
    pub product_id: String,
    pub product_name: String,
    pub available: i64,
    pub requested: i64,
}

/// Outcome of a reconciliation pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockReport {
    /// True when any line is under-stocked; committing then requires
    /// either dropping lines or the batch-global auto-adjust flag.
    pub requires_adjustment: bool,
    pub conflicts: Vec<StockShortfall>,
}

/// Compares every resolved line's quantity against current stock.
///
/// Unmatched lines are skipped: they have no stock to conflict with
/// (the committer creates their product with stock equal to the
/// requested quantity). Pure, never fails.
pub fn reconcile(items: &[LineItem], catalog: &[Product]) -> StockReport {
    let conflicts: Vec<StockShortfall> = items
        .iter()
        .enumerate()
        .filter_map(|(line_index, item)| {
            let product_id = item.resolved_product_id.as_deref()?;
            let product = catalog.iter().find(|p| p.id == product_id)?;

            if product.has_stock_for(item.quantity) {
                None
            } else {
                Some(StockShortfall {
                    line_index,
                    product_id: product.id.clone(),
                    product_name: product.name.clone(),
                    available: product.stock,
                    requested: item.quantity,
                })
            }
        })
        .collect();

    StockReport {
        requires_adjustment: !conflicts.is_empty(),
        conflicts,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
