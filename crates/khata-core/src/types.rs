//! # Domain Types
//!
//! Core domain types used throughout Khata.
//!
//! ## Type Hierarchy
//! ```text
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                              │
//! │                                                                   │
//! │  ┌────────────────────┐   ┌────────────────────┐                  │
//! │  │      Product       │   │        Sale        │                  │
//! │  │  ────────────────  │   │  ────────────────  │                  │
//! │  │  id (UUID)         │   │  id (UUID)         │                  │
//! │  │  name, category    │   │  product_id (FK)   │                  │
//! │  │  cost/selling      │   │  quantity          │                  │
//! │  │  stock             │   │  total_amount      │                  │
//! │  └────────────────────┘   │  payment_mode      │                  │
//! │                           └────────────────────┘                  │
//! │                                                                   │
//! │  ┌────────────────────┐   ┌────────────────────┐                  │
//! │  │   CandidateItem    │   │      LineItem      │                  │
//! │  │  (extractor out)   │──►│  (draft, transient)│                  │
//! │  └────────────────────┘   └────────────────────┘                  │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A `CandidateItem` is what the external text-extraction collaborator
//! produces; a `LineItem` is the same tuple after catalog resolution.
//! Neither is persisted - only `Product` and `Sale` rows exist on disk.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Payment Mode
// =============================================================================

/// How the customer paid. Stored verbatim on each sale row.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMode {
    /// Physical cash payment.
    Cash,
    /// UPI transfer (PhonePe, GPay, etc.).
    Upi,
}

impl Default for PaymentMode {
    fn default() -> Self {
        PaymentMode::Cash
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog entry. Owns the truth about stock.
///
/// Created through explicit catalog management or implicitly by the
/// sale committer when a line item matches nothing. Never deleted.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name, also the matching key for free-text entry.
    pub name: String,

    /// Category label ("Grocery", "Snacks", ...).
    pub category: String,

    /// Purchase cost per unit, in paise.
    pub cost_price_paise: i64,

    /// Selling price per unit, in paise.
    pub selling_price_paise: i64,

    /// Current stock level. Invariant: never persisted negative.
    pub stock: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the selling price as Money.
    #[inline]
    pub fn selling_price(&self) -> Money {
        Money::from_paise(self.selling_price_paise)
    }

    /// Returns the cost price as Money.
    #[inline]
    pub fn cost_price(&self) -> Money {
        Money::from_paise(self.cost_price_paise)
    }

    /// Checks whether recorded stock covers a requested quantity.
    #[inline]
    pub fn has_stock_for(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }
}

/// Input for an explicit catalog write.
///
/// The repository fills in id and timestamps; callers only describe
/// the product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub cost_price_paise: i64,
    pub selling_price_paise: i64,
    pub stock: i64,
}

// =============================================================================
// Sale
// =============================================================================

/// One committed sale line. Immutable once created; append-only.
///
/// A Sale always references a concrete catalog product - ad-hoc items
/// get a product created for them inside the same transaction.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// The catalog product this sale drew stock from.
    pub product_id: String,

    /// Units sold.
    pub quantity: i64,

    /// Total amount charged for the line, in paise.
    pub total_amount_paise: i64,

    pub payment_mode: PaymentMode,

    pub created_at: DateTime<Utc>,
}

impl Sale {
    /// Returns the total amount as Money.
    #[inline]
    pub fn total_amount(&self) -> Money {
        Money::from_paise(self.total_amount_paise)
    }
}

// =============================================================================
// Candidate Item
// =============================================================================

/// One product/quantity/amount tuple as produced by the external
/// text-extraction collaborator (or typed in manually).
///
/// `product_id` is set when the caller already resolved the product
/// (e.g. picked it from the catalog UI); otherwise matching runs on
/// `product_name`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateItem {
    #[serde(default)]
    pub product_id: Option<String>,
    pub product_name: String,
    pub quantity: i64,
    pub total_amount_paise: i64,
}

// =============================================================================
// Line Item
// =============================================================================

/// A candidate item after catalog resolution, living inside a
/// [`crate::draft::SaleDraft`] until committed or discarded.
///
/// Transient: never persisted as such.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// The name as the caller said it, before any matching.
    pub product_name_raw: String,

    /// Units requested. Must be positive to commit.
    pub quantity: i64,

    /// Resolved total for the line, in paise. Zero means incomplete -
    /// the caller must supply a price before commit.
    pub total_amount_paise: i64,

    /// The catalog product this line resolved to, if any.
    pub resolved_product_id: Option<String>,
}

impl LineItem {
    /// Whether this line resolved to an existing catalog product.
    #[inline]
    pub fn matched(&self) -> bool {
        self.resolved_product_id.is_some()
    }

    /// Returns the line total as Money.
    #[inline]
    pub fn total_amount(&self) -> Money {
        Money::from_paise(self.total_amount_paise)
    }

    /// Per-unit price, truncating toward zero. Quantity must be
    /// positive; the committer validates that before calling.
    #[inline]
    pub fn unit_price(&self) -> Money {
        self.total_amount().div_quantity(self.quantity)
    }
}

// =============================================================================
// Batch Request
// =============================================================================

/// A full batch submitted for one atomic commit.
///
/// ## All-or-Nothing
/// The committer persists N sales and N stock mutations, or nothing.
/// `auto_adjust_stock` is the batch-global caller authorization to
/// raise under-stocked products to the requested quantity before
/// decrementing (see [`crate::reconcile`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleBatchRequest {
    pub items: Vec<LineItem>,

    #[serde(default)]
    pub payment_mode: PaymentMode,

    #[serde(default)]
    pub auto_adjust_stock: bool,
}

// =============================================================================
// Unit Tests
// =============================================================================
