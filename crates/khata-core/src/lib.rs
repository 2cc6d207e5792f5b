//! # khata-core: Pure Business Logic for Khata
//!
//! This crate is the heart of Khata, a small shopkeeper business tracker.
//! It contains every decision the sale commit pipeline makes *before*
//! anything touches storage, as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                       Khata Sale Pipeline                         │
//! │                                                                   │
//! │  Candidate items (voice/manual entry, already structured)         │
//! │       │                                                           │
//! │  ┌────▼──────────────────────────────────────────────────────┐    │
//! │  │              ★ khata-core (THIS CRATE) ★                  │    │
//! │  │                                                           │    │
//! │  │  matcher ──► pricing ──► draft (SaleDraft) ──► reconcile  │    │
//! │  │                                                           │    │
//! │  │  NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS       │    │
//! │  └────┬──────────────────────────────────────────────────────┘    │
//! │       │ SaleBatchRequest                                          │
//! │  ┌────▼──────────────────────────────────────────────────────┐    │
//! │  │            khata-db: SaleCommitter (one transaction)      │    │
//! │  └───────────────────────────────────────────────────────────┘    │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, LineItem, PaymentMode, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`matcher`] - Free-text name to catalog entry resolution
//! - [`pricing`] - Line item amount resolution
//! - [`draft`] - The draft batch aggregate edited before commit
//! - [`reconcile`] - Stock conflict detection
//! - [`validation`] - Business rule validation
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output, always
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: all monetary values are paise (i64), never floats
//! 4. **Explicit Errors**: all errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod draft;
pub mod error;
pub mod matcher;
pub mod money;
pub mod pricing;
pub mod reconcile;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use draft::SaleDraft;
pub use error::{CoreError, ValidationError};
pub use matcher::match_product;
pub use money::Money;
pub use pricing::resolve_amount;
pub use reconcile::{reconcile, StockReport, StockShortfall};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Assumed cost fraction of the selling price, in basis points, for
/// products created on the fly during commit (7000 = 70%, i.e. a 30%
/// margin).
///
/// ## Why a constant?
/// The margin is a business heuristic, not arithmetic that belongs in
/// the commit algorithm. Keeping it named lets it be tuned without
/// touching the committer.
pub const DEFAULT_COST_MARGIN_BPS: i64 = 7000;

/// Category assigned to products created implicitly during commit.
pub const DEFAULT_CATEGORY: &str = "Miscellaneous";

/// Name assigned to an ad-hoc product when the line's raw name is
/// blank after trimming. A blank name matches nothing in the catalog,
/// so such a line always reaches product creation.
pub const FALLBACK_PRODUCT_NAME: &str = "Unnamed Product";

/// Maximum line items allowed in a single batch.
///
/// ## Business Reason
/// Prevents runaway batches and keeps transaction sizes reasonable.
pub const MAX_BATCH_ITEMS: usize = 100;

/// Maximum quantity of a single line item.
///
/// ## Business Reason
/// Prevents accidental over-entry (e.g., dictating 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;
