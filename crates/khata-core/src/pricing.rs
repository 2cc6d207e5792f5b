//! # Price Resolver
//!
//! Computes a line item's committed total from caller input and/or the
//! catalog price.
//!
//! ## Resolution Rule
//! ```text
//! caller amount > 0 ──────────► trust it verbatim (voice/manual wins)
//! caller amount = 0, matched ─► (selling price, else cost price) × qty
//! caller amount = 0, unmatched► stays 0; item is incomplete until a
//!                               human supplies a value
//! ```
//!
//! Resolution runs once, at draft construction. Edits the caller makes
//! to quantity or amount afterwards are taken as-is and never trigger
//! re-resolution.

use crate::money::Money;
use crate::types::Product;

/// Resolves the total amount for one line.
///
/// Pure, never fails. A zero result marks the line incomplete; the
/// committer rejects batches containing such lines.
///
/// ## Example
/// ```rust
/// # use khata_core::pricing::resolve_amount;
/// # use khata_core::money::Money;
/// // Caller-supplied price wins even when a product matched.
/// assert_eq!(resolve_amount(2, Money::from_paise(2000), None).paise(), 2000);
/// ```
pub fn resolve_amount(quantity: i64, caller_amount: Money, matched: Option<&Product>) -> Money {
    if caller_amount.is_positive() {
        return caller_amount;
    }

    match matched {
        Some(product) => {
            let unit = if product.selling_price().is_positive() {
                product.selling_price()
            } else {
                product.cost_price()
            };
            unit * quantity
        }
        None => Money::zero(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
