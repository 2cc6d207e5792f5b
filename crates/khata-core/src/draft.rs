//! # Sale Draft
//!
//! The draft batch aggregate: an ordered, indexable collection of line
//! items owned exclusively by the in-flight request. The shopkeeper
//! reviews and edits it (fix a quantity, type a missing price, drop a
//! misheard line) before submitting the whole thing for one atomic
//! commit.
//!
//! ## Lifecycle
//! ```text
//! candidates (from the text extractor)
//!      │
//!      ▼
//! SaleDraft::from_candidates(candidates, catalog)   ← match + price once
//!      │
//!      ├── update_quantity / update_amount / remove  (caller edits)
//!      │
//!      ▼
//! draft.into_request(payment_mode, auto_adjust)     ← hand to committer
//! ```
//!
//! Matching and price resolution run exactly once, at construction.
//! Caller edits afterwards are taken verbatim: a typed-in correction
//! must not be silently re-priced.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::matcher::match_product;
use crate::money::Money;
use crate::pricing::resolve_amount;
use crate::types::{CandidateItem, LineItem, PaymentMode, Product, SaleBatchRequest};
use crate::{MAX_BATCH_ITEMS, MAX_ITEM_QUANTITY};

/// An editable batch of line items, pre-commit.
///
/// ## Invariants
/// - Order is submission order and is preserved through commit
/// - At most [`MAX_BATCH_ITEMS`] lines
/// - No shared/global mutable state: each request owns its draft
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleDraft {
    items: Vec<LineItem>,
}

impl SaleDraft {
    /// Creates an empty draft.
    pub fn new() -> Self {
        SaleDraft { items: Vec::new() }
    }

    /// Builds a draft from extractor candidates, resolving each against
    /// the catalog.
    ///
    /// Per candidate:
    /// 1. honor a caller-supplied `product_id` if present, otherwise run
    ///    the [`match_product`] scan on the raw name;
    /// 2. resolve the amount via [`resolve_amount`] (caller price wins,
    ///    then catalog price, else zero/incomplete).
    ///
    /// Candidates beyond [`MAX_BATCH_ITEMS`] are rejected rather than
    /// silently truncated.
    pub fn from_candidates(
        candidates: Vec<CandidateItem>,
        catalog: &[Product],
    ) -> Result<Self, CoreError> {
        if candidates.len() > MAX_BATCH_ITEMS {
            return Err(CoreError::BatchTooLarge {
                max: MAX_BATCH_ITEMS,
            });
        }

        let items = candidates
            .into_iter()
            .map(|candidate| {
                let matched = match candidate.product_id {
                    Some(ref id) => catalog.iter().find(|p| &p.id == id),
                    None => match_product(&candidate.product_name, catalog),
                };

                let amount = resolve_amount(
                    candidate.quantity,
                    Money::from_paise(candidate.total_amount_paise),
                    matched,
                );

                LineItem {
                    product_name_raw: candidate.product_name,
                    quantity: candidate.quantity,
                    total_amount_paise: amount.paise(),
                    resolved_product_id: matched.map(|p| p.id.clone()),
                }
            })
            .collect();

        Ok(SaleDraft { items })
    }

    /// Read access to the lines, in order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Overwrites the quantity of the line at `index`.
    ///
    /// The amount is deliberately left untouched - no re-pricing.
    pub fn update_quantity(&mut self, index: usize, quantity: i64) -> Result<(), CoreError> {
        if quantity <= 0 || quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityOutOfRange {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }
        let item = self.item_mut(index)?;
        item.quantity = quantity;
        Ok(())
    }

    /// Overwrites the total amount of the line at `index` (the caller
    /// typing a price for an incomplete line, or correcting one).
    pub fn update_amount(&mut self, index: usize, amount: Money) -> Result<(), CoreError> {
        if amount.paise() < 0 {
            return Err(CoreError::NegativeAmount {
                paise: amount.paise(),
            });
        }
        let item = self.item_mut(index)?;
        item.total_amount_paise = amount.paise();
        Ok(())
    }

    /// Removes the line at `index`, preserving the order of the rest.
    pub fn remove(&mut self, index: usize) -> Result<LineItem, CoreError> {
        if index >= self.items.len() {
            return Err(CoreError::LineIndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    /// Discards all lines (caller-driven cancellation before submission).
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Indexes of lines that still have no price. A non-empty result
    /// means the committer would reject the batch.
    pub fn incomplete_lines(&self) -> Vec<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.total_amount_paise <= 0)
            .map(|(i, _)| i)
            .collect()
    }

    /// Converts the draft into the batch request handed to the
    /// committer. The draft is consumed: once submitted, there is
    /// nothing left to edit.
    pub fn into_request(self, payment_mode: PaymentMode, auto_adjust_stock: bool) -> SaleBatchRequest {
        SaleBatchRequest {
            items: self.items,
            payment_mode,
            auto_adjust_stock,
        }
    }

    fn item_mut(&mut self, index: usize) -> Result<&mut LineItem, CoreError> {
        let len = self.items.len();
        self.items
            .get_mut(index)
            .ok_or(CoreError::LineIndexOutOfRange { index, len })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(id: &str, name: &str, selling_paise: i64, stock: i64) -> Product {
        let now = Utc::now();
        Product {
            id: id.to_string(),
            name: name.to_string(),
            category: "Grocery".to_string(),
            cost_price_paise: selling_paise * 7 / 10,
            selling_price_paise: selling_paise,
            stock,
            created_at: now,
            updated_at: now,
        }
    }

    fn candidate(name: &str, quantity: i64, amount_paise: i64) -> CandidateItem {
        CandidateItem {
            product_id: None,
            product_name: name.to_string(),
            quantity,
            total_amount_paise: amount_paise,
        }
    }

    #[test]
    fn test_from_candidates_matches_and_prices() {
        let catalog = vec![product("p1", "Maggi Noodles", 1200, 10)];
        let draft =
            SaleDraft::from_candidates(vec![candidate("maggi", 2, 0)], &catalog).unwrap();

        let item = &draft.items()[0];
        assert_eq!(item.resolved_product_id.as_deref(), Some("p1"));
        assert_eq!(item.total_amount_paise, 2400);
    }

    #[test]
    fn test_from_candidates_keeps_caller_price() {
        let catalog = vec![product("p1", "Maggi Noodles", 1200, 10)];
        let draft =
            SaleDraft::from_candidates(vec![candidate("maggi", 2, 2000)], &catalog).unwrap();

        assert_eq!(draft.items()[0].total_amount_paise, 2000);
    }

    #[test]
    fn test_from_candidates_honors_explicit_product_id() {
        let catalog = vec![
            product("p1", "Maggi Noodles", 1200, 10),
            product("p2", "Maggi Masala", 1500, 10),
        ];
        let mut c = candidate("maggi", 1, 0);
        c.product_id = Some("p2".to_string());

        let draft = SaleDraft::from_candidates(vec![c], &catalog).unwrap();
        assert_eq!(draft.items()[0].resolved_product_id.as_deref(), Some("p2"));
        assert_eq!(draft.items()[0].total_amount_paise, 1500);
    }

    #[test]
    fn test_unmatched_line_is_incomplete() {
        let draft = SaleDraft::from_candidates(vec![candidate("Colgate", 1, 0)], &[]).unwrap();

        assert!(!draft.items()[0].matched());
        assert_eq!(draft.incomplete_lines(), vec![0]);
    }

    #[test]
    fn test_edits_do_not_retrigger_resolution() {
        let catalog = vec![product("p1", "Maggi Noodles", 1200, 10)];
        let mut draft =
            SaleDraft::from_candidates(vec![candidate("maggi", 2, 0)], &catalog).unwrap();

        // Quantity change leaves the resolved amount alone.
        draft.update_quantity(0, 5).unwrap();
        assert_eq!(draft.items()[0].total_amount_paise, 2400);

        draft.update_amount(0, Money::from_paise(6000)).unwrap();
        assert_eq!(draft.items()[0].total_amount_paise, 6000);
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut draft = SaleDraft::from_candidates(
            vec![
                candidate("a", 1, 100),
                candidate("b", 1, 200),
                candidate("c", 1, 300),
            ],
            &[],
        )
        .unwrap();

        let removed = draft.remove(1).unwrap();
        assert_eq!(removed.product_name_raw, "b");
        assert_eq!(draft.items()[0].product_name_raw, "a");
        assert_eq!(draft.items()[1].product_name_raw, "c");
    }

    #[test]
    fn test_out_of_range_edits_fail() {
        let mut draft = SaleDraft::new();
        assert!(draft.update_quantity(0, 1).is_err());
        assert!(draft.remove(0).is_err());
    }

    #[test]
    fn test_quantity_bounds() {
        let mut draft =
            SaleDraft::from_candidates(vec![candidate("a", 1, 100)], &[]).unwrap();
        assert!(draft.update_quantity(0, 0).is_err());
        assert!(draft.update_quantity(0, MAX_ITEM_QUANTITY + 1).is_err());
        assert!(draft.update_quantity(0, MAX_ITEM_QUANTITY).is_ok());
    }

    #[test]
    fn test_into_request_preserves_items() {
        let draft =
            SaleDraft::from_candidates(vec![candidate("a", 2, 500)], &[]).unwrap();
        let request = draft.into_request(PaymentMode::Upi, true);

        assert_eq!(request.items.len(), 1);
        assert_eq!(request.payment_mode, PaymentMode::Upi);
        assert!(request.auto_adjust_stock);
    }
}
