//! # Product Matcher
//!
//! Maps a free-text item name (as dictated or typed by the shopkeeper)
//! to zero-or-one catalog entries.
//!
//! ## Matching Rules
//! Case-insensitive, checked in priority order per catalog entry:
//!
//! 1. exact equality of the normalized names
//! 2. the catalog name is a substring of the input
//!    ("Maggi Noodles 50g" matches product "Maggi Noodles")
//! 3. the input is a substring of the catalog name
//!    ("maggi" matches product "Maggi Noodles")
//!
//! The catalog is scanned in its natural (stored) order and the first
//! entry satisfying any rule wins. There is deliberately no global
//! best-match ranking: a linear first-match scan keeps behavior
//! predictable for the shopkeeper, who learns which name wins.
//!
//! No fuzzy matching beyond substring containment.

use crate::types::Product;

/// Resolves a raw item name against the catalog.
///
/// Returns the first catalog entry satisfying any matching rule, or
/// `None`. Pure, never fails.
///
/// ## Example
/// ```rust
/// # use khata_core::matcher::match_product;
/// # use khata_core::types::Product;
/// # use chrono::Utc;
/// # let now = Utc::now();
/// # let catalog = vec![Product {
/// #     id: "p1".into(), name: "Maggi Noodles".into(), category: "Grocery".into(),
/// #     cost_price_paise: 900, selling_price_paise: 1200, stock: 10,
/// #     created_at: now, updated_at: now,
/// # }];
/// assert!(match_product("maggi", &catalog).is_some());
/// assert!(match_product("Maggi Noodles 50g", &catalog).is_some());
/// assert!(match_product("Colgate", &catalog).is_none());
/// ```
pub fn match_product<'a>(name_raw: &str, catalog: &'a [Product]) -> Option<&'a Product> {
    let needle = normalize(name_raw);
    if needle.is_empty() {
        return None;
    }

    catalog.iter().find(|product| {
        let entry = normalize(&product.name);
        entry == needle || needle.contains(entry.as_str()) || entry.contains(needle.as_str())
    })
}

/// Lowercases and trims for comparison. Unicode-aware lowercasing so
/// that mixed-script names compare consistently.
fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(id: &str, name: &str) -> Product {
        let now = Utc::now();
        Product {
            id: id.to_string(),
            name: name.to_string(),
            category: "Grocery".to_string(),
            cost_price_paise: 900,
            selling_price_paise: 1200,
            stock: 10,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_exact_match_case_insensitive() {
        let catalog = vec![product("p1", "Maggi Noodles")];
        let hit = match_product("maggi noodles", &catalog).unwrap();
        assert_eq!(hit.id, "p1");
    }

    #[test]
    fn test_input_contains_catalog_name() {
        let catalog = vec![product("p1", "Maggi Noodles")];
        let hit = match_product("Maggi Noodles 50g", &catalog).unwrap();
        assert_eq!(hit.id, "p1");
    }

    #[test]
    fn test_catalog_name_contains_input() {
        let catalog = vec![product("p1", "Maggi Noodles")];
        let hit = match_product("maggi", &catalog).unwrap();
        assert_eq!(hit.id, "p1");
    }

    #[test]
    fn test_no_match_returns_none() {
        let catalog = vec![product("p1", "Maggi Noodles")];
        assert!(match_product("Colgate", &catalog).is_none());
    }

    #[test]
    fn test_first_match_wins_in_catalog_order() {
        // Both entries contain "milk"; the scan must keep stored order.
        let catalog = vec![product("p1", "Amul Milk 500ml"), product("p2", "Milk Bikis")];
        let hit = match_product("milk", &catalog).unwrap();
        assert_eq!(hit.id, "p1");
    }

    #[test]
    fn test_blank_input_never_matches() {
        let catalog = vec![product("p1", "Maggi Noodles")];
        assert!(match_product("", &catalog).is_none());
        assert!(match_product("   ", &catalog).is_none());
    }

    #[test]
    fn test_empty_catalog() {
        assert!(match_product("maggi", &[]).is_none());
    }
}
