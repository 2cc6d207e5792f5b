//! # Validation Module
//!
//! Input validation for catalog writes and batch submissions.
//!
//! ## Validation Strategy
//! ```text
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                            │
//! │                                                                   │
//! │  Layer 1: THIS MODULE - field-level checks, before any logic      │
//! │  Layer 2: Committer preconditions - batch-level gate              │
//! │           (non-empty, every line priced)                          │
//! │  Layer 3: Database (SQLite) - NOT NULL, CHECK, FK constraints     │
//! │                                                                   │
//! │  Defense in depth: each layer catches different mistakes          │
//! └───────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::NewProduct;
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line item quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed [`MAX_ITEM_QUANTITY`]
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price/amount in paise.
///
/// Zero is allowed here: a draft line may legitimately carry zero
/// until the caller types a price. The committer enforces the stricter
/// positive-amount gate at submission.
pub fn validate_amount_paise(paise: i64) -> ValidationResult<()> {
    if paise < 0 {
        return Err(ValidationError::OutOfRange {
            field: "amount".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a stock level for a catalog write.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Composite Validators
// =============================================================================

/// Validates an explicit catalog write end to end.
pub fn validate_new_product(product: &NewProduct) -> ValidationResult<()> {
    validate_product_name(&product.name)?;
    validate_amount_paise(product.cost_price_paise)?;
    validate_amount_paise(product.selling_price_paise)?;
    validate_stock(product.stock)?;
    Ok(())
}

/// Validates a UUID string format.
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
