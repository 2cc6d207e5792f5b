//! # Error Types
//!
//! Domain-specific error types for khata-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                         Error Types                               │
//! │                                                                   │
//! │  khata-core errors (this file)                                    │
//! │  ├── CoreError        - draft/batch rule violations               │
//! │  └── ValidationError  - input validation failures                 │
//! │                                                                   │
//! │  khata-db errors (separate crate)                                 │
//! │  ├── DbError          - database operation failures               │
//! │  └── CommitError      - the client-facing commit taxonomy         │
//! │                                                                   │
//! │  Flow: ValidationError → CoreError → CommitError → caller         │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (index, bound, field)
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Draft and batch rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Batch exceeds the maximum number of lines.
    #[error("batch cannot have more than {max} items")]
    BatchTooLarge { max: usize },

    /// Quantity outside the allowed range.
    #[error("quantity {requested} is outside 1..={max}")]
    QuantityOutOfRange { requested: i64, max: i64 },

    /// An amount edit tried to set a negative total.
    #[error("amount cannot be negative (got {paise} paise)")]
    NegativeAmount { paise: i64 },

    /// A draft edit addressed a line that does not exist.
    #[error("line index {index} out of range (draft has {len} lines)")]
    LineIndexOutOfRange { index: usize, len: usize },

    /// Validation error (wraps ValidationError).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors, raised before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
