//! # khata-db: Storage Layer for Khata
//!
//! This crate provides database access for the Khata shop tracker.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Khata Data Flow                              │
//! │                                                                     │
//! │  Caller (draft built with khata-core, then submitted)               │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │                   khata-db (THIS CRATE)                     │   │
//! │  │                                                             │   │
//! │  │  ┌─────────────┐  ┌──────────────┐  ┌──────────────────┐  │   │
//! │  │  │  Database   │  │ Repositories │  │  SaleCommitter   │  │   │
//! │  │  │  (pool.rs)  │  │ (product.rs, │  │  (committer.rs)  │  │   │
//! │  │  │             │  │  sale.rs)    │  │                  │  │   │
//! │  │  │ SqlitePool  │◄─│ catalog read │  │ one transaction  │  │   │
//! │  │  │ Migrations  │  │ ledger read  │  │ per sale batch   │  │   │
//! │  │  └─────────────┘  └──────────────┘  └──────────────────┘  │   │
//! │  │                                                             │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                         │   │
//! │  │            products (catalog)  +  sales (ledger)            │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Single-entity access (catalog, ledger)
//! - [`committer`] - Atomic sale batch commit
//!
//! ## Usage
//!
//! ```rust,ignore
//! use khata_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/khata.db")).await?;
//!
//! let catalog = db.products().list().await?;
//! let draft = SaleDraft::from_candidates(candidates, &catalog)?;
//! let receipt = db.committer()
//!     .commit(&draft.into_request(PaymentMode::Cash, false))
//!     .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod committer;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use committer::{CommitError, CommitReceipt, SaleCommitter};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::product::ProductRepository;
pub use repository::sale::{DaySummary, SaleRepository, SaleWithProduct};
