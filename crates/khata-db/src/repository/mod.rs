//! # Repository Module
//!
//! Repository implementations for database access.
//!
//! ## Pattern
//! Each repository owns a clone of the connection pool and exposes
//! typed async methods. Writes that must be atomic across tables (the
//! sale batch) live in [`crate::committer`], not here: repositories are
//! single-entity access, the committer is the only cross-entity
//! orchestration.

pub mod product;
pub mod sale;
