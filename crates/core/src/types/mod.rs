//! Core types for Shopfront.
//!
//! This module provides type-safe wrappers for common storefront concepts.

pub mod links;
pub mod money;
pub mod sort;

pub use links::ensure_starts_with;
pub use money::{DEFAULT_CURRENCY_CODE, Money, MoneyError};
pub use sort::{DEFAULT_SORT, ProductSortKey, SORTING, SortFilter};
