//! Arrow data handling utilities
//!
//! Helpers for turning typed Arrow columns into string columns.

pub mod conversion;

pub use self::conversion::{array_to_strings, coerce_batch_to_strings};
