//! Utility functions for reading and rendering Parquet data

pub mod arrow;
pub mod io;
pub mod json;
pub mod logging;
pub mod records;

pub use crate::config::DEFAULT_BATCH_SIZE;
pub use self::io::read_parquet;
pub use self::records::{render, split_records};
