//! IO utilities for file operations

pub mod parquet;

pub use self::parquet::{create_projection, read_parquet};
