//! Logging utilities
//!
//! Standardized messages for load and render operations. `source` is anything
//! displayable: a path via [`Path::display`](std::path::Path::display), or a
//! short label such as `"string input"`.

use std::fmt::Display;
use std::time::Duration;

/// Log an operation start with consistent format
pub fn log_operation_start(operation: &str, source: impl Display) {
    log::info!("{operation} {source}");
}

/// Log an operation completion with consistent format
///
/// # Arguments
/// * `operation` - Past-tense description, e.g. `"loaded"`
/// * `source` - What was operated on
/// * `rows` - Number of rows produced
/// * `elapsed` - Optional elapsed time
pub fn log_operation_complete(
    operation: &str,
    source: impl Display,
    rows: usize,
    elapsed: Option<Duration>,
) {
    match elapsed {
        Some(duration) => {
            log::info!("Successfully {operation} {rows} rows from {source} in {duration:?}");
        }
        None => log::info!("Successfully {operation} {rows} rows from {source}"),
    }
}

/// Log a warning, optionally tied to a source
pub fn log_warning(message: &str, source: Option<&dyn Display>) {
    match source {
        Some(source) => log::warn!("{message}: {source}"),
        None => log::warn!("{message}"),
    }
}
