//! Configuration for `ParquetData`.
//!
//! Options arrive either as a typed [`ParquetDataOptions`] or as the JSON
//! object shape used by the data-loading framework:
//!
//! ```json
//! { "data_format": "records", "selected_columns": ["a", "b"], "header": 0 }
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ParquetDataError, Result};

/// Default batch size for Parquet reading
pub const DEFAULT_BATCH_SIZE: usize = 16384;

/// Number of samples joined into one output item for the text formats
pub const DEFAULT_SAMPLES_PER_LINE: usize = 1;

/// Helper function to get batch size from environment
#[must_use]
pub fn get_batch_size() -> Option<usize> {
    std::env::var("PARQUET_BATCH_SIZE")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|size| *size > 0)
}

/// Format in which loaded data is returned
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataFormat {
    /// The materialized table, unchanged
    #[default]
    Dataframe,
    /// One JSON object per row
    Records,
    /// One JSON array, split into fixed-size chunks
    Json,
}

impl DataFormat {
    /// All accepted formats
    pub const ALL: [Self; 3] = [Self::Dataframe, Self::Records, Self::Json];

    /// The option name of this format
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dataframe => "dataframe",
            Self::Records => "records",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataFormat {
    type Err = ParquetDataError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| ParquetDataError::InvalidDataFormat(s.to_string()))
    }
}

/// Options accepted by `ParquetData`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParquetDataOptions {
    /// Format in which to return data
    pub data_format: DataFormat,
    /// Columns to read from the source, empty for all columns
    pub selected_columns: Vec<String>,
    /// Header setting, passed through untouched
    pub header: Option<Value>,
    /// Samples joined into one item for the records and json formats
    pub samples_per_line: usize,
}

impl Default for ParquetDataOptions {
    fn default() -> Self {
        Self {
            data_format: DataFormat::default(),
            selected_columns: Vec::new(),
            header: None,
            samples_per_line: DEFAULT_SAMPLES_PER_LINE,
        }
    }
}

impl ParquetDataOptions {
    /// Build options from a JSON value
    ///
    /// `null` yields the defaults. Anything other than an object is rejected,
    /// as is an unknown `data_format`. Unrecognized keys are ignored.
    pub fn from_value(value: &Value) -> Result<Self> {
        let map = match value {
            Value::Null => return Ok(Self::default()),
            Value::Object(map) => map,
            other => {
                return Err(ParquetDataError::InvalidOption(format!(
                    "options must be an object, got {other}"
                )));
            }
        };

        // Checked up front so an unknown name surfaces as a format error
        if let Some(format) = map.get("data_format") {
            let name = format.as_str().ok_or_else(|| {
                ParquetDataError::InvalidOption(format!("data_format must be a string, got {format}"))
            })?;
            DataFormat::from_str(name)?;
        }

        let options: Self = serde_json::from_value(value.clone())?;
        options.validate()?;
        Ok(options)
    }

    /// Parse options from JSON text
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    /// Set the output format
    #[must_use]
    pub const fn with_data_format(mut self, data_format: DataFormat) -> Self {
        self.data_format = data_format;
        self
    }

    /// Restrict loading to the given columns
    #[must_use]
    pub fn with_selected_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Set the passthrough header value
    #[must_use]
    pub fn with_header(mut self, header: Value) -> Self {
        self.header = Some(header);
        self
    }

    /// Check option values that the type system cannot
    pub fn validate(&self) -> Result<()> {
        if self.samples_per_line == 0 {
            return Err(ParquetDataError::InvalidOption(
                "samples_per_line must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration for the Parquet record batch reader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadConfig {
    /// Rows per record batch when decoding row groups
    pub batch_size: usize,
}

impl Default for ReadConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl ReadConfig {
    /// Read configuration, honoring `PARQUET_BATCH_SIZE` when set
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            batch_size: get_batch_size().unwrap_or(DEFAULT_BATCH_SIZE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_data_format_from_str() {
        assert_eq!(DataFormat::from_str("dataframe").unwrap(), DataFormat::Dataframe);
        assert_eq!(DataFormat::from_str("records").unwrap(), DataFormat::Records);
        assert_eq!(DataFormat::from_str("json").unwrap(), DataFormat::Json);
        assert!(matches!(
            DataFormat::from_str("JSON"),
            Err(ParquetDataError::InvalidDataFormat(_))
        ));
    }

    #[test]
    fn test_options_from_value() {
        let options = ParquetDataOptions::from_value(&json!({
            "data_format": "records",
            "selected_columns": ["a", "b"],
            "header": "auto",
            "encoding": "utf-8"
        }))
        .unwrap();

        assert_eq!(options.data_format, DataFormat::Records);
        assert_eq!(options.selected_columns, vec!["a", "b"]);
        assert_eq!(options.header, Some(json!("auto")));
        assert_eq!(options.samples_per_line, DEFAULT_SAMPLES_PER_LINE);
    }

    #[test]
    fn test_options_defaults_from_null() {
        let options = ParquetDataOptions::from_value(&Value::Null).unwrap();
        assert_eq!(options, ParquetDataOptions::default());
    }

    #[test]
    fn test_options_rejects_bad_input() {
        assert!(matches!(
            ParquetDataOptions::from_value(&json!(["records"])),
            Err(ParquetDataError::InvalidOption(_))
        ));
        assert!(matches!(
            ParquetDataOptions::from_value(&json!({"data_format": "csv"})),
            Err(ParquetDataError::InvalidDataFormat(_))
        ));
        assert!(matches!(
            ParquetDataOptions::from_json_str(r#"{"samples_per_line": 0}"#),
            Err(ParquetDataError::InvalidOption(_))
        ));
    }

    #[test]
    fn test_read_config_default() {
        assert_eq!(ReadConfig::default().batch_size, DEFAULT_BATCH_SIZE);
    }
}
