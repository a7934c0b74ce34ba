//! The Parquet data adapter.
//!
//! [`ParquetData`] owns one table loaded from a Parquet file, from JSON text
//! rows or from an existing Arrow table, and renders it in the selected
//! [`DataFormat`] on demand.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use arrow::array::UInt32Array;
use arrow::compute::take_record_batch;
use rand::Rng;
use rand::seq::SliceRandom;
use serde_json::Value;

use crate::config::{DataFormat, ParquetDataOptions, ReadConfig};
use crate::error::{ParquetDataError, Result};
use crate::loader::{self, LoadedTable};
use crate::table::{DataOutput, DtypeMap, Table};
use crate::utils::records::render;

/// In-memory input for [`ParquetData`]
#[derive(Debug, Clone, PartialEq)]
pub enum InputData {
    /// A table used as is
    Table(Table),
    /// Text holding JSON rows
    Text(String),
}

impl From<Table> for InputData {
    fn from(table: Table) -> Self {
        Self::Table(table)
    }
}

impl From<String> for InputData {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for InputData {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// Loads Parquet data and serves it as a table, JSON records or JSON text
#[derive(Debug, Clone)]
pub struct ParquetData {
    input_file_path: Option<PathBuf>,
    options: ParquetDataOptions,
    read_config: ReadConfig,
    table: Table,
    original_dtypes: DtypeMap,
}

impl ParquetData {
    /// Name of the data type handled by this adapter
    pub const DATA_TYPE: &'static str = "parquet";

    /// Load data from a file path or from in-memory data
    ///
    /// In-memory `data` takes precedence over `input_file_path`. File data is
    /// read with every column converted to strings, restricted to the
    /// selected columns. A table passed in is kept as given.
    ///
    /// # Errors
    /// Fails with [`ParquetDataError::MissingInput`] when neither a path nor
    /// data is given, and otherwise with whatever loading raises.
    pub fn new(
        input_file_path: Option<&Path>,
        data: Option<InputData>,
        options: Option<ParquetDataOptions>,
    ) -> Result<Self> {
        Self::with_read_config(input_file_path, data, options, ReadConfig::from_env())
    }

    /// Like [`ParquetData::new`], with explicit reader settings
    pub fn with_read_config(
        input_file_path: Option<&Path>,
        data: Option<InputData>,
        options: Option<ParquetDataOptions>,
        read_config: ReadConfig,
    ) -> Result<Self> {
        let options = options.unwrap_or_default();
        options.validate()?;

        let loaded = match (data, input_file_path) {
            (Some(InputData::Table(table)), _) => loader::from_table(table),
            (Some(InputData::Text(text)), _) => loader::read_text_table(&text)?,
            (None, Some(path)) => {
                loader::read_parquet_table(path, &options.selected_columns, true, &read_config)?
            }
            (None, None) => return Err(ParquetDataError::MissingInput),
        };
        let LoadedTable {
            table,
            original_dtypes,
        } = loaded;

        Ok(Self {
            input_file_path: input_file_path.map(Path::to_path_buf),
            options,
            read_config,
            table,
            original_dtypes,
        })
    }

    /// Load a Parquet file
    pub fn from_path(path: impl AsRef<Path>, options: Option<ParquetDataOptions>) -> Result<Self> {
        Self::new(Some(path.as_ref()), None, options)
    }

    /// Wrap an existing table
    pub fn from_table(table: Table, options: Option<ParquetDataOptions>) -> Result<Self> {
        Self::new(None, Some(InputData::Table(table)), options)
    }

    /// Load JSON rows from text
    pub fn from_text(text: impl Into<String>, options: Option<ParquetDataOptions>) -> Result<Self> {
        Self::new(None, Some(InputData::Text(text.into())), options)
    }

    /// Replace all state with a new source and options
    ///
    /// Equivalent to building a new instance; nothing from the current table
    /// or options is reused. Without a new path the current path is kept, so
    /// a file-backed instance can be reloaded with different options. On
    /// error the instance is left unchanged.
    pub fn reload(
        &mut self,
        input_file_path: Option<&Path>,
        data: Option<InputData>,
        options: Option<ParquetDataOptions>,
    ) -> Result<()> {
        let path = input_file_path
            .map(Path::to_path_buf)
            .or_else(|| self.input_file_path.clone());
        *self = Self::with_read_config(path.as_deref(), data, options, self.read_config.clone())?;
        Ok(())
    }

    /// The loaded data in the selected format
    pub fn data(&self) -> Result<DataOutput> {
        render(
            &self.table,
            self.options.data_format,
            self.options.samples_per_line,
        )
    }

    /// The loaded table
    #[must_use]
    pub const fn table(&self) -> &Table {
        &self.table
    }

    /// Column types observed before values were converted to strings
    #[must_use]
    pub const fn original_dtypes(&self) -> &DtypeMap {
        &self.original_dtypes
    }

    #[must_use]
    pub fn input_file_path(&self) -> Option<&Path> {
        self.input_file_path.as_deref()
    }

    #[must_use]
    pub const fn options(&self) -> &ParquetDataOptions {
        &self.options
    }

    #[must_use]
    pub fn selected_columns(&self) -> &[String] {
        &self.options.selected_columns
    }

    /// The header option, passed through untouched
    #[must_use]
    pub const fn header(&self) -> Option<&Value> {
        self.options.header.as_ref()
    }

    /// Parquet carries no text encoding
    #[must_use]
    pub const fn file_encoding(&self) -> Option<&str> {
        None
    }

    #[must_use]
    pub const fn data_format(&self) -> DataFormat {
        self.options.data_format
    }

    pub fn set_data_format(&mut self, data_format: DataFormat) {
        self.options.data_format = data_format;
    }

    /// Select the output format by name
    ///
    /// # Errors
    /// Fails with [`ParquetDataError::InvalidDataFormat`] for unknown names,
    /// leaving the current format in place.
    pub fn set_data_format_str(&mut self, name: &str) -> Result<()> {
        self.options.data_format = DataFormat::from_str(name)?;
        Ok(())
    }

    /// Whether the output is tabular
    #[must_use]
    pub fn is_structured(&self) -> bool {
        self.data_format() == DataFormat::Dataframe
    }

    /// Rows for the dataframe format, output items otherwise
    pub fn length(&self) -> Result<usize> {
        match self.data_format() {
            DataFormat::Dataframe => Ok(self.table.num_rows()),
            DataFormat::Records | DataFormat::Json => Ok(self.data()?.len()),
        }
    }

    /// Iterate over the output in shuffled batches
    ///
    /// Every row (or item) appears in exactly one batch; batches hold at most
    /// `batch_size` entries.
    ///
    /// # Errors
    /// Fails with [`ParquetDataError::InvalidOption`] when `batch_size` is 0,
    /// or when rendering the output fails.
    pub fn batch_generator<R: Rng + ?Sized>(
        &self,
        batch_size: usize,
        rng: &mut R,
    ) -> Result<BatchGenerator> {
        if batch_size == 0 {
            return Err(ParquetDataError::InvalidOption(
                "batch_size must be at least 1".to_string(),
            ));
        }

        let output = self.data()?;
        let mut order: Vec<usize> = (0..output.len()).collect();
        order.shuffle(rng);

        Ok(BatchGenerator {
            output,
            order,
            batch_size,
            position: 0,
        })
    }
}

/// One batch produced by [`BatchGenerator`]
#[derive(Debug, Clone, PartialEq)]
pub enum DataBatch {
    /// Rows of the table, in shuffled order
    Table(Table),
    /// Output items, in shuffled order
    Items(Vec<String>),
}

impl DataBatch {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Table(table) => table.num_rows(),
            Self::Items(items) => items.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Iterator over shuffled batches of rendered output
#[derive(Debug)]
pub struct BatchGenerator {
    output: DataOutput,
    order: Vec<usize>,
    batch_size: usize,
    position: usize,
}

impl Iterator for BatchGenerator {
    type Item = Result<DataBatch>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.position >= self.order.len() {
            return None;
        }

        let end = (self.position + self.batch_size).min(self.order.len());
        let indices = &self.order[self.position..end];
        self.position = end;

        let batch = match &self.output {
            DataOutput::Dataframe(table) => take_rows(table, indices).map(DataBatch::Table),
            DataOutput::Records(items) | DataOutput::Json(items) => Ok(DataBatch::Items(
                indices.iter().map(|&i| items[i].clone()).collect(),
            )),
        };
        Some(batch)
    }
}

fn take_rows(table: &Table, indices: &[usize]) -> Result<Table> {
    let indices = indices
        .iter()
        .map(|&i| {
            u32::try_from(i).map_err(|_| {
                ParquetDataError::InvalidOption(format!("row index {i} exceeds u32 range"))
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(take_record_batch(table, &UInt32Array::from(indices))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Array, ArrayRef, Int64Array, StringArray};
    use arrow::datatypes::DataType;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::sync::Arc;

    fn table() -> Table {
        Table::try_from_iter(vec![
            ("id", Arc::new(Int64Array::from(vec![1, 2, 3, 4, 5])) as ArrayRef),
            (
                "name",
                Arc::new(StringArray::from(vec!["a", "b", "c", "d", "e"])) as ArrayRef,
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_from_table_keeps_table_and_types() {
        let data = ParquetData::from_table(table(), None).unwrap();
        assert_eq!(data.table(), &table());
        assert_eq!(data.original_dtypes().get("id"), Some(&DataType::Int64));
        assert!(data.is_structured());
        assert_eq!(data.file_encoding(), None);
        assert_eq!(data.input_file_path(), None);
        assert_eq!(data.length().unwrap(), 5);
    }

    #[test]
    fn test_missing_input() {
        assert!(matches!(
            ParquetData::new(None, None, None),
            Err(ParquetDataError::MissingInput)
        ));
    }

    #[test]
    fn test_data_format_switching() {
        let mut data = ParquetData::from_table(table(), None).unwrap();

        data.set_data_format(DataFormat::Records);
        assert!(!data.is_structured());
        assert_eq!(data.length().unwrap(), 5);

        data.set_data_format_str("json").unwrap();
        assert_eq!(data.data_format(), DataFormat::Json);
        assert!(!data.is_structured());

        assert!(data.set_data_format_str("parquet").is_err());
        assert_eq!(data.data_format(), DataFormat::Json);
    }

    #[test]
    fn test_from_text() {
        let options = ParquetDataOptions::default().with_data_format(DataFormat::Records);
        let data = ParquetData::from_text("{\"a\": 1}\n{\"a\": 2, \"b\": null}", Some(options))
            .unwrap();

        assert_eq!(data.table().num_rows(), 2);
        assert_eq!(data.original_dtypes().get("a"), Some(&DataType::Int64));
        let output = data.data().unwrap();
        assert_eq!(output.as_lines().unwrap(), [
                "{\"a\":\"1\",\"b\":null}",
                "{\"a\":\"2\",\"b\":null}"
            ]);
    }

    #[test]
    fn test_reload_replaces_state() {
        let options = ParquetDataOptions::default()
            .with_data_format(DataFormat::Json)
            .with_header(Value::from(0));
        let mut data = ParquetData::from_table(table(), Some(options)).unwrap();
        assert_eq!(data.header(), Some(&Value::from(0)));

        data.reload(None, Some(InputData::from("{\"x\": true}")), None)
            .unwrap();
        assert_eq!(data.table().num_rows(), 1);
        assert_eq!(data.data_format(), DataFormat::Dataframe);
        assert_eq!(data.header(), None);
        assert_eq!(data.original_dtypes().get("x"), Some(&DataType::Boolean));
    }

    #[test]
    fn test_reload_failure_keeps_state() {
        let mut data = ParquetData::from_table(table(), None).unwrap();
        assert!(data.reload(None, None, None).is_err());
        assert_eq!(data.table().num_rows(), 5);
    }

    #[test]
    fn test_batch_generator_covers_all_rows() {
        let data = ParquetData::from_table(table(), None).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        let batches = data
            .batch_generator(2, &mut rng)
            .unwrap()
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(batches.iter().map(DataBatch::len).collect::<Vec<_>>(), vec![2, 2, 1]);

        let mut ids: Vec<i64> = batches
            .iter()
            .flat_map(|batch| match batch {
                DataBatch::Table(t) => t
                    .column(0)
                    .as_any()
                    .downcast_ref::<Int64Array>()
                    .unwrap()
                    .values()
                    .to_vec(),
                DataBatch::Items(_) => panic!("expected table batches"),
            })
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_batch_generator_items() {
        let options = ParquetDataOptions::default().with_data_format(DataFormat::Records);
        let data = ParquetData::from_table(table(), Some(options)).unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        let total: usize = data
            .batch_generator(3, &mut rng)
            .unwrap()
            .map(|batch| batch.unwrap().len())
            .sum();
        assert_eq!(total, 5);
        assert!(data.batch_generator(0, &mut rng).is_err());
    }
}
