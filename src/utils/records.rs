//! Rendering tables as JSON text
//!
//! [`render`] turns a table into the selected [`DataFormat`]. The records
//! splitter [`split_records`] is shared by every spreadsheet-like source so
//! that downstream consumers chunk rows the same way.

use std::io;

use arrow::json::writer::{JsonArray, LineDelimited};
use arrow::json::WriterBuilder;
use itertools::Itertools;

use crate::config::DataFormat;
use crate::error::Result;
use crate::table::{DataOutput, Table};

/// Serialize a table as newline-delimited JSON objects, one line per row
///
/// Every object carries every column; null cells are written as `null`.
pub fn to_json_lines(table: &Table) -> Result<Vec<String>> {
    let mut writer = WriterBuilder::new()
        .with_explicit_nulls(true)
        .build::<_, LineDelimited>(Vec::new());
    writer.write(table)?;
    writer.finish()?;
    let text = utf8(writer.into_inner())?;
    Ok(text.lines().map(str::to_owned).collect())
}

/// Serialize a table as a single JSON array of row objects
pub fn to_json_array(table: &Table) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .with_explicit_nulls(true)
        .build::<_, JsonArray>(Vec::new());
    writer.write(table)?;
    writer.finish()?;
    utf8(writer.into_inner())
}

fn utf8(buffer: Vec<u8>) -> Result<String> {
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}

/// Group record lines into output items
///
/// Every `samples_per_line` consecutive lines are joined with `\n` into one
/// item; the last item may hold fewer. A value of 0 is treated as 1.
#[must_use]
pub fn split_records(lines: Vec<String>, samples_per_line: usize) -> Vec<String> {
    let per_line = samples_per_line.clamp(1, lines.len().max(1));
    if per_line == 1 {
        return lines;
    }
    lines.chunks(per_line).map(|chunk| chunk.join("\n")).collect()
}

/// Split text into pieces of `min(text length, chars_per_line)` characters
///
/// Lengths count characters, not bytes, so pieces never split a UTF-8
/// sequence. The last piece may be shorter; empty text yields no pieces.
/// Pieces are not aligned to JSON tokens. A value of 0 is treated as 1.
#[must_use]
pub fn chunk_text(text: &str, chars_per_line: usize) -> Vec<String> {
    let size = text.chars().count().min(chars_per_line.max(1));
    if size == 0 {
        return Vec::new();
    }

    let chunks = text.chars().chunks(size);
    let mut pieces = Vec::new();
    for chunk in &chunks {
        pieces.push(chunk.collect::<String>());
    }
    pieces
}

/// Render a table in the given format
pub fn render(table: &Table, format: DataFormat, samples_per_line: usize) -> Result<DataOutput> {
    let output = match format {
        DataFormat::Dataframe => DataOutput::Dataframe(table.clone()),
        DataFormat::Records => {
            DataOutput::Records(split_records(to_json_lines(table)?, samples_per_line))
        }
        DataFormat::Json => DataOutput::Json(chunk_text(&to_json_array(table)?, samples_per_line)),
    };
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{ArrayRef, Int64Array, StringArray};
    use std::sync::Arc;

    fn table() -> Table {
        Table::try_from_iter(vec![
            ("id", Arc::new(Int64Array::from(vec![1, 2, 3])) as ArrayRef),
            (
                "name",
                Arc::new(StringArray::from(vec![Some("ä"), None, Some("c")])) as ArrayRef,
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_json_lines_one_per_row() {
        let lines = to_json_lines(&table()).unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], r#"{"id":1,"name":"ä"}"#);
        assert_eq!(lines[1], r#"{"id":2,"name":null}"#);
    }

    #[test]
    fn test_all_null_row_keeps_keys() {
        let table = Table::try_from_iter(vec![(
            "name",
            Arc::new(StringArray::from(vec![None::<&str>])) as ArrayRef,
        )])
        .unwrap();
        assert_eq!(to_json_lines(&table).unwrap(), vec![r#"{"name":null}"#]);
        assert_eq!(to_json_array(&table).unwrap(), r#"[{"name":null}]"#);
    }

    #[test]
    fn test_json_array() {
        let text = to_json_array(&table()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn test_split_records() {
        let lines = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(split_records(lines.clone(), 1), lines);
        assert_eq!(split_records(lines.clone(), 2), vec!["a\nb", "c"]);
        assert_eq!(split_records(lines.clone(), 10), vec!["a\nb\nc"]);
        assert_eq!(split_records(lines.clone(), 0), lines);
        assert!(split_records(Vec::new(), 3).is_empty());
    }

    #[test]
    fn test_chunk_text() {
        assert_eq!(chunk_text("[1,2]", 2), vec!["[1", ",2", "]"]);
        assert_eq!(chunk_text("[1,2]", 100), vec!["[1,2]"]);
        assert_eq!(chunk_text("äöü", 1), vec!["ä", "ö", "ü"]);
        assert!(chunk_text("", 4).is_empty());
    }

    #[test]
    fn test_chunk_text_zero_size_is_one() {
        assert_eq!(chunk_text("[1]", 0), chunk_text("[1]", 1));
        assert_eq!(chunk_text("[1]", 0).concat(), "[1]");
        assert!(chunk_text("", 0).is_empty());
    }

    #[test]
    fn test_render_json_concatenates_to_array() {
        let table = table();
        let output = render(&table, DataFormat::Json, 1).unwrap();
        let whole = to_json_array(&table).unwrap();

        let lines = output.as_lines().unwrap();
        assert_eq!(lines.len(), whole.chars().count());
        assert_eq!(lines.concat(), whole);
    }

    #[test]
    fn test_render_dataframe_is_unchanged() {
        let table = table();
        let output = render(&table, DataFormat::Dataframe, 1).unwrap();
        assert_eq!(output.as_table(), Some(&table));
    }
}
