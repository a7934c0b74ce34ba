//! Parquet format detection.
//!
//! A source matches when its footer metadata can be parsed by the Parquet
//! reader. Detection never fails: every error becomes `false`. Seekable
//! streams are returned to the position they had on entry.

use std::fmt;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use parquet::file::FOOTER_SIZE;
use parquet::file::metadata::ParquetMetaDataReader;
use parquet::file::reader::SerializedFileReader;

use crate::config::ParquetDataOptions;
use crate::error::{ParquetDataError, Result};

/// A readable and seekable byte source
pub trait ReadSeek: Read + Seek {}

impl<T: Read + Seek> ReadSeek for T {}

/// Something that may hold Parquet data
pub enum DataSource<'a> {
    /// A file on disk
    Path(&'a Path),
    /// An open stream, e.g. a `Cursor` over an in-memory buffer
    Stream(&'a mut dyn ReadSeek),
}

impl fmt::Debug for DataSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

/// Check whether a source holds a valid Parquet file
///
/// `options` is accepted so every detector shares one signature; Parquet
/// detection does not depend on it.
pub fn is_match_source(source: DataSource<'_>, options: Option<&ParquetDataOptions>) -> bool {
    match source {
        DataSource::Path(path) => is_match_path(path, options),
        DataSource::Stream(stream) => is_match(stream, options),
    }
}

/// Check whether the file at `path` is a valid Parquet file
pub fn is_match_path(path: &Path, _options: Option<&ParquetDataOptions>) -> bool {
    let result: Result<SerializedFileReader<File>> = File::open(path)
        .map_err(Into::into)
        .and_then(|file| SerializedFileReader::new(file).map_err(Into::into));

    match result {
        Ok(_) => true,
        Err(e) => {
            log_probe_failure(&path.display(), &e);
            false
        }
    }
}

/// Check whether a seekable stream holds a valid Parquet file
///
/// Only the footer is read: the 8-byte tail, then the metadata it points
/// at. The current position does not matter and is restored before
/// returning.
pub fn is_match<R: Read + Seek + ?Sized>(
    reader: &mut R,
    _options: Option<&ParquetDataOptions>,
) -> bool {
    let start = match reader.stream_position() {
        Ok(position) => position,
        Err(e) => {
            log::debug!("Could not read stream position: {e}");
            return false;
        }
    };

    let probe = probe_stream(reader);

    if let Err(e) = reader.seek(SeekFrom::Start(start)) {
        log::debug!("Could not restore stream position {start}: {e}");
        return false;
    }

    match probe {
        Ok(()) => true,
        Err(e) => {
            log_probe_failure(&"stream", &e);
            false
        }
    }
}

fn probe_stream<R: Read + Seek + ?Sized>(reader: &mut R) -> Result<()> {
    let len = reader.seek(SeekFrom::End(0))?;
    // leading magic plus footer tail
    let min_len = (FOOTER_SIZE + 4) as u64;
    if len < min_len {
        return Err(ParquetDataError::InvalidDataFormat(format!(
            "{len} bytes is too short for a parquet file"
        )));
    }

    let mut tail = [0u8; FOOTER_SIZE];
    reader.seek(SeekFrom::Start(len - FOOTER_SIZE as u64))?;
    reader.read_exact(&mut tail)?;
    let footer = ParquetMetaDataReader::decode_footer_tail(&tail)?;
    if footer.is_encrypted_footer() {
        return Err(ParquetDataError::InvalidDataFormat(
            "encrypted footers are not supported".to_string(),
        ));
    }

    let metadata_len = footer.metadata_length() as u64;
    if metadata_len > len - min_len {
        return Err(ParquetDataError::InvalidDataFormat(format!(
            "metadata length {metadata_len} exceeds file size {len}"
        )));
    }

    let mut metadata = vec![0u8; footer.metadata_length()];
    reader.seek(SeekFrom::Start(len - FOOTER_SIZE as u64 - metadata_len))?;
    reader.read_exact(&mut metadata)?;
    ParquetMetaDataReader::decode_metadata(&metadata)?;
    Ok(())
}

fn log_probe_failure(source: &dyn fmt::Display, error: &ParquetDataError) {
    log::debug!("Not a parquet source ({source}): {error}");
}
