use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;

use anyhow::{Context, bail};
use log::{info, warn};
use par_data::utils::logging::{create_spinner, finish_and_clear};
use par_data::{DataFormat, DataOutput, ParquetData, ParquetDataOptions, is_match_path};

const USAGE: &str = "usage: par-data <file> [dataframe|records|json] [column,column,...]";

fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next().map(PathBuf::from) else {
        bail!(USAGE);
    };
    let data_format = match args.next() {
        Some(name) => DataFormat::from_str(&name)?,
        None => DataFormat::Dataframe,
    };
    let selected_columns: Vec<String> = args
        .next()
        .map(|columns| {
            columns
                .split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    if !is_match_path(&path, None) {
        bail!("{} is not a parquet file", path.display());
    }

    let options = ParquetDataOptions::default()
        .with_data_format(data_format)
        .with_selected_columns(selected_columns);

    let spinner = create_spinner(Some(&format!("Loading {}", path.display())));
    let start = Instant::now();
    let loaded = ParquetData::from_path(&path, Some(options));
    finish_and_clear(&spinner);
    let data = loaded.with_context(|| format!("Failed to load {}", path.display()))?;

    info!(
        "Loaded {} rows and {} columns in {:?}",
        data.table().num_rows(),
        data.table().num_columns(),
        start.elapsed()
    );
    for (column, data_type) in data.original_dtypes().iter() {
        info!("  - {column} ({data_type})");
    }

    match data.data()? {
        DataOutput::Dataframe(table) => {
            println!("Total rows: {}", table.num_rows());
            if table.num_rows() == 0 {
                warn!("File contains no rows");
            }
        }
        DataOutput::Records(lines) | DataOutput::Json(lines) => {
            for line in lines {
                println!("{line}");
            }
        }
    }

    Ok(())
}
