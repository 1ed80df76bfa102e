//! Tabular input for plots
//!
//! Reads CSV/Parquet files into Polars DataFrames and converts DataFrames
//! into [`DataSource`]s:
//!
//! - numeric and boolean columns -> [`Column::Number`] (nulls become NaN)
//! - string columns -> [`Column::Text`]
//! - list columns -> [`Column::Lines`] (for multi-line `xs`/`ys`)
//! - anything else -> [`Column::Text`] using the value's display form
//!
//! # Example
//!
//! ```rust,ignore
//! use plotski::reader::{read_file, to_data_source};
//!
//! let df = read_file("spectrum.csv")?;
//! let source = to_data_source(&df)?;
//! ```

use std::path::Path;

use polars::prelude::*;

use crate::source::{Column as SourceColumn, DataSource};
use crate::{PlotskiError, Result};

/// Supported input formats, detected from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Parquet,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        match extension.as_str() {
            "csv" | "tsv" | "txt" => Ok(FileFormat::Csv),
            "parquet" | "pq" => Ok(FileFormat::Parquet),
            _ => Err(PlotskiError::ReaderError(format!(
                "Unsupported file format: '{}' (supported: csv, tsv, txt, parquet)",
                extension
            ))),
        }
    }
}

/// Read a CSV or Parquet file into a DataFrame
pub fn read_file(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    let format = FileFormat::from_path(path)?;
    tracing::debug!("Reading {} as {:?}", path.display(), format);

    match format {
        FileFormat::Csv => read_csv(path),
        FileFormat::Parquet => read_parquet(path),
    }
}

#[cfg(feature = "csv")]
fn read_csv(path: &Path) -> Result<DataFrame> {
    let separator = match path.extension().and_then(|e| e.to_str()) {
        Some("tsv") => b'\t',
        _ => b',',
    };
    CsvReadOptions::default()
        .with_has_header(true)
        .map_parse_options(|opts| opts.with_separator(separator))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish())
        .map_err(|e| {
            PlotskiError::ReaderError(format!("Failed to read CSV {}: {}", path.display(), e))
        })
}

#[cfg(not(feature = "csv"))]
fn read_csv(path: &Path) -> Result<DataFrame> {
    Err(PlotskiError::ReaderError(format!(
        "CSV support not compiled in, cannot read {}. Rebuild with --features csv",
        path.display()
    )))
}

#[cfg(feature = "parquet")]
fn read_parquet(path: &Path) -> Result<DataFrame> {
    let file = std::fs::File::open(path)?;
    ParquetReader::new(file).finish().map_err(|e| {
        PlotskiError::ReaderError(format!("Failed to read Parquet {}: {}", path.display(), e))
    })
}

#[cfg(not(feature = "parquet"))]
fn read_parquet(path: &Path) -> Result<DataFrame> {
    Err(PlotskiError::ReaderError(format!(
        "Parquet support not compiled in, cannot read {}. Rebuild with --features parquet",
        path.display()
    )))
}

/// Convert every column of a DataFrame into a data source field
pub fn to_data_source(df: &DataFrame) -> Result<DataSource> {
    let mut source = DataSource::new();
    for column in df.get_columns() {
        let name = column.name().to_string();
        source.insert(name, convert_column(column)?);
    }
    Ok(source)
}

fn convert_column(column: &Column) -> Result<SourceColumn> {
    let series = column.as_materialized_series();
    let name = series.name().to_string();

    match series.dtype() {
        DataType::String => {
            let ca = series.str().map_err(|e| {
                PlotskiError::ReaderError(format!("Failed to read '{}' as string: {}", name, e))
            })?;
            Ok(SourceColumn::Text(
                ca.into_iter()
                    .map(|v| v.unwrap_or_default().to_string())
                    .collect(),
            ))
        }
        DataType::List(_) => {
            let ca = series.list().map_err(|e| {
                PlotskiError::ReaderError(format!("Failed to read '{}' as list: {}", name, e))
            })?;
            let mut lines = Vec::with_capacity(ca.len());
            for inner in ca.into_iter() {
                let values = match inner {
                    Some(inner) => series_to_f64(&inner, &name)?,
                    None => Vec::new(),
                };
                lines.push(values);
            }
            Ok(SourceColumn::Lines(lines))
        }
        dtype if dtype.is_bool() || dtype.is_primitive_numeric() => {
            Ok(SourceColumn::Number(series_to_f64(series, &name)?))
        }
        other => {
            tracing::debug!("Converting unsupported Polars type {:?} of '{}' to text", other, name);
            let values = (0..series.len())
                .map(|idx| match series.get(idx) {
                    Ok(AnyValue::Null) | Err(_) => String::new(),
                    Ok(v) => v.to_string(),
                })
                .collect();
            Ok(SourceColumn::Text(values))
        }
    }
}

fn series_to_f64(series: &Series, name: &str) -> Result<Vec<f64>> {
    let cast = series.cast(&DataType::Float64).map_err(|e| {
        PlotskiError::ReaderError(format!("Failed to cast '{}' to f64: {}", name, e))
    })?;
    let ca = cast.f64().map_err(|e| {
        PlotskiError::ReaderError(format!("Failed to read '{}' as f64: {}", name, e))
    })?;
    Ok(ca.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
}

/// Build an image array from all numeric columns of a DataFrame (rows x columns)
pub fn to_image(df: &DataFrame) -> Result<crate::source::ImageArray> {
    let mut columns = Vec::new();
    for column in df.get_columns() {
        let series = column.as_materialized_series();
        let dtype = series.dtype();
        if dtype.is_primitive_numeric() || dtype.is_bool() {
            columns.push(series_to_f64(series, series.name().as_str())?);
        }
    }
    if columns.is_empty() {
        return Err(PlotskiError::ReaderError(
            "DataFrame has no numeric columns to build an image from".to_string(),
        ));
    }
    let height = df.height();
    let width = columns.len();
    let array = ndarray::Array2::from_shape_fn((height, width), |(row, col)| columns[col][row]);
    Ok(array.into())
}
