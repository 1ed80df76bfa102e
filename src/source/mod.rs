//! Column-oriented data sources
//!
//! A [`DataSource`] maps field names to columns. Plots and annotations
//! declare which fields they need; [`DataSource::check_fields`] enforces it.
//!
//! Columns come in four shapes:
//! - numbers (`x`, `y`, `y0`, ...)
//! - text (`text` for labels, `dimension` for spans, custom tooltip fields)
//! - ragged lines (`xs`/`ys` for multi-line plots, one array per line)
//! - images (`image`, exactly one n-dimensional array)

mod image;

pub use image::{ImageArray, ImageDtype};

use crate::{PlotskiError, Result};
use std::collections::BTreeMap;

/// A single column of a data source
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Number(Vec<f64>),
    Text(Vec<String>),
    Lines(Vec<Vec<f64>>),
    Image(Vec<ImageArray>),
}

impl Column {
    /// Number of entries (rows, lines or images)
    pub fn len(&self) -> usize {
        match self {
            Column::Number(v) => v.len(),
            Column::Text(v) => v.len(),
            Column::Lines(v) => v.len(),
            Column::Image(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Column::Number(_) => "number",
            Column::Text(_) => "text",
            Column::Lines(_) => "lines",
            Column::Image(_) => "image",
        }
    }

    pub fn as_numbers(&self) -> Option<&[f64]> {
        match self {
            Column::Number(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&[String]> {
        match self {
            Column::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_lines(&self) -> Option<&[Vec<f64>]> {
        match self {
            Column::Lines(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_images(&self) -> Option<&[ImageArray]> {
        match self {
            Column::Image(v) => Some(v),
            _ => None,
        }
    }

    /// All numeric values held by the column, flattening ragged lines
    pub fn numeric_values(&self) -> Vec<f64> {
        match self {
            Column::Number(v) => v.clone(),
            Column::Lines(lines) => lines.iter().flatten().copied().collect(),
            Column::Image(images) => images.iter().flat_map(|i| i.values()).collect(),
            Column::Text(_) => Vec::new(),
        }
    }
}

impl From<Vec<f64>> for Column {
    fn from(value: Vec<f64>) -> Self {
        Column::Number(value)
    }
}

impl From<Vec<i64>> for Column {
    fn from(value: Vec<i64>) -> Self {
        Column::Number(value.into_iter().map(|v| v as f64).collect())
    }
}

impl From<Vec<i32>> for Column {
    fn from(value: Vec<i32>) -> Self {
        Column::Number(value.into_iter().map(f64::from).collect())
    }
}

impl From<Vec<String>> for Column {
    fn from(value: Vec<String>) -> Self {
        Column::Text(value)
    }
}

impl From<Vec<&str>> for Column {
    fn from(value: Vec<&str>) -> Self {
        Column::Text(value.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<Vec<f64>>> for Column {
    fn from(value: Vec<Vec<f64>>) -> Self {
        Column::Lines(value)
    }
}

impl From<Vec<ImageArray>> for Column {
    fn from(value: Vec<ImageArray>) -> Self {
        Column::Image(value)
    }
}

impl From<ImageArray> for Column {
    fn from(value: ImageArray) -> Self {
        Column::Image(vec![value])
    }
}

/// Column-oriented mapping of field name to array
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSource {
    columns: BTreeMap<String, Column>,
}

impl DataSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with_column(mut self, name: impl Into<String>, column: impl Into<Column>) -> Self {
        self.insert(name, column);
        self
    }

    /// Insert or replace a column
    pub fn insert(&mut self, name: impl Into<String>, column: impl Into<Column>) {
        self.columns.insert(name.into(), column.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<Column> {
        self.columns.remove(name)
    }

    /// Rename a field, replacing any existing column with the new name
    pub fn rename(&mut self, from: &str, to: &str) -> Result<()> {
        let column = self.columns.remove(from).ok_or_else(|| {
            PlotskiError::ValidationError(format!(
                "Cannot rename missing field '{}'. Available fields: {}",
                from,
                self.field_names().join(", ")
            ))
        })?;
        self.columns.insert(to.to_string(), column);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.columns.keys().map(String::as_str).collect()
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Fail unless every field in `keys` is present
    ///
    /// Number and text fields of unequal length are logged; the short ones
    /// are padded with nulls when written.
    pub fn check_fields(&self, keys: &[&str]) -> Result<()> {
        let missing: Vec<&str> = keys.iter().copied().filter(|k| !self.contains(k)).collect();
        if !missing.is_empty() {
            return Err(PlotskiError::ValidationError(format!(
                "Missing '{}' from the data source",
                missing.join(", ")
            )));
        }
        if let Some(lengths) = self.unequal_lengths(keys) {
            tracing::warn!("Fields have different lengths: {}", lengths);
        }
        Ok(())
    }

    /// `"x: 3, y: 2"` when the number/text fields in `keys` differ in length
    fn unequal_lengths(&self, keys: &[&str]) -> Option<String> {
        let lengths: Vec<(&str, usize)> = keys
            .iter()
            .filter_map(|k| match self.columns.get(*k) {
                Some(column @ (Column::Number(_) | Column::Text(_))) => Some((*k, column.len())),
                _ => None,
            })
            .collect();
        let first = lengths.first()?.1;
        if lengths.iter().all(|(_, len)| *len == first) {
            return None;
        }
        Some(
            lengths
                .iter()
                .map(|(k, len)| format!("{}: {}", k, len))
                .collect::<Vec<_>>()
                .join(", "),
        )
    }

    /// Numeric column by name
    pub fn numbers(&self, name: &str) -> Result<&[f64]> {
        match self.columns.get(name) {
            Some(Column::Number(v)) => Ok(v),
            Some(other) => Err(PlotskiError::ValidationError(format!(
                "Field '{}' must be numeric, got {} column",
                name,
                other.kind_name()
            ))),
            None => Err(PlotskiError::ValidationError(format!(
                "Missing '{}' from the data source",
                name
            ))),
        }
    }

    /// Text column by name
    pub fn text(&self, name: &str) -> Result<&[String]> {
        match self.columns.get(name) {
            Some(Column::Text(v)) => Ok(v),
            Some(other) => Err(PlotskiError::ValidationError(format!(
                "Field '{}' must be text, got {} column",
                name,
                other.kind_name()
            ))),
            None => Err(PlotskiError::ValidationError(format!(
                "Missing '{}' from the data source",
                name
            ))),
        }
    }

    /// The single image of the `image` field
    pub fn image(&self) -> Result<&ImageArray> {
        match self.columns.get("image") {
            Some(Column::Image(images)) if images.len() == 1 => Ok(&images[0]),
            Some(Column::Image(_)) | Some(_) => Err(PlotskiError::ValidationError(
                "Field 'image' is incorrectly set in the data source".to_string(),
            )),
            None => Err(PlotskiError::ValidationError(
                "Missing field 'image' in the data source".to_string(),
            )),
        }
    }

    /// Number of rows of the tabular (number/text) columns
    pub fn row_count(&self) -> usize {
        self.columns
            .values()
            .filter(|c| matches!(c, Column::Number(_) | Column::Text(_)))
            .map(Column::len)
            .max()
            .unwrap_or(0)
    }

    /// Fill a missing numeric field with zeros, one per entry of `like`
    pub fn fill_zeros_like(&mut self, name: &str, like: &str) -> Result<()> {
        if self.contains(name) {
            return Ok(());
        }
        let len = self
            .columns
            .get(like)
            .map(Column::len)
            .ok_or_else(|| {
                PlotskiError::ValidationError(format!("Missing '{}' from the data source", like))
            })?;
        self.insert(name, vec![0.0; len]);
        Ok(())
    }
}
