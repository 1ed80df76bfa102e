//! Inline data for the Vega-Lite writer
//!
//! Every glyph contributes rows to one unified dataset. Each row carries the
//! glyph id in [`SOURCE_COLUMN`] so layers can filter their own rows back out.

use crate::palettes::ColorMapper;
use crate::plot::figure::{Glyph, GlyphKind};
use crate::source::{Column, DataSource, ImageArray};
use crate::{PlotskiError, Result};
use serde_json::{json, Map, Value};

/// Glyph id of the row
pub(super) const SOURCE_COLUMN: &str = "__plotski_source__";
/// Position of the row within its glyph (draw order for lines and patches)
pub(super) const INDEX_COLUMN: &str = "__plotski_index__";
/// Line number of multi-line rows
pub(super) const LINE_COLUMN: &str = "__plotski_line__";
/// Legend label of the row's glyph
pub(super) const SERIES_COLUMN: &str = "__plotski_series__";

/// Rows contributed by a glyph; boxes and spans carry their own datum
pub(super) fn glyph_rows(
    glyph: &Glyph,
    mapper: Option<&ColorMapper>,
    series: Option<&str>,
) -> Result<Vec<Value>> {
    let mut rows = match &glyph.kind {
        GlyphKind::Box(_) | GlyphKind::Span { .. } => return Ok(Vec::new()),
        GlyphKind::MultiLine { xs, ys } => multi_line_rows(&glyph.source, xs, ys)?,
        GlyphKind::Image => image_rows(&glyph.source, mapper)?,
        GlyphKind::ImageRgba => rgba_rows(&glyph.source)?,
        _ => tabular_rows(&glyph.source),
    };

    for row in rows.iter_mut() {
        row.insert(SOURCE_COLUMN.to_string(), json!(glyph.id));
        if let Some(series) = series {
            row.insert(SERIES_COLUMN.to_string(), json!(series));
        }
    }
    Ok(rows.into_iter().map(Value::Object).collect())
}

fn cell(column: &Column, idx: usize) -> Value {
    match column {
        Column::Number(values) => values.get(idx).map_or(Value::Null, |v| json!(v)),
        Column::Text(values) => values.get(idx).map_or(Value::Null, |v| json!(v)),
        _ => Value::Null,
    }
}

/// One row per entry of the number/text columns
fn tabular_rows(source: &DataSource) -> Vec<Map<String, Value>> {
    let columns: Vec<(&str, &Column)> = source
        .columns()
        .filter(|(_, c)| matches!(c, Column::Number(_) | Column::Text(_)))
        .collect();

    (0..source.row_count())
        .map(|idx| {
            let mut row = Map::new();
            for (name, column) in &columns {
                row.insert(name.to_string(), cell(column, idx));
            }
            row.insert(INDEX_COLUMN.to_string(), json!(idx));
            row
        })
        .collect()
}

/// One row per point; per-line columns (colors, alpha, line_id, ...) repeat on every point
fn multi_line_rows(source: &DataSource, xs: &str, ys: &str) -> Result<Vec<Map<String, Value>>> {
    let lines = |name: &str| {
        source.get(name).and_then(Column::as_lines).ok_or_else(|| {
            PlotskiError::WriterError(format!("Field '{}' must hold one array per line", name))
        })
    };
    let (xs, ys) = (lines(xs)?, lines(ys)?);
    let per_line: Vec<(&str, &Column)> = source
        .columns()
        .filter(|(_, c)| matches!(c, Column::Number(_) | Column::Text(_)) && c.len() == xs.len())
        .collect();

    let mut rows = Vec::new();
    for (line, (x_values, y_values)) in xs.iter().zip(ys.iter()).enumerate() {
        for (idx, (x, y)) in x_values.iter().zip(y_values.iter()).enumerate() {
            let mut row = Map::new();
            row.insert("x".to_string(), json!(x));
            row.insert("y".to_string(), json!(y));
            for (name, column) in &per_line {
                row.insert(name.to_string(), cell(column, line));
            }
            row.insert(LINE_COLUMN.to_string(), json!(line));
            row.insert(INDEX_COLUMN.to_string(), json!(idx));
            rows.push(row);
        }
    }
    Ok(rows)
}

/// Placement (x, y, dw, dh) of an image glyph in data units
struct Placement {
    x: f64,
    y: f64,
    cell_width: f64,
    cell_height: f64,
}

impl Placement {
    fn new(source: &DataSource, image: &ImageArray) -> Self {
        let first = |name: &str, default: f64| {
            source
                .numbers(name)
                .ok()
                .and_then(|v| v.first().copied())
                .unwrap_or(default)
        };
        let (width, height) = (image.width().max(1) as f64, image.height().max(1) as f64);
        Self {
            x: first("x", 0.0),
            y: first("y", 0.0),
            cell_width: first("dw", width) / width,
            cell_height: first("dh", height) / height,
        }
    }

    /// Cell rectangle; row 0 is drawn at the bottom
    fn cell(&self, row: usize, col: usize) -> Map<String, Value> {
        let mut map = Map::new();
        let x0 = self.x + col as f64 * self.cell_width;
        let y0 = self.y + row as f64 * self.cell_height;
        map.insert("x".to_string(), json!(x0));
        map.insert("x2".to_string(), json!(x0 + self.cell_width));
        map.insert("y".to_string(), json!(y0));
        map.insert("y2".to_string(), json!(y0 + self.cell_height));
        map
    }
}

fn image_rows(source: &DataSource, mapper: Option<&ColorMapper>) -> Result<Vec<Map<String, Value>>> {
    let image = source.image()?;
    let placement = Placement::new(source, image);

    let mut rows = Vec::with_capacity(image.height() * image.width());
    for row in 0..image.height() {
        for col in 0..image.width() {
            let value = image.value_at(row, col).unwrap_or(f64::NAN);
            let mut cell = placement.cell(row, col);
            cell.insert("image".to_string(), json!(value));
            if let Some(color) = mapper.and_then(|m| m.color_for(value)) {
                cell.insert("color".to_string(), json!(color));
            }
            rows.push(cell);
        }
    }
    Ok(rows)
}

fn rgba_rows(source: &DataSource) -> Result<Vec<Map<String, Value>>> {
    let image = source.image()?;
    let placement = Placement::new(source, image);
    let intensity = source
        .get("intensity")
        .and_then(Column::as_images)
        .and_then(|images| images.first());

    let mut rows = Vec::with_capacity(image.height() * image.width());
    for row in 0..image.height() {
        for col in 0..image.width() {
            let Some([r, g, b, a]) = image.rgba_at(row, col) else {
                continue;
            };
            let mut cell = placement.cell(row, col);
            cell.insert(
                "color".to_string(),
                json!(format!("rgba({}, {}, {}, {:.3})", r, g, b, a as f64 / 255.0)),
            );
            cell.insert("rgba".to_string(), json!(format!("{}, {}, {}, {}", r, g, b, a)));
            // packed little-endian RGBA
            let packed = u32::from_le_bytes([r, g, b, a]);
            cell.insert("image".to_string(), json!(packed));
            if let Some(value) = intensity.and_then(|i| i.value_at(row, col)) {
                cell.insert("intensity".to_string(), json!(value));
            }
            rows.push(cell);
        }
    }
    Ok(rows)
}
