//! Encoding channels and mark properties for the Vega-Lite writer
//!
//! Positional channels share the figure's axis ranges and labels. Glyph
//! style options (line width, colours, alpha, dashes, text settings) become
//! mark properties.

use crate::plot::figure::{Figure, Glyph, GlyphKind, Tooltip, TooltipField};
use crate::plot::{OptionValue, PlotOptions};
use crate::source::Column;
use serde_json::{json, Map, Value};

/// Positional channels of a figure
pub(super) struct Axes<'a> {
    figure: &'a Figure,
}

impl<'a> Axes<'a> {
    pub(super) fn new(figure: &'a Figure) -> Self {
        Self { figure }
    }

    /// Quantitative x channel reading `field`
    pub(super) fn x(&self, field: &str) -> Value {
        channel(json!({"field": field}), self.figure.x_range, &self.figure.x_axis_label)
    }

    pub(super) fn y(&self, field: &str) -> Value {
        channel(json!({"field": field}), self.figure.y_range, &self.figure.y_axis_label)
    }

    /// Constant x position in data units
    pub(super) fn x_datum(&self, value: f64) -> Value {
        channel(json!({"datum": value}), self.figure.x_range, &self.figure.x_axis_label)
    }

    pub(super) fn y_datum(&self, value: f64) -> Value {
        channel(json!({"datum": value}), self.figure.y_range, &self.figure.y_axis_label)
    }
}

fn channel(mut base: Value, range: Option<(f64, f64)>, label: &str) -> Value {
    let scale = match range {
        Some((lo, hi)) => json!({"domain": [lo, hi], "zero": false, "nice": false}),
        None => json!({"zero": false}),
    };
    let title = if label.is_empty() {
        Value::Null
    } else {
        json!(label)
    };
    if let Value::Object(map) = &mut base {
        map.insert("type".to_string(), json!("quantitative"));
        map.insert("scale".to_string(), scale);
        map.insert("axis".to_string(), json!({"title": title}));
    }
    base
}

/// Secondary positional channel (x2/y2); shares the primary channel's scale
pub(super) fn secondary(field: &str) -> Value {
    json!({"field": field})
}

/// Map a glyph style option to a Vega-Lite mark property
pub(super) fn map_style_name(option: &str) -> Option<&'static str> {
    let property = match option {
        "line_color" => "stroke",
        "line_width" => "strokeWidth",
        "line_alpha" => "strokeOpacity",
        "line_dash" => "strokeDash",
        "fill_color" => "fill",
        "fill_alpha" => "fillOpacity",
        "color" | "text_color" => "color",
        "alpha" => "opacity",
        "size" => "size",
        "marker" => "shape",
        "text_font_size" => "fontSize",
        "text_align" => "align",
        "text_baseline" => "baseline",
        "angle" => "angle",
        "x_offset" => "dx",
        "y_offset" => "dy",
        _ => return None,
    };
    Some(property)
}

/// Dash pattern for a named line dash
pub(super) fn line_dash_to_stroke_dash(dash: &str) -> Option<Vec<u32>> {
    match dash {
        "solid" => None,
        "dashed" => Some(vec![6, 4]),
        "dotted" => Some(vec![2, 4]),
        "dotdash" => Some(vec![2, 4, 6, 4]),
        "dashdot" => Some(vec![6, 4, 2, 4]),
        _ => None,
    }
}

/// Font size from "10pt" / "12px" / 12
fn font_size(value: &OptionValue) -> Option<f64> {
    match value {
        OptionValue::Number(n) => Some(*n),
        OptionValue::String(s) => s
            .trim_end_matches("pt")
            .trim_end_matches("px")
            .trim()
            .parse()
            .ok(),
        _ => None,
    }
}

/// Apply style options to a mark definition
pub(super) fn apply_style(mark: &mut Map<String, Value>, style: &PlotOptions) {
    for (option, value) in style.iter() {
        let Some(property) = map_style_name(option) else {
            continue;
        };
        let converted = match (option, value) {
            ("line_dash", OptionValue::String(dash)) => match line_dash_to_stroke_dash(dash) {
                Some(pattern) => json!(pattern),
                None => continue,
            },
            ("text_font_size", v) => match font_size(v) {
                Some(size) => json!(size),
                None => continue,
            },
            // screen y grows downwards
            ("y_offset", OptionValue::Number(n)) => json!(-n),
            (_, OptionValue::Null) => continue,
            (_, v) => v.to_json(),
        };
        mark.insert(property.to_string(), converted);
    }
}

/// Fields a hover anchor point is placed at
pub(super) fn anchor_fields(kind: &GlyphKind) -> Option<(String, String)> {
    match kind {
        GlyphKind::Line { x, y } | GlyphKind::Scatter { x, y } => Some((x.clone(), y.clone())),
        GlyphKind::Segment { x1, y1, .. } => Some((x1.clone(), y1.clone())),
        GlyphKind::MultiLine { .. } | GlyphKind::Image | GlyphKind::ImageRgba => {
            Some(("x".to_string(), "y".to_string()))
        }
        _ => None,
    }
}

/// Tooltip channel for a glyph; cursor fields resolve to the anchor position
pub(super) fn tooltip_encoding(glyph: &Glyph, tooltips: &[Tooltip]) -> Value {
    let Some((x_field, y_field)) = anchor_fields(&glyph.kind) else {
        return Value::Null;
    };
    let entries: Vec<Value> = tooltips
        .iter()
        .map(|tooltip| match &tooltip.field {
            TooltipField::CursorX => json!({
                "field": x_field, "type": "quantitative", "title": tooltip.label, "format": ".2f"
            }),
            TooltipField::CursorY => json!({
                "field": y_field, "type": "quantitative", "title": tooltip.label, "format": ".2f"
            }),
            TooltipField::Data(field) => json!({
                "field": field, "type": field_type(glyph, field), "title": tooltip.label
            }),
        })
        .collect();
    json!(entries)
}

/// Vega-Lite measurement type of a glyph field
pub(super) fn field_type(glyph: &Glyph, field: &str) -> &'static str {
    match glyph.source.get(field) {
        Some(Column::Text(_)) => "nominal",
        _ if field == "rgba" => "nominal",
        _ => "quantitative",
    }
}
