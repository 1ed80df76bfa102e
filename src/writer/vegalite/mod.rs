//! Vega-Lite JSON writer implementation
//!
//! Converts a [`Figure`] into a layered Vega-Lite v6 specification for
//! rendering with vega-embed.
//!
//! # Mapping Strategy
//!
//! - glyphs -> one layer each, reading their rows from a unified dataset
//! - glyph style options -> mark properties
//! - hover tools -> transparent point layers carrying tooltips
//! - navigation tools -> an interval selection bound to the scales
//! - legend -> a series channel with a legend-bound point selection
//!
//! # Example
//!
//! ```rust,ignore
//! use plotski::writer::{Writer, VegaLiteWriter};
//!
//! let spec = VegaLiteWriter::new().write(plot.figure())?;
//! ```

mod data;
mod encoding;

use crate::plot::figure::{Figure, Glyph, GlyphKind, HoverMode, HoverTool, SpanDimension};
use crate::writer::Writer;
use crate::{PlotskiError, Result};
use data::{glyph_rows, INDEX_COLUMN, LINE_COLUMN, SERIES_COLUMN, SOURCE_COLUMN};
use encoding::{anchor_fields, apply_style, secondary, tooltip_encoding, Axes};
use serde_json::{json, Map, Value};

/// Tools that pan or zoom the axes
const NAVIGATION_TOOLS: &[&str] = &[
    "pan",
    "xpan",
    "ypan",
    "box_zoom",
    "xbox_zoom",
    "ybox_zoom",
    "wheel_zoom",
    "xwheel_zoom",
];

const LEGEND_PARAM: &str = "legend";

/// Vega-Lite JSON writer
///
/// Generates Vega-Lite v6 specifications from figures.
pub struct VegaLiteWriter {
    /// Vega-Lite schema version
    schema: String,
}

impl VegaLiteWriter {
    /// Create a new Vega-Lite writer with default settings
    pub fn new() -> Self {
        Self {
            schema: "https://vega.github.io/schema/vega-lite/v6.json".to_string(),
        }
    }

    fn validate(&self, figure: &Figure) -> Result<()> {
        if figure.glyphs.is_empty() {
            return Err(PlotskiError::WriterError(
                "Figure has no glyphs to draw".to_string(),
            ));
        }
        if figure.width == 0 || figure.height == 0 {
            return Err(PlotskiError::WriterError(format!(
                "Figure size must be positive, got {}x{}",
                figure.width, figure.height
            )));
        }
        for hover in &figure.hover_tools {
            for name in &hover.renderers {
                if figure.select(name).is_empty() {
                    return Err(PlotskiError::WriterError(format!(
                        "Hover tool refers to unknown renderer '{}'",
                        name
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Default for VegaLiteWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer<Figure> for VegaLiteWriter {
    type Output = Value;

    fn write(&self, figure: &Figure) -> Result<Value> {
        self.validate(figure)?;

        let mut values = Vec::new();
        for glyph in &figure.glyphs {
            let mapper = match glyph.kind {
                GlyphKind::Image => figure.color_mapper.as_ref(),
                _ => None,
            };
            values.extend(glyph_rows(glyph, mapper, series_label(figure, glyph))?);
        }

        let axes = Axes::new(figure);
        let mut layers: Vec<Value> = figure
            .glyphs
            .iter()
            .map(|glyph| glyph_layer(figure, &axes, glyph))
            .collect();

        for (idx, hover) in figure.hover_tools.iter().enumerate() {
            for glyph in hover_targets(figure, hover) {
                match glyph.kind {
                    // cells are large enough to carry their own tooltip
                    GlyphKind::Image | GlyphKind::ImageRgba => {
                        let position = figure.glyphs.iter().position(|g| g.id == glyph.id);
                        if let Some(layer) = position.and_then(|p| layers.get_mut(p)) {
                            layer["encoding"]["tooltip"] = tooltip_encoding(glyph, &hover.tooltips);
                        }
                    }
                    _ => {
                        let name = format!("hover_{}_{}", idx, layers.len());
                        if let Some(layer) = hover_layer(&axes, glyph, hover, &name) {
                            layers.push(layer);
                        }
                    }
                }
            }
        }

        if let Some(navigate) = navigation_params(figure) {
            if let Some(first) = layers.first_mut() {
                match first["params"].as_array_mut() {
                    Some(params) => params.push(navigate),
                    None => first["params"] = json!([navigate]),
                }
            }
        }

        Ok(json!({
            "$schema": self.schema,
            "width": figure.width,
            "height": figure.height,
            "data": {"values": values},
            "layer": layers,
            "config": {"view": {"stroke": null}},
        }))
    }
}

/// Legend label of a glyph, if the figure has a legend entry for it
fn series_label<'a>(figure: &'a Figure, glyph: &Glyph) -> Option<&'a str> {
    let name = glyph.name.as_deref()?;
    figure
        .legend
        .as_ref()?
        .items
        .iter()
        .find(|(_, renderer)| renderer == name)
        .map(|(label, _)| label.as_str())
}

/// Glyphs a hover tool is attached to; unnamed renderers mean every main glyph
fn hover_targets<'a>(figure: &'a Figure, hover: &HoverTool) -> Vec<&'a Glyph> {
    if hover.renderers.is_empty() {
        return figure.glyphs.iter().filter(|g| g.name.is_some()).collect();
    }
    hover
        .renderers
        .iter()
        .flat_map(|name| figure.select(name))
        .collect()
}

fn source_filter(glyph: &Glyph) -> Value {
    json!([{"filter": {"field": SOURCE_COLUMN, "equal": glyph.id}}])
}

fn order_by_index() -> Value {
    json!({"field": INDEX_COLUMN, "type": "quantitative"})
}

/// Mark definition with the glyph's style applied over the given defaults
fn mark(mark_type: &str, defaults: Value, glyph: &Glyph) -> Value {
    let mut mark = Map::new();
    mark.insert("type".to_string(), json!(mark_type));
    mark.insert("clip".to_string(), json!(true));
    if let Value::Object(defaults) = defaults {
        mark.extend(defaults);
    }
    apply_style(&mut mark, &glyph.style);
    Value::Object(mark)
}

/// Edge pair of a box along one axis: (start, end) channel definitions
fn box_edges(
    low: Option<f64>,
    high: Option<f64>,
    datum: impl Fn(f64) -> Value,
    low_pixel: Value,
    high_pixel: Value,
) -> (Value, Value) {
    match (low, high) {
        (Some(low), Some(high)) => (datum(low), json!({"datum": high})),
        (Some(low), None) => (datum(low), json!({"value": high_pixel})),
        (None, Some(high)) => (datum(high), json!({"value": low_pixel})),
        (None, None) => (json!({"value": low_pixel}), json!({"value": high_pixel})),
    }
}

fn glyph_layer(figure: &Figure, axes: &Axes<'_>, glyph: &Glyph) -> Value {
    let mut layer = match &glyph.kind {
        GlyphKind::Line { x, y } => json!({
            "mark": mark("line", json!({}), glyph),
            "encoding": {"x": axes.x(x), "y": axes.y(y), "order": order_by_index()},
        }),
        GlyphKind::Scatter { x, y } => json!({
            "mark": mark("point", json!({"filled": true}), glyph),
            "encoding": {"x": axes.x(x), "y": axes.y(y)},
        }),
        GlyphKind::Segment { x0, y0, x1, y1 } => json!({
            "mark": mark("rule", json!({}), glyph),
            "encoding": {
                "x": axes.x(x0),
                "y": axes.y(y0),
                "x2": secondary(x1),
                "y2": secondary(y1),
            },
        }),
        GlyphKind::MultiLine { .. } => {
            let mut encoding = json!({
                "x": axes.x("x"),
                "y": axes.y("y"),
                "detail": {"field": LINE_COLUMN, "type": "nominal"},
                "order": order_by_index(),
            });
            if glyph.source.contains("colors") {
                encoding["stroke"] =
                    json!({"field": "colors", "type": "nominal", "scale": null, "legend": null});
            }
            if glyph.source.contains("alpha") {
                encoding["strokeOpacity"] =
                    json!({"field": "alpha", "type": "quantitative", "scale": null, "legend": null});
            }
            json!({"mark": mark("line", json!({}), glyph), "encoding": encoding})
        }
        GlyphKind::Image => {
            let color = match &figure.color_mapper {
                Some(mapper) => json!({
                    "field": "image",
                    "type": "quantitative",
                    "scale": {"domain": [mapper.low, mapper.high], "range": mapper.palette},
                    "legend": if figure.color_bar { json!({"title": null}) } else { Value::Null },
                }),
                None => json!({"field": "color", "type": "nominal", "scale": null, "legend": null}),
            };
            json!({
                "mark": mark("rect", json!({}), glyph),
                "encoding": {
                    "x": axes.x("x"),
                    "x2": secondary("x2"),
                    "y": axes.y("y"),
                    "y2": secondary("y2"),
                    "color": color,
                },
            })
        }
        GlyphKind::ImageRgba => json!({
            "mark": mark("rect", json!({}), glyph),
            "encoding": {
                "x": axes.x("x"),
                "x2": secondary("x2"),
                "y": axes.y("y"),
                "y2": secondary("y2"),
                "color": {"field": "color", "type": "nominal", "scale": null, "legend": null},
            },
        }),
        GlyphKind::Band => json!({
            "mark": mark("area", json!({"fill": "#1f77b4", "fillOpacity": 0.4}), glyph),
            "encoding": {
                "x": axes.x("base"),
                "y": axes.y("lower"),
                "y2": secondary("upper"),
                "order": order_by_index(),
            },
        }),
        GlyphKind::Box(edges) => {
            let (x, x2) = box_edges(edges.left, edges.right, |v| axes.x_datum(v), json!(0), json!("width"));
            let (y, y2) = box_edges(edges.bottom, edges.top, |v| axes.y_datum(v), json!("height"), json!(0));
            json!({
                "data": {"values": [{}]},
                "mark": mark("rect", json!({"fill": "#fff9ba", "fillOpacity": 0.4}), glyph),
                "encoding": {"x": x, "x2": x2, "y": y, "y2": y2},
            })
        }
        GlyphKind::Span {
            location,
            dimension,
        } => {
            let encoding = match dimension {
                SpanDimension::Height => json!({"x": axes.x_datum(*location)}),
                SpanDimension::Width => json!({"y": axes.y_datum(*location)}),
            };
            json!({
                "data": {"values": [{}]},
                "mark": mark("rule", json!({}), glyph),
                "encoding": encoding,
            })
        }
        GlyphKind::Labels => json!({
            "mark": mark("text", json!({}), glyph),
            "encoding": {
                "x": axes.x("x"),
                "y": axes.y("y"),
                "text": {"field": "text", "type": "nominal"},
            },
        }),
        GlyphKind::Patch => json!({
            "mark": mark(
                "line",
                json!({"interpolate": "linear-closed", "fill": "#1f77b4", "fillOpacity": 0.4}),
                glyph,
            ),
            "encoding": {"x": axes.x("x"), "y": axes.y("y"), "order": order_by_index()},
        }),
    };

    if !matches!(glyph.kind, GlyphKind::Box(_) | GlyphKind::Span { .. }) {
        layer["transform"] = source_filter(glyph);
    }
    if series_label(figure, glyph).is_some() {
        apply_legend(figure, glyph, &mut layer);
    }
    layer
}

/// Colour the glyph by its legend label and let clicks on the legend highlight it
fn apply_legend(figure: &Figure, glyph: &Glyph, layer: &mut Value) {
    let Some(legend) = &figure.legend else {
        return;
    };
    let colors: Vec<Value> = legend
        .items
        .iter()
        .map(|(_, name)| {
            figure
                .select(name)
                .first()
                .and_then(|g| g.style.get("line_color"))
                .map(|c| c.to_json())
                .unwrap_or_else(|| json!("#000000"))
        })
        .collect();
    let labels: Vec<&str> = legend.items.iter().map(|(label, _)| label.as_str()).collect();
    let orient = if legend.horizontal { "top" } else { "right" };
    let direction = if legend.horizontal { "horizontal" } else { "vertical" };

    layer["encoding"]["stroke"] = json!({
        "field": SERIES_COLUMN,
        "type": "nominal",
        "scale": {"domain": labels, "range": colors},
        "legend": {"title": null, "orient": orient, "direction": direction},
    });
    layer["encoding"]["opacity"] = json!({
        "condition": {"param": LEGEND_PARAM, "value": 1},
        "value": 0.2,
    });

    // the selection lives on the first legend layer only
    let first = legend
        .items
        .first()
        .and_then(|(_, name)| figure.select(name).first().map(|g| g.id.clone()));
    if first.as_deref() == Some(glyph.id.as_str()) {
        layer["params"] = json!([{
            "name": LEGEND_PARAM,
            "select": {"type": "point", "fields": [SERIES_COLUMN]},
            "bind": "legend",
        }]);
    }
}

/// Invisible points carrying the tooltips of a hover tool
fn hover_layer(axes: &Axes<'_>, glyph: &Glyph, hover: &HoverTool, name: &str) -> Option<Value> {
    let (x, y) = anchor_fields(&glyph.kind)?;
    let mut layer = json!({
        "transform": source_filter(glyph),
        "mark": {"type": "point", "clip": true, "size": 80, "filled": true},
        "encoding": {
            "x": axes.x(&x),
            "y": axes.y(&y),
            "tooltip": tooltip_encoding(glyph, &hover.tooltips),
        },
    });
    match hover.mode {
        HoverMode::Mouse => {
            layer["encoding"]["opacity"] = json!({"value": 0});
        }
        HoverMode::VLine => {
            layer["params"] = json!([{
                "name": name,
                "select": {
                    "type": "point",
                    "encodings": ["x"],
                    "nearest": true,
                    "on": "pointerover",
                    "clear": "pointerout",
                },
            }]);
            layer["encoding"]["opacity"] = json!({
                "condition": {"param": name, "empty": false, "value": 1},
                "value": 0,
            });
        }
    }
    Some(layer)
}

/// Interval selection bound to the scales when the figure has navigation tools
fn navigation_params(figure: &Figure) -> Option<Value> {
    if !figure.tools.iter().any(|t| NAVIGATION_TOOLS.contains(&t.as_str())) {
        return None;
    }
    let x_only = figure
        .active_drag
        .as_deref()
        .is_some_and(|drag| drag.starts_with('x'));
    let encodings = if x_only { json!(["x"]) } else { json!(["x", "y"]) };
    Some(json!({
        "name": "navigate",
        "select": {"type": "interval", "encodings": encodings},
        "bind": "scales",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::figure::{BoxEdges, Legend, Tooltip};
    use crate::plot::PlotOptions;
    use crate::source::DataSource;

    fn spectrum_figure() -> Figure {
        let mut figure = Figure::new(800, 400);
        figure.x_range = Some((0.0, 10.0));
        figure.set_tools("pan, xbox_zoom, reset");
        figure.active_drag = Some("xbox_zoom".to_string());
        figure.add_glyph(
            GlyphKind::line("x", "y"),
            DataSource::new()
                .with_column("x", vec![1.0, 2.0, 3.0])
                .with_column("y", vec![4.0, 5.0, 6.0]),
            PlotOptions::new().with("line_color", "#ff0000"),
            Some("spectrum"),
        );
        figure
    }

    #[test]
    fn test_empty_figure_is_rejected() {
        let result = VegaLiteWriter::new().write(&Figure::new(800, 400));
        assert!(matches!(result, Err(PlotskiError::WriterError(_))));
    }

    #[test]
    fn test_line_layer() {
        let figure = spectrum_figure();
        let spec = VegaLiteWriter::new().write(&figure).unwrap();

        assert_eq!(spec["$schema"], json!("https://vega.github.io/schema/vega-lite/v6.json"));
        assert_eq!(spec["width"], json!(800));
        assert_eq!(spec["data"]["values"].as_array().unwrap().len(), 3);

        let layer = &spec["layer"][0];
        assert_eq!(layer["mark"]["type"], json!("line"));
        assert_eq!(layer["mark"]["stroke"], json!("#ff0000"));
        assert_eq!(layer["encoding"]["x"]["scale"]["domain"], json!([0.0, 10.0]));
        assert_eq!(
            layer["transform"][0]["filter"]["equal"],
            json!(figure.glyphs[0].id)
        );
        assert_eq!(layer["params"][0]["bind"], json!("scales"));
        assert_eq!(layer["params"][0]["select"]["encodings"], json!(["x"]));
    }

    #[test]
    fn test_hover_layer_per_tool() {
        let mut figure = spectrum_figure();
        figure.add_hover(HoverTool {
            tooltips: vec![Tooltip::data("m/z", "x"), Tooltip::data("intensity", "y")],
            renderers: vec!["spectrum".to_string()],
            mode: HoverMode::VLine,
        });
        let spec = VegaLiteWriter::new().write(&figure).unwrap();
        let layers = spec["layer"].as_array().unwrap();

        assert_eq!(layers.len(), 2);
        assert_eq!(layers[1]["encoding"]["tooltip"][0]["title"], json!("m/z"));
        assert_eq!(layers[1]["params"][0]["select"]["nearest"], json!(true));
    }

    #[test]
    fn test_unknown_hover_renderer() {
        let mut figure = spectrum_figure();
        figure.add_hover(HoverTool {
            renderers: vec!["missing".to_string()],
            ..Default::default()
        });
        assert!(VegaLiteWriter::new().write(&figure).is_err());
    }

    #[test]
    fn test_box_and_span_carry_own_data() {
        let mut figure = spectrum_figure();
        figure.add_glyph(
            GlyphKind::Box(BoxEdges {
                left: Some(1.0),
                right: Some(2.0),
                ..Default::default()
            }),
            DataSource::new(),
            PlotOptions::new(),
            None,
        );
        figure.add_glyph(
            GlyphKind::Span {
                location: 5.0,
                dimension: SpanDimension::Width,
            },
            DataSource::new(),
            PlotOptions::new(),
            None,
        );
        let spec = VegaLiteWriter::new().write(&figure).unwrap();

        let box_layer = &spec["layer"][1];
        assert_eq!(box_layer["data"]["values"], json!([{}]));
        assert_eq!(box_layer["encoding"]["x"]["datum"], json!(1.0));
        assert_eq!(box_layer["encoding"]["x2"], json!({"datum": 2.0}));
        assert_eq!(box_layer["encoding"]["y"], json!({"value": "height"}));
        assert_eq!(box_layer["mark"]["fill"], json!("#fff9ba"));
        assert!(box_layer.get("transform").is_none());

        let span_layer = &spec["layer"][2];
        assert_eq!(span_layer["mark"]["type"], json!("rule"));
        assert_eq!(span_layer["encoding"]["y"]["datum"], json!(5.0));
    }

    #[test]
    fn test_legend_series() {
        let mut figure = Figure::new(800, 400);
        let source = DataSource::new()
            .with_column("x", vec![1.0])
            .with_column("y", vec![1.0]);
        for name in ["top", "bottom"] {
            figure.add_glyph(
                GlyphKind::line("x", "y"),
                source.clone(),
                PlotOptions::new(),
                Some(name),
            );
        }
        figure.legend = Some(Legend {
            items: vec![
                ("Top".to_string(), "top".to_string()),
                ("Bottom".to_string(), "bottom".to_string()),
            ],
            horizontal: true,
        });
        let spec = VegaLiteWriter::new().write(&figure).unwrap();

        assert_eq!(spec["data"]["values"][1][SERIES_COLUMN], json!("Bottom"));
        assert_eq!(spec["layer"][0]["params"][0]["bind"], json!("legend"));
        assert!(spec["layer"][1].get("params").is_none());
        assert_eq!(
            spec["layer"][1]["encoding"]["stroke"]["scale"]["domain"],
            json!(["Top", "Bottom"])
        );
    }

    #[test]
    fn test_navigation_keeps_legend_selection() {
        let mut figure = Figure::new(800, 400);
        figure.set_tools("pan, xbox_zoom, reset");
        let source = DataSource::new()
            .with_column("x", vec![1.0])
            .with_column("y", vec![1.0]);
        figure.add_glyph(GlyphKind::line("x", "y"), source, PlotOptions::new(), Some("top"));
        figure.legend = Some(Legend {
            items: vec![("Top".to_string(), "top".to_string())],
            horizontal: true,
        });
        let spec = VegaLiteWriter::new().write(&figure).unwrap();

        let names: Vec<&str> = spec["layer"][0]["params"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|p| p["name"].as_str())
            .collect();
        assert_eq!(names, vec![LEGEND_PARAM, "navigate"]);
    }

    #[test]
    fn test_no_navigation_without_tools() {
        let mut figure = spectrum_figure();
        figure.set_tools("crosshair, reset");
        let spec = VegaLiteWriter::new().write(&figure).unwrap();
        assert!(spec["layer"][0].get("params").is_none());
    }
}
