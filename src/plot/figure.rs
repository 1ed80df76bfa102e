//! Figure model
//!
//! A [`Figure`] is the renderable half of a plot: size, axis ranges and
//! labels, interaction tools, glyph renderers with their data, hover tools,
//! legend and colour bar. The Vega-Lite writer turns it into a layered spec.

use crate::palettes::ColorMapper;
use crate::plot::PlotOptions;
use crate::source::DataSource;
use crate::utilities::get_unique_str;

/// Orientation of a span annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanDimension {
    /// Horizontal line at a y location
    Width,
    /// Vertical line at an x location
    Height,
}

impl SpanDimension {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "width" => Some(SpanDimension::Width),
            "height" => Some(SpanDimension::Height),
            _ => None,
        }
    }
}

/// Box edges; missing edges extend to the plot range
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoxEdges {
    pub bottom: Option<f64>,
    pub top: Option<f64>,
    pub left: Option<f64>,
    pub right: Option<f64>,
}

/// Glyph type together with the source fields it reads
#[derive(Debug, Clone, PartialEq)]
pub enum GlyphKind {
    Line { x: String, y: String },
    Scatter { x: String, y: String },
    Segment { x0: String, y0: String, x1: String, y1: String },
    MultiLine { xs: String, ys: String },
    Image,
    ImageRgba,
    Band,
    Box(BoxEdges),
    Span { location: f64, dimension: SpanDimension },
    Labels,
    Patch,
}

impl GlyphKind {
    pub fn line(x: &str, y: &str) -> Self {
        GlyphKind::Line {
            x: x.to_string(),
            y: y.to_string(),
        }
    }

    pub fn scatter(x: &str, y: &str) -> Self {
        GlyphKind::Scatter {
            x: x.to_string(),
            y: y.to_string(),
        }
    }

    pub fn segment(x0: &str, y0: &str, x1: &str, y1: &str) -> Self {
        GlyphKind::Segment {
            x0: x0.to_string(),
            y0: y0.to_string(),
            x1: x1.to_string(),
            y1: y1.to_string(),
        }
    }

    pub fn multi_line(xs: &str, ys: &str) -> Self {
        GlyphKind::MultiLine {
            xs: xs.to_string(),
            ys: ys.to_string(),
        }
    }
}

/// A glyph renderer: one mark drawn from one data source
#[derive(Debug, Clone)]
pub struct Glyph {
    pub id: String,
    pub name: Option<String>,
    pub kind: GlyphKind,
    pub source: DataSource,
    pub style: PlotOptions,
}

/// Value shown by a tooltip row
#[derive(Debug, Clone, PartialEq)]
pub enum TooltipField {
    /// Field of the glyph's data source
    Data(String),
    /// Data-space x position under the cursor
    CursorX,
    /// Data-space y position under the cursor
    CursorY,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub label: String,
    pub field: TooltipField,
}

impl Tooltip {
    pub fn data(label: impl Into<String>, field: &str) -> Self {
        Self {
            label: label.into(),
            field: TooltipField::Data(field.to_string()),
        }
    }

    pub fn cursor_x(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            field: TooltipField::CursorX,
        }
    }

    pub fn cursor_y(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            field: TooltipField::CursorY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoverMode {
    #[default]
    Mouse,
    /// Nearest point along x
    VLine,
}

/// Hover tool attached to the glyphs named in `renderers` (all main glyphs when empty)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HoverTool {
    pub tooltips: Vec<Tooltip>,
    pub renderers: Vec<String>,
    pub mode: HoverMode,
}

/// Legend entries: (label, glyph name)
#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    pub items: Vec<(String, String)>,
    pub horizontal: bool,
}

/// Renderable figure handle of a plot
#[derive(Debug, Clone)]
pub struct Figure {
    pub width: u32,
    pub height: u32,
    pub x_range: Option<(f64, f64)>,
    pub y_range: Option<(f64, f64)>,
    pub x_axis_label: String,
    pub y_axis_label: String,
    pub tools: Vec<String>,
    pub active_drag: Option<String>,
    pub hover_tools: Vec<HoverTool>,
    pub glyphs: Vec<Glyph>,
    pub legend: Option<Legend>,
    pub color_mapper: Option<ColorMapper>,
    pub color_bar: bool,
}

impl Figure {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            x_range: None,
            y_range: None,
            x_axis_label: String::new(),
            y_axis_label: String::new(),
            tools: Vec::new(),
            active_drag: None,
            hover_tools: Vec::new(),
            glyphs: Vec::new(),
            legend: None,
            color_mapper: None,
            color_bar: false,
        }
    }

    /// Set tools from a comma separated list, e.g. "pan, box_zoom, reset"
    pub fn set_tools(&mut self, tools: &str) {
        self.tools = tools
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
    }

    pub fn has_tool(&self, tool: &str) -> bool {
        self.tools.iter().any(|t| t == tool)
    }

    /// Add a glyph renderer and return its id
    pub fn add_glyph(
        &mut self,
        kind: GlyphKind,
        source: DataSource,
        style: PlotOptions,
        name: Option<&str>,
    ) -> String {
        let id = get_unique_str();
        self.glyphs.push(Glyph {
            id: id.clone(),
            name: name.map(str::to_string),
            kind,
            source,
            style,
        });
        id
    }

    pub fn add_hover(&mut self, hover: HoverTool) {
        self.hover_tools.push(hover);
    }

    /// Glyphs carrying the given name
    pub fn select(&self, name: &str) -> Vec<&Glyph> {
        self.glyphs
            .iter()
            .filter(|g| g.name.as_deref() == Some(name))
            .collect()
    }

    pub fn glyph(&self, id: &str) -> Option<&Glyph> {
        self.glyphs.iter().find(|g| g.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_tools() {
        let mut figure = Figure::new(800, 400);
        figure.set_tools("pan, xpan, xbox_zoom, box_zoom, crosshair, reset");
        assert_eq!(figure.tools.len(), 6);
        assert!(figure.has_tool("xbox_zoom"));
        assert!(!figure.has_tool("wheel_zoom"));
    }

    #[test]
    fn test_add_and_select_glyphs() {
        let mut figure = Figure::new(800, 400);
        let id = figure.add_glyph(
            GlyphKind::line("x", "y"),
            DataSource::new(),
            PlotOptions::new(),
            Some("spectrum"),
        );
        figure.add_glyph(
            GlyphKind::scatter("x", "y"),
            DataSource::new(),
            PlotOptions::new(),
            None,
        );

        assert_eq!(figure.select("spectrum").len(), 1);
        assert_eq!(figure.glyph(&id).map(|g| &g.kind), Some(&GlyphKind::line("x", "y")));
        assert_eq!(figure.glyphs.len(), 2);
    }

    #[test]
    fn test_span_dimension_parse() {
        assert_eq!(SpanDimension::parse("width"), Some(SpanDimension::Width));
        assert_eq!(SpanDimension::parse("height"), Some(SpanDimension::Height));
        assert_eq!(SpanDimension::parse("depth"), None);
    }
}
