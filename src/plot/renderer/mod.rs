//! Per-kind plot renderers
//!
//! Each plot kind has a renderer that knows which source fields it needs,
//! its default options, how to draw its main glyphs into a [`Figure`], how
//! to derive axis ranges from the data and which hover tools to attach.
//! Kinds sharing a renderer (e.g. spectrum / mass spectrum / mobilogram)
//! only differ in titles and axis labels.

mod butterfly;
mod centroid;
mod image;
mod multiline;
mod scatter;
mod spectrum;

pub use butterfly::ButterflyRenderer;
pub use centroid::CentroidRenderer;
pub use image::{ImageRenderer, ImageRgbaRenderer};
pub use multiline::MultiLineRenderer;
pub use scatter::ScatterRenderer;
pub use spectrum::SpectrumRenderer;

use crate::plot::annotation::{Capability, BASE_CAPABILITIES};
use crate::plot::figure::{Figure, HoverTool};
use crate::plot::options::{DefaultOption, DefaultOptionValue, PlotOptions};
use crate::plot::PlotKind;
use crate::source::DataSource;
use crate::utilities::{get_min_max, merge_extents};
use crate::Result;

/// Optional (start, end) ranges for the x and y axes; `None` lets the renderer pick
pub type AxisRanges = (Option<(f64, f64)>, Option<(f64, f64)>);

/// Data extents collected while drawing (main glyphs and extra lines)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extents {
    x: Vec<(f64, f64)>,
    y: Vec<(f64, f64)>,
}

impl Extents {
    pub fn add(&mut self, x: Option<&[f64]>, y: Option<&[f64]>) {
        if let Some(extent) = x.and_then(get_min_max) {
            self.x.push(extent);
        }
        if let Some(extent) = y.and_then(get_min_max) {
            self.y.push(extent);
        }
    }

    pub fn x(&self) -> Option<(f64, f64)> {
        merge_extents(&self.x)
    }

    pub fn y(&self) -> Option<(f64, f64)> {
        merge_extents(&self.y)
    }
}

/// Everything a renderer needs to draw the main glyphs of a plot
pub struct DrawContext<'a> {
    pub plot_type: &'static str,
    pub source: &'a DataSource,
    pub options: &'a PlotOptions,
    pub figure: &'a mut Figure,
    pub extents: &'a mut Extents,
}

/// Labels used by hover tooltips
pub struct AxisLabels<'a> {
    pub x: &'a str,
    pub y: &'a str,
}

pub trait PlotRenderer {
    /// Fields the data source must contain
    fn required_fields(&self) -> &'static [&'static str];

    /// Default options of the plot type
    fn default_options(&self) -> &'static [DefaultOption];

    /// Validate (and complete) the data source before drawing
    fn check_source(&self, source: &mut DataSource) -> Result<()> {
        source.check_fields(self.required_fields())
    }

    /// Figure (width, height) in pixels
    fn figure_size(&self, _source: &DataSource, options: &PlotOptions) -> Result<(u32, u32)> {
        Ok((
            dimension(options, "width").unwrap_or(800),
            dimension(options, "height").unwrap_or(400),
        ))
    }

    /// Add the main glyphs to the figure
    fn draw(&self, ctx: DrawContext<'_>) -> Result<()>;

    fn hover_tools(
        &self,
        plot_type: &'static str,
        source: &DataSource,
        labels: AxisLabels<'_>,
    ) -> Vec<HoverTool>;

    /// Derive axis ranges from the data; `x_range`/`y_range` options are applied by the caller
    fn ranges(&self, source: &DataSource, extents: &Extents, options: &PlotOptions) -> AxisRanges;

    /// Optional decorations such as legends and colour bars
    fn decorate(
        &self,
        _plot_type: &'static str,
        _figure: &mut Figure,
        _options: &PlotOptions,
    ) -> Result<()> {
        Ok(())
    }

    /// Annotations this plot type accepts
    fn capabilities(&self) -> &'static [Capability] {
        BASE_CAPABILITIES
    }
}

/// Get the renderer for a plot kind
pub fn get_renderer(kind: PlotKind) -> Box<dyn PlotRenderer> {
    match kind {
        PlotKind::Scatter => Box::new(ScatterRenderer),
        PlotKind::Spectrum | PlotKind::MassSpectrum | PlotKind::Mobilogram => {
            Box::new(SpectrumRenderer)
        }
        PlotKind::CentroidSpectrum | PlotKind::CentroidMassSpectrum => Box::new(CentroidRenderer),
        PlotKind::ButterflySpectrum
        | PlotKind::ButterflyMassSpectrum
        | PlotKind::ButterflyMobilogram => Box::new(ButterflyRenderer),
        PlotKind::MultiLine => Box::new(MultiLineRenderer),
        PlotKind::Image => Box::new(ImageRenderer),
        PlotKind::ImageRgba => Box::new(ImageRgbaRenderer),
    }
}

/// Pixel dimension option, ignoring non-positive values
pub(crate) fn dimension(options: &PlotOptions, name: &str) -> Option<u32> {
    options
        .get_number(name)
        .filter(|v| *v > 0.0)
        .map(|v| v as u32)
}

/// Style options of a line-like main glyph
pub(crate) fn line_style(options: &PlotOptions) -> PlotOptions {
    let mut style = PlotOptions::new();
    for name in ["line_width", "line_color", "line_alpha", "line_dash"] {
        if let Some(value) = options.get(name) {
            style.set(name, value.clone());
        }
    }
    style
}

/// Interaction defaults shared by spectra and scatter plots
pub(crate) const SPECTRUM_TOOLS: &str = "pan, xpan, xbox_zoom, box_zoom, crosshair, reset";

pub(crate) const LINE_DEFAULTS: &[DefaultOption] = &[
    DefaultOption {
        name: "line_width",
        default: DefaultOptionValue::Number(1.5),
    },
    DefaultOption {
        name: "line_color",
        default: DefaultOptionValue::String("#000000"),
    },
    DefaultOption {
        name: "line_alpha",
        default: DefaultOptionValue::Number(1.0),
    },
    DefaultOption {
        name: "line_dash",
        default: DefaultOptionValue::String("solid"),
    },
    DefaultOption {
        name: "tools",
        default: DefaultOptionValue::String(SPECTRUM_TOOLS),
    },
    DefaultOption {
        name: "active_drag",
        default: DefaultOptionValue::String("xbox_zoom"),
    },
    DefaultOption {
        name: "width",
        default: DefaultOptionValue::Number(800.0),
    },
    DefaultOption {
        name: "height",
        default: DefaultOptionValue::Number(400.0),
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extents() {
        let mut extents = Extents::default();
        assert_eq!(extents.x(), None);

        extents.add(Some(&[1.0, 5.0]), Some(&[0.0, 10.0]));
        extents.add(Some(&[-2.0, 3.0]), None);
        assert_eq!(extents.x(), Some((-2.0, 5.0)));
        assert_eq!(extents.y(), Some((0.0, 10.0)));
    }

    #[test]
    fn test_dimension_ignores_non_positive() {
        let options = PlotOptions::new().with("width", 640.0).with("height", -1.0);
        assert_eq!(dimension(&options, "width"), Some(640));
        assert_eq!(dimension(&options, "height"), None);
    }

    #[test]
    fn test_line_style_picks_line_options() {
        let options = PlotOptions::new()
            .with("line_color", "red")
            .with("tools", "pan")
            .with("line_width", 2.0);
        let style = line_style(&options);
        assert_eq!(style.get_str("line_color"), Some("red"));
        assert_eq!(style.get_number("line_width"), Some(2.0));
        assert!(!style.contains("tools"));
    }
}
