//! Spectrum renderer (spectrum, mass spectrum, mobilogram)

use super::{line_style, AxisLabels, AxisRanges, DrawContext, Extents, PlotRenderer, LINE_DEFAULTS};
use crate::plot::annotation::{Capability, SPECTRUM_CAPABILITIES};
use crate::plot::figure::{GlyphKind, HoverMode, HoverTool, Tooltip};
use crate::plot::options::{DefaultOption, PlotOptions};
use crate::source::DataSource;
use crate::Result;

/// Single line through `x`/`y`; ranges follow every line added to the plot
#[derive(Debug, Clone, Copy)]
pub struct SpectrumRenderer;

impl PlotRenderer for SpectrumRenderer {
    fn required_fields(&self) -> &'static [&'static str] {
        &["x", "y"]
    }

    fn default_options(&self) -> &'static [DefaultOption] {
        LINE_DEFAULTS
    }

    fn draw(&self, ctx: DrawContext<'_>) -> Result<()> {
        ctx.figure.add_glyph(
            GlyphKind::line("x", "y"),
            ctx.source.clone(),
            line_style(ctx.options),
            Some(ctx.plot_type),
        );
        ctx.extents
            .add(Some(ctx.source.numbers("x")?), Some(ctx.source.numbers("y")?));
        Ok(())
    }

    fn hover_tools(
        &self,
        plot_type: &'static str,
        _source: &DataSource,
        labels: AxisLabels<'_>,
    ) -> Vec<HoverTool> {
        vec![HoverTool {
            tooltips: vec![Tooltip::data(labels.x, "x"), Tooltip::data(labels.y, "y")],
            renderers: vec![plot_type.to_string()],
            mode: HoverMode::VLine,
        }]
    }

    fn ranges(&self, _source: &DataSource, extents: &Extents, options: &PlotOptions) -> AxisRanges {
        (
            with_bounds(extents.x(), options, "x_min", "x_max"),
            with_bounds(extents.y(), options, "y_min", "y_max"),
        )
    }

    fn capabilities(&self) -> &'static [Capability] {
        SPECTRUM_CAPABILITIES
    }
}

/// Apply explicit `*_min`/`*_max` options on top of a data extent
fn with_bounds(
    extent: Option<(f64, f64)>,
    options: &PlotOptions,
    min_name: &str,
    max_name: &str,
) -> Option<(f64, f64)> {
    let lo = options.get_number(min_name).or(extent.map(|e| e.0));
    let hi = options.get_number(max_name).or(extent.map(|e| e.1));
    Some((lo?, hi?))
}
