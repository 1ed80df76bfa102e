//! Centroid renderer: vertical sticks from `y0` to `y1` at each `x`

use super::{line_style, AxisLabels, AxisRanges, DrawContext, Extents, PlotRenderer, LINE_DEFAULTS};
use crate::plot::annotation::{Capability, SPECTRUM_CAPABILITIES};
use crate::plot::figure::{GlyphKind, HoverMode, HoverTool, Tooltip};
use crate::plot::options::{DefaultOption, PlotOptions};
use crate::source::DataSource;
use crate::utilities::get_min_max;
use crate::Result;

#[derive(Debug, Clone, Copy)]
pub struct CentroidRenderer;

impl PlotRenderer for CentroidRenderer {
    fn required_fields(&self) -> &'static [&'static str] {
        &["x", "y0", "y1"]
    }

    fn default_options(&self) -> &'static [DefaultOption] {
        LINE_DEFAULTS
    }

    fn draw(&self, ctx: DrawContext<'_>) -> Result<()> {
        ctx.figure.add_glyph(
            GlyphKind::segment("x", "y0", "x", "y1"),
            ctx.source.clone(),
            line_style(ctx.options),
            Some(ctx.plot_type),
        );
        Ok(())
    }

    fn hover_tools(
        &self,
        plot_type: &'static str,
        _source: &DataSource,
        labels: AxisLabels<'_>,
    ) -> Vec<HoverTool> {
        vec![HoverTool {
            tooltips: vec![Tooltip::data(labels.x, "x"), Tooltip::data(labels.y, "y1")],
            renderers: vec![plot_type.to_string()],
            mode: HoverMode::Mouse,
        }]
    }

    fn ranges(&self, source: &DataSource, _extents: &Extents, _options: &PlotOptions) -> AxisRanges {
        let extent = |name: &str| source.numbers(name).ok().and_then(get_min_max);
        let x = extent("x");
        let y = match (extent("y0"), extent("y1")) {
            (Some((y0_min, _)), Some((_, y1_max))) => Some((y0_min, y1_max * 1.05)),
            _ => None,
        };
        (x, y)
    }

    fn capabilities(&self) -> &'static [Capability] {
        SPECTRUM_CAPABILITIES
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranges() {
        let source = DataSource::new()
            .with_column("x", vec![100.0, 250.0])
            .with_column("y0", vec![0.0, 0.0])
            .with_column("y1", vec![10.0, 40.0]);
        let (x, y) = CentroidRenderer.ranges(&source, &Extents::default(), &PlotOptions::new());
        assert_eq!(x, Some((100.0, 250.0)));
        assert_eq!(y, Some((0.0, 42.0)));
    }

    #[test]
    fn test_hover_reads_y1() {
        let hovers = CentroidRenderer.hover_tools(
            "centroid-spectrum",
            &DataSource::new(),
            AxisLabels { x: "x", y: "y" },
        );
        assert_eq!(hovers[0].tooltips[1], Tooltip::data("y", "y1"));
    }
}
