//! Butterfly renderer: a top and a (mirrored) bottom line on shared axes

use super::{line_style, AxisLabels, AxisRanges, DrawContext, Extents, PlotRenderer, LINE_DEFAULTS};
use crate::plot::annotation::{Capability, SPECTRUM_CAPABILITIES};
use crate::plot::figure::{Figure, GlyphKind, HoverMode, HoverTool, Legend, Tooltip};
use crate::plot::options::{DefaultOption, PlotOptions};
use crate::source::DataSource;
use crate::utilities::{get_min_max, merge_extents};
use crate::Result;

#[derive(Debug, Clone, Copy)]
pub struct ButterflyRenderer;

fn top_name(plot_type: &str) -> String {
    format!("{}-top", plot_type)
}

fn bottom_name(plot_type: &str) -> String {
    format!("{}-bottom", plot_type)
}

impl PlotRenderer for ButterflyRenderer {
    fn required_fields(&self) -> &'static [&'static str] {
        &["x_top", "y_top", "x_bottom", "y_bottom"]
    }

    fn default_options(&self) -> &'static [DefaultOption] {
        LINE_DEFAULTS
    }

    /// The two halves may hold a different number of points
    fn check_source(&self, source: &mut DataSource) -> Result<()> {
        source.check_fields(&["x_top", "y_top"])?;
        source.check_fields(&["x_bottom", "y_bottom"])
    }

    fn draw(&self, ctx: DrawContext<'_>) -> Result<()> {
        let style = line_style(ctx.options);
        ctx.figure.add_glyph(
            GlyphKind::line("x_top", "y_top"),
            ctx.source.clone(),
            style.clone(),
            Some(&top_name(ctx.plot_type)),
        );
        ctx.figure.add_glyph(
            GlyphKind::line("x_bottom", "y_bottom"),
            ctx.source.clone(),
            style,
            Some(&bottom_name(ctx.plot_type)),
        );
        Ok(())
    }

    fn hover_tools(
        &self,
        plot_type: &'static str,
        _source: &DataSource,
        labels: AxisLabels<'_>,
    ) -> Vec<HoverTool> {
        [("x_top", "y_top", top_name(plot_type)), ("x_bottom", "y_bottom", bottom_name(plot_type))]
            .into_iter()
            .map(|(x, y, renderer)| HoverTool {
                tooltips: vec![Tooltip::data(labels.x, x), Tooltip::data(labels.y, y)],
                renderers: vec![renderer],
                mode: HoverMode::VLine,
            })
            .collect()
    }

    fn ranges(&self, source: &DataSource, _extents: &Extents, _options: &PlotOptions) -> AxisRanges {
        let extent = |names: [&str; 2]| {
            let extents: Vec<(f64, f64)> = names
                .iter()
                .filter_map(|name| source.numbers(name).ok().and_then(get_min_max))
                .collect();
            merge_extents(&extents)
        };
        let x = extent(["x_top", "x_bottom"]);
        let y = extent(["y_top", "y_bottom"]).map(|(lo, hi)| (lo * 1.05, hi * 1.05));
        (x, y)
    }

    fn decorate(
        &self,
        plot_type: &'static str,
        figure: &mut Figure,
        options: &PlotOptions,
    ) -> Result<()> {
        if options.get_bool("add_legend") {
            figure.legend = Some(Legend {
                items: vec![
                    ("Top".to_string(), top_name(plot_type)),
                    ("Bottom".to_string(), bottom_name(plot_type)),
                ],
                horizontal: true,
            });
        }
        Ok(())
    }

    fn capabilities(&self) -> &'static [Capability] {
        SPECTRUM_CAPABILITIES
    }
}
