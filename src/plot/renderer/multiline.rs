//! Multi-line renderer: one line per entry of the ragged `xs`/`ys` fields

use super::{line_style, AxisLabels, AxisRanges, DrawContext, Extents, PlotRenderer, LINE_DEFAULTS};
use crate::plot::annotation::{Capability, SPECTRUM_CAPABILITIES};
use crate::plot::figure::{GlyphKind, HoverMode, HoverTool, Tooltip};
use crate::plot::options::{DefaultOption, PlotOptions};
use crate::source::DataSource;
use crate::{PlotskiError, Result};

#[derive(Debug, Clone, Copy)]
pub struct MultiLineRenderer;

impl PlotRenderer for MultiLineRenderer {
    fn required_fields(&self) -> &'static [&'static str] {
        &["xs", "ys"]
    }

    fn default_options(&self) -> &'static [DefaultOption] {
        LINE_DEFAULTS
    }

    fn check_source(&self, source: &mut DataSource) -> Result<()> {
        source.check_fields(self.required_fields())?;
        let source: &DataSource = source;
        let lines = |name: &str| {
            source
                .get(name)
                .and_then(|c| c.as_lines())
                .ok_or_else(|| {
                    PlotskiError::ValidationError(format!(
                        "Field '{}' must hold one array per line",
                        name
                    ))
                })
        };
        let (xs, ys) = (lines("xs")?, lines("ys")?);
        if xs.len() != ys.len() {
            return Err(PlotskiError::ValidationError(format!(
                "Fields 'xs' and 'ys' must hold the same number of lines ({} != {})",
                xs.len(),
                ys.len()
            )));
        }
        for name in ["colors", "alpha", "line_id"] {
            if let Some(column) = source.get(name) {
                if column.len() != xs.len() {
                    return Err(PlotskiError::ValidationError(format!(
                        "Field '{}' must have one entry per line",
                        name
                    )));
                }
            }
        }
        Ok(())
    }

    fn draw(&self, ctx: DrawContext<'_>) -> Result<()> {
        ctx.figure.add_glyph(
            GlyphKind::multi_line("xs", "ys"),
            ctx.source.clone(),
            line_style(ctx.options),
            Some(ctx.plot_type),
        );
        Ok(())
    }

    fn hover_tools(
        &self,
        plot_type: &'static str,
        source: &DataSource,
        labels: AxisLabels<'_>,
    ) -> Vec<HoverTool> {
        let mut tooltips = vec![Tooltip::cursor_x(labels.x), Tooltip::cursor_y(labels.y)];
        if source.contains("line_id") {
            tooltips.push(Tooltip::data("Line ID", "line_id"));
        }
        vec![HoverTool {
            tooltips,
            renderers: vec![plot_type.to_string()],
            mode: HoverMode::Mouse,
        }]
    }

    fn ranges(&self, _source: &DataSource, _extents: &Extents, _options: &PlotOptions) -> AxisRanges {
        (None, None)
    }

    fn capabilities(&self) -> &'static [Capability] {
        SPECTRUM_CAPABILITIES
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::figure::TooltipField;

    fn source() -> DataSource {
        DataSource::new()
            .with_column("xs", vec![vec![1.0, 2.0], vec![1.0, 2.0, 3.0]])
            .with_column("ys", vec![vec![4.0, 5.0], vec![6.0, 7.0, 8.0]])
    }

    #[test]
    fn test_check_source() {
        let mut valid = source().with_column("colors", vec!["red", "blue"]);
        assert!(MultiLineRenderer.check_source(&mut valid).is_ok());

        let mut bad_colors = source().with_column("colors", vec!["red"]);
        assert!(MultiLineRenderer.check_source(&mut bad_colors).is_err());

        let mut flat = DataSource::new()
            .with_column("xs", vec![1.0, 2.0])
            .with_column("ys", vec![vec![1.0]]);
        let err = MultiLineRenderer.check_source(&mut flat).unwrap_err();
        assert!(err.to_string().contains("one array per line"));
    }

    #[test]
    fn test_hover_includes_line_id_when_present() {
        let labels = || AxisLabels { x: "x", y: "y" };
        let hovers = MultiLineRenderer.hover_tools("multiline-spectrum", &source(), labels());
        assert_eq!(hovers[0].tooltips.len(), 2);
        assert_eq!(hovers[0].tooltips[0].field, TooltipField::CursorX);

        let with_id = source().with_column("line_id", vec!["a", "b"]);
        let hovers = MultiLineRenderer.hover_tools("multiline-spectrum", &with_id, labels());
        assert_eq!(hovers[0].tooltips[2], Tooltip::data("Line ID", "line_id"));
    }

    #[test]
    fn test_ranges_are_automatic() {
        let ranges = MultiLineRenderer.ranges(&source(), &Extents::default(), &PlotOptions::new());
        assert_eq!(ranges, (None, None));
    }
}
