//! Scatter renderer

use super::{AxisLabels, AxisRanges, DrawContext, Extents, PlotRenderer, SPECTRUM_TOOLS};
use crate::plot::figure::{GlyphKind, HoverMode, HoverTool, Tooltip};
use crate::plot::options::{DefaultOption, DefaultOptionValue, PlotOptions};
use crate::source::DataSource;
use crate::utilities::{get_min_max, pad_max};
use crate::Result;

#[derive(Debug, Clone, Copy)]
pub struct ScatterRenderer;

const SCATTER_DEFAULTS: &[DefaultOption] = &[
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
    DefaultOption {
        name: "color",
        default: DefaultOptionValue::Null,
    },
    DefaultOption {
        name: "size",
        default: DefaultOptionValue::Null,
    },
    DefaultOption {
        name: "alpha",
        default: DefaultOptionValue::Null,
    },
];

impl PlotRenderer for ScatterRenderer {
    fn required_fields(&self) -> &'static [&'static str] {
        &["x", "y"]
    }

    fn default_options(&self) -> &'static [DefaultOption] {
        SCATTER_DEFAULTS
    }

    fn draw(&self, ctx: DrawContext<'_>) -> Result<()> {
        let mut style = PlotOptions::new();
        for name in ["color", "size", "alpha", "marker"] {
            if let Some(value) = ctx.options.get(name) {
                style.set(name, value.clone());
            }
        }
        ctx.figure.add_glyph(
            GlyphKind::scatter("x", "y"),
            ctx.source.clone(),
            style,
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
            tooltips: vec![Tooltip::data(labels.x, "x"), Tooltip::data(labels.y, "y")],
            renderers: vec![plot_type.to_string()],
            mode: HoverMode::Mouse,
        }]
    }

    fn ranges(&self, source: &DataSource, _extents: &Extents, _options: &PlotOptions) -> AxisRanges {
        let padded = |name: &str| {
            source
                .numbers(name)
                .ok()
                .and_then(get_min_max)
                .map(|extent| pad_max(extent, 1.05))
        };
        (padded("x"), padded("y"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranges_pad_upper_bound() {
        let source = DataSource::new()
            .with_column("x", vec![0.0, 10.0])
            .with_column("y", vec![2.0, 20.0]);
        let (x, y) = ScatterRenderer.ranges(&source, &Extents::default(), &PlotOptions::new());
        assert_eq!(x, Some((0.0, 10.5)));
        assert_eq!(y, Some((2.0, 21.0)));
    }

    #[test]
    fn test_required_fields() {
        let mut source = DataSource::new().with_column("x", vec![1.0]);
        let err = ScatterRenderer.check_source(&mut source).unwrap_err();
        assert!(err.to_string().contains("Missing 'y'"));
    }
}
