//! Image renderers: colour-mapped intensity images and RGBA images
//!
//! Both place a single image at (`x`, `y`) with size (`dw`, `dh`) in data
//! units. Missing placement fields default to the origin and the array's
//! own width/height. The figure keeps the array's aspect ratio inside a
//! 600 pixel box unless `width`/`height` are given.

use super::{dimension, AxisLabels, AxisRanges, DrawContext, Extents, PlotRenderer};
use crate::palettes::convert_colormap_to_mapper;
use crate::plot::figure::{Figure, GlyphKind, HoverMode, HoverTool, Tooltip};
use crate::plot::options::{DefaultOption, DefaultOptionValue, PlotOptions};
use crate::source::{DataSource, ImageDtype};
use crate::utilities::fit_dimensions;
use crate::{PlotskiError, Result};

/// Largest figure side in pixels
const MAX_IMAGE_SIZE: u32 = 600;

const IMAGE_DEFAULTS: &[DefaultOption] = &[
    DefaultOption {
        name: "cmap",
        default: DefaultOptionValue::String("viridis"),
    },
    DefaultOption {
        name: "tools",
        default: DefaultOptionValue::String("pan, box_zoom, crosshair, reset"),
    },
    DefaultOption {
        name: "active_drag",
        default: DefaultOptionValue::String("box_zoom"),
    },
    DefaultOption {
        name: "z_min",
        default: DefaultOptionValue::Null,
    },
    DefaultOption {
        name: "z_max",
        default: DefaultOptionValue::Null,
    },
    DefaultOption {
        name: "add_colorbar",
        default: DefaultOptionValue::Boolean(false),
    },
];

const RGBA_DEFAULTS: &[DefaultOption] = &[
    DefaultOption {
        name: "tools",
        default: DefaultOptionValue::String("pan, box_zoom, crosshair, reset"),
    },
    DefaultOption {
        name: "active_drag",
        default: DefaultOptionValue::String("box_zoom"),
    },
];

/// Validate the `image` field and fill in placement defaults
fn check_image_source(source: &mut DataSource) -> Result<()> {
    let image = source.image()?;
    if image.shape().len() < 2 {
        return Err(PlotskiError::ValidationError(format!(
            "Field 'image' must be at least two-dimensional, got shape {:?}",
            image.shape()
        )));
    }
    let (width, height) = (image.width() as f64, image.height() as f64);

    for (name, value) in [("x", 0.0), ("y", 0.0), ("dw", width), ("dh", height)] {
        if !source.contains(name) {
            source.insert(name, vec![value]);
        }
    }
    Ok(())
}

fn image_figure_size(source: &DataSource, options: &PlotOptions) -> Result<(u32, u32)> {
    let (height, width) = fit_dimensions(source.image()?.shape(), MAX_IMAGE_SIZE)?;
    Ok((
        dimension(options, "width").unwrap_or(width),
        dimension(options, "height").unwrap_or(height),
    ))
}

fn image_ranges(source: &DataSource) -> AxisRanges {
    match source.image() {
        Ok(image) => (
            Some((0.0, image.width() as f64)),
            Some((0.0, image.height() as f64)),
        ),
        Err(_) => (None, None),
    }
}

fn position_tooltips() -> Vec<Tooltip> {
    vec![Tooltip::cursor_x("x"), Tooltip::cursor_y("y")]
}

/// Intensity image drawn through a colormap
#[derive(Debug, Clone, Copy)]
pub struct ImageRenderer;

impl PlotRenderer for ImageRenderer {
    fn required_fields(&self) -> &'static [&'static str] {
        &["image"]
    }

    fn default_options(&self) -> &'static [DefaultOption] {
        IMAGE_DEFAULTS
    }

    fn check_source(&self, source: &mut DataSource) -> Result<()> {
        check_image_source(source)?;
        let dims = source.image()?.shape().len();
        if dims != 2 {
            return Err(PlotskiError::ValidationError(format!(
                "Image plots expect a two-dimensional array, got {} dimensions",
                dims
            )));
        }
        Ok(())
    }

    fn figure_size(&self, source: &DataSource, options: &PlotOptions) -> Result<(u32, u32)> {
        image_figure_size(source, options)
    }

    fn draw(&self, ctx: DrawContext<'_>) -> Result<()> {
        let cmap = ctx.options.get_str("cmap").unwrap_or("viridis");
        let (_, mapper) = convert_colormap_to_mapper(
            ctx.source.image()?,
            cmap,
            ctx.options.get_number("z_min"),
            ctx.options.get_number("z_max"),
        )?;
        ctx.figure.color_mapper = Some(mapper);
        ctx.figure.add_glyph(
            GlyphKind::Image,
            ctx.source.clone(),
            PlotOptions::new(),
            Some("image"),
        );
        Ok(())
    }

    fn hover_tools(
        &self,
        _plot_type: &'static str,
        _source: &DataSource,
        _labels: AxisLabels<'_>,
    ) -> Vec<HoverTool> {
        let mut tooltips = position_tooltips();
        tooltips.push(Tooltip::data("intensity", "image"));
        vec![HoverTool {
            tooltips,
            renderers: vec!["image".to_string()],
            mode: HoverMode::Mouse,
        }]
    }

    fn ranges(&self, source: &DataSource, _extents: &Extents, _options: &PlotOptions) -> AxisRanges {
        image_ranges(source)
    }

    fn decorate(
        &self,
        _plot_type: &'static str,
        figure: &mut Figure,
        options: &PlotOptions,
    ) -> Result<()> {
        figure.color_bar = options.get_bool("add_colorbar");
        Ok(())
    }
}

/// 8-bit RGBA image of shape (h, w, 4)
#[derive(Debug, Clone, Copy)]
pub struct ImageRgbaRenderer;

impl PlotRenderer for ImageRgbaRenderer {
    fn required_fields(&self) -> &'static [&'static str] {
        &["image"]
    }

    fn default_options(&self) -> &'static [DefaultOption] {
        RGBA_DEFAULTS
    }

    fn check_source(&self, source: &mut DataSource) -> Result<()> {
        check_image_source(source)?;
        let image = source.image()?;
        if image.dtype() != ImageDtype::UInt8 {
            return Err(PlotskiError::ValidationError(format!(
                "ImageRGBA expects 8-bit values, got {}",
                image.dtype()
            )));
        }
        if image.shape().len() != 3 || image.shape()[2] != 4 {
            return Err(PlotskiError::ValidationError(format!(
                "ImageRGBA expects an array of shape (h, w, 4), got {:?}",
                image.shape()
            )));
        }
        Ok(())
    }

    fn figure_size(&self, source: &DataSource, options: &PlotOptions) -> Result<(u32, u32)> {
        image_figure_size(source, options)
    }

    fn draw(&self, ctx: DrawContext<'_>) -> Result<()> {
        ctx.figure.add_glyph(
            GlyphKind::ImageRgba,
            ctx.source.clone(),
            PlotOptions::new(),
            Some("rgba"),
        );
        Ok(())
    }

    fn hover_tools(
        &self,
        _plot_type: &'static str,
        source: &DataSource,
        _labels: AxisLabels<'_>,
    ) -> Vec<HoverTool> {
        let mut tooltips = position_tooltips();
        let intensity = if source.contains("intensity") {
            "intensity"
        } else {
            "image"
        };
        tooltips.push(Tooltip::data("intensity", intensity));
        tooltips.push(Tooltip::data("(R, G, B, A)", "rgba"));
        vec![HoverTool {
            tooltips,
            renderers: vec!["rgba".to_string()],
            mode: HoverMode::Mouse,
        }]
    }

    fn ranges(&self, source: &DataSource, _extents: &Extents, _options: &PlotOptions) -> AxisRanges {
        image_ranges(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ImageArray;
    use ndarray::{Array2, Array3};

    fn intensity_source(rows: usize, cols: usize) -> DataSource {
        let image: ImageArray = Array2::from_shape_fn((rows, cols), |(r, c)| (r * cols + c) as f64).into();
        DataSource::new().with_column("image", image)
    }

    #[test]
    fn test_missing_image_field() {
        let mut source = DataSource::new().with_column("x", vec![0.0]);
        let err = ImageRenderer.check_source(&mut source).unwrap_err();
        assert!(err.to_string().contains("Missing field 'image'"));
    }

    #[test]
    fn test_placement_defaults() {
        let mut source = intensity_source(10, 20).with_column("x", vec![5.0]);
        ImageRenderer.check_source(&mut source).unwrap();
        assert_eq!(source.numbers("x").unwrap(), &[5.0]);
        assert_eq!(source.numbers("y").unwrap(), &[0.0]);
        assert_eq!(source.numbers("dw").unwrap(), &[20.0]);
        assert_eq!(source.numbers("dh").unwrap(), &[10.0]);
    }

    #[test]
    fn test_figure_size_keeps_aspect_ratio() {
        let source = intensity_source(1200, 600);
        assert_eq!(
            ImageRenderer.figure_size(&source, &PlotOptions::new()).unwrap(),
            (300, 600)
        );

        let options = PlotOptions::new().with("width", 450.0);
        assert_eq!(ImageRenderer.figure_size(&source, &options).unwrap(), (450, 600));
    }

    #[test]
    fn test_ranges_follow_shape() {
        let source = intensity_source(10, 20);
        let ranges = ImageRenderer.ranges(&source, &Extents::default(), &PlotOptions::new());
        assert_eq!(ranges, (Some((0.0, 20.0)), Some((0.0, 10.0))));
    }

    #[test]
    fn test_rgba_rejects_non_8_bit() {
        let mut source = intensity_source(4, 4);
        let err = ImageRgbaRenderer.check_source(&mut source).unwrap_err();
        assert!(err.to_string().contains("8-bit"));

        let mut source = DataSource::new().with_column(
            "image",
            ImageArray::from(Array3::<u8>::zeros((4, 4, 4))),
        );
        assert!(ImageRgbaRenderer.check_source(&mut source).is_ok());

        let mut source = DataSource::new().with_column(
            "image",
            ImageArray::from(Array3::<u8>::zeros((4, 4, 3))),
        );
        assert!(ImageRgbaRenderer.check_source(&mut source).is_err());
    }

    #[test]
    fn test_colorbar_flag() {
        let mut figure = Figure::new(600, 600);
        let options = PlotOptions::new().with("add_colorbar", true);
        ImageRenderer.decorate("image", &mut figure, &options).unwrap();
        assert!(figure.color_bar);
    }
}
