//! Annotations added on top of an existing plot
//!
//! Every plot accepts boxes, patches, labels, bands and spans. Spectrum-like
//! plots additionally accept extra lines, segments, centroids and scatter
//! points. Each annotation is drawn as a glyph and recorded under its id.

use crate::plot::figure::{BoxEdges, GlyphKind, SpanDimension};
use crate::plot::{Plot, PlotOptions};
use crate::source::DataSource;
use crate::{PlotskiError, Result};

/// Annotation types a plot may expose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Box,
    Patch,
    Labels,
    Band,
    Span,
    Line,
    Segments,
    CentroidsX,
    CentroidsY,
    Scatter,
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Capability::Box => "box",
            Capability::Patch => "patch",
            Capability::Labels => "labels",
            Capability::Band => "band",
            Capability::Span => "span",
            Capability::Line => "line",
            Capability::Segments => "segments",
            Capability::CentroidsX => "centroids-x",
            Capability::CentroidsY => "centroids-y",
            Capability::Scatter => "scatter",
        };
        write!(f, "{}", name)
    }
}

/// Annotations available on every plot
pub const BASE_CAPABILITIES: &[Capability] = &[
    Capability::Box,
    Capability::Patch,
    Capability::Labels,
    Capability::Band,
    Capability::Span,
];

/// Annotations available on spectrum, centroid, butterfly and multi-line plots
pub const SPECTRUM_CAPABILITIES: &[Capability] = &[
    Capability::Box,
    Capability::Patch,
    Capability::Labels,
    Capability::Band,
    Capability::Span,
    Capability::Line,
    Capability::Segments,
    Capability::CentroidsX,
    Capability::CentroidsY,
    Capability::Scatter,
];

/// A recorded annotation
#[derive(Debug, Clone)]
pub struct Annotation {
    pub id: String,
    pub kind: Capability,
    pub data: DataSource,
}

impl Plot {
    fn require(&self, capability: Capability) -> Result<()> {
        if self.supports(capability) {
            return Ok(());
        }
        Err(PlotskiError::ValidationError(format!(
            "Cannot add {} to this plot ({})",
            capability,
            self.plot_type()
        )))
    }

    fn annotate(
        &mut self,
        capability: Capability,
        kind: GlyphKind,
        data: DataSource,
        style: PlotOptions,
    ) -> String {
        let id = self.figure.add_glyph(kind, data.clone(), style, None);
        self.annotations.push(Annotation {
            id: id.clone(),
            kind: capability,
            data,
        });
        id
    }

    /// Shade a rectangular region; edges not given extend to the plot range
    pub fn add_box(&mut self, data: DataSource, style: PlotOptions) -> Result<String> {
        self.require(Capability::Box)?;
        let edge = |name: &str| -> Result<Option<f64>> {
            match data.get(name) {
                None => Ok(None),
                Some(_) => Ok(data.numbers(name)?.first().copied()),
            }
        };
        let edges = BoxEdges {
            bottom: edge("bottom")?,
            top: edge("top")?,
            left: edge("left")?,
            right: edge("right")?,
        };
        if edges == BoxEdges::default() {
            return Err(PlotskiError::ValidationError(
                "Box annotation needs at least one of 'bottom, top, left, right'".to_string(),
            ));
        }
        Ok(self.annotate(Capability::Box, GlyphKind::Box(edges), data, style))
    }

    /// Filled polygon through the `x`/`y` vertices
    pub fn add_patch(&mut self, data: DataSource, style: PlotOptions) -> Result<String> {
        self.require(Capability::Patch)?;
        data.check_fields(&["x", "y"])?;
        Ok(self.annotate(Capability::Patch, GlyphKind::Patch, data, style))
    }

    /// Text labels at `x`/`y`
    pub fn add_labels(&mut self, data: DataSource, style: PlotOptions) -> Result<String> {
        self.require(Capability::Labels)?;
        data.check_fields(&["x", "y", "text"])?;
        Ok(self.annotate(Capability::Labels, GlyphKind::Labels, data, style))
    }

    /// Filled band between `lower` and `upper` along `base`
    pub fn add_band(&mut self, data: DataSource, style: PlotOptions) -> Result<String> {
        self.require(Capability::Band)?;
        data.check_fields(&["base", "lower", "upper"])?;
        Ok(self.annotate(Capability::Band, GlyphKind::Band, data, style))
    }

    /// One span per `location`; `dimension` is "width" (horizontal) or "height" (vertical)
    pub fn add_span(&mut self, data: DataSource, style: PlotOptions) -> Result<Vec<String>> {
        self.require(Capability::Span)?;
        data.check_fields(&["location", "dimension"])?;
        let dimension_name = data
            .text("dimension")?
            .first()
            .cloned()
            .unwrap_or_default();
        let dimension = SpanDimension::parse(&dimension_name).ok_or_else(|| {
            PlotskiError::ValidationError(format!(
                "Span dimension must be 'width' or 'height', got '{}'",
                dimension_name
            ))
        })?;

        let locations = data.numbers("location")?.to_vec();
        Ok(locations
            .into_iter()
            .map(|location| {
                let record = DataSource::new()
                    .with_column("location", vec![location])
                    .with_column("dimension", vec![dimension_name.clone()]);
                self.annotate(
                    Capability::Span,
                    GlyphKind::Span {
                        location,
                        dimension,
                    },
                    record,
                    style.clone(),
                )
            })
            .collect())
    }

    /// Extra line through `x`/`y`; extends the data extents used for ranges
    pub fn add_line(&mut self, data: DataSource, style: PlotOptions) -> Result<String> {
        self.require(Capability::Line)?;
        data.check_fields(&["x", "y"])?;
        self.extents
            .add(Some(data.numbers("x")?), Some(data.numbers("y")?));
        Ok(self.annotate(Capability::Line, GlyphKind::line("x", "y"), data, style))
    }

    /// Segments from (`x0`, `y0`) to (`x1`, `y1`)
    pub fn add_segments(&mut self, data: DataSource, style: PlotOptions) -> Result<String> {
        self.require(Capability::Segments)?;
        data.check_fields(&["x0", "y0", "x1", "y1"])?;
        Ok(self.annotate(
            Capability::Segments,
            GlyphKind::segment("x0", "y0", "x1", "y1"),
            data,
            style,
        ))
    }

    /// Vertical centroids at `x` from `y0` (zero when absent) to `y1`
    pub fn add_centroids_x(&mut self, mut data: DataSource, style: PlotOptions) -> Result<String> {
        self.require(Capability::CentroidsX)?;
        data.check_fields(&["x", "y1"])?;
        data.fill_zeros_like("y0", "x")?;
        Ok(self.annotate(
            Capability::CentroidsX,
            GlyphKind::segment("x", "y0", "x", "y1"),
            data,
            style,
        ))
    }

    /// Horizontal centroids at `y` from `x0` to `x1`
    pub fn add_centroids_y(&mut self, data: DataSource, style: PlotOptions) -> Result<String> {
        self.require(Capability::CentroidsY)?;
        data.check_fields(&["x0", "x1", "y"])?;
        Ok(self.annotate(
            Capability::CentroidsY,
            GlyphKind::segment("x0", "y", "x1", "y"),
            data,
            style,
        ))
    }

    /// Scatter points at `x`/`y`
    pub fn add_scatter(&mut self, data: DataSource, style: PlotOptions) -> Result<String> {
        self.require(Capability::Scatter)?;
        data.check_fields(&["x", "y"])?;
        Ok(self.annotate(
            Capability::Scatter,
            GlyphKind::scatter("x", "y"),
            data,
            style,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::PlotKind;
    use ndarray::Array2;

    fn spectrum() -> Plot {
        let source = DataSource::new()
            .with_column("x", vec![1.0, 2.0, 3.0])
            .with_column("y", vec![1.0, 4.0, 2.0]);
        Plot::new(PlotKind::Spectrum, "out", source, PlotOptions::new()).unwrap()
    }

    fn image() -> Plot {
        let image: crate::ImageArray = Array2::<f64>::ones((4, 4)).into();
        let source = DataSource::new().with_column("image", image);
        Plot::new(PlotKind::Image, "out", source, PlotOptions::new()).unwrap()
    }

    #[test]
    fn test_span_per_location() {
        let mut plot = spectrum();
        let ids = plot
            .add_span(
                DataSource::new()
                    .with_column("location", vec![1.5, 2.5])
                    .with_column("dimension", vec!["height"]),
                PlotOptions::new().with("line_color", "red"),
            )
            .unwrap();
        assert_eq!(ids.len(), 2);
        assert_eq!(plot.annotations().len(), 2);
        assert!(plot
            .annotations()
            .iter()
            .all(|a| a.kind == Capability::Span));
    }

    #[test]
    fn test_span_rejects_unknown_dimension() {
        let mut plot = spectrum();
        let err = plot
            .add_span(
                DataSource::new()
                    .with_column("location", vec![1.0])
                    .with_column("dimension", vec!["diagonal"]),
                PlotOptions::new(),
            )
            .unwrap_err();
        assert!(err.to_string().contains("width' or 'height"));
    }

    #[test]
    fn test_box_needs_an_edge() {
        let mut plot = spectrum();
        assert!(plot.add_box(DataSource::new(), PlotOptions::new()).is_err());

        let id = plot
            .add_box(
                DataSource::new()
                    .with_column("left", vec![1.0])
                    .with_column("right", vec![2.0]),
                PlotOptions::new(),
            )
            .unwrap();
        let glyph = plot.figure().glyph(&id).unwrap();
        assert_eq!(
            glyph.kind,
            GlyphKind::Box(BoxEdges {
                left: Some(1.0),
                right: Some(2.0),
                ..Default::default()
            })
        );
    }

    #[test]
    fn test_base_annotations_on_image() {
        let mut plot = image();
        plot.add_labels(
            DataSource::new()
                .with_column("x", vec![1.0])
                .with_column("y", vec![1.0])
                .with_column("text", vec!["peak"]),
            PlotOptions::new(),
        )
        .unwrap();
        plot.add_band(
            DataSource::new()
                .with_column("base", vec![0.0, 1.0])
                .with_column("lower", vec![0.0, 0.5])
                .with_column("upper", vec![1.0, 1.5]),
            PlotOptions::new(),
        )
        .unwrap();
        assert_eq!(plot.annotations().len(), 2);
    }

    #[test]
    fn test_spectrum_only_annotations_rejected_on_image() {
        let mut plot = image();
        let data = DataSource::new()
            .with_column("x", vec![1.0])
            .with_column("y", vec![1.0]);
        let err = plot.add_scatter(data.clone(), PlotOptions::new()).unwrap_err();
        assert!(err.to_string().contains("Cannot add scatter"));
        assert!(plot.add_line(data, PlotOptions::new()).is_err());
    }

    #[test]
    fn test_missing_fields_rejected() {
        let mut plot = spectrum();
        let err = plot
            .add_segments(
                DataSource::new()
                    .with_column("x0", vec![1.0])
                    .with_column("y0", vec![1.0]),
                PlotOptions::new(),
            )
            .unwrap_err();
        assert!(err.to_string().contains("x1, y1"));
    }

    #[test]
    fn test_centroids_x_fills_y0() {
        let mut plot = spectrum();
        let id = plot
            .add_centroids_x(
                DataSource::new()
                    .with_column("x", vec![1.0, 2.0])
                    .with_column("y1", vec![3.0, 4.0]),
                PlotOptions::new(),
            )
            .unwrap();
        let glyph = plot.figure().glyph(&id).unwrap();
        assert_eq!(glyph.source.numbers("y0").unwrap(), &[0.0, 0.0]);
    }

    #[test]
    fn test_line_extends_ranges() {
        let mut plot = spectrum();
        plot.add_line(
            DataSource::new()
                .with_column("x", vec![0.0, 10.0])
                .with_column("y", vec![-1.0, 8.0]),
            PlotOptions::new(),
        )
        .unwrap();
        let (x, y) = plot.resolved_ranges();
        assert_eq!(x, Some((0.0, 10.0)));
        assert_eq!(y, Some((-1.0, 8.0)));
    }
}
