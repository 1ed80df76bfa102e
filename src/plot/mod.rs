//! Plot objects
//!
//! A [`Plot`] owns its data source, merged options, [`Figure`] and the
//! annotations added to it. [`PlotKind`] selects the renderer that draws the
//! main glyphs, derives axis ranges and sets up hover tools.
//!
//! # Layout
//!
//! Each plot composes into a column of: bold title, header (above, left,
//! right or below the figure), figure and footer (hidden when empty).

pub mod annotation;
pub mod figure;
pub mod options;
pub mod renderer;

pub use annotation::{Annotation, Capability};
pub use figure::{Figure, Glyph, GlyphKind, HoverMode, HoverTool, Tooltip, TooltipField};
pub use options::{DefaultOption, DefaultOptionValue, OptionValue, PlotOptions};

use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::layout::LayoutNode;
use crate::source::DataSource;
use crate::utilities::open_in_browser;
use crate::writer::{HtmlWriter, VegaLiteWriter, Writer};
use crate::{PlotskiError, Result};
use renderer::{get_renderer, AxisLabels, AxisRanges, DrawContext, Extents};

/// Plot types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlotKind {
    Scatter,
    Spectrum,
    MassSpectrum,
    Mobilogram,
    CentroidSpectrum,
    CentroidMassSpectrum,
    ButterflySpectrum,
    ButterflyMassSpectrum,
    ButterflyMobilogram,
    MultiLine,
    Image,
    ImageRgba,
}

impl PlotKind {
    pub const ALL: [PlotKind; 12] = [
        PlotKind::Scatter,
        PlotKind::Spectrum,
        PlotKind::MassSpectrum,
        PlotKind::Mobilogram,
        PlotKind::CentroidSpectrum,
        PlotKind::CentroidMassSpectrum,
        PlotKind::ButterflySpectrum,
        PlotKind::ButterflyMassSpectrum,
        PlotKind::ButterflyMobilogram,
        PlotKind::MultiLine,
        PlotKind::Image,
        PlotKind::ImageRgba,
    ];

    /// Type name used for glyph names and standalone file names
    pub fn plot_type(self) -> &'static str {
        match self {
            PlotKind::Scatter => "scatter",
            PlotKind::Spectrum => "spectrum",
            PlotKind::MassSpectrum => "mass-spectrum",
            PlotKind::Mobilogram => "mobilogram",
            PlotKind::CentroidSpectrum => "centroid-spectrum",
            PlotKind::CentroidMassSpectrum => "centroid-mass-spectrum",
            PlotKind::ButterflySpectrum => "butterfly-spectrum",
            PlotKind::ButterflyMassSpectrum => "butterfly-mass-spectrum",
            PlotKind::ButterflyMobilogram => "butterfly-mobilogram",
            PlotKind::MultiLine => "multiline-spectrum",
            PlotKind::Image => "image",
            PlotKind::ImageRgba => "rgba",
        }
    }

    pub fn default_title(self) -> &'static str {
        match self {
            PlotKind::Scatter => "Scatter",
            PlotKind::Spectrum => "Spectrum",
            PlotKind::MassSpectrum => "Mass Spectrum",
            PlotKind::Mobilogram => "Mobilogram",
            PlotKind::CentroidSpectrum => "Centroid Spectrum",
            PlotKind::CentroidMassSpectrum => "Centroid Mass Spectrum",
            PlotKind::ButterflySpectrum => "Butterfly Spectrum",
            PlotKind::ButterflyMassSpectrum => "Butterfly Mass Spectrum",
            PlotKind::ButterflyMobilogram => "Butterfly Mobilogram",
            PlotKind::MultiLine => "Multi-line",
            PlotKind::Image => "Image",
            PlotKind::ImageRgba => "Image-RGBA",
        }
    }

    /// Default (x, y) axis labels
    pub fn axis_labels(self) -> (&'static str, &'static str) {
        match self {
            PlotKind::MassSpectrum
            | PlotKind::CentroidMassSpectrum
            | PlotKind::ButterflyMassSpectrum => ("m/z", "Intensity"),
            PlotKind::Mobilogram | PlotKind::ButterflyMobilogram => {
                ("Drift time (bins)", "Intensity")
            }
            PlotKind::Image | PlotKind::ImageRgba => ("", ""),
            _ => ("x", "y"),
        }
    }

    pub fn required_fields(self) -> &'static [&'static str] {
        get_renderer(self).required_fields()
    }
}

impl std::fmt::Display for PlotKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.plot_type())
    }
}

impl FromStr for PlotKind {
    type Err = PlotskiError;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.to_lowercase();
        PlotKind::ALL
            .into_iter()
            .find(|kind| kind.plot_type() == lower)
            .or(match lower.as_str() {
                "multiline" | "multi-line" => Some(PlotKind::MultiLine),
                "image-rgba" => Some(PlotKind::ImageRgba),
                _ => None,
            })
            .ok_or_else(|| {
                let names: Vec<&str> = PlotKind::ALL.iter().map(|k| k.plot_type()).collect();
                PlotskiError::ValidationError(format!(
                    "Unknown plot kind '{}'. Valid kinds are: {}",
                    s,
                    names.join(", ")
                ))
            })
    }
}

/// Position of the header relative to the figure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    #[default]
    Above,
    Left,
    Right,
    Below,
}

impl FromStr for Position {
    type Err = PlotskiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "above" => Ok(Position::Above),
            "left" => Ok(Position::Left),
            "right" => Ok(Position::Right),
            "below" => Ok(Position::Below),
            _ => Err(PlotskiError::ValidationError(format!(
                "Unknown header position '{}'. Valid positions are: above, left, right, below",
                s
            ))),
        }
    }
}

/// An interactive plot
#[derive(Debug, Clone)]
pub struct Plot {
    /// Unique name assigned when the plot is added to a store
    pub name: Option<String>,
    pub output_dir: PathBuf,
    kind: PlotKind,
    source: DataSource,
    options: PlotOptions,
    figure: Figure,
    extents: Extents,
    annotations: Vec<Annotation>,
    title: String,
    header: String,
    header_pos: Position,
    footer: String,
}

fn take_text(options: &mut PlotOptions, name: &str) -> Result<Option<String>> {
    match options.remove(name) {
        None | Some(OptionValue::Null) => Ok(None),
        Some(OptionValue::String(s)) => Ok(Some(s)),
        Some(other) => Err(PlotskiError::ValidationError(format!(
            "Option '{}' must be a string, got {:?}",
            name, other
        ))),
    }
}

impl Plot {
    /// Build a plot of `kind` from a data source
    ///
    /// `options` are merged over the kind's defaults. `title`, `header`,
    /// `header_pos` and `footer` are taken out of the options and control
    /// the surrounding layout.
    pub fn new(
        kind: PlotKind,
        output_dir: impl Into<PathBuf>,
        mut source: DataSource,
        options: PlotOptions,
    ) -> Result<Self> {
        let renderer = get_renderer(kind);
        let mut options = options.with_defaults(renderer.default_options());

        let title = take_text(&mut options, "title")?
            .unwrap_or_else(|| kind.default_title().to_string());
        let header = take_text(&mut options, "header")?.unwrap_or_default();
        let footer = take_text(&mut options, "footer")?.unwrap_or_default();
        let header_pos = match take_text(&mut options, "header_pos")? {
            Some(pos) => pos.parse()?,
            None => Position::Above,
        };

        renderer.check_source(&mut source)?;

        let (width, height) = renderer.figure_size(&source, &options)?;
        let mut figure = Figure::new(width, height);
        let (x_label, y_label) = kind.axis_labels();
        figure.x_axis_label = options.get_str("x_axis_label").unwrap_or(x_label).to_string();
        figure.y_axis_label = options.get_str("y_axis_label").unwrap_or(y_label).to_string();
        if let Some(tools) = options.get_str("tools") {
            figure.set_tools(tools);
        }
        figure.active_drag = options.get_str("active_drag").map(str::to_string);

        let mut extents = Extents::default();
        renderer.draw(DrawContext {
            plot_type: kind.plot_type(),
            source: &source,
            options: &options,
            figure: &mut figure,
            extents: &mut extents,
        })?;

        let hovers = renderer.hover_tools(
            kind.plot_type(),
            &source,
            AxisLabels {
                x: &figure.x_axis_label,
                y: &figure.y_axis_label,
            },
        );
        figure.hover_tools.extend(hovers);
        renderer.decorate(kind.plot_type(), &mut figure, &options)?;

        tracing::debug!(
            "Created {} plot ({}x{}, {} glyphs)",
            kind,
            figure.width,
            figure.height,
            figure.glyphs.len()
        );

        Ok(Self {
            name: None,
            output_dir: output_dir.into(),
            kind,
            source,
            options,
            figure,
            extents,
            annotations: Vec::new(),
            title,
            header,
            header_pos,
            footer,
        })
    }

    pub fn kind(&self) -> PlotKind {
        self.kind
    }

    pub fn plot_type(&self) -> &'static str {
        self.kind.plot_type()
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    /// Effective options (explicit, store and default options merged)
    pub fn options(&self) -> &PlotOptions {
        &self.options
    }

    pub fn figure(&self) -> &Figure {
        &self.figure
    }

    pub fn figure_mut(&mut self) -> &mut Figure {
        &mut self.figure
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn capabilities(&self) -> &'static [Capability] {
        get_renderer(self.kind).capabilities()
    }

    pub fn supports(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, text: impl Into<String>) {
        self.title = text.into();
    }

    pub fn set_header(&mut self, text: impl Into<String>) {
        self.header = text.into();
    }

    pub fn set_header_pos(&mut self, position: Position) {
        self.header_pos = position;
    }

    pub fn set_footer(&mut self, text: impl Into<String>) {
        self.footer = text.into();
    }

    /// Axis ranges: `x_range`/`y_range` options, else derived from the data
    pub fn resolved_ranges(&self) -> AxisRanges {
        let (x, y) = get_renderer(self.kind).ranges(&self.source, &self.extents, &self.options);
        (
            self.options.get_range("x_range").or(x),
            self.options.get_range("y_range").or(y),
        )
    }

    /// Element id of the embedded figure
    pub fn figure_id(&self) -> String {
        format!("plot-{}", self.name.as_deref().unwrap_or(self.plot_type()))
    }

    /// Compose the plot layout with ranges derived from the current data
    pub fn layout(&self) -> Result<LayoutNode> {
        self.layout_with_ranges(self.resolved_ranges())
    }

    /// Compose the plot layout with explicit axis ranges
    pub fn layout_with_ranges(&self, ranges: AxisRanges) -> Result<LayoutNode> {
        let mut figure = self.figure.clone();
        figure.x_range = ranges.0;
        figure.y_range = ranges.1;

        let figure = LayoutNode::Figure {
            id: self.figure_id(),
            spec: VegaLiteWriter::new().write(&figure)?,
        };
        let header = LayoutNode::div(&self.header);

        let mut children = vec![LayoutNode::div(format!("<b>{}</b>", self.title))];
        match self.header_pos {
            Position::Above => children.extend([header, figure]),
            Position::Left => children.push(LayoutNode::Row(vec![header, figure])),
            Position::Right => children.push(LayoutNode::Row(vec![figure, header])),
            Position::Below => children.extend([figure, header]),
        }
        children.push(LayoutNode::Div {
            text: self.footer.clone(),
            visible: !self.footer.is_empty(),
        });
        Ok(LayoutNode::Column(children))
    }

    /// Save the plot as a standalone HTML document
    ///
    /// Defaults to `<output_dir>/<plot_type>.html`. Returns the written path.
    pub fn save(&self, filepath: Option<&Path>, show: bool) -> Result<PathBuf> {
        let path = match filepath {
            Some(path) => path.to_path_buf(),
            None => self.output_dir.join(format!("{}.html", self.plot_type())),
        };

        let html = HtmlWriter::new(&self.title).write(&self.layout()?)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, html)?;
        tracing::info!("Saved {} plot to {}", self.kind, path.display());

        if show {
            open_in_browser(&path)?;
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spectrum_source() -> DataSource {
        DataSource::new()
            .with_column("x", vec![100.0, 200.0, 300.0])
            .with_column("y", vec![1.0, 10.0, 5.0])
    }

    #[test]
    fn test_plot_kind_round_trip_names() {
        for kind in PlotKind::ALL {
            assert_eq!(kind.plot_type().parse::<PlotKind>().unwrap(), kind);
        }
        assert_eq!("multiline".parse::<PlotKind>().unwrap(), PlotKind::MultiLine);
        assert!("pie".parse::<PlotKind>().is_err());
    }

    #[test]
    fn test_new_applies_defaults_and_labels() {
        let plot = Plot::new(
            PlotKind::MassSpectrum,
            "out",
            spectrum_source(),
            PlotOptions::new(),
        )
        .unwrap();

        assert_eq!(plot.title(), "Mass Spectrum");
        assert_eq!(plot.figure().x_axis_label, "m/z");
        assert_eq!(plot.figure().y_axis_label, "Intensity");
        assert_eq!(plot.figure().width, 800);
        assert_eq!(plot.figure().height, 400);
        assert_eq!(plot.figure().active_drag.as_deref(), Some("xbox_zoom"));
        assert_eq!(plot.options().get_number("line_width"), Some(1.5));
    }

    #[test]
    fn test_new_rejects_missing_fields() {
        let source = DataSource::new().with_column("x", vec![1.0]);
        let err = Plot::new(PlotKind::Spectrum, "out", source, PlotOptions::new()).unwrap_err();
        assert!(err.to_string().contains("Missing 'y'"));
    }

    #[test]
    fn test_layout_options_are_taken_out() {
        let options = PlotOptions::new()
            .with("title", "My spectrum")
            .with("header", "run 1")
            .with("header_pos", "left")
            .with("x_axis_label", "mass");
        let plot = Plot::new(PlotKind::Spectrum, "out", spectrum_source(), options).unwrap();

        assert_eq!(plot.title(), "My spectrum");
        assert!(!plot.options().contains("title"));
        assert_eq!(plot.figure().x_axis_label, "mass");

        let LayoutNode::Column(children) = plot.layout().unwrap() else {
            panic!("plot layout must be a column");
        };
        assert_eq!(children.len(), 3);
        assert!(matches!(&children[1], LayoutNode::Row(row) if row.len() == 2));
        assert!(matches!(&children[2], LayoutNode::Div { visible: false, .. }));
    }

    #[test]
    fn test_explicit_ranges_win() {
        let options = PlotOptions::new().with("x_range", (0.0, 1000.0));
        let plot = Plot::new(PlotKind::Spectrum, "out", spectrum_source(), options).unwrap();
        let (x, y) = plot.resolved_ranges();
        assert_eq!(x, Some((0.0, 1000.0)));
        assert_eq!(y, Some((1.0, 10.0)));
    }

    #[test]
    fn test_bad_header_position() {
        let options = PlotOptions::new().with("header_pos", "middle");
        assert!(Plot::new(PlotKind::Spectrum, "out", spectrum_source(), options).is_err());
    }

    #[test]
    fn test_butterfly_legend_with_navigation() {
        let source = DataSource::new()
            .with_column("x_top", vec![1.0, 2.0])
            .with_column("y_top", vec![3.0, 4.0])
            .with_column("x_bottom", vec![1.0, 2.0])
            .with_column("y_bottom", vec![-3.0, -4.0]);
        let options = PlotOptions::new().with("add_legend", true);
        let plot = Plot::new(PlotKind::ButterflySpectrum, "out", source, options).unwrap();

        let LayoutNode::Column(children) = plot.layout().unwrap() else {
            panic!("plot layout must be a column");
        };
        let spec = children
            .iter()
            .find_map(|child| match child {
                LayoutNode::Figure { spec, .. } => Some(spec.clone()),
                _ => None,
            })
            .unwrap();
        let params: Vec<String> = spec["layer"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|layer| layer["params"].as_array())
            .flatten()
            .filter_map(|p| p["name"].as_str().map(String::from))
            .collect();
        assert!(params.iter().any(|p| p == "legend"));
        assert!(params.iter().any(|p| p == "navigate"));
    }

    #[test]
    fn test_save_creates_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let output_dir = dir.path().join("plots").join("run-1");
        let plot = Plot::new(PlotKind::Spectrum, &output_dir, spectrum_source(), PlotOptions::new()).unwrap();

        let path = plot.save(None, false).unwrap();
        assert_eq!(path, output_dir.join("spectrum.html"));
        assert!(path.is_file());
    }

    #[test]
    fn test_save_standalone() {
        let dir = tempfile::tempdir().unwrap();
        let plot = Plot::new(
            PlotKind::Scatter,
            dir.path(),
            spectrum_source(),
            PlotOptions::new(),
        )
        .unwrap();

        let path = plot.save(None, false).unwrap();
        assert_eq!(path, dir.path().join("scatter.html"));
        let html = std::fs::read_to_string(path).unwrap();
        assert!(html.contains("vegaEmbed"));
    }
}
