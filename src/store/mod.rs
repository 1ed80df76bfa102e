//! Plot store
//!
//! A [`PlotStore`] keeps plots in tabs and named containers (`item`, `row`,
//! `col`, `grid`), composes them into a [`LayoutNode`] tree and writes the
//! tree as a single HTML document.
//!
//! ```rust,ignore
//! let mut store = PlotStore::new("output");
//! let grid = { store.add_tab("images", false)?; store.add_grid("images")? };
//! for data in images {
//!     store.plot_image("images", data, Some(&grid), PlotOptions::new())?;
//! }
//! store.save(None, true, &LayoutOptions::default())?;
//! ```

mod container;

pub use container::{Container, ContainerKind, Tab};

use crate::layout::{LayoutNode, Panel};
use crate::plot::renderer::AxisRanges;
use crate::plot::{Plot, PlotKind, PlotOptions};
use crate::source::DataSource;
use crate::utilities::{get_unique_str, open_in_browser};
use crate::writer::{HtmlWriter, Writer};
use crate::{PlotskiError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Location of a plot inside a store
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlotHandle {
    pub tab: String,
    pub item: String,
    /// Unique plot name assigned by the store
    pub name: String,
}

/// Which tabs to export and how
#[derive(Debug, Clone)]
pub struct LayoutOptions {
    /// Tabs to include, in order; all tabs when `None`
    pub tab_names: Option<Vec<String>>,
    /// Keep the tab bar even when only one tab is exported
    pub always_as_tabs: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            tab_names: None,
            always_as_tabs: true,
        }
    }
}

/// Plot `target` follows the axis ranges of plot `source`
#[derive(Debug, Clone)]
struct RangeLink {
    source: String,
    target: String,
    x_axis: bool,
    y_axis: bool,
}

/// Store of interactive plots organized into tabs
#[derive(Debug, Clone)]
pub struct PlotStore {
    pub output_dir: PathBuf,
    pub filename: String,
    /// Document title
    pub title: String,
    /// Defaults applied to every plot created by the store
    pub options: PlotOptions,
    tabs: Vec<Tab>,
    links: Vec<RangeLink>,
}

impl std::fmt::Display for PlotStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PlotStore <tabs={}>", self.tabs.len())
    }
}

impl PlotStore {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            filename: "figure-store.html".to_string(),
            title: "Document Store".to_string(),
            options: PlotOptions::new(),
            tabs: Vec::new(),
            links: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: PlotOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    // ---- tabs -------------------------------------------------------------

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn tab_names(&self) -> Vec<&str> {
        self.tabs.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn tab(&self, name: &str) -> Result<&Tab> {
        self.tabs
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| PlotskiError::MissingTab(name.to_string()))
    }

    fn tab_mut(&mut self, name: &str) -> Result<&mut Tab> {
        self.tabs
            .iter_mut()
            .find(|t| t.name == name)
            .ok_or_else(|| PlotskiError::MissingTab(name.to_string()))
    }

    /// Tab by position
    pub fn tab_at(&self, index: usize) -> Result<&Tab> {
        self.tabs
            .get(index)
            .ok_or_else(|| PlotskiError::MissingTab(format!("#{}", index)))
    }

    fn has_tab(&self, name: &str) -> bool {
        self.tabs.iter().any(|t| t.name == name)
    }

    /// Add an empty tab; an existing tab is only emptied when `reset` is set
    pub fn add_tab(&mut self, name: &str, reset: bool) -> Result<String> {
        match self.tabs.iter_mut().find(|t| t.name == name) {
            Some(_) if !reset => return Err(PlotskiError::DuplicateTab(name.to_string())),
            Some(tab) => *tab = Tab::new(name),
            None => self.tabs.push(Tab::new(name)),
        }
        tracing::debug!("Added tab '{}'", name);
        Ok(name.to_string())
    }

    pub fn add_tabs(&mut self, names: &[&str], reset: bool) -> Result<()> {
        for name in names {
            self.add_tab(name, reset)?;
        }
        Ok(())
    }

    /// Ensure a tab exists, creating it when `auto_add` is set
    pub fn check_tab(&mut self, name: &str, auto_add: bool) -> Result<()> {
        if self.has_tab(name) {
            return Ok(());
        }
        if !auto_add {
            return Err(PlotskiError::MissingTab(name.to_string()));
        }
        self.add_tab(name, false).map(|_| ())
    }

    // ---- containers -------------------------------------------------------

    /// Lowest unused `"<base> #<i>"` within the tab
    pub fn get_unique_name(&self, tab: &str, base: &str) -> Result<String> {
        Ok(self.tab(tab)?.unique_name(base))
    }

    fn add_container(&mut self, tab: &str, kind: ContainerKind) -> Result<String> {
        let tab = self.tab_mut(tab)?;
        let name = tab.unique_name(kind.base_name());
        tab.entry(&name);
        Ok(name)
    }

    pub fn add_row(&mut self, tab: &str) -> Result<String> {
        self.add_container(tab, ContainerKind::Row)
    }

    pub fn add_col(&mut self, tab: &str) -> Result<String> {
        self.add_container(tab, ContainerKind::Col)
    }

    pub fn add_grid(&mut self, tab: &str) -> Result<String> {
        self.add_container(tab, ContainerKind::Grid)
    }

    /// Append a plot to a container (created when missing) under a fresh unique name
    pub fn append_item(&mut self, tab: &str, item: &str, mut plot: Plot) -> Result<PlotHandle> {
        let name = get_unique_str();
        plot.name = Some(name.clone());
        self.tab_mut(tab)?.entry(item).plots.push(plot);
        Ok(PlotHandle {
            tab: tab.to_string(),
            item: item.to_string(),
            name,
        })
    }

    pub fn plot(&self, handle: &PlotHandle) -> Result<&Plot> {
        self.tab(&handle.tab)?
            .get(&handle.item)
            .and_then(|c| c.plots.iter().find(|p| p.name.as_deref() == Some(&handle.name)))
            .ok_or_else(|| missing_plot(handle))
    }

    pub fn plot_mut(&mut self, handle: &PlotHandle) -> Result<&mut Plot> {
        self.tab_mut(&handle.tab)?
            .get_mut(&handle.item)
            .and_then(|c| {
                c.plots
                    .iter_mut()
                    .find(|p| p.name.as_deref() == Some(&handle.name))
            })
            .ok_or_else(|| missing_plot(handle))
    }

    // ---- plots ------------------------------------------------------------

    /// Build a plot of `kind` and add it to `tab`
    ///
    /// The tab is created when missing. Without `item` the plot goes into a
    /// fresh `item #<i>` container. Options are merged over the store options.
    pub fn add_plot(
        &mut self,
        kind: PlotKind,
        tab: &str,
        mut data: DataSource,
        item: Option<&str>,
        options: PlotOptions,
    ) -> Result<PlotHandle> {
        self.check_tab(tab, true)?;
        if matches!(kind, PlotKind::CentroidSpectrum | PlotKind::CentroidMassSpectrum) {
            data.fill_zeros_like("y0", "x")?;
        }
        let plot = Plot::new(
            kind,
            self.output_dir.clone(),
            data,
            options.merged_over(&self.options),
        )?;
        let item = match item {
            Some(item) => item.to_string(),
            None => self.get_unique_name(tab, ContainerKind::Item.base_name())?,
        };
        tracing::debug!("Adding {} plot to '{}/{}'", kind, tab, item);
        self.append_item(tab, &item, plot)
    }

    pub fn plot_scatter(
        &mut self,
        tab: &str,
        data: DataSource,
        item: Option<&str>,
        options: PlotOptions,
    ) -> Result<PlotHandle> {
        self.add_plot(PlotKind::Scatter, tab, data, item, options)
    }

    pub fn plot_spectrum(
        &mut self,
        tab: &str,
        data: DataSource,
        item: Option<&str>,
        options: PlotOptions,
    ) -> Result<PlotHandle> {
        self.add_plot(PlotKind::Spectrum, tab, data, item, options)
    }

    pub fn plot_mass_spectrum(
        &mut self,
        tab: &str,
        data: DataSource,
        item: Option<&str>,
        options: PlotOptions,
    ) -> Result<PlotHandle> {
        self.add_plot(PlotKind::MassSpectrum, tab, data, item, options)
    }

    pub fn plot_butterfly_mass_spectrum(
        &mut self,
        tab: &str,
        data: DataSource,
        item: Option<&str>,
        options: PlotOptions,
    ) -> Result<PlotHandle> {
        self.add_plot(PlotKind::ButterflyMassSpectrum, tab, data, item, options)
    }

    /// Centroid mass spectrum; `y0` is zero-filled when absent
    pub fn plot_centroid_mass_spectrum(
        &mut self,
        tab: &str,
        data: DataSource,
        item: Option<&str>,
        options: PlotOptions,
    ) -> Result<PlotHandle> {
        self.add_plot(PlotKind::CentroidMassSpectrum, tab, data, item, options)
    }

    pub fn plot_mobilogram(
        &mut self,
        tab: &str,
        data: DataSource,
        item: Option<&str>,
        options: PlotOptions,
    ) -> Result<PlotHandle> {
        self.add_plot(PlotKind::Mobilogram, tab, data, item, options)
    }

    pub fn plot_butterfly_mobilogram(
        &mut self,
        tab: &str,
        data: DataSource,
        item: Option<&str>,
        options: PlotOptions,
    ) -> Result<PlotHandle> {
        self.add_plot(PlotKind::ButterflyMobilogram, tab, data, item, options)
    }

    pub fn plot_multiline_spectrum(
        &mut self,
        tab: &str,
        data: DataSource,
        item: Option<&str>,
        options: PlotOptions,
    ) -> Result<PlotHandle> {
        self.add_plot(PlotKind::MultiLine, tab, data, item, options)
    }

    pub fn plot_image(
        &mut self,
        tab: &str,
        data: DataSource,
        item: Option<&str>,
        options: PlotOptions,
    ) -> Result<PlotHandle> {
        self.add_plot(PlotKind::Image, tab, data, item, options)
    }

    pub fn plot_rgb_image(
        &mut self,
        tab: &str,
        data: DataSource,
        item: Option<&str>,
        options: PlotOptions,
    ) -> Result<PlotHandle> {
        self.add_plot(PlotKind::ImageRgba, tab, data, item, options)
    }

    // ---- annotations ------------------------------------------------------

    pub fn add_box(plot: &mut Plot, data: DataSource, style: PlotOptions) -> Result<String> {
        plot.add_box(data, style)
    }

    pub fn add_patch(plot: &mut Plot, data: DataSource, style: PlotOptions) -> Result<String> {
        plot.add_patch(data, style)
    }

    pub fn add_labels(plot: &mut Plot, data: DataSource, style: PlotOptions) -> Result<String> {
        plot.add_labels(data, style)
    }

    pub fn add_band(plot: &mut Plot, data: DataSource, style: PlotOptions) -> Result<String> {
        plot.add_band(data, style)
    }

    pub fn add_span(plot: &mut Plot, data: DataSource, style: PlotOptions) -> Result<Vec<String>> {
        plot.add_span(data, style)
    }

    pub fn add_line_plot(plot: &mut Plot, data: DataSource, style: PlotOptions) -> Result<String> {
        plot.add_line(data, style)
    }

    pub fn add_segments(plot: &mut Plot, data: DataSource, style: PlotOptions) -> Result<String> {
        plot.add_segments(data, style)
    }

    pub fn add_centroids_x(plot: &mut Plot, data: DataSource, style: PlotOptions) -> Result<String> {
        plot.add_centroids_x(data, style)
    }

    pub fn add_centroids_y(plot: &mut Plot, data: DataSource, style: PlotOptions) -> Result<String> {
        plot.add_centroids_y(data, style)
    }

    pub fn add_scatter(plot: &mut Plot, data: DataSource, style: PlotOptions) -> Result<String> {
        plot.add_scatter(data, style)
    }

    /// Make plot `b` follow the x and/or y range of plot `a`
    ///
    /// The range of `a` is copied into `b` when the layout is built. Panning
    /// or zooming one figure in the document does not move the other.
    pub fn link_plots(
        &mut self,
        a: &PlotHandle,
        b: &PlotHandle,
        x_axis: bool,
        y_axis: bool,
    ) -> Result<()> {
        self.plot(a)?;
        self.plot(b)?;
        self.links.push(RangeLink {
            source: a.name.clone(),
            target: b.name.clone(),
            x_axis,
            y_axis,
        });
        Ok(())
    }

    // ---- output -----------------------------------------------------------

    /// Axis ranges of every plot after applying the range links in order
    fn linked_ranges(&self) -> HashMap<String, AxisRanges> {
        let mut ranges: HashMap<String, AxisRanges> = self
            .tabs
            .iter()
            .flat_map(Tab::plots)
            .filter_map(|p| Some((p.name.clone()?, p.resolved_ranges())))
            .collect();
        for link in &self.links {
            let Some(&(x, y)) = ranges.get(&link.source) else {
                continue;
            };
            if let Some(target) = ranges.get_mut(&link.target) {
                if link.x_axis {
                    target.0 = x;
                }
                if link.y_axis {
                    target.1 = y;
                }
            }
        }
        ranges
    }

    /// Compose the requested tabs into a layout tree
    pub fn get_layout(&self, options: &LayoutOptions) -> Result<LayoutNode> {
        let names: Vec<&str> = match &options.tab_names {
            Some(names) => names.iter().map(String::as_str).collect(),
            None => self.tab_names(),
        };
        if let Some(missing) = names.iter().find(|name| !self.has_tab(name)) {
            return Err(PlotskiError::MissingTab(missing.to_string()));
        }

        let ranges = self.linked_ranges();
        let mut panels = Vec::new();
        for name in names {
            let tab = self.tab(name)?;
            let mut contents = Vec::new();
            for container in tab.containers() {
                if container.plots.is_empty() {
                    continue;
                }
                let kind = container.kind().unwrap_or_else(|| {
                    tracing::warn!(
                        "Container '{}' has no known prefix (item, row, col, grid); composing it as an item",
                        container.name
                    );
                    ContainerKind::Item
                });
                let figures = container
                    .plots
                    .iter()
                    .map(|plot| match plot.name.as_ref().and_then(|n| ranges.get(n)) {
                        Some(ranges) => plot.layout_with_ranges(*ranges),
                        None => plot.layout(),
                    })
                    .collect::<Result<Vec<_>>>()?;
                kind.compose(figures, &mut contents);
            }

            if contents.is_empty() {
                tracing::info!("Tab '{}' was empty - not adding it into the document", name);
                continue;
            }
            panels.push(Panel {
                title: name.to_string(),
                child: Box::new(LayoutNode::Column(contents)),
            });
        }

        if panels.len() == 1 && !options.always_as_tabs {
            if let Some(panel) = panels.pop() {
                return Ok(*panel.child);
            }
        }
        Ok(LayoutNode::Tabs(panels))
    }

    fn write_document(&self, path: &Path, options: &LayoutOptions) -> Result<()> {
        let layout = self.get_layout(options)?;
        let html = HtmlWriter::new(&self.title).write(&layout)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, html)?;
        tracing::info!(
            "Saved {} figures in {} tabs to {}",
            layout.figure_count(),
            self.tabs.len(),
            path.display()
        );
        Ok(())
    }

    /// Write the document, by default to `<output_dir>/<filename>`
    pub fn save(
        &self,
        filepath: Option<&Path>,
        show: bool,
        options: &LayoutOptions,
    ) -> Result<PathBuf> {
        let path = match filepath {
            Some(path) => path.to_path_buf(),
            None => self.output_dir.join(&self.filename),
        };
        self.write_document(&path, options)?;
        if show {
            open_in_browser(&path)?;
        }
        Ok(path)
    }

    /// Write the document to the temp directory and open it in the browser
    pub fn show(&self, options: &LayoutOptions) -> Result<PathBuf> {
        let path = std::env::temp_dir().join(&self.filename);
        self.write_document(&path, options)?;
        open_in_browser(&path)?;
        Ok(path)
    }
}

fn missing_plot(handle: &PlotHandle) -> PlotskiError {
    PlotskiError::ValidationError(format!(
        "Plot '{}' does not exist in '{}/{}'",
        handle.name, handle.tab, handle.item
    ))
}
