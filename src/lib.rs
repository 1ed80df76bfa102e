/*!
# plotski - interactive plot store

plotski builds interactive plots (scatter, spectra, centroids, butterfly and
multi-line plots, heatmap/RGBA images), organizes them into tabs, rows,
columns and grids, and writes everything into a single HTML document
rendered with Vega-Lite.

## Example

```rust,ignore
use plotski::{DataSource, LayoutOptions, PlotOptions, PlotStore};

let mut store = PlotStore::new("output");
store.add_tab("spectra", false)?;
let row = store.add_row("spectra")?;

let data = DataSource::new()
    .with_column("x", vec![1.0, 2.0, 3.0])
    .with_column("y", vec![4.0, 1.0, 6.0]);
let handle = store.plot_mass_spectrum("spectra", data, Some(&row), PlotOptions::new())?;

let span = DataSource::new()
    .with_column("location", vec![2.0])
    .with_column("dimension", vec!["height"]);
PlotStore::add_span(store.plot_mut(&handle)?, span, PlotOptions::new())?;

store.save(None, false, &LayoutOptions::default())?;
```

## Architecture

- [`store`] - tab/container bookkeeping and layout composition
- [`plot`] - plot objects, per-type renderers, figure model and annotations
- [`source`] - column-oriented data sources
- [`reader`] - reading tabular files into data sources (polars)
- [`layout`] - the layout tree composed from plots and containers
- [`writer`] - Vega-Lite and HTML writers
- [`palettes`] - colormaps and colour utilities
- [`utilities`] - extents, aspect ratio and unique ids
*/

pub mod layout;
pub mod palettes;
pub mod plot;
pub mod reader;
pub mod source;
pub mod store;
pub mod utilities;
pub mod writer;

pub use layout::{LayoutNode, Panel};
pub use plot::{Capability, OptionValue, Plot, PlotKind, PlotOptions, Position};
pub use source::{Column, DataSource, ImageArray};
pub use store::{LayoutOptions, PlotHandle, PlotStore};

// Re-export polars types for callers converting DataFrames
pub use polars::prelude::DataFrame;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Main library error type
#[derive(thiserror::Error, Debug)]
pub enum PlotskiError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Tab '{0}' does not exist")]
    MissingTab(String),

    #[error(
        "Tab '{0}' has previously been added! Set 'reset' to true to override the current container"
    )]
    DuplicateTab(String),

    #[error("Data source error: {0}")]
    ReaderError(String),

    #[error("Output generation error: {0}")]
    WriterError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PlotskiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PlotskiError::MissingTab("spectra".to_string());
        assert_eq!(err.to_string(), "Tab 'spectra' does not exist");

        let err = PlotskiError::DuplicateTab("spectra".to_string());
        assert!(err.to_string().contains("previously been added"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: PlotskiError = io.into();
        assert!(err.to_string().contains("gone"));
    }
}
