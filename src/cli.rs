/*!
plotski Command Line Interface

Reads tabular files (CSV, Parquet) and writes them as interactive plots into
a single HTML document.
*/

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use plotski::palettes::colormap_names;
use plotski::reader::{read_file, to_data_source, to_image};
use plotski::store::ContainerKind;
use plotski::{DataSource, LayoutOptions, PlotKind, PlotOptions, PlotStore, VERSION};

#[derive(Parser)]
#[command(name = "plotski")]
#[command(about = "Interactive plots organized into tabs and exported as one HTML document")]
#[command(version = VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Layout {
    Item,
    Row,
    Col,
    Grid,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Standalone HTML document
    Html,
    /// Layout tree as JSON
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Plot one or more files into a single document
    Plot {
        /// Input files (.csv, .parquet)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Plot kind (e.g. spectrum, mass-spectrum, scatter, image)
        #[arg(long, default_value = "spectrum")]
        kind: String,

        /// Column to use as x
        #[arg(long)]
        x: Option<String>,

        /// Column to use as y
        #[arg(long)]
        y: Option<String>,

        /// Tab the plots are added to
        #[arg(long, default_value = "plots")]
        tab: String,

        /// Container the plots are grouped in
        #[arg(long, value_enum, default_value = "item")]
        layout: Layout,

        /// Document title
        #[arg(long)]
        title: Option<String>,

        /// Output file path
        #[arg(long, default_value = "figure-store.html")]
        output: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "html")]
        format: OutputFormat,

        /// Open the document in the browser
        #[arg(long)]
        open: bool,
    },

    /// Show the shape and columns of a file
    Inspect {
        /// Input file (.csv, .parquet)
        file: PathBuf,
    },

    /// List the available colormaps
    Palettes,
}

fn load_source(path: &Path, kind: PlotKind, x: Option<&str>, y: Option<&str>) -> anyhow::Result<DataSource> {
    let df = read_file(path)?;
    if matches!(kind, PlotKind::Image | PlotKind::ImageRgba) {
        return Ok(DataSource::new().with_column("image", to_image(&df)?));
    }

    let mut source = to_data_source(&df)?;
    for (from, to) in [(x, "x"), (y, "y")] {
        if let Some(from) = from.filter(|from| *from != to) {
            source
                .rename(from, to)
                .with_context(|| format!("Cannot use column '{}' as {}", from, to))?;
        }
    }
    Ok(source)
}

fn container(store: &mut PlotStore, tab: &str, layout: Layout) -> anyhow::Result<Option<String>> {
    store.check_tab(tab, true)?;
    let name = match layout {
        Layout::Item => return Ok(None),
        Layout::Row => store.add_row(tab)?,
        Layout::Col => store.add_col(tab)?,
        Layout::Grid => store.add_grid(tab)?,
    };
    Ok(Some(name))
}

#[allow(clippy::too_many_arguments)]
fn plot_files(
    files: &[PathBuf],
    kind: &str,
    x: Option<&str>,
    y: Option<&str>,
    tab: &str,
    layout: Layout,
    title: Option<String>,
    output: &Path,
    format: OutputFormat,
    open: bool,
) -> anyhow::Result<()> {
    let kind: PlotKind = kind.parse()?;
    let output_dir = output.parent().map(Path::to_path_buf).unwrap_or_default();
    let mut store = PlotStore::new(output_dir);
    if let Some(title) = title {
        store = store.with_title(title);
    }

    let item = container(&mut store, tab, layout)?;
    for file in files {
        let source = load_source(file, kind, x, y)
            .with_context(|| format!("Failed to load '{}'", file.display()))?;
        let mut options = PlotOptions::new();
        if let Some(stem) = file.file_stem().and_then(|s| s.to_str()) {
            options.set("title", stem);
        }
        let handle = store.add_plot(kind, tab, source, item.as_deref(), options)?;
        info!("Added {} from {} to '{}/{}'", kind, file.display(), handle.tab, handle.item);
    }

    match format {
        OutputFormat::Html => {
            let path = store.save(Some(output), open, &LayoutOptions::default())?;
            println!("Document written to: {}", path.display());
        }
        OutputFormat::Json => {
            let layout = store.get_layout(&LayoutOptions::default())?;
            std::fs::write(output, serde_json::to_string_pretty(&layout)?)?;
            println!("Layout JSON written to: {}", output.display());
        }
    }
    Ok(())
}

fn inspect(file: &Path) -> anyhow::Result<()> {
    let df = read_file(file)?;
    println!("File: {}", file.display());
    println!("Shape: {:?}", df.shape());
    for column in df.get_columns() {
        println!("  {}: {}", column.name(), column.dtype());
    }
    println!("{}", df.head(Some(10)));
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "plotski=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Plot {
            files,
            kind,
            x,
            y,
            tab,
            layout,
            title,
            output,
            format,
            open,
        } => plot_files(
            &files,
            &kind,
            x.as_deref(),
            y.as_deref(),
            &tab,
            layout,
            title,
            &output,
            format,
            open,
        ),
        Commands::Inspect { file } => inspect(&file),
        Commands::Palettes => {
            for name in colormap_names() {
                println!("{}", name);
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_plot() {
        let cli = Cli::try_parse_from([
            "plotski", "plot", "a.csv", "b.csv", "--kind", "mass-spectrum", "--layout", "grid",
        ])
        .unwrap();
        let Commands::Plot { files, kind, layout, .. } = cli.command else {
            panic!("expected plot command");
        };
        assert_eq!(files.len(), 2);
        assert_eq!(kind, "mass-spectrum");
        assert!(matches!(layout, Layout::Grid));
    }

    #[test]
    fn test_container_kinds() {
        let mut store = PlotStore::new(".");
        assert_eq!(container(&mut store, "t", Layout::Item).unwrap(), None);
        let name = container(&mut store, "t", Layout::Grid).unwrap().unwrap();
        assert_eq!(ContainerKind::from_name(&name), Some(ContainerKind::Grid));
    }
}
